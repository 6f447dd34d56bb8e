// ============================================================
// Layer 5: Keyword Intent Model
// ============================================================
// The trained artifact of the default engine.
//
// Training counts, per intent, how often each token occurs in
// that intent's examples. Parsing scores every intent by the
// relative frequency of the utterance's tokens and normalises
// the scores into confidences.
//
//   "book a table"  →  restaurant_search 0.81, greet 0.19
//
// Reference: Manning et al. (2008) Introduction to IR, ch. 13

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::data::preprocessor::Preprocessor;

/// Tokenisation options shared by training and parsing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct TokenizerOptions {
    pub lowercase:        bool,
    pub min_token_length: usize,
}

impl Default for TokenizerOptions {
    fn default() -> Self {
        Self {
            lowercase:        true,
            min_token_length: 1,
        }
    }
}

impl TokenizerOptions {
    /// Split on whitespace and strip surrounding punctuation.
    pub fn tokenize(&self, text: &str) -> Vec<String> {
        Preprocessor::new()
            .clean(text)
            .split(' ')
            .map(|t| t.trim_matches(|c: char| !c.is_alphanumeric()))
            .filter(|t| t.chars().count() >= self.min_token_length.max(1))
            .map(|t| if self.lowercase { t.to_lowercase() } else { t.to_string() })
            .collect()
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
struct IntentStats {
    examples:     usize,
    total_tokens: usize,
    token_counts: BTreeMap<String, usize>,
}

/// Per-intent token statistics.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct KeywordModel {
    tokenizer: TokenizerOptions,
    intents:   BTreeMap<String, IntentStats>,
}

/// One scored intent.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct IntentPrediction {
    pub name:       String,
    pub confidence: f64,
}

impl KeywordModel {
    pub fn new(tokenizer: TokenizerOptions) -> Self {
        Self {
            tokenizer,
            intents: BTreeMap::new(),
        }
    }

    /// Record one labelled example.
    pub fn observe(&mut self, text: &str, intent: &str) {
        let tokens = self.tokenizer.tokenize(text);
        let stats = self.intents.entry(intent.to_string()).or_default();
        stats.examples += 1;
        stats.total_tokens += tokens.len();
        for token in tokens {
            *stats.token_counts.entry(token).or_insert(0) += 1;
        }
    }

    pub fn intent_names(&self) -> Vec<&str> {
        self.intents.keys().map(String::as_str).collect()
    }

    pub fn example_count(&self) -> usize {
        self.intents.values().map(|s| s.examples).sum()
    }

    /// All intents with a non-zero score, best first.
    pub fn rank(&self, text: &str) -> Vec<IntentPrediction> {
        let tokens = self.tokenizer.tokenize(text);
        if tokens.is_empty() {
            return Vec::new();
        }

        let mut scored: Vec<(String, f64)> = self
            .intents
            .iter()
            .map(|(name, stats)| {
                let denom = stats.total_tokens.max(1) as f64;
                let score: f64 = tokens
                    .iter()
                    .map(|t| *stats.token_counts.get(t).unwrap_or(&0) as f64 / denom)
                    .sum();
                (name.clone(), score)
            })
            .filter(|(_, score)| *score > 0.0)
            .collect();

        let total: f64 = scored.iter().map(|(_, s)| s).sum();
        scored.sort_by(|a, b| b.1.total_cmp(&a.1).then_with(|| a.0.cmp(&b.0)));

        scored
            .into_iter()
            .map(|(name, score)| IntentPrediction {
                name,
                confidence: score / total,
            })
            .collect()
    }
}

/// Result of parsing one utterance.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ParseResult {
    pub text:           String,
    pub intent:         Option<IntentPrediction>,
    pub intent_ranking: Vec<IntentPrediction>,
}

/// The trained artifact: a model plus the config it was trained with.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Interpreter {
    pub language: String,
    pub pipeline: Vec<String>,
    pub model:    KeywordModel,
}

impl Interpreter {
    pub fn parse(&self, text: &str) -> ParseResult {
        let intent_ranking = self.model.rank(text);
        ParseResult {
            text: text.to_string(),
            intent: intent_ranking.first().cloned(),
            intent_ranking,
        }
    }
}
