// ============================================================
// Layer 3: Training Data
// ============================================================
// The in-memory corpus consumed by the training engine.
//
//   TrainingData
//     ├── language: String
//     └── examples: Vec<TrainingExample>
//           ├── text:     "book a table for two"
//           ├── intent:   "restaurant_search"
//           └── entities: [{ start, end, value, entity }]
//
// A fresh TrainingData is built for every run and moved into
// the trainer, so nothing here is shared between runs.
//
// Reference: Rust Book §5 (Structs), §8 (Collections)

use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};

/// A labelled span inside an example's text.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EntityAnnotation {
    pub start:  usize,
    pub end:    usize,
    pub value:  String,
    pub entity: String,
}

/// One labelled utterance.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TrainingExample {
    pub text: String,

    /// Intent label; examples without one are kept but ignored by classifiers
    #[serde(default)]
    pub intent: Option<String>,

    #[serde(default)]
    pub entities: Vec<EntityAnnotation>,
}

impl TrainingExample {
    pub fn new(text: impl Into<String>, intent: impl Into<String>) -> Self {
        Self {
            text:     text.into(),
            intent:   Some(intent.into()),
            entities: Vec::new(),
        }
    }
}

/// The resolved training corpus for one run.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct TrainingData {
    pub language: String,
    pub examples: Vec<TrainingExample>,
}

impl TrainingData {
    pub fn new(language: impl Into<String>, examples: Vec<TrainingExample>) -> Self {
        Self {
            language: language.into(),
            examples,
        }
    }

    pub fn len(&self) -> usize {
        self.examples.len()
    }

    pub fn is_empty(&self) -> bool {
        self.examples.is_empty()
    }

    /// Distinct intent labels, sorted.
    pub fn intents(&self) -> BTreeSet<&str> {
        self.examples
            .iter()
            .filter_map(|e| e.intent.as_deref())
            .collect()
    }

    /// Append the examples of `other`, keeping this corpus's language.
    pub fn merge(mut self, other: TrainingData) -> Self {
        self.examples.extend(other.examples);
        self
    }
}
