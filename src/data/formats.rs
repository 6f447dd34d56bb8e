// ============================================================
// Layer 4: Training Data Formats
// ============================================================
// Two text formats are understood.
//
// Markdown:
//   ## intent:restaurant_search
//   - show me [mexican](cuisine) places
//   - i am hungry
//
//   Only `intent:` sections produce examples; `synonym:`, `regex:`
//   and `lookup:` sections are skipped. `[value](entity)` marks an
//   entity span and is replaced by `value` in the example text.
//
// JSON:
//   { "rasa_nlu_data": { "common_examples": [
//       { "text": "...", "intent": "...", "entities": [...] } ] } }

use anyhow::{anyhow, bail, Context, Result};
use serde::Deserialize;

use crate::data::preprocessor::Preprocessor;
use crate::domain::training_data::{EntityAnnotation, TrainingData, TrainingExample};

/// Supported on-disk / on-the-wire formats.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DataFormat {
    Markdown,
    Json,
}

impl DataFormat {
    /// Format implied by a file extension, if any.
    pub fn from_extension(ext: &str) -> Option<Self> {
        match ext.to_ascii_lowercase().as_str() {
            "md" | "markdown" => Some(DataFormat::Markdown),
            "json" => Some(DataFormat::Json),
            _ => None,
        }
    }

    /// Guess the format of a response body: JSON objects are JSON,
    /// everything else is read as Markdown.
    pub fn sniff(content: &str) -> Self {
        if content.trim_start().starts_with('{') {
            DataFormat::Json
        } else {
            DataFormat::Markdown
        }
    }
}

/// Parse `content` in the given format.
pub fn parse(content: &str, format: DataFormat, language: &str) -> Result<TrainingData> {
    let examples = match format {
        DataFormat::Markdown => parse_markdown(content)?,
        DataFormat::Json => parse_json(content)?,
    };
    Ok(TrainingData::new(language, examples))
}

// ─── Markdown ─────────────────────────────────────────────────────────────────

fn parse_markdown(content: &str) -> Result<Vec<TrainingExample>> {
    let prep = Preprocessor::new();
    let mut current_intent: Option<String> = None;
    let mut in_other_section = false;
    let mut examples = Vec::new();

    for (lineno, raw) in content.lines().enumerate() {
        let line = raw.trim();

        if let Some(header) = line.strip_prefix("##") {
            let header = header.trim();
            match header.split_once(':') {
                Some(("intent", name)) if !name.trim().is_empty() => {
                    current_intent   = Some(name.trim().to_string());
                    in_other_section = false;
                }
                Some(("synonym" | "regex" | "lookup", _)) => {
                    current_intent   = None;
                    in_other_section = true;
                }
                _ => bail!("line {}: unrecognised section header '{}'", lineno + 1, line),
            }
            continue;
        }

        let Some(item) = line.strip_prefix('-').or_else(|| line.strip_prefix('*')) else {
            continue;
        };
        if in_other_section {
            continue;
        }
        let intent = current_intent
            .clone()
            .ok_or_else(|| anyhow!("line {}: example outside of an intent section", lineno + 1))?;

        let (text, entities) = extract_entities(&prep.clean(item))
            .with_context(|| format!("line {}", lineno + 1))?;
        if text.is_empty() {
            continue;
        }
        examples.push(TrainingExample {
            text,
            intent: Some(intent),
            entities,
        });
    }

    Ok(examples)
}

/// Replace every `[value](entity)` with `value` and record its span.
/// Spans count characters, matching the offsets of JSON training data.
fn extract_entities(item: &str) -> Result<(String, Vec<EntityAnnotation>)> {
    let mut text     = String::with_capacity(item.len());
    let mut entities = Vec::new();
    let mut rest     = item;
    let mut chars    = 0;

    while let Some(open) = rest.find('[') {
        text.push_str(&rest[..open]);
        chars += rest[..open].chars().count();
        let after_open = &rest[open + 1..];

        let close = after_open
            .find("](")
            .ok_or_else(|| anyhow!("unterminated entity annotation in '{item}'"))?;
        let value = &after_open[..close];
        let after_value = &after_open[close + 2..];
        let end_paren = after_value
            .find(')')
            .ok_or_else(|| anyhow!("unterminated entity label in '{item}'"))?;
        let label = after_value[..end_paren].trim();

        // `(entity:synonym)` keeps only the entity name
        let entity = label.split(':').next().unwrap_or(label).to_string();
        if entity.is_empty() {
            bail!("empty entity label in '{item}'");
        }

        let start = chars;
        chars += value.chars().count();
        text.push_str(value);
        entities.push(EntityAnnotation {
            start,
            end: chars,
            value: value.to_string(),
            entity,
        });

        rest = &after_value[end_paren + 1..];
    }
    text.push_str(rest);

    Ok((text, entities))
}

// ─── JSON ─────────────────────────────────────────────────────────────────────

#[derive(Deserialize)]
struct JsonTrainingFile {
    rasa_nlu_data: JsonNluData,
}

#[derive(Deserialize)]
struct JsonNluData {
    #[serde(default)]
    common_examples: Vec<TrainingExample>,
}

fn parse_json(content: &str) -> Result<Vec<TrainingExample>> {
    let file: JsonTrainingFile =
        serde_json::from_str(content).context("malformed JSON training data")?;

    let prep = Preprocessor::new();
    Ok(file
        .rasa_nlu_data
        .common_examples
        .into_iter()
        .map(|mut ex| {
            // entity offsets refer to the original text, only trim here
            if ex.entities.is_empty() {
                ex.text = prep.clean(&ex.text);
            }
            ex
        })
        .filter(|ex| !ex.text.trim().is_empty())
        .collect())
}

#[cfg(test)]
mod tests {
    use super::*;

    const MD: &str = "\
## intent:greet
- hey
-   hello   there

## synonym:vegetarian
- veggie

## intent:restaurant_search
- show me [mexican](cuisine) places in [berlin](location:city)
";

    #[test]
    fn test_markdown_sections_and_entities() {
        let data = parse(MD, DataFormat::Markdown, "en").unwrap();
        assert_eq!(data.len(), 3);
        assert_eq!(data.examples[1].text, "hello there");

        let search = &data.examples[2];
        assert_eq!(search.intent.as_deref(), Some("restaurant_search"));
        assert_eq!(search.text, "show me mexican places in berlin");
        assert_eq!(search.entities.len(), 2);
        let city = &search.entities[1];
        assert_eq!(city.entity, "location");
        assert_eq!(&search.text[city.start..city.end], "berlin");
    }

    #[test]
    fn test_markdown_entity_offsets_count_characters() {
        let data = parse("## intent:inform\n- über [münchen](city) fahren", DataFormat::Markdown, "de").unwrap();
        let example = &data.examples[0];
        let city = &example.entities[0];

        assert_eq!((city.start, city.end), (5, 12));
        let span: String = example.text.chars().skip(city.start).take(city.end - city.start).collect();
        assert_eq!(span, "münchen");
    }

    #[test]
    fn test_markdown_example_without_intent_fails() {
        let err = parse("- orphan", DataFormat::Markdown, "en").unwrap_err();
        assert!(err.to_string().contains("outside of an intent"));
    }

    #[test]
    fn test_markdown_unknown_header_fails() {
        assert!(parse("## nonsense\n- a", DataFormat::Markdown, "en").is_err());
    }

    #[test]
    fn test_json_common_examples() {
        let json = r#"{"rasa_nlu_data": {"common_examples": [
            {"text": "hi", "intent": "greet"},
            {"text": "in berlin", "intent": "inform",
             "entities": [{"start": 3, "end": 9, "value": "berlin", "entity": "location"}]}
        ]}}"#;
        let data = parse(json, DataFormat::Json, "en").unwrap();
        assert_eq!(data.len(), 2);
        assert_eq!(data.examples[1].entities[0].value, "berlin");
    }

    #[test]
    fn test_json_malformed() {
        let err = parse("{\"nope\": 1}", DataFormat::Json, "en").unwrap_err();
        assert!(err.to_string().contains("malformed JSON"));
    }

    #[test]
    fn test_sniff_and_extension() {
        assert_eq!(DataFormat::sniff("  {\"a\":1}"), DataFormat::Json);
        assert_eq!(DataFormat::sniff("## intent:x"), DataFormat::Markdown);
        assert_eq!(DataFormat::from_extension("MD"), Some(DataFormat::Markdown));
        assert_eq!(DataFormat::from_extension("txt"), None);
    }
}
