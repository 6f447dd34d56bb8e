// ============================================================
// Layer 3: Training Configuration
// ============================================================
// The validated description of one training run:
//   - language:  tag passed to the data loader (e.g. "en")
//   - pipeline:  ordered list of components the engine builds
//   - data:      optional default training-data path
//
// A configuration arrives either already built (tests, embedding
// callers) or as a reference to a YAML file. ConfigInput captures
// both so the coordinator resolves it exactly once.
//
// Reference: Rust Book §6 (Enums), §10 (Derive Macros)

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::domain::error::ConfigurationError;

/// Language used when a configuration file does not name one.
pub const DEFAULT_LANGUAGE: &str = "en";

fn default_language() -> String {
    DEFAULT_LANGUAGE.to_string()
}

/// One entry of the pipeline list.
///
/// Only `name` is interpreted here; every other key is kept in
/// `settings` and handed to the engine untouched.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PipelineComponent {
    pub name: String,

    #[serde(flatten)]
    pub settings: BTreeMap<String, serde_json::Value>,
}

impl PipelineComponent {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name:     name.into(),
            settings: BTreeMap::new(),
        }
    }
}

/// Validated training configuration. Immutable for the duration of a run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TrainingConfig {
    #[serde(default = "default_language")]
    pub language: String,

    #[serde(default)]
    pub pipeline: Vec<PipelineComponent>,

    /// Default training data path, used when the caller gives none
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub data: Option<String>,
}

impl TrainingConfig {
    /// Build a configuration from a language and component names.
    pub fn new<I, S>(language: impl Into<String>, components: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            language: language.into(),
            pipeline: components.into_iter().map(PipelineComponent::new).collect(),
            data:     None,
        }
    }

    /// Names of the pipeline components, in order.
    pub fn component_names(&self) -> Vec<&str> {
        self.pipeline.iter().map(|c| c.name.as_str()).collect()
    }

    /// Check the invariants every loaded configuration must satisfy.
    pub fn validate(&self) -> Result<(), ConfigurationError> {
        if self.language.trim().is_empty() {
            return Err(ConfigurationError::Invalid(
                "language must not be empty".to_string(),
            ));
        }
        if self.pipeline.is_empty() {
            return Err(ConfigurationError::Invalid(
                "pipeline must contain at least one component".to_string(),
            ));
        }
        if let Some(idx) = self.pipeline.iter().position(|c| c.name.trim().is_empty()) {
            return Err(ConfigurationError::Invalid(format!(
                "pipeline component #{idx} has no name"
            )));
        }
        Ok(())
    }
}

/// Either a ready configuration or a reference to load one from.
#[derive(Debug, Clone, PartialEq)]
pub enum ConfigInput {
    Resolved(TrainingConfig),
    Reference(String),
}

impl From<TrainingConfig> for ConfigInput {
    fn from(cfg: TrainingConfig) -> Self {
        ConfigInput::Resolved(cfg)
    }
}

impl From<&str> for ConfigInput {
    fn from(reference: &str) -> Self {
        ConfigInput::Reference(reference.to_string())
    }
}

impl From<String> for ConfigInput {
    fn from(reference: String) -> Self {
        ConfigInput::Reference(reference)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validate_accepts_minimal_config() {
        let cfg = TrainingConfig::new("en", ["keyword_intent_classifier"]);
        assert!(cfg.validate().is_ok());
    }

    #[test]
    fn test_validate_rejects_empty_pipeline() {
        let cfg = TrainingConfig::new("en", Vec::<String>::new());
        let err = cfg.validate().unwrap_err();
        assert!(err.to_string().contains("pipeline"));
    }

    #[test]
    fn test_validate_rejects_blank_language() {
        let cfg = TrainingConfig::new("  ", ["whitespace_tokenizer"]);
        assert!(cfg.validate().is_err());
    }

    #[test]
    fn test_component_settings_are_kept() {
        let yaml = "language: de\npipeline:\n  - name: keyword_intent_classifier\n    threshold: 0.3\n";
        let cfg: TrainingConfig = serde_yaml::from_str(yaml).unwrap();
        assert_eq!(cfg.language, "de");
        assert_eq!(cfg.component_names(), vec!["keyword_intent_classifier"]);
        assert_eq!(
            cfg.pipeline[0].settings.get("threshold"),
            Some(&serde_json::json!(0.3))
        );
    }

    #[test]
    fn test_language_defaults_to_english() {
        let cfg: TrainingConfig = serde_yaml::from_str("pipeline:\n  - name: a\n").unwrap();
        assert_eq!(cfg.language, DEFAULT_LANGUAGE);
    }
}
