// ============================================================
// Layer 6: YAML Configuration Loader
// ============================================================
// Default ConfigLoader: the reference is a path to a YAML file.
//
//   language: en
//   pipeline:
//     - name: whitespace_tokenizer
//     - name: keyword_intent_classifier
//   data: ./data/nlu.md        # optional
//
// Read errors, parse errors and validation errors each map to
// their own ConfigurationError variant.

use std::fs;

use crate::domain::config::TrainingConfig;
use crate::domain::error::ConfigurationError;
use crate::domain::traits::ConfigLoader;

#[derive(Debug, Clone, Copy, Default)]
pub struct YamlConfigLoader;

impl YamlConfigLoader {
    pub fn new() -> Self {
        Self
    }

    /// Parse and validate configuration text.
    pub fn parse(&self, reference: &str, content: &str) -> Result<TrainingConfig, ConfigurationError> {
        let cfg: TrainingConfig =
            serde_yaml::from_str(content).map_err(|source| ConfigurationError::Malformed {
                reference: reference.to_string(),
                source,
            })?;
        cfg.validate()?;
        Ok(cfg)
    }
}

impl ConfigLoader for YamlConfigLoader {
    fn load(&self, reference: &str) -> Result<TrainingConfig, ConfigurationError> {
        let content =
            fs::read_to_string(reference).map_err(|source| ConfigurationError::Unreadable {
                reference: reference.to_string(),
                source,
            })?;

        let cfg = self.parse(reference, &content)?;
        tracing::debug!(
            "Loaded configuration '{}' (language={}, pipeline={:?})",
            reference,
            cfg.language,
            cfg.component_names()
        );
        Ok(cfg)
    }
}
