// ============================================================
// Layer 5: Keyword Training Engine
// ============================================================
// Default TrainingEngine. Recognised pipeline components:
//
//   whitespace_tokenizer       splits utterances into tokens
//   keyword_intent_classifier  learns per-intent token counts;
//                              needs a tokenizer before it
//
// Recognised extra parameters (anything else is ignored):
//
//   lowercase         bool, default true
//   min_token_length  integer >= 1, default 1
//
// Persisted models go to <path>/<model_name>, where model_name is
// the fixed name if given, otherwise nlu_<YYYYMMDD-HHMMSS>.

use std::path::{Component, Path};

use anyhow::{bail, Context, Result};
use chrono::Utc;

use crate::domain::config::TrainingConfig;
use crate::domain::training_data::TrainingData;
use crate::domain::traits::{ExtraParameters, Persistor, Trainer, TrainingEngine};
use crate::infra::model_store::{ModelMetadata, ModelStore};
use crate::ml::model::{Interpreter, KeywordModel, TokenizerOptions};

pub const WHITESPACE_TOKENIZER: &str = "whitespace_tokenizer";
pub const KEYWORD_INTENT_CLASSIFIER: &str = "keyword_intent_classifier";

const MODEL_NAME_PREFIX: &str = "nlu_";

#[derive(Debug, Clone, Copy, Default)]
pub struct KeywordEngine;

impl KeywordEngine {
    pub fn new() -> Self {
        Self
    }
}

impl TrainingEngine for KeywordEngine {
    type Trainer = KeywordTrainer;

    fn create_trainer(&self, config: &TrainingConfig) -> Result<KeywordTrainer> {
        let mut has_tokenizer = false;
        for component in &config.pipeline {
            match component.name.as_str() {
                WHITESPACE_TOKENIZER => has_tokenizer = true,
                KEYWORD_INTENT_CLASSIFIER if !has_tokenizer => bail!(
                    "Component '{}' requires a tokenizer earlier in the pipeline",
                    KEYWORD_INTENT_CLASSIFIER
                ),
                KEYWORD_INTENT_CLASSIFIER => {}
                other => bail!("Unknown pipeline component '{}'", other),
            }
        }

        Ok(KeywordTrainer {
            config:     config.clone(),
            trained:    None,
            trained_at: None,
        })
    }
}

/// Working state of one run of the keyword engine.
#[derive(Debug)]
pub struct KeywordTrainer {
    config:     TrainingConfig,
    trained:    Option<Interpreter>,
    trained_at: Option<String>,
}

impl KeywordTrainer {
    pub fn config(&self) -> &TrainingConfig {
        &self.config
    }

    pub fn is_trained(&self) -> bool {
        self.trained.is_some()
    }

    fn has_classifier(&self) -> bool {
        self.config
            .pipeline
            .iter()
            .any(|c| c.name == KEYWORD_INTENT_CLASSIFIER)
    }
}

/// Read the tokenizer options out of the extra parameters.
fn tokenizer_options(params: &ExtraParameters) -> Result<TokenizerOptions> {
    let mut opts = TokenizerOptions::default();

    if let Some(value) = params.get("lowercase") {
        opts.lowercase = value
            .as_bool()
            .with_context(|| format!("Parameter 'lowercase' must be a boolean, got {value}"))?;
    }
    if let Some(value) = params.get("min_token_length") {
        opts.min_token_length = value
            .as_u64()
            .filter(|n| *n >= 1)
            .with_context(|| {
                format!("Parameter 'min_token_length' must be a positive integer, got {value}")
            })? as usize;
    }
    Ok(opts)
}

/// A fixed model name must be a single plain path segment, so the model
/// always lands directly under the output path.
fn checked_model_name(name: &str) -> Result<String> {
    let mut components = Path::new(name).components();
    match (components.next(), components.next()) {
        (Some(Component::Normal(_)), None) => Ok(name.to_string()),
        _ => bail!("Invalid model name '{}': expected a single directory name", name),
    }
}

impl Trainer for KeywordTrainer {
    type Interpreter = Interpreter;

    fn train(&mut self, data: TrainingData, params: &ExtraParameters) -> Result<Interpreter> {
        if data.is_empty() {
            bail!("Training data contains no examples");
        }

        let opts = tokenizer_options(params)?;
        let mut model = KeywordModel::new(opts);

        if self.has_classifier() {
            for example in &data.examples {
                if let Some(intent) = &example.intent {
                    model.observe(&example.text, intent);
                }
            }
            if model.example_count() == 0 {
                bail!("Training data contains no examples with an intent");
            }
        }

        tracing::info!(
            "Trained on {} examples ({} intents)",
            model.example_count(),
            model.intent_names().len()
        );

        let interpreter = Interpreter {
            language: self.config.language.clone(),
            pipeline: self.config.component_names().into_iter().map(String::from).collect(),
            model,
        };
        self.trained    = Some(interpreter.clone());
        self.trained_at = Some(Utc::now().format("%Y%m%d-%H%M%S").to_string());
        Ok(interpreter)
    }

    fn persist(
        &self,
        path: &Path,
        persistor: Option<&dyn Persistor>,
        fixed_model_name: Option<&str>,
    ) -> Result<String> {
        let (Some(interpreter), Some(trained_at)) = (&self.trained, &self.trained_at) else {
            bail!("Cannot persist a model before it has been trained");
        };

        let model_name = match fixed_model_name {
            Some(name) => checked_model_name(name)?,
            None => format!("{MODEL_NAME_PREFIX}{trained_at}"),
        };

        let store = ModelStore::new(path.join(&model_name));
        let metadata = ModelMetadata {
            language:   interpreter.language.clone(),
            pipeline:   interpreter.pipeline.clone(),
            trained_at: trained_at.clone(),
            version:    env!("CARGO_PKG_VERSION").to_string(),
        };
        store.save(&metadata, &interpreter.model)?;

        if let Some(persistor) = persistor {
            persistor.persist(store.dir(), &model_name)?;
        }

        Ok(store.dir().display().to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::training_data::TrainingExample;
    use std::sync::Mutex;
    use tempfile::TempDir;

    fn config() -> TrainingConfig {
        TrainingConfig::new("en", [WHITESPACE_TOKENIZER, KEYWORD_INTENT_CLASSIFIER])
    }

    fn data() -> TrainingData {
        TrainingData::new(
            "en",
            vec![
                TrainingExample::new("hello there", "greet"),
                TrainingExample::new("book a table", "restaurant_search"),
            ],
        )
    }

    #[test]
    fn test_unknown_component_is_rejected() {
        let cfg = TrainingConfig::new("en", ["magic_classifier"]);
        let err = KeywordEngine::new().create_trainer(&cfg).unwrap_err();
        assert!(err.to_string().contains("magic_classifier"));
    }

    #[test]
    fn test_classifier_needs_tokenizer_first() {
        let cfg = TrainingConfig::new("en", [KEYWORD_INTENT_CLASSIFIER, WHITESPACE_TOKENIZER]);
        assert!(KeywordEngine::new().create_trainer(&cfg).is_err());
    }

    #[test]
    fn test_train_produces_working_interpreter() {
        let mut trainer = KeywordEngine::new().create_trainer(&config()).unwrap();
        let interpreter = trainer.train(data(), &ExtraParameters::new()).unwrap();
        assert!(trainer.is_trained());
        assert_eq!(
            interpreter.parse("Hello!").intent.map(|i| i.name),
            Some("greet".to_string())
        );
    }

    #[test]
    fn test_empty_data_fails() {
        let mut trainer = KeywordEngine::new().create_trainer(&config()).unwrap();
        let err = trainer
            .train(TrainingData::new("en", vec![]), &ExtraParameters::new())
            .unwrap_err();
        assert_eq!(err.to_string(), "Training data contains no examples");
    }

    #[test]
    fn test_bad_parameter_type_fails() {
        let mut trainer = KeywordEngine::new().create_trainer(&config()).unwrap();
        let mut params = ExtraParameters::new();
        params.insert("lowercase".into(), serde_json::json!("yes"));
        assert!(trainer.train(data(), &params).is_err());
    }

    #[test]
    fn test_unrecognised_parameters_are_ignored() {
        let mut trainer = KeywordEngine::new().create_trainer(&config()).unwrap();
        let mut params = ExtraParameters::new();
        params.insert("num_threads".into(), serde_json::json!(4));
        assert!(trainer.train(data(), &params).is_ok());
    }

    #[test]
    fn test_persist_before_train_fails() {
        let dir = TempDir::new().unwrap();
        let trainer = KeywordEngine::new().create_trainer(&config()).unwrap();
        assert!(trainer.persist(dir.path(), None, None).is_err());
    }

    #[test]
    fn test_persist_with_fixed_name() {
        let dir = TempDir::new().unwrap();
        let mut trainer = KeywordEngine::new().create_trainer(&config()).unwrap();
        trainer.train(data(), &ExtraParameters::new()).unwrap();

        let persisted = trainer.persist(dir.path(), None, Some("current")).unwrap();
        assert_eq!(persisted, dir.path().join("current").display().to_string());

        let reloaded = ModelStore::new(&persisted).load_interpreter().unwrap();
        assert_eq!(reloaded.model.intent_names(), vec!["greet", "restaurant_search"]);
    }

    #[test]
    fn test_fixed_name_must_stay_inside_output_path() {
        let dir = TempDir::new().unwrap();
        let outside = TempDir::new().unwrap();
        let mut trainer = KeywordEngine::new().create_trainer(&config()).unwrap();
        trainer.train(data(), &ExtraParameters::new()).unwrap();

        let absolute = outside.path().join("escaped");
        for name in ["", "..", "a/b", absolute.to_str().unwrap()] {
            let err = trainer.persist(dir.path(), None, Some(name)).unwrap_err();
            assert!(err.to_string().contains("Invalid model name"), "{name}: {err}");
        }
        assert!(!absolute.exists());
        assert_eq!(std::fs::read_dir(dir.path()).unwrap().count(), 0);
    }

    #[test]
    fn test_trainer_keeps_its_config() {
        let trainer = KeywordEngine::new().create_trainer(&config()).unwrap();
        assert_eq!(trainer.config(), &config());
        assert!(!trainer.is_trained());
    }

    #[test]
    fn test_persist_generates_timestamped_name() {
        let dir = TempDir::new().unwrap();
        let mut trainer = KeywordEngine::new().create_trainer(&config()).unwrap();
        trainer.train(data(), &ExtraParameters::new()).unwrap();

        let persisted = trainer.persist(dir.path(), None, None).unwrap();
        let name = Path::new(&persisted).file_name().unwrap().to_string_lossy().to_string();
        assert!(name.starts_with(MODEL_NAME_PREFIX));
        assert_eq!(name.len(), MODEL_NAME_PREFIX.len() + "YYYYMMDD-HHMMSS".len());
    }

    #[test]
    fn test_persistor_receives_model_dir() {
        struct Recording(Mutex<Vec<(String, String)>>);
        impl Persistor for Recording {
            fn persist(&self, model_dir: &Path, model_name: &str) -> Result<String> {
                self.0
                    .lock()
                    .unwrap()
                    .push((model_dir.display().to_string(), model_name.to_string()));
                Ok(format!("mem://{model_name}"))
            }
        }

        let dir = TempDir::new().unwrap();
        let mut trainer = KeywordEngine::new().create_trainer(&config()).unwrap();
        trainer.train(data(), &ExtraParameters::new()).unwrap();

        let recording = Recording(Mutex::new(Vec::new()));
        let persisted = trainer.persist(dir.path(), Some(&recording), Some("m1")).unwrap();

        let calls = recording.0.lock().unwrap();
        assert_eq!(calls.len(), 1);
        assert_eq!(calls[0].0, persisted);
        assert_eq!(calls[0].1, "m1");
    }
}
