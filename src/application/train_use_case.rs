// ============================================================
// Layer 2: TrainUseCase (run coordinator)
// ============================================================
// Orchestrates one training run, each step depending on the last:
//
//   Step 1: Resolve configuration       (ConfigLoader if a reference)
//   Step 2: Create trainer state        (TrainingEngine)
//   Step 3: Create persistor, if any    (PersistorFactory)
//   Step 4: Acquire training data       (DataLoader via selector)
//   Step 5: Train                       (Trainer::train)
//   Step 6: Persist, only with a path   (Trainer::persist)
//
// Errors are returned exactly as the failing step raised them.
// Translating them for a worker boundary is worker.rs's job.
//
// Concurrent runs targeting the same output path and model name
// race on the persisted directory; the last writer wins.
//
// Reference: Rust Book §9 (Recoverable Errors with Result)

use std::path::{Path, PathBuf};

use crate::application::run_state::{RunState, RunTracker};
use crate::data::{loader::FileDataLoader, selector};
use crate::domain::config::{ConfigInput, TrainingConfig};
use crate::domain::data_source::{DataSources, EndpointConfig};
use crate::domain::error::{ConfigurationError, TrainError, TrainResult};
use crate::domain::traits::{ConfigLoader, DataLoader, ExtraParameters, Trainer, TrainingEngine};
use crate::infra::{config_loader::YamlConfigLoader, persistor::PersistorFactory, settings::Settings};
use crate::ml::trainer::KeywordEngine;

// ─── Run inputs / outputs ─────────────────────────────────────────────────────

/// Everything one run needs.
#[derive(Debug, Clone)]
pub struct TrainRequest {
    pub config:           ConfigInput,
    pub data:             DataSources,
    /// Where to persist the model; `None` trains without persisting
    pub output_path:      Option<PathBuf>,
    pub fixed_model_name: Option<String>,
    /// Storage backend identifier for the persistor factory
    pub storage:          Option<String>,
    pub extra:            ExtraParameters,
}

impl TrainRequest {
    pub fn new(config: impl Into<ConfigInput>, data: DataSources) -> Self {
        Self {
            config:           config.into(),
            data,
            output_path:      None,
            fixed_model_name: None,
            storage:          None,
            extra:            ExtraParameters::new(),
        }
    }

    pub fn with_output_path(mut self, path: impl Into<PathBuf>) -> Self {
        self.output_path = Some(path.into());
        self
    }

    /// The output path, if one was actually given; an empty path counts as none.
    pub fn target_path(&self) -> Option<&Path> {
        self.output_path
            .as_deref()
            .filter(|p| !p.as_os_str().is_empty())
    }

    pub fn with_fixed_model_name(mut self, name: impl Into<String>) -> Self {
        self.fixed_model_name = Some(name.into());
        self
    }

    pub fn with_storage(mut self, storage: impl Into<String>) -> Self {
        self.storage = Some(storage.into());
        self
    }

    pub fn with_endpoint(mut self, endpoint: EndpointConfig) -> Self {
        self.data.endpoint = Some(endpoint);
        self
    }

    pub fn with_param(mut self, key: impl Into<String>, value: serde_json::Value) -> Self {
        self.extra.insert(key.into(), value);
        self
    }
}

/// Output of a completed run.
pub struct RunResult<T: Trainer> {
    pub trainer:        T,
    pub interpreter:    T::Interpreter,
    /// `None` exactly when no output path was requested
    pub persisted_path: Option<String>,
}

// ─── TrainUseCase ─────────────────────────────────────────────────────────────

/// Owns the collaborators and runs training requests against them.
pub struct TrainUseCase<E: TrainingEngine> {
    config_loader: Box<dyn ConfigLoader>,
    data_loader:   Box<dyn DataLoader>,
    persistors:    PersistorFactory,
    engine:        E,
}

impl TrainUseCase<KeywordEngine> {
    /// The built-in collaborators configured from `settings`.
    pub fn with_defaults(settings: &Settings) -> Self {
        Self::new(
            Box::new(YamlConfigLoader::new()),
            Box::new(FileDataLoader::new(settings.endpoint_timeout)),
            PersistorFactory::with_defaults(settings),
            KeywordEngine::new(),
        )
    }
}

impl<E: TrainingEngine> TrainUseCase<E> {
    pub fn new(
        config_loader: Box<dyn ConfigLoader>,
        data_loader:   Box<dyn DataLoader>,
        persistors:    PersistorFactory,
        engine:        E,
    ) -> Self {
        Self {
            config_loader,
            data_loader,
            persistors,
            engine,
        }
    }

    /// Return a resolved config unchanged, or load a referenced one.
    pub fn resolve_config(&self, input: ConfigInput) -> Result<TrainingConfig, ConfigurationError> {
        match input {
            ConfigInput::Resolved(cfg) => Ok(cfg),
            ConfigInput::Reference(reference) => self.config_loader.load(&reference),
        }
    }

    /// Run the full training sequence.
    pub fn execute(&self, request: TrainRequest) -> TrainResult<RunResult<E::Trainer>> {
        let mut tracker = RunTracker::new();
        let result = self.run(request, &mut tracker);
        if let Err(err) = &result {
            tracker.fail(err.to_string());
        }
        result
    }

    fn run(
        &self,
        request: TrainRequest,
        tracker: &mut RunTracker,
    ) -> TrainResult<RunResult<E::Trainer>> {
        let TrainRequest {
            config,
            data,
            output_path,
            fixed_model_name,
            storage,
            extra,
        } = request;

        // ── Step 1: Configuration ────────────────────────────────────────────
        let cfg = self.resolve_config(config)?;
        tracker.advance(RunState::ConfigResolved);

        // ── Step 2: Trainer state, one per run ───────────────────────────────
        let mut trainer = self
            .engine
            .create_trainer(&cfg)
            .map_err(TrainError::Engine)?;

        // ── Step 3: Persistor (None without a storage backend) ───────────────
        let persistor = self.persistors.create(storage.as_deref())?;

        // ── Step 4: Training data ────────────────────────────────────────────
        let sources = data.or_local(cfg.data.as_deref());
        let training_data = selector::acquire(self.data_loader.as_ref(), &sources, &cfg.language)?;
        tracker.advance(RunState::DataAcquired);
        tracing::info!(
            "Training on {} examples from '{}' (language={})",
            training_data.len(),
            sources,
            cfg.language
        );

        // ── Step 5: Train ────────────────────────────────────────────────────
        let interpreter = trainer
            .train(training_data, &extra)
            .map_err(TrainError::Engine)?;
        tracker.advance(RunState::Trained);

        // ── Step 6: Persist, only when an output path was given ──────────────
        let persisted_path = match output_path.filter(|p| !p.as_os_str().is_empty()) {
            Some(path) => {
                let persisted = trainer
                    .persist(&path, persistor.as_deref(), fixed_model_name.as_deref())
                    .map_err(TrainError::Engine)?;
                tracker.advance(RunState::Persisted);
                tracing::info!("Model persisted to '{}'", persisted);
                Some(persisted)
            }
            None => None,
        };
        tracker.advance(RunState::Done);

        Ok(RunResult {
            trainer,
            interpreter,
            persisted_path,
        })
    }
}
