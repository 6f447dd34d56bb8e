// ============================================================
// Layer 3: Collaborator Traits
// ============================================================
// The coordinator only talks to its collaborators through these
// traits, so any of them can be swapped out:
//
//   ConfigLoader     YamlConfigLoader (infra)      or a test fake
//   DataLoader       FileDataLoader (data)         or a test fake
//   TrainingEngine   KeywordEngine (ml)            or a test fake
//   Persistor        FilesystemPersistor (infra)   or a registered backend
//
// Reference: Rust Book §10 (Traits), §17 (Trait Objects)

use std::collections::BTreeMap;
use std::path::Path;

use anyhow::Result;

use crate::domain::config::TrainingConfig;
use crate::domain::data_source::EndpointConfig;
use crate::domain::error::ConfigurationError;
use crate::domain::training_data::TrainingData;

/// Pipeline-specific options passed through to the engine verbatim.
pub type ExtraParameters = BTreeMap<String, serde_json::Value>;

// ─── ConfigLoader ─────────────────────────────────────────────────────────────
/// Loads and validates a configuration from a reference.
pub trait ConfigLoader: Send + Sync {
    fn load(&self, reference: &str) -> std::result::Result<TrainingConfig, ConfigurationError>;
}

// ─── DataLoader ───────────────────────────────────────────────────────────────
/// Turns a data source and language tag into a training corpus.
///
/// Errors are returned as-is; the selector wraps them into a
/// DataAcquisitionError. Implementations must not retry on their own
/// unless that is their documented policy.
pub trait DataLoader: Send + Sync {
    fn load_local(&self, path: &Path, language: &str) -> Result<TrainingData>;

    fn load_endpoint(&self, endpoint: &EndpointConfig, language: &str) -> Result<TrainingData>;
}

// ─── Persistor ────────────────────────────────────────────────────────────────
/// Uploads a locally persisted model directory to a storage backend.
pub trait Persistor: Send + Sync {
    /// Store `model_dir` under `model_name`; returns the stored location.
    fn persist(&self, model_dir: &Path, model_name: &str) -> Result<String>;
}

// ─── TrainingEngine / Trainer ─────────────────────────────────────────────────
/// Builds fresh trainer state for a run.
pub trait TrainingEngine: Send + Sync {
    type Trainer: Trainer;

    fn create_trainer(&self, config: &TrainingConfig) -> Result<Self::Trainer>;
}

/// Working state of one training run. Never reused across runs.
pub trait Trainer {
    /// The trained artifact, usable for inference.
    type Interpreter;

    fn train(&mut self, data: TrainingData, params: &ExtraParameters) -> Result<Self::Interpreter>;

    /// Write the trained model under `path`, hand it to `persistor` if
    /// given, and return the local model directory.
    fn persist(
        &self,
        path: &Path,
        persistor: Option<&dyn Persistor>,
        fixed_model_name: Option<&str>,
    ) -> Result<String>;
}
