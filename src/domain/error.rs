// ============================================================
// Layer 3: Error Taxonomy
// ============================================================
// Errors raised inside a run keep their type and message:
//
//   ConfigurationError        config reference unresolvable/invalid
//   PersistorResolutionError  unknown or unconstructible backend
//   DataAcquisitionError      training data missing/unreachable/malformed
//   TrainError::Engine        anything the training engine raises
//
// TrainingFailure is the one flattened shape used when a run is
// reported across a worker boundary. Only the worker entry builds it.

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// The configuration reference could not be turned into a valid config.
#[derive(Debug, Error)]
pub enum ConfigurationError {
    #[error("Cannot read configuration '{reference}': {source}")]
    Unreadable {
        reference: String,
        #[source]
        source:    std::io::Error,
    },

    #[error("Cannot parse configuration '{reference}': {source}")]
    Malformed {
        reference: String,
        #[source]
        source:    serde_yaml::Error,
    },

    #[error("Invalid configuration: {0}")]
    Invalid(String),
}

/// The storage backend identifier could not be turned into a persistor.
#[derive(Debug, Error)]
pub enum PersistorResolutionError {
    #[error("Unknown storage backend '{0}'")]
    Unknown(String),

    #[error("Cannot construct storage backend '{backend}': {source}")]
    Construction {
        backend: String,
        #[source]
        source:  anyhow::Error,
    },
}

/// Training data could not be acquired from the selected source.
#[derive(Debug, Error)]
pub enum DataAcquisitionError {
    #[error("No training data source was supplied")]
    NoSource,

    #[error("Failed to load training data from '{source_id}': {source:#}")]
    Load {
        source_id: String,
        #[source]
        source:    anyhow::Error,
    },
}

/// Every way a run can fail, with the original error kept intact.
#[derive(Debug, Error)]
pub enum TrainError {
    #[error(transparent)]
    Configuration(#[from] ConfigurationError),

    #[error(transparent)]
    PersistorResolution(#[from] PersistorResolutionError),

    #[error(transparent)]
    DataAcquisition(#[from] DataAcquisitionError),

    /// Raised by the training engine while building, training or persisting.
    #[error(transparent)]
    Engine(anyhow::Error),
}

/// A run failure flattened for transport across a worker boundary.
#[derive(Debug, Clone, PartialEq, Eq, Error, Serialize, Deserialize)]
#[error("{message}")]
pub struct TrainingFailure {
    /// Output path the failed run was asked to persist to
    pub failed_target_path: Option<String>,

    /// Description taken from the original failure; never empty
    pub message: String,
}

/// Result alias used by the run coordinator.
pub type TrainResult<T> = std::result::Result<T, TrainError>;
