// ============================================================
// nlu-train
// ============================================================
// Coordinates one NLU training run: resolve a pipeline config,
// acquire labelled examples (local files or a remote endpoint),
// train, and optionally persist the model and hand it to a
// storage backend.
//
//   Layer 1  cli          argument parsing and output
//   Layer 2  application  the run coordinator and worker entry
//   Layer 3  domain       types, errors and collaborator traits
//   Layer 4  data         training data formats, loading, source choice
//   Layer 5  ml           the keyword engine and its model
//   Layer 6  infra        config files, model store, persistors, settings

pub mod application;
pub mod cli;
pub mod data;
pub mod domain;
pub mod infra;
pub mod ml;

pub use application::train_use_case::{RunResult, TrainRequest, TrainUseCase};
pub use application::worker::do_train_in_worker;
pub use domain::config::{ConfigInput, TrainingConfig};
pub use domain::data_source::{DataSources, EndpointConfig};
pub use domain::error::{TrainError, TrainResult, TrainingFailure};
