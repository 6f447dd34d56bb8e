// ============================================================
// Layer 4: Training Data Selector
// ============================================================
// Picks the one active data source and loads it.
//
// Precedence: a remote endpoint, when supplied, is used even if a
// local path was also given. The local path is then ignored.
// Supplying neither is a DataAcquisitionError.

use crate::domain::data_source::{DataSources, TrainingDataSource};
use crate::domain::error::DataAcquisitionError;
use crate::domain::training_data::TrainingData;
use crate::domain::traits::DataLoader;

/// Choose the active source from what the caller supplied.
pub fn select_source(sources: &DataSources) -> Result<TrainingDataSource, DataAcquisitionError> {
    match (&sources.endpoint, &sources.local) {
        (Some(endpoint), local) => {
            if let Some(path) = local {
                tracing::debug!(
                    "Endpoint '{}' takes precedence; ignoring local data '{}'",
                    endpoint.url,
                    path.display()
                );
            }
            Ok(TrainingDataSource::RemoteEndpoint(endpoint.clone()))
        }
        (None, Some(path)) => Ok(TrainingDataSource::Local(path.clone())),
        (None, None) => Err(DataAcquisitionError::NoSource),
    }
}

/// Load the training corpus for `language` from the active source.
pub fn acquire(
    loader:   &dyn DataLoader,
    sources:  &DataSources,
    language: &str,
) -> Result<TrainingData, DataAcquisitionError> {
    let source = select_source(sources)?;

    let loaded = match &source {
        TrainingDataSource::RemoteEndpoint(endpoint) => loader.load_endpoint(endpoint, language),
        TrainingDataSource::Local(path) => loader.load_local(path, language),
    };

    loaded.map_err(|source_err| DataAcquisitionError::Load {
        source_id: source.to_string(),
        source:    source_err,
    })
}
