// ============================================================
// Layer 6: Model Store
// ============================================================
// Writes and reads one persisted model directory.
//
// Directory layout:
//   <output>/<model_name>/
//     metadata.json   ← language, pipeline, trained_at, version
//     model.json      ← serialised keyword model
//
// The metadata is written last so a directory with metadata.json
// always holds a complete model. Concurrent runs writing the same
// model name overwrite each other; the last writer wins.
//
// Reference: Rust Book §9 (Error Handling)

use std::{
    fs,
    path::{Path, PathBuf},
};

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

use crate::ml::model::{Interpreter, KeywordModel};

const METADATA_FILE: &str = "metadata.json";
const MODEL_FILE: &str = "model.json";

/// Describes a persisted model.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ModelMetadata {
    pub language:   String,
    pub pipeline:   Vec<String>,
    pub trained_at: String,
    pub version:    String,
}

/// Handle on one model directory.
pub struct ModelStore {
    dir: PathBuf,
}

impl ModelStore {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// Write model and metadata, creating the directory if needed.
    pub fn save(&self, metadata: &ModelMetadata, model: &KeywordModel) -> Result<()> {
        fs::create_dir_all(&self.dir)
            .with_context(|| format!("Cannot create model directory '{}'", self.dir.display()))?;

        let model_path = self.dir.join(MODEL_FILE);
        fs::write(&model_path, serde_json::to_string(model)?)
            .with_context(|| format!("Cannot write '{}'", model_path.display()))?;

        let meta_path = self.dir.join(METADATA_FILE);
        fs::write(&meta_path, serde_json::to_string_pretty(metadata)?)
            .with_context(|| format!("Cannot write '{}'", meta_path.display()))?;

        tracing::debug!("Saved model to '{}'", self.dir.display());
        Ok(())
    }

    pub fn load_metadata(&self) -> Result<ModelMetadata> {
        let path = self.dir.join(METADATA_FILE);
        let json = fs::read_to_string(&path).with_context(|| {
            format!("Cannot read '{}'. Is this a trained model directory?", path.display())
        })?;
        Ok(serde_json::from_str(&json)?)
    }

    /// Rebuild the interpreter saved in this directory.
    pub fn load_interpreter(&self) -> Result<Interpreter> {
        let metadata = self.load_metadata()?;
        let path = self.dir.join(MODEL_FILE);
        let json = fs::read_to_string(&path)
            .with_context(|| format!("Cannot read '{}'", path.display()))?;
        let model: KeywordModel = serde_json::from_str(&json)
            .with_context(|| format!("Corrupt model file '{}'", path.display()))?;

        Ok(Interpreter {
            language: metadata.language,
            pipeline: metadata.pipeline,
            model,
        })
    }
}
