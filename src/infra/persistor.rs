// ============================================================
// Layer 6: Persistor Factory
// ============================================================
// Turns an optional storage backend identifier into a persistor:
//
//   None                → no persistor; the model stays local
//   Some("filesystem")  → FilesystemPersistor (zip into storage dir)
//   Some(other)         → whatever was registered under that name
//   Some(unknown)       → PersistorResolutionError::Unknown
//
// Every call builds a new handle; nothing is cached between runs.
//
// Reference: Rust Book §17 (Trait Objects)
//            zip crate documentation

use std::{
    collections::HashMap,
    fs::{self, File},
    io::{self, Write},
    path::{Path, PathBuf},
};

use anyhow::{Context, Result};
use zip::{write::SimpleFileOptions, CompressionMethod, ZipWriter};

use crate::domain::error::PersistorResolutionError;
use crate::domain::traits::Persistor;
use crate::infra::settings::Settings;

/// Identifier of the built-in filesystem backend.
pub const FILESYSTEM_BACKEND: &str = "filesystem";

type Constructor = Box<dyn Fn() -> Result<Box<dyn Persistor>> + Send + Sync>;

/// Registry of storage backends, keyed by identifier.
pub struct PersistorFactory {
    constructors: HashMap<String, Constructor>,
}

impl PersistorFactory {
    /// A factory with no backends registered.
    pub fn empty() -> Self {
        Self {
            constructors: HashMap::new(),
        }
    }

    /// A factory with the built-in backends configured from `settings`.
    pub fn with_defaults(settings: &Settings) -> Self {
        let storage_dir = settings.storage_dir.clone();
        let mut factory = Self::empty();
        factory.register(FILESYSTEM_BACKEND, move || {
            let persistor = FilesystemPersistor::new(storage_dir.clone())?;
            Ok(Box::new(persistor) as Box<dyn Persistor>)
        });
        factory
    }

    /// Add or replace a backend constructor.
    pub fn register<F>(&mut self, name: impl Into<String>, constructor: F)
    where
        F: Fn() -> Result<Box<dyn Persistor>> + Send + Sync + 'static,
    {
        self.constructors.insert(name.into(), Box::new(constructor));
    }

    /// Registered identifiers, sorted.
    pub fn backends(&self) -> Vec<&str> {
        let mut names: Vec<&str> = self.constructors.keys().map(String::as_str).collect();
        names.sort_unstable();
        names
    }

    /// Resolve an optional identifier into an optional persistor.
    pub fn create(
        &self,
        storage: Option<&str>,
    ) -> Result<Option<Box<dyn Persistor>>, PersistorResolutionError> {
        let Some(name) = storage else {
            return Ok(None);
        };

        let constructor = self
            .constructors
            .get(name)
            .ok_or_else(|| PersistorResolutionError::Unknown(name.to_string()))?;

        let persistor = constructor().map_err(|source| PersistorResolutionError::Construction {
            backend: name.to_string(),
            source,
        })?;

        tracing::debug!("Using storage backend '{}'", name);
        Ok(Some(persistor))
    }
}

// ─── FilesystemPersistor ──────────────────────────────────────────────────────
/// Stores each model directory as `<storage_dir>/<model_name>.zip`.
pub struct FilesystemPersistor {
    storage_dir: PathBuf,
}

impl FilesystemPersistor {
    /// Fails when the storage directory cannot be created.
    pub fn new(storage_dir: impl Into<PathBuf>) -> Result<Self> {
        let storage_dir = storage_dir.into();
        fs::create_dir_all(&storage_dir).with_context(|| {
            format!("Cannot create storage directory '{}'", storage_dir.display())
        })?;
        Ok(Self { storage_dir })
    }

    pub fn storage_dir(&self) -> &Path {
        &self.storage_dir
    }
}

impl Persistor for FilesystemPersistor {
    fn persist(&self, model_dir: &Path, model_name: &str) -> Result<String> {
        let target = self.storage_dir.join(format!("{model_name}.zip"));
        let file = File::create(&target)
            .with_context(|| format!("Cannot create archive '{}'", target.display()))?;

        let mut zip = ZipWriter::new(file);
        let options = SimpleFileOptions::default().compression_method(CompressionMethod::Deflated);
        add_dir(&mut zip, model_dir, model_dir, options)
            .with_context(|| format!("Cannot archive '{}'", model_dir.display()))?;
        zip.finish().context("Cannot finish model archive")?;

        tracing::info!("Stored model '{}' at '{}'", model_name, target.display());
        Ok(target.display().to_string())
    }
}

/// Recursively add the files below `dir`, named relative to `root`.
fn add_dir<W: Write + io::Seek>(
    zip:     &mut ZipWriter<W>,
    root:    &Path,
    dir:     &Path,
    options: SimpleFileOptions,
) -> Result<()> {
    let mut entries: Vec<PathBuf> = fs::read_dir(dir)?
        .map(|entry| entry.map(|e| e.path()))
        .collect::<io::Result<_>>()?;
    entries.sort();

    for path in entries {
        let name = path
            .strip_prefix(root)?
            .components()
            .map(|c| c.as_os_str().to_string_lossy())
            .collect::<Vec<_>>()
            .join("/");

        if path.is_dir() {
            zip.add_directory(name, options)?;
            add_dir(zip, root, &path, options)?;
        } else {
            zip.start_file(name, options)?;
            let mut src = File::open(&path)?;
            io::copy(&mut src, zip)?;
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use anyhow::anyhow;
    use tempfile::TempDir;

    fn settings_in(dir: &Path) -> Settings {
        Settings {
            storage_dir: dir.join("storage"),
            ..Settings::default()
        }
    }

    #[test]
    fn test_no_storage_means_no_persistor() {
        let factory = PersistorFactory::empty();
        assert!(factory.create(None).unwrap().is_none());
    }

    #[test]
    fn test_unknown_backend() {
        let dir = TempDir::new().unwrap();
        let factory = PersistorFactory::with_defaults(&settings_in(dir.path()));
        let err = factory.create(Some("unknown-backend")).err().unwrap();
        assert!(matches!(err, PersistorResolutionError::Unknown(ref n) if n == "unknown-backend"));
    }

    #[test]
    fn test_constructor_failure() {
        let mut factory = PersistorFactory::empty();
        factory.register("broken", || Err(anyhow!("missing credentials")));
        let err = factory.create(Some("broken")).err().unwrap();
        assert!(err.to_string().contains("missing credentials"));
    }

    #[test]
    fn test_each_call_constructs_a_new_handle() {
        use std::sync::atomic::{AtomicUsize, Ordering};
        use std::sync::Arc;

        let built = Arc::new(AtomicUsize::new(0));
        let counter = built.clone();
        let dir = TempDir::new().unwrap();
        let storage = dir.path().to_path_buf();

        let mut factory = PersistorFactory::empty();
        factory.register("counted", move || {
            counter.fetch_add(1, Ordering::SeqCst);
            Ok(Box::new(FilesystemPersistor::new(storage.clone())?) as Box<dyn Persistor>)
        });

        factory.create(Some("counted")).unwrap();
        factory.create(Some("counted")).unwrap();
        assert_eq!(built.load(Ordering::SeqCst), 2);
        assert_eq!(factory.backends(), vec!["counted"]);
    }

    #[test]
    fn test_default_factory_builds_filesystem_backend() {
        let dir = TempDir::new().unwrap();
        let factory = PersistorFactory::with_defaults(&settings_in(dir.path()));
        assert_eq!(factory.backends(), vec![FILESYSTEM_BACKEND]);
        assert!(factory.create(Some(FILESYSTEM_BACKEND)).unwrap().is_some());
        assert!(dir.path().join("storage").is_dir());
    }

    #[test]
    fn test_filesystem_persistor_archives_directory() {
        let dir = TempDir::new().unwrap();
        let model_dir = dir.path().join("nlu_model");
        fs::create_dir_all(model_dir.join("components")).unwrap();
        fs::write(model_dir.join("metadata.json"), "{}").unwrap();
        fs::write(model_dir.join("components").join("model.json"), "{}").unwrap();

        let persistor = FilesystemPersistor::new(dir.path().join("storage")).unwrap();
        assert!(persistor.storage_dir().is_dir());
        let stored = persistor.persist(&model_dir, "nlu_model").unwrap();

        assert!(stored.ends_with("nlu_model.zip"));
        let mut archive = zip::ZipArchive::new(File::open(&stored).unwrap()).unwrap();
        assert!(archive.by_name("metadata.json").is_ok());
        assert!(archive.by_name("components/model.json").is_ok());
    }
}
