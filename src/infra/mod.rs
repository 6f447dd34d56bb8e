// ============================================================
// Layer 6: Infrastructure Layer
// ============================================================
// Concrete collaborators and process-level concerns:
//
//   config_loader.rs  YamlConfigLoader: reads and validates the
//                     training configuration file
//
//   persistor.rs      PersistorFactory: storage backend registry;
//                     FilesystemPersistor zips a model directory
//                     into the storage directory
//
//   model_store.rs    Writes/reads a persisted model directory
//                     (metadata.json + model.json)
//
//   settings.rs       Environment-driven process settings
//
// Reference: Rust Book §7 (Modules)
//            Rust Book §9 (Error Handling with anyhow)

/// YAML configuration loading
pub mod config_loader;

/// Persisted model directory layout
pub mod model_store;

/// Storage backend factory and the filesystem backend
pub mod persistor;

/// Process settings from the environment
pub mod settings;
