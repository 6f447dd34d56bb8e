// ============================================================
// Layer 4: Data Pipeline
// ============================================================
// Everything between "the caller named some training data" and
// "the trainer holds a TrainingData":
//
//   DataSources (local path and/or endpoint)
//       │
//       ▼
//   selector       → picks the active source (endpoint wins)
//       │
//       ▼
//   FileDataLoader → reads files / fetches the endpoint
//       │
//       ▼
//   formats        → parses Markdown or JSON
//       │
//       ▼
//   Preprocessor   → normalises each utterance
//       │
//       ▼
//   TrainingData
//
// Reference: Rust Book §13 (Iterators and Closures)

/// Markdown / JSON training data parsers
pub mod formats;

/// Default DataLoader for files, directories and HTTP endpoints
pub mod loader;

/// Cleans individual utterances
pub mod preprocessor;

/// Chooses between local and remote data sources
pub mod selector;
