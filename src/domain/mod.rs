// ============================================================
// Layer 3: Domain Layer
// ============================================================
// Plain Rust types and traits describing a training run.
//
// Rules for this layer:
//   - NO file I/O or network calls
//   - NO engine internals
//   - Only structs, enums, errors and traits
//
// Reference: Rust Book §5 (Structs), §10 (Traits)

/// Training configuration and the object-or-reference input
pub mod config;

/// Local path / remote endpoint descriptions
pub mod data_source;

/// Error taxonomy and the worker-boundary failure
pub mod error;

/// The in-memory training corpus
pub mod training_data;

/// Collaborator abstractions implemented by other layers
pub mod traits;
