// ============================================================
// Layer 2: Application / Use Cases
// ============================================================
// Workflow coordination for training runs.
//
// Rules for this layer:
//   - No training math or model code here
//   - No printing here (that's Layer 1)
//   - No direct file or network access (Layers 4 and 6)
//
// Reference: Clean Architecture pattern
//            Rust Book §7 (Module System)

/// Run lifecycle states
pub mod run_state;

/// The run coordinator: config → data → train → persist
pub mod train_use_case;

/// Worker-boundary entry point and failure translation
pub mod worker;
