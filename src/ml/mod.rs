// ============================================================
// Layer 5: Training Engine
// ============================================================
// The default engine behind the TrainingEngine / Trainer traits.
//
//   model.rs    KeywordModel, Interpreter: the trained artifact
//               and how it scores an utterance
//
//   trainer.rs  KeywordEngine builds a KeywordTrainer per run;
//               the trainer validates the pipeline, trains, and
//               persists the model directory
//
// Callers with a real learning pipeline implement the traits
// themselves; the coordinator never depends on this module.

/// Trained artifact and scoring
pub mod model;

/// Trainer state, training and persistence
pub mod trainer;
