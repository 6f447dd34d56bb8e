// ============================================================
// Layer 2: Run State
// ============================================================
// Lifecycle of one training run:
//
//   Idle → ConfigResolved → DataAcquired → Trained ─┬─→ Done
//                                                   └─→ Persisted → Done
//
//   Failed(reason) is reachable from every non-terminal state.
//
// No state is revisited and a run is never resumed; a failed run
// starts over from Idle with fresh inputs.

use std::fmt;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RunState {
    Idle,
    ConfigResolved,
    DataAcquired,
    Trained,
    Persisted,
    Done,
    Failed(String),
}

impl RunState {
    pub fn is_terminal(&self) -> bool {
        matches!(self, RunState::Done | RunState::Failed(_))
    }

    /// Whether `next` is a legal successor of this state.
    pub fn can_advance_to(&self, next: &RunState) -> bool {
        use RunState::*;
        match (self, next) {
            (s, _) if s.is_terminal() => false,
            (_, Failed(_)) => true,
            (Idle, ConfigResolved)
            | (ConfigResolved, DataAcquired)
            | (DataAcquired, Trained)
            | (Trained, Persisted)
            | (Trained, Done)
            | (Persisted, Done) => true,
            _ => false,
        }
    }
}

impl fmt::Display for RunState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RunState::Idle => write!(f, "idle"),
            RunState::ConfigResolved => write!(f, "config_resolved"),
            RunState::DataAcquired => write!(f, "data_acquired"),
            RunState::Trained => write!(f, "trained"),
            RunState::Persisted => write!(f, "persisted"),
            RunState::Done => write!(f, "done"),
            RunState::Failed(_) => write!(f, "failed"),
        }
    }
}

/// Tracks and logs the state of a single run.
#[derive(Debug)]
pub struct RunTracker {
    state: RunState,
}

impl RunTracker {
    pub fn new() -> Self {
        Self {
            state: RunState::Idle,
        }
    }

    pub fn state(&self) -> &RunState {
        &self.state
    }

    pub fn advance(&mut self, next: RunState) {
        debug_assert!(
            self.state.can_advance_to(&next),
            "illegal run transition {} -> {}",
            self.state,
            next
        );
        tracing::debug!("Run state: {} -> {}", self.state, next);
        self.state = next;
    }

    pub fn fail(&mut self, reason: impl Into<String>) {
        if !self.state.is_terminal() {
            let reason = reason.into();
            tracing::debug!("Run state: {} -> failed ({})", self.state, reason);
            self.state = RunState::Failed(reason);
        }
    }
}

impl Default for RunTracker {
    fn default() -> Self {
        Self::new()
    }
}
