// ============================================================
// Layer 2: Worker Entry
// ============================================================
// The entry point for runs executed in an isolated worker
// (a spawned thread, or a child process reporting back as JSON).
//
//   TrainUseCase::execute ──Ok──▶ persisted path
//            │
//            ├──Err(TrainError)──┐
//            └──panic────────────┴─▶ log once ─▶ TrainingFailure
//
// Only the persisted path survives the boundary: the trainer and
// interpreter are dropped. Every failure, panics included, becomes
// exactly one TrainingFailure carrying the requested output path
// and the original failure's message. Nothing is retried.
//
// The config is resolved here first so the failure log names the
// data source actually used, including the config's `data` fallback.
// The process panic hook still sees panics; the CLI installs one
// that keeps worker panics out of the error log (cli::install_panic_hook).

use std::any::Any;
use std::error::Error as StdError;
use std::panic::{self, AssertUnwindSafe};

use crate::application::train_use_case::{TrainRequest, TrainUseCase};
use crate::domain::config::ConfigInput;
use crate::domain::error::{TrainResult, TrainingFailure};
use crate::domain::traits::TrainingEngine;

/// Run `request` and translate any failure into a `TrainingFailure`.
pub fn do_train_in_worker<E: TrainingEngine>(
    use_case: &TrainUseCase<E>,
    request:  TrainRequest,
) -> Result<Option<String>, TrainingFailure> {
    let failed_target_path = request.target_path().map(|p| p.display().to_string());
    let mut data_id = request.data.to_string();

    let outcome = panic::catch_unwind(AssertUnwindSafe(|| -> TrainResult<_> {
        let mut request = request;
        let cfg = use_case.resolve_config(request.config)?;
        request.data = request.data.or_local(cfg.data.as_deref());
        data_id = request.data.to_string();
        request.config = ConfigInput::Resolved(cfg);
        use_case.execute(request)
    }));

    let message = match outcome {
        Ok(Ok(result)) => return Ok(result.persisted_path),
        Ok(Err(err)) => describe_error(&err),
        Err(payload) => describe_panic(payload.as_ref()),
    };

    tracing::error!(data = %data_id, error = %message, "Failed to train on data '{}'", data_id);

    Err(TrainingFailure {
        failed_target_path,
        message,
    })
}

/// The failure's own description: its Display text, or the first
/// non-empty one down its source chain.
fn describe_error(err: &(dyn StdError + 'static)) -> String {
    let mut current = Some(err);
    while let Some(e) = current {
        let text = e.to_string();
        if !text.trim().is_empty() {
            return text;
        }
        current = e.source();
    }
    format!("{err:?}")
}

fn describe_panic(payload: &(dyn Any + Send)) -> String {
    let text = if let Some(s) = payload.downcast_ref::<&'static str>() {
        (*s).to_string()
    } else if let Some(s) = payload.downcast_ref::<String>() {
        s.clone()
    } else {
        String::new()
    };

    if text.trim().is_empty() {
        "training worker panicked".to_string()
    } else {
        text
    }
}
