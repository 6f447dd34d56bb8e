// ============================================================
// Layer 1: CLI / Presentation Layer
// ============================================================
// Entry point for all user interaction. Parsing is done by
// `clap`; all work is delegated to Layer 2 (application).
//
// Commands:
//   1. `train`  run one training job, in-process or on a worker thread
//   2. `parse`  load a persisted model and classify an utterance
//
// Reference: Rust Book §7 (Modules), §12 (CLI programs)

pub mod commands;

use std::thread;

use anyhow::{Context, Result};
use clap::Parser;
use commands::{Commands, ParseArgs, TrainArgs};

use crate::application::train_use_case::{TrainRequest, TrainUseCase};
use crate::application::worker::do_train_in_worker;
use crate::infra::model_store::ModelStore;
use crate::infra::settings::Settings;

#[derive(Parser, Debug)]
#[command(
    name = "nlu-train",
    version,
    about = "Train intent classification models from a pipeline config and labelled examples."
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

impl Cli {
    /// Route to the matching handler. Nothing is computed here.
    pub fn run(self) -> Result<()> {
        match self.command {
            Commands::Train(args) => run_train(args),
            Commands::Parse(args) => run_parse(args),
        }
    }
}

const WORKER_THREAD: &str = "nlu-train-worker";

/// Route panic reports through `tracing` instead of stderr.
///
/// Panics on the training worker are reported by `do_train_in_worker`,
/// so the hook only records them at debug level.
pub fn install_panic_hook() {
    std::panic::set_hook(Box::new(|info| {
        let thread = thread::current();
        if reported_by_worker(thread.name()) {
            tracing::debug!("Worker panicked: {}", info);
        } else {
            tracing::error!("Panic: {}", info);
        }
    }));
}

fn reported_by_worker(thread_name: Option<&str>) -> bool {
    thread_name == Some(WORKER_THREAD)
}

fn run_train(args: TrainArgs) -> Result<()> {
    let settings = Settings::from_env();
    let use_case = TrainUseCase::with_defaults(&settings);
    let in_worker = args.worker;
    let request: TrainRequest = args.into();

    tracing::info!("Starting training run with config {:?}", request.config);

    if !in_worker {
        let result = use_case.execute(request)?;
        println!(
            "Training complete. Intents: {}",
            result.interpreter.model.intent_names().join(", ")
        );
        report_persisted(result.persisted_path.as_deref());
        return Ok(());
    }

    let handle = thread::Builder::new()
        .name(WORKER_THREAD.into())
        .spawn(move || do_train_in_worker(&use_case, request))
        .context("Failed to spawn training worker")?;

    match handle.join() {
        Ok(Ok(persisted)) => {
            println!("Training complete.");
            report_persisted(persisted.as_deref());
            Ok(())
        }
        Ok(Err(failure)) => {
            // Structured record for a supervising process, then a non-zero exit
            eprintln!("{}", serde_json::to_string(&failure)?);
            Err(failure.into())
        }
        Err(_) => anyhow::bail!("Training worker exited abnormally"),
    }
}

fn report_persisted(path: Option<&str>) {
    match path {
        Some(path) => println!("Model saved to '{}'.", path),
        None => println!("No output path given; model not persisted."),
    }
}

fn run_parse(args: ParseArgs) -> Result<()> {
    let interpreter = ModelStore::new(&args.model).load_interpreter()?;
    let result = interpreter.parse(&args.text);
    println!("{}", serde_json::to_string_pretty(&result)?);
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_only_worker_panics_are_left_to_the_worker() {
        assert!(reported_by_worker(Some(WORKER_THREAD)));
        assert!(!reported_by_worker(Some("main")));
        assert!(!reported_by_worker(None));
    }
}
