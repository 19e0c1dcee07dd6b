// src/lib.rs

pub mod cli;
pub mod config;
pub mod detect;
pub mod engine;
pub mod errors;
pub mod exec;
pub mod fs;
pub mod logging;

use std::path::PathBuf;
use std::sync::Arc;

use tracing::info;

use crate::cli::CliArgs;
use crate::config::resolve_config;
use crate::engine::{Detector, RunOptions, RunOutcome};
use crate::errors::Result;
use crate::exec::{BuildBackend, ProcessBackend};
use crate::fs::RealFileSystem;

/// High-level entry point used by `main.rs`.
///
/// This wires together:
/// - config loading
/// - the CI bypass signal
/// - the detector with the real filesystem and process backend
pub async fn run(args: CliArgs) -> Result<RunOutcome> {
    let mut backend = ProcessBackend::new();
    run_with(args, |name| std::env::var(name).ok(), &mut backend).await
}

/// [`run`] with the environment lookup and build backend injected.
pub async fn run_with<F>(
    args: CliArgs,
    env: F,
    backend: &mut dyn BuildBackend,
) -> Result<RunOutcome>
where
    F: Fn(&str) -> Option<String>,
{
    let explicit = args.config.as_ref().map(PathBuf::from);
    let (cfg, base) = resolve_config(explicit.as_deref())?;

    if !args.no_skip && cfg.skip_requested(env) {
        info!("not testing for up-to-date webapp artifacts when running in CI");
        return Ok(RunOutcome::Skipped);
    }

    info!(base = ?base, "testing for up-to-date webapp artifacts");

    let options = RunOptions {
        force: args.force,
        dry_run: args.dry_run,
    };
    let detector = Detector::from_config(Arc::new(RealFileSystem), &cfg, &base, options)?;
    let outcome = detector.run_once(backend).await?;

    if let RunOutcome::WouldRebuild { changes } = &outcome {
        println!("webapp needs a rebuild ({} changed paths)", changes.len());
        print!("{changes}");
    }

    Ok(outcome)
}
