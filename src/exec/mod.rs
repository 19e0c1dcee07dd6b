// src/exec/mod.rs

//! Process execution layer.
//!
//! - [`backend`] provides [`BuildStep`], the `BuildBackend` trait and the
//!   production `ProcessBackend`.
//! - [`command`] spawns one step with `tokio::process::Command` and captures
//!   its output.

pub mod backend;
pub mod command;

use tracing::info;

use crate::errors::Result;

pub use backend::{build_steps, BuildBackend, BuildStep, ProcessBackend};

/// Run the steps in order, stopping at the first failure.
///
/// If the install step fails the build step is never attempted. Nothing is
/// retried here; a failed run is retried by invoking the tool again.
pub async fn trigger_build(backend: &mut dyn BuildBackend, steps: &[BuildStep]) -> Result<()> {
    info!("compiling webapp (hang on, this can take a while and there might be little output)...");
    for step in steps {
        backend.run_step(step).await?;
    }
    info!(steps = steps.len(), "webapp build finished");
    Ok(())
}
