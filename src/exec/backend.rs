// src/exec/backend.rs

//! Pluggable build backend abstraction.
//!
//! The detector talks to a `BuildBackend` instead of spawning processes
//! directly. Production uses [`ProcessBackend`]; tests swap in a fake that
//! records which steps ran and scripts their outcome.

use std::fmt;
use std::future::Future;
use std::path::{Path, PathBuf};
use std::pin::Pin;

use crate::config::ConfigFile;
use crate::errors::{Result, StepKind};

use super::command::run_step;

/// One external command: `<program> <args...>` in `working_dir`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BuildStep {
    pub kind: StepKind,
    pub program: String,
    pub args: Vec<String>,
    pub working_dir: PathBuf,
}

impl BuildStep {
    pub fn new(
        kind: StepKind,
        program: impl Into<String>,
        args: Vec<String>,
        working_dir: impl Into<PathBuf>,
    ) -> Self {
        Self {
            kind,
            program: program.into(),
            args,
            working_dir: working_dir.into(),
        }
    }
}

impl fmt::Display for BuildStep {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.program)?;
        for arg in &self.args {
            write!(f, " {arg}")?;
        }
        Ok(())
    }
}

/// The install-then-build sequence described by `[build]`.
///
/// An empty `install` argument list leaves out the install step.
pub fn build_steps(cfg: &ConfigFile, base: &Path) -> Vec<BuildStep> {
    let working_dir = base.join(&cfg.build.working_dir);
    let mut steps = Vec::with_capacity(2);

    if !cfg.build.install.is_empty() {
        steps.push(BuildStep::new(
            StepKind::Install,
            cfg.build.tool.clone(),
            cfg.build.install.clone(),
            working_dir.clone(),
        ));
    }
    steps.push(BuildStep::new(
        StepKind::Build,
        cfg.build.tool.clone(),
        cfg.build.build.clone(),
        working_dir,
    ));

    steps
}

/// Trait abstracting how build steps are executed.
pub trait BuildBackend: Send {
    /// Run a single step to completion.
    ///
    /// Must return `Ok(())` only if the step exited successfully.
    fn run_step<'a>(
        &'a mut self,
        step: &'a BuildStep,
    ) -> Pin<Box<dyn Future<Output = Result<()>> + Send + 'a>>;
}

/// Real backend: spawns OS processes via `tokio::process`.
#[derive(Debug, Default)]
pub struct ProcessBackend;

impl ProcessBackend {
    pub fn new() -> Self {
        Self
    }
}

impl BuildBackend for ProcessBackend {
    fn run_step<'a>(
        &'a mut self,
        step: &'a BuildStep,
    ) -> Pin<Box<dyn Future<Output = Result<()>> + Send + 'a>> {
        Box::pin(run_step(step))
    }
}
