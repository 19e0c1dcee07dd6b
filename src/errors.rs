// src/errors.rs

//! Crate-wide error type and result alias.

use std::fmt;
use std::path::PathBuf;

use thiserror::Error;

/// Which of the two external steps a build failure belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StepKind {
    Install,
    Build,
}

impl fmt::Display for StepKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            StepKind::Install => f.write_str("install"),
            StepKind::Build => f.write_str("build"),
        }
    }
}

#[derive(Error, Debug)]
pub enum RebuildError {
    #[error("Configuration error: {0}")]
    ConfigError(String),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("TOML parsing error: {0}")]
    TomlError(#[from] toml::de::Error),

    /// A watched file exists but could not be read. Fatal before any
    /// rebuild decision is made.
    #[error("cannot read watched file {path:?}: {reason}")]
    FileAccess { path: PathBuf, reason: String },

    #[error("'{tool}' does not seem to be installed or available on your system")]
    ToolUnavailable { tool: String },

    #[error("{step} step failed ({})\n{output}", exit_label(.code))]
    BuildStepFailed {
        step: StepKind,
        code: Option<i32>,
        output: String,
    },

    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

fn exit_label(code: &Option<i32>) -> String {
    match code {
        Some(code) => format!("exit code {code}"),
        None => "terminated by signal".to_string(),
    }
}

pub use anyhow::Error;
pub type Result<T> = std::result::Result<T, RebuildError>;
