// src/cli.rs

//! CLI argument parsing using `clap`.

use clap::{Parser, ValueEnum};

/// Command-line arguments for `webapp-rebuild`.
#[derive(Debug, Clone, Parser)]
#[command(
    name = "webapp-rebuild",
    version,
    about = "Rebuild the web application only when its sources changed.",
    long_about = None
)]
pub struct CliArgs {
    /// Path to the config file (TOML).
    ///
    /// If the default file does not exist, built-in defaults are used.
    #[arg(long, value_name = "PATH")]
    pub config: Option<String>,

    /// Run the install and build steps even if nothing changed.
    #[arg(long)]
    pub force: bool,

    /// Detect and report changes, but don't run any commands or touch the
    /// state file.
    #[arg(long)]
    pub dry_run: bool,

    /// Ignore the CI environment bypass and always check.
    #[arg(long)]
    pub no_skip: bool,

    /// Logging level (error, warn, info, debug, trace).
    ///
    /// If omitted, `WEBAPP_REBUILD_LOG` or a default level will be used.
    #[arg(long, value_enum, value_name = "LEVEL")]
    pub log_level: Option<LogLevel>,
}

/// Log level as exposed on the CLI.
#[derive(Debug, Copy, Clone, ValueEnum)]
pub enum LogLevel {
    Error,
    Warn,
    Info,
    Debug,
    Trace,
}

/// Convenience wrapper around `CliArgs::parse()`.
pub fn parse() -> CliArgs {
    CliArgs::parse()
}
