// src/logging.rs

//! Stderr logging via `tracing-subscriber`.
//!
//! `--log-level` wins over [`LOG_ENV_VAR`]. The variable accepts full
//! `EnvFilter` directives (e.g. `webapp_rebuild=debug,warn`); anything that
//! fails to parse falls back to `info` with a warning once logging is up.

use anyhow::{anyhow, Result};
use tracing::warn;
use tracing_subscriber::{fmt, EnvFilter};

use crate::cli::LogLevel;

/// Environment variable consulted when `--log-level` is absent.
pub const LOG_ENV_VAR: &str = "WEBAPP_REBUILD_LOG";

const DEFAULT_DIRECTIVE: &str = "info";

/// Install the global subscriber. Fails if one is already set.
pub fn init_logging(cli_level: Option<LogLevel>) -> Result<()> {
    let directive = filter_directive(cli_level, std::env::var(LOG_ENV_VAR).ok());
    let (filter, rejected) = match EnvFilter::try_new(&directive) {
        Ok(filter) => (filter, None),
        Err(e) => (EnvFilter::new(DEFAULT_DIRECTIVE), Some(e)),
    };

    fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .try_init()
        .map_err(|e| anyhow!("initialising logging: {e}"))?;

    if let Some(e) = rejected {
        warn!(directive = %directive, error = %e, "invalid {LOG_ENV_VAR}; logging at info");
    }
    Ok(())
}

/// Filter directive for a CLI level and the raw value of [`LOG_ENV_VAR`].
pub fn filter_directive(cli_level: Option<LogLevel>, env: Option<String>) -> String {
    if let Some(level) = cli_level {
        return level.as_directive().to_string();
    }
    match env {
        Some(value) if !value.trim().is_empty() => value.trim().to_lowercase(),
        _ => DEFAULT_DIRECTIVE.to_string(),
    }
}

impl LogLevel {
    fn as_directive(self) -> &'static str {
        match self {
            LogLevel::Error => "error",
            LogLevel::Warn => "warn",
            LogLevel::Info => "info",
            LogLevel::Debug => "debug",
            LogLevel::Trace => "trace",
        }
    }
}
