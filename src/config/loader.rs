// src/config/loader.rs

use std::fs;
use std::path::{Path, PathBuf};

use tracing::info;

use crate::config::model::{ConfigFile, RawConfigFile};
use crate::errors::Result;

/// Config file looked up in the current directory when `--config` is absent.
pub const DEFAULT_CONFIG_FILE: &str = "WebappRebuild.toml";

/// Load a configuration file from a given path and return the raw `RawConfigFile`.
///
/// This only performs TOML deserialization; use [`load_and_validate`] for
/// semantic checks.
pub fn load_from_path(path: impl AsRef<Path>) -> Result<RawConfigFile> {
    let path = path.as_ref();
    let contents = fs::read_to_string(path)?;

    let config: RawConfigFile = toml::from_str(&contents)?;

    Ok(config)
}

/// Load a configuration file from path and run validation.
pub fn load_and_validate(path: impl AsRef<Path>) -> Result<ConfigFile> {
    let raw_config = load_from_path(&path)?;
    let config = ConfigFile::try_from(raw_config)?;
    Ok(config)
}

/// Resolve the configuration for a run, together with the base directory
/// relative paths in it are resolved against.
///
/// - An explicit path must exist.
/// - Without one, [`DEFAULT_CONFIG_FILE`] is used if present, otherwise the
///   built-in defaults apply with the current directory as base.
pub fn resolve_config(explicit: Option<&Path>) -> Result<(ConfigFile, PathBuf)> {
    let path = match explicit {
        Some(path) => path.to_path_buf(),
        None => {
            let default = default_config_path();
            if !default.is_file() {
                info!("no {DEFAULT_CONFIG_FILE} found, using built-in defaults");
                return Ok((ConfigFile::try_from(RawConfigFile::default())?, cwd()));
            }
            default
        }
    };

    let cfg = load_and_validate(&path)?;
    Ok((cfg, config_base_dir(&path)))
}

pub fn default_config_path() -> PathBuf {
    PathBuf::from(DEFAULT_CONFIG_FILE)
}

/// Directory containing the config file.
///
/// A bare filename like "WebappRebuild.toml" (parent = "") falls back to the
/// current working directory.
pub fn config_base_dir(config_path: &Path) -> PathBuf {
    match config_path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent.to_path_buf(),
        _ => cwd(),
    }
}

fn cwd() -> PathBuf {
    std::env::current_dir().unwrap_or_else(|_| PathBuf::from("."))
}
