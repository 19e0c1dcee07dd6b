// src/config/validate.rs

use globset::Glob;

use crate::config::model::{ConfigFile, RawConfigFile};
use crate::errors::{RebuildError, Result};

impl TryFrom<RawConfigFile> for ConfigFile {
    type Error = crate::errors::RebuildError;

    fn try_from(raw: RawConfigFile) -> std::result::Result<Self, Self::Error> {
        validate_raw_config(&raw)?;
        Ok(ConfigFile::new_unchecked(raw))
    }
}

fn validate_raw_config(cfg: &RawConfigFile) -> Result<()> {
    ensure_has_sources(cfg)?;
    validate_build_section(cfg)?;
    validate_state_section(cfg)?;
    validate_exclude_patterns(cfg)?;
    Ok(())
}

fn ensure_has_sources(cfg: &RawConfigFile) -> Result<()> {
    let roots = cfg.watch.roots.iter().filter(|r| !r.trim().is_empty()).count();
    let files = cfg.watch.files.iter().filter(|f| !f.trim().is_empty()).count();
    if roots + files == 0 {
        return Err(RebuildError::ConfigError(
            "[watch] must name at least one root directory or file".to_string(),
        ));
    }
    Ok(())
}

fn validate_build_section(cfg: &RawConfigFile) -> Result<()> {
    if cfg.build.tool.trim().is_empty() {
        return Err(RebuildError::ConfigError(
            "[build].tool must not be empty".to_string(),
        ));
    }
    if cfg.build.build.is_empty() {
        return Err(RebuildError::ConfigError(
            "[build].build must contain at least one argument".to_string(),
        ));
    }
    Ok(())
}

fn validate_state_section(cfg: &RawConfigFile) -> Result<()> {
    if cfg.state.path.trim().is_empty() {
        return Err(RebuildError::ConfigError(
            "[state].path must not be empty".to_string(),
        ));
    }
    Ok(())
}

fn validate_exclude_patterns(cfg: &RawConfigFile) -> Result<()> {
    for pat in cfg.watch.exclude.iter() {
        Glob::new(pat).map_err(|e| {
            RebuildError::ConfigError(format!("invalid exclude pattern '{pat}': {e}"))
        })?;
    }
    Ok(())
}
