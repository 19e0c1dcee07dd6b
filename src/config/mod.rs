// src/config/mod.rs

//! Configuration: TOML model, loading and validation.
//!
//! - [`model`] holds the serde structs and built-in defaults.
//! - [`loader`] reads files and picks the base directory.
//! - [`validate`] turns a `RawConfigFile` into a checked `ConfigFile`.

pub mod loader;
pub mod model;
pub mod validate;

pub use loader::{load_and_validate, load_from_path, resolve_config, DEFAULT_CONFIG_FILE};
pub use model::{
    BuildSection, ConfigFile, RawConfigFile, SkipSection, StateSection, WatchSection,
};
