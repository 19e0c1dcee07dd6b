// src/config/model.rs

use serde::Deserialize;

/// Top-level configuration as read from a TOML file.
///
/// ```toml
/// [watch]
/// roots = ["webapp/src/", "webapp/public/"]
/// files = ["webapp/index.html", "webapp/yarn.lock"]
/// exclude = ["**/*.swp"]
///
/// [build]
/// working_dir = "webapp"
/// tool = "yarn"
/// install = ["install", "--frozen-lockfile"]
/// build = ["build"]
///
/// [state]
/// path = "webapp_dist/.hashes"
///
/// [skip]
/// env = "GITHUB_ACTIONS"
/// value = "true"
/// ```
///
/// All sections are optional and default to the layout above.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct RawConfigFile {
    #[serde(default)]
    pub watch: WatchSection,

    #[serde(default)]
    pub build: BuildSection,

    #[serde(default)]
    pub state: StateSection,

    #[serde(default)]
    pub skip: SkipSection,
}

/// Validated configuration. Construct via `ConfigFile::try_from(raw)`.
#[derive(Debug, Clone)]
pub struct ConfigFile {
    pub watch: WatchSection,
    pub build: BuildSection,
    pub state: StateSection,
    pub skip: SkipSection,
}

impl ConfigFile {
    pub(crate) fn new_unchecked(raw: RawConfigFile) -> Self {
        Self {
            watch: raw.watch,
            build: raw.build,
            state: raw.state,
            skip: raw.skip,
        }
    }

    /// Whether the bypass signal is present in the environment.
    ///
    /// `lookup` is normally `std::env::var(..).ok()`; it is injected so the
    /// decision can be tested without mutating the process environment.
    pub fn skip_requested<F>(&self, lookup: F) -> bool
    where
        F: Fn(&str) -> Option<String>,
    {
        match self.skip.env.as_deref() {
            Some(name) if !name.is_empty() => {
                lookup(name).is_some_and(|v| v.trim() == self.skip.value)
            }
            _ => false,
        }
    }
}

/// `[watch]` section: which files make up the web application sources.
#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct WatchSection {
    /// Directories scanned recursively.
    #[serde(default = "default_roots")]
    pub roots: Vec<String>,

    /// Individual files hashed in addition to the roots.
    #[serde(default = "default_files")]
    pub files: Vec<String>,

    /// Glob patterns, matched against paths relative to the base directory.
    #[serde(default)]
    pub exclude: Vec<String>,
}

fn default_roots() -> Vec<String> {
    vec!["webapp/src/".to_string(), "webapp/public/".to_string()]
}

fn default_files() -> Vec<String> {
    [
        "webapp/index.html",
        "webapp/tsconfig.config.json",
        "webapp/tsconfig.json",
        "webapp/vite.config.ts",
        "webapp/yarn.lock",
    ]
    .iter()
    .map(|s| s.to_string())
    .collect()
}

impl Default for WatchSection {
    fn default() -> Self {
        Self {
            roots: default_roots(),
            files: default_files(),
            exclude: Vec::new(),
        }
    }
}

/// `[build]` section: the external package manager invocation.
#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct BuildSection {
    #[serde(default = "default_working_dir")]
    pub working_dir: String,

    #[serde(default = "default_tool")]
    pub tool: String,

    /// Arguments of the dependency install step.
    #[serde(default = "default_install_args")]
    pub install: Vec<String>,

    /// Arguments of the build step.
    #[serde(default = "default_build_args")]
    pub build: Vec<String>,
}

fn default_working_dir() -> String {
    "webapp".to_string()
}

fn default_tool() -> String {
    "yarn".to_string()
}

fn default_install_args() -> Vec<String> {
    vec!["install".to_string(), "--frozen-lockfile".to_string()]
}

fn default_build_args() -> Vec<String> {
    vec!["build".to_string()]
}

impl Default for BuildSection {
    fn default() -> Self {
        Self {
            working_dir: default_working_dir(),
            tool: default_tool(),
            install: default_install_args(),
            build: default_build_args(),
        }
    }
}

/// `[state]` section.
#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct StateSection {
    /// Location of the persisted digest snapshot.
    #[serde(default = "default_state_path")]
    pub path: String,
}

fn default_state_path() -> String {
    "webapp_dist/.hashes".to_string()
}

impl Default for StateSection {
    fn default() -> Self {
        Self {
            path: default_state_path(),
        }
    }
}

/// `[skip]` section: environment signal that bypasses the check entirely.
///
/// Set `env = ""` to disable the bypass.
#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct SkipSection {
    #[serde(default = "default_skip_env")]
    pub env: Option<String>,

    #[serde(default = "default_skip_value")]
    pub value: String,
}

fn default_skip_env() -> Option<String> {
    Some("GITHUB_ACTIONS".to_string())
}

fn default_skip_value() -> String {
    "true".to_string()
}

impl Default for SkipSection {
    fn default() -> Self {
        Self {
            env: default_skip_env(),
            value: default_skip_value(),
        }
    }
}
