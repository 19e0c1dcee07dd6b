#![allow(dead_code)]

use webapp_rebuild::config::{ConfigFile, RawConfigFile};

/// Builder for `ConfigFile` to simplify test setup.
///
/// Starts from the built-in defaults with an empty watch list.
pub struct ConfigFileBuilder {
    config: RawConfigFile,
}

impl ConfigFileBuilder {
    pub fn new() -> Self {
        let mut config = RawConfigFile::default();
        config.watch.roots.clear();
        config.watch.files.clear();
        Self { config }
    }

    pub fn with_root(mut self, root: &str) -> Self {
        self.config.watch.roots.push(root.to_string());
        self
    }

    pub fn with_file(mut self, file: &str) -> Self {
        self.config.watch.files.push(file.to_string());
        self
    }

    pub fn with_exclude(mut self, pattern: &str) -> Self {
        self.config.watch.exclude.push(pattern.to_string());
        self
    }

    pub fn with_state_path(mut self, path: &str) -> Self {
        self.config.state.path = path.to_string();
        self
    }

    pub fn with_working_dir(mut self, dir: &str) -> Self {
        self.config.build.working_dir = dir.to_string();
        self
    }

    pub fn with_tool(mut self, tool: &str, install: &[&str], build: &[&str]) -> Self {
        self.config.build.tool = tool.to_string();
        self.config.build.install = install.iter().map(|s| s.to_string()).collect();
        self.config.build.build = build.iter().map(|s| s.to_string()).collect();
        self
    }

    pub fn build(self) -> ConfigFile {
        ConfigFile::try_from(self.config).expect("valid test config")
    }
}

impl Default for ConfigFileBuilder {
    fn default() -> Self {
        Self::new()
    }
}
