#![allow(dead_code)]

use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use tempfile::TempDir;

use webapp_rebuild::config::ConfigFile;
use webapp_rebuild::engine::{Detector, RunOptions};
use webapp_rebuild::fs::RealFileSystem;

pub use webapp_rebuild_test_utils::builders::ConfigFileBuilder;
pub use webapp_rebuild_test_utils::fake_backend::FakeBackend;
pub use webapp_rebuild_test_utils::init_tracing;

/// A throwaway project directory with a `webapp/` layout.
pub struct Project {
    dir: TempDir,
}

impl Project {
    pub fn new() -> Self {
        let dir = tempfile::tempdir().expect("create temp dir");
        fs::create_dir_all(dir.path().join("webapp/src")).expect("create webapp/src");
        Self { dir }
    }

    pub fn root(&self) -> &Path {
        self.dir.path()
    }

    pub fn path(&self, rel: &str) -> PathBuf {
        self.dir.path().join(rel)
    }

    pub fn write(&self, rel: &str, content: &str) {
        let path = self.path(rel);
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).expect("create parent dir");
        }
        fs::write(path, content).expect("write file");
    }

    pub fn remove(&self, rel: &str) {
        fs::remove_file(self.path(rel)).expect("remove file");
    }

    /// Watches `webapp/src` and `webapp/index.html`, state in `webapp_dist/.hashes`.
    pub fn config(&self) -> ConfigFile {
        ConfigFileBuilder::new()
            .with_root("webapp/src")
            .with_file("webapp/index.html")
            .with_state_path("webapp_dist/.hashes")
            .build()
    }

    pub fn detector(&self, cfg: &ConfigFile, options: RunOptions) -> Detector {
        Detector::from_config(Arc::new(RealFileSystem), cfg, self.root(), options)
            .expect("build detector")
    }

    pub fn state_file(&self) -> PathBuf {
        self.path("webapp_dist/.hashes")
    }
}
