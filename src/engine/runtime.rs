// src/engine/runtime.rs

use std::path::{Path, PathBuf};
use std::sync::Arc;

use tracing::{debug, info};

use crate::config::ConfigFile;
use crate::detect::{
    compute_digests, decide, load_snapshot, persist_snapshot, ChangeSet, FileDigestMap,
    WatchSet,
};
use crate::engine::{RunOptions, RunOutcome};
use crate::errors::Result;
use crate::exec::{build_steps, trigger_build, BuildBackend, BuildStep};
use crate::fs::FileSystem;

/// Change detector and rebuild trigger.
#[derive(Debug)]
pub struct Detector {
    fs: Arc<dyn FileSystem>,
    watch: WatchSet,
    state_file: PathBuf,
    steps: Vec<BuildStep>,
    options: RunOptions,
}

impl Detector {
    pub fn new(
        fs: Arc<dyn FileSystem>,
        watch: WatchSet,
        state_file: impl Into<PathBuf>,
        steps: Vec<BuildStep>,
        options: RunOptions,
    ) -> Self {
        Self {
            fs,
            watch,
            state_file: state_file.into(),
            steps,
            options,
        }
    }

    /// Resolve every path in `cfg` against `base`.
    pub fn from_config(
        fs: Arc<dyn FileSystem>,
        cfg: &ConfigFile,
        base: &Path,
        options: RunOptions,
    ) -> Result<Self> {
        let watch = WatchSet::from_config(cfg, base)?;
        let state_file = base.join(&cfg.state.path);
        let steps = build_steps(cfg, base);
        Ok(Self::new(fs, watch, state_file, steps, options))
    }

    pub fn state_file(&self) -> &Path {
        &self.state_file
    }

    pub fn steps(&self) -> &[BuildStep] {
        &self.steps
    }

    /// Hash the current sources.
    pub fn current_digests(&self) -> Result<FileDigestMap> {
        compute_digests(self.fs.as_ref(), &self.watch)
    }

    /// Digests of the last successful build, `None` if missing or unusable.
    pub fn previous_digests(&self) -> Option<FileDigestMap> {
        load_snapshot(self.fs.as_ref(), &self.state_file)
    }

    /// Run the whole flow once.
    ///
    /// The snapshot is written only after every build step succeeded, so a
    /// failed build is retried by the next invocation.
    pub async fn run_once(&self, backend: &mut dyn BuildBackend) -> Result<RunOutcome> {
        let current = self.current_digests()?;
        let previous = self.previous_digests();

        let changed = match &previous {
            Some(previous) => decide(&current, previous),
            None => true,
        };
        if !changed && !self.options.force {
            info!(files = current.len(), "webapp artifacts should be up-to-date");
            return Ok(RunOutcome::UpToDate);
        }

        let first_build = previous.is_none();
        let changes = ChangeSet::between(&previous.unwrap_or_default(), &current);
        if first_build {
            info!(files = current.len(), "no previous snapshot; rebuild required");
        } else if changes.is_empty() {
            info!("no changes detected; rebuilding anyway (--force)");
        } else {
            info!(
                added = changes.added.len(),
                modified = changes.modified.len(),
                removed = changes.removed.len(),
                "webapp sources changed"
            );
            debug!("changed files:\n{changes}");
        }

        if self.options.dry_run {
            info!("dry run: not running build steps");
            return Ok(RunOutcome::WouldRebuild { changes });
        }

        trigger_build(backend, &self.steps).await?;
        persist_snapshot(self.fs.as_ref(), &current, &self.state_file)?;

        Ok(RunOutcome::Rebuilt { changes })
    }
}
