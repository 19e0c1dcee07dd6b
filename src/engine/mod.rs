// src/engine/mod.rs

//! One-pass detection flow.
//!
//! [`Detector`] owns everything resolved from the configuration (watch set,
//! state file, build steps) and runs the linear flow once:
//! hash → load snapshot → decide → build → persist.

pub mod runtime;

use crate::detect::ChangeSet;

pub use runtime::Detector;

/// Flags that alter a single run.
#[derive(Debug, Clone, Copy, Default)]
pub struct RunOptions {
    /// Build even if no change is detected.
    pub force: bool,
    /// Report the decision but never build or write the snapshot.
    pub dry_run: bool,
}

/// What a run ended up doing.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RunOutcome {
    /// The environment bypass was active; nothing was checked.
    Skipped,
    /// Digests match the snapshot; no command ran.
    UpToDate,
    /// The build ran successfully and the snapshot was replaced.
    Rebuilt { changes: ChangeSet },
    /// Dry run: a build would have been triggered.
    WouldRebuild { changes: ChangeSet },
}

impl RunOutcome {
    pub fn built(&self) -> bool {
        matches!(self, RunOutcome::Rebuilt { .. })
    }
}
