// src/detect/decide.rs

use std::fmt;

use crate::detect::digest::FileDigestMap;

/// Whether the current file set differs from the previous snapshot.
///
/// Any added, removed or changed path counts. A missing snapshot is handled
/// by the caller and always triggers.
pub fn decide(current: &FileDigestMap, previous: &FileDigestMap) -> bool {
    current != previous
}

/// Paths that differ between two digest maps.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ChangeSet {
    pub added: Vec<String>,
    pub removed: Vec<String>,
    pub modified: Vec<String>,
}

impl ChangeSet {
    pub fn between(previous: &FileDigestMap, current: &FileDigestMap) -> Self {
        let mut changes = ChangeSet::default();

        for (path, digest) in current {
            match previous.get(path) {
                None => changes.added.push(path.clone()),
                Some(old) if old != digest => changes.modified.push(path.clone()),
                Some(_) => {}
            }
        }
        changes.removed = previous
            .paths()
            .filter(|p| !current.contains(p))
            .map(str::to_string)
            .collect();

        changes
    }

    pub fn is_empty(&self) -> bool {
        self.added.is_empty() && self.removed.is_empty() && self.modified.is_empty()
    }

    pub fn len(&self) -> usize {
        self.added.len() + self.removed.len() + self.modified.len()
    }
}

impl fmt::Display for ChangeSet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for path in &self.added {
            writeln!(f, "  + {path}")?;
        }
        for path in &self.modified {
            writeln!(f, "  ~ {path}")?;
        }
        for path in &self.removed {
            writeln!(f, "  - {path}")?;
        }
        Ok(())
    }
}
