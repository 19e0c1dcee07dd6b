// src/detect/scan.rs

use std::fmt;
use std::path::{Path, PathBuf};

use anyhow::Context;
use globset::{Glob, GlobSet, GlobSetBuilder};
use tracing::{debug, warn};

use crate::config::ConfigFile;
use crate::detect::digest::{compute_file_digest, FileDigestMap};
use crate::errors::{RebuildError, Result};
use crate::fs::FileSystem;

/// The resolved set of sources to hash.
///
/// Roots are walked recursively, explicit files are hashed as-is. Every
/// path is keyed relative to `base` (forward slashes) so the snapshot does
/// not depend on where the project is checked out.
#[derive(Clone)]
pub struct WatchSet {
    base: PathBuf,
    roots: Vec<PathBuf>,
    files: Vec<PathBuf>,
    exclude: Option<GlobSet>,
    /// Keys never recorded (the state file itself).
    ignored: Vec<String>,
}

impl fmt::Debug for WatchSet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("WatchSet")
            .field("base", &self.base)
            .field("roots", &self.roots)
            .field("files", &self.files)
            .finish_non_exhaustive()
    }
}

impl WatchSet {
    pub fn new(
        base: impl Into<PathBuf>,
        roots: &[String],
        files: &[String],
        exclude: &[String],
    ) -> Result<Self> {
        let base = base.into();
        let resolve = |entries: &[String]| -> Vec<PathBuf> {
            entries
                .iter()
                .map(|s| s.trim())
                .filter(|s| !s.is_empty())
                .map(|s| base.join(s))
                .collect()
        };

        let roots = resolve(roots);
        let files = resolve(files);
        let exclude = if exclude.is_empty() {
            None
        } else {
            Some(build_globset(exclude)?)
        };

        Ok(Self {
            base,
            roots,
            files,
            exclude,
            ignored: Vec::new(),
        })
    }

    /// Build the watch set described by `[watch]`, ignoring the state file.
    pub fn from_config(cfg: &ConfigFile, base: &Path) -> Result<Self> {
        let mut set = Self::new(base, &cfg.watch.roots, &cfg.watch.files, &cfg.watch.exclude)?;
        set.ignore(base.join(&cfg.state.path));
        Ok(set)
    }

    /// Never record `path`, even if it lives under a watched root.
    pub fn ignore(&mut self, path: impl AsRef<Path>) {
        let key = self.key_for(path.as_ref());
        self.ignored.push(key);
    }

    /// Snapshot key for `path`: relative to the base with `/` separators,
    /// or the full path if it lies outside the base.
    pub fn key_for(&self, path: &Path) -> String {
        let rel = path.strip_prefix(&self.base).unwrap_or(path);
        rel.to_string_lossy().replace('\\', "/")
    }

    fn is_excluded(&self, key: &str) -> bool {
        if self.ignored.iter().any(|i| i == key) {
            return true;
        }
        self.exclude.as_ref().is_some_and(|set| set.is_match(key))
    }
}

/// Build a GlobSet from simple string patterns.
fn build_globset(patterns: &[String]) -> Result<GlobSet> {
    let mut builder = GlobSetBuilder::new();
    for pat in patterns {
        let glob = Glob::new(pat)
            .with_context(|| format!("invalid glob pattern: {pat}"))?;
        builder.add(glob);
    }
    Ok(builder
        .build()
        .context("building exclude globset")?)
}

/// Collect every file below the watch roots plus the explicit files.
///
/// A missing root contributes nothing. Explicit files are returned even if
/// missing so that hashing reports them as unreadable.
pub fn collect_files(fs: &dyn FileSystem, watch: &WatchSet) -> Result<Vec<PathBuf>> {
    let mut files = Vec::new();

    for root in watch.roots.iter() {
        if fs.is_file(root) {
            files.push(root.clone());
            continue;
        }
        if !fs.is_dir(root) {
            warn!(root = ?root, "watched root does not exist; skipping");
            continue;
        }

        let mut stack = vec![root.clone()];
        while let Some(dir) = stack.pop() {
            let entries = fs.read_dir(&dir).map_err(|e| RebuildError::FileAccess {
                path: dir.clone(),
                reason: format!("{e:#}"),
            })?;
            for path in entries {
                if fs.is_dir(&path) {
                    stack.push(path);
                } else if fs.is_file(&path) {
                    files.push(path);
                }
            }
        }
    }

    files.extend(watch.files.iter().cloned());
    Ok(files)
}

/// Hash every watched file into a fresh [`FileDigestMap`].
///
/// Fails on the first unreadable file; no partial map is returned.
pub fn compute_digests(fs: &dyn FileSystem, watch: &WatchSet) -> Result<FileDigestMap> {
    let mut map = FileDigestMap::new();

    for path in collect_files(fs, watch)? {
        let key = watch.key_for(&path);
        if watch.is_excluded(&key) || map.contains(&key) {
            continue;
        }
        let digest = compute_file_digest(fs, &path)?;
        debug!(file = %key, digest = %digest, "hashed watched file");
        map.insert(key, digest);
    }

    debug!(files = map.len(), "computed digests for watched files");
    Ok(map)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::detect::digest::Digest;
    use crate::fs::mock::MockFileSystem;

    fn strings(items: &[&str]) -> Vec<String> {
        items.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn walks_roots_and_explicit_files() {
        let fs = MockFileSystem::new();
        fs.add_file("./webapp/src/main.ts", "main");
        fs.add_file("./webapp/src/components/App.vue", "app");
        fs.add_file("./webapp/index.html", "<html>");
        fs.add_file("./webapp/node_modules/x.js", "ignored");

        let watch = WatchSet::new(
            ".",
            &strings(&["webapp/src"]),
            &strings(&["webapp/index.html"]),
            &[],
        )
        .unwrap();

        let map = compute_digests(&fs, &watch).unwrap();
        let paths: Vec<&str> = map.paths().collect();
        assert_eq!(
            paths,
            vec![
                "webapp/index.html",
                "webapp/src/components/App.vue",
                "webapp/src/main.ts",
            ]
        );
        assert_eq!(map.get("webapp/src/main.ts"), Some(&Digest::of(b"main")));
    }

    #[test]
    fn exclude_patterns_and_state_file_are_skipped() {
        let fs = MockFileSystem::new();
        fs.add_file("./webapp/src/main.ts", "main");
        fs.add_file("./webapp/src/main.ts.swp", "junk");
        fs.add_file("./webapp/src/.hashes", "state");

        let mut watch = WatchSet::new(
            ".",
            &strings(&["webapp/src"]),
            &[],
            &strings(&["**/*.swp"]),
        )
        .unwrap();
        watch.ignore("./webapp/src/.hashes");

        let map = compute_digests(&fs, &watch).unwrap();
        assert_eq!(map.paths().collect::<Vec<_>>(), vec!["webapp/src/main.ts"]);
    }

    #[test]
    fn missing_root_contributes_nothing() {
        let fs = MockFileSystem::new();
        fs.add_file("./webapp/index.html", "<html>");

        let watch = WatchSet::new(
            ".",
            &strings(&["webapp/public"]),
            &strings(&["webapp/index.html"]),
            &[],
        )
        .unwrap();

        let map = compute_digests(&fs, &watch).unwrap();
        assert_eq!(map.len(), 1);
    }

    #[test]
    fn missing_explicit_file_aborts() {
        let fs = MockFileSystem::new();
        let watch =
            WatchSet::new(".", &[], &strings(&["webapp/yarn.lock"]), &[]).unwrap();

        assert!(matches!(
            compute_digests(&fs, &watch),
            Err(RebuildError::FileAccess { .. })
        ));
    }

    #[test]
    fn unreadable_file_under_root_aborts() {
        let fs = MockFileSystem::new();
        fs.add_file("./webapp/src/ok.ts", "ok");
        fs.add_unreadable_file("./webapp/src/locked.ts");

        let watch = WatchSet::new(".", &strings(&["webapp/src"]), &[], &[]).unwrap();
        assert!(matches!(
            compute_digests(&fs, &watch),
            Err(RebuildError::FileAccess { .. })
        ));
    }
}
