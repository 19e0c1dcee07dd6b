// src/detect/digest.rs

use std::collections::BTreeMap;
use std::collections::btree_map;
use std::fmt;
use std::io::Read;
use std::path::Path;

use blake3::Hasher;
use tracing::trace;

use crate::errors::{RebuildError, Result};
use crate::fs::FileSystem;

/// Number of bytes in a [`Digest`].
pub const DIGEST_LEN: usize = 32;

/// BLAKE3 hash of a file's content.
#[derive(Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Digest([u8; DIGEST_LEN]);

impl Digest {
    pub fn from_bytes(bytes: [u8; DIGEST_LEN]) -> Self {
        Self(bytes)
    }

    pub fn as_bytes(&self) -> &[u8; DIGEST_LEN] {
        &self.0
    }

    /// Digest of an in-memory buffer.
    pub fn of(content: &[u8]) -> Self {
        Self(*blake3::hash(content).as_bytes())
    }
}

impl fmt::Display for Digest {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", blake3::Hash::from(self.0).to_hex())
    }
}

impl fmt::Debug for Digest {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Digest({self})")
    }
}

/// Compute the digest of a single file, streaming its content.
///
/// Any failure to open or read the file is reported as
/// [`RebuildError::FileAccess`].
pub fn compute_file_digest(fs: &dyn FileSystem, path: &Path) -> Result<Digest> {
    let access = |reason: String| RebuildError::FileAccess {
        path: path.to_path_buf(),
        reason,
    };

    let mut hasher = Hasher::new();
    let mut file = fs.open_read(path).map_err(|e| access(format!("{e:#}")))?;
    let mut buf = [0u8; 8192];
    loop {
        let n = file.read(&mut buf).map_err(|e| access(e.to_string()))?;
        if n == 0 {
            break;
        }
        hasher.update(&buf[..n]);
    }

    let digest = Digest(*hasher.finalize().as_bytes());
    trace!(path = ?path, digest = %digest, "hashed file");
    Ok(digest)
}

/// Mapping from relative file path to content digest.
///
/// Kept ordered so the serialized snapshot is deterministic; equality is a
/// plain set comparison of `(path, digest)` pairs.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FileDigestMap {
    entries: BTreeMap<String, Digest>,
}

impl FileDigestMap {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert a digest, returning the previous one for that path if any.
    pub fn insert(&mut self, path: impl Into<String>, digest: Digest) -> Option<Digest> {
        self.entries.insert(path.into(), digest)
    }

    pub fn get(&self, path: &str) -> Option<&Digest> {
        self.entries.get(path)
    }

    pub fn contains(&self, path: &str) -> bool {
        self.entries.contains_key(path)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn iter(&self) -> btree_map::Iter<'_, String, Digest> {
        self.entries.iter()
    }

    pub fn paths(&self) -> impl Iterator<Item = &str> {
        self.entries.keys().map(String::as_str)
    }
}

impl FromIterator<(String, Digest)> for FileDigestMap {
    fn from_iter<I: IntoIterator<Item = (String, Digest)>>(iter: I) -> Self {
        Self {
            entries: iter.into_iter().collect(),
        }
    }
}

impl<'a> IntoIterator for &'a FileDigestMap {
    type Item = (&'a String, &'a Digest);
    type IntoIter = btree_map::Iter<'a, String, Digest>;

    fn into_iter(self) -> Self::IntoIter {
        self.entries.iter()
    }
}
