// src/detect/snapshot.rs

//! Persisted digest snapshot.
//!
//! Layout (little-endian):
//!
//! ```text
//! b"WRSNAP" | version: u8 | count: u32 | count x (len: u32 | path: [u8; len] | digest: [u8; 32])
//! ```
//!
//! Only this tool reads the file, so the format is versioned but otherwise
//! minimal. Any decoding problem makes the snapshot count as absent.

use std::path::Path;

use anyhow::Context;
use thiserror::Error;
use tracing::{debug, info, warn};

use crate::detect::digest::{Digest, FileDigestMap, DIGEST_LEN};
use crate::errors::Result;
use crate::fs::FileSystem;

const MAGIC: &[u8; 6] = b"WRSNAP";
const VERSION: u8 = 1;

/// Why a state file could not be decoded.
#[derive(Error, Debug, PartialEq, Eq)]
pub enum SnapshotError {
    #[error("missing snapshot header")]
    BadMagic,

    #[error("unsupported snapshot version {0}")]
    UnsupportedVersion(u8),

    #[error("snapshot truncated at byte {0}")]
    Truncated(usize),

    #[error("snapshot path is not valid UTF-8")]
    InvalidPath,

    #[error("duplicate snapshot entry for {0}")]
    DuplicatePath(String),

    #[error("{0} trailing bytes after last snapshot entry")]
    TrailingBytes(usize),
}

/// Serialize a digest map into the state file format.
pub fn encode_snapshot(map: &FileDigestMap) -> Vec<u8> {
    let body: usize = map.iter().map(|(p, _)| 4 + p.len() + DIGEST_LEN).sum();
    let mut out = Vec::with_capacity(MAGIC.len() + 1 + 4 + body);

    out.extend_from_slice(MAGIC);
    out.push(VERSION);
    out.extend_from_slice(&(map.len() as u32).to_le_bytes());
    for (path, digest) in map {
        out.extend_from_slice(&(path.len() as u32).to_le_bytes());
        out.extend_from_slice(path.as_bytes());
        out.extend_from_slice(digest.as_bytes());
    }
    out
}

/// Parse the state file format.
pub fn decode_snapshot(bytes: &[u8]) -> std::result::Result<FileDigestMap, SnapshotError> {
    let mut reader = Reader { bytes, pos: 0 };

    if reader.take(MAGIC.len()).map_err(|_| SnapshotError::BadMagic)? != MAGIC {
        return Err(SnapshotError::BadMagic);
    }
    let version = reader.take(1)?[0];
    if version != VERSION {
        return Err(SnapshotError::UnsupportedVersion(version));
    }

    let count = reader.u32()?;
    let mut map = FileDigestMap::new();
    for _ in 0..count {
        let len = reader.u32()? as usize;
        let path = std::str::from_utf8(reader.take(len)?)
            .map_err(|_| SnapshotError::InvalidPath)?
            .to_string();
        let mut digest = [0u8; DIGEST_LEN];
        digest.copy_from_slice(reader.take(DIGEST_LEN)?);

        if map.insert(path.clone(), Digest::from_bytes(digest)).is_some() {
            return Err(SnapshotError::DuplicatePath(path));
        }
    }

    let rest = bytes.len() - reader.pos;
    if rest != 0 {
        return Err(SnapshotError::TrailingBytes(rest));
    }
    Ok(map)
}

struct Reader<'a> {
    bytes: &'a [u8],
    pos: usize,
}

impl<'a> Reader<'a> {
    fn take(&mut self, n: usize) -> std::result::Result<&'a [u8], SnapshotError> {
        let end = self
            .pos
            .checked_add(n)
            .filter(|end| *end <= self.bytes.len())
            .ok_or(SnapshotError::Truncated(self.pos))?;
        let slice = &self.bytes[self.pos..end];
        self.pos = end;
        Ok(slice)
    }

    fn u32(&mut self) -> std::result::Result<u32, SnapshotError> {
        let mut raw = [0u8; 4];
        raw.copy_from_slice(self.take(4)?);
        Ok(u32::from_le_bytes(raw))
    }
}

/// Load the previous snapshot.
///
/// Returns `None` when there is no usable snapshot. The snapshot is advisory:
/// an unreadable or corrupt state file is logged and treated as absent, which
/// forces a rebuild. `Some` of an empty map is a valid snapshot of an empty
/// watched set.
pub fn load_snapshot(fs: &dyn FileSystem, path: &Path) -> Option<FileDigestMap> {
    if !fs.exists(path) {
        debug!(path = ?path, "no previous snapshot");
        return None;
    }

    let bytes = match fs.read(path) {
        Ok(bytes) => bytes,
        Err(e) => {
            warn!(path = ?path, error = %format!("{e:#}"), "cannot read snapshot; treating as absent");
            return None;
        }
    };

    match decode_snapshot(&bytes) {
        Ok(map) => {
            debug!(path = ?path, entries = map.len(), "loaded previous snapshot");
            Some(map)
        }
        Err(e) => {
            warn!(path = ?path, error = %e, "corrupt snapshot; treating as absent");
            None
        }
    }
}

/// Replace the state file with `map`.
pub fn persist_snapshot(fs: &dyn FileSystem, map: &FileDigestMap, path: &Path) -> Result<()> {
    fs.write(path, &encode_snapshot(map))
        .with_context(|| format!("persisting snapshot to {:?}", path))?;
    info!(path = ?path, entries = map.len(), "stored digest snapshot");
    Ok(())
}
