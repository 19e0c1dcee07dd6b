// src/detect/mod.rs

//! Content change detection.
//!
//! - [`scan`] resolves the watched roots/files and hashes them.
//! - [`digest`] holds the per-file BLAKE3 digest and [`FileDigestMap`].
//! - [`snapshot`] persists the map of the last successful build.
//! - [`decide`] compares two maps.
//!
//! Nothing here runs commands; see [`crate::exec`] for that.

pub mod decide;
pub mod digest;
pub mod scan;
pub mod snapshot;

pub use decide::{decide, ChangeSet};
pub use digest::{compute_file_digest, Digest, FileDigestMap};
pub use scan::{compute_digests, WatchSet};
pub use snapshot::{load_snapshot, persist_snapshot};
