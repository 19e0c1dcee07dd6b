// src/fs/mod.rs

//! Filesystem access used by the detector.
//!
//! Scanning, hashing and snapshot persistence all go through [`FileSystem`]
//! so tests can run the full detection flow against [`mock::MockFileSystem`].

use std::fmt::Debug;
use std::fs;
use std::io::Read;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};

pub mod mock;

/// Filesystem operations the detector needs.
pub trait FileSystem: Send + Sync + Debug {
    fn open_read(&self, path: &Path) -> Result<Box<dyn Read + Send>>;

    /// Replace the contents of `path`, creating parent directories as needed.
    fn write(&self, path: &Path, contents: &[u8]) -> Result<()>;
    fn exists(&self, path: &Path) -> bool;
    fn is_file(&self, path: &Path) -> bool;
    fn is_dir(&self, path: &Path) -> bool;

    /// Full paths of the entries of `path`, in no particular order.
    fn read_dir(&self, path: &Path) -> Result<Vec<PathBuf>>;

    /// Whole file contents; used for the state file.
    fn read(&self, path: &Path) -> Result<Vec<u8>> {
        let mut buf = Vec::new();
        self.open_read(path)?
            .read_to_end(&mut buf)
            .with_context(|| format!("reading {}", path.display()))?;
        Ok(buf)
    }
}

/// The host filesystem.
#[derive(Debug, Clone, Default)]
pub struct RealFileSystem;

impl FileSystem for RealFileSystem {
    fn open_read(&self, path: &Path) -> Result<Box<dyn Read + Send>> {
        let file = fs::File::open(path).with_context(|| format!("opening {}", path.display()))?;
        Ok(Box::new(file))
    }

    fn write(&self, path: &Path, contents: &[u8]) -> Result<()> {
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent)
                .with_context(|| format!("creating {}", parent.display()))?;
        }
        fs::write(path, contents).with_context(|| format!("writing {}", path.display()))
    }

    fn exists(&self, path: &Path) -> bool {
        path.exists()
    }

    fn is_file(&self, path: &Path) -> bool {
        path.is_file()
    }

    fn is_dir(&self, path: &Path) -> bool {
        path.is_dir()
    }

    fn read_dir(&self, path: &Path) -> Result<Vec<PathBuf>> {
        fs::read_dir(path)
            .with_context(|| format!("listing {}", path.display()))?
            .map(|entry| {
                entry
                    .map(|e| e.path())
                    .with_context(|| format!("listing {}", path.display()))
            })
            .collect()
    }
}
