// src/fs/mod.rs

//! Filesystem seam used by the watch registrar.
//!
//! Directory walking goes through [`FileSystem`] so the registrar can be
//! exercised against [`mock::MockFileSystem`] without touching the disk.

use std::fmt::Debug;
use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};

pub mod mock;

/// One immediate child of a directory.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DirEntry {
    /// Parent path joined with the entry name.
    pub path: PathBuf,
    /// True for real directories. Symlinks are reported as non-directories.
    pub is_dir: bool,
}

/// Abstract filesystem interface.
pub trait FileSystem: Send + Sync + Debug {
    /// List the immediate entries of a directory.
    fn read_dir(&self, path: &Path) -> Result<Vec<DirEntry>>;
}

/// Implementation that uses `std::fs`.
#[derive(Debug, Clone, Default)]
pub struct RealFileSystem;

impl FileSystem for RealFileSystem {
    fn read_dir(&self, path: &Path) -> Result<Vec<DirEntry>> {
        let mut entries = Vec::new();
        for entry in fs::read_dir(path).with_context(|| format!("opening dir {:?}", path))? {
            let entry = entry.with_context(|| format!("reading entry of {:?}", path))?;
            let file_type = entry
                .file_type()
                .with_context(|| format!("stat {:?}", entry.path()))?;
            entries.push(DirEntry {
                path: entry.path(),
                is_dir: file_type.is_dir(),
            });
        }
        Ok(entries)
    }
}
