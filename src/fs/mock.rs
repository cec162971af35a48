// src/fs/mock.rs

use super::{DirEntry, FileSystem};
use anyhow::{anyhow, Result};
use std::collections::{HashMap, HashSet};
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};

#[derive(Debug, Clone)]
pub enum MockEntry {
    File,
    Dir(Vec<String>), // child names, in insertion order
}

/// In-memory tree rooted at `.`.
///
/// Paths are stored exactly as given (`./src`, `./src/lib`, ...), so tests
/// should build them the same way the registrar does: by joining onto `.`.
#[derive(Debug, Clone)]
pub struct MockFileSystem {
    entries: Arc<Mutex<HashMap<PathBuf, MockEntry>>>,
    failing: Arc<Mutex<HashSet<PathBuf>>>,
    reads: Arc<Mutex<Vec<PathBuf>>>,
}

impl MockFileSystem {
    pub fn new() -> Self {
        let mut entries = HashMap::new();
        entries.insert(PathBuf::from("."), MockEntry::Dir(Vec::new()));

        Self {
            entries: Arc::new(Mutex::new(entries)),
            failing: Arc::default(),
            reads: Arc::default(),
        }
    }

    /// Add a directory (and any missing parents).
    pub fn add_dir(&self, path: impl AsRef<Path>) {
        let mut entries = self.entries.lock().unwrap();
        Self::ensure_dir_entry(&mut entries, path.as_ref());
    }

    /// Add a file (and any missing parent directories).
    pub fn add_file(&self, path: impl AsRef<Path>) {
        let path = path.as_ref();
        let mut entries = self.entries.lock().unwrap();
        entries.insert(path.to_path_buf(), MockEntry::File);
        Self::link_to_parent(&mut entries, path);
    }

    /// Make `read_dir` fail for this path.
    pub fn fail_read_dir(&self, path: impl AsRef<Path>) {
        self.failing.lock().unwrap().insert(path.as_ref().to_path_buf());
    }

    /// Every path `read_dir` was called with, in call order.
    pub fn reads(&self) -> Vec<PathBuf> {
        self.reads.lock().unwrap().clone()
    }

    fn ensure_dir_entry(entries: &mut HashMap<PathBuf, MockEntry>, path: &Path) {
        if entries.contains_key(path) {
            return;
        }
        entries.insert(path.to_path_buf(), MockEntry::Dir(Vec::new()));
        Self::link_to_parent(entries, path);
    }

    fn link_to_parent(entries: &mut HashMap<PathBuf, MockEntry>, path: &Path) {
        let Some(parent) = path.parent() else {
            return;
        };
        let parent = if parent.as_os_str().is_empty() {
            Path::new(".")
        } else {
            parent
        };
        if parent == path {
            return;
        }

        Self::ensure_dir_entry(entries, parent);
        if let (Some(MockEntry::Dir(children)), Some(name)) =
            (entries.get_mut(parent), path.file_name().and_then(|n| n.to_str()))
        {
            if !children.iter().any(|c| c == name) {
                children.push(name.to_string());
            }
        }
    }
}

impl Default for MockFileSystem {
    fn default() -> Self {
        Self::new()
    }
}

impl FileSystem for MockFileSystem {
    fn read_dir(&self, path: &Path) -> Result<Vec<DirEntry>> {
        self.reads.lock().unwrap().push(path.to_path_buf());

        if self.failing.lock().unwrap().contains(path) {
            return Err(anyhow!("permission denied: {:?}", path));
        }

        let entries = self.entries.lock().unwrap();
        match entries.get(path) {
            Some(MockEntry::Dir(children)) => Ok(children
                .iter()
                .map(|name| {
                    let child = path.join(name);
                    let is_dir = matches!(entries.get(&child), Some(MockEntry::Dir(_)));
                    DirEntry { path: child, is_dir }
                })
                .collect()),
            _ => Err(anyhow!("Not a directory or not found: {:?}", path)),
        }
    }
}
