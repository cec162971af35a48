use std::collections::HashSet;
use std::path::{Path, PathBuf};

use watchrun::errors::{Result, WatchrunError};
use watchrun::watch::{WatchRegistry, WatchSet};

/// In-memory [`WatchRegistry`] that records every `add` call.
#[derive(Debug, Default, Clone)]
pub struct RecordingRegistry {
    set: WatchSet,
    calls: Vec<PathBuf>,
    reject: HashSet<PathBuf>,
}

impl RecordingRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Make `add(path)` fail like a vanished path would.
    pub fn reject(mut self, path: impl Into<PathBuf>) -> Self {
        self.reject.insert(path.into());
        self
    }

    /// Every successful `add`, in call order (duplicates included).
    pub fn calls(&self) -> &[PathBuf] {
        &self.calls
    }
}

impl WatchRegistry for RecordingRegistry {
    fn add(&mut self, path: &Path) -> Result<()> {
        if self.reject.contains(path) {
            return Err(WatchrunError::Watch {
                path: path.to_path_buf(),
                source: notify::Error::path_not_found().add_path(path.to_path_buf()),
            });
        }
        self.calls.push(path.to_path_buf());
        self.set.insert(path);
        Ok(())
    }

    fn watch_set(&self) -> &WatchSet {
        &self.set
    }
}
