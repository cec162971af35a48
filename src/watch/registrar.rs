// src/watch/registrar.rs

//! Depth-first registration of a directory tree with a [`WatchRegistry`].

use std::path::Path;

use tracing::{debug, info};

use crate::errors::{Result, WatchrunError};
use crate::fs::FileSystem;
use crate::watch::exclude::ExclusionList;
use crate::watch::notifier::WatchRegistry;

/// Register `root` and every directory below it, skipping excluded subtrees.
///
/// An excluded path is neither registered nor descended into. Any failure to
/// register a path or to list a directory aborts the walk and is returned
/// as-is; callers treat it as fatal.
///
/// Children are addressed by joining the entry name onto the parent, so a
/// walk from `"."` yields `"./src"`, `"./src/bin"`, and so on. Those strings
/// are what exclusion patterns are matched against.
pub fn add_watchers_recursively<R>(
    registry: &mut R,
    fs: &dyn FileSystem,
    exclusions: &ExclusionList,
    root: &Path,
) -> Result<()>
where
    R: WatchRegistry + ?Sized,
{
    debug!(path = ?root, "adding watcher");
    if exclusions.is_path_excluded(root) {
        info!(path = ?root, "excluding");
        return Ok(());
    }

    registry.add(root)?;

    let entries = fs.read_dir(root).map_err(|source| WatchrunError::ReadDir {
        path: root.to_path_buf(),
        source,
    })?;

    for entry in entries.into_iter().filter(|e| e.is_dir) {
        add_watchers_recursively(registry, fs, exclusions, &entry.path)?;
    }

    Ok(())
}

/// Register a single path reported by a create event.
///
/// The path's own children are not walked. Returns `Ok(false)` when the path
/// is excluded and was therefore skipped.
pub fn register_created_path<R>(
    registry: &mut R,
    exclusions: &ExclusionList,
    path: &Path,
) -> Result<bool>
where
    R: WatchRegistry + ?Sized,
{
    if exclusions.is_path_excluded(path) {
        debug!(?path, "created path is excluded; not watching");
        return Ok(false);
    }
    registry.add(path)?;
    Ok(true)
}
