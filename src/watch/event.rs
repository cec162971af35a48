// src/watch/event.rs

//! Reducing raw `notify` events to the two kinds the event loop reacts to.

use std::path::PathBuf;

use notify::event::{ModifyKind, RenameMode};
use notify::{Event, EventKind};

/// What happened to a path.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChangeKind {
    /// File contents changed.
    Write,
    /// A file or directory appeared.
    Create,
}

/// A single relevant change for a single path.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FsEvent {
    pub kind: ChangeKind,
    pub path: PathBuf,
}

impl FsEvent {
    pub fn write(path: impl Into<PathBuf>) -> Self {
        Self { kind: ChangeKind::Write, path: path.into() }
    }

    pub fn create(path: impl Into<PathBuf>) -> Self {
        Self { kind: ChangeKind::Create, path: path.into() }
    }
}

/// Map a `notify` event to zero or more [`FsEvent`]s, one per path.
///
/// Creations and content modifications count. A path renamed into place
/// counts as a creation: `Name(To)` carries the new path, `Name(Both)`
/// carries `[from, to]` and only the destination is kept. Access, metadata,
/// removal and the source side of a rename are dropped.
///
/// On inotify an in-tree rename is reported as both `To` and `Both`, so it
/// yields two creations for the same path.
pub fn classify(event: &Event) -> Vec<FsEvent> {
    let kind = match event.kind {
        EventKind::Create(_) | EventKind::Modify(ModifyKind::Name(RenameMode::To)) => {
            ChangeKind::Create
        }
        EventKind::Modify(ModifyKind::Name(RenameMode::Both)) => {
            return event
                .paths
                .last()
                .map(|to| vec![FsEvent::create(to.clone())])
                .unwrap_or_default();
        }
        EventKind::Modify(ModifyKind::Data(_) | ModifyKind::Any) => ChangeKind::Write,
        _ => return Vec::new(),
    };

    event
        .paths
        .iter()
        .map(|path| FsEvent { kind, path: path.clone() })
        .collect()
}
