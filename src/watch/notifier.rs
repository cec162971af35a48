// src/watch/notifier.rs

//! Adapter around `notify`'s `RecommendedWatcher`.
//!
//! Every directory is registered individually (non-recursive mode); the
//! recursion is done by the registrar so exclusions can prune whole
//! subtrees. Events and errors from the notify backend thread are forwarded
//! into two unbounded Tokio channels that the event loop selects over.

use std::collections::BTreeSet;
use std::fmt;
use std::path::{Path, PathBuf};

use notify::{Config, Event, RecommendedWatcher, RecursiveMode, Watcher};
use tokio::sync::mpsc;
use tracing::{debug, trace};

use crate::errors::{Result, WatchrunError};
use crate::watch::event::{classify, FsEvent};

/// Paths currently subscribed to change notifications.
///
/// Only grows: deletions are not tracked. Each path is stored once.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct WatchSet {
    paths: BTreeSet<PathBuf>,
}

impl WatchSet {
    /// Record `path`; returns false if it was already present.
    pub fn insert(&mut self, path: impl Into<PathBuf>) -> bool {
        self.paths.insert(path.into())
    }

    pub fn contains(&self, path: impl AsRef<Path>) -> bool {
        self.paths.contains(path.as_ref())
    }

    pub fn len(&self) -> usize {
        self.paths.len()
    }

    pub fn is_empty(&self) -> bool {
        self.paths.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &PathBuf> {
        self.paths.iter()
    }
}

/// The "add path" capability of the notification subsystem.
pub trait WatchRegistry: Send + 'static {
    /// Subscribe to changes of `path` (not its descendants).
    fn add(&mut self, path: &Path) -> Result<()>;

    fn watch_set(&self) -> &WatchSet;
}

/// Receiving halves of the notification channels.
#[derive(Debug)]
pub struct NotifierStreams {
    pub events: mpsc::UnboundedReceiver<FsEvent>,
    pub errors: mpsc::UnboundedReceiver<notify::Error>,
}

/// Sending halves of the notification channels.
#[derive(Debug, Clone)]
pub struct NotifierSenders {
    pub events: mpsc::UnboundedSender<FsEvent>,
    pub errors: mpsc::UnboundedSender<notify::Error>,
}

impl NotifierSenders {
    /// Forward one raw notify callback result.
    pub fn forward(&self, res: notify::Result<Event>) {
        match res {
            Ok(event) => {
                trace!(?event, "raw notify event");
                for fs_event in classify(&event) {
                    if self.events.send(fs_event).is_err() {
                        debug!("event receiver dropped; discarding notify event");
                        return;
                    }
                }
            }
            Err(err) => {
                if self.errors.send(err).is_err() {
                    debug!("error receiver dropped; discarding notify error");
                }
            }
        }
    }
}

/// Create a connected sender/receiver pair for events and errors.
pub fn notifier_channels() -> (NotifierSenders, NotifierStreams) {
    let (events_tx, events_rx) = mpsc::unbounded_channel();
    let (errors_tx, errors_rx) = mpsc::unbounded_channel();
    (
        NotifierSenders { events: events_tx, errors: errors_tx },
        NotifierStreams { events: events_rx, errors: errors_rx },
    )
}

/// Production [`WatchRegistry`] backed by `notify`.
///
/// Dropping it stops the backend, which closes both streams.
pub struct NotifyWatcher {
    inner: RecommendedWatcher,
    watched: WatchSet,
}

impl fmt::Debug for NotifyWatcher {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("NotifyWatcher")
            .field("watched", &self.watched.len())
            .finish_non_exhaustive()
    }
}

impl NotifyWatcher {
    /// Construct the watcher and the streams it feeds.
    pub fn new() -> Result<(Self, NotifierStreams)> {
        let (senders, streams) = notifier_channels();

        let inner = RecommendedWatcher::new(
            move |res: notify::Result<Event>| senders.forward(res),
            Config::default(),
        )
        .map_err(WatchrunError::Notifier)?;

        Ok((
            Self {
                inner,
                watched: WatchSet::default(),
            },
            streams,
        ))
    }
}

impl WatchRegistry for NotifyWatcher {
    fn add(&mut self, path: &Path) -> Result<()> {
        self.inner
            .watch(path, RecursiveMode::NonRecursive)
            .map_err(|source| WatchrunError::Watch {
                path: path.to_path_buf(),
                source,
            })?;
        self.watched.insert(path);
        Ok(())
    }

    fn watch_set(&self) -> &WatchSet {
        &self.watched
    }
}

#[cfg(test)]
mod tests {
    use notify::event::{AccessKind, CreateKind};
    use notify::EventKind;

    use super::*;

    #[test]
    fn watch_set_keeps_each_path_once() {
        let mut set = WatchSet::default();
        assert!(set.insert("./src"));
        assert!(!set.insert("./src"));
        assert!(set.insert("./tests"));
        assert_eq!(set.len(), 2);
        assert!(set.contains("./src"));
        assert!(!set.contains("./target"));
    }

    #[test]
    fn forward_splits_events_and_errors() {
        let (senders, mut streams) = notifier_channels();

        senders.forward(Ok(Event::new(EventKind::Create(CreateKind::File)).add_path("./a".into())));
        senders.forward(Ok(Event::new(EventKind::Access(AccessKind::Any)).add_path("./b".into())));
        senders.forward(Err(notify::Error::generic("queue overflow")));

        assert_eq!(streams.events.try_recv().unwrap(), FsEvent::create("./a"));
        assert!(streams.events.try_recv().is_err());
        let err = streams.errors.try_recv().unwrap();
        assert!(err.to_string().contains("queue overflow"));
    }

    #[test]
    fn forward_after_receivers_dropped_is_silent() {
        let (senders, streams) = notifier_channels();
        drop(streams);
        senders.forward(Ok(Event::new(EventKind::Create(CreateKind::File)).add_path("./a".into())));
        senders.forward(Err(notify::Error::generic("late")));
    }

    #[test]
    fn notify_watcher_registers_directories() {
        let tmp = tempfile::tempdir().unwrap();
        let (mut watcher, _streams) = NotifyWatcher::new().unwrap();

        watcher.add(tmp.path()).unwrap();

        assert!(watcher.watch_set().contains(tmp.path()));
    }

    #[test]
    fn notify_watcher_reports_missing_paths() {
        let tmp = tempfile::tempdir().unwrap();
        let missing = tmp.path().join("gone");
        let (mut watcher, _streams) = NotifyWatcher::new().unwrap();

        match watcher.add(&missing) {
            Err(WatchrunError::Watch { path, .. }) => assert_eq!(path, missing),
            other => panic!("expected Watch error, got {other:?}"),
        }
        assert!(watcher.watch_set().is_empty());
    }
}
