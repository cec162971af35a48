// src/watch/mod.rs

//! File watching.
//!
//! This module is responsible for:
//! - Deciding which paths are excluded (`--ex` substring patterns).
//! - Wiring up the platform filesystem watcher (`notify`) and forwarding its
//!   events and errors into Tokio channels.
//! - Walking the directory tree and registering each directory.
//!
//! It does **not** know about the supervised process; the event loop in
//! [`crate::engine`] turns changes into restarts.

pub mod event;
pub mod exclude;
pub mod notifier;
pub mod registrar;

pub use event::{classify, ChangeKind, FsEvent};
pub use exclude::ExclusionList;
pub use notifier::{
    notifier_channels, NotifierSenders, NotifierStreams, NotifyWatcher, WatchRegistry, WatchSet,
};
pub use registrar::{add_watchers_recursively, register_created_path};
