// src/errors.rs

//! Crate-wide error type and result alias.

use std::path::PathBuf;

use thiserror::Error;

#[derive(Error, Debug)]
pub enum WatchrunError {
    #[error("command flag must be set (e.g. --command \"cargo run\")")]
    MissingCommand,

    #[error("failed to create file watcher: {0}")]
    Notifier(#[source] notify::Error),

    #[error("failed to watch {path:?}: {source}")]
    Watch {
        path: PathBuf,
        #[source]
        source: notify::Error,
    },

    #[error("failed to read directory {path:?}: {source}")]
    ReadDir {
        path: PathBuf,
        #[source]
        source: anyhow::Error,
    },

    #[error("failed to start `{command}`: {source}")]
    Spawn {
        command: String,
        #[source]
        source: std::io::Error,
    },

    #[error("file watcher closed its event streams")]
    NotifierClosed,

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

pub type Result<T> = std::result::Result<T, WatchrunError>;
