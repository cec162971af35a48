// src/engine/mod.rs

//! Event loop for watchrun.
//!
//! The loop reacts to:
//! - filesystem changes (write → restart, create → watch path + restart)
//! - watcher errors (logged only)
//! - cancellation (Ctrl-C / SIGTERM)
//!
//! The synchronous transitions live on [`EventLoop`] as `handle_*` methods so
//! they can be unit tested step by step; [`EventLoop::run`] is the async
//! shell that selects over the channels.

pub mod event_loop;

pub use event_loop::{EventLoop, Finished, Step};

/// Why the event loop stopped.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoopExit {
    /// The cancellation token fired.
    Cancelled,
    /// The change-event stream closed.
    EventsClosed,
    /// The error stream closed.
    ErrorsClosed,
}

impl LoopExit {
    /// True when the loop stopped because it was asked to.
    pub fn is_graceful(self) -> bool {
        matches!(self, LoopExit::Cancelled)
    }
}
