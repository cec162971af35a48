// src/exec/mod.rs

//! Process execution layer.
//!
//! - [`command`] parses the `--command` flag into a [`CommandSpec`].
//! - [`backend`] provides the `ProcessBackend` / `ManagedProcess` traits and
//!   the `tokio::process` implementation used in production.
//! - [`supervisor`] owns the single live child and implements restart.

pub mod backend;
pub mod command;
pub mod supervisor;

pub use backend::{ChildProcess, ManagedProcess, ProcessBackend, TokioProcessBackend};
pub use command::CommandSpec;
pub use supervisor::{kill_ignoring_errors, Supervisor};
