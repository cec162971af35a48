// src/exec/backend.rs

//! Pluggable process backend.
//!
//! The [`Supervisor`](super::Supervisor) talks to a `ProcessBackend` instead of
//! `tokio::process` directly, so tests can swap in a fake that records starts
//! and kills without spawning anything.
//!
//! - [`TokioProcessBackend`] is the production implementation. Children
//!   inherit our stdout/stderr, get no stdin, and are killed if their handle
//!   is dropped.
//! - [`ManagedProcess`] is the handle the supervisor owns for the one live
//!   child.

use std::io;
use std::process::Stdio;

use tokio::process::{Child, Command};
use tracing::debug;

use crate::errors::{Result, WatchrunError};
use crate::exec::command::CommandSpec;

/// Handle to a started child process.
pub trait ManagedProcess: Send + 'static {
    /// OS process id, if the process has not been reaped yet.
    fn id(&self) -> Option<u32>;

    /// Send a forceful termination signal (SIGKILL on Unix).
    fn kill(&mut self) -> io::Result<()>;
}

/// Trait abstracting how the supervised command is launched.
pub trait ProcessBackend: Send + 'static {
    type Process: ManagedProcess;

    /// Launch `spec` and return immediately, without waiting for it to exit.
    fn start(&mut self, spec: &CommandSpec) -> Result<Self::Process>;
}

/// Production backend built on `tokio::process`.
///
/// Must be used from within a Tokio runtime.
#[derive(Debug, Clone, Copy, Default)]
pub struct TokioProcessBackend;

impl ProcessBackend for TokioProcessBackend {
    type Process = ChildProcess;

    fn start(&mut self, spec: &CommandSpec) -> Result<ChildProcess> {
        let mut cmd = Command::new(spec.program());
        cmd.args(spec.args())
            .stdin(Stdio::null())
            .stdout(Stdio::inherit())
            .stderr(Stdio::inherit())
            .kill_on_drop(true);

        let child = cmd.spawn().map_err(|source| WatchrunError::Spawn {
            command: spec.to_string(),
            source,
        })?;

        debug!(pid = ?child.id(), cmd = %spec, "spawned child process");
        Ok(ChildProcess { child })
    }
}

/// A child spawned by [`TokioProcessBackend`].
#[derive(Debug)]
pub struct ChildProcess {
    child: Child,
}

impl ManagedProcess for ChildProcess {
    fn id(&self) -> Option<u32> {
        self.child.id()
    }

    fn kill(&mut self) -> io::Result<()> {
        self.child.start_kill()
    }
}
