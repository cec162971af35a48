// src/exec/supervisor.rs

//! Lifecycle of the single supervised child: start, kill, restart.

use std::fmt;

use tracing::{debug, info};

use crate::errors::Result;
use crate::exec::backend::{ManagedProcess, ProcessBackend};
use crate::exec::command::CommandSpec;

/// Owns the one live child process.
///
/// The current process lives in an `Option` that is taken and killed before
/// a replacement is started, so two instances are never held at once. The
/// supervisor is moved into the event loop, which makes that loop its only
/// writer.
pub struct Supervisor<B: ProcessBackend> {
    backend: B,
    spec: CommandSpec,
    current: Option<B::Process>,
    restarts: u64,
}

impl<B: ProcessBackend> fmt::Debug for Supervisor<B> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Supervisor")
            .field("spec", &self.spec)
            .field("pid", &self.current_pid())
            .field("restarts", &self.restarts)
            .finish_non_exhaustive()
    }
}

impl<B: ProcessBackend> Supervisor<B> {
    /// Start the initial process.
    pub fn start(mut backend: B, spec: CommandSpec) -> Result<Self> {
        let process = backend.start(&spec)?;
        info!(cmd = %spec, pid = ?process.id(), "started command");
        Ok(Self {
            backend,
            spec,
            current: Some(process),
            restarts: 0,
        })
    }

    /// Kill the current process (best effort) and start a fresh one.
    ///
    /// If the new spawn fails the supervisor is left without a process and
    /// the error is returned; the next call starts from scratch.
    pub fn restart(&mut self) -> Result<()> {
        if let Some(old) = self.current.take() {
            debug!(pid = ?old.id(), "killing previous process");
            kill_ignoring_errors(old);
        }

        self.restarts += 1;
        let process = self.backend.start(&self.spec)?;
        info!(cmd = %self.spec, pid = ?process.id(), restarts = self.restarts, "restarted command");
        self.current = Some(process);
        Ok(())
    }

    /// Kill the current process, if any, and leave none running.
    pub fn shutdown(&mut self) {
        if let Some(old) = self.current.take() {
            debug!(pid = ?old.id(), "stopping process on shutdown");
            kill_ignoring_errors(old);
        }
    }

    pub fn current_pid(&self) -> Option<u32> {
        self.current.as_ref().and_then(|p| p.id())
    }

    /// True while a process handle is held (it may have exited on its own).
    pub fn has_process(&self) -> bool {
        self.current.is_some()
    }

    /// Number of restarts attempted so far.
    pub fn restarts(&self) -> u64 {
        self.restarts
    }
}

/// Kill policy for replaced processes: errors are dropped without logging.
///
/// The usual failure is that the child already exited, which is not worth
/// reporting. The handle is consumed so it cannot be reused afterwards.
pub fn kill_ignoring_errors<P: ManagedProcess>(mut process: P) {
    let _ = process.kill();
}
