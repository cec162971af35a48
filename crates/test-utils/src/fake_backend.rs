use std::io;
use std::sync::{Arc, Mutex};

use watchrun::errors::{Result, WatchrunError};
use watchrun::exec::{CommandSpec, ManagedProcess, ProcessBackend};

/// Everything the fake backend observed, shared with the test body.
#[derive(Debug, Default, Clone)]
pub struct ProcessLog {
    /// `(pid, argv)` for every successful start, in order.
    pub started: Vec<(u32, Vec<String>)>,
    /// Pids that received a kill, in order.
    pub killed: Vec<u32>,
}

impl ProcessLog {
    pub fn start_count(&self) -> usize {
        self.started.len()
    }

    pub fn pids(&self) -> Vec<u32> {
        self.started.iter().map(|(pid, _)| *pid).collect()
    }

    /// Pids started but not yet killed.
    pub fn live(&self) -> Vec<u32> {
        self.pids()
            .into_iter()
            .filter(|pid| !self.killed.contains(pid))
            .collect()
    }
}

/// A process backend that hands out fake pids instead of spawning.
#[derive(Debug, Clone)]
pub struct FakeBackend {
    log: Arc<Mutex<ProcessLog>>,
    next_pid: Arc<Mutex<u32>>,
    fail_starts: Arc<Mutex<usize>>,
}

impl FakeBackend {
    pub fn new() -> Self {
        Self {
            log: Arc::default(),
            next_pid: Arc::new(Mutex::new(1000)),
            fail_starts: Arc::default(),
        }
    }

    /// Snapshot of what happened so far.
    pub fn log(&self) -> ProcessLog {
        self.log.lock().unwrap().clone()
    }

    /// Make the next `n` starts fail with a spawn error.
    pub fn fail_next_starts(&self, n: usize) {
        *self.fail_starts.lock().unwrap() = n;
    }
}

impl Default for FakeBackend {
    fn default() -> Self {
        Self::new()
    }
}

impl ProcessBackend for FakeBackend {
    type Process = FakeProcess;

    fn start(&mut self, spec: &CommandSpec) -> Result<FakeProcess> {
        {
            let mut remaining = self.fail_starts.lock().unwrap();
            if *remaining > 0 {
                *remaining -= 1;
                return Err(WatchrunError::Spawn {
                    command: spec.to_string(),
                    source: io::Error::from(io::ErrorKind::NotFound),
                });
            }
        }

        let pid = {
            let mut next = self.next_pid.lock().unwrap();
            *next += 1;
            *next
        };
        self.log.lock().unwrap().started.push((pid, spec.argv()));

        Ok(FakeProcess {
            pid,
            log: Arc::clone(&self.log),
        })
    }
}

/// Handle produced by [`FakeBackend`].
#[derive(Debug)]
pub struct FakeProcess {
    pid: u32,
    log: Arc<Mutex<ProcessLog>>,
}

impl ManagedProcess for FakeProcess {
    fn id(&self) -> Option<u32> {
        Some(self.pid)
    }

    fn kill(&mut self) -> io::Result<()> {
        let mut log = self.log.lock().unwrap();
        if log.killed.contains(&self.pid) {
            return Err(io::Error::new(io::ErrorKind::NotFound, "no such process"));
        }
        log.killed.push(self.pid);
        Ok(())
    }
}
