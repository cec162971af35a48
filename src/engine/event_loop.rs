// src/engine/event_loop.rs

use std::fmt;

use tokio_util::sync::CancellationToken;
use tracing::{debug, error, info, warn};

use crate::engine::LoopExit;
use crate::exec::{ProcessBackend, Supervisor};
use crate::watch::{
    register_created_path, ChangeKind, ExclusionList, FsEvent, NotifierStreams, WatchRegistry,
};

/// What a single transition did.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Step {
    /// The command was restarted successfully.
    pub restarted: bool,
    /// The event path was added to the watch set.
    pub registered: bool,
}

/// State handed back once [`EventLoop::run`] returns.
pub struct Finished<R: WatchRegistry, B: ProcessBackend> {
    pub exit: LoopExit,
    pub registry: R,
    pub supervisor: Supervisor<B>,
}

impl<R: WatchRegistry, B: ProcessBackend> fmt::Debug for Finished<R, B> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Finished")
            .field("exit", &self.exit)
            .field("supervisor", &self.supervisor)
            .finish_non_exhaustive()
    }
}

/// Owns everything the event handling needs: the registry, the supervisor
/// and both notification streams.
///
/// Being the sole owner of the [`Supervisor`] is what guarantees a single
/// writer for the live process handle.
pub struct EventLoop<R: WatchRegistry, B: ProcessBackend> {
    registry: R,
    supervisor: Supervisor<B>,
    exclusions: ExclusionList,
    streams: NotifierStreams,
    cancel: CancellationToken,
}

impl<R: WatchRegistry, B: ProcessBackend> fmt::Debug for EventLoop<R, B> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("EventLoop")
            .field("supervisor", &self.supervisor)
            .field("exclusions", &self.exclusions)
            .field("watched", &self.registry.watch_set().len())
            .finish_non_exhaustive()
    }
}

/// Outcome of one `select!` round.
enum Next {
    Event(FsEvent),
    Error(notify::Error),
    Stop(LoopExit),
}

impl<R: WatchRegistry, B: ProcessBackend> EventLoop<R, B> {
    pub fn new(
        registry: R,
        supervisor: Supervisor<B>,
        exclusions: ExclusionList,
        streams: NotifierStreams,
        cancel: CancellationToken,
    ) -> Self {
        Self {
            registry,
            supervisor,
            exclusions,
            streams,
            cancel,
        }
    }

    /// Consume events until cancelled or until a stream closes.
    ///
    /// Events are handled one at a time with no coalescing, so a burst of N
    /// writes produces N restarts. On exit the current child is killed.
    pub async fn run(mut self) -> Finished<R, B> {
        info!("event loop started");

        let exit = loop {
            let next = tokio::select! {
                biased;
                _ = self.cancel.cancelled() => Next::Stop(LoopExit::Cancelled),
                event = self.streams.events.recv() => match event {
                    Some(event) => Next::Event(event),
                    None => Next::Stop(LoopExit::EventsClosed),
                },
                err = self.streams.errors.recv() => match err {
                    Some(err) => Next::Error(err),
                    None => Next::Stop(LoopExit::ErrorsClosed),
                },
            };

            match next {
                Next::Event(event) => {
                    self.handle_event(event);
                }
                Next::Error(err) => self.handle_error(&err),
                Next::Stop(exit) => break exit,
            }
        };

        match exit {
            LoopExit::Cancelled => info!("event loop cancelled"),
            LoopExit::EventsClosed | LoopExit::ErrorsClosed => {
                warn!(?exit, "watcher stream closed; no further changes will be seen")
            }
        }

        self.supervisor.shutdown();

        Finished {
            exit,
            registry: self.registry,
            supervisor: self.supervisor,
        }
    }

    /// Apply one change event.
    pub fn handle_event(&mut self, event: FsEvent) -> Step {
        let mut step = Step {
            restarted: false,
            registered: false,
        };

        match event.kind {
            ChangeKind::Write => {
                info!(path = ?event.path, "modified file");
            }
            ChangeKind::Create => {
                info!(path = ?event.path, "created file");
                // The path may already be gone (editor temp files); keep going.
                match register_created_path(&mut self.registry, &self.exclusions, &event.path) {
                    Ok(added) => step.registered = added,
                    Err(err) => warn!(path = ?event.path, error = %err, "could not watch created path"),
                }
            }
        }

        match self.supervisor.restart() {
            Ok(()) => step.restarted = true,
            Err(err) => error!(error = %err, "failed to restart command"),
        }

        debug!(?step, pid = ?self.supervisor.current_pid(), "event handled");
        step
    }

    /// Log a watcher error. Never restarts, never stops the loop.
    pub fn handle_error(&self, err: &notify::Error) {
        error!(error = %err, "watch error");
    }

    pub fn registry(&self) -> &R {
        &self.registry
    }

    pub fn supervisor(&self) -> &Supervisor<B> {
        &self.supervisor
    }
}
