// src/lib.rs

pub mod cli;
pub mod engine;
pub mod errors;
pub mod exec;
pub mod fs;
pub mod logging;
pub mod watch;

use tokio_util::sync::CancellationToken;
use tracing::{info, warn};

use crate::cli::CliArgs;
use crate::engine::{EventLoop, LoopExit};
use crate::errors::{Result, WatchrunError};
use crate::exec::{CommandSpec, Supervisor, TokioProcessBackend};
use crate::fs::RealFileSystem;
use crate::watch::{add_watchers_recursively, ExclusionList, NotifyWatcher, WatchRegistry};

/// High-level entry point used by `main.rs`.
///
/// This wires together:
/// - command parsing and the exclusion list
/// - the `notify` watcher and the recursive registration of `--root`
/// - the initial child process
/// - Ctrl-C / SIGTERM handling
///
/// and then waits for the event loop task. Returns `Ok(())` after a
/// requested shutdown, or [`WatchrunError::NotifierClosed`] if the watcher
/// stopped delivering events.
pub async fn run(args: CliArgs) -> Result<()> {
    let raw = args.command.as_deref().ok_or(WatchrunError::MissingCommand)?;
    let spec = CommandSpec::parse(raw)?;

    let exclusions = ExclusionList::new(args.exclude);
    info!(patterns = ?exclusions.patterns(), "exclusion patterns");

    let (mut watcher, streams) = NotifyWatcher::new()?;
    add_watchers_recursively(&mut watcher, &RealFileSystem, &exclusions, &args.root)?;
    info!(
        root = ?args.root,
        directories = watcher.watch_set().len(),
        "watching for changes"
    );

    let supervisor = Supervisor::start(TokioProcessBackend, spec)?;

    let cancel = CancellationToken::new();
    spawn_shutdown_listener(cancel.clone());

    let event_loop = EventLoop::new(watcher, supervisor, exclusions, streams, cancel);
    let finished = tokio::spawn(event_loop.run())
        .await
        .map_err(anyhow::Error::from)?;

    match finished.exit {
        LoopExit::Cancelled => Ok(()),
        LoopExit::EventsClosed | LoopExit::ErrorsClosed => Err(WatchrunError::NotifierClosed),
    }
}

/// Cancel `token` on Ctrl-C (and SIGTERM on Unix).
fn spawn_shutdown_listener(token: CancellationToken) {
    tokio::spawn(async move {
        if let Err(e) = shutdown_signal().await {
            warn!(error = %e, "failed to listen for shutdown signals");
            return;
        }
        info!("shutdown requested");
        token.cancel();
    });
}

#[cfg(unix)]
async fn shutdown_signal() -> std::io::Result<()> {
    use tokio::signal::unix::{signal, SignalKind};

    let mut terminate = signal(SignalKind::terminate())?;
    tokio::select! {
        res = tokio::signal::ctrl_c() => res,
        _ = terminate.recv() => Ok(()),
    }
}

#[cfg(not(unix))]
async fn shutdown_signal() -> std::io::Result<()> {
    tokio::signal::ctrl_c().await
}
