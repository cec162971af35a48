// tests/end_to_end_restart.rs
//
// Real watcher, real child processes. Each start of the supervised command
// appends a line to a log file that lives outside the watched tree.
#![cfg(unix)]

mod common;
use crate::common::init_tracing;

use std::error::Error;
use std::fs;
use std::path::Path;

use tokio::time::{sleep, timeout, Duration, Instant};
use tokio_util::sync::CancellationToken;

use watchrun::engine::{EventLoop, LoopExit};
use watchrun::exec::{CommandSpec, Supervisor, TokioProcessBackend};
use watchrun::fs::RealFileSystem;
use watchrun::watch::{add_watchers_recursively, ExclusionList, NotifyWatcher, WatchRegistry};

type TestResult = Result<(), Box<dyn Error>>;

fn line_count(path: &Path) -> usize {
    fs::read_to_string(path).map(|s| s.lines().count()).unwrap_or(0)
}

/// Poll until `path` has at least `n` lines or the deadline passes.
async fn wait_for_lines(path: &Path, n: usize, within: Duration) -> bool {
    let deadline = Instant::now() + within;
    while Instant::now() < deadline {
        if line_count(path) >= n {
            return true;
        }
        sleep(Duration::from_millis(25)).await;
    }
    line_count(path) >= n
}

#[tokio::test]
async fn writing_a_file_restarts_the_command() -> TestResult {
    init_tracing();

    let watched = tempfile::tempdir()?;
    let outside = tempfile::tempdir()?;
    fs::create_dir_all(watched.path().join("src"))?;

    let log = outside.path().join("starts.log");
    let script = outside.path().join("record.sh");
    fs::write(&script, format!("echo started >> {}\n", log.display()))?;

    let spec = CommandSpec::parse(&format!("sh {}", script.display()))?;
    let exclusions = ExclusionList::default();

    let (mut watcher, streams) = NotifyWatcher::new()?;
    add_watchers_recursively(&mut watcher, &RealFileSystem, &exclusions, watched.path())?;
    assert!(watcher.watch_set().contains(watched.path().join("src")));

    let supervisor = Supervisor::start(TokioProcessBackend, spec)?;
    assert!(wait_for_lines(&log, 1, Duration::from_secs(5)).await, "initial start");

    let cancel = CancellationToken::new();
    let handle = tokio::spawn(
        EventLoop::new(watcher, supervisor, exclusions, streams, cancel.clone()).run(),
    );

    fs::write(watched.path().join("src/main.rs"), "fn main() {}")?;
    assert!(
        wait_for_lines(&log, 2, Duration::from_secs(5)).await,
        "command should run again after a change"
    );

    cancel.cancel();
    let finished = timeout(Duration::from_secs(5), handle).await??;
    assert_eq!(finished.exit, LoopExit::Cancelled);
    assert!(finished.supervisor.restarts() >= 1);

    Ok(())
}

#[tokio::test]
async fn changes_in_excluded_directories_are_ignored() -> TestResult {
    init_tracing();

    let watched = tempfile::tempdir()?;
    let outside = tempfile::tempdir()?;
    fs::create_dir_all(watched.path().join("node_modules/pkg"))?;

    let log = outside.path().join("starts.log");
    let script = outside.path().join("record.sh");
    fs::write(&script, format!("echo started >> {}\n", log.display()))?;

    let spec = CommandSpec::parse(&format!("sh {}", script.display()))?;
    let exclusions = ExclusionList::new(vec!["node_modules".to_string()]);

    let (mut watcher, streams) = NotifyWatcher::new()?;
    add_watchers_recursively(&mut watcher, &RealFileSystem, &exclusions, watched.path())?;

    let supervisor = Supervisor::start(TokioProcessBackend, spec)?;
    assert!(wait_for_lines(&log, 1, Duration::from_secs(5)).await);

    let cancel = CancellationToken::new();
    let handle = tokio::spawn(
        EventLoop::new(watcher, supervisor, exclusions, streams, cancel.clone()).run(),
    );

    fs::write(watched.path().join("node_modules/pkg/index.js"), "x")?;
    sleep(Duration::from_millis(300)).await;

    cancel.cancel();
    let finished = timeout(Duration::from_secs(5), handle).await??;
    assert_eq!(finished.supervisor.restarts(), 0);
    assert_eq!(line_count(&log), 1);

    Ok(())
}

#[tokio::test]
async fn paths_moved_into_the_tree_count_as_created() -> TestResult {
    init_tracing();

    let watched = tempfile::tempdir()?;
    let outside = tempfile::tempdir()?;
    let staging = outside.path().join("staging");
    fs::create_dir_all(staging.join("newdir"))?;
    fs::write(staging.join("main.rs"), "fn main() {}")?;

    let log = outside.path().join("starts.log");
    let script = outside.path().join("record.sh");
    fs::write(&script, format!("echo started >> {}\n", log.display()))?;

    let spec = CommandSpec::parse(&format!("sh {}", script.display()))?;
    let exclusions = ExclusionList::default();

    let (mut watcher, streams) = NotifyWatcher::new()?;
    add_watchers_recursively(&mut watcher, &RealFileSystem, &exclusions, watched.path())?;

    let supervisor = Supervisor::start(TokioProcessBackend, spec)?;
    assert!(wait_for_lines(&log, 1, Duration::from_secs(5)).await);

    let cancel = CancellationToken::new();
    let handle = tokio::spawn(
        EventLoop::new(watcher, supervisor, exclusions, streams, cancel.clone()).run(),
    );

    // Save-by-rename, the way many editors write files.
    fs::rename(staging.join("main.rs"), watched.path().join("main.rs"))?;
    assert!(
        wait_for_lines(&log, 2, Duration::from_secs(5)).await,
        "a file renamed into place should restart the command"
    );

    let moved_dir = watched.path().join("newdir");
    fs::rename(staging.join("newdir"), &moved_dir)?;
    assert!(
        wait_for_lines(&log, 3, Duration::from_secs(5)).await,
        "a directory moved into the tree should restart the command"
    );
    sleep(Duration::from_millis(100)).await;

    cancel.cancel();
    let finished = timeout(Duration::from_secs(5), handle).await??;
    assert!(finished.supervisor.restarts() >= 2);
    assert!(finished.registry.watch_set().contains(&moved_dir));

    Ok(())
}
