#![allow(dead_code)]

pub use watchrun_test_utils::{init_tracing, with_timeout};

use tokio_util::sync::CancellationToken;

use watchrun::engine::EventLoop;
use watchrun::exec::{CommandSpec, Supervisor};
use watchrun::watch::{notifier_channels, ExclusionList, FsEvent, NotifierSenders};
use watchrun_test_utils::{FakeBackend, RecordingRegistry};

/// An event loop wired to fakes, plus the handles a test needs to drive it.
pub struct Harness {
    pub event_loop: EventLoop<RecordingRegistry, FakeBackend>,
    pub senders: NotifierSenders,
    pub backend: FakeBackend,
    pub cancel: CancellationToken,
}

impl Harness {
    pub fn new(command: &str, exclusions: &[&str]) -> Self {
        Self::with_registry(command, exclusions, RecordingRegistry::new())
    }

    pub fn with_registry(command: &str, exclusions: &[&str], registry: RecordingRegistry) -> Self {
        let backend = FakeBackend::new();
        let spec = CommandSpec::parse(command).expect("valid command");
        let supervisor = Supervisor::start(backend.clone(), spec).expect("fake start");
        let exclusions: ExclusionList = exclusions.iter().map(|p| p.to_string()).collect();
        let (senders, streams) = notifier_channels();
        let cancel = CancellationToken::new();

        let event_loop = EventLoop::new(registry, supervisor, exclusions, streams, cancel.clone());

        Self {
            event_loop,
            senders,
            backend,
            cancel,
        }
    }

    pub fn send(&self, event: FsEvent) {
        self.senders
            .events
            .send(event)
            .expect("event loop receiver alive");
    }

    pub fn send_error(&self, msg: &str) {
        self.senders
            .errors
            .send(notify::Error::generic(msg))
            .expect("event loop receiver alive");
    }
}
