//! # LogWriter: simple event printer
//!
//! A minimal subscriber that prints incoming [`Event`]s to stdout.
//! Use it for tests or demos.
//!
//! ## Example output
//! ```text
//! [launch-requested] thread=Some("main")
//! [host-ready]
//! [worker-spawned] thread=Some("loopvisor-worker")
//! [loop-acquired] thread=Some("loopvisor-worker")
//! [callback-invoked] thread=Some("loopvisor-worker")
//! [loop-entered] thread=Some("loopvisor-worker")
//! [shutdown-signaled] exit_code=Some(0)
//! [launch-finished] exit_code=Some(0)
//! ```

use crate::events::{Event, EventKind};
use crate::subscribers::Subscribe;
use async_trait::async_trait;

/// Event writer subscriber.
#[derive(Default)]
pub struct LogWriter;

impl LogWriter {
    /// Construct a new [`LogWriter`].
    #[must_use]
    pub fn new() -> Self {
        Self
    }
}

#[async_trait]
impl Subscribe for LogWriter {
    async fn on_event(&self, e: &Event) {
        match e.kind {
            EventKind::LaunchRequested => {
                println!("[launch-requested] thread={:?}", e.thread);
            }
            EventKind::WindowingInitialized => {
                println!("[windowing-initialized]");
            }
            EventKind::HostReady => {
                println!("[host-ready]");
            }
            EventKind::WorkerSpawned => {
                println!("[worker-spawned] thread={:?}", e.thread);
            }
            EventKind::SpawnFailed => {
                println!(
                    "[spawn-failed] err={:?} exit_code={:?}",
                    e.reason, e.exit_code
                );
            }
            EventKind::LaunchFinished => {
                println!("[launch-finished] exit_code={:?}", e.exit_code);
            }
            EventKind::LoopAcquired => {
                println!("[loop-acquired] thread={:?}", e.thread);
            }
            EventKind::LoopDelegated => {
                println!("[loop-delegated] thread={:?} err={:?}", e.thread, e.reason);
            }
            EventKind::ToolkitInitFailed => {
                println!(
                    "[toolkit-init-failed] err={:?} exit_code={:?}",
                    e.reason, e.exit_code
                );
            }
            EventKind::CallbackInvoked => {
                println!("[callback-invoked] thread={:?}", e.thread);
            }
            EventKind::LoopEntered => {
                println!("[loop-entered] thread={:?}", e.thread);
            }
            EventKind::LoopExited => {
                println!("[loop-exited] thread={:?}", e.thread);
            }
            EventKind::LoopReleased => {
                println!("[loop-released] thread={:?}", e.thread);
            }
            EventKind::ShutdownSignaled => {
                println!("[shutdown-signaled] exit_code={:?}", e.exit_code);
            }
            EventKind::ShutdownIgnored => {
                println!("[shutdown-ignored] thread={:?}", e.thread);
            }
            EventKind::SubscriberOverflow => {
                println!(
                    "[subscriber-overflow] subscriber={:?} reason={:?}",
                    e.source, e.reason
                );
            }
            EventKind::SubscriberListenerFailed => {
                println!("[subscriber-listener-failed] err={:?}", e.reason);
            }
            EventKind::SubscriberPanicked => {
                println!(
                    "[subscriber-panicked] subscriber={} info={}",
                    e.source.as_deref().unwrap_or("unknown"),
                    e.reason.as_deref().unwrap_or("unknown"),
                );
            }
        }
    }

    fn name(&self) -> &'static str {
        "LogWriter"
    }
}
