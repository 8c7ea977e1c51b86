//! # Runtime events emitted by the launcher, the arbiter and the shutdown signal.
//!
//! The [`EventKind`] enum classifies event types across four categories:
//! - **Launch events**: the caller-side protocol (readiness, spawn, return)
//! - **Ownership events**: the acquire-or-delegate decision and the loop lifecycle
//! - **Shutdown events**: the `running → false` transition and ignored repeats
//! - **Subscriber events**: fan-out problems (overflow, panics, missing listener)
//!
//! The [`Event`] struct carries additional metadata such as timestamps, the
//! emitting thread, exit codes and reasons.
//!
//! ## Ordering
//! Events from different threads can reach a subscriber interleaved. `seq` is
//! taken from one process-wide counter at construction time; sort by it to
//! recover the order in which the events were created.
//!
//! ## Example
//! ```rust
//! use loopvisor::{Event, EventKind};
//!
//! let ev = Event::new(EventKind::ToolkitInitFailed)
//!     .with_thread("loopvisor-worker")
//!     .with_reason("cannot open display")
//!     .with_exit_code(-2);
//!
//! assert_eq!(ev.kind, EventKind::ToolkitInitFailed);
//! assert_eq!(ev.thread.as_deref(), Some("loopvisor-worker"));
//! assert_eq!(ev.exit_code, Some(-2));
//! ```

use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering as AtomicOrdering};
use std::time::SystemTime;

/// Next `Event::seq`.
static EVENT_SEQ: AtomicU64 = AtomicU64::new(0);

/// Kind of launch event.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EventKind {
    // === Subscriber events ===
    /// A subscriber's `on_event` panicked; the worker caught it and keeps going.
    ///
    /// Sets:
    /// - `source`: subscriber name
    /// - `reason`: panic payload, when it is a string
    SubscriberPanicked,

    /// An event was not queued for one subscriber.
    ///
    /// Sets:
    /// - `source`: subscriber name
    /// - `reason`: `subscriber=<name> reason=full|closed`
    SubscriberOverflow,

    /// The bus listener thread could not be spawned; subscribers receive no
    /// further events. Delivered straight to the subscriber set.
    ///
    /// Sets:
    /// - `reason`: OS error message
    SubscriberListenerFailed,

    // === Launch events ===
    /// `Launcher::run` was entered.
    ///
    /// Sets:
    /// - `thread`: caller thread
    LaunchRequested,

    /// The process-wide windowing thread-safety initialization ran (first launch only).
    WindowingInitialized,

    /// The host acknowledged its own setup; the launcher proceeds.
    HostReady,

    /// The arbiter thread was spawned (detached).
    ///
    /// Sets:
    /// - `thread`: configured worker thread name
    WorkerSpawned,

    /// The arbiter thread could not be spawned.
    ///
    /// Sets:
    /// - `reason`: OS error message
    /// - `exit_code`: `-1`
    SpawnFailed,

    /// The launcher unblocked and is about to return.
    ///
    /// Sets:
    /// - `exit_code`: final exit code
    LaunchFinished,

    // === Ownership events ===
    /// The worker became the owner of the process event loop.
    LoopAcquired,

    /// The loop already had an owner; the callback was posted to it.
    ///
    /// Sets:
    /// - `reason`: present only if the owner refused the job
    LoopDelegated,

    /// Toolkit initialization failed on the owning thread.
    ///
    /// Sets:
    /// - `reason`: toolkit error message
    /// - `exit_code`: `-2`
    ToolkitInitFailed,

    /// The user callback is about to run.
    ///
    /// Sets:
    /// - `thread`: thread executing the callback
    CallbackInvoked,

    /// The owner entered the blocking loop run call.
    LoopEntered,

    /// The blocking loop run call returned.
    LoopExited,

    /// Loop ownership was released.
    LoopReleased,

    // === Shutdown events ===
    /// `running` transitioned from `true` to `false`.
    ///
    /// Sets:
    /// - `exit_code`: exit code the launcher will return
    ShutdownSignaled,

    /// A repeated shutdown signal was ignored (already shut down).
    ShutdownIgnored,
}

/// One step of a launch, as reported on the [`Bus`](crate::Bus).
///
/// Which optional fields are filled in depends on the [`EventKind`].
#[derive(Clone, Debug)]
pub struct Event {
    /// Process-wide creation order.
    pub seq: u64,
    /// Creation time.
    pub at: SystemTime,
    /// What happened.
    pub kind: EventKind,
    /// Name (or id) of the thread the event is about.
    pub thread: Option<Arc<str>>,
    /// Exit code, for events that decide or report it.
    pub exit_code: Option<i32>,
    /// Error text or other detail.
    pub reason: Option<Arc<str>>,
    /// Emitting component, for subscriber events.
    pub source: Option<Arc<str>>,
}

impl Event {
    /// Creates an event stamped with the next `seq` and the current time.
    pub fn new(kind: EventKind) -> Self {
        Self {
            seq: EVENT_SEQ.fetch_add(1, AtomicOrdering::Relaxed),
            at: SystemTime::now(),
            kind,
            thread: None,
            exit_code: None,
            reason: None,
            source: None,
        }
    }

    /// Attaches a thread label.
    #[inline]
    pub fn with_thread(mut self, thread: impl Into<Arc<str>>) -> Self {
        self.thread = Some(thread.into());
        self
    }

    /// Attaches the label of the calling thread (its name, or its id if unnamed).
    #[inline]
    pub fn on_current_thread(self) -> Self {
        let label = current_thread_label();
        self.with_thread(label)
    }

    /// Attaches an exit code.
    #[inline]
    pub fn with_exit_code(mut self, code: i32) -> Self {
        self.exit_code = Some(code);
        self
    }

    /// Attaches a human-readable reason.
    #[inline]
    pub fn with_reason(mut self, reason: impl Into<Arc<str>>) -> Self {
        self.reason = Some(reason.into());
        self
    }

    /// Attaches the emitting component name.
    #[inline]
    pub fn with_source(mut self, source: impl Into<Arc<str>>) -> Self {
        self.source = Some(source.into());
        self
    }

    /// Builds the `SubscriberOverflow` report for `subscriber`.
    #[inline]
    pub fn subscriber_overflow(subscriber: &'static str, reason: &'static str) -> Self {
        Event::new(EventKind::SubscriberOverflow)
            .with_source(subscriber)
            .with_reason(format!("subscriber={subscriber} reason={reason}"))
    }

    /// Builds the `SubscriberPanicked` report for `subscriber`.
    #[inline]
    pub fn subscriber_panicked(subscriber: &'static str, info: String) -> Self {
        Event::new(EventKind::SubscriberPanicked)
            .with_source(subscriber)
            .with_reason(info)
    }

    #[inline]
    pub fn is_subscriber_overflow(&self) -> bool {
        matches!(self.kind, EventKind::SubscriberOverflow)
    }

    #[inline]
    pub fn is_subscriber_panic(&self) -> bool {
        matches!(self.kind, EventKind::SubscriberPanicked)
    }
}

/// Returns the current thread's name, or its debug id when unnamed.
fn current_thread_label() -> String {
    let current = std::thread::current();
    match current.name() {
        Some(name) => name.to_owned(),
        None => format!("{:?}", current.id()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn seq_is_strictly_increasing() {
        let a = Event::new(EventKind::LaunchRequested);
        let b = Event::new(EventKind::HostReady);
        let c = Event::new(EventKind::LaunchFinished);
        assert!(a.seq < b.seq);
        assert!(b.seq < c.seq);
    }

    #[test]
    fn current_thread_label_uses_thread_name() {
        let label = std::thread::Builder::new()
            .name("label-probe".into())
            .spawn(|| Event::new(EventKind::CallbackInvoked).on_current_thread())
            .unwrap()
            .join()
            .unwrap()
            .thread;
        assert_eq!(label.as_deref(), Some("label-probe"));
    }

    #[test]
    fn subscriber_helpers_set_source_and_kind() {
        let ev = Event::subscriber_overflow("audit", "full");
        assert!(ev.is_subscriber_overflow());
        assert_eq!(ev.source.as_deref(), Some("audit"));
        assert_eq!(ev.reason.as_deref(), Some("subscriber=audit reason=full"));

        let ev = Event::subscriber_panicked("audit", "oops".into());
        assert!(ev.is_subscriber_panic());
        assert_eq!(ev.reason.as_deref(), Some("oops"));
    }
}
