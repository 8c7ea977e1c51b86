//! # Process-wide event loop.
//!
//! [`ProcessLoop`] is a minimal toolkit loop: an atomic owner marker plus an
//! unbounded job queue drained by whichever thread calls [`EventLoop::run`].
//!
//! ## Rules
//! - Ownership is a single `compare_exchange` on the marker (no check-then-act).
//! - Jobs run in FIFO order on the running thread.
//! - A panicking job is caught and counted; the loop keeps running.
//! - `quit` enqueues a stop request behind the already queued jobs. A stop
//!   request posted while nobody runs the loop stops the **next** run.
//! - The queue is never closed, so `invoke` always accepts. Jobs posted to a loop
//!   nobody runs anymore are never executed.

use std::panic::{AssertUnwindSafe, catch_unwind};
use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::sync::{Arc, Mutex, OnceLock, PoisonError};

use tokio::sync::mpsc;

use super::{EventLoop, Job, LoopRef};
use crate::error::ToolkitError;

type InitHook = Box<dyn Fn() -> Result<(), ToolkitError> + Send + Sync>;

enum Message {
    Job(Job),
    Quit,
}

static GLOBAL: OnceLock<Arc<ProcessLoop>> = OnceLock::new();

/// Process-wide event loop with an atomic owner marker and a job queue.
pub struct ProcessLoop {
    owned: AtomicBool,
    tx: mpsc::UnboundedSender<Message>,
    rx: Mutex<mpsc::UnboundedReceiver<Message>>,
    init: Option<InitHook>,
    panicked: AtomicU64,
}

impl ProcessLoop {
    /// Creates an independent loop. Most embedders want [`ProcessLoop::global`].
    pub fn new() -> Self {
        let (tx, rx) = mpsc::unbounded_channel();
        Self {
            owned: AtomicBool::new(false),
            tx,
            rx: Mutex::new(rx),
            init: None,
            panicked: AtomicU64::new(0),
        }
    }

    /// Installs the toolkit initialization run by each owner before its callback.
    pub fn with_toolkit_init<F>(mut self, init: F) -> Self
    where
        F: Fn() -> Result<(), ToolkitError> + Send + Sync + 'static,
    {
        self.init = Some(Box::new(init));
        self
    }

    /// Returns the process default loop, shared by every launcher in the process.
    pub fn global() -> LoopRef {
        let global = GLOBAL.get_or_init(|| Arc::new(ProcessLoop::new()));
        Arc::clone(global) as LoopRef
    }

    /// Returns whether some thread currently owns the loop.
    pub fn is_owned(&self) -> bool {
        self.owned.load(Ordering::Acquire)
    }

    /// Returns how many jobs panicked while the loop was running them.
    pub fn panicked_jobs(&self) -> u64 {
        self.panicked.load(Ordering::Relaxed)
    }
}

impl Default for ProcessLoop {
    fn default() -> Self {
        Self::new()
    }
}

impl EventLoop for ProcessLoop {
    fn try_acquire(&self) -> bool {
        self.owned
            .compare_exchange(false, true, Ordering::AcqRel, Ordering::Acquire)
            .is_ok()
    }

    fn release(&self) {
        self.owned.store(false, Ordering::Release);
    }

    fn init_toolkit(&self) -> Result<(), ToolkitError> {
        match &self.init {
            Some(init) => init(),
            None => Ok(()),
        }
    }

    fn run(&self) {
        let mut rx = self.rx.lock().unwrap_or_else(PoisonError::into_inner);
        while let Some(msg) = rx.blocking_recv() {
            match msg {
                Message::Job(job) => {
                    if catch_unwind(AssertUnwindSafe(job)).is_err() {
                        self.panicked.fetch_add(1, Ordering::Relaxed);
                    }
                }
                Message::Quit => break,
            }
        }
    }

    fn quit(&self) {
        let _ = self.tx.send(Message::Quit);
    }

    fn invoke(&self, job: Job) -> Result<(), ToolkitError> {
        self.tx
            .send(Message::Job(job))
            .map_err(|_| ToolkitError::new("event loop queue closed"))
    }
}
