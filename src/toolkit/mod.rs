//! # Toolkit event loop seam.
//!
//! The GUI toolkit is an external collaborator. The launcher needs exactly one
//! process-wide event loop context from it, described by [`EventLoop`]:
//!
//! ```text
//!                 try_acquire() ──► true  ──► init_toolkit() ──► run() ──► release()
//!   worker ──────►                                 (owner thread)
//!                 try_acquire() ──► false ──► invoke(job) ──► return
//!                                                  │
//!                                                  └──► job runs later on the owner's thread
//! ```
//!
//! ## Contract for implementors
//! - `try_acquire` is a **single atomic acquire-or-fail** step. If the binding can
//!   only offer "check, then mark", the window between the two is a race with the
//!   toolkit that this crate cannot close on its own.
//! - `release` is called exactly once per successful `try_acquire`, by the same
//!   thread, through the [`Ownership`] guard.
//! - `invoke` is fire-and-forget: accepting a job does not promise it will ever run.
//! - `quit` stops whoever is currently driving the loop, not necessarily the
//!   caller's own `run`; stop semantics are loop-global.
//!
//! [`ProcessLoop`] is the bundled implementation: a process-wide loop with an
//! atomic owner marker and a job queue.

mod process;

pub use process::ProcessLoop;

use std::sync::Arc;

use crate::error::ToolkitError;

/// A unit of work posted to the loop owner's thread.
pub type Job = Box<dyn FnOnce() + Send + 'static>;

/// Shared handle to an event loop (`Arc<dyn EventLoop>`).
pub type LoopRef = Arc<dyn EventLoop>;

/// Process-wide toolkit event loop context.
pub trait EventLoop: Send + Sync + 'static {
    /// Attempts to become the sole owner of the loop context. Never blocks.
    fn try_acquire(&self) -> bool;

    /// Gives up ownership obtained through [`try_acquire`](Self::try_acquire).
    fn release(&self);

    /// Performs toolkit initialization on the calling (owning) thread.
    fn init_toolkit(&self) -> Result<(), ToolkitError>;

    /// Runs the loop on the calling thread until something asks it to stop.
    fn run(&self);

    /// Asks the loop to stop.
    fn quit(&self);

    /// Posts a one-shot job for execution on the owner's thread.
    ///
    /// An `Ok` only means the job was queued.
    fn invoke(&self, job: Job) -> Result<(), ToolkitError>;
}

/// RAII proof of loop ownership; releases the loop when dropped (also on unwind).
pub struct Ownership<'a, L: EventLoop + ?Sized> {
    event_loop: &'a L,
}

impl<'a, L: EventLoop + ?Sized> Ownership<'a, L> {
    /// Acquires ownership of `event_loop`, or returns `None` if someone else owns it.
    pub fn try_acquire(event_loop: &'a L) -> Option<Self> {
        if event_loop.try_acquire() {
            Some(Self { event_loop })
        } else {
            None
        }
    }

    /// Returns the owned loop.
    pub fn event_loop(&self) -> &'a L {
        self.event_loop
    }
}

impl<L: EventLoop + ?Sized> Drop for Ownership<'_, L> {
    fn drop(&mut self) {
        self.event_loop.release();
    }
}
