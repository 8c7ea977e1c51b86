//! # Host session seam.
//!
//! The host media engine is an external collaborator. This crate only needs
//! two things from it: an opaque session handle that is handed through to user
//! code untouched, and a way to wait until the host finished its own setup.
//! Both are expressed by the [`Host`] trait, implemented by the handle type itself.
//!
//! [`ReadyLatch`] is a ready-made readiness event for hosts (and tests) that do
//! not bring their own.

use std::sync::{Arc, Condvar, Mutex, PoisonError};

/// Host session handle.
///
/// The launcher never inspects the handle beyond [`Host::wait_ready`]; user code
/// reads it through [`HandoffContext::host`](crate::HandoffContext::host).
pub trait Host: Send + Sync + 'static {
    /// Blocks until the host acknowledges that its own setup is complete.
    ///
    /// There is no timeout: a host that never becomes ready blocks the launcher forever.
    fn wait_ready(&self);
}

impl<T: Host + ?Sized> Host for Arc<T> {
    fn wait_ready(&self) {
        (**self).wait_ready();
    }
}

/// One-shot readiness event: once set, it stays set.
#[derive(Debug, Default)]
pub struct ReadyLatch {
    ready: Mutex<bool>,
    cond: Condvar,
}

impl ReadyLatch {
    /// Creates a latch that is not set yet.
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a latch that is already set; `wait` returns immediately.
    pub fn ready() -> Self {
        Self {
            ready: Mutex::new(true),
            cond: Condvar::new(),
        }
    }

    /// Sets the latch and wakes every waiter. Setting twice is harmless.
    pub fn set(&self) {
        let mut ready = self.ready.lock().unwrap_or_else(PoisonError::into_inner);
        *ready = true;
        self.cond.notify_all();
    }

    /// Returns whether the latch has been set.
    pub fn is_set(&self) -> bool {
        *self.ready.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Blocks until the latch is set.
    pub fn wait(&self) {
        let ready = self.ready.lock().unwrap_or_else(PoisonError::into_inner);
        let _ready = self
            .cond
            .wait_while(ready, |ready| !*ready)
            .unwrap_or_else(PoisonError::into_inner);
    }
}

impl Host for ReadyLatch {
    fn wait_ready(&self) {
        self.wait();
    }
}
