//! # Handoff context: the monitor shared by the launcher and the worker.
//!
//! One [`HandoffContext`] exists per launch. It is created on the launcher's
//! thread, cloned into the worker before the worker starts, and handed to the
//! user callback. All clones point to the same shared state; the state is
//! released when the last clone is dropped.
//!
//! ## State machine
//! ```text
//!   running = true, exit_code = 0
//!        │
//!        │  fail(err)             (worker: toolkit init; launcher: spawn failure)
//!        ▼
//!   running = true, exit_code = err.exit_code()
//!        │
//!        │  signal_shutdown()     (first call only; later calls are ignored)
//!        ▼
//!   running = false  ──► notify_all ──► wait_until_shutdown() returns exit_code
//! ```
//!
//! ## Rules
//! - `running` and `exit_code` are only touched under the mutex.
//! - `running` goes `true → false` exactly once; nothing sets it back.
//! - `exit_code` is frozen once `running` is `false`.
//! - The host handle and the callback are set before the worker is spawned and
//!   never written afterwards.

use std::sync::{Arc, Condvar, Mutex, OnceLock, PoisonError};

use crate::core::shutdown;
use crate::error::{EXIT_OK, LaunchError};
use crate::events::{Bus, Event, EventKind};
use crate::host::Host;

/// User code invoked once per launch, with the launch's context.
pub type Callback<H> = Box<dyn FnOnce(HandoffContext<H>) + Send + 'static>;

/// Which side of the acquire-or-delegate decision a launch ended up on.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum LoopRole {
    /// The worker owns the loop; the callback runs on the worker before the loop starts.
    Owner,
    /// Another party owns the loop; the callback was posted to the owner's thread.
    Guest,
}

struct State {
    running: bool,
    exit_code: i32,
    failure: Option<LaunchError>,
}

struct Shared<H: Host> {
    host: H,
    callback: Mutex<Option<Callback<H>>>,
    role: OnceLock<LoopRole>,
    state: Mutex<State>,
    cond: Condvar,
    bus: Bus,
}

/// Shared handle to the state of one launch.
///
/// Cloning is cheap (an `Arc` bump). The embedder ends the launch by calling
/// [`destroy`](HandoffContext::destroy) on one of the clones.
pub struct HandoffContext<H: Host> {
    inner: Arc<Shared<H>>,
}

impl<H: Host> Clone for HandoffContext<H> {
    fn clone(&self) -> Self {
        Self {
            inner: Arc::clone(&self.inner),
        }
    }
}

impl<H: Host> HandoffContext<H> {
    pub(crate) fn new(host: H, callback: Callback<H>, bus: Bus) -> Self {
        Self {
            inner: Arc::new(Shared {
                host,
                callback: Mutex::new(Some(callback)),
                role: OnceLock::new(),
                state: Mutex::new(State {
                    running: true,
                    exit_code: EXIT_OK,
                    failure: None,
                }),
                cond: Condvar::new(),
                bus,
            }),
        }
    }

    /// Returns the host session handle passed to [`Launcher::run`](crate::Launcher::run).
    pub fn host(&self) -> &H {
        &self.inner.host
    }

    /// Returns which role this launch took, once the arbiter decided.
    pub fn role(&self) -> Option<LoopRole> {
        self.inner.role.get().copied()
    }

    /// Returns `true` until shutdown has been signaled.
    pub fn is_running(&self) -> bool {
        self.lock_state().running
    }

    /// Returns the exit code recorded so far.
    pub fn exit_code(&self) -> i32 {
        self.lock_state().exit_code
    }

    /// Signals shutdown: sets `running = false` and wakes the launcher.
    ///
    /// Returns `true` for the call that performed the transition and `false`
    /// for every later call, which changes nothing. Prefer [`destroy`](Self::destroy),
    /// which also gives up this handle.
    pub fn signal_shutdown(&self) -> bool {
        let exit_code = {
            let mut state = self.lock_state();
            if !state.running {
                None
            } else {
                state.running = false;
                self.inner.cond.notify_all();
                Some(state.exit_code)
            }
        };

        match exit_code {
            Some(code) => {
                self.inner.bus.publish(
                    Event::new(EventKind::ShutdownSignaled)
                        .on_current_thread()
                        .with_exit_code(code),
                );
                true
            }
            None => {
                self.inner
                    .bus
                    .publish(Event::new(EventKind::ShutdownIgnored).on_current_thread());
                false
            }
        }
    }

    /// Blocks the calling thread until shutdown is signaled, then returns the exit code.
    ///
    /// There is no timeout and no way to cancel the wait.
    pub fn wait_until_shutdown(&self) -> i32 {
        let state = self.lock_state();
        let state = self
            .inner
            .cond
            .wait_while(state, |state| state.running)
            .unwrap_or_else(PoisonError::into_inner);
        state.exit_code
    }

    /// Ends the launch. See [`shutdown::destroy`] for the full contract.
    pub fn destroy(self) {
        shutdown::destroy(self);
    }

    /// Records a failure; ignored once shutdown has been signaled.
    pub(crate) fn fail(&self, err: LaunchError) {
        let mut state = self.lock_state();
        if state.running {
            state.exit_code = err.exit_code();
            state.failure = Some(err);
        }
    }

    /// Returns the typed outcome matching the exit code.
    pub(crate) fn outcome(&self) -> Result<(), LaunchError> {
        match &self.lock_state().failure {
            Some(err) => Err(err.clone()),
            None => Ok(()),
        }
    }

    pub(crate) fn set_role(&self, role: LoopRole) {
        let _ = self.inner.role.set(role);
    }

    pub(crate) fn bus(&self) -> &Bus {
        &self.inner.bus
    }

    /// Runs the user callback on the current thread if nobody ran it yet.
    ///
    /// Returns whether the callback ran.
    pub(crate) fn invoke_callback(&self) -> bool {
        let callback = self
            .inner
            .callback
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .take();

        match callback {
            Some(callback) => {
                self.inner
                    .bus
                    .publish(Event::new(EventKind::CallbackInvoked).on_current_thread());
                callback(self.clone());
                true
            }
            None => false,
        }
    }

    fn lock_state(&self) -> std::sync::MutexGuard<'_, State> {
        self.inner
            .state
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::host::ReadyLatch;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::thread;
    use std::time::Duration;

    fn context_with<F>(callback: F) -> HandoffContext<ReadyLatch>
    where
        F: FnOnce(HandoffContext<ReadyLatch>) + Send + 'static,
    {
        HandoffContext::new(ReadyLatch::ready(), Box::new(callback), Bus::new(16))
    }

    #[test]
    fn starts_running_with_exit_code_zero() {
        let ctx = context_with(|_| {});
        assert!(ctx.is_running());
        assert_eq!(ctx.exit_code(), EXIT_OK);
        assert_eq!(ctx.role(), None);
        assert!(ctx.outcome().is_ok());
    }

    #[test]
    fn wait_returns_after_shutdown_from_another_thread() {
        let ctx = context_with(|_| {});
        let remote = ctx.clone();
        let signaler = thread::spawn(move || {
            thread::sleep(Duration::from_millis(20));
            remote.destroy();
        });

        assert_eq!(ctx.wait_until_shutdown(), EXIT_OK);
        assert!(!ctx.is_running());
        signaler.join().unwrap();
    }

    #[test]
    fn wait_returns_immediately_when_already_shut_down() {
        let ctx = context_with(|_| {});
        assert!(ctx.signal_shutdown());
        assert_eq!(ctx.wait_until_shutdown(), EXIT_OK);
    }

    #[test]
    fn exit_code_is_frozen_after_shutdown() {
        let ctx = context_with(|_| {});
        ctx.fail(LaunchError::ToolkitInit {
            error: "no display".into(),
        });
        assert!(ctx.signal_shutdown());

        ctx.fail(LaunchError::SpawnFailed {
            error: "late".into(),
        });
        assert_eq!(ctx.wait_until_shutdown(), -2);
        assert_eq!(
            ctx.outcome(),
            Err(LaunchError::ToolkitInit {
                error: "no display".into()
            })
        );
    }

    #[test]
    fn concurrent_shutdowns_transition_exactly_once() {
        let ctx = context_with(|_| {});
        let mut rx = ctx.bus().subscribe();

        let transitions: usize = (0..8)
            .map(|_| {
                let ctx = ctx.clone();
                thread::spawn(move || ctx.signal_shutdown())
            })
            .collect::<Vec<_>>()
            .into_iter()
            .map(|h| usize::from(h.join().unwrap()))
            .sum();

        assert_eq!(transitions, 1);
        assert!(!ctx.is_running());

        let mut signaled = 0;
        let mut ignored = 0;
        while let Ok(ev) = rx.try_recv() {
            match ev.kind {
                EventKind::ShutdownSignaled => signaled += 1,
                EventKind::ShutdownIgnored => ignored += 1,
                _ => {}
            }
        }
        assert_eq!(signaled, 1);
        assert_eq!(ignored, 7);
    }

    #[test]
    fn callback_runs_at_most_once() {
        static CALLS: AtomicUsize = AtomicUsize::new(0);
        let ctx = context_with(|ctx| {
            CALLS.fetch_add(1, Ordering::SeqCst);
            assert!(ctx.is_running());
        });

        assert!(ctx.invoke_callback());
        assert!(!ctx.invoke_callback());
        assert_eq!(CALLS.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn role_is_set_once() {
        let ctx = context_with(|_| {});
        ctx.set_role(LoopRole::Guest);
        ctx.set_role(LoopRole::Owner);
        assert_eq!(ctx.role(), Some(LoopRole::Guest));
    }
}
