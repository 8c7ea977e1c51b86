//! # Loop ownership arbiter.
//!
//! Runs on the freshly spawned worker thread and decides, without any prior
//! knowledge, whether this launch owns the process event loop or has to
//! delegate to whoever already does.
//!
//! ## Flow
//! ```text
//! Ownership::try_acquire(loop)
//!   ├─ Some(guard) ─► role = Owner
//!   │                 ├─► init_toolkit()
//!   │                 │     └─ Err ─► release ─► fail(ToolkitInit) ─► signal_shutdown ─► exit
//!   │                 ├─► invoke_callback()          (callback runs here, before the loop)
//!   │                 ├─► run()                      (blocks until someone quits the loop)
//!   │                 └─► drop(guard) ─► release ─► drop(context) ─► exit
//!   │
//!   └─ None ────────► role = Guest
//!                     └─► invoke(job: invoke_callback) ─► exit   (fire-and-forget)
//! ```
//!
//! ## Known limitations
//! - Delegation has no acknowledgment. If the owner never runs its loop again,
//!   the callback is silently lost and the launcher waits forever.
//! - `quit` on a loop other parties are also driving may stop them instead of
//!   (or as well as) this worker.

use std::sync::Arc;

use crate::core::context::{HandoffContext, LoopRole};
use crate::error::LaunchError;
use crate::events::{Event, EventKind};
use crate::host::Host;
use crate::toolkit::{EventLoop, LoopRef, Ownership};

/// Acquire-or-delegate decision for one launch.
pub(crate) struct LoopOwnershipArbiter<H: Host> {
    ctx: HandoffContext<H>,
    event_loop: LoopRef,
}

impl<H: Host> LoopOwnershipArbiter<H> {
    pub(crate) fn new(ctx: HandoffContext<H>, event_loop: LoopRef) -> Self {
        Self { ctx, event_loop }
    }

    /// Runs the decision on the current thread.
    ///
    /// Returns only after the loop stopped (owner) or right after posting the
    /// callback (guest). The context handle is held until then.
    pub(crate) fn run(self) {
        let event_loop = Arc::clone(&self.event_loop);
        match Ownership::try_acquire(&*event_loop) {
            Some(ownership) => self.own(ownership),
            None => self.delegate(),
        }
    }

    fn own(&self, ownership: Ownership<'_, dyn EventLoop>) {
        let bus = self.ctx.bus();
        self.ctx.set_role(LoopRole::Owner);
        bus.publish(Event::new(EventKind::LoopAcquired).on_current_thread());

        if let Err(e) = ownership.event_loop().init_toolkit() {
            let err = LaunchError::ToolkitInit {
                error: e.to_string(),
            };
            bus.publish(
                Event::new(EventKind::ToolkitInitFailed)
                    .on_current_thread()
                    .with_reason(e.to_string())
                    .with_exit_code(err.exit_code()),
            );
            // Release before waking the launcher: a retry must find the loop free.
            drop(ownership);
            bus.publish(Event::new(EventKind::LoopReleased).on_current_thread());
            self.ctx.fail(err);
            self.ctx.signal_shutdown();
            return;
        }

        self.ctx.invoke_callback();

        bus.publish(Event::new(EventKind::LoopEntered).on_current_thread());
        ownership.event_loop().run();
        bus.publish(Event::new(EventKind::LoopExited).on_current_thread());

        drop(ownership);
        bus.publish(Event::new(EventKind::LoopReleased).on_current_thread());
    }

    fn delegate(self) {
        self.ctx.set_role(LoopRole::Guest);
        let bus = self.ctx.bus().clone();

        let ctx = self.ctx;
        let job = Box::new(move || {
            ctx.invoke_callback();
        });

        let ev = Event::new(EventKind::LoopDelegated).on_current_thread();
        match self.event_loop.invoke(job) {
            Ok(()) => bus.publish(ev),
            Err(e) => bus.publish(ev.with_reason(e.to_string())),
        }
    }
}
