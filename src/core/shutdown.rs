//! # Shutdown signal.
//!
//! [`destroy`] is how user code ends a launch: it flips the context's `running`
//! flag, wakes the blocked [`Launcher`](crate::Launcher) and gives up the caller's
//! handle.
//!
//! ## Contract
//! - Call it **once** per launch. A second call (through another clone) changes
//!   nothing and is reported as `ShutdownIgnored`, but it is not supported usage.
//! - It must be the last thing the embedder does with the context. Once the
//!   launcher returns, the host is free to tear the plugin down; the process may
//!   even exit right away, without running any further cleanup or destructors.
//! - It does **not** stop the event loop. Stop dispatching (e.g. `EventLoop::quit`)
//!   before or together with `destroy` if this launch owns the loop.
//! - The worker that owns the loop keeps its own handle until its loop run
//!   returns, so destroying from inside a loop callback never frees state the
//!   owner still uses.

use crate::core::context::HandoffContext;
use crate::host::Host;

/// Signals shutdown and drops the caller's context handle.
pub fn destroy<H: Host>(ctx: HandoffContext<H>) {
    ctx.signal_shutdown();
}
