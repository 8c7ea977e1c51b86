//! # loopvisor
//!
//! **loopvisor** lets a plugin running inside a host process stand up a toolkit
//! event loop without fighting the host, or other plugins, over it.
//!
//! The plugin does not know up front whether someone already runs the
//! process-wide loop. loopvisor decides at runtime: it either **acquires** the
//! loop and becomes its owner, or **delegates** the plugin's UI code to the
//! existing owner. The plugin's entry point blocks until the plugin's own
//! code signals shutdown.
//!
//! ## Architecture
//! ### Overview
//! ```text
//!   host thread                      worker thread                 foreign owner thread
//!  ┌──────────────────────────┐     ┌───────────────────────────┐  ┌────────────────────┐
//!  │ Launcher::run(host, cb)  │     │ LoopOwnershipArbiter      │  │ (host or another   │
//!  │  - windowing Once        │     │  try_acquire()            │  │  plugin, already   │
//!  │  - host.wait_ready()     │     │   ├─ won:  init_toolkit() │  │  running the loop) │
//!  │  - HandoffContext::new() │     │   │        cb(ctx)        │  │                    │
//!  │  - spawn(arbiter) ───────┼────►│   │        loop.run()     │  │                    │
//!  │  - wait_until_shutdown() │     │   │        release()      │  │                    │
//!  │        ▲                 │     │   └─ lost: invoke(cb) ────┼─►│  cb(ctx)           │
//!  └────────┼─────────────────┘     └───────────────────────────┘  └────────────────────┘
//!           │
//!           └──────────── destroy(ctx) ◄── user code, on whichever thread runs it
//! ```
//!
//! ### Exit codes
//! | Code | Meaning                                                          |
//! |------|------------------------------------------------------------------|
//! | `0`  | user code called `destroy`                                       |
//! | `-1` | the worker thread could not be spawned; callback never invoked   |
//! | `-2` | toolkit initialization failed on the owner; callback never invoked |
//!
//! ### Known limitations
//! - Delegation is fire-and-forget. If the foreign owner never runs its loop
//!   again, the callback is lost and `run` never returns.
//! - Stopping the loop is loop-global: `quit` stops whoever is driving it.
//! - After `destroy`, the host may exit the process without running any
//!   further cleanup.
//!
//! ## Features
//! | Area              | Description                                                  | Key types / traits                      |
//! |-------------------|--------------------------------------------------------------|-----------------------------------------|
//! | **Launch**        | Blocking entry point, host readiness, worker spawn.          | [`Launcher`], [`LauncherBuilder`]       |
//! | **Handoff**       | Shared monitor between caller, worker and user code.         | [`HandoffContext`], [`destroy`]         |
//! | **Toolkit seam**  | Atomic acquire-or-fail loop ownership, fire-and-forget jobs. | [`EventLoop`], [`Ownership`], [`ProcessLoop`] |
//! | **Host seam**     | Opaque host handle with a readiness wait.                    | [`Host`], [`ReadyLatch`]                |
//! | **Subscriber API**| Hook into launch events (logging, metrics, custom).          | [`Subscribe`], [`SubscriberSet`]        |
//! | **Errors**        | Typed launch failures mapped to exit codes.                  | [`LaunchError`], [`ToolkitError`]       |
//! | **Configuration** | Worker thread and bus settings.                              | [`LauncherConfig`]                      |
//!
//! ## Optional features
//! - `logging`: exports a simple built-in [`LogWriter`] _(demo/reference only)_.
//!
//! ## Example
//! ```rust
//! use std::sync::Arc;
//! use loopvisor::{EventLoop, Launcher, LauncherConfig, ProcessLoop, ReadyLatch};
//!
//! let event_loop = Arc::new(ProcessLoop::new());
//! let launcher = Launcher::builder(LauncherConfig::default(), event_loop.clone()).build();
//!
//! let host = Arc::new(ReadyLatch::ready());
//! let ui_loop = event_loop.clone();
//! let code = launcher.run(host, move |ctx| {
//!     // Build widgets here; this runs before the loop starts dispatching.
//!     let stop = ui_loop.clone();
//!     ui_loop
//!         .invoke(Box::new(move || {
//!             stop.quit();
//!             ctx.destroy();
//!         }))
//!         .expect("loop accepts jobs");
//! });
//! assert_eq!(code, 0);
//! ```
mod core;
mod error;
mod events;
mod host;
mod subscribers;
mod toolkit;

// ---- Public re-exports ----

pub use crate::core::{
    Callback, HandoffContext, Launcher, LauncherBuilder, LauncherConfig, LoopRole, Spawn,
    ThreadSpawner, WindowingInit, Work, destroy, windowing_initialized,
};
pub use error::{EXIT_OK, EXIT_SPAWN_FAILED, EXIT_TOOLKIT_INIT_FAILED, LaunchError, ToolkitError};
pub use events::{Bus, Event, EventKind};
pub use host::{Host, ReadyLatch};
pub use subscribers::{Subscribe, SubscriberSet};
pub use toolkit::{EventLoop, Job, LoopRef, Ownership, ProcessLoop};

// Optional: expose a simple built-in logger subscriber (demo/reference).
// Enable with: `--features logging`
#[cfg(feature = "logging")]
pub use subscribers::LogWriter;
