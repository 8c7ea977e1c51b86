//! Launch core: handoff protocol and lifecycle.
//!
//! This module contains the implementation of the acquire-or-delegate handoff.
//! The public API from this module is [`Launcher`] (entry point),
//! [`HandoffContext`] (shared monitor) and [`destroy`] (shutdown signal).
//!
//! Internal modules:
//! - [`context`]: the monitor shared by caller, worker and user code;
//! - [`arbiter`]: acquire loop ownership or delegate, on the worker thread;
//! - [`launcher`]: readiness, spawn, blocking wait;
//! - [`shutdown`]: the `destroy` contract;
//! - [`spawn`]: worker thread creation seam;
//! - [`windowing`]: process-wide once-guard for windowing initialization.

mod arbiter;
mod builder;
mod config;
mod context;
mod launcher;
mod shutdown;
mod spawn;
mod windowing;

pub use builder::LauncherBuilder;
pub use config::LauncherConfig;
pub use context::{Callback, HandoffContext, LoopRole};
pub use launcher::Launcher;
pub use shutdown::destroy;
pub use spawn::{Spawn, ThreadSpawner, Work};
pub use windowing::{WindowingInit, windowing_initialized};
