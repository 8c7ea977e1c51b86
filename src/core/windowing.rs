//! # Process-wide windowing thread-safety initialization.
//!
//! Windowing libraries (Xlib being the usual suspect) must be switched to
//! multi-threaded mode once per process, before any thread talks to them.
//! Every launcher in the process funnels that call through one [`Once`], so it
//! runs exactly once no matter how many plugins launch concurrently.

use std::sync::{Arc, Once};

/// Initialization routine supplied by the embedder (e.g. a wrapper around `XInitThreads`).
pub type WindowingInit = Arc<dyn Fn() + Send + Sync>;

static WINDOWING: Once = Once::new();

/// Runs `init` unless some launch in this process already ran its initialization.
///
/// Returns `true` if this call performed the initialization. Concurrent callers
/// block until the winning call has finished.
pub(crate) fn ensure_thread_safe(init: &(dyn Fn() + Send + Sync)) -> bool {
    run_once(&WINDOWING, init)
}

/// Returns whether the process-wide initialization has completed.
pub fn windowing_initialized() -> bool {
    WINDOWING.is_completed()
}

fn run_once(guard: &Once, init: &(dyn Fn() + Send + Sync)) -> bool {
    let mut ran = false;
    guard.call_once(|| {
        init();
        ran = true;
    });
    ran
}
