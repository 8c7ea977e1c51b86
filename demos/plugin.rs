//! # Example: plugin launched from a host process
//!
//! Simulates a host that finishes its own setup on another thread, then calls
//! into a plugin entry point that stands up the process event loop.
//!
//! Demonstrates how to:
//! - gate the launch on host readiness with [`ReadyLatch`];
//! - attach the built-in [`LogWriter`] subscriber;
//! - build "UI" inside the callback and shut down from a loop job.
//!
//! ## Flow
//! ```text
//! host thread ──► ReadyLatch::set() (after 100ms)
//! main thread ──► Launcher::run(host, callback)
//!                     └─► worker: acquire loop ─► callback ─► loop.run()
//!                                                              └─► job: quit + destroy
//! ```
//!
//! ## Run
//! ```bash
//! cargo run --example plugin --features logging
//! ```

use std::sync::Arc;
use std::thread;
use std::time::Duration;

use loopvisor::{
    EventLoop, Launcher, LauncherConfig, LogWriter, ProcessLoop, ReadyLatch, Subscribe,
};

fn main() {
    let event_loop = Arc::new(ProcessLoop::new().with_toolkit_init(|| {
        println!("[plugin] toolkit initialized");
        Ok(())
    }));

    let subs: Vec<Arc<dyn Subscribe>> = vec![Arc::new(LogWriter::new())];
    let launcher = Launcher::builder(LauncherConfig::default(), event_loop.clone())
        .with_subscribers(subs)
        .with_windowing_init(|| println!("[plugin] windowing made thread-safe"))
        .build();

    let host = Arc::new(ReadyLatch::new());
    let setter = host.clone();
    thread::spawn(move || {
        thread::sleep(Duration::from_millis(100));
        println!("[host] setup complete");
        setter.set();
    });

    let ui_loop = event_loop.clone();
    let code = launcher.run(host, move |ctx| {
        println!("[plugin] building UI (role: {:?})", ctx.role());

        let stop = ui_loop.clone();
        let closer = ctx.clone();
        let posted = ui_loop.invoke(Box::new(move || {
            println!("[plugin] window closed");
            stop.quit();
            closer.destroy();
        }));
        if let Err(e) = posted {
            eprintln!("[plugin] loop refused job: {e}");
            ctx.destroy();
        }
    });

    // Subscribers are fire-and-forget; give them a moment to drain.
    thread::sleep(Duration::from_millis(50));
    println!("[plugin] exit code {code}");
}
