//! # Launcher: the blocking entry point called by the embedding plugin.
//!
//! The [`Launcher`] owns the launch configuration, the event loop to arbitrate
//! over, the thread spawner and the event bus. Each call to [`Launcher::run`]
//! performs one launch.
//!
//! ## Key responsibilities
//! - run the process-wide windowing initialization exactly once
//! - wait for the host to finish its own setup
//! - spawn the detached worker that runs the loop ownership arbiter
//! - block until user code signals shutdown, then return the exit code
//!
//! ## High-level architecture
//! ```text
//! caller thread                          worker thread (detached)
//! ─────────────                          ────────────────────────
//! run(host, callback)
//!   ├─► windowing::ensure_thread_safe()  (Once, process-wide)
//!   ├─► host.wait_ready()                (unbounded)
//!   ├─► HandoffContext::new()
//!   ├─► spawner.spawn(arbiter) ───────────► LoopOwnershipArbiter::run()
//!   │      └─ Err ─► fail(SpawnFailed)       ├─ owner: init ─► callback ─► loop
//!   │                signal_shutdown()       └─ guest: invoke(callback) ─► exit
//!   ├─► ctx.wait_until_shutdown()  ◄──────── destroy(ctx) from user code
//!   └─► return exit_code
//! ```
//!
//! ## Example
//! ```rust
//! use std::sync::Arc;
//! use loopvisor::{EventLoop, Launcher, ProcessLoop, ReadyLatch};
//!
//! let event_loop = Arc::new(ProcessLoop::new());
//! let launcher = Launcher::new(event_loop.clone());
//!
//! let quitter = event_loop.clone();
//! let code = launcher.run(Arc::new(ReadyLatch::ready()), move |ctx| {
//!     // Build the UI here, then hand control to the loop.
//!     let job_loop = quitter.clone();
//!     quitter
//!         .invoke(Box::new(move || {
//!             job_loop.quit();
//!             ctx.destroy();
//!         }))
//!         .expect("loop accepts jobs");
//! });
//! assert_eq!(code, 0);
//! ```

use std::io;
use std::sync::Arc;

use tokio::sync::broadcast::error::RecvError;

use crate::core::arbiter::LoopOwnershipArbiter;
use crate::core::builder::LauncherBuilder;
use crate::core::config::LauncherConfig;
use crate::core::context::{Callback, HandoffContext};
use crate::core::spawn::Spawn;
use crate::core::windowing::{self, WindowingInit};
use crate::error::LaunchError;
use crate::events::{Bus, Event, EventKind};
use crate::host::Host;
use crate::subscribers::SubscriberSet;
use crate::toolkit::LoopRef;

/// Entry point for standing up (or joining) the process event loop.
pub struct Launcher {
    cfg: LauncherConfig,
    event_loop: LoopRef,
    spawner: Arc<dyn Spawn>,
    windowing_init: Option<WindowingInit>,
    bus: Bus,
}

impl Launcher {
    /// Creates a launcher with the default configuration and no subscribers.
    pub fn new(event_loop: LoopRef) -> Self {
        Self::builder(LauncherConfig::default(), event_loop).build()
    }

    /// Returns a builder for a launcher arbitrating over `event_loop`.
    pub fn builder(cfg: LauncherConfig, event_loop: LoopRef) -> LauncherBuilder {
        LauncherBuilder::new(cfg, event_loop)
    }

    pub(crate) fn new_internal(
        cfg: LauncherConfig,
        event_loop: LoopRef,
        spawner: Arc<dyn Spawn>,
        windowing_init: Option<WindowingInit>,
        bus: Bus,
    ) -> Self {
        Self {
            cfg,
            event_loop,
            spawner,
            windowing_init,
            bus,
        }
    }

    /// Returns the launcher configuration.
    pub fn config(&self) -> &LauncherConfig {
        &self.cfg
    }

    /// Returns the event bus every launch publishes to.
    pub fn bus(&self) -> &Bus {
        &self.bus
    }

    /// Performs one launch and blocks until user code calls
    /// [`destroy`](HandoffContext::destroy).
    ///
    /// Returns `0` after a regular shutdown and a negative code when the launch
    /// failed before user code ran (`-1` spawn failure, `-2` toolkit init
    /// failure). In the failure cases `callback` is never invoked.
    ///
    /// # Blocking
    /// There is no timeout. If the callback is delegated to a loop owner that
    /// never runs it, or user code never calls `destroy`, this never returns.
    pub fn run<H, F>(&self, host: H, callback: F) -> i32
    where
        H: Host,
        F: FnOnce(HandoffContext<H>) + Send + 'static,
    {
        let ctx = self.start(host, Box::new(callback));
        self.finish(&ctx)
    }

    /// Same as [`run`](Self::run), with the failure reported as a [`LaunchError`].
    pub fn launch<H, F>(&self, host: H, callback: F) -> Result<(), LaunchError>
    where
        H: Host,
        F: FnOnce(HandoffContext<H>) + Send + 'static,
    {
        let ctx = self.start(host, Box::new(callback));
        self.finish(&ctx);
        ctx.outcome()
    }

    /// Everything up to (not including) the blocking wait.
    fn start<H: Host>(&self, host: H, callback: Callback<H>) -> HandoffContext<H> {
        self.bus
            .publish(Event::new(EventKind::LaunchRequested).on_current_thread());

        if let Some(init) = &self.windowing_init {
            if windowing::ensure_thread_safe(&**init) {
                self.bus.publish(Event::new(EventKind::WindowingInitialized));
            }
        }

        host.wait_ready();
        self.bus.publish(Event::new(EventKind::HostReady));

        let ctx = HandoffContext::new(host, callback, self.bus.clone());
        let arbiter = LoopOwnershipArbiter::new(ctx.clone(), Arc::clone(&self.event_loop));

        let spawned = self.spawner.spawn(
            &self.cfg.thread_name,
            self.cfg.stack_size_opt(),
            Box::new(move || arbiter.run()),
        );
        match spawned {
            Ok(()) => {
                self.bus.publish(
                    Event::new(EventKind::WorkerSpawned).with_thread(&*self.cfg.thread_name),
                );
            }
            Err(e) => {
                let err = LaunchError::SpawnFailed {
                    error: e.to_string(),
                };
                self.bus.publish(
                    Event::new(EventKind::SpawnFailed)
                        .with_reason(e.to_string())
                        .with_exit_code(err.exit_code()),
                );
                ctx.fail(err);
                ctx.signal_shutdown();
            }
        }
        ctx
    }

    fn finish<H: Host>(&self, ctx: &HandoffContext<H>) -> i32 {
        let code = ctx.wait_until_shutdown();
        self.bus.publish(
            Event::new(EventKind::LaunchFinished)
                .on_current_thread()
                .with_exit_code(code),
        );
        code
    }

    /// Subscribes to the bus and forwards events to the subscriber set (fire-and-forget).
    ///
    /// The listener thread lives for the rest of the process, like the subscriber
    /// workers. If it cannot be spawned, the set is told directly with a
    /// `SubscriberListenerFailed` event (it will receive nothing else) and the
    /// error is returned.
    pub(crate) fn subscriber_listener(
        bus: &Bus,
        set: Arc<SubscriberSet>,
        spawner: &dyn Spawn,
    ) -> io::Result<()> {
        let mut rx = bus.subscribe();
        let listener_set = Arc::clone(&set);
        let spawned = spawner.spawn(
            "loopvisor-events",
            None,
            Box::new(move || {
                loop {
                    match rx.blocking_recv() {
                        Ok(ev) => listener_set.emit(&ev),
                        Err(RecvError::Lagged(_)) => continue,
                        Err(RecvError::Closed) => break,
                    }
                }
            }),
        );
        if let Err(e) = &spawned {
            set.emit(&Event::new(EventKind::SubscriberListenerFailed).with_reason(e.to_string()));
        }
        spawned
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::context::LoopRole;
    use crate::error::{EXIT_OK, EXIT_SPAWN_FAILED, EXIT_TOOLKIT_INIT_FAILED, ToolkitError};
    use crate::host::ReadyLatch;
    use crate::subscribers::Subscribe;
    use crate::toolkit::{EventLoop, Ownership, ProcessLoop};
    use async_trait::async_trait;
    use std::io;
    use std::sync::Mutex;
    use std::thread;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::mpsc;
    use std::time::{Duration, Instant};

    struct FailingSpawner;

    impl Spawn for FailingSpawner {
        fn spawn(
            &self,
            _name: &str,
            _stack_size: Option<usize>,
            _work: crate::core::spawn::Work,
        ) -> io::Result<()> {
            Err(io::Error::other("injected spawn failure"))
        }
    }

    fn ready_host() -> Arc<ReadyLatch> {
        Arc::new(ReadyLatch::ready())
    }

    fn wait_released(event_loop: &ProcessLoop) {
        let deadline = Instant::now() + Duration::from_secs(5);
        while event_loop.is_owned() {
            assert!(Instant::now() < deadline, "loop ownership never released");
            thread::sleep(Duration::from_millis(5));
        }
    }

    #[test]
    fn spawn_failure_returns_minus_one_without_callback() {
        let calls = Arc::new(AtomicUsize::new(0));
        let launcher = Launcher::builder(LauncherConfig::default(), Arc::new(ProcessLoop::new()))
            .with_spawner(FailingSpawner)
            .build();

        let counter = Arc::clone(&calls);
        let code = launcher.run(ready_host(), move |_| {
            counter.fetch_add(1, Ordering::SeqCst);
        });

        assert_eq!(code, EXIT_SPAWN_FAILED);
        assert_eq!(calls.load(Ordering::SeqCst), 0);

        let err = launcher.launch(ready_host(), |_| {}).unwrap_err();
        assert_eq!(
            err,
            LaunchError::SpawnFailed {
                error: "injected spawn failure".into()
            }
        );
    }

    #[test]
    fn owner_runs_callback_once_and_returns_zero_after_destroy() {
        let event_loop = Arc::new(ProcessLoop::new());
        let launcher = Launcher::new(event_loop.clone());
        let calls = Arc::new(AtomicUsize::new(0));
        let (tx, rx) = mpsc::channel();
        let caller = thread::current().id();

        let code = launcher.run(ready_host(), {
            let calls = Arc::clone(&calls);
            let event_loop = Arc::clone(&event_loop);
            move |ctx: HandoffContext<Arc<ReadyLatch>>| {
                calls.fetch_add(1, Ordering::SeqCst);
                tx.send((thread::current().id(), ctx.role())).unwrap();

                // Stop dispatching and end the launch from inside the loop.
                let quitter = Arc::clone(&event_loop);
                event_loop
                    .invoke(Box::new(move || {
                        quitter.quit();
                        ctx.destroy();
                    }))
                    .unwrap();
            }
        });

        assert_eq!(code, EXIT_OK);
        assert_eq!(calls.load(Ordering::SeqCst), 1);
        let (callback_thread, role) = rx.recv().unwrap();
        assert_ne!(callback_thread, caller);
        assert_eq!(role, Some(LoopRole::Owner));
        wait_released(&event_loop);
    }

    #[test]
    fn guest_callback_runs_on_the_foreign_owner_thread() {
        let event_loop = Arc::new(ProcessLoop::new());
        let (acquired_tx, acquired_rx) = mpsc::channel();

        let foreign = {
            let event_loop = Arc::clone(&event_loop);
            thread::Builder::new()
                .name("foreign-owner".into())
                .spawn(move || {
                    let ownership = Ownership::try_acquire(&*event_loop).expect("loop is free");
                    acquired_tx.send(()).unwrap();
                    ownership.event_loop().run();
                })
                .unwrap()
        };
        acquired_rx.recv().unwrap();

        let cfg = LauncherConfig {
            thread_name: "arbiter".into(),
            ..LauncherConfig::default()
        };
        let launcher = Launcher::builder(cfg, event_loop.clone()).build();
        let (seen_tx, seen_rx) = mpsc::channel();

        let code = launcher.run(ready_host(), move |ctx| {
            let name = thread::current().name().map(str::to_owned);
            seen_tx.send((name, ctx.role())).unwrap();
            ctx.destroy();
        });

        assert_eq!(code, EXIT_OK);
        assert!(event_loop.is_owned(), "guest launch must leave the foreign owner in place");
        let (name, role) = seen_rx.recv().unwrap();
        assert_eq!(name.as_deref(), Some("foreign-owner"));
        assert_eq!(role, Some(LoopRole::Guest));

        // A second launch still delegates to the same foreign owner.
        let (again_tx, again_rx) = mpsc::channel();
        let code = launcher.run(ready_host(), move |ctx| {
            again_tx.send(ctx.role()).unwrap();
            ctx.destroy();
        });
        assert_eq!(code, EXIT_OK);
        assert_eq!(again_rx.recv().unwrap(), Some(LoopRole::Guest));
        assert!(event_loop.is_owned());

        event_loop.quit();
        foreign.join().unwrap();
        assert!(!event_loop.is_owned());
    }

    #[tokio::test]
    async fn run_blocks_until_destroy_is_called() {
        let event_loop = Arc::new(ProcessLoop::new());
        let launcher = Launcher::new(event_loop.clone());
        let (ctx_tx, ctx_rx) = tokio::sync::oneshot::channel();
        let (done_tx, mut done_rx) = tokio::sync::oneshot::channel();

        // A plain thread: the launch must not hold up runtime shutdown if it hangs.
        thread::spawn(move || {
            let code = launcher.run(ready_host(), move |ctx| {
                let _ = ctx_tx.send(ctx);
            });
            let _ = done_tx.send(code);
        });

        let ctx = ctx_rx.await.expect("callback ran");
        let early = tokio::time::timeout(Duration::from_millis(200), &mut done_rx).await;
        assert!(early.is_err(), "run returned before destroy");

        ctx.destroy();
        let code = tokio::time::timeout(Duration::from_secs(5), done_rx)
            .await
            .expect("run returned after destroy")
            .expect("launcher thread reported");
        assert_eq!(code, EXIT_OK);

        event_loop.quit();
    }

    #[test]
    fn toolkit_failure_returns_minus_two_and_releases_the_loop() {
        let event_loop = Arc::new(
            ProcessLoop::new().with_toolkit_init(|| Err(ToolkitError::new("no display"))),
        );
        let launcher = Launcher::new(event_loop.clone());
        let calls = Arc::new(AtomicUsize::new(0));

        let counter = Arc::clone(&calls);
        let code = launcher.run(ready_host(), move |_| {
            counter.fetch_add(1, Ordering::SeqCst);
        });
        assert_eq!(code, EXIT_TOOLKIT_INIT_FAILED);
        assert_eq!(calls.load(Ordering::SeqCst), 0);
        assert!(!event_loop.is_owned());

        let err = launcher.launch(ready_host(), |_| {}).unwrap_err();
        assert_eq!(
            err,
            LaunchError::ToolkitInit {
                error: "no display".into()
            }
        );
    }

    #[test]
    fn retry_after_toolkit_failure_becomes_owner() {
        let attempts = Arc::new(AtomicUsize::new(0));
        let event_loop = Arc::new(ProcessLoop::new().with_toolkit_init({
            let attempts = Arc::clone(&attempts);
            move || match attempts.fetch_add(1, Ordering::SeqCst) {
                0 => Err(ToolkitError::new("no display yet")),
                _ => Ok(()),
            }
        }));
        let launcher = Launcher::new(event_loop.clone());

        assert_eq!(launcher.run(ready_host(), |_| {}), EXIT_TOOLKIT_INIT_FAILED);

        let (tx, rx) = mpsc::channel();
        let quitter = Arc::clone(&event_loop);
        let code = launcher.run(ready_host(), move |ctx| {
            tx.send(ctx.role()).unwrap();
            quitter.quit();
            ctx.destroy();
        });
        assert_eq!(code, EXIT_OK);
        assert_eq!(rx.recv().unwrap(), Some(LoopRole::Owner));
        wait_released(&event_loop);
    }

    #[test]
    fn host_readiness_gates_the_worker() {
        let event_loop = Arc::new(ProcessLoop::new());
        let launcher = Launcher::new(event_loop.clone());
        let host = Arc::new(ReadyLatch::new());

        let setter = {
            let host = Arc::clone(&host);
            thread::spawn(move || {
                thread::sleep(Duration::from_millis(30));
                host.set();
            })
        };

        let quitter = Arc::clone(&event_loop);
        let code = launcher.run(Arc::clone(&host), move |ctx| {
            assert!(ctx.host().is_set());
            quitter.quit();
            ctx.destroy();
        });

        assert_eq!(code, EXIT_OK);
        setter.join().unwrap();
        wait_released(&event_loop);
    }

    fn must_not_run() {
        panic!("windowing init ran twice");
    }

    // Only test in this binary that touches the process-wide windowing guard.
    #[test]
    fn windowing_init_runs_exactly_once_per_process() {
        static CALLS: AtomicUsize = AtomicUsize::new(0);
        assert!(!windowing::windowing_initialized());

        let launcher = Launcher::builder(LauncherConfig::default(), Arc::new(ProcessLoop::new()))
            .with_spawner(FailingSpawner)
            .with_windowing_init(|| {
                CALLS.fetch_add(1, Ordering::SeqCst);
            })
            .build();

        launcher.run(ready_host(), |_| {});
        assert_eq!(CALLS.load(Ordering::SeqCst), 1);
        assert!(windowing::windowing_initialized());

        launcher.run(ready_host(), |_| {});
        let other = Launcher::builder(LauncherConfig::default(), Arc::new(ProcessLoop::new()))
            .with_spawner(FailingSpawner)
            .with_windowing_init(must_not_run)
            .build();
        other.run(ready_host(), |_| {});

        assert_eq!(CALLS.load(Ordering::SeqCst), 1);
    }

    struct Recorder {
        seen: Mutex<mpsc::Sender<EventKind>>,
    }

    #[async_trait]
    impl Subscribe for Recorder {
        async fn on_event(&self, event: &Event) {
            let _ = self.seen.lock().unwrap().send(event.kind);
        }

        fn name(&self) -> &'static str {
            "recorder"
        }
    }

    #[test]
    fn listener_spawn_failure_is_reported_to_subscribers() {
        let (tx, rx) = mpsc::channel();
        let subs: Vec<Arc<dyn Subscribe>> = vec![Arc::new(Recorder {
            seen: Mutex::new(tx),
        })];
        let bus = Bus::new(16);
        let set = Arc::new(SubscriberSet::new(subs, bus.clone()));

        let err = Launcher::subscriber_listener(&bus, set, &FailingSpawner).unwrap_err();
        assert_eq!(err.to_string(), "injected spawn failure");
        assert_eq!(
            rx.recv_timeout(Duration::from_secs(5)).unwrap(),
            EventKind::SubscriberListenerFailed
        );
    }

    #[test]
    fn subscribers_observe_the_launch() {
        let (tx, rx) = mpsc::channel();
        let subs: Vec<Arc<dyn Subscribe>> = vec![Arc::new(Recorder {
            seen: Mutex::new(tx),
        })];
        let launcher = Launcher::builder(LauncherConfig::default(), Arc::new(ProcessLoop::new()))
            .with_spawner(FailingSpawner)
            .with_subscribers(subs)
            .build();

        assert_eq!(launcher.run(ready_host(), |_| {}), EXIT_SPAWN_FAILED);

        let mut kinds = Vec::new();
        while let Ok(kind) = rx.recv_timeout(Duration::from_secs(5)) {
            kinds.push(kind);
            if kind == EventKind::LaunchFinished {
                break;
            }
        }
        assert_eq!(
            kinds,
            vec![
                EventKind::LaunchRequested,
                EventKind::HostReady,
                EventKind::SpawnFailed,
                EventKind::ShutdownSignaled,
                EventKind::LaunchFinished,
            ]
        );
    }
}
