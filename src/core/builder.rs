use std::sync::Arc;

use super::{
    config::LauncherConfig,
    launcher::Launcher,
    spawn::{Spawn, ThreadSpawner},
    windowing::WindowingInit,
};
use crate::{
    events::Bus,
    subscribers::{Subscribe, SubscriberSet},
    toolkit::LoopRef,
};

/// Builder for constructing a [`Launcher`] with optional collaborators.
pub struct LauncherBuilder {
    cfg: LauncherConfig,
    event_loop: LoopRef,
    subscribers: Vec<Arc<dyn Subscribe>>,
    spawner: Arc<dyn Spawn>,
    windowing_init: Option<WindowingInit>,
}

impl LauncherBuilder {
    /// Creates a new builder with the given configuration and event loop.
    pub fn new(cfg: LauncherConfig, event_loop: LoopRef) -> Self {
        Self {
            cfg,
            event_loop,
            subscribers: Vec::new(),
            spawner: Arc::new(ThreadSpawner),
            windowing_init: None,
        }
    }

    /// Sets event subscribers for observability.
    ///
    /// Subscribers receive launch events (readiness, ownership, shutdown, etc.)
    /// through dedicated workers with bounded queues.
    pub fn with_subscribers(mut self, subscribers: Vec<Arc<dyn Subscribe>>) -> Self {
        self.subscribers = subscribers;
        self
    }

    /// Replaces the thread spawner used for the arbiter worker.
    pub fn with_spawner(mut self, spawner: impl Spawn) -> Self {
        self.spawner = Arc::new(spawner);
        self
    }

    /// Sets the process-wide windowing thread-safety initialization.
    ///
    /// It runs at most once per process, on the first launch of any launcher
    /// that has one configured.
    pub fn with_windowing_init<F>(mut self, init: F) -> Self
    where
        F: Fn() + Send + Sync + 'static,
    {
        self.windowing_init = Some(Arc::new(init));
        self
    }

    /// Builds and returns the launcher.
    ///
    /// This consumes the builder and initializes:
    /// - Event bus for broadcasting
    /// - Subscriber workers and the bus listener (only if subscribers were set)
    pub fn build(self) -> Launcher {
        let bus = Bus::new(self.cfg.bus_capacity_clamped());

        if !self.subscribers.is_empty() {
            let subs = Arc::new(SubscriberSet::new(self.subscribers, bus.clone()));
            // A spawn failure is already delivered to the subscribers themselves.
            let _ = Launcher::subscriber_listener(&bus, subs, &ThreadSpawner);
        }

        Launcher::new_internal(
            self.cfg,
            self.event_loop,
            self.spawner,
            self.windowing_init,
            bus,
        )
    }
}
