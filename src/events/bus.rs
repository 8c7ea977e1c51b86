//! # Launch event bus.
//!
//! Every thread that takes part in a launch (the caller, the worker, the loop
//! owner running a delegated callback, whoever calls `destroy`) reports what it
//! did by publishing an [`Event`] on the launcher's [`Bus`]. Sending never needs
//! an async runtime: `broadcast::Sender::send` is a plain synchronous call.
//!
//! ```text
//!   caller thread  ──┐
//!   worker thread  ──┼──► Bus ──► listener thread ──► SubscriberSet
//!   loop owner     ──┘
//! ```
//!
//! Delivery is best effort. One ring buffer of `capacity` events is shared by
//! all receivers; a receiver that falls behind sees `Lagged(n)` and loses the
//! `n` oldest events. Events published while nobody listens are gone.

use tokio::sync::broadcast;

use super::event::Event;

/// Cloneable publish handle for launch events.
#[derive(Clone, Debug)]
pub struct Bus {
    tx: broadcast::Sender<Event>,
}

impl Bus {
    /// Creates a bus whose ring buffer holds `capacity` events (at least one).
    pub fn new(capacity: usize) -> Self {
        let (tx, _) = broadcast::channel::<Event>(capacity.max(1));
        Self { tx }
    }

    /// Publishes `ev`; dropped silently when there is no receiver.
    pub fn publish(&self, ev: Event) {
        let _ = self.tx.send(ev);
    }

    /// Returns a new receiver. It sees only events published after this call.
    pub fn subscribe(&self) -> broadcast::Receiver<Event> {
        self.tx.subscribe()
    }
}
