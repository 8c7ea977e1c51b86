//! # Subscriber extension point.
//!
//! Implement [`Subscribe`] to observe a launch: logging, metrics, test probes.
//! The [`SubscriberSet`](crate::subscribers::SubscriberSet) gives every
//! subscriber its own bounded queue and worker thread, so a slow `on_event`
//! only delays that subscriber. When its queue is full, new events for it are
//! dropped and reported as `SubscriberOverflow`.
//!
//! The worker polls `on_event` with `futures::executor::block_on`; there is no
//! tokio runtime around it.
//!
//! ```rust
//! use loopvisor::{Event, EventKind, Subscribe};
//!
//! struct Audit;
//!
//! #[async_trait::async_trait]
//! impl Subscribe for Audit {
//!     async fn on_event(&self, ev: &Event) {
//!         if ev.kind == EventKind::ToolkitInitFailed {
//!             eprintln!("plugin UI unavailable: {:?}", ev.reason);
//!         }
//!     }
//!     fn name(&self) -> &'static str { "audit" }
//!     fn queue_capacity(&self) -> usize { 64 }
//! }
//! ```

use async_trait::async_trait;

use crate::events::Event;

/// Receives launch events on a dedicated worker thread.
#[async_trait]
pub trait Subscribe: Send + Sync + 'static {
    /// Handles one event.
    async fn on_event(&self, event: &Event);

    /// Name used for the worker thread and in overflow/panic events.
    fn name(&self) -> &'static str {
        std::any::type_name::<Self>()
    }

    /// Capacity of this subscriber's queue.
    fn queue_capacity(&self) -> usize {
        256
    }
}
