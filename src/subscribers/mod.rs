//! # Event subscribers for the loopvisor launcher.
//!
//! This module provides the [`Subscribe`] trait and the [`SubscriberSet`] fan-out
//! for handling events broadcast through the [`Bus`](crate::events::Bus).
//!
//! ## Architecture
//! ```text
//! Launcher / Arbiter / destroy ── publish(Event) ──► Bus ──► listener thread
//!                                                               │
//!                                                               ▼
//!                                                        SubscriberSet::emit
//!                                                     ┌─────────┼─────────┐
//!                                                     ▼         ▼         ▼
//!                                                 LogWriter  Metrics   Custom
//! ```

#[cfg(feature = "logging")]
mod log;
mod set;
mod subscribe;

#[cfg(feature = "logging")]
pub use log::LogWriter;
pub use set::SubscriberSet;
pub use subscribe::Subscribe;
