//! # Launcher configuration.
//!
//! Provides [`LauncherConfig`], the settings shared by every launch performed
//! through one [`Launcher`](crate::Launcher).
//!
//! ## Sentinel values
//! - `stack_size = 0` → platform default stack size for the worker thread
//! - `bus_capacity = 0` → clamped to 1

use std::borrow::Cow;

/// Configuration for the launcher.
///
/// ## Field semantics
/// - `thread_name`: Name given to the arbiter (and possibly loop-owning) thread
/// - `stack_size`: Worker stack size in bytes (`0` = platform default)
/// - `bus_capacity`: Event bus ring buffer size (min 1; clamped by Bus)
///
/// ## Notes
/// There is no timeout setting: the launcher blocks until user
/// code signals shutdown, and the host readiness wait is unbounded.
#[derive(Clone, Debug)]
pub struct LauncherConfig {
    /// Name of the worker thread spawned for each launch.
    ///
    /// When the worker wins loop ownership it lives as long as the loop runs,
    /// so the name shows up in debuggers and in event `thread` fields.
    pub thread_name: Cow<'static, str>,

    /// Worker thread stack size in bytes.
    ///
    /// - `0` = platform default
    /// - `n > 0` = passed to the thread builder as is
    pub stack_size: usize,

    /// Capacity of the event bus broadcast channel ring buffer.
    pub bus_capacity: usize,
}

impl LauncherConfig {
    /// Returns the worker stack size as an `Option`.
    ///
    /// - `None` → platform default
    /// - `Some(n)` → explicit size
    #[inline]
    pub fn stack_size_opt(&self) -> Option<usize> {
        if self.stack_size == 0 {
            None
        } else {
            Some(self.stack_size)
        }
    }

    /// Returns a bus capacity clamped to a minimum of 1.
    #[inline]
    pub fn bus_capacity_clamped(&self) -> usize {
        self.bus_capacity.max(1)
    }
}

impl Default for LauncherConfig {
    /// Default configuration:
    ///
    /// - `thread_name = "loopvisor-worker"`
    /// - `stack_size = 0` (platform default)
    /// - `bus_capacity = 256`
    fn default() -> Self {
        Self {
            thread_name: Cow::Borrowed("loopvisor-worker"),
            stack_size: 0,
            bus_capacity: 256,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sentinels_map_to_defaults() {
        let cfg = LauncherConfig {
            bus_capacity: 0,
            ..LauncherConfig::default()
        };
        assert_eq!(cfg.stack_size_opt(), None);
        assert_eq!(cfg.bus_capacity_clamped(), 1);

        let cfg = LauncherConfig {
            stack_size: 512 * 1024,
            ..LauncherConfig::default()
        };
        assert_eq!(cfg.stack_size_opt(), Some(512 * 1024));
    }
}
