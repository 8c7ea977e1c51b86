//! Error types used by the loopvisor launcher and its collaborators.
//!
//! This module defines:
//!
//! - [`LaunchError`]: failures that end a launch before user code ever runs.
//! - [`ToolkitError`]: failures reported by an [`EventLoop`](crate::EventLoop) binding.
//!
//! Errors never cross the worker/launcher thread boundary as values the caller
//! has to unwind; they are folded into the integer exit code returned by
//! [`Launcher::run`](crate::Launcher::run) (see [`LaunchError::exit_code`]).

use thiserror::Error;

/// Exit code of a launch that ended through a regular shutdown signal.
pub const EXIT_OK: i32 = 0;
/// Exit code of a launch whose worker thread could not be spawned.
pub const EXIT_SPAWN_FAILED: i32 = -1;
/// Exit code of a launch whose loop-owning thread failed toolkit initialization.
pub const EXIT_TOOLKIT_INIT_FAILED: i32 = -2;

/// # Errors that terminate a launch.
///
/// In both cases the user callback is **never** invoked. Embedders must treat
/// "callback never called" as a legitimate outcome and check the exit code.
#[non_exhaustive]
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum LaunchError {
    /// The worker thread running the ownership arbiter could not be created.
    #[error("failed to spawn worker thread: {error}")]
    SpawnFailed {
        /// The underlying OS error message.
        error: String,
    },

    /// The thread that won loop ownership could not initialize the toolkit.
    #[error("toolkit initialization failed: {error}")]
    ToolkitInit {
        /// The message reported by the toolkit binding.
        error: String,
    },
}

impl LaunchError {
    /// Returns a short stable label (snake_case) for use in logs/metrics.
    ///
    /// # Example
    /// ```
    /// use loopvisor::LaunchError;
    ///
    /// let err = LaunchError::SpawnFailed { error: "EAGAIN".into() };
    /// assert_eq!(err.as_label(), "launch_spawn_failed");
    /// ```
    pub fn as_label(&self) -> &'static str {
        match self {
            LaunchError::SpawnFailed { .. } => "launch_spawn_failed",
            LaunchError::ToolkitInit { .. } => "launch_toolkit_init",
        }
    }

    /// Returns a human-readable message with details about the error.
    pub fn as_message(&self) -> String {
        match self {
            LaunchError::SpawnFailed { error } => format!("spawn failed: {error}"),
            LaunchError::ToolkitInit { error } => format!("toolkit init: {error}"),
        }
    }

    /// Returns the (negative) exit code surfaced through [`Launcher::run`](crate::Launcher::run).
    ///
    /// # Example
    /// ```
    /// use loopvisor::{EXIT_TOOLKIT_INIT_FAILED, LaunchError};
    ///
    /// let err = LaunchError::ToolkitInit { error: "no display".into() };
    /// assert_eq!(err.exit_code(), EXIT_TOOLKIT_INIT_FAILED);
    /// ```
    pub fn exit_code(&self) -> i32 {
        match self {
            LaunchError::SpawnFailed { .. } => EXIT_SPAWN_FAILED,
            LaunchError::ToolkitInit { .. } => EXIT_TOOLKIT_INIT_FAILED,
        }
    }
}

/// Error reported by an event loop binding.
///
/// Carries only a message: bindings wrap foreign toolkit errors which rarely
/// have a meaningful Rust type.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("{message}")]
pub struct ToolkitError {
    message: String,
}

impl ToolkitError {
    /// Creates an error from any displayable message.
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }

    /// Returns the error message.
    pub fn message(&self) -> &str {
        &self.message
    }
}
