//! # Worker thread spawning.
//!
//! The launcher creates exactly one detached worker per launch through the
//! [`Spawn`] trait. [`ThreadSpawner`] is the production implementation; the trait
//! exists so embedders can route thread creation through the host (or inject
//! failures in tests).

use std::io;
use std::thread;

/// Work executed on the spawned thread.
pub type Work = Box<dyn FnOnce() + Send + 'static>;

/// Creates detached threads.
pub trait Spawn: Send + Sync + 'static {
    /// Starts `work` on a new thread. The thread is never joined.
    ///
    /// Returning an error means `work` was dropped without running.
    fn spawn(&self, name: &str, stack_size: Option<usize>, work: Work) -> io::Result<()>;
}

/// Spawns plain OS threads with [`std::thread::Builder`].
#[derive(Clone, Copy, Debug, Default)]
pub struct ThreadSpawner;

impl Spawn for ThreadSpawner {
    fn spawn(&self, name: &str, stack_size: Option<usize>, work: Work) -> io::Result<()> {
        let mut builder = thread::Builder::new().name(name.to_owned());
        if let Some(size) = stack_size {
            builder = builder.stack_size(size);
        }
        // Dropping the handle detaches the thread.
        builder.spawn(work).map(drop)
    }
}
