use std::io;
use thiserror::Error;

/// Error type for thread pool operations.
#[derive(Error, Debug)]
pub enum PoolError {
    /// The pool was configured with zero worker threads.
    #[error("thread pool requires at least one worker thread")]
    ZeroWorkers,

    /// Work was submitted before `init` spawned the workers.
    #[error("thread pool has not been initialized")]
    NotInitialized,

    /// `init` was called on a pool that already spawned its workers.
    #[error("thread pool is already initialized")]
    AlreadyInitialized,

    /// Work was submitted after shutdown began; the task was not enqueued.
    #[error("thread pool is shut down and no longer accepts work")]
    ShutDown,

    /// `shutdown` was called on a pool that has already been shut down.
    #[error("thread pool was already shut down")]
    AlreadyShutDown,

    /// The task's callable panicked while a worker was executing it.
    ///
    /// Surfaced only through the task's own [`TaskHandle`](crate::TaskHandle);
    /// the worker that ran the task keeps processing subsequent tasks.
    #[error("task panicked: {0}")]
    TaskPanicked(String),

    /// IO error from spawning a worker thread.
    #[error("IO error: {0}")]
    Io(#[from] io::Error),
}

/// Result type alias for thread pool operations.
pub type Result<T> = std::result::Result<T, PoolError>;
