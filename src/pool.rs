use std::sync::Arc;
use std::thread;

use log::{debug, error};

use crate::queue::SharedQueue;
use crate::task::{self, Job, TaskHandle};
use crate::{PoolError, Result};

/// A fixed-size pool of long-lived worker threads fed from a shared
/// FIFO queue.
///
/// Lifecycle is explicit: [`new`](ThreadPool::new) records the size,
/// [`init`](ThreadPool::init) spawns the workers, and
/// [`shutdown`](ThreadPool::shutdown) stops accepting work, drains
/// everything already queued, and joins the workers. A pool that is
/// dropped while still running performs the same graceful shutdown.
///
/// The queue is unbounded and submission never blocks; there is no
/// backpressure, prioritization, resizing, or cancellation.
pub struct ThreadPool {
    queue: Arc<SharedQueue<Job>>,
    workers: Vec<Worker>,
    size: u32,
    phase: Phase,
}

/// Worker-count used by [`ThreadPool::with_default_size`].
pub const DEFAULT_WORKERS: u32 = 4;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Phase {
    Created,
    Running,
    Stopped,
}

struct Worker {
    id: u32,
    handle: Option<thread::JoinHandle<()>>,
}

impl ThreadPool {
    /// Creates a pool configured for `size` worker threads without
    /// spawning any of them yet.
    ///
    /// # Errors
    ///
    /// Returns [`PoolError::ZeroWorkers`] if `size` is zero.
    pub fn new(size: u32) -> Result<Self> {
        if size == 0 {
            return Err(PoolError::ZeroWorkers);
        }
        Ok(ThreadPool {
            queue: Arc::new(SharedQueue::new()),
            workers: Vec::with_capacity(size as usize),
            size,
            phase: Phase::Created,
        })
    }

    /// Creates a pool configured for [`DEFAULT_WORKERS`] threads.
    pub fn with_default_size() -> Result<Self> {
        Self::new(DEFAULT_WORKERS)
    }

    /// Spawns the configured number of worker threads. Must be called
    /// exactly once, before any [`submit`](ThreadPool::submit).
    ///
    /// # Errors
    ///
    /// Returns [`PoolError::AlreadyInitialized`] on a repeated call. If
    /// spawning any thread fails, previously spawned workers are joined
    /// and the spawn error is returned; the pool is left shut down.
    pub fn init(&mut self) -> Result<()> {
        match self.phase {
            Phase::Created => {}
            Phase::Running => return Err(PoolError::AlreadyInitialized),
            Phase::Stopped => return Err(PoolError::ShutDown),
        }

        for id in 0..self.size {
            match Worker::spawn(id, Arc::clone(&self.queue)) {
                Ok(worker) => self.workers.push(worker),
                Err(e) => {
                    error!("failed to spawn worker {id}: {e}");
                    self.phase = Phase::Stopped;
                    let _ = self.queue.close();
                    self.join_workers();
                    return Err(e);
                }
            }
        }

        self.phase = Phase::Running;
        debug!("pool initialized with {} workers", self.size);
        Ok(())
    }

    /// Submits `f` for execution on some worker thread, returning a
    /// handle to its eventual result. Never blocks: the task is queued,
    /// one idle worker is woken, and the handle is returned immediately.
    ///
    /// Arguments are bound by closure capture; their ownership moves
    /// into the task at submission time.
    ///
    /// # Errors
    ///
    /// Returns [`PoolError::NotInitialized`] before [`init`](Self::init)
    /// has run, and [`PoolError::ShutDown`] once shutdown has begun.
    /// The shutdown check is made under the queue lock, so a submission
    /// racing with `shutdown` is either queued and drained or rejected,
    /// never silently dropped.
    pub fn submit<F, R>(&self, f: F) -> Result<TaskHandle<R>>
    where
        F: FnOnce() -> R + Send + 'static,
        R: Send + 'static,
    {
        match self.phase {
            Phase::Created => return Err(PoolError::NotInitialized),
            Phase::Stopped => return Err(PoolError::ShutDown),
            Phase::Running => {}
        }

        let (job, handle) = task::package(f);
        self.queue.push(job)?;
        Ok(handle)
    }

    /// Stops the pool: no further submissions are accepted, every task
    /// already queued is executed, and all workers are joined. Blocks
    /// until the drain is complete, with no timeout.
    ///
    /// # Errors
    ///
    /// Returns [`PoolError::AlreadyShutDown`] on a repeated call.
    pub fn shutdown(&mut self) -> Result<()> {
        if self.phase == Phase::Stopped {
            return Err(PoolError::AlreadyShutDown);
        }
        self.phase = Phase::Stopped;

        debug!("pool shutting down, {} tasks queued", self.queue.len());
        self.queue.close()?;
        self.join_workers();
        debug!("pool shut down");
        Ok(())
    }

    /// Number of tasks queued but not yet picked up by a worker.
    ///
    /// A point-in-time snapshot, stale as soon as it is returned; useful
    /// for diagnostics, never for synchronization.
    pub fn queued_tasks(&self) -> usize {
        self.queue.len()
    }

    /// Whether the queue currently holds no pending tasks. Same
    /// snapshot semantics as [`queued_tasks`](Self::queued_tasks);
    /// tasks already running on workers are not counted.
    pub fn is_idle(&self) -> bool {
        self.queue.is_empty()
    }

    /// The configured worker-thread count.
    pub fn thread_count(&self) -> u32 {
        self.size
    }

    fn join_workers(&mut self) {
        for worker in &mut self.workers {
            if let Some(handle) = worker.handle.take() {
                if handle.join().is_err() {
                    error!("worker {} terminated abnormally", worker.id);
                }
            }
        }
    }
}

impl Drop for ThreadPool {
    fn drop(&mut self) {
        if self.phase == Phase::Running {
            self.phase = Phase::Stopped;
            let _ = self.queue.close();
            self.join_workers();
        }
    }
}

impl Worker {
    /// Spawns one worker thread running the dequeue-execute loop.
    fn spawn(id: u32, queue: Arc<SharedQueue<Job>>) -> Result<Self> {
        let handle = thread::Builder::new()
            .name(format!("pool-worker-{id}"))
            .spawn(move || {
                while let Some(job) = queue.wait_pop() {
                    debug!("worker {id} executing task");
                    // Panics inside the task are caught by its wrapper
                    // and delivered through the task's handle, so the
                    // loop continues past a failing task.
                    job();
                }
                debug!("worker {id} stopping: queue closed and drained");
            })?;

        Ok(Worker {
            id,
            handle: Some(handle),
        })
    }
}
