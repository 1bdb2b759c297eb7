use std::any::Any;
use std::panic::{self, AssertUnwindSafe};
use std::sync::{Arc, Condvar, Mutex, MutexGuard};

use crate::{PoolError, Result};

/// A type-erased unit of work: the submitted callable already bound to
/// its arguments (through closure capture), runnable with no further
/// input. Moved into exactly one worker and executed exactly once.
pub(crate) type Job = Box<dyn FnOnce() + Send + 'static>;

/// The caller-facing handle to a submitted task's eventual outcome.
///
/// The worker that executes the task writes the outcome exactly once;
/// any thread holding the handle may block until that write happens.
/// Dropping the handle without reading it is fine: the task still runs,
/// only its result is discarded.
pub struct TaskHandle<R> {
    cell: Arc<ResultCell<R>>,
}

struct ResultCell<R> {
    slot: Mutex<Option<Result<R>>>,
    done: Condvar,
}

impl<R> ResultCell<R> {
    fn lock(&self) -> MutexGuard<'_, Option<Result<R>>> {
        self.slot.lock().expect("task result mutex poisoned")
    }

    fn complete(&self, outcome: Result<R>) {
        let mut slot = self.lock();
        debug_assert!(slot.is_none(), "task result written twice");
        *slot = Some(outcome);
        self.done.notify_all();
    }
}

impl<R> TaskHandle<R> {
    /// Blocks the calling thread until the task has finished, then
    /// returns its value, or [`PoolError::TaskPanicked`] if the task's
    /// callable panicked.
    ///
    /// There is no built-in timeout; a worker calling `get` on a handle
    /// whose task is still queued behind it can deadlock the pool.
    pub fn get(self) -> Result<R> {
        let mut slot = self.cell.lock();
        loop {
            if let Some(outcome) = slot.take() {
                return outcome;
            }
            slot = self
                .cell
                .done
                .wait(slot)
                .expect("task result mutex poisoned");
        }
    }

    /// Blocks until the task has finished, without consuming the handle
    /// or the result.
    pub fn wait(&self) {
        let mut slot = self.cell.lock();
        while slot.is_none() {
            slot = self
                .cell
                .done
                .wait(slot)
                .expect("task result mutex poisoned");
        }
    }

    /// Whether the task has finished. Never blocks.
    pub fn is_finished(&self) -> bool {
        self.cell.lock().is_some()
    }
}

/// Erases `f` into a [`Job`] paired with the handle its outcome will be
/// delivered through.
///
/// The job runs `f` under `catch_unwind`: a panicking task completes its
/// handle with the rendered panic payload instead of unwinding into the
/// worker's loop.
pub(crate) fn package<F, R>(f: F) -> (Job, TaskHandle<R>)
where
    F: FnOnce() -> R + Send + 'static,
    R: Send + 'static,
{
    let cell = Arc::new(ResultCell {
        slot: Mutex::new(None),
        done: Condvar::new(),
    });
    let handle = TaskHandle {
        cell: Arc::clone(&cell),
    };

    let job = Box::new(move || {
        let outcome = panic::catch_unwind(AssertUnwindSafe(f))
            .map_err(|payload| PoolError::TaskPanicked(panic_message(payload.as_ref())));
        cell.complete(outcome);
    });

    (job, handle)
}

/// Renders a panic payload into the message string carried by
/// [`PoolError::TaskPanicked`].
fn panic_message(payload: &(dyn Any + Send)) -> String {
    if let Some(msg) = payload.downcast_ref::<&str>() {
        (*msg).to_owned()
    } else if let Some(msg) = payload.downcast_ref::<String>() {
        msg.clone()
    } else {
        "opaque panic payload".to_owned()
    }
}
