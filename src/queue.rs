use std::collections::VecDeque;
use std::sync::{Condvar, Mutex, MutexGuard};

use crate::{PoolError, Result};

/// A closeable FIFO queue shared between submitters and workers.
///
/// One mutex guards both the queue contents and the close flag, so a
/// push can be rejected atomically with respect to the stop decision a
/// worker makes, and a waiting worker can never miss a wakeup: the wake
/// predicate (item available, or closed) is re-checked under the same
/// lock on every wakeup, spurious ones included.
///
/// The queue is unbounded. Sustained submission faster than the workers
/// can drain grows it without limit; callers needing backpressure must
/// layer it on top.
pub(crate) struct SharedQueue<T> {
    inner: Mutex<Inner<T>>,
    available: Condvar,
}

struct Inner<T> {
    items: VecDeque<T>,
    closed: bool,
}

impl<T> SharedQueue<T> {
    pub(crate) fn new() -> Self {
        SharedQueue {
            inner: Mutex::new(Inner {
                items: VecDeque::new(),
                closed: false,
            }),
            available: Condvar::new(),
        }
    }

    fn lock(&self) -> MutexGuard<'_, Inner<T>> {
        // Queue state is only ever mutated by this module, which never
        // panics while holding the lock, so poisoning cannot occur.
        self.inner.lock().expect("shared queue mutex poisoned")
    }

    /// Appends an item at the tail and wakes one waiter.
    ///
    /// Never blocks beyond the lock itself. Fails with
    /// [`PoolError::ShutDown`] once the queue has been closed; the check
    /// and the insert happen under the same lock.
    pub(crate) fn push(&self, item: T) -> Result<()> {
        let mut inner = self.lock();
        if inner.closed {
            return Err(PoolError::ShutDown);
        }
        inner.items.push_back(item);
        self.available.notify_one();
        Ok(())
    }

    /// Removes and returns the head item, or `None` when the queue is
    /// currently empty. Never blocks.
    pub(crate) fn try_pop(&self) -> Option<T> {
        self.lock().items.pop_front()
    }

    /// Blocks until an item can be popped or the queue is closed *and*
    /// drained, in which case `None` is returned.
    ///
    /// A close with items still queued keeps yielding those items; the
    /// terminal `None` is only observed once the backlog is gone.
    pub(crate) fn wait_pop(&self) -> Option<T> {
        let mut inner = self.lock();
        loop {
            if let Some(item) = inner.items.pop_front() {
                return Some(item);
            }
            if inner.closed {
                return None;
            }
            inner = self
                .available
                .wait(inner)
                .expect("shared queue mutex poisoned");
        }
    }

    /// Closes the queue and wakes every waiter so none sleeps through
    /// the state change. Closing is monotonic; a second call fails with
    /// [`PoolError::AlreadyShutDown`].
    pub(crate) fn close(&self) -> Result<()> {
        let mut inner = self.lock();
        if inner.closed {
            return Err(PoolError::AlreadyShutDown);
        }
        inner.closed = true;
        self.available.notify_all();
        Ok(())
    }

    /// Number of queued items at the instant of the call. Diagnostic
    /// only: stale as soon as the lock is released.
    pub(crate) fn len(&self) -> usize {
        self.lock().items.len()
    }

    pub(crate) fn is_empty(&self) -> bool {
        self.lock().items.is_empty()
    }
}
