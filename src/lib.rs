#![deny(missing_docs)]

//! A fixed-size worker thread pool with blocking result handles.
//!
//! Submitted closures are type-erased into tasks, queued on a shared
//! FIFO, and executed by a fixed set of long-lived worker threads.
//! Each submission returns a [`TaskHandle`] through which the task's
//! value (or its panic) is retrieved. Shutdown is graceful: the pool
//! stops accepting work, drains everything already queued, then joins
//! its workers.
//!
//! ```no_run
//! use workpool::ThreadPool;
//!
//! # fn main() -> workpool::Result<()> {
//! let mut pool = ThreadPool::new(4)?;
//! pool.init()?;
//! let product = pool.submit(|| 5 * 6)?;
//! assert_eq!(product.get()?, 30);
//! pool.shutdown()?;
//! # Ok(())
//! # }
//! ```

mod error;
mod pool;
mod queue;
mod task;

pub use error::{PoolError, Result};
pub use pool::{ThreadPool, DEFAULT_WORKERS};
pub use task::TaskHandle;
