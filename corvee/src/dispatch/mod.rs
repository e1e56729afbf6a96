//! The worker pool that runs submitted tasks.
//!
//! This module provides the execution half of the framework:
//!
//! - [`Dispatcher`] — a handle to a pool of worker threads draining one
//!   shared FIFO queue,
//! - [`DispatcherBuilder`] — configuration of the pool size,
//! - [`shared`] / [`install`] — the process-wide shared dispatcher, created
//!   as a single worker on first use and replaceable by the host
//!   application.
//!
//! With the default single worker, all task executions are serialized:
//! submission order is execution order. Promises may instead be pinned to a
//! dedicated pool via [`Promise::with_dispatcher`](crate::Promise::with_dispatcher).

mod builder;
mod global;
mod queue;
mod worker;

pub use builder::DispatcherBuilder;
pub use global::{install, shared};

use std::sync::{Arc, Mutex};
use std::thread::{self, JoinHandle};

use crate::task::Runnable;

use self::queue::{JobQueue, QueueHandle};
use self::worker::Worker;

/// A cloneable handle to a pool of worker threads.
///
/// All clones share the same pool; the pool shuts down when the last handle
/// is dropped. Submitting through a `Dispatcher` never blocks the caller.
pub struct Dispatcher {
    pool: Arc<Pool>,
}

impl Clone for Dispatcher {
    fn clone(&self) -> Self {
        Self {
            pool: self.pool.clone(),
        }
    }
}

/// The worker threads and queue owned by one dispatcher.
struct Pool {
    /// Shared job queue drained by all workers.
    queue: QueueHandle,

    /// Join handles for worker threads.
    handles: Mutex<Vec<JoinHandle<()>>>,
}

impl Dispatcher {
    /// Creates a new dispatcher with the given number of worker threads.
    pub(crate) fn new(threads: usize) -> Self {
        let queue = Arc::new(JobQueue::new());

        let mut handles = Vec::with_capacity(threads);
        for id in 0..threads {
            let worker = Worker::new(id, queue.clone());
            handles.push(thread::spawn(move || worker.run()));
        }

        log::debug!("dispatcher started with {threads} worker thread(s)");

        Self {
            pool: Arc::new(Pool {
                queue,
                handles: Mutex::new(handles),
            }),
        }
    }

    /// Submits a unit of work to the pool.
    ///
    /// Jobs submitted after shutdown has begun are silently ignored.
    pub(crate) fn submit(&self, job: Arc<dyn Runnable>) {
        if self.pool.queue.is_shutdown() {
            return;
        }

        self.pool.queue.push(job);
    }
}

impl Drop for Pool {
    /// Shuts down the pool.
    ///
    /// Signals all workers to stop, then joins their threads. A job already
    /// being executed runs to completion; jobs still queued are discarded.
    fn drop(&mut self) {
        self.queue.shutdown();

        for handle in self.handles.lock().unwrap().drain(..) {
            let _ = handle.join();
        }
    }
}
