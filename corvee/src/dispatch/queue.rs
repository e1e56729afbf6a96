use std::collections::VecDeque;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Condvar, Mutex};
use std::time::Duration;

use crate::task::Runnable;

/// Shared handle to a dispatcher's job queue.
pub(crate) type QueueHandle = Arc<JobQueue>;

/// FIFO job queue shared by all workers of one dispatcher.
///
/// Submitted tasks are pushed at the back and popped from the front, so with
/// a single worker, execution order is exactly submission order.
///
/// The queue also coordinates worker parking and waking through a condition
/// variable, allowing workers to sleep when no work is available.
pub(crate) struct JobQueue {
    /// Pending jobs, in submission order.
    queue: Mutex<VecDeque<Arc<dyn Runnable>>>,

    /// Number of parked worker threads.
    parked: Mutex<usize>,

    /// Condition variable used to wake parked workers.
    condvar: Condvar,

    /// Indicates whether the dispatcher is shutting down.
    shutdown: AtomicBool,
}

impl JobQueue {
    /// Creates a new empty queue.
    pub(crate) fn new() -> Self {
        Self {
            queue: Mutex::new(VecDeque::new()),
            parked: Mutex::new(0),
            condvar: Condvar::new(),
            shutdown: AtomicBool::new(false),
        }
    }

    /// Signals shutdown and wakes all parked workers.
    ///
    /// After shutdown is initiated, workers stop parking and exit their
    /// loops; jobs still queued at that point are discarded.
    pub(crate) fn shutdown(&self) {
        self.shutdown.store(true, Ordering::Release);
        self.condvar.notify_all();
    }

    /// Returns `true` once shutdown has been initiated.
    pub(crate) fn is_shutdown(&self) -> bool {
        self.shutdown.load(Ordering::Acquire)
    }

    /// Pushes a job at the back of the queue and wakes parked workers.
    pub(crate) fn push(&self, job: Arc<dyn Runnable>) {
        self.queue.lock().unwrap().push_back(job);
        self.condvar.notify_all();
    }

    /// Pops the job at the front of the queue.
    ///
    /// Returns `None` if no jobs are available.
    pub(crate) fn pop(&self) -> Option<Arc<dyn Runnable>> {
        self.queue.lock().unwrap().pop_front()
    }

    /// Parks the current worker thread until work becomes available or a
    /// shutdown signal is received.
    ///
    /// Workers only park if the queue is empty. The park operation uses a
    /// timed wait to ensure periodic wakeups.
    pub(crate) fn park(&self) {
        if self.is_shutdown() {
            return;
        }

        if !self.queue.lock().unwrap().is_empty() {
            return;
        }

        let mut parked = self.parked.lock().unwrap();
        *parked += 1;

        let (mut parked, _) = self
            .condvar
            .wait_timeout(parked, Duration::from_millis(1))
            .unwrap();

        *parked -= 1;
    }
}
