use crate::dispatch::queue::QueueHandle;

/// A worker thread in the dispatcher.
///
/// A `Worker` repeatedly pops jobs from the shared FIFO queue and runs them
/// to completion, one at a time. Jobs never escape a worker: any failure of
/// the wrapped operation is converted into a broadcast by the job itself.
///
/// The execution loop is:
/// 1. Exit if shutdown has been signalled
/// 2. Pop and run the job at the front of the queue
/// 3. Park if no work is available
pub(crate) struct Worker {
    /// Unique identifier of the worker within its dispatcher.
    id: usize,

    /// Handle to the shared job queue.
    queue: QueueHandle,
}

impl Worker {
    /// Creates a new worker.
    pub(crate) fn new(id: usize, queue: QueueHandle) -> Self {
        Self { id, queue }
    }

    /// Runs the worker loop until shutdown.
    ///
    /// A job that has been popped always runs to completion, even if
    /// shutdown is signalled while it is executing.
    pub(crate) fn run(&self) {
        log::debug!("dispatch worker {} started", self.id);

        loop {
            if self.queue.is_shutdown() {
                break;
            }

            if let Some(job) = self.queue.pop() {
                job.run();
                continue;
            }

            self.queue.park();
        }

        log::debug!("dispatch worker {} stopped", self.id);
    }
}
