use std::panic::{AssertUnwindSafe, catch_unwind};
use std::sync::{Arc, Mutex};

use crate::error::{Cause, panic_cause};
use crate::promise::Promise;

/// The boxed form of a caller-supplied blocking operation.
pub(crate) type BlockingOp<V> = Box<dyn FnOnce() -> Result<V, Cause> + Send>;

/// A unit of deferred, possibly-blocking work.
///
/// A `Task` wraps any fallible blocking closure: opening a connection,
/// issuing a request, closing a resource. The framework never interprets the
/// produced value or the failure; it only carries them to the handlers of the
/// owning [`Promise`].
///
/// A task is bound one-to-one to a promise: [`Promise::new`] consumes the
/// task, so it cannot run on its own and cannot be bound twice. All lifecycle
/// tracking lives in the promise; the task itself is stateless.
///
/// # Examples
///
/// ```rust,ignore
/// let task = Task::new(|| {
///     let payload = std::fs::read("data.bin")?;
///     Ok(payload.len())
/// });
/// ```
pub struct Task<V> {
    op: BlockingOp<V>,
}

impl<V> Task<V> {
    /// Wraps a blocking closure as a task.
    ///
    /// The closure runs once, on a dispatcher worker thread, after the
    /// owning promise is started.
    pub fn new<F>(op: F) -> Self
    where
        F: FnOnce() -> Result<V, Cause> + Send + 'static,
    {
        Self { op: Box::new(op) }
    }

    fn into_op(self) -> BlockingOp<V> {
        self.op
    }
}

/// A unit of work executable by a dispatch worker.
///
/// Abstracts over the task's value type so the dispatcher can carry a
/// heterogeneous queue of `Arc<dyn Runnable>`.
pub(crate) trait Runnable: Send + Sync {
    /// Executes the unit of work. Called by a worker thread.
    fn run(self: Arc<Self>);
}

/// A task bound to its owning promise, ready for submission.
///
/// This is the sole translation point between "the blocking call returned or
/// failed" and the promise's terminal state: every outcome of the closure,
/// including a panic caught at this boundary, becomes exactly one broadcast.
pub(crate) struct Bound<V> {
    /// The operation, taken on first run.
    op: Mutex<Option<BlockingOp<V>>>,

    /// Back-reference to the owning promise, set once at binding.
    promise: Promise<V>,
}

impl<V: Send + 'static> Bound<V> {
    pub(crate) fn new(task: Task<V>, promise: Promise<V>) -> Self {
        Self {
            op: Mutex::new(Some(task.into_op())),
            promise,
        }
    }
}

impl<V: Send + 'static> Runnable for Bound<V> {
    fn run(self: Arc<Self>) {
        let Some(op) = self.op.lock().unwrap().take() else {
            return;
        };

        // No failure kind is special-cased: an Err return and a panic both
        // land in the failure broadcast, and neither escapes the worker.
        match catch_unwind(AssertUnwindSafe(op)) {
            Ok(Ok(value)) => self.promise.broadcast_completion(value),
            Ok(Err(cause)) => {
                log::debug!("task failed: {cause}");
                self.promise.broadcast_failure(cause);
            }
            Err(payload) => {
                let cause = panic_cause(payload);
                log::debug!("{cause}");
                self.promise.broadcast_failure(cause);
            }
        }
    }
}
