use std::any::Any;

use thiserror::Error;

/// The failure channel of a task.
///
/// Whatever error a blocking operation produces is type-erased into a `Cause`
/// before being routed to the registered handlers. The framework never
/// inspects it beyond logging its `Display` output.
pub type Cause = Box<dyn std::error::Error + Send + Sync + 'static>;

/// Errors reported synchronously to the caller.
///
/// These are protocol violations (programmer errors), not runtime conditions:
/// they are never retried and never reach the worker thread. Failures of the
/// wrapped operation itself travel through [`Cause`] instead.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum Error {
    /// Handler registration was attempted after `start()`.
    ///
    /// The handler list is sealed the moment the operation is submitted, so
    /// that no listener can be lost to a race with an already-running
    /// broadcast.
    #[error("completion handlers are sealed once the operation has started")]
    Sealed,

    /// `start()` was called more than once on the same promise.
    ///
    /// Restarting would resubmit the task and allow a second broadcast;
    /// the transition out of the created state is permitted exactly once.
    #[error("the operation has already been started")]
    AlreadyStarted,
}

/// Renders a panic payload for logging and cause conversion.
///
/// Panic payloads are almost always `&str` or `String`; anything else is
/// reported as opaque.
pub(crate) fn panic_message(payload: &(dyn Any + Send)) -> String {
    if let Some(s) = payload.downcast_ref::<&str>() {
        (*s).to_string()
    } else if let Some(s) = payload.downcast_ref::<String>() {
        s.clone()
    } else {
        "opaque panic payload".to_string()
    }
}

/// Converts a panic caught at the task boundary into a [`Cause`].
pub(crate) fn panic_cause(payload: Box<dyn Any + Send>) -> Cause {
    format!("task panicked: {}", panic_message(payload.as_ref())).into()
}
