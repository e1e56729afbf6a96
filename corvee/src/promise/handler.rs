//! Listener capability for observing a promise's terminal outcome.

use std::sync::Arc;

use crate::error::Cause;
use crate::promise::Promise;

/// A listener notified exactly once when a promise reaches a terminal state.
///
/// Handlers own no framework state; they are held by reference inside the
/// promise's handler list and compared by identity, so registering the same
/// `Arc` twice yields two notifications. A single handler instance may be
/// registered on multiple promises; the `Promise` passed into each callback
/// identifies which operation finished (compare with
/// [`Promise::ptr_eq`]).
///
/// Handlers run on the worker thread during the broadcast. A panic inside a
/// callback is caught and logged so that the remaining handlers are still
/// notified, but handlers are expected to contain their own errors.
pub trait CompletionHandler<V>: Send + Sync {
    /// Called when the operation produced a value.
    fn on_complete(&self, promise: &Promise<V>, value: &V);

    /// Called when the operation failed.
    fn on_failure(&self, promise: &Promise<V>, cause: &Cause);
}

struct FnHandler<C, F> {
    complete: C,
    failure: F,
}

impl<V, C, F> CompletionHandler<V> for FnHandler<C, F>
where
    C: Fn(&Promise<V>, &V) + Send + Sync,
    F: Fn(&Promise<V>, &Cause) + Send + Sync,
{
    fn on_complete(&self, promise: &Promise<V>, value: &V) {
        (self.complete)(promise, value);
    }

    fn on_failure(&self, promise: &Promise<V>, cause: &Cause) {
        (self.failure)(promise, cause);
    }
}

/// Builds a [`CompletionHandler`] from a pair of closures.
///
/// # Examples
///
/// ```rust,ignore
/// let handler = handler::from_fns(
///     |_promise, value: &i32| println!("got {value}"),
///     |_promise, cause| eprintln!("failed: {cause}"),
/// );
/// ```
pub fn from_fns<V, C, F>(complete: C, failure: F) -> Arc<dyn CompletionHandler<V>>
where
    C: Fn(&Promise<V>, &V) + Send + Sync + 'static,
    F: Fn(&Promise<V>, &Cause) + Send + Sync + 'static,
    V: 'static,
{
    Arc::new(FnHandler { complete, failure })
}
