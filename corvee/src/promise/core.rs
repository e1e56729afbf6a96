use std::panic::{AssertUnwindSafe, catch_unwind};
use std::sync::{Arc, Mutex};

use crate::dispatch::{self, Dispatcher};
use crate::error::{Cause, Error, panic_message};
use crate::promise::handler::CompletionHandler;
use crate::promise::{State, StateCell};
use crate::task::{Bound, Task};

/// Shared state behind every clone of a [`Promise`].
struct Shared<V> {
    /// Lifecycle marker, written once per transition.
    state: StateCell,

    /// Registered handlers, in registration order. Duplicates are permitted;
    /// identity is `Arc` pointer identity.
    ///
    /// The list is mutable only while the state is `Created`. The lock also
    /// serializes handler mutation against the `start()` transition, so a
    /// handler can never slip in after the task has been submitted.
    handlers: Mutex<Vec<Arc<dyn CompletionHandler<V>>>>,

    /// The task, held until `start()` consumes it. The single-shot state
    /// transition guarantees the slot is taken exactly once.
    task: Mutex<Option<Task<V>>>,

    /// Dispatcher the task is submitted to, held only until `start()`.
    ///
    /// Taken together with the task so that a running promise does not pin
    /// the pool alive: otherwise a worker dropping the last promise handle
    /// could end up joining its own thread during pool shutdown.
    dispatcher: Mutex<Option<Dispatcher>>,
}

/// The handle representing a deferred blocking operation's eventual outcome.
///
/// A `Promise` owns its [`Task`] until [`start`](Promise::start) is called,
/// collects [`CompletionHandler`]s beforehand, and broadcasts the terminal
/// outcome to them afterwards. Clones share the same underlying operation;
/// the clone handed to each handler callback is how a handler registered on
/// several promises tells the operations apart.
///
/// The operation does **not** begin until `start()` is called, and all
/// handlers must be registered before that point. This guarantees that no
/// handler misses the broadcast: by the time the worker thread can possibly
/// finish the task, the handler list is already sealed.
///
/// There is no built-in way to wait for the result; a caller that needs
/// synchronous semantics blocks externally, typically on a channel signalled
/// from inside a handler.
pub struct Promise<V> {
    shared: Arc<Shared<V>>,
}

impl<V> Clone for Promise<V> {
    fn clone(&self) -> Self {
        Self {
            shared: self.shared.clone(),
        }
    }
}

impl<V: Send + 'static> Promise<V> {
    /// Binds a fresh promise to the given task.
    ///
    /// The task is moved into the promise, so a task can never be bound to
    /// two promises. Work is submitted to the process-wide shared dispatcher
    /// (see [`dispatch::shared`]) when `start()` is called.
    pub fn new(task: Task<V>) -> Self {
        Self::with_dispatcher(task, &dispatch::shared())
    }

    /// Binds a fresh promise to the given task, pinned to a specific
    /// dispatcher.
    ///
    /// This bypasses the process-wide dispatcher entirely; the host
    /// application controls the thread-pool policy for this operation alone.
    pub fn with_dispatcher(task: Task<V>, dispatcher: &Dispatcher) -> Self {
        Self {
            shared: Arc::new(Shared {
                state: StateCell::new(),
                handlers: Mutex::new(Vec::new()),
                task: Mutex::new(Some(task)),
                dispatcher: Mutex::new(Some(dispatcher.clone())),
            }),
        }
    }

    /// Registers a handler to be notified of the terminal outcome.
    ///
    /// Handlers are notified in registration order. Registering the same
    /// handler twice notifies it twice.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Sealed`] if `start()` has already been called,
    /// regardless of whether the task has finished yet.
    ///
    /// # Examples
    ///
    /// ```rust,ignore
    /// promise.add_handler(handler)?.start()?;
    /// ```
    pub fn add_handler(&self, handler: Arc<dyn CompletionHandler<V>>) -> Result<&Self, Error> {
        let mut handlers = self.shared.handlers.lock().unwrap();

        if self.shared.state.load() != State::Created {
            return Err(Error::Sealed);
        }

        handlers.push(handler);
        Ok(self)
    }

    /// Removes the first registered handler identical to `handler`.
    ///
    /// Identity is `Arc` pointer identity; if the handler was registered
    /// twice, one registration remains. Removing a handler that was never
    /// registered has no effect.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Sealed`] if `start()` has already been called.
    pub fn remove_handler(&self, handler: &Arc<dyn CompletionHandler<V>>) -> Result<&Self, Error> {
        let mut handlers = self.shared.handlers.lock().unwrap();

        if self.shared.state.load() != State::Created {
            return Err(Error::Sealed);
        }

        if let Some(index) = handlers.iter().position(|h| Arc::ptr_eq(h, handler)) {
            handlers.remove(index);
        }
        Ok(self)
    }

    /// Begins execution of the operation.
    ///
    /// Transitions the promise into [`State::InProgress`] and submits the
    /// task to the dispatcher. This never blocks: the blocking work runs
    /// entirely on a worker thread, and the calling thread is free as soon
    /// as this method returns. After this point the handler list is sealed.
    ///
    /// # Errors
    ///
    /// Returns [`Error::AlreadyStarted`] on any call after the first. The
    /// transition out of `Created` happens exactly once, so the task cannot
    /// be resubmitted and a second broadcast cannot occur.
    pub fn start(&self) -> Result<&Self, Error> {
        {
            // Hold the handler lock across the transition so add/remove can
            // never interleave with the submission.
            let _handlers = self.shared.handlers.lock().unwrap();
            if !self.shared.state.begin() {
                return Err(Error::AlreadyStarted);
            }
        }

        let task = self
            .shared
            .task
            .lock()
            .unwrap()
            .take()
            .expect("task slot emptied exactly once, by the winning start()");

        let dispatcher = self
            .shared
            .dispatcher
            .lock()
            .unwrap()
            .take()
            .expect("dispatcher slot emptied exactly once, by the winning start()");

        log::trace!("promise started, submitting task to dispatcher");
        dispatcher.submit(Arc::new(Bound::new(task, self.clone())));
        Ok(self)
    }

    /// Reads the current lifecycle state.
    ///
    /// Safe to call at any time from any thread.
    pub fn state(&self) -> State {
        self.shared.state.load()
    }

    /// Returns `true` if `self` and `other` are handles to the same
    /// operation.
    pub fn ptr_eq(&self, other: &Promise<V>) -> bool {
        Arc::ptr_eq(&self.shared, &other.shared)
    }

    /// Broadcasts the produced value to all registered handlers.
    ///
    /// Invoked by the task machinery on the worker thread, exactly once.
    pub(crate) fn broadcast_completion(&self, value: V) {
        self.shared.state.finish(State::Completed);

        for handler in self.snapshot() {
            shield("on_complete", || handler.on_complete(self, &value));
        }
    }

    /// Broadcasts the failure cause to all registered handlers.
    ///
    /// Invoked by the task machinery on the worker thread, exactly once.
    pub(crate) fn broadcast_failure(&self, cause: Cause) {
        self.shared.state.finish(State::Faulted);

        for handler in self.snapshot() {
            shield("on_failure", || handler.on_failure(self, &cause));
        }
    }

    /// Snapshots the handler list for iteration.
    ///
    /// The list is sealed by the time a broadcast runs; the snapshot exists
    /// so the lock is not held across user callbacks.
    fn snapshot(&self) -> Vec<Arc<dyn CompletionHandler<V>>> {
        self.shared.handlers.lock().unwrap().clone()
    }
}

/// Runs one handler callback, containing any panic it raises.
///
/// One misbehaving handler must not prevent the handlers registered after it
/// from being notified. The panic is reported through the log rather than
/// swallowed silently.
fn shield(stage: &str, callback: impl FnOnce()) {
    if let Err(payload) = catch_unwind(AssertUnwindSafe(callback)) {
        log::error!(
            "completion handler panicked in {}: {}",
            stage,
            panic_message(payload.as_ref())
        );
    }
}
