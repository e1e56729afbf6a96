use std::sync::atomic::{AtomicU8, Ordering};

/// Promise has been created and not yet started.
///
/// Handlers may be added or removed only in this state.
const CREATED: u8 = 0;

/// Promise has been started and its task submitted for execution.
///
/// The handler list is sealed once this state is entered.
const IN_PROGRESS: u8 = 1;

/// The task finished normally and the success broadcast has begun.
const COMPLETED: u8 = 2;

/// The task failed and the failure broadcast has begun.
const FAULTED: u8 = 3;

/// Lifecycle state of a [`Promise`](crate::Promise).
///
/// Transitions are strictly monotonic:
/// `Created → InProgress → {Completed | Faulted}`. A promise never returns
/// to an earlier state, and the two terminal states are mutually exclusive.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum State {
    /// The promise exists but `start()` has not been called.
    Created,

    /// The task has been submitted and has not yet reached a terminal state.
    InProgress,

    /// The task produced a value; terminal.
    Completed,

    /// The task failed (error return or panic); terminal.
    Faulted,
}

/// Atomic storage for a promise's [`State`].
///
/// The transition into `InProgress` happens on the caller's thread inside
/// `start()`; the transitions into the terminal states happen on the worker
/// thread at the head of a broadcast. There is never more than one writer at
/// any instant, but readers may sit on any thread, so all accesses go through
/// acquire/release atomics.
pub(crate) struct StateCell(AtomicU8);

impl StateCell {
    /// Creates a cell in the `Created` state.
    pub(crate) fn new() -> Self {
        Self(AtomicU8::new(CREATED))
    }

    /// Reads the current state.
    pub(crate) fn load(&self) -> State {
        match self.0.load(Ordering::Acquire) {
            CREATED => State::Created,
            IN_PROGRESS => State::InProgress,
            COMPLETED => State::Completed,
            _ => State::Faulted,
        }
    }

    /// Attempts the `Created → InProgress` transition.
    ///
    /// Returns `false` if the promise has already left the created state,
    /// which makes `start()` single-shot.
    pub(crate) fn begin(&self) -> bool {
        self.0
            .compare_exchange(CREATED, IN_PROGRESS, Ordering::AcqRel, Ordering::Acquire)
            .is_ok()
    }

    /// Enters a terminal state at the head of a broadcast.
    pub(crate) fn finish(&self, terminal: State) {
        let raw = match terminal {
            State::Completed => COMPLETED,
            State::Faulted => FAULTED,
            // Broadcasts only ever finish into a terminal state.
            _ => unreachable!("finish called with non-terminal state"),
        };
        self.0.store(raw, Ordering::Release);
    }
}
