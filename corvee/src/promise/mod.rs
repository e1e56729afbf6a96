//! The asynchronous handle and its lifecycle.
//!
//! This module defines the caller-facing half of the framework:
//!
//! - [`Promise`] — the state-carrying handle returned for each operation,
//! - [`State`] — the four-value lifecycle marker,
//! - [`CompletionHandler`](handler::CompletionHandler) — the listener
//!   capability receiving exactly one terminal notification per promise.
//!
//! A promise starts life holding its task and an open handler list. Calling
//! [`Promise::start`] seals the list, submits the task, and from then on the
//! only observable events are the single state transition into a terminal
//! state and the in-order fan-out to the registered handlers.

mod core;
mod state;

pub mod handler;

pub use self::core::Promise;
pub use state::State;

pub(crate) use state::StateCell;
