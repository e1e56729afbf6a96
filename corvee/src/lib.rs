//! # Corvee
//!
//! **Corvee** is a small framework for running blocking operations off the
//! caller's thread and reporting each outcome, exactly once, to a set of
//! registered listeners.
//!
//! Unlike `Future`-based runtimes, Corvee is callback-driven: a caller wraps a
//! blocking closure in a [`Task`], binds it to a [`Promise`], registers zero or
//! more [`CompletionHandler`]s, and calls [`start`](Promise::start). The work is
//! then handed to a worker pool and the caller's thread is free immediately.
//! When the closure finishes, every handler receives either the produced value
//! or the failure cause, in registration order.
//!
//! Corvee provides:
//!
//! - A **four-state lifecycle** per operation (created, in progress,
//!   completed, faulted) with strictly monotonic transitions
//! - An **exactly-once broadcast** protocol delivering one terminal
//!   notification per operation to every registered handler
//! - A **registration window**: handlers may only be added or removed before
//!   `start()`, so no listener can be lost to a race with the worker thread
//! - A **replaceable dispatcher**: one shared single-worker pool by default
//!   (all operations serialized in submission order), or any pool the host
//!   application builds and installs
//!
//! ## Quick Start
//!
//! ```rust,ignore
//! use corvee::{Promise, Task, handler};
//!
//! let task = Task::new(|| {
//!     // any blocking call: open a connection, run a query, read a file...
//!     Ok(42)
//! });
//!
//! Promise::new(task)
//!     .add_handler(handler::from_fns(
//!         |_promise, value: &i32| println!("finished with {value}"),
//!         |_promise, cause| eprintln!("failed: {cause}"),
//!     ))?
//!     .start()?;
//! ```
//!
//! ## Modules
//!
//! - [`promise`] — The async handle, its lifecycle state, and the handler trait
//! - [`dispatch`] — The worker pool and the process-wide shared dispatcher
//!
//! ## Getting Started
//!
//! Add Corvee to your `Cargo.toml`:
//!
//! ```toml
//! [dependencies]
//! corvee = "0.1"
//! ```

mod error;
mod task;

pub mod dispatch;
pub mod promise;

pub use dispatch::{Dispatcher, DispatcherBuilder};
pub use error::{Cause, Error};
pub use promise::handler::{self, CompletionHandler};
pub use promise::{Promise, State};
pub use task::Task;
