//! The process-wide shared dispatcher slot.

use std::sync::RwLock;

use once_cell::sync::Lazy;

use super::{Dispatcher, DispatcherBuilder};

/// The shared dispatcher, installed lazily on first use.
static SHARED: Lazy<RwLock<Option<Dispatcher>>> = Lazy::new(|| RwLock::new(None));

/// Returns the process-wide shared dispatcher.
///
/// If none has been installed yet, a default single-worker dispatcher is
/// created on first call, so all operations submitted through it are
/// serialized in submission order.
pub fn shared() -> Dispatcher {
    if let Some(dispatcher) = SHARED.read().unwrap().as_ref() {
        return dispatcher.clone();
    }

    let mut slot = SHARED.write().unwrap();
    slot.get_or_insert_with(|| {
        log::debug!("installing default single-worker dispatcher");
        DispatcherBuilder::new().build()
    })
    .clone()
}

/// Replaces the process-wide shared dispatcher.
///
/// Intended to be called once, during application startup, before the first
/// promise is started; that contract is documented, not enforced. Later
/// calls simply replace the reference: promises already pinned to the
/// previous dispatcher keep running on it, since dispatcher handles are
/// reference-counted.
pub fn install(dispatcher: Dispatcher) {
    *SHARED.write().unwrap() = Some(dispatcher);
}
