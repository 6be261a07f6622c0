//! Access to the per-type handle store

use std::cell::RefCell;
use std::thread::LocalKey;

use theus_support::{HandleStore, StoreConfig};

/// A type whose instances live in a handle store and are reachable from
/// the host only by handle.
///
/// Implemented by `#[c_compatible]` on the type's inherent `impl` block.
/// Module instances are single-threaded, so the store is thread-local.
pub trait Handled: Sized + 'static {
    fn store() -> &'static LocalKey<RefCell<HandleStore<Self>>>;

    /// Number of instances currently alive.
    fn live_instances() -> usize {
        Self::store().with(|store| store.borrow().len())
    }

    /// Replace the store configuration. Live instances keep their handles;
    /// a lower limit only affects later `create` calls.
    fn configure(config: StoreConfig) {
        Self::store().with(|store| store.borrow_mut().set_config(config))
    }
}
