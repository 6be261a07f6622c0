//! Bodies of the generated `extern "C"` exports
//!
//! The wrappers emitted by `#[c_compatible]` are one-liners that forward to
//! these functions. Nothing here panics on bad input: an unknown handle, a
//! destroyed handle or a reentrant call is logged and answered with the
//! sentinel of the export's return type.

use std::any::type_name;

use theus_support::{BoundaryError, HandleStore, INVALID_HANDLE};

use crate::boundary::IntoBoundary;
use crate::handled::Handled;

fn short_type_name<T>() -> &'static str {
    let name = type_name::<T>();
    name.rsplit("::").next().unwrap_or(name)
}

fn with_store<T: Handled, R>(
    f: impl FnOnce(&mut HandleStore<T>) -> Result<R, BoundaryError>,
) -> Result<R, BoundaryError> {
    T::store().with(|cell| {
        let mut store = cell.try_borrow_mut().map_err(|_| BoundaryError::Reentrant)?;
        f(&mut store)
    })
}

/// Build an instance with `make` and register it.
///
/// Returns the new handle, or [`INVALID_HANDLE`] when the store is full or
/// out of memory. `make` runs before the store is borrowed, so it may call
/// other exports.
pub fn create<T: Handled>(make: impl FnOnce() -> T) -> u32 {
    let value = make();
    match with_store::<T, _>(|store| store.insert(value)) {
        Ok(handle) => {
            log::debug!("created {} {:?}", short_type_name::<T>(), handle);
            handle.into_raw()
        }
        Err(e) => {
            log::warn!("create {} failed: {}", short_type_name::<T>(), e);
            INVALID_HANDLE
        }
    }
}

/// Run `f` on the live instance behind `handle`.
///
/// Returns the sentinel of `R` if the handle does not resolve.
pub fn with_instance<T: Handled, R: IntoBoundary>(
    handle: u32,
    f: impl FnOnce(&mut T) -> R,
) -> R::Abi {
    match with_store::<T, _>(|store| store.get_mut(handle).map(f)) {
        Ok(value) => value.into_boundary(),
        Err(e) => {
            log::debug!("{} call rejected: {}", short_type_name::<T>(), e);
            R::Abi::default()
        }
    }
}

/// Remove the instance behind `handle` and pass it to `f` by value.
///
/// The handle is dead afterwards whatever `f` does.
pub fn consume<T: Handled, R: IntoBoundary>(handle: u32, f: impl FnOnce(T) -> R) -> R::Abi {
    take(handle, "consume", f)
}

/// Like [`consume`], for the type's `destroy` method. Destroying an
/// unknown or already destroyed handle is a no-op.
pub fn destroy<T: Handled, R: IntoBoundary>(handle: u32, f: impl FnOnce(T) -> R) -> R::Abi {
    take(handle, "destroy", f)
}

fn take<T: Handled, R: IntoBoundary>(
    handle: u32,
    action: &str,
    f: impl FnOnce(T) -> R,
) -> R::Abi {
    match with_store::<T, _>(|store| store.remove(handle)) {
        Ok(value) => {
            log::debug!("{} {} {}", action, short_type_name::<T>(), handle);
            // runs after the store borrow ends; dropping T may call other exports
            f(value).into_boundary()
        }
        Err(e) => {
            log::debug!("ignoring {} of {}: {}", action, short_type_name::<T>(), e);
            R::Abi::default()
        }
    }
}
