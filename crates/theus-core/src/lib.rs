//! Theus Core - guest-side runtime for handle-based WebAssembly modules
//!
//! This crate implements the module side of the theus calling convention.
//! It is what the code generated by [`c_compatible`] calls into, and it is
//! the only place where instances, sentinels and the host meet.
//!
//! # Architecture
//!
//! - **Handle stores**: every exported type owns a thread-local
//!   [`HandleStore`], reached through the [`Handled`] trait
//! - **Sentinel mapping**: [`IntoBoundary`] turns return values into
//!   integers, collapsing failures into `0`
//! - **Export bodies**: [`export`] holds the functions the generated
//!   `extern "C"` wrappers delegate to
//! - **Host logging**: with the `host-log` feature on `wasm32`, `log`
//!   records are forwarded to the host's `env.__log` import
//!
//! # Calling Convention
//!
//! ```text
//! host                         module
//! ----                         ------
//! t_create()            ---->  store.insert(T::create())      -> handle | 0
//! t_get_x_len(handle)   ---->  store.get(handle).x.len()      -> n      | 0
//! t_get_x(handle)       ---->  store.get(handle).x.as_ptr()   -> offset | 0
//! read n bytes at offset
//! t_set_x(handle, n)    ---->  store.get(handle).x.reserve(n) -> offset | 0
//! write n bytes at offset      (no other call in between)
//! t_destroy(handle)     ---->  store.remove(handle)
//! ```
//!
//! The host must copy bytes out of (or into) linear memory before its next
//! call into the module: any call may allocate and move buffers.
//!
//! # Example
//!
//! ```rust
//! use theus_core::{c_compatible, CBuffer, Handled};
//!
//! pub struct Greeting {
//!     text: CBuffer,
//! }
//!
//! #[c_compatible]
//! impl Greeting {
//!     pub fn create() -> Self {
//!         Greeting { text: CBuffer::new() }
//!     }
//!
//!     pub fn get_text_len(&self) -> u32 {
//!         self.text.len()
//!     }
//!
//!     pub fn destroy(self) {}
//! }
//!
//! let handle = greeting_create();
//! assert_eq!(greeting_get_text_len(handle), 0);
//! greeting_destroy(handle);
//! assert_eq!(Greeting::live_instances(), 0);
//! ```

extern crate self as theus_core;

pub mod boundary;
pub mod export;
pub mod handled;
#[cfg(all(target_arch = "wasm32", feature = "host-log"))]
pub mod stdio;

#[cfg(test)]
pub mod tests;

pub use crate::boundary::IntoBoundary;
pub use crate::handled::Handled;
pub use theus_macros::c_compatible;
pub use theus_support::{
    to_offset, BoundaryError, CBuffer, Handle, HandleStore, StoreConfig, EMPTY_LEN,
    INVALID_HANDLE, NULL_OFFSET,
};
