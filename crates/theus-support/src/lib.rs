//! Support library for handle-based WebAssembly modules
//!
//! This crate provides the building blocks shared by the module side and the
//! host side of the theus calling convention. Nothing in here touches a
//! WebAssembly runtime directly, so every piece is testable natively.
//!
//! # Architecture
//!
//! - [`handle`]: the opaque `u32` the host holds in place of a reference
//! - [`store`]: slot arena that owns module-side instances by handle
//! - [`buffer`]: nul-terminated byte buffer exchanged as a (pointer, length) pair
//! - [`compat`]: sentinel values and pointer/offset conversion helpers
//! - [`config`]: store limits
//! - [`error`]: the error taxonomy of the boundary
//!
//! # Boundary Model
//!
//! Only integers cross the boundary. A module hands out [`Handle`] values,
//! pointers become offsets into linear memory, and every failure collapses
//! into a sentinel (`0`) on the wire. The host is expected to check each
//! sentinel before touching linear memory.
//!
//! ```rust
//! use theus_support::{buffer::CBuffer, store::HandleStore};
//!
//! let mut store = HandleStore::new();
//! let handle = store.insert(CBuffer::from_bytes(b"hey there").unwrap()).unwrap();
//! assert_eq!(handle.into_raw(), 1);
//! assert_eq!(store.get(handle.into_raw()).unwrap().len(), 9);
//! ```

pub mod buffer;
pub mod compat;
pub mod config;
pub mod error;
pub mod handle;
pub mod store;

#[cfg(test)]
pub mod tests;

// Re-export commonly used items
pub use buffer::CBuffer;
pub use compat::{to_offset, EMPTY_LEN, INVALID_HANDLE, NULL_OFFSET};
pub use config::StoreConfig;
pub use error::{BoundaryError, Result};
pub use handle::Handle;
pub use store::HandleStore;
