//! Reference module for the theus calling convention.
//!
//! `Record` holds a single C string. Built for `wasm32-unknown-unknown` it
//! exports:
//!
//! | export | signature | returns |
//! |---|---|---|
//! | `record_create` | `() -> u32` | new handle, `0` on failure |
//! | `record_get_cstring` | `(u32) -> u32` | offset of the bytes, `0` for a bad handle |
//! | `record_get_cstring_len` | `(u32) -> u32` | byte length without the nul, `0` for a bad handle |
//! | `record_set_cstring` | `(u32, u32) -> u32` | offset to write `len` bytes to, `0` on failure |
//! | `record_destroy` | `(u32)` | nothing |
//!
//! plus `memory` and, with `host-log`, `theus_init_log`.

use theus_core::{c_compatible, BoundaryError, CBuffer};

pub const DEFAULT_CSTRING: &str = "hey there";

#[derive(Debug)]
pub struct Record {
    cstring: CBuffer,
}

#[c_compatible]
impl Record {
    /// Create a record holding "hey there".
    pub fn create() -> Self {
        let cstring = CBuffer::from_bytes(DEFAULT_CSTRING.as_bytes()).unwrap_or_default();
        Record { cstring }
    }

    /// Address of the string bytes. Valid until the next call into the module.
    pub fn get_cstring(&self) -> *const u8 {
        self.cstring.as_ptr()
    }

    /// Length of the string in bytes, excluding the terminating nul.
    pub fn get_cstring_len(&self) -> u32 {
        self.cstring.len()
    }

    /// Drop the current string and reserve room for `len` new bytes.
    ///
    /// The caller writes exactly `len` bytes at the returned address before
    /// its next call into the module. Until then the record reads back as
    /// `len` zero bytes.
    pub fn set_cstring(&mut self, len: u32) -> Result<*mut u8, BoundaryError> {
        log::debug!("reserving {} bytes for record string", len);
        self.cstring.reserve(len)
    }

    pub fn destroy(self) {
        log::trace!("dropping record {:?}", self.cstring);
    }
}
