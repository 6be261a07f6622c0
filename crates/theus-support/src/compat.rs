//! Sentinels and pointer/offset conversion
//!
//! Everything that crosses the boundary is an integer. These helpers fix
//! what those integers mean and give the host bounds-checked access to a
//! linear memory image.
//!
//! ## Sentinels
//!
//! | Value | Returned by | Meaning |
//! |---|---|---|
//! | [`INVALID_HANDLE`] | create | out of memory / capacity |
//! | [`NULL_OFFSET`] | get pointer, reserve | invalid handle, or out of memory on reserve |
//! | [`EMPTY_LEN`] | get length | invalid handle *or* empty content |
//!
//! The length sentinel is ambiguous on its own. A valid handle never
//! reports a null pointer, so the host resolves a zero length by asking
//! for the pointer.

use crate::error::{BoundaryError, Result};

pub const INVALID_HANDLE: u32 = 0;
pub const NULL_OFFSET: usize = 0;
pub const EMPTY_LEN: u32 = 0;

/// Convert a module pointer into the integer handed to the host.
///
/// On `wasm32` this is the offset into linear memory and fits in 32 bits.
/// On native targets it is the full address, which lets the export code run
/// in-process under test.
pub fn to_offset<T>(ptr: *const T) -> usize {
    ptr as usize
}

/// Borrow `len` bytes at `offset` from a linear memory image.
///
/// # Errors
///
/// [`BoundaryError::OutOfBounds`] if the region overflows or extends past
/// the end of `memory`.
pub fn try_read_region(memory: &[u8], offset: usize, len: usize) -> Result<&[u8]> {
    let end = region_end(memory.len(), offset, len)?;
    Ok(&memory[offset..end])
}

/// Copy `bytes` into a linear memory image at `offset`.
///
/// # Errors
///
/// [`BoundaryError::OutOfBounds`] if the region does not fit; `memory` is
/// left untouched in that case.
pub fn try_write_region(memory: &mut [u8], offset: usize, bytes: &[u8]) -> Result<()> {
    let end = region_end(memory.len(), offset, bytes.len())?;
    memory[offset..end].copy_from_slice(bytes);
    Ok(())
}

fn region_end(memory_size: usize, offset: usize, len: usize) -> Result<usize> {
    offset
        .checked_add(len)
        .filter(|end| *end <= memory_size)
        .ok_or(BoundaryError::OutOfBounds {
            offset,
            len,
            memory_size,
        })
}
