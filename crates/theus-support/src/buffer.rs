//! Variable-length byte field exchanged through linear memory
//!
//! [`CBuffer`] is the module-side half of the (pointer, length) protocol.
//! Its content is followed by a single nul byte that is never counted in
//! [`CBuffer::len`], so the field can also be handed to C code as a string.
//!
//! # Read protocol
//!
//! `len()` and `as_ptr()` never allocate, so a length followed by a pointer
//! (or the reverse) describes the same snapshot as long as nothing else
//! touches the buffer in between.
//!
//! # Write protocol
//!
//! [`CBuffer::reserve`] allocates room for `n` bytes and returns where the
//! host has to put them. The write is complete once the host has copied the
//! bytes; there is no commit step. Any call that reaches `reserve` again
//! before the copy leaves the host with a dangling destination.

use std::borrow::Cow;

use crate::error::{BoundaryError, Result};

#[derive(Clone, PartialEq, Eq)]
pub struct CBuffer {
    // content followed by exactly one terminating nul
    data: Vec<u8>,
}

impl Default for CBuffer {
    fn default() -> Self {
        Self { data: vec![0] }
    }
}

impl std::fmt::Debug for CBuffer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CBuffer")
            .field("len", &self.len())
            .field("content", &self.to_string_lossy())
            .finish()
    }
}

impl CBuffer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Copy `bytes` into a freshly allocated buffer.
    ///
    /// # Errors
    ///
    /// [`BoundaryError::OutOfMemory`] if the allocation cannot be satisfied
    /// or `bytes` is longer than `u32::MAX`.
    pub fn from_bytes(bytes: &[u8]) -> Result<Self> {
        let mut data = allocate(bytes.len())?;
        data.extend_from_slice(bytes);
        data.push(0);
        Ok(Self { data })
    }

    pub fn as_bytes(&self) -> &[u8] {
        &self.data[..self.data.len() - 1]
    }

    /// Content including the terminating nul.
    pub fn as_bytes_with_nul(&self) -> &[u8] {
        &self.data
    }

    /// Start of the content. Never null, even for an empty buffer.
    pub fn as_ptr(&self) -> *const u8 {
        self.data.as_ptr()
    }

    /// Byte length of the content, excluding the terminating nul.
    ///
    /// Every constructor goes through `allocate`, which refuses content
    /// longer than `u32::MAX`, so the cast is lossless.
    pub fn len(&self) -> u32 {
        (self.data.len() - 1) as u32
    }

    pub fn is_empty(&self) -> bool {
        self.data.len() == 1
    }

    pub fn to_string_lossy(&self) -> Cow<'_, str> {
        String::from_utf8_lossy(self.as_bytes())
    }

    /// Replace the content with `len` zero bytes and return the destination
    /// the caller must fill.
    ///
    /// The previous allocation is released, so any pointer obtained before
    /// this call is invalid afterwards.
    ///
    /// # Errors
    ///
    /// [`BoundaryError::OutOfMemory`] if the allocation cannot be satisfied;
    /// the old content is kept in that case.
    pub fn reserve(&mut self, len: u32) -> Result<*mut u8> {
        let len = len as usize;
        let mut data = allocate(len)?;
        data.resize(len + 1, 0);
        self.data = data;
        Ok(self.data.as_mut_ptr())
    }
}

/// Empty vector with room for `len` content bytes and the nul.
///
/// Content longer than `u32::MAX` is refused, so [`CBuffer::len`] is exact.
pub(crate) fn allocate(len: usize) -> Result<Vec<u8>> {
    if u32::try_from(len).is_err() {
        return Err(BoundaryError::OutOfMemory { requested: len });
    }
    let mut data = Vec::new();
    data.try_reserve_exact(len + 1)
        .map_err(|_| BoundaryError::OutOfMemory { requested: len })?;
    Ok(data)
}
