//! Opaque instance handles
//!
//! A handle packs a slot index and a generation into one `u32`:
//!
//! ```text
//! bits 31..16  generation of the slot when the handle was issued
//! bits 15..0   slot index + 1 (never zero)
//! ```
//!
//! Because the low half is `index + 1`, no valid handle is ever `0`, which
//! leaves `0` free to act as the failure sentinel on the wire.

use std::fmt;
use std::num::NonZeroU32;

/// Number of addressable slots; index `0xFFFF` would encode as `0x10000`.
pub const MAX_SLOTS: u32 = 0xFFFF;

/// Largest generation a slot can carry before it is retired.
pub const MAX_GENERATION: u16 = u16::MAX;

const INDEX_BITS: u32 = 16;
const INDEX_MASK: u32 = (1 << INDEX_BITS) - 1;

#[derive(Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Handle(NonZeroU32);

impl Handle {
    /// Build a handle from a slot index and generation.
    ///
    /// Returns `None` when `index` does not fit the 16-bit slot space.
    pub fn new(index: u32, generation: u16) -> Option<Self> {
        if index >= MAX_SLOTS {
            return None;
        }
        let raw = ((generation as u32) << INDEX_BITS) | (index + 1);
        NonZeroU32::new(raw).map(Handle)
    }

    /// Reinterpret an integer received from the host. `0` is never a handle.
    pub fn from_raw(raw: u32) -> Option<Self> {
        let handle = NonZeroU32::new(raw).map(Handle)?;
        if raw & INDEX_MASK == 0 {
            return None;
        }
        Some(handle)
    }

    pub fn into_raw(self) -> u32 {
        self.0.get()
    }

    pub fn slot(self) -> usize {
        ((self.0.get() & INDEX_MASK) - 1) as usize
    }

    pub fn generation(self) -> u16 {
        (self.0.get() >> INDEX_BITS) as u16
    }
}

impl fmt::Debug for Handle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Handle({}v{})", self.slot(), self.generation())
    }
}

impl fmt::Display for Handle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<Handle> for u32 {
    fn from(handle: Handle) -> u32 {
        handle.into_raw()
    }
}
