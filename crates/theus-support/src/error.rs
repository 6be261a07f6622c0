//! Error taxonomy of the module/host boundary
//!
//! None of these errors crosses the boundary as a value. On the module side
//! they are logged and collapsed into a sentinel; on the host side they are
//! reconstructed from the sentinels and bounds checks.

use thiserror::Error;

pub type Result<T, E = BoundaryError> = std::result::Result<T, E>;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum BoundaryError {
    /// The handle is zero, was never issued, or its instance was destroyed.
    #[error("invalid handle: {0}")]
    InvalidHandle(u32),

    #[error("out of memory allocating {requested} bytes")]
    OutOfMemory { requested: usize },

    #[error("handle capacity exhausted ({max} live instances)")]
    CapacityExhausted { max: u32 },

    #[error("region {offset}+{len} outside linear memory of {memory_size} bytes")]
    OutOfBounds {
        offset: usize,
        len: usize,
        memory_size: usize,
    },

    /// A store was accessed while an export on the same type was still running.
    #[error("reentrant store access")]
    Reentrant,
}

impl BoundaryError {
    /// True for failures that leave the instance (if any) untouched and
    /// may succeed when retried with a smaller request.
    pub fn is_resource_exhaustion(&self) -> bool {
        matches!(
            self,
            BoundaryError::OutOfMemory { .. } | BoundaryError::CapacityExhausted { .. }
        )
    }
}
