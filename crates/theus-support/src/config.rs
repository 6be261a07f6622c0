//! Store limits

use crate::handle::MAX_SLOTS;

/// Configuration of a [`HandleStore`](crate::store::HandleStore).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StoreConfig {
    max_handles: u32,
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self {
            max_handles: MAX_SLOTS,
        }
    }
}

impl StoreConfig {
    /// Limit the number of simultaneously live instances.
    ///
    /// Values above the 16-bit slot space are clamped to it.
    pub fn with_max_handles(mut self, max_handles: u32) -> Self {
        self.max_handles = max_handles.min(MAX_SLOTS);
        self
    }

    pub fn max_handles(&self) -> u32 {
        self.max_handles
    }
}
