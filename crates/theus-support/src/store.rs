//! Slot arena owning module-side instances
//!
//! The host never sees a reference into the module, only a [`Handle`]. This
//! store maps handles to instances and enforces the per-handle lifecycle:
//!
//! ```text
//! Uninitialized --insert--> Live --remove--> Destroyed (terminal)
//! ```
//!
//! Vacated slots are recycled, but each reuse bumps the slot generation, so
//! a handle from a previous occupant never resolves to the new one. A slot
//! whose generation is exhausted is retired instead of being recycled.

use crate::config::StoreConfig;
use crate::error::{BoundaryError, Result};
use crate::handle::{Handle, MAX_GENERATION, MAX_SLOTS};

struct Slot<T> {
    generation: u16,
    value: Option<T>,
}

pub struct HandleStore<T> {
    slots: Vec<Slot<T>>,
    free: Vec<u32>,
    live: usize,
    retired: usize,
    config: StoreConfig,
}

impl<T> Default for HandleStore<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T> HandleStore<T> {
    pub fn new() -> Self {
        Self::with_config(StoreConfig::default())
    }

    pub fn with_config(config: StoreConfig) -> Self {
        Self {
            slots: Vec::new(),
            free: Vec::new(),
            live: 0,
            retired: 0,
            config,
        }
    }

    pub fn config(&self) -> &StoreConfig {
        &self.config
    }

    /// Change the limits without touching live instances or generations.
    pub fn set_config(&mut self, config: StoreConfig) {
        self.config = config;
    }

    /// Take ownership of `value` and issue a fresh handle for it.
    ///
    /// The most recently vacated slot is reused first. The returned handle
    /// is unique among live handles and differs from every handle the slot
    /// carried before.
    ///
    /// # Errors
    ///
    /// - [`BoundaryError::CapacityExhausted`] when `max_handles` instances are live
    ///   or every slot has been retired
    /// - [`BoundaryError::OutOfMemory`] when the slot table cannot grow
    pub fn insert(&mut self, value: T) -> Result<Handle> {
        let max = self.config.max_handles();
        if self.live >= max as usize {
            return Err(BoundaryError::CapacityExhausted { max });
        }

        if let Some(index) = self.free.pop() {
            let slot = &mut self.slots[index as usize];
            let handle = Handle::new(index, slot.generation)
                .ok_or(BoundaryError::CapacityExhausted { max })?;
            slot.value = Some(value);
            self.live += 1;
            log::debug!("reused slot {} for {:?}", index, handle);
            return Ok(handle);
        }

        let index = self.slots.len() as u32;
        if index >= MAX_SLOTS {
            return Err(BoundaryError::CapacityExhausted { max });
        }
        let handle = Handle::new(index, 0).ok_or(BoundaryError::CapacityExhausted { max })?;
        self.slots
            .try_reserve(1)
            .map_err(|_| BoundaryError::OutOfMemory {
                requested: std::mem::size_of::<Slot<T>>(),
            })?;
        self.slots.push(Slot {
            generation: 0,
            value: Some(value),
        });
        self.live += 1;
        log::debug!("allocated slot {} for {:?}", index, handle);
        Ok(handle)
    }

    fn slot(&self, raw: u32) -> Result<&Slot<T>> {
        let handle = Handle::from_raw(raw).ok_or(BoundaryError::InvalidHandle(raw))?;
        self.slots
            .get(handle.slot())
            .filter(|slot| slot.generation == handle.generation() && slot.value.is_some())
            .ok_or(BoundaryError::InvalidHandle(raw))
    }

    fn slot_mut(&mut self, raw: u32) -> Result<(Handle, &mut Slot<T>)> {
        let handle = Handle::from_raw(raw).ok_or(BoundaryError::InvalidHandle(raw))?;
        let slot = self
            .slots
            .get_mut(handle.slot())
            .filter(|slot| slot.generation == handle.generation() && slot.value.is_some())
            .ok_or(BoundaryError::InvalidHandle(raw))?;
        Ok((handle, slot))
    }

    pub fn get(&self, raw: u32) -> Result<&T> {
        self.slot(raw)?
            .value
            .as_ref()
            .ok_or(BoundaryError::InvalidHandle(raw))
    }

    pub fn get_mut(&mut self, raw: u32) -> Result<&mut T> {
        self.slot_mut(raw)?
            .1
            .value
            .as_mut()
            .ok_or(BoundaryError::InvalidHandle(raw))
    }

    pub fn contains(&self, raw: u32) -> bool {
        self.slot(raw).is_ok()
    }

    /// Destroy the instance behind `raw` and hand it back to the caller.
    ///
    /// Removing an unknown, stale or already removed handle fails with
    /// [`BoundaryError::InvalidHandle`] and leaves the store untouched.
    pub fn remove(&mut self, raw: u32) -> Result<T> {
        let (handle, slot) = self.slot_mut(raw)?;
        let value = slot.value.take().ok_or(BoundaryError::InvalidHandle(raw))?;
        let retire = slot.generation == MAX_GENERATION;
        if !retire {
            slot.generation += 1;
        }

        self.live -= 1;
        if retire {
            self.retired += 1;
            log::debug!("retired slot {} after {:?}", handle.slot(), handle);
        } else {
            self.free.push(handle.slot() as u32);
        }
        Ok(value)
    }

    /// Destroy every live instance. Outstanding handles become stale.
    pub fn clear(&mut self) {
        let handles: Vec<u32> = self.handles().map(Handle::into_raw).collect();
        for raw in handles {
            let _ = self.remove(raw);
        }
    }

    pub fn len(&self) -> usize {
        self.live
    }

    pub fn is_empty(&self) -> bool {
        self.live == 0
    }

    /// Slots allocated so far, live, vacant or retired.
    pub fn capacity(&self) -> usize {
        self.slots.len()
    }

    /// Slots that can never be handed out again.
    pub fn retired(&self) -> usize {
        self.retired
    }

    /// Handles of all live instances, in slot order.
    pub fn handles(&self) -> impl Iterator<Item = Handle> + '_ {
        self.iter().map(|(handle, _)| handle)
    }

    pub fn iter(&self) -> impl Iterator<Item = (Handle, &T)> + '_ {
        self.slots.iter().enumerate().filter_map(|(index, slot)| {
            let value = slot.value.as_ref()?;
            let handle = Handle::new(index as u32, slot.generation)?;
            Some((handle, value))
        })
    }
}
