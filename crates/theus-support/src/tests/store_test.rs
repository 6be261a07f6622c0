use std::collections::HashSet;

use crate::config::StoreConfig;
use crate::error::BoundaryError;
use crate::handle::{Handle, MAX_GENERATION};
use crate::store::HandleStore;

fn init_logger() {
    let _ = env_logger::builder().is_test(true).try_init();
}

#[test]
fn test_live_handles_are_unique() {
    init_logger();
    let mut store = HandleStore::new();
    let mut seen = HashSet::new();
    for i in 0..256u32 {
        let handle = store.insert(i).unwrap();
        assert!(seen.insert(handle.into_raw()), "duplicate handle {}", handle);
    }
    assert_eq!(store.len(), 256);

    // free every other instance and refill; uniqueness must hold among live handles
    let victims: Vec<u32> = seen.iter().copied().filter(|raw| raw % 2 == 0).collect();
    for raw in &victims {
        store.remove(*raw).unwrap();
        seen.remove(raw);
    }
    for i in 0..victims.len() as u32 {
        let handle = store.insert(1000 + i).unwrap();
        assert!(seen.insert(handle.into_raw()));
    }
    assert_eq!(store.len(), seen.len());
}

#[test]
fn test_instances_are_isolated() {
    let mut store = HandleStore::new();
    let h1 = store.insert(vec![1u8]).unwrap().into_raw();
    let h2 = store.insert(vec![2u8]).unwrap().into_raw();
    assert_ne!(h1, h2);

    store.get_mut(h1).unwrap().push(9);
    assert_eq!(store.get(h1).unwrap(), &vec![1, 9]);
    assert_eq!(store.get(h2).unwrap(), &vec![2]);
}

#[test]
fn test_destroyed_handle_is_invalid() {
    let mut store = HandleStore::new();
    let raw = store.insert("a").unwrap().into_raw();
    assert_eq!(store.remove(raw), Ok("a"));

    assert_eq!(store.get(raw), Err(BoundaryError::InvalidHandle(raw)));
    assert_eq!(store.get_mut(raw), Err(BoundaryError::InvalidHandle(raw)));
    assert_eq!(store.remove(raw), Err(BoundaryError::InvalidHandle(raw)));
    assert!(store.is_empty());
}

#[test]
fn test_stale_handle_does_not_reach_new_occupant() {
    let mut store = HandleStore::new();
    let old = store.insert("old").unwrap();
    store.remove(old.into_raw()).unwrap();

    let new = store.insert("new").unwrap();
    assert_eq!(new.slot(), old.slot());
    assert_ne!(new, old);
    assert!(store.get(old.into_raw()).is_err());
    assert_eq!(store.get(new.into_raw()), Ok(&"new"));

    // a second destroy through the stale handle must not touch the new one
    assert!(store.remove(old.into_raw()).is_err());
    assert_eq!(store.len(), 1);
}

#[test]
fn test_unknown_handles_are_rejected() {
    let mut store: HandleStore<u8> = HandleStore::new();
    store.insert(1).unwrap();
    for raw in [0, 2, 0x0001_0001, 0xFFFF_FFFF] {
        assert_eq!(store.get(raw), Err(BoundaryError::InvalidHandle(raw)));
        assert!(!store.contains(raw));
    }
}

#[test]
fn test_capacity_limit() {
    let mut store = HandleStore::with_config(StoreConfig::default().with_max_handles(2));
    let a = store.insert(0u8).unwrap();
    store.insert(1u8).unwrap();
    assert_eq!(
        store.insert(2u8),
        Err(BoundaryError::CapacityExhausted { max: 2 })
    );

    store.remove(a.into_raw()).unwrap();
    assert!(store.insert(3u8).is_ok());
}

#[test]
fn test_exhausted_generation_retires_slot() {
    let mut store = HandleStore::new();
    let mut last = store.insert(0u32).unwrap();
    while last.generation() < MAX_GENERATION {
        store.remove(last.into_raw()).unwrap();
        last = store.insert(0u32).unwrap();
        assert_eq!(last.slot(), 0);
    }
    store.remove(last.into_raw()).unwrap();
    assert_eq!(store.retired(), 1);

    let next = store.insert(1u32).unwrap();
    assert_eq!(next.slot(), 1);
    assert_eq!(next, Handle::new(1, 0).unwrap());
    assert!(store.get(last.into_raw()).is_err());
}

#[test]
fn test_clear_invalidates_everything() {
    let mut store = HandleStore::new();
    let handles: Vec<u32> = (0..8).map(|i| store.insert(i).unwrap().into_raw()).collect();
    store.clear();
    assert!(store.is_empty());
    for raw in handles {
        assert!(store.get(raw).is_err());
    }
}

#[test]
fn test_iter_visits_live_instances_in_slot_order() {
    let mut store = HandleStore::new();
    let a = store.insert('a').unwrap();
    let b = store.insert('b').unwrap();
    let c = store.insert('c').unwrap();
    store.remove(b.into_raw()).unwrap();

    let live: Vec<(Handle, char)> = store.iter().map(|(h, v)| (h, *v)).collect();
    assert_eq!(live, vec![(a, 'a'), (c, 'c')]);
}

#[test]
fn test_vacated_slots_are_reused_before_growing() {
    let mut store = HandleStore::new();
    let a = store.insert("a").unwrap().into_raw();
    let _b = store.insert("b").unwrap();
    assert_eq!(store.capacity(), 2);

    store.remove(a).unwrap();
    let c = store.insert("c").unwrap();
    assert_eq!(c.slot(), 0);
    assert_eq!(store.capacity(), 2);
    assert!(store.contains(c.into_raw()));
    assert!(!store.contains(a));
}
