use crate::handle::{Handle, MAX_SLOTS};

#[test]
fn test_first_handle_is_one() {
    let handle = Handle::new(0, 0).unwrap();
    assert_eq!(handle.into_raw(), 1);
    assert_eq!(handle.slot(), 0);
    assert_eq!(handle.generation(), 0);
}

#[test]
fn test_generation_lives_in_high_bits() {
    let handle = Handle::new(4, 3).unwrap();
    assert_eq!(handle.into_raw(), (3 << 16) | 5);
    assert_eq!(handle.slot(), 4);
    assert_eq!(handle.generation(), 3);
}

#[test]
fn test_zero_and_indexless_values_are_not_handles() {
    assert!(Handle::from_raw(0).is_none());
    assert!(Handle::from_raw(0x0001_0000).is_none());
    assert!(Handle::from_raw(0xFFFF_0000).is_none());
}

#[test]
fn test_from_raw_preserves_fields() {
    let original = Handle::new(MAX_SLOTS - 1, u16::MAX).unwrap();
    let parsed = Handle::from_raw(original.into_raw()).unwrap();
    assert_eq!(parsed, original);
    assert_eq!(parsed.slot(), (MAX_SLOTS - 1) as usize);
    assert_eq!(parsed.generation(), u16::MAX);
}

#[test]
fn test_slot_space_is_bounded() {
    assert!(Handle::new(MAX_SLOTS, 0).is_none());
    assert!(Handle::new(u32::MAX, 0).is_none());
}
