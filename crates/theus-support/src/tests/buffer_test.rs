use crate::buffer::{allocate, CBuffer};
use crate::error::BoundaryError;

#[test]
fn test_default_buffer_is_empty_but_addressable() {
    let buffer = CBuffer::new();
    assert_eq!(buffer.len(), 0);
    assert!(buffer.is_empty());
    assert!(!buffer.as_ptr().is_null());
    assert_eq!(buffer.as_bytes_with_nul(), b"\0");
}

#[test]
fn test_length_excludes_terminator() {
    let buffer = CBuffer::from_bytes(b"hey there").unwrap();
    assert_eq!(buffer.len(), 9);
    assert_eq!(buffer.as_bytes(), b"hey there");
    assert_eq!(buffer.as_bytes_with_nul(), b"hey there\0");
    assert_eq!(buffer.to_string_lossy(), "hey there");
}

#[test]
fn test_pointer_and_length_describe_the_same_snapshot() {
    let buffer = CBuffer::from_bytes(b"snapshot").unwrap();
    let len = buffer.len() as usize;
    let ptr = buffer.as_ptr();
    let ptr_again = buffer.as_ptr();
    assert_eq!(ptr, ptr_again);
    let read = unsafe { std::slice::from_raw_parts(ptr, len) };
    assert_eq!(read, b"snapshot");
}

#[test]
fn test_reserve_then_write_round_trips() {
    let mut buffer = CBuffer::from_bytes(b"hey there").unwrap();
    let dst = buffer.reserve(5).unwrap();
    unsafe { std::ptr::copy_nonoverlapping(b"ABCDE".as_ptr(), dst, 5) };

    assert_eq!(buffer.len(), 5);
    assert_eq!(buffer.as_bytes(), b"ABCDE");
    assert_eq!(buffer.as_bytes_with_nul(), b"ABCDE\0");
}

#[test]
fn test_reserve_zero_bytes() {
    let mut buffer = CBuffer::from_bytes(b"gone").unwrap();
    let dst = buffer.reserve(0).unwrap();
    assert!(!dst.is_null());
    assert!(buffer.is_empty());
    assert_eq!(buffer.as_bytes(), b"");
}

#[test]
fn test_reserved_region_is_zeroed_until_written() {
    let mut buffer = CBuffer::new();
    buffer.reserve(4).unwrap();
    assert_eq!(buffer.as_bytes(), &[0u8; 4]);
}

#[test]
fn test_arbitrary_bytes_round_trip() {
    let mut buffer = CBuffer::new();
    for len in [1usize, 7, 64, 4096] {
        let payload: Vec<u8> = (0..len).map(|i| (i * 31 % 251) as u8).collect();
        let dst = buffer.reserve(len as u32).unwrap();
        unsafe { std::ptr::copy_nonoverlapping(payload.as_ptr(), dst, len) };
        assert_eq!(buffer.as_bytes(), payload.as_slice());
        assert_eq!(buffer.len() as usize, len);
    }
}

#[test]
#[cfg(target_pointer_width = "64")]
fn test_lengths_beyond_u32_are_refused() {
    let requested = u32::MAX as usize + 1;
    assert_eq!(
        allocate(requested).unwrap_err(),
        BoundaryError::OutOfMemory { requested }
    );

    let data = allocate(16).unwrap();
    assert!(data.is_empty());
    assert!(data.capacity() >= 17);
}
