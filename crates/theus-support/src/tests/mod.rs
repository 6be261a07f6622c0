//! Tests for theus-support
//!
//! Handle encoding, store lifecycle, buffer protocol and region checks.

#[cfg(test)]
pub mod buffer_test;


#[cfg(test)]
pub mod handle_test;

#[cfg(test)]
pub mod store_test;
