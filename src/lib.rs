//! Theus Test Suite
//!
//! End-to-end tests for the theus calling convention: the `theus-record`
//! exports driven in-process through raw offsets, and the same module
//! compiled to wasm32 and driven through `theus-runtime`.

pub mod wasm;

#[cfg(test)]
pub mod tests;

pub use wasm::record_wasm;
