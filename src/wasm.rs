//! The theus-record module, compiled by the build script

include!(concat!(env!("OUT_DIR"), "/theus_record_wasm.rs"));

/// The compiled module, or `None` when the build script could not target
/// wasm32.
pub fn record_wasm() -> Option<&'static [u8]> {
    if THEUS_RECORD_WASM.is_empty() {
        None
    } else {
        Some(THEUS_RECORD_WASM)
    }
}
