//! Host side of the theus calling convention, on top of wasmtime.
//!
//! [`ModuleRuntime`] loads a module that exports handle-based functions and
//! turns the raw integer protocol back into typed results:
//!
//! ```text
//! read:  len(h) -> n, ptr(h) -> off, copy memory[off..off + n]
//! write: reserve(h, n) -> off, copy bytes into memory[off..off + n]
//! ```
//!
//! Both sequences happen inside a single `&mut self` call, so no other
//! module call can move the buffer between the two steps.

pub mod config;
pub mod runtime;

#[cfg(test)]
pub mod tests;

pub use config::{ExportNames, RuntimeConfig};
pub use runtime::{ModuleRuntime, State};

/// Initialise `env_logger` from `RUST_LOG`. Safe to call more than once.
pub fn init_logging() {
    let _ = env_logger::builder()
        .is_test(cfg!(test))
        .format_timestamp(None)
        .try_init();
}
