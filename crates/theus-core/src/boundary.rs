//! Mapping Rust return values onto boundary integers
//!
//! Every exported function returns a plain scalar. Values that can fail
//! (`Option`, `Result`) and pointers are flattened here, with the type's
//! default (`0`, `false`, null offset) standing in for failure.

use std::fmt::Display;

use theus_support::to_offset;

pub trait IntoBoundary {
    /// The scalar that crosses the boundary. Its `Default` is the sentinel.
    type Abi: Default;

    fn into_boundary(self) -> Self::Abi;
}

macro_rules! scalar_into_boundary {
    ($($ty:ty),* $(,)?) => {
        $(
            impl IntoBoundary for $ty {
                type Abi = $ty;

                fn into_boundary(self) -> $ty {
                    self
                }
            }
        )*
    };
}

scalar_into_boundary!(
    (),
    bool,
    char,
    i8,
    i16,
    i32,
    i64,
    isize,
    u8,
    u16,
    u32,
    u64,
    usize,
    f32,
    f64,
);

// Pointers leave the module as linear-memory offsets; null becomes 0.
impl<T> IntoBoundary for *const T {
    type Abi = usize;

    fn into_boundary(self) -> usize {
        to_offset(self)
    }
}

impl<T> IntoBoundary for *mut T {
    type Abi = usize;

    fn into_boundary(self) -> usize {
        to_offset(self as *const T)
    }
}

impl<V: IntoBoundary> IntoBoundary for Option<V> {
    type Abi = V::Abi;

    fn into_boundary(self) -> V::Abi {
        match self {
            Some(value) => value.into_boundary(),
            None => V::Abi::default(),
        }
    }
}

impl<V: IntoBoundary, E: Display> IntoBoundary for Result<V, E> {
    type Abi = V::Abi;

    fn into_boundary(self) -> V::Abi {
        match self {
            Ok(value) => value.into_boundary(),
            Err(e) => {
                log::warn!("returning sentinel across the boundary: {}", e);
                V::Abi::default()
            }
        }
    }
}
