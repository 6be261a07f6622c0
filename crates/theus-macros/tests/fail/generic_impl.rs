#![allow(dead_code)]

pub struct Holder<T>(T);

#[theus_macros::c_compatible]
impl<T> Holder<T> {
    pub fn destroy(self) {}
}

fn main() {}
