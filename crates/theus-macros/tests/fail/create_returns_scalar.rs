#![allow(dead_code)]

pub struct Widget;

#[theus_macros::c_compatible]
impl Widget {
    pub fn create() -> u32 {
        0
    }

    pub fn destroy(self) {}
}

fn main() {}
