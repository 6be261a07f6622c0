#![allow(dead_code)]

pub struct Widget;

#[theus_macros::c_compatible]
impl Widget {
    pub fn width(self: &Self) -> u32 {
        4
    }

    pub fn create() -> Self {
        Widget
    }

    pub fn destroy(self) {}
}

fn main() {}
