#![allow(dead_code)]

pub struct Widget;

#[theus_macros::c_compatible]
impl Widget {
    pub fn pick<T>(&self) -> u32 {
        0
    }

    pub fn create() -> Self {
        Widget
    }

    pub fn destroy(self) {}
}

fn main() {}
