#![allow(dead_code)]

pub struct Widget;

#[theus_macros::c_compatible]
impl Widget {
    pub fn width(&self) -> u32 {
        4
    }
}

fn main() {}
