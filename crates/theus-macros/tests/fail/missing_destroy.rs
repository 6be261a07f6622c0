#![allow(dead_code)]

pub struct Widget;

#[theus_macros::c_compatible]
impl Widget {
    pub fn create() -> Self {
        Widget
    }
}

fn main() {}
