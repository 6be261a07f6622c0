#![allow(dead_code)]

pub struct Widget;

#[theus_macros::c_compatible]
impl Widget {
    pub fn create(&self) -> Self {
        Widget
    }

    pub fn destroy(self) {}
}

fn main() {}
