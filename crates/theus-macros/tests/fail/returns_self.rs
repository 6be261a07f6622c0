#![allow(dead_code)]

pub struct Widget;

#[theus_macros::c_compatible]
impl Widget {
    pub fn duplicate(&self) -> Self {
        Widget
    }

    pub fn create() -> Self {
        Widget
    }

    pub fn destroy(self) {}
}

fn main() {}
