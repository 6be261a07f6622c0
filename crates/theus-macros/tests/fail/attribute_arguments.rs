#![allow(dead_code)]

pub struct Widget;

#[theus_macros::c_compatible(export_all)]
impl Widget {
    pub fn create() -> Self {
        Widget
    }

    pub fn destroy(self) {}
}

fn main() {}
