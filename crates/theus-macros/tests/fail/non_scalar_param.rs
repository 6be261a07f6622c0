#![allow(dead_code)]

pub struct Widget;

#[theus_macros::c_compatible]
impl Widget {
    pub fn rename(&mut self, name: String) -> usize {
        name.len()
    }

    pub fn create() -> Self {
        Widget
    }

    pub fn destroy(self) {}
}

fn main() {}
