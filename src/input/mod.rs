//! Input handling
//!
//! Turns key presses and clicks into [`InputAction`]s; drags and scrolling
//! go straight to the orbit controller.

mod input_mapper;

pub use input_mapper::{InputAction, InputMapper};
