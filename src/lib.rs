//! Tactile - interactive 3D scene demos
//!
//! The application layer: configuration, input mapping, scene bootstrap,
//! and the window, frame and render systems driven by the binary.

pub mod config;
pub mod input;
pub mod scene;
pub mod systems;
