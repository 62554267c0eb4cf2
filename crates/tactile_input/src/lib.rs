//! Pointer and camera input for Tactile scenes
//!
//! - [`OrbitController`] - Damped orbit/pan/zoom camera control
//! - [`PointerInteraction`] - Turns pointer presses into ray-cast picks

mod orbit;
mod pointer;

pub use orbit::{OrbitCamera, OrbitController};
pub use pointer::{pick_nearest, screen_to_ndc, PickCamera, PointerInteraction, PointerState};
