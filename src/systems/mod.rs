//! Application systems
//!
//! Window, per-frame simulation, and rendering, driven from main.rs.

mod frame;
mod render;
mod window;

pub use frame::{FrameReport, FrameSystem};
pub use render::{clear_color, scene_uniforms, RenderSystem};
pub use window::{WindowError, WindowSystem};
