//! 3D Mathematics Library
//!
//! This crate provides the small math toolkit used by Tactile scenes.
//!
//! ## Core Types
//!
//! - [`Vec3`] - 3D vector with x, y, z components
//! - [`Mat4`] - 4x4 column-major matrix for transforms and cameras
//! - [`Quat`] - Unit quaternion for node rotations
//! - [`Ray`] / [`Aabb`] - Picking primitives
//! - [`Easing`] - Normalized transition curves

mod vec3;
pub mod mat4;
mod quat;
pub mod ray;
pub mod easing;

pub use vec3::Vec3;
pub use mat4::Mat4;
pub use quat::Quat;
pub use ray::{Ray, Aabb};
pub use easing::{Easing, interpolate, lerp};
