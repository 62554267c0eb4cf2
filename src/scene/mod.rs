//! Scene startup
//!
//! Reads the configured scene, participants and pattern, loads models and
//! composes the world.

mod bootstrap;

pub use bootstrap::{bootstrap, BootstrapError, LoadedScene};
