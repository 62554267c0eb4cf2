//! Window management system
//!
//! Handles window creation, fullscreen toggle, and title updates.

use std::sync::Arc;
use winit::{
    event_loop::ActiveEventLoop,
    window::{Fullscreen, Window},
};
use crate::config::WindowConfig;

/// Owns the application window
pub struct WindowSystem {
    window: Arc<Window>,
    base_title: String,
}

impl WindowSystem {
    /// Create window from config
    pub fn create(
        event_loop: &ActiveEventLoop,
        config: &WindowConfig,
    ) -> Result<Self, WindowError> {
        let attrs = Window::default_attributes()
            .with_title(&config.title)
            .with_inner_size(winit::dpi::LogicalSize::new(config.width, config.height))
            .with_fullscreen(fullscreen_mode(config.fullscreen));

        let window = event_loop
            .create_window(attrs)
            .map(Arc::new)
            .map_err(|e| WindowError::CreationFailed(e.to_string()))?;
        log::info!("Created {}x{} window", config.width, config.height);

        Ok(Self {
            window,
            base_title: config.title.clone(),
        })
    }

    /// Get window reference (for RenderContext creation)
    pub fn window(&self) -> &Arc<Window> {
        &self.window
    }

    /// Toggle borderless fullscreen, returning whether it is now on
    pub fn toggle_fullscreen(&self) -> bool {
        let fullscreen = self.window.fullscreen().is_none();
        self.window.set_fullscreen(fullscreen_mode(fullscreen));
        fullscreen
    }

    /// Show the scene and the local participant in the title bar
    pub fn update_title(&self, scene: &str, identity: &str, wave: bool) {
        self.window.set_title(&format_title(&self.base_title, scene, identity, wave));
    }

    /// Request a redraw
    pub fn request_redraw(&self) {
        self.window.request_redraw();
    }
}

fn fullscreen_mode(fullscreen: bool) -> Option<Fullscreen> {
    fullscreen.then_some(Fullscreen::Borderless(None))
}

fn format_title(base: &str, scene: &str, identity: &str, wave: bool) -> String {
    let wave = if wave { " [wave]" } else { "" };
    format!("{} - {} as {}{}", base, scene, identity, wave)
}

#[derive(Debug)]
pub enum WindowError {
    CreationFailed(String),
}

impl std::fmt::Display for WindowError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            WindowError::CreationFailed(msg) => write!(f, "Window creation failed: {}", msg),
        }
    }
}

impl std::error::Error for WindowError {}
