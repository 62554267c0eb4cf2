//! Tactile - interactive 3D scene demos
//!
//! Loads the configured scene, joins the button channel, and runs the
//! orbit/pick/render loop.

use std::sync::Arc;
use winit::{
    application::ApplicationHandler,
    event::{DeviceEvent, DeviceId, MouseScrollDelta, WindowEvent},
    event_loop::{ActiveEventLoop, ControlFlow, EventLoop},
    keyboard::PhysicalKey,
    window::WindowId,
};

use tactile::config::AppConfig;
use tactile::input::{InputAction, InputMapper};
use tactile::scene::{bootstrap, LoadedScene};
use tactile::systems::{FrameSystem, RenderSystem, WindowSystem};
use tactile_core::{EventSink, SyncEvent};
use tactile_input::{OrbitController, PointerInteraction};
use tactile_render::{Camera3D, RenderError};
use tactile_sync::{MemoryStore, SyncChannel};

/// Main application state
struct App {
    config: AppConfig,
    loaded: LoadedScene,
    window: Option<WindowSystem>,
    render: Option<RenderSystem>,
    camera: Camera3D,
    orbit: OrbitController,
    pointer: PointerInteraction,
    frame: FrameSystem,
    /// Shared channel; `None` when sync is disabled
    channel: Option<SyncChannel>,
    /// Presses of a session without a channel
    local_events: Vec<SyncEvent>,
}

impl App {
    fn new(config: AppConfig, loaded: LoadedScene) -> Self {
        let aspect = config.window.width as f32 / config.window.height.max(1) as f32;
        let camera = Camera3D::from_framing(&loaded.scene.profile.camera, aspect);

        let orbit = OrbitController::new()
            .with_distance_limits(config.camera.min_distance, config.camera.max_distance)
            .with_damping(config.camera.damping)
            .with_rotate_sensitivity(config.camera.rotate_sensitivity);

        let channel = if config.sync.enabled {
            let store = Arc::new(MemoryStore::new());
            let mut channel = SyncChannel::new(store, config.sync.channel.clone(), loaded.session.identity());
            match channel.subscribe() {
                Ok(()) => Some(channel),
                Err(e) => {
                    log::warn!("Failed to join channel '{}': {}. Presses stay local.", config.sync.channel, e);
                    None
                }
            }
        } else {
            log::info!("Sync disabled, presses stay local");
            None
        };

        Self {
            pointer: PointerInteraction::new(config.window.width, config.window.height),
            frame: FrameSystem::new(&config.animation),
            window: None,
            render: None,
            camera,
            orbit,
            channel,
            local_events: Vec::new(),
            loaded,
            config,
        }
    }

    fn update_title(&self) {
        if let Some(window) = &self.window {
            window.update_title(&self.loaded.scene.name, self.loaded.session.identity(), self.frame.wave_enabled());
        }
    }

    fn handle_action(&mut self, action: InputAction, event_loop: &ActiveEventLoop) {
        match action {
            InputAction::Exit => event_loop.exit(),
            InputAction::ResetCamera => {
                self.camera.reset(&self.loaded.scene.profile.camera);
                self.orbit.reset();
                log::info!("Camera reset to scene framing");
            }
            InputAction::ToggleFullscreen => {
                if let Some(window) = &self.window {
                    let on = window.toggle_fullscreen();
                    log::info!("Fullscreen: {}", if on { "ON" } else { "OFF" });
                }
            }
            InputAction::ToggleWave => {
                self.frame.toggle_wave();
                self.update_title();
            }
            InputAction::StartRigs => {
                self.loaded.world.start_rigs();
                log::info!("Started {} rigs", self.loaded.world.rigs().len());
            }
            InputAction::Press => {
                if !self.pointer.pointer_down() {
                    return;
                }
                let sink: &mut dyn EventSink = match &mut self.channel {
                    Some(channel) => channel,
                    None => &mut self.local_events,
                };
                if let Some(key) = self.pointer.resolve(&self.camera, &mut self.loaded.world, sink) {
                    log::debug!("Pressed {:?}", key);
                }
            }
        }
    }

    fn redraw(&mut self, event_loop: &ActiveEventLoop) {
        let report = self.frame.update(
            &mut self.loaded.world,
            &mut self.camera,
            &mut self.orbit,
            self.channel.as_mut(),
        );
        if report.mirrored > 0 {
            log::debug!("Mirrored {} remote presses", report.mirrored);
        }

        if let Some(render) = &mut self.render {
            match render.render_frame(&self.camera, &self.loaded.world) {
                Ok(()) => {}
                Err(RenderError::SurfaceLost) => render.recover_surface(),
                Err(RenderError::OutOfMemory) => {
                    log::error!("GPU out of memory");
                    event_loop.exit();
                    return;
                }
                Err(e) => log::warn!("Render error: {}", e),
            }
        }
        self.loaded.world.clear_dirty();

        if let Some(window) = &self.window {
            window.request_redraw();
        }
    }
}

impl ApplicationHandler for App {
    fn resumed(&mut self, event_loop: &ActiveEventLoop) {
        if self.window.is_some() {
            return;
        }

        let window = match WindowSystem::create(event_loop, &self.config.window) {
            Ok(window) => window,
            Err(e) => {
                log::error!("{}", e);
                event_loop.exit();
                return;
            }
        };

        let render = match RenderSystem::new(
            window.window().clone(),
            self.config.window.vsync,
            self.loaded.scene.profile.lighting,
            self.config.rendering.clear_color,
        ) {
            Ok(render) => render,
            Err(e) => {
                log::error!("Failed to initialize rendering: {}", e);
                event_loop.exit();
                return;
            }
        };

        let (width, height) = render.size();
        self.camera.set_aspect(render.aspect_ratio());
        self.pointer.set_viewport(width, height);

        self.window = Some(window);
        self.render = Some(render);
        self.update_title();
    }

    fn window_event(&mut self, event_loop: &ActiveEventLoop, _id: WindowId, event: WindowEvent) {
        match event {
            WindowEvent::CloseRequested => {
                event_loop.exit();
            }

            WindowEvent::Resized(physical_size) => {
                if let Some(render) = &mut self.render {
                    render.resize(physical_size.width, physical_size.height);
                    self.camera.set_aspect(render.aspect_ratio());
                }
                self.pointer.set_viewport(physical_size.width, physical_size.height);
            }

            WindowEvent::KeyboardInput { event, .. } => {
                if let PhysicalKey::Code(key) = event.physical_key {
                    if let Some(action) = InputMapper::map_keyboard(key, event.state) {
                        self.handle_action(action, event_loop);
                    }
                }
            }

            WindowEvent::CursorMoved { position, .. } => {
                self.pointer.cursor_moved(position.x, position.y);
            }

            WindowEvent::CursorLeft { .. } => {
                self.pointer.cursor_left();
            }

            WindowEvent::MouseInput { state, button, .. } => {
                self.orbit.process_mouse_button(button, state);
                if let Some(action) = InputMapper::map_mouse_button(button, state) {
                    self.handle_action(action, event_loop);
                }
            }

            WindowEvent::MouseWheel { delta, .. } => {
                let lines = match delta {
                    MouseScrollDelta::LineDelta(_, y) => y,
                    MouseScrollDelta::PixelDelta(pos) => pos.y as f32 / 100.0,
                };
                self.orbit.process_scroll(lines);
            }

            WindowEvent::RedrawRequested => {
                self.redraw(event_loop);
            }

            _ => {}
        }
    }

    fn device_event(
        &mut self,
        _event_loop: &ActiveEventLoop,
        _device_id: DeviceId,
        event: DeviceEvent,
    ) {
        if let DeviceEvent::MouseMotion { delta } = event {
            self.orbit.process_mouse_motion(delta.0, delta.1);
        }
    }
}

fn main() {
    let (config, config_error) = match AppConfig::load() {
        Ok(config) => (config, None),
        Err(e) => (AppConfig::default(), Some(e)),
    };

    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(config.debug.log_level.as_str()))
        .init();
    log::info!("Starting Tactile");
    if let Some(e) = config_error {
        log::warn!("Failed to load config: {}. Using defaults.", e);
    }

    let loaded = match bootstrap(&config) {
        Ok(loaded) => loaded,
        Err(e) => {
            log::error!("{}", e);
            std::process::exit(1);
        }
    };

    // Create event loop
    let event_loop = EventLoop::new().expect("Failed to create event loop");
    event_loop.set_control_flow(ControlFlow::Poll);

    let mut app = App::new(config, loaded);
    if let Err(e) = event_loop.run_app(&mut app) {
        log::error!("Event loop error: {}", e);
    }
}
