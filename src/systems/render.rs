//! GPU rendering system
//!
//! Manages GPU rendering including:
//! - Render context and surface
//! - The instanced mesh pipeline
//! - Frame rendering from the world's visual nodes and particles

use std::sync::Arc;

use tactile_core::{LightingProfile, World};
use tactile_render::{
    pipeline::{MeshPipeline, SceneUniforms},
    Camera3D, RenderContext, RenderError, RenderableInstances,
};
use winit::window::Window;

/// Manages GPU rendering
pub struct RenderSystem {
    context: RenderContext,
    pipeline: MeshPipeline,
    instances: RenderableInstances,
    lighting: LightingProfile,
    clear_color: wgpu::Color,
}

impl RenderSystem {
    /// Create render system for a window, lit by the scene's lighting
    pub fn new(
        window: Arc<Window>,
        vsync: bool,
        lighting: LightingProfile,
        clear_override: Option<[f32; 3]>,
    ) -> Result<Self, RenderError> {
        let context = pollster::block_on(RenderContext::with_vsync(window, vsync))?;
        let mut pipeline = MeshPipeline::new(&context.device, context.config.format);

        // Ensure depth texture exists
        pipeline.ensure_depth_texture(&context.device, context.size.width, context.size.height);

        Ok(Self {
            context,
            pipeline,
            instances: RenderableInstances::new(),
            clear_color: clear_color(&lighting, clear_override),
            lighting,
        })
    }

    /// Handle window resize
    pub fn resize(&mut self, width: u32, height: u32) {
        self.context.resize(winit::dpi::PhysicalSize::new(width, height));
        self.pipeline.ensure_depth_texture(&self.context.device, width, height);
    }

    /// Reconfigure the surface after it was lost
    pub fn recover_surface(&mut self) {
        self.context.reconfigure();
    }

    /// Render a single frame
    pub fn render_frame(&mut self, camera: &Camera3D, world: &World) -> Result<(), RenderError> {
        self.pipeline
            .update_uniforms(&self.context.queue, &scene_uniforms(camera, &self.lighting));

        self.instances.rebuild(world);
        self.instances.sort_transparent(camera.eye);
        self.pipeline.upload_instances(
            &self.context.device,
            &self.context.queue,
            &self.instances.opaque,
            &self.instances.transparent,
        );

        let output = self.context.surface.get_current_texture()?;
        let view = output.texture.create_view(&wgpu::TextureViewDescriptor::default());

        let mut encoder = self
            .context
            .device
            .create_command_encoder(&wgpu::CommandEncoderDescriptor {
                label: Some("Render Encoder"),
            });

        if !self.pipeline.render(&mut encoder, &view, self.clear_color) {
            log::warn!("Skipping frame without a depth texture");
        }

        self.context.queue.submit(std::iter::once(encoder.finish()));
        output.present();

        Ok(())
    }

    /// Get current surface size
    pub fn size(&self) -> (u32, u32) {
        (self.context.size.width, self.context.size.height)
    }

    pub fn aspect_ratio(&self) -> f32 {
        self.context.aspect_ratio()
    }
}

/// Shader uniforms for a camera under a scene's lighting
pub fn scene_uniforms(camera: &Camera3D, lighting: &LightingProfile) -> SceneUniforms {
    SceneUniforms {
        view_projection: camera.view_projection(),
        light_dir: lighting.light_direction.normalized().to_array(),
        ambient_strength: lighting.ambient,
        diffuse_strength: lighting.light_intensity,
        camera_position: camera.eye.to_array(),
        ..SceneUniforms::default()
    }
}

/// Clear color: the configured override, else the scene background
pub fn clear_color(lighting: &LightingProfile, clear_override: Option<[f32; 3]>) -> wgpu::Color {
    let [r, g, b] = clear_override.unwrap_or(lighting.background);
    wgpu::Color {
        r: r as f64,
        g: g as f64,
        b: b as f64,
        a: 1.0,
    }
}
