//! Spiral fire particle emitter
//!
//! The emitter owns a static particle field (base position, color and a
//! per-particle random value) plus two uniforms, `time` and `base_size`.
//! Each frame only the uniforms change; a particle's animated position is a
//! pure function of its base data and `time`, evaluated by
//! [`FireEmitter::particle_position`] and mirrored in the particle shader.

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use tactile_math::Vec3;

use crate::descriptor::EmitterSettings;

/// Height of the particle column
pub const FIRE_HEIGHT: f32 = 2.0;
/// Radius of the emitter base
pub const FIRE_RADIUS: f32 = 0.5;
/// `base_size` before any scale is applied
pub const DEFAULT_BASE_SIZE: f32 = 20.0;

const TAU_APPROX: f32 = 6.28;

/// Static data of one particle
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct FireParticle {
    pub position: Vec3,
    pub color: [f32; 3],
    pub random: f32,
}

/// A column of particles spiralling upward
#[derive(Clone, Debug)]
pub struct FireEmitter {
    particles: Vec<FireParticle>,
    time: f32,
    base_size: f32,
    position: Vec3,
    scale: Vec3,
}

impl FireEmitter {
    /// Create an emitter with a randomly generated particle field
    pub fn new<R: Rng>(count: usize, rng: &mut R) -> Self {
        let particles = (0..count)
            .map(|_| {
                let radius = rng.gen::<f32>() * FIRE_RADIUS;
                let theta = rng.gen::<f32>() * std::f32::consts::TAU;
                let position = Vec3::new(
                    radius * theta.cos(),
                    rng.gen::<f32>() * FIRE_HEIGHT,
                    radius * theta.sin(),
                );
                let intensity = rng.gen::<f32>();
                let color = [
                    (intensity * 1.5).min(1.0),
                    intensity * 0.5,
                    (intensity * 0.1).min(0.4),
                ];
                FireParticle {
                    position,
                    color,
                    random: rng.gen::<f32>(),
                }
            })
            .collect();

        Self {
            particles,
            time: 0.0,
            base_size: DEFAULT_BASE_SIZE,
            position: Vec3::ZERO,
            scale: Vec3::ONE,
        }
    }

    /// Create an emitter with a reproducible particle field
    pub fn with_seed(count: usize, seed: u64) -> Self {
        Self::new(count, &mut StdRng::seed_from_u64(seed))
    }

    /// Create an emitter from scene settings, placed relative to `origin`
    pub fn from_settings(settings: &EmitterSettings, origin: Vec3, max_particles: usize) -> Self {
        let count = (settings.particle_count as usize).min(max_particles);
        let mut emitter = Self::new(count, &mut rand::thread_rng());
        emitter.set_position(origin + settings.offset);
        emitter.set_scale(settings.scale);
        emitter
    }

    pub fn set_position(&mut self, position: Vec3) {
        self.position = position;
    }

    /// Scale the emitter; particle size follows the mean scale
    pub fn set_scale(&mut self, scale: Vec3) {
        self.scale = scale;
        self.base_size = 100.0 * scale.mean();
    }

    /// Set the `time` uniform, in seconds of wall time
    pub fn update(&mut self, time: f32) {
        self.time = time;
    }

    #[inline]
    pub fn time(&self) -> f32 {
        self.time
    }

    #[inline]
    pub fn base_size(&self) -> f32 {
        self.base_size
    }

    pub fn position(&self) -> Vec3 {
        self.position
    }

    pub fn scale(&self) -> Vec3 {
        self.scale
    }

    pub fn particles(&self) -> &[FireParticle] {
        &self.particles
    }

    pub fn len(&self) -> usize {
        self.particles.len()
    }

    pub fn is_empty(&self) -> bool {
        self.particles.is_empty()
    }

    /// Animated local position of a particle at the current time
    pub fn particle_position(&self, particle: &FireParticle) -> Vec3 {
        let r = particle.random;
        let t = self.time * (1.0 + r * 0.5);
        let y = (particle.position.y + t).rem_euclid(FIRE_HEIGHT);

        let angle = t * 2.0 + r * TAU_APPROX;
        let radius = 0.1 * (FIRE_HEIGHT - y);
        let mut p = Vec3::new(particle.position.x, y, particle.position.z);
        p.x += angle.sin() * radius;
        p.z += angle.cos() * radius;

        // Turbulence
        p.x += (t * 3.0 + r * TAU_APPROX).sin() * 0.1;
        p.z += (t * 2.0 + r * TAU_APPROX).cos() * 0.1;
        p
    }

    /// Particle size before perspective division, shrinking toward the tip
    pub fn particle_size(&self, particle: &FireParticle) -> f32 {
        let y = self.particle_position(particle).y;
        self.base_size * (FIRE_HEIGHT - y) * (0.5 + particle.random * 0.5)
    }

    /// World-space position, size and color of every particle
    pub fn world_particles(&self) -> impl Iterator<Item = (Vec3, f32, [f32; 3])> + '_ {
        self.particles.iter().map(move |particle| {
            let local = self.particle_position(particle);
            (
                self.position + local.component_mul(self.scale),
                self.particle_size(particle),
                particle.color,
            )
        })
    }
}
