//! Per-frame simulation
//!
//! One frame runs, in order:
//! - orbit camera update
//! - draining of remote sync deliveries
//! - model animations and rig tweens
//! - cube transitions and the idle wave
//! - fire emitters

use std::time::Instant;

use tactile_core::{WaveAnimator, World};
use tactile_input::OrbitController;
use tactile_render::Camera3D;
use tactile_sync::SyncChannel;

use crate::config::AnimationConfig;

/// Summary of one simulated frame
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct FrameReport {
    /// Seconds simulated
    pub dt: f32,
    /// Remote mirrors activated by sync deliveries
    pub mirrored: usize,
    /// Objects still transitioning after the frame
    pub transitioning: usize,
}

/// Drives the world forward once per redraw
pub struct FrameSystem {
    start: Instant,
    last_frame: Instant,
    max_dt: f32,
    wave: WaveAnimator,
}

impl FrameSystem {
    pub fn new(config: &AnimationConfig) -> Self {
        let now = Instant::now();
        Self {
            start: now,
            last_frame: now,
            max_dt: config.max_frame_dt,
            wave: WaveAnimator::new(config.wave),
        }
    }

    /// Measure the frame time and run one step
    pub fn update(
        &mut self,
        world: &mut World,
        camera: &mut Camera3D,
        orbit: &mut OrbitController,
        channel: Option<&mut SyncChannel>,
    ) -> FrameReport {
        let now = Instant::now();
        // Cap dt so a stalled window doesn't jump every animation to its end
        let dt = (now - self.last_frame).as_secs_f32().min(self.max_dt);
        self.last_frame = now;
        let elapsed = (now - self.start).as_secs_f32();

        self.step(dt, elapsed, world, camera, orbit, channel)
    }

    /// Run one step with an explicit frame time and clock
    pub fn step(
        &mut self,
        dt: f32,
        elapsed: f32,
        world: &mut World,
        camera: &mut Camera3D,
        orbit: &mut OrbitController,
        channel: Option<&mut SyncChannel>,
    ) -> FrameReport {
        orbit.update(camera);

        let mirrored = match channel {
            Some(channel) => channel.drain(world).unwrap_or_else(|e| {
                log::warn!("Failed to drain channel '{}': {}", channel.name(), e);
                0
            }),
            None => 0,
        };

        world.update_animations(dt);
        let transitioning = world.update_transitions(dt);
        self.wave.update(world.objects_mut());
        world.update_emitters(elapsed);

        FrameReport { dt, mirrored, transitioning }
    }

    /// Flip the idle wave, returning whether it now runs
    pub fn toggle_wave(&mut self) -> bool {
        let enabled = self.wave.toggle();
        log::info!("Idle wave: {}", if enabled { "ON" } else { "OFF" });
        enabled
    }

    pub fn wave_enabled(&self) -> bool {
        self.wave.is_enabled()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;
    use tactile_core::{
        compose_grid, CameraFraming, GridPattern, GridProfile, Peer, SessionContext, TransitionSettings,
    };
    use tactile_sync::MemoryStore;

    fn grid_world(identity: &str, peer: &str, cells: Vec<Vec<u8>>) -> World {
        let grid = GridProfile { rows: 1, cols: cells[0].len(), ..GridProfile::default() };
        let session = SessionContext::new(identity, identity, vec![Peer::new(peer, peer)]);
        let mut world = World::new();
        compose_grid(&mut world, &grid, &GridPattern::from_rows(cells), &session, TransitionSettings::default());
        world
    }

    fn still_config() -> AnimationConfig {
        let mut config = AnimationConfig::default();
        config.wave.enabled = false;
        config
    }

    #[test]
    fn test_step_settles_pressed_button() {
        let mut world = grid_world("alice", "bob", vec![vec![1]]);
        let mut camera = Camera3D::from_framing(&CameraFraming::default(), 1.0);
        let mut orbit = OrbitController::new();
        let mut frame = FrameSystem::new(&still_config());

        let key = world.objects().next().map(|(k, _)| k).unwrap();
        let mut sent = Vec::new();
        world.get_mut(key).unwrap().toggle_press(&mut sent);
        assert_eq!(sent.len(), 1);

        let mut report = FrameReport::default();
        for i in 0..200 {
            report = frame.step(1.0 / 60.0, i as f32 / 60.0, &mut world, &mut camera, &mut orbit, None);
        }
        assert_eq!(report.transitioning, 0);
        let object = world.get(key).unwrap();
        assert_eq!(object.visual_offset(), object.target_offset());
    }

    #[test]
    fn test_step_drains_channel() {
        let store = Arc::new(MemoryStore::new());
        let mut alice_world = grid_world("alice", "bob", vec![vec![1]]);
        let mut bob_world = grid_world("bob", "alice", vec![vec![0]]);

        let mut alice = SyncChannel::new(store.clone(), "buttons", "alice");
        let mut bob = SyncChannel::new(store, "buttons", "bob");
        alice.subscribe().unwrap();
        bob.subscribe().unwrap();

        let mut camera = Camera3D::from_framing(&CameraFraming::default(), 1.0);
        let mut orbit = OrbitController::new();
        let mut frame = FrameSystem::new(&still_config());

        let key = alice_world.objects().next().map(|(k, _)| k).unwrap();
        alice_world.get_mut(key).unwrap().toggle_press(&mut alice);

        let report = frame.step(0.016, 0.0, &mut bob_world, &mut camera, &mut orbit, Some(&mut bob));
        assert_eq!(report.mirrored, 1);
        assert!(bob_world.objects().all(|(_, o)| o.is_pressed()));
    }

    #[test]
    fn test_toggle_wave() {
        let mut frame = FrameSystem::new(&AnimationConfig::default());
        let initial = frame.wave_enabled();
        assert_eq!(frame.toggle_wave(), !initial);
        assert_eq!(frame.wave_enabled(), !initial);
    }
}
