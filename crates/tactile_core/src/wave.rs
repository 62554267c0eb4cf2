//! Idle wave animation of grid cells
//!
//! While enabled, every grid object that is neither pressed nor
//! transitioning bobs on a sine wave phased by its cell. When disabled,
//! idle objects are put back at their rest height.

use serde::{Serialize, Deserialize};

use crate::interactive::InteractiveObject;

/// Largest allowed wave amplitude
pub const MAX_AMPLITUDE: f32 = 3.0;

/// Parameters of the idle wave
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct WaveSettings {
    /// Start animating immediately
    pub enabled: bool,
    /// Wave clock increment per update
    pub speed: f32,
    /// Peak height above rest, capped at [`MAX_AMPLITUDE`]
    pub amplitude: f32,
    /// Phase difference between neighbouring cells
    pub phase_offset: f32,
    /// Depth of the downward dip
    pub downward_offset: f32,
}

impl Default for WaveSettings {
    fn default() -> Self {
        Self {
            enabled: false,
            speed: 0.005,
            amplitude: 1.5,
            phase_offset: 20.0,
            downward_offset: 1.5,
        }
    }
}

/// Drives the idle wave over a set of grid objects
#[derive(Clone, Debug)]
pub struct WaveAnimator {
    settings: WaveSettings,
    time: f32,
    enabled: bool,
}

impl WaveAnimator {
    pub fn new(settings: WaveSettings) -> Self {
        let settings = WaveSettings {
            amplitude: settings.amplitude.min(MAX_AMPLITUDE),
            ..settings
        };
        Self {
            settings,
            time: 0.0,
            enabled: settings.enabled,
        }
    }

    pub fn is_enabled(&self) -> bool {
        self.enabled
    }

    pub fn set_enabled(&mut self, enabled: bool) {
        self.enabled = enabled;
    }

    /// Flip the animation on or off, returning the new state
    pub fn toggle(&mut self) -> bool {
        self.enabled = !self.enabled;
        self.enabled
    }

    pub fn settings(&self) -> &WaveSettings {
        &self.settings
    }

    /// Height offset from rest of the cell `(row, col)` at the current time
    pub fn wave_height(&self, row: usize, col: usize) -> f32 {
        let phase = (row + col) as f32 * self.settings.phase_offset;
        let wave = (self.time * 2.0 + phase / 10.0).sin();
        self.settings.amplitude * wave - (wave * self.settings.downward_offset).abs()
    }

    /// Advance the wave clock and move every idle grid object
    pub fn update<'a>(&mut self, objects: impl IntoIterator<Item = &'a mut InteractiveObject>) {
        if !self.enabled {
            for object in objects {
                if object.cell().is_some() {
                    let rest = object.profile().rest;
                    object.set_idle_offset(rest);
                }
            }
            return;
        }

        self.time += self.settings.speed;
        for object in objects {
            let Some((row, col)) = object.cell() else {
                continue;
            };
            let height = self.wave_height(row, col);
            let rest = object.profile().rest;
            object.set_idle_offset(rest + height);
        }
    }
}
