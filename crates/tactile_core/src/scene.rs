//! Scene files
//!
//! A [`SceneFile`] is a RON document naming a scene, its [`SceneProfile`]
//! (grid, camera framing, lighting, transition settings) and the model and
//! rig descriptors to load. One composition path handles every scene; the
//! profile is what differs between demos.

use serde::{Serialize, Deserialize};
use std::fs;
use std::io;
use std::path::Path;

use tactile_math::Vec3;

use crate::descriptor::{prune_models, prune_rig, ModelDescriptor, RigDescriptor};
use crate::ron_text;
use crate::transition::TransitionSettings;

/// Dimensions and heights of the cube grid
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GridProfile {
    pub rows: usize,
    pub cols: usize,
    /// Edge length of each cube
    pub cube_size: f32,
    /// Center-to-center distance; derived from the cube size when absent
    pub spacing: Option<f32>,
    /// Height of the floor the cubes sink to
    pub floor_y: f32,
    /// Depth of the holes the cubes rest in
    pub hole_depth: f32,
}

impl Default for GridProfile {
    fn default() -> Self {
        Self {
            rows: 3,
            cols: 4,
            cube_size: 4.0,
            spacing: None,
            floor_y: -4.0,
            hole_depth: 3.0,
        }
    }
}

impl GridProfile {
    /// Center-to-center spacing, at least `cube_size + 0.4` and at least 6
    pub fn spacing(&self) -> f32 {
        self.spacing.unwrap_or_else(|| (self.cube_size + 0.4).max(6.0))
    }

    /// Rest height of every cube
    pub fn rest_height(&self) -> f32 {
        self.floor_y + self.hole_depth
    }

    /// Height of a pressed button
    pub fn button_pressed_height(&self) -> f32 {
        self.floor_y
    }

    /// Height of a pressed remote mirror
    pub fn mirror_pressed_height(&self) -> f32 {
        -self.cube_size / 2.0
    }

    /// Horizontal center of the cell `(row, col)`, grid centered on the origin
    pub fn cell_center(&self, row: usize, col: usize) -> (f32, f32) {
        let spacing = self.spacing();
        let offset_x = (self.cols.saturating_sub(1)) as f32 * spacing / 2.0;
        let offset_z = (self.rows.saturating_sub(1)) as f32 * spacing / 2.0;
        (col as f32 * spacing - offset_x, row as f32 * spacing - offset_z)
    }

    pub fn cell_count(&self) -> usize {
        self.rows * self.cols
    }
}

/// Projection used by the scene camera
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub enum ProjectionKind {
    /// Half of the visible height in world units; width follows the aspect
    Orthographic { view_size: f32 },
    /// Vertical field of view in degrees
    Perspective { fov_degrees: f32 },
}

/// Where the camera starts and how it projects
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CameraFraming {
    pub projection: ProjectionKind,
    pub near: f32,
    pub far: f32,
    pub eye: Vec3,
    pub target: Vec3,
}

impl Default for CameraFraming {
    fn default() -> Self {
        Self {
            projection: ProjectionKind::Orthographic { view_size: 10.0 },
            near: -50.0,
            far: 100.0,
            eye: Vec3::new(14.0, 15.0, 15.0),
            target: Vec3::ZERO,
        }
    }
}

/// Background and light setup
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LightingProfile {
    /// Clear color (RGB, 0.0-1.0)
    pub background: [f32; 3],
    /// Ambient light intensity
    pub ambient: f32,
    /// Direction the key light shines from
    pub light_direction: Vec3,
    /// Key light intensity
    pub light_intensity: f32,
}

impl Default for LightingProfile {
    fn default() -> Self {
        Self {
            background: [0.941, 0.902, 0.902],
            ambient: 0.35,
            light_direction: Vec3::new(0.4, 1.0, 0.6),
            light_intensity: 0.9,
        }
    }
}

/// Everything that differs between demo scenes besides their models
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SceneProfile {
    /// Cube grid; `None` for scenes without one
    pub grid: Option<GridProfile>,
    pub camera: CameraFraming,
    pub lighting: LightingProfile,
    /// Transition of grid cubes
    pub transition: TransitionSettings,
    /// Slowly sway standalone props around their vertical axis
    pub sway: bool,
}

/// A serializable scene
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SceneFile {
    /// Scene name (for display/debugging)
    pub name: String,
    #[serde(default)]
    pub profile: SceneProfile,
    /// Standalone models
    #[serde(default)]
    pub models: Vec<ModelDescriptor>,
    /// Model groups animated together
    #[serde(default)]
    pub rigs: Vec<RigDescriptor>,
}

impl SceneFile {
    /// Create a new empty scene
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            profile: SceneProfile::default(),
            models: Vec::new(),
            rigs: Vec::new(),
        }
    }

    /// Load a scene from a RON file
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self, SceneLoadError> {
        let contents = fs::read_to_string(path)?;
        Self::from_ron(&contents).map_err(SceneLoadError::Parse)
    }

    /// Parse a scene from RON text
    ///
    /// Model and rig entries that don't parse are skipped with a warning; the
    /// rest of the scene still loads.
    pub fn from_ron(text: &str) -> Result<Self, ron::error::SpannedError> {
        let text = prune_entries(text);
        let mut scene: SceneFile = ron::from_str(&text)?;
        scene.profile.transition = scene.profile.transition.validated();
        Ok(scene)
    }

    /// Save a scene to a RON file
    pub fn save<P: AsRef<Path>>(&self, path: P) -> Result<(), SceneSaveError> {
        let pretty = ron::ser::PrettyConfig::new()
            .struct_names(true)
            .enumerate_arrays(false);
        let contents = ron::ser::to_string_pretty(self, pretty)?;
        fs::write(path, contents)?;
        Ok(())
    }

    /// Set the profile
    pub fn with_profile(mut self, profile: SceneProfile) -> Self {
        self.profile = profile;
        self
    }

    /// Add a model descriptor
    pub fn add_model(&mut self, model: ModelDescriptor) {
        self.models.push(model);
    }
}

/// Scene text with its malformed model and rig entries removed
fn prune_entries(text: &str) -> String {
    let text = ron_text::edit_field(text, "models", prune_models).unwrap_or_else(|| text.to_string());
    let rigs = ron_text::edit_field(&text, "rigs", |list| {
        ron_text::retain_entries(list, |index, entry| {
            let entry = prune_rig(entry).unwrap_or_else(|| entry.to_string());
            match ron::from_str::<RigDescriptor>(&entry) {
                Ok(_) => Some(entry),
                Err(e) => {
                    log::warn!("Skipping malformed rig #{}: {}", index, e);
                    None
                }
            }
        })
    });
    rigs.unwrap_or(text)
}

/// Error loading a scene
#[derive(Debug)]
pub enum SceneLoadError {
    /// IO error (file not found, permission denied, etc.)
    Io(io::Error),
    /// Parse error (invalid RON syntax)
    Parse(ron::error::SpannedError),
}

impl From<io::Error> for SceneLoadError {
    fn from(e: io::Error) -> Self {
        SceneLoadError::Io(e)
    }
}

impl From<ron::error::SpannedError> for SceneLoadError {
    fn from(e: ron::error::SpannedError) -> Self {
        SceneLoadError::Parse(e)
    }
}

impl std::fmt::Display for SceneLoadError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            SceneLoadError::Io(e) => write!(f, "IO error: {}", e),
            SceneLoadError::Parse(e) => write!(f, "Parse error: {}", e),
        }
    }
}

impl std::error::Error for SceneLoadError {}

/// Error saving a scene
#[derive(Debug)]
pub enum SceneSaveError {
    /// IO error (permission denied, disk full, etc.)
    Io(io::Error),
    /// Serialization error
    Serialize(ron::Error),
}

impl From<io::Error> for SceneSaveError {
    fn from(e: io::Error) -> Self {
        SceneSaveError::Io(e)
    }
}

impl From<ron::Error> for SceneSaveError {
    fn from(e: ron::Error) -> Self {
        SceneSaveError::Serialize(e)
    }
}

impl std::fmt::Display for SceneSaveError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            SceneSaveError::Io(e) => write!(f, "IO error: {}", e),
            SceneSaveError::Serialize(e) => write!(f, "Serialize error: {}", e),
        }
    }
}

impl std::error::Error for SceneSaveError {}
