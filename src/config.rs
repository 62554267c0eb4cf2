//! Application configuration
//!
//! Configuration is loaded from multiple sources with the following priority (lowest to highest):
//! 1. `config/default.toml` (version controlled)
//! 2. `config/user.toml` (gitignored, user overrides)
//! 3. Environment variables (`TCT_SECTION__KEY`)

use figment::{Figment, providers::{Format, Toml, Env}};
use serde::{Serialize, Deserialize};
use std::path::Path;

use tactile_core::{Easing, TransitionSettings, TransitionStep, WaveSettings};

/// Main application configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AppConfig {
    /// Window configuration
    #[serde(default)]
    pub window: WindowConfig,
    /// Orbit camera configuration
    #[serde(default)]
    pub camera: CameraConfig,
    /// Which scene to show and where its data lives
    #[serde(default)]
    pub scene: SceneConfig,
    /// Local participant
    #[serde(default)]
    pub session: SessionConfig,
    /// Synchronization channel
    #[serde(default)]
    pub sync: SyncConfig,
    /// Grid transition overrides
    #[serde(default)]
    pub transition: TransitionConfig,
    /// Idle animation and frame timing
    #[serde(default)]
    pub animation: AnimationConfig,
    /// Rendering configuration
    #[serde(default)]
    pub rendering: RenderingConfig,
    /// Debug configuration
    #[serde(default)]
    pub debug: DebugConfig,
}

impl AppConfig {
    /// Load configuration from default locations
    ///
    /// Priority (lowest to highest):
    /// 1. `config/default.toml`
    /// 2. `config/user.toml`
    /// 3. Environment variables (`TCT_*`)
    pub fn load() -> Result<Self, ConfigError> {
        Self::load_from("config")
    }

    /// Load configuration from a specific config directory
    pub fn load_from<P: AsRef<Path>>(config_dir: P) -> Result<Self, ConfigError> {
        let config_dir = config_dir.as_ref();
        let default_path = config_dir.join("default.toml");
        let user_path = config_dir.join("user.toml");

        let mut figment = Figment::new();

        if default_path.exists() {
            figment = figment.merge(Toml::file(&default_path));
        }

        // Load user config (optional)
        if user_path.exists() {
            figment = figment.merge(Toml::file(&user_path));
        }

        // Environment variables override everything
        // TCT_SESSION__IDENTITY=bob -> session.identity = "bob"
        figment = figment.merge(Env::prefixed("TCT_").split("__"));

        figment.extract().map_err(ConfigError::from)
    }
}

/// Window configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct WindowConfig {
    /// Window title
    pub title: String,
    /// Window width in pixels
    pub width: u32,
    /// Window height in pixels
    pub height: u32,
    /// Start in fullscreen mode
    pub fullscreen: bool,
    /// Enable VSync
    pub vsync: bool,
}

impl Default for WindowConfig {
    fn default() -> Self {
        Self {
            title: "Tactile".to_string(),
            width: 1280,
            height: 720,
            fullscreen: false,
            vsync: true,
        }
    }
}

/// Orbit camera configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct CameraConfig {
    /// Closest orbit distance
    pub min_distance: f32,
    /// Farthest orbit distance
    pub max_distance: f32,
    /// Fraction of motion applied per frame; 0 disables damping
    pub damping: f32,
    /// Orbit speed in radians per pixel dragged
    pub rotate_sensitivity: f32,
}

impl Default for CameraConfig {
    fn default() -> Self {
        Self {
            min_distance: 10.0,
            max_distance: 50.0,
            damping: 0.05,
            rotate_sensitivity: 0.005,
        }
    }
}

/// Scene selection and data files
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SceneConfig {
    /// Scene file (RON)
    pub path: String,
    /// Directory model sources are relative to
    pub asset_root: String,
    /// Participants file (JSON)
    pub participants: String,
    /// Grid pattern file (JSON)
    pub pattern: String,
}

impl Default for SceneConfig {
    fn default() -> Self {
        Self {
            path: "assets/scenes/cube_grid.ron".to_string(),
            asset_root: "assets".to_string(),
            participants: "assets/json/participants.json".to_string(),
            pattern: "assets/json/grid.json".to_string(),
        }
    }
}

/// Local participant configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct SessionConfig {
    /// Act as this participant instead of the one named in the participants file
    pub identity: Option<String>,
}

/// Synchronization channel configuration
///
/// The backing store is in-process, so only participants sharing one process
/// mirror each other's presses.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SyncConfig {
    /// Publish and mirror presses
    pub enabled: bool,
    /// Channel key in the realtime store
    pub channel: String,
}

impl Default for SyncConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            channel: tactile_sync::DEFAULT_CHANNEL.to_string(),
        }
    }
}

/// Grid transition overrides
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct TransitionConfig {
    /// Replace the scene file's grid transition with the one below
    pub override_scene: bool,
    pub step: TransitionStep,
    pub easing: Easing,
}

impl Default for TransitionConfig {
    fn default() -> Self {
        let settings = TransitionSettings::default();
        Self {
            override_scene: false,
            step: settings.step,
            easing: settings.easing,
        }
    }
}

impl TransitionConfig {
    /// Settings to use for the grid, given the scene's own
    ///
    /// A step that could never finish falls back to the default step.
    pub fn resolve(&self, scene: TransitionSettings) -> TransitionSettings {
        let settings = if self.override_scene {
            TransitionSettings {
                step: self.step,
                easing: self.easing,
            }
        } else {
            scene
        };
        settings.validated()
    }
}

/// Idle animation and frame timing
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct AnimationConfig {
    /// Idle wave of the grid
    pub wave: WaveSettings,
    /// Longest frame step in seconds
    pub max_frame_dt: f32,
}

impl Default for AnimationConfig {
    fn default() -> Self {
        Self {
            wave: WaveSettings::default(),
            max_frame_dt: 0.1,
        }
    }
}

/// Rendering configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct RenderingConfig {
    /// Clear color [r, g, b]; the scene's background when absent
    pub clear_color: Option<[f32; 3]>,
    /// Upper bound on particles per fire emitter
    pub max_particles: u32,
}

impl Default for RenderingConfig {
    fn default() -> Self {
        Self {
            clear_color: None,
            max_particles: 20_000,
        }
    }
}

/// Debug configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct DebugConfig {
    /// Log level (error, warn, info, debug, trace) when RUST_LOG is unset
    pub log_level: String,
}

impl Default for DebugConfig {
    fn default() -> Self {
        Self {
            log_level: "info".to_string(),
        }
    }
}

/// Configuration error
#[derive(Debug)]
pub struct ConfigError {
    message: String,
}

impl From<figment::Error> for ConfigError {
    fn from(e: figment::Error) -> Self {
        ConfigError {
            message: e.to_string(),
        }
    }
}

impl std::fmt::Display for ConfigError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "Configuration error: {}", self.message)
    }
}

impl std::error::Error for ConfigError {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = AppConfig::default();
        assert_eq!(config.window.width, 1280);
        assert_eq!(config.camera.min_distance, 10.0);
        assert_eq!(config.camera.max_distance, 50.0);
        assert_eq!(config.sync.channel, "buttons");
        assert!(config.session.identity.is_none());
    }

    #[test]
    fn test_config_serialization() {
        let config = AppConfig::default();
        let toml = toml::to_string(&config).unwrap();
        assert!(toml.contains("title"));
        assert!(toml.contains("max_particles"));
        assert!(toml.contains("phase_offset"));
    }

    #[test]
    fn test_partial_sections_fill_defaults() {
        let config: AppConfig = toml::from_str("[window]\ntitle = \"Partial\"\n").unwrap();
        assert_eq!(config.window.title, "Partial");
        assert_eq!(config.window.height, 720);
        assert_eq!(config.rendering.max_particles, 20_000);
    }

    #[test]
    fn test_transition_override() {
        let scene = TransitionSettings {
            step: TransitionStep::PerFrame(0.1),
            easing: Easing::Linear,
        };
        let mut config = TransitionConfig::default();
        assert_eq!(config.resolve(scene), scene);

        config.override_scene = true;
        config.easing = Easing::BackOut;
        let resolved = config.resolve(scene);
        assert_eq!(resolved.easing, Easing::BackOut);
        assert_eq!(resolved.step, TransitionStep::PerFrame(0.03));
    }

    #[test]
    fn test_transition_override_rejects_stalled_step() {
        let config: AppConfig = toml::from_str(
            "[transition]\noverride_scene = true\nstep = { PerSecond = 0.0 }\neasing = \"linear\"\n",
        )
        .unwrap();
        let resolved = config.transition.resolve(TransitionSettings::default());
        assert_eq!(resolved.step, TransitionStep::default());
        assert_eq!(resolved.easing, Easing::Linear);
    }

    #[test]
    fn test_shipped_default_toml_parses() {
        let path = Path::new(env!("CARGO_MANIFEST_DIR")).join("config/default.toml");
        let contents = std::fs::read_to_string(path).unwrap();
        let config: AppConfig = toml::from_str(&contents).unwrap();
        assert!(config.sync.enabled);
        assert_eq!(config.sync.channel, "buttons");
        assert_eq!(config.transition.easing, Easing::BackOut);
    }
}
