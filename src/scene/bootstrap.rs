//! Loading and composing the configured scene

use std::fmt;

use tactile_core::{
    compose_scene, load_scene_assets, ComposeOptions, FileModelLoader, GridPattern, SceneFile,
    SceneLoadError, SessionContext, World,
};

use crate::config::AppConfig;

/// Identity used when no participants file can be read
const FALLBACK_IDENTITY: &str = "local";

/// A composed scene, ready to run
pub struct LoadedScene {
    pub scene: SceneFile,
    pub session: SessionContext,
    pub world: World,
}

/// Errors that prevent a scene from starting at all
#[derive(Debug)]
pub enum BootstrapError {
    /// The scene file is missing or malformed
    Scene { path: String, source: SceneLoadError },
}

impl fmt::Display for BootstrapError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            BootstrapError::Scene { path, source } => write!(f, "Failed to load scene '{}': {}", path, source),
        }
    }
}

impl std::error::Error for BootstrapError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            BootstrapError::Scene { source, .. } => Some(source),
        }
    }
}

/// Read every input of the configured scene and compose its world
///
/// Only the scene file is required. A missing participants file leaves a
/// lone local participant; a bad pattern falls back to an all-button grid;
/// models that fail to load are left out.
pub fn bootstrap(config: &AppConfig) -> Result<LoadedScene, BootstrapError> {
    let mut scene = SceneFile::load(&config.scene.path).map_err(|source| BootstrapError::Scene {
        path: config.scene.path.clone(),
        source,
    })?;
    scene.profile.transition = config.transition.resolve(scene.profile.transition);
    log::info!(
        "Loaded scene '{}' ({} models, {} rigs)",
        scene.name,
        scene.models.len(),
        scene.rigs.len()
    );

    let session = SessionContext::load(&config.scene.participants)
        .unwrap_or_else(|e| {
            log::warn!(
                "Failed to read participants from '{}': {}. Running alone.",
                config.scene.participants,
                e
            );
            SessionContext::new(FALLBACK_IDENTITY, "Local", Vec::new())
        })
        .with_identity_override(config.session.identity.as_deref());
    log::info!("Participating as '{}' with {} peers", session.identity(), session.peers().len());

    let pattern = match &scene.profile.grid {
        Some(grid) => GridPattern::load_or_solid(&config.scene.pattern, grid.rows, grid.cols),
        None => GridPattern::solid(0, 0),
    };

    let loader = FileModelLoader::new(&config.scene.asset_root);
    let assets = load_scene_assets(&loader, &scene.models, &scene.rigs);

    let options = ComposeOptions {
        max_particles: config.rendering.max_particles as usize,
        autoplay_props: true,
    };
    let world = compose_scene(&scene, &assets, &session, &pattern, &options);

    Ok(LoadedScene { scene, session, world })
}
