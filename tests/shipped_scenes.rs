//! The scenes under assets/ bootstrap into the worlds they describe

use tactile::config::AppConfig;
use tactile::scene::bootstrap;

fn config_for(scene: &str) -> AppConfig {
    let mut config = AppConfig::default();
    config.scene.path = format!("assets/scenes/{}.ron", scene);
    config
}

#[test]
fn test_cube_grid() {
    let loaded = bootstrap(&config_for("cube_grid")).unwrap();
    assert_eq!(loaded.session.identity(), "alice");

    // Checkerboard of six buttons and six mirrors
    assert_eq!(loaded.world.object_count(), 12);
    let buttons = loaded.world.objects().filter(|(_, o)| o.is_clickable()).count();
    assert_eq!(buttons, 6);
    assert!(loaded.world.props().is_empty());
}

#[test]
fn test_model_showcase() {
    let loaded = bootstrap(&config_for("model_showcase")).unwrap();
    assert!(loaded.scene.profile.sway);
    assert!(loaded.scene.profile.grid.is_none());

    assert_eq!(loaded.world.object_count(), 1);
    let (_, button) = loaded.world.objects().next().unwrap();
    assert!(button.is_clickable());
    assert!(button.accent().is_some());
    // pedestal, lantern, vase and its reflection
    assert_eq!(loaded.world.props().len(), 4);
}

#[test]
fn test_fruit_bowl() {
    let loaded = bootstrap(&config_for("fruit_bowl")).unwrap();

    assert_eq!(loaded.world.object_count(), 0);
    assert_eq!(loaded.world.emitters().len(), 1);
    assert_eq!(loaded.world.emitters()[0].len(), 4000);
    assert_eq!(loaded.world.rigs().len(), 1);
    assert_eq!(loaded.world.rigs()[0].props().len(), 3);
    assert!(!loaded.world.rigs()[0].is_started());
}

#[test]
fn test_particle_cap() {
    let mut config = config_for("fruit_bowl");
    config.rendering.max_particles = 500;
    let loaded = bootstrap(&config).unwrap();
    assert_eq!(loaded.world.emitters()[0].len(), 500);
}
