//! Scene composition
//!
//! One function turns a scene file, its loaded assets, the session context
//! and the grid pattern into a [`World`]. The scene's [`SceneProfile`]
//! decides what gets built; there is no per-demo composition code.
//!
//! Grid cells take their participants in order: the n-th button cell is
//! addressed to the n-th peer, and so is the n-th mirror cell. Cells with no
//! peer left are omitted.

use tactile_math::{mat4, Vec3};

use crate::descriptor::{ModelKind, PressProfile};
use crate::fire::FireEmitter;
use crate::interactive::{InteractiveObject, ObjectIdentity, Role};
use crate::loader::{LoadedModel, SceneAssets};
use crate::pattern::{CellKind, GridPattern};
use crate::prop::{ModelRig, Prop};
use crate::scene::{GridProfile, SceneFile};
use crate::session::SessionContext;
use crate::transform::Transform3D;
use crate::transition::TransitionSettings;
use crate::visual::{Material, VisualNode};
use crate::world::World;

/// Size of the accent cube placed above model buttons
const ACCENT_SIZE: f32 = 0.25;

/// Tunables that come from application configuration, not scene files
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ComposeOptions {
    /// Upper bound on particles per fire emitter
    pub max_particles: usize,
    /// Start standalone animated props immediately
    pub autoplay_props: bool,
}

impl Default for ComposeOptions {
    fn default() -> Self {
        Self {
            max_particles: 20_000,
            autoplay_props: true,
        }
    }
}

/// Build the world of a scene
pub fn compose_scene(
    scene: &SceneFile,
    assets: &SceneAssets,
    session: &SessionContext,
    pattern: &GridPattern,
    options: &ComposeOptions,
) -> World {
    let mut world = World::new().with_sway(scene.profile.sway);

    if let Some(grid) = &scene.profile.grid {
        compose_grid(&mut world, grid, pattern, session, scene.profile.transition);
    }
    for model in &assets.models {
        compose_model(&mut world, model, session, options);
    }
    for loaded in &assets.rigs {
        let mut rig = ModelRig::new(loaded.descriptor.id.clone(), loaded.descriptor.transform);
        let group = rig.group_matrix();
        for element in &loaded.elements {
            if let ModelKind::ParticleEmitterProp { emitter } = &element.descriptor.kind {
                let origin = mat4::transform_point(group, element.descriptor.transform.position);
                world.add_emitter(FireEmitter::from_settings(emitter, origin, options.max_particles));
            }
            rig.add(Prop::from_loaded(element, element.descriptor.transform));
        }
        world.add_rig(rig);
    }

    log::info!(
        "Composed scene '{}': {} interactive objects, {} props, {} rigs, {} emitters",
        scene.name,
        world.object_count(),
        world.props().len(),
        world.rigs().len(),
        world.emitters().len()
    );
    world
}

/// Place the cube grid
pub fn compose_grid(
    world: &mut World,
    grid: &GridProfile,
    pattern: &GridPattern,
    session: &SessionContext,
    settings: TransitionSettings,
) {
    let peers = session.peers();
    let size = Vec3::splat(grid.cube_size);
    let mut button_index = 0;
    let mut mirror_index = 0;

    for row in 0..grid.rows {
        for col in 0..grid.cols {
            let kind = pattern.cell(row, col);
            let index = match kind {
                CellKind::Button => &mut button_index,
                CellKind::RemoteMirror => &mut mirror_index,
            };
            let Some(peer) = peers.get(*index) else {
                log::warn!("No participant left for grid cell ({}, {}), leaving it empty", row, col);
                continue;
            };
            *index += 1;

            let (x, z) = grid.cell_center(row, col);
            let transform = Transform3D::from_position(Vec3::new(x, grid.rest_height(), z));
            let name = format!("cell_{}_{}", row, col);

            let object = match kind {
                CellKind::Button => {
                    let material = peer.material().unwrap_or(Material::BUTTON);
                    InteractiveObject::new(
                        ObjectIdentity::new(session.identity(), peer.name.clone()).with_title(peer.title.clone()),
                        Role::Button { target: peer.uid.clone() },
                        VisualNode::cube(&name, size, transform).with_material(material),
                        PressProfile::new(grid.rest_height(), grid.button_pressed_height()),
                        settings,
                    )
                }
                CellKind::RemoteMirror => {
                    let material = peer
                        .material()
                        .map(|m| m.with_alpha(Material::GLASS.base_color[3]))
                        .unwrap_or(Material::GLASS);
                    InteractiveObject::new(
                        ObjectIdentity::new(peer.uid.clone(), peer.name.clone()).with_title(peer.title.clone()),
                        Role::RemoteMirror,
                        VisualNode::cube(&name, size, transform).with_material(material),
                        PressProfile::new(grid.rest_height(), grid.mirror_pressed_height()),
                        settings,
                    )
                }
            };
            world.add_object(object.with_cell(row, col));
        }
    }
}

/// Place one standalone model according to its kind
pub fn compose_model(world: &mut World, model: &LoadedModel, session: &SessionContext, options: &ComposeOptions) {
    let descriptor = &model.descriptor;
    match &descriptor.kind {
        ModelKind::StaticProp => {
            world.add_prop(Prop::from_loaded(model, descriptor.transform));
        }
        ModelKind::AnimatedProp { .. } => {
            let mut prop = Prop::from_loaded(model, descriptor.transform);
            if options.autoplay_props {
                prop.play();
            }
            world.add_prop(prop);
        }
        ModelKind::ClickableButton {
            target,
            name,
            press,
            step,
            easing,
            accent_lift,
        } => {
            let settings = TransitionSettings { step: *step, easing: *easing };
            let peer = session.peer(target);
            let display = if name.is_empty() {
                peer.map(|p| p.name.clone()).unwrap_or_else(|| descriptor.id.clone())
            } else {
                name.clone()
            };
            let node = VisualNode::new(model.visual.clone(), descriptor.transform);
            let mut object = InteractiveObject::new(
                ObjectIdentity::new(session.identity(), display),
                Role::Button { target: target.clone() },
                node,
                *press,
                settings,
            );
            if let Some(lift) = accent_lift {
                let material = peer.and_then(|p| p.material()).unwrap_or(Material::ACCENT);
                let mut transform = descriptor.transform;
                transform.scale = Vec3::ONE;
                let accent = VisualNode::cube(&format!("{}_accent", descriptor.id), Vec3::splat(ACCENT_SIZE), transform)
                    .with_material(material);
                object = object.with_accent(accent, *lift);
            }
            world.add_object(object);
        }
        ModelKind::ParticleEmitterProp { emitter } => {
            world.add_prop(Prop::from_loaded(model, descriptor.transform));
            world.add_emitter(FireEmitter::from_settings(emitter, descriptor.transform.position, options.max_particles));
        }
        ModelKind::MirroredProp { axis } => {
            world.add_prop(Prop::from_loaded(model, descriptor.transform));
            let mut mirrored = Prop::from_loaded(model, descriptor.transform.mirrored(*axis));
            mirrored.id = format!("{}_mirrored", descriptor.id);
            world.add_prop(mirrored);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;

    use crate::descriptor::{EmitterSettings, ModelDescriptor};
    use crate::session::Peer;
    use crate::transform::Axis;
    use crate::transition::TransitionStep;
    use crate::visual::LoadedVisual;
    use tactile_math::{Aabb, Easing};

    fn session(peers: usize) -> SessionContext {
        let peers = (0..peers)
            .map(|i| Peer::new(format!("peer{}", i), format!("Peer {}", i)))
            .collect();
        SessionContext::new("me", "Me", peers)
    }

    fn loaded(id: &str, kind: ModelKind) -> LoadedModel {
        LoadedModel {
            descriptor: ModelDescriptor::new(id, format!("{}.obj", id))
                .with_transform(Transform3D::from_position(Vec3::new(2.0, 0.0, 1.0)))
                .with_kind(kind),
            visual: Arc::new(LoadedVisual::single_box(id, Aabb::from_center_size(Vec3::ZERO, Vec3::ONE))),
        }
    }

    fn grid_world(pattern: GridPattern, peers: usize) -> World {
        let mut world = World::new();
        compose_grid(
            &mut world,
            &GridProfile::default(),
            &pattern,
            &session(peers),
            TransitionSettings::default(),
        );
        world
    }

    #[test]
    fn test_solid_grid_all_buttons() {
        let world = grid_world(GridPattern::solid(3, 4), 12);
        assert_eq!(world.object_count(), 12);
        for (_, object) in world.objects() {
            assert!(object.is_clickable());
            assert_eq!(object.uid(), "me");
            assert_eq!(object.visual_offset(), -1.0);
            assert_eq!(object.profile().pressed, -4.0);
        }
    }

    #[test]
    fn test_buttons_and_mirrors_take_peers_in_order() {
        let pattern = GridPattern::from_rows(vec![vec![1, 0, 1, 0], vec![0, 1, 1, 1], vec![1, 1, 1, 1]]);
        let world = grid_world(pattern, 12);

        let mirrors: Vec<&str> = world
            .objects()
            .filter(|(_, o)| !o.is_clickable())
            .map(|(_, o)| o.uid())
            .collect();
        assert_eq!(mirrors, vec!["peer0", "peer1", "peer2"]);

        let targets: Vec<String> = world
            .objects()
            .filter_map(|(_, o)| match o.role() {
                Role::Button { target } => Some(target.clone()),
                Role::RemoteMirror => None,
            })
            .take(2)
            .collect();
        assert_eq!(targets, vec!["peer0", "peer1"]);

        let mirror = world.objects().find(|(_, o)| !o.is_clickable()).unwrap().1;
        assert_eq!(mirror.profile().pressed, -2.0);
        assert!(mirror.node().material.is_transparent());
    }

    #[test]
    fn test_cells_without_peers_are_omitted() {
        let world = grid_world(GridPattern::solid(3, 4), 5);
        assert_eq!(world.object_count(), 5);
    }

    #[test]
    fn test_cells_are_centered() {
        let world = grid_world(GridPattern::solid(3, 4), 12);
        let (_, first) = world.objects().next().unwrap();
        assert_eq!(first.cell(), Some((0, 0)));
        let position = first.node().transform.position;
        assert_eq!(position, Vec3::new(-9.0, -1.0, -6.0));
    }

    #[test]
    fn test_mirrored_prop_places_two() {
        let mut world = World::new();
        let model = loaded("bowl", ModelKind::MirroredProp { axis: Axis::X });
        compose_model(&mut world, &model, &session(0), &ComposeOptions::default());
        assert_eq!(world.props().len(), 2);
        assert_eq!(world.props()[1].id, "bowl_mirrored");
        assert_eq!(world.props()[1].node.transform.position.x, -2.0);
    }

    #[test]
    fn test_emitter_prop_adds_emitter() {
        let mut world = World::new();
        let model = loaded(
            "brazier",
            ModelKind::ParticleEmitterProp {
                emitter: EmitterSettings { particle_count: 50, ..EmitterSettings::default() },
            },
        );
        compose_model(&mut world, &model, &session(0), &ComposeOptions::default());
        assert_eq!(world.props().len(), 1);
        assert_eq!(world.emitters().len(), 1);
        assert_eq!(world.emitters()[0].len(), 50);
        assert_eq!(world.emitters()[0].position(), Vec3::new(2.0, 0.0, 1.0));
    }

    #[test]
    fn test_clickable_model_becomes_button() {
        let mut world = World::new();
        let model = loaded(
            "orange_button",
            ModelKind::ClickableButton {
                target: "peer0".to_string(),
                name: String::new(),
                press: PressProfile::default(),
                step: TransitionStep::PerSecond(20.0),
                easing: Easing::QuadOut,
                accent_lift: Some(0.5),
            },
        );
        compose_model(&mut world, &model, &session(1), &ComposeOptions::default());
        assert_eq!(world.object_count(), 1);
        let (_, button) = world.objects().next().unwrap();
        assert!(button.is_clickable());
        assert_eq!(button.identity().name, "Peer 0");
        assert_eq!(button.visual_offset(), 0.3);
        assert_eq!(button.accent().unwrap().node.transform.position.y, 0.8);
        assert_eq!(world.pick_candidates().len(), 2);
    }

    #[test]
    fn test_animated_prop_autoplay() {
        let mut world = World::new();
        let model = loaded("vulture", ModelKind::AnimatedProp { rotation: None });
        compose_model(&mut world, &model, &session(0), &ComposeOptions::default());
        assert_eq!(world.props().len(), 1);
    }

    #[test]
    fn test_compose_scene_with_rig() {
        let mut scene = SceneFile::new("fruit_bowl");
        scene.profile.grid = None;
        let rig = crate::descriptor::RigDescriptor {
            id: "fruits".to_string(),
            transform: Transform3D::from_position(Vec3::new(0.0, 1.0, 0.0)),
            elements: Vec::new(),
        };
        let assets = SceneAssets {
            models: vec![loaded("bowl", ModelKind::StaticProp)],
            rigs: vec![crate::loader::LoadedRig {
                descriptor: rig,
                elements: vec![
                    loaded("mango", ModelKind::AnimatedProp { rotation: None }),
                    loaded(
                        "fire",
                        ModelKind::ParticleEmitterProp {
                            emitter: EmitterSettings { particle_count: 10, ..EmitterSettings::default() },
                        },
                    ),
                ],
            }],
        };
        let world = compose_scene(&scene, &assets, &session(0), &GridPattern::solid(0, 0), &ComposeOptions::default());
        assert_eq!(world.object_count(), 0);
        assert_eq!(world.props().len(), 1);
        assert_eq!(world.rigs()[0].props().len(), 2);
        assert!(!world.rigs()[0].is_started());
        assert_eq!(world.emitters()[0].position(), Vec3::new(2.0, 1.0, 1.0));
    }
}
