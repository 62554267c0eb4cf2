//! Model loading
//!
//! Resolves [`ModelDescriptor`]s to [`LoadedVisual`]s. The [`ModelLoader`]
//! trait is the loading contract; [`FileModelLoader`] implements it for glTF,
//! GLB and Wavefront OBJ files under an asset root.
//!
//! A scene's models are loaded as a fan-out: one worker thread per
//! descriptor, joined by a single barrier before composition starts. A
//! failed load is logged and the model is left out.

use std::fs;
use std::path::{Path, PathBuf};
use std::sync::mpsc::channel;
use std::sync::Arc;
use std::thread;

use gltf::animation::util::ReadOutputs;
use gltf::animation::Interpolation;
use tactile_math::{Aabb, Quat, Vec3};

use crate::animation::{AnimationChannel, AnimationClip, ChannelValues};
use crate::asset_error::AssetError;
use crate::descriptor::{ModelDescriptor, ModelFormat, RigDescriptor};
use crate::visual::{LoadedVisual, MeshPart, ModelNode, NodePose};

/// Loading contract for model descriptors
pub trait ModelLoader: Send + Sync {
    /// Resolve one descriptor to its geometry
    fn load(&self, descriptor: &ModelDescriptor) -> Result<LoadedVisual, AssetError>;
}

/// A descriptor together with its loaded visual
#[derive(Clone, Debug)]
pub struct LoadedModel {
    pub descriptor: ModelDescriptor,
    pub visual: Arc<LoadedVisual>,
}

/// A rig descriptor with the elements that loaded
#[derive(Clone, Debug)]
pub struct LoadedRig {
    pub descriptor: RigDescriptor,
    pub elements: Vec<LoadedModel>,
}

/// Everything a scene needs from disk
#[derive(Clone, Debug, Default)]
pub struct SceneAssets {
    pub models: Vec<LoadedModel>,
    pub rigs: Vec<LoadedRig>,
}

/// Loads model files relative to an asset root directory
#[derive(Clone, Debug)]
pub struct FileModelLoader {
    root: PathBuf,
}

impl FileModelLoader {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Full path of a descriptor's source
    pub fn resolve(&self, source: &str) -> PathBuf {
        self.root.join(source.trim_start_matches('/'))
    }
}

impl ModelLoader for FileModelLoader {
    fn load(&self, descriptor: &ModelDescriptor) -> Result<LoadedVisual, AssetError> {
        let path = self.resolve(&descriptor.source);
        let format = descriptor
            .resolved_format()
            .ok_or_else(|| AssetError::UnsupportedFormat(descriptor.source.clone()))?;

        let visual = match format {
            ModelFormat::Gltf | ModelFormat::Glb => load_gltf(&path)?,
            ModelFormat::Obj => load_obj(&path)?,
            ModelFormat::Fbx => return Err(AssetError::UnsupportedFormat("fbx".to_string())),
        };

        if visual.parts.is_empty() {
            return Err(AssetError::Empty(path.display().to_string()));
        }
        Ok(visual)
    }
}

/// Load a glTF or GLB file: node hierarchy, primitive bounds and clips
///
/// Images are not decoded; only buffers are read.
pub fn load_gltf(path: &Path) -> Result<LoadedVisual, AssetError> {
    let gltf::Gltf { document, blob } = gltf::Gltf::open(path)?;
    let buffers = gltf::import_buffers(&document, path.parent(), blob)?;

    let mut nodes: Vec<ModelNode> = document
        .nodes()
        .map(|node| {
            let (translation, rotation, scale) = node.transform().decomposed();
            ModelNode {
                name: node.name().unwrap_or_default().to_string(),
                parent: None,
                rest: NodePose {
                    translation: Vec3::from(translation),
                    rotation: Quat::from(rotation),
                    scale: Vec3::from(scale),
                },
            }
        })
        .collect();
    for node in document.nodes() {
        for child in node.children() {
            if let Some(entry) = nodes.get_mut(child.index()) {
                entry.parent = Some(node.index());
            }
        }
    }

    let mut parts = Vec::new();
    for node in document.nodes() {
        let Some(mesh) = node.mesh() else {
            continue;
        };
        let base = mesh.name().or(node.name()).unwrap_or("mesh");
        for (index, primitive) in mesh.primitives().enumerate() {
            let bb = primitive.bounding_box();
            let bounds = Aabb::new(Vec3::from(bb.min), Vec3::from(bb.max));
            parts.push(MeshPart::new(format!("{}#{}", base, index), Some(node.index()), bounds));
        }
    }

    let clips = document
        .animations()
        .enumerate()
        .map(|(index, animation)| {
            let channels = animation
                .channels()
                .filter_map(|channel| {
                    let cubic = channel.sampler().interpolation() == Interpolation::CubicSpline;
                    let reader = channel.reader(|buffer| buffers.get(buffer.index()).map(|data| data.0.as_slice()));
                    let times: Vec<f32> = reader.read_inputs()?.collect();
                    let values = match reader.read_outputs()? {
                        ReadOutputs::Translations(iter) => {
                            ChannelValues::Translation(keyframe_values(iter.map(Vec3::from).collect(), cubic))
                        }
                        ReadOutputs::Rotations(rotations) => ChannelValues::Rotation(keyframe_values(
                            rotations.into_f32().map(|q| Quat::from(q).normalized()).collect(),
                            cubic,
                        )),
                        ReadOutputs::Scales(iter) => {
                            ChannelValues::Scale(keyframe_values(iter.map(Vec3::from).collect(), cubic))
                        }
                        ReadOutputs::MorphTargetWeights(_) => return None,
                    };
                    Some(AnimationChannel {
                        node: channel.target().node().index(),
                        times,
                        values,
                    })
                })
                .collect();
            let name = animation
                .name()
                .map(str::to_string)
                .unwrap_or_else(|| format!("clip{}", index));
            AnimationClip::new(name, channels)
        })
        .collect();

    Ok(LoadedVisual { nodes, parts, clips })
}

/// Cubic-spline samplers store `[in-tangent, value, out-tangent]` per key
fn keyframe_values<T: Copy>(values: Vec<T>, cubic: bool) -> Vec<T> {
    if cubic {
        values.chunks(3).filter_map(|key| key.get(1).copied()).collect()
    } else {
        values
    }
}

/// Load a Wavefront OBJ file as one part per `o`/`g` group
pub fn load_obj(path: &Path) -> Result<LoadedVisual, AssetError> {
    let source = fs::read_to_string(path)?;
    parse_obj(&source)
}

/// Parse OBJ text into per-group vertex bounds
pub fn parse_obj(source: &str) -> Result<LoadedVisual, AssetError> {
    let mut parts = Vec::new();
    let mut group = String::from("default");
    let mut bounds: Option<Aabb> = None;

    let mut flush = |group: &str, bounds: &mut Option<Aabb>| {
        if let Some(b) = bounds.take() {
            parts.push(MeshPart::new(group, None, b));
        }
    };

    for (line_no, line) in source.lines().enumerate() {
        let mut tokens = line.split_whitespace();
        match tokens.next() {
            Some("v") => {
                let mut coords = [0.0f32; 3];
                for coord in coords.iter_mut() {
                    let token = tokens
                        .next()
                        .ok_or_else(|| AssetError::Parse(format!("line {}: vertex needs 3 coordinates", line_no + 1)))?;
                    *coord = token
                        .parse()
                        .map_err(|e| AssetError::Parse(format!("line {}: {}", line_no + 1, e)))?;
                }
                let p = Vec3::from(coords);
                bounds = Some(match bounds {
                    Some(b) => b.union(&Aabb::new(p, p)),
                    None => Aabb::new(p, p),
                });
            }
            Some("o") | Some("g") => {
                flush(&group, &mut bounds);
                let name: Vec<&str> = tokens.collect();
                group = if name.is_empty() {
                    format!("group{}", line_no + 1)
                } else {
                    name.join(" ")
                };
            }
            _ => {}
        }
    }
    flush(&group, &mut bounds);

    Ok(LoadedVisual {
        nodes: Vec::new(),
        parts,
        clips: Vec::new(),
    })
}

/// Which slot of [`SceneAssets`] a load result fills
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord)]
enum Slot {
    Model(usize),
    RigElement(usize, usize),
}

/// Load every model and rig element concurrently
///
/// Spawns one thread per descriptor and waits for all of them. Results keep
/// declaration order; failures are logged and omitted.
pub fn load_scene_assets(
    loader: &dyn ModelLoader,
    models: &[ModelDescriptor],
    rigs: &[RigDescriptor],
) -> SceneAssets {
    let mut jobs: Vec<(Slot, &ModelDescriptor)> = models
        .iter()
        .enumerate()
        .map(|(i, d)| (Slot::Model(i), d))
        .collect();
    for (r, rig) in rigs.iter().enumerate() {
        jobs.extend(rig.elements.iter().enumerate().map(|(e, d)| (Slot::RigElement(r, e), d)));
    }

    let (tx, rx) = channel();
    thread::scope(|scope| {
        for (slot, descriptor) in &jobs {
            let tx = tx.clone();
            let (slot, descriptor) = (*slot, *descriptor);
            scope.spawn(move || {
                let result = loader.load(descriptor);
                // Receiver outlives the scope
                let _ = tx.send((slot, result));
            });
        }
    });
    drop(tx);

    let mut results: Vec<(Slot, Result<LoadedVisual, AssetError>)> = rx.into_iter().collect();
    results.sort_by_key(|(slot, _)| *slot);

    let mut assets = SceneAssets {
        models: Vec::new(),
        rigs: rigs
            .iter()
            .map(|descriptor| LoadedRig {
                descriptor: descriptor.clone(),
                elements: Vec::new(),
            })
            .collect(),
    };

    for (slot, result) in results {
        let descriptor = match slot {
            Slot::Model(i) => &models[i],
            Slot::RigElement(r, e) => &rigs[r].elements[e],
        };
        let visual = match result {
            Ok(visual) => visual,
            Err(e) => {
                log::warn!("Failed to load model '{}' from {}: {}", descriptor.id, descriptor.source, e);
                continue;
            }
        };
        log::info!("Loaded model '{}' ({} parts, {} clips)", descriptor.id, visual.parts.len(), visual.clips.len());
        let loaded = LoadedModel {
            descriptor: descriptor.clone(),
            visual: Arc::new(visual),
        };
        match slot {
            Slot::Model(_) => assets.models.push(loaded),
            Slot::RigElement(r, _) => assets.rigs[r].elements.push(loaded),
        }
    }

    assets
}
