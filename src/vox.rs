//! MagicaVoxel `.vox` adapter: decodes the container with `dot_vox` and rebuilds its models
//! and scene nodes as a [`SceneGraph`].

use std::path::Path;

use anyhow::Context as _;
use glam::IVec3;

use crate::foundation::error::{IsovoxError, IsovoxResult};
use crate::geometry::rotation::Rotation;
use crate::scene::graph::{ChildRef, GroupRef, SceneGraph, ShapeRef, TransformRef, VoxelFrame};

/// Read and convert a `.vox` file.
#[tracing::instrument]
pub fn load_scene(path: &Path) -> IsovoxResult<SceneGraph> {
    let bytes = std::fs::read(path).with_context(|| format!("read vox '{}'", path.display()))?;
    let data = dot_vox::load_bytes(&bytes).map_err(|e| {
        IsovoxError::validation(format!("failed to parse '{}': {e}", path.display()))
    })?;
    let graph = scene_from_dot_vox(&data)?;
    tracing::info!(
        frames = graph.frames.len(),
        transforms = graph.transforms.len(),
        roots = graph.roots.len(),
        "vox scene loaded"
    );
    Ok(graph)
}

/// Per-kind index of a container scene node.
#[derive(Clone, Copy, Debug)]
enum Slot {
    Transform(usize),
    Group(usize),
    Shape(usize),
}

/// Convert decoded container data.
///
/// The container's root transform and root group are unwrapped so the roots are the
/// transforms directly under them. Data without a scene graph gets one untransformed root
/// per model.
pub fn scene_from_dot_vox(data: &dot_vox::DotVoxData) -> IsovoxResult<SceneGraph> {
    let mut graph = SceneGraph {
        frames: data
            .models
            .iter()
            .enumerate()
            .map(|(i, m)| frame_from_model(i, m))
            .collect::<IsovoxResult<_>>()?,
        palette: data.palette.iter().map(|c| [c.r, c.g, c.b, c.a]).collect(),
        ..SceneGraph::default()
    };

    if data.scenes.is_empty() {
        for frame in 0..graph.frames.len() {
            graph.shapes.push(ShapeRef { frame });
            graph.transforms.push(TransformRef {
                name: String::new(),
                translation: IVec3::ZERO,
                rotation: Rotation::IDENTITY,
                child: ChildRef::Shape(frame),
            });
            graph.roots.push(frame);
        }
        return Ok(graph);
    }

    let mut counts = [0usize; 3];
    let slots: Vec<Slot> = data
        .scenes
        .iter()
        .map(|node| {
            let (kind, make): (usize, fn(usize) -> Slot) = match node {
                dot_vox::SceneNode::Transform { .. } => (0, Slot::Transform),
                dot_vox::SceneNode::Group { .. } => (1, Slot::Group),
                dot_vox::SceneNode::Shape { .. } => (2, Slot::Shape),
            };
            counts[kind] += 1;
            make(counts[kind] - 1)
        })
        .collect();
    let slot = |index: u32| -> IsovoxResult<Slot> {
        usize::try_from(index)
            .ok()
            .and_then(|i| slots.get(i).copied())
            .ok_or_else(|| IsovoxError::scene(format!("no scene node with index {index}")))
    };

    for (index, node) in data.scenes.iter().enumerate() {
        match node {
            dot_vox::SceneNode::Transform { attributes, frames, child, .. } => {
                let child = match slot(*child)? {
                    Slot::Group(g) => ChildRef::Group(g),
                    Slot::Shape(s) => ChildRef::Shape(s),
                    Slot::Transform(_) => {
                        return Err(IsovoxError::scene(format!(
                            "transform node {index} has a transform as its child"
                        )));
                    }
                };
                let frame = frames.first().map(|f| &f.attributes);
                graph.transforms.push(TransformRef {
                    name: attributes.get("_name").cloned().unwrap_or_default(),
                    translation: match frame.and_then(|a| a.get("_t")) {
                        Some(t) => parse_translation(t, index)?,
                        None => IVec3::ZERO,
                    },
                    rotation: match frame.and_then(|a| a.get("_r")) {
                        Some(r) => parse_rotation(r, index)?,
                        None => Rotation::IDENTITY,
                    },
                    child,
                });
            }
            dot_vox::SceneNode::Group { children, .. } => {
                let mut ids = Vec::with_capacity(children.len());
                for &child in children {
                    match slot(child)? {
                        Slot::Transform(t) => ids.push(t),
                        _ => {
                            return Err(IsovoxError::scene(format!(
                                "group node {index} has a non-transform child {child}"
                            )));
                        }
                    }
                }
                graph.groups.push(GroupRef { children: ids });
            }
            dot_vox::SceneNode::Shape { models, .. } => {
                let model = models.first().ok_or_else(|| {
                    IsovoxError::scene(format!("shape node {index} references no model"))
                })?;
                let frame = usize::try_from(model.model_id)
                    .ok()
                    .filter(|&f| f < graph.frames.len())
                    .ok_or_else(|| {
                        IsovoxError::scene(format!(
                            "shape node {index} references missing model {}",
                            model.model_id
                        ))
                    })?;
                graph.shapes.push(ShapeRef { frame });
            }
        }
    }

    graph.roots = match slot(0)? {
        Slot::Transform(t) => match graph.transform(t)?.child {
            ChildRef::Group(g) => graph.group(g)?.children.clone(),
            ChildRef::Shape(_) => vec![t],
        },
        Slot::Group(g) => graph.group(g)?.children.clone(),
        Slot::Shape(_) => {
            return Err(IsovoxError::scene("scene root is a bare shape node"));
        }
    };
    Ok(graph)
}

fn frame_from_model(index: usize, model: &dot_vox::Model) -> IsovoxResult<VoxelFrame> {
    let dim = |v: u32| {
        i32::try_from(v).map_err(|_| {
            IsovoxError::validation(format!("model {index} dimension {v} is out of range"))
        })
    };
    let size = IVec3::new(dim(model.size.x)?, dim(model.size.y)?, dim(model.size.z)?);
    let mut frame = VoxelFrame::new(size)?;
    for v in &model.voxels {
        frame.set(IVec3::new(v.x.into(), v.y.into(), v.z.into()), v.i)?;
    }
    Ok(frame)
}

fn parse_translation(s: &str, node: usize) -> IsovoxResult<IVec3> {
    let parts = s
        .split_whitespace()
        .map(str::parse::<i32>)
        .collect::<Result<Vec<_>, _>>()
        .ok()
        .filter(|p| p.len() == 3)
        .ok_or_else(|| {
            IsovoxError::validation(format!("transform node {node} has bad translation '{s}'"))
        })?;
    Ok(IVec3::new(parts[0], parts[1], parts[2]))
}

fn parse_rotation(s: &str, node: usize) -> IsovoxResult<Rotation> {
    let byte = s.trim().parse::<u8>().map_err(|_| {
        IsovoxError::validation(format!("transform node {node} has bad rotation '{s}'"))
    })?;
    Rotation::from_byte(byte)
}

#[cfg(test)]
#[path = "../tests/unit/vox/load.rs"]
mod tests;
