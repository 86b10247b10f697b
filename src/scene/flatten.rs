use glam::IVec3;

use crate::foundation::config::Constants;
use crate::foundation::error::{IsovoxError, IsovoxResult};
use crate::geometry::{affine::IntAffine, int_box::IntBox, rotation::Rotation};
use crate::scene::graph::{ChildRef, SceneGraph};
use crate::scene::structure::{ShapeNode, Structure, VolumeType};

/// Transform that centers `local_box` on the origin, rotates it, then moves it to
/// `translation`: `T(translation) * R * T(-center)`.
pub fn shape_transform(local_box: &IntBox, translation: IVec3, rotation: &Rotation) -> IntAffine {
    IntAffine::translate(translation) * rotation.to_affine() * IntAffine::translate(-local_box.center())
}

/// Resolve every root transform of `graph` into a structure.
///
/// Grouped shapes are merged into one structure whose leaves carry the fully composed
/// transform. Roots that resolve to an empty group produce no structure.
#[tracing::instrument(skip(graph, constants), fields(roots = graph.roots.len()))]
pub fn flatten_scene(graph: &SceneGraph, constants: &Constants) -> IsovoxResult<Vec<Structure>> {
    let mut structures = Vec::with_capacity(graph.roots.len());
    let mut visiting = Vec::new();
    for &root in &graph.roots {
        let node = graph.transform(root)?;
        let Some(shape) = resolve(graph, root, &mut visiting)? else {
            tracing::warn!(transform = root, "skipping root transform with an empty group");
            continue;
        };

        let len = shape.target_box.lengths();
        if len.x > constants.max_extent || len.y > constants.max_extent || len.z > constants.max_extent {
            return Err(IsovoxError::scene(format!(
                "structure under transform {root} has extent {}x{}x{}, exceeding {}",
                len.x, len.y, len.z, constants.max_extent
            )));
        }

        let name = format!("structure{}", structures.len());
        let volume_type = VolumeType::from_node_name(&node.name);
        tracing::debug!(%name, ?volume_type, node_name = %node.name, "resolved structure");
        structures.push(Structure::new(name, volume_type, shape));
    }
    Ok(structures)
}

fn resolve(
    graph: &SceneGraph,
    transform_id: usize,
    visiting: &mut Vec<usize>,
) -> IsovoxResult<Option<ShapeNode>> {
    if visiting.contains(&transform_id) {
        return Err(IsovoxError::scene(format!(
            "transform {transform_id} is its own ancestor"
        )));
    }
    visiting.push(transform_id);
    let node = graph.transform(transform_id)?;

    let resolved = match node.child {
        ChildRef::Shape(shape_id) => {
            let frame_id = graph.shape(shape_id)?.frame;
            let size = graph.frame(frame_id)?.size();
            let t = shape_transform(&IntBox::from_size(size), node.translation, &node.rotation);
            Some(ShapeNode::leaf(frame_id, size, t)?)
        }
        ChildRef::Group(group_id) => {
            let mut members = Vec::new();
            for &child in &graph.group(group_id)?.children {
                if let Some(member) = resolve(graph, child, visiting)? {
                    members.push(member);
                }
            }
            match members.iter().map(|m| m.source_box).reduce(|a, b| a.union(&b)) {
                None => None,
                Some(local_box) => {
                    let t = shape_transform(&local_box, node.translation, &node.rotation);
                    let mut leaves = Vec::new();
                    for member in members {
                        compose_into(graph, t, member, &mut leaves)?;
                    }
                    Some(ShapeNode::group(leaves, t, local_box)?)
                }
            }
        }
    };

    visiting.pop();
    Ok(resolved)
}

/// Pre-multiply `parent` into `node`'s leaves and collect them, rebuilding each leaf's
/// bounds from its own frame.
fn compose_into(
    graph: &SceneGraph,
    parent: IntAffine,
    node: ShapeNode,
    out: &mut Vec<ShapeNode>,
) -> IsovoxResult<()> {
    if node.is_group() {
        for child in node.children {
            compose_into(graph, parent, child, out)?;
        }
        return Ok(());
    }
    let frame_id = node.frame.ok_or_else(|| {
        IsovoxError::scene("leaf shape without a voxel frame inside a group")
    })?;
    let size = graph.frame(frame_id)?.size();
    out.push(ShapeNode::leaf(frame_id, size, parent * node.transform)?);
    Ok(())
}

#[cfg(test)]
#[path = "../../tests/unit/scene/flatten.rs"]
mod tests;
