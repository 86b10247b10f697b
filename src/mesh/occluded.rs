use rayon::prelude::*;

use crate::foundation::error::IsovoxResult;
use crate::geometry::{direction::Direction, int_box::IntBox};
use crate::mesh::pool::{MeshBuffer, Quad, box_corners, face_quad};
use crate::mesh::structure_mesh::placed_voxel;
use crate::scene::structure::{ShapeNode, Structure};
use crate::voxels::visibility::{FaceVisibility, VisibleVoxel};
use crate::voxels::world_map::{WorldVisibilityMap, leaf_voxels};

/// Directions whose covered faces can bleed into the fixed isometric view.
pub const OCCLUDED_DIRECTIONS: [Direction; 3] =
    [Direction::MinusX, Direction::MinusY, Direction::PlusZ];

/// Untextured mesh of the frame-edge faces of `structure` that another voxel covers.
///
/// Inside a group only faces on the group's own outer bound count; faces covered by a sibling
/// shape are interior. An empty buffer means there is nothing to repair.
pub fn build_occluded_mesh(
    structure: &Structure,
    frame_voxels: &[Vec<VisibleVoxel>],
    world: &WorldVisibilityMap,
    divisor: f64,
) -> IsovoxResult<MeshBuffer> {
    let bound = structure
        .shape
        .is_group()
        .then_some(structure.shape.source_box);
    let per_leaf = structure
        .shape
        .leaves()
        .par_iter()
        .map(|leaf| leaf_quads(leaf, bound.as_ref(), frame_voxels, world, divisor))
        .collect::<Vec<_>>();

    let mut mesh = MeshBuffer::default();
    for quads in per_leaf {
        mesh.extend(quads?);
    }
    Ok(mesh)
}

fn on_bound(placed: &IntBox, bound: Option<&IntBox>, direction: Direction) -> bool {
    let Some(b) = bound else {
        return true;
    };
    match direction {
        Direction::MinusX => placed.min.x == b.min.x,
        Direction::MinusY => placed.min.y == b.min.y,
        Direction::PlusZ => placed.max.z == b.max.z,
        _ => false,
    }
}

fn leaf_quads(
    leaf: &ShapeNode,
    bound: Option<&IntBox>,
    frame_voxels: &[Vec<VisibleVoxel>],
    world: &WorldVisibilityMap,
    divisor: f64,
) -> IsovoxResult<Vec<Quad>> {
    let mut quads = Vec::new();
    for voxel in leaf_voxels(leaf, frame_voxels)? {
        let (placed, faces) = placed_voxel(leaf, voxel, world)?;
        let corners = box_corners(&placed, divisor);
        for direction in OCCLUDED_DIRECTIONS {
            if faces.get(direction) == FaceVisibility::VisibleAtFrameEdge
                && on_bound(&placed, bound, direction)
                && world.occluded(placed.min, direction)
            {
                quads.push(Quad {
                    corners: face_quad(&corners, direction),
                    texcoord: 0,
                    normal: 0,
                });
            }
        }
    }
    Ok(quads)
}

#[cfg(test)]
#[path = "../../tests/unit/mesh/occluded.rs"]
mod tests;
