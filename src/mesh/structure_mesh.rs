use rayon::prelude::*;

use crate::foundation::error::{IsovoxError, IsovoxResult};
use crate::geometry::{direction::Direction, int_box::IntBox};
use crate::mesh::pool::{MeshBuffer, Quad, box_corners, face_quad, normal_number};
use crate::mesh::texture::PaletteTexture;
use crate::scene::structure::{ShapeNode, Structure};
use crate::voxels::visibility::{FaceVisibilities, FaceVisibility, VisibleVoxel};
use crate::voxels::world_map::{WorldVisibilityMap, leaf_voxels};

/// Settings shared by every structure mesh of a run.
#[derive(Clone, Copy, Debug)]
pub struct StructureMeshSettings {
    /// Cartesian units per world unit.
    pub divisor: f64,
    /// Drop frame-edge `-Z` faces whose neighbor would be below `z = 0`.
    pub cull_ground_faces: bool,
}

/// Transformed unit box of `voxel` and its world-facing visibility from the scene map.
pub(crate) fn placed_voxel(
    leaf: &ShapeNode,
    voxel: &VisibleVoxel,
    world: &WorldVisibilityMap,
) -> IsovoxResult<(IntBox, FaceVisibilities)> {
    let placed = voxel.local_box().transformed(&leaf.transform);
    let faces = world.get(placed.min).copied().ok_or_else(|| {
        IsovoxError::mesh(format!(
            "voxel at {:?} is missing from the world visibility map",
            placed.min
        ))
    })?;
    Ok((placed, faces))
}

/// Textured mesh of every face of `structure` that is not covered by another voxel.
///
/// Leaf shapes are emitted in parallel and merged into the shared vertex pool in leaf
/// order, so the output does not depend on scheduling.
pub fn build_structure_mesh(
    structure: &Structure,
    frame_voxels: &[Vec<VisibleVoxel>],
    world: &WorldVisibilityMap,
    texture: &PaletteTexture,
    settings: StructureMeshSettings,
) -> IsovoxResult<MeshBuffer> {
    let per_leaf = structure
        .shape
        .leaves()
        .par_iter()
        .map(|leaf| leaf_quads(leaf, frame_voxels, world, texture, settings))
        .collect::<Vec<_>>();

    let mut mesh = MeshBuffer::default();
    for quads in per_leaf {
        mesh.extend(quads?);
    }
    Ok(mesh)
}

fn leaf_quads(
    leaf: &ShapeNode,
    frame_voxels: &[Vec<VisibleVoxel>],
    world: &WorldVisibilityMap,
    texture: &PaletteTexture,
    settings: StructureMeshSettings,
) -> IsovoxResult<Vec<Quad>> {
    let mut quads = Vec::new();
    for voxel in leaf_voxels(leaf, frame_voxels)? {
        let (placed, faces) = placed_voxel(leaf, voxel, world)?;
        let texcoord = texture.texcoord_number(voxel.color)?;
        let corners = box_corners(&placed, settings.divisor);
        let min = placed.min;

        for direction in Direction::ALL {
            let emit = match faces.get(direction) {
                FaceVisibility::Hidden => false,
                FaceVisibility::Visible => true,
                FaceVisibility::VisibleAtFrameEdge => {
                    let below_ground = settings.cull_ground_faces
                        && direction == Direction::MinusZ
                        && min.z - 1 < 0;
                    !below_ground && !world.occluded(min, direction)
                }
            };
            if emit {
                quads.push(Quad {
                    corners: face_quad(&corners, direction),
                    texcoord,
                    normal: normal_number(direction),
                });
            }
        }
    }
    Ok(quads)
}

#[cfg(test)]
#[path = "../../tests/unit/mesh/structure_mesh.rs"]
mod tests;
