//! Scene-wide map from transformed voxel corner to world-facing face visibility.
//!
//! Filled once in parallel, then read-only while meshes are emitted. Emission must not start
//! before [`WorldVisibilityMap::populate`] returns.

use std::collections::HashMap;

use glam::IVec3;
use rayon::prelude::*;

use crate::foundation::error::{IsovoxError, IsovoxResult};
use crate::geometry::direction::Direction;
use crate::scene::structure::{ShapeNode, Structure};
use crate::voxels::visibility::{FaceVisibilities, VisibleVoxel};

/// World-facing face visibility keyed by each voxel's transformed minimum corner.
#[derive(Clone, Debug, Default)]
pub struct WorldVisibilityMap {
    entries: HashMap<IVec3, FaceVisibilities>,
}

impl WorldVisibilityMap {
    /// Insert every retained voxel of every structure.
    ///
    /// Structures and their leaf shapes are processed in parallel; results merge in scene
    /// order, so a key written twice keeps the later shape's entry.
    #[tracing::instrument(skip_all, fields(structures = structures.len()))]
    pub fn populate(
        structures: &[Structure],
        frame_voxels: &[Vec<VisibleVoxel>],
    ) -> IsovoxResult<Self> {
        let started = std::time::Instant::now();
        let per_structure = structures
            .par_iter()
            .map(|s| {
                s.shape
                    .leaves()
                    .par_iter()
                    .map(|leaf| shape_entries(leaf, frame_voxels))
                    .collect::<Vec<_>>()
            })
            .collect::<Vec<_>>();

        let mut map = Self::default();
        for shapes in per_structure {
            for entries in shapes {
                map.entries.extend(entries?);
            }
        }
        tracing::info!(
            elapsed_ms = started.elapsed().as_millis() as u64,
            entries = map.len(),
            "world visibility map populated"
        );
        Ok(map)
    }

    /// Store `faces` for the voxel at `min`, replacing any earlier entry.
    pub fn insert(&mut self, min: IVec3, faces: FaceVisibilities) {
        self.entries.insert(min, faces);
    }

    /// Faces recorded for the voxel at `min`.
    pub fn get(&self, min: IVec3) -> Option<&FaceVisibilities> {
        self.entries.get(&min)
    }

    /// Whether a voxel was recorded at `min`.
    pub fn contains(&self, min: IVec3) -> bool {
        self.entries.contains_key(&min)
    }

    /// Whether another voxel sits right next to `min` in `direction`.
    pub fn occluded(&self, min: IVec3, direction: Direction) -> bool {
        self.contains(min + direction.unit())
    }

    /// Number of recorded voxels.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether no voxel was recorded.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// Retained voxels of `frame_voxels`' entry for `leaf`, keyed by their transformed min corner.
pub fn shape_entries(
    leaf: &ShapeNode,
    frame_voxels: &[Vec<VisibleVoxel>],
) -> IsovoxResult<Vec<(IVec3, FaceVisibilities)>> {
    let voxels = leaf_voxels(leaf, frame_voxels)?;
    Ok(voxels
        .iter()
        .map(|v| {
            let min = v.local_box().transformed(&leaf.transform).min;
            (min, v.faces.remap(|w| leaf.directions.local_of(w)))
        })
        .collect())
}

/// Visible voxels of the frame `leaf` instances.
pub fn leaf_voxels<'a>(
    leaf: &ShapeNode,
    frame_voxels: &'a [Vec<VisibleVoxel>],
) -> IsovoxResult<&'a [VisibleVoxel]> {
    let frame = leaf
        .frame
        .ok_or_else(|| IsovoxError::scene("leaf shape has no voxel frame"))?;
    frame_voxels
        .get(frame)
        .map(Vec::as_slice)
        .ok_or_else(|| IsovoxError::scene(format!("no visibility data for voxel frame {frame}")))
}

#[cfg(test)]
#[path = "../../tests/unit/voxels/world_map.rs"]
mod tests;
