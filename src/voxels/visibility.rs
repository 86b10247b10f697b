use glam::IVec3;
use rayon::prelude::*;

use crate::geometry::{direction::Direction, int_box::IntBox};
use crate::scene::graph::VoxelFrame;

/// Visibility of one voxel face, as far as its own frame can tell.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
pub enum FaceVisibility {
    /// An occupied neighbor in the same frame covers the face.
    #[default]
    Hidden,
    /// Open space inside the frame.
    Visible,
    /// Open space at the frame boundary; another shape may still cover it.
    VisibleAtFrameEdge,
}

impl FaceVisibility {
    #[inline]
    pub fn is_hidden(self) -> bool {
        self == FaceVisibility::Hidden
    }
}

/// Face visibility per [`Direction`], in direction table order.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub struct FaceVisibilities([FaceVisibility; 6]);

impl FaceVisibilities {
    pub fn new(faces: [FaceVisibility; 6]) -> Self {
        Self(faces)
    }

    #[inline]
    pub fn get(&self, direction: Direction) -> FaceVisibility {
        self.0[direction.index()]
    }

    pub fn set(&mut self, direction: Direction, visibility: FaceVisibility) {
        self.0[direction.index()] = visibility;
    }

    pub fn any_visible(&self) -> bool {
        self.0.iter().any(|v| !v.is_hidden())
    }

    /// Re-key by world direction: entry `w` takes the local face `local_of(w)`.
    pub fn remap(&self, local_of: impl Fn(Direction) -> Direction) -> Self {
        let mut out = Self::default();
        for world in Direction::ALL {
            out.set(world, self.get(local_of(world)));
        }
        out
    }
}

/// Voxel with at least one face that may be seen.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct VisibleVoxel {
    /// Minimum corner in frame space.
    pub min: IVec3,
    /// Faces keyed by local direction.
    pub faces: FaceVisibilities,
    /// Palette index.
    pub color: u8,
}

impl VisibleVoxel {
    /// Unit box in frame space.
    pub fn local_box(&self) -> IntBox {
        IntBox::unit_at(self.min)
    }
}

/// Classify the faces of every occupied cell in `frame`, dropping fully enclosed voxels.
///
/// Voxels come out in linear cell order.
pub fn frame_visibility(frame: &VoxelFrame) -> Vec<VisibleVoxel> {
    let last = frame.size() - IVec3::new(1, 1, 1);
    frame
        .cells()
        .filter_map(|(index, color)| {
            let min = frame.position_of(index);
            let mut faces = FaceVisibilities::default();
            for direction in Direction::ALL {
                let neighbor = min + direction.unit();
                let visibility = if frame.is_occupied(neighbor) {
                    FaceVisibility::Hidden
                } else if at_frame_edge(min, last, direction) {
                    FaceVisibility::VisibleAtFrameEdge
                } else {
                    FaceVisibility::Visible
                };
                faces.set(direction, visibility);
            }
            faces.any_visible().then_some(VisibleVoxel { min, faces, color })
        })
        .collect()
}

fn at_frame_edge(min: IVec3, last: IVec3, direction: Direction) -> bool {
    match direction {
        Direction::MinusX => min.x == 0,
        Direction::PlusX => min.x == last.x,
        Direction::MinusY => min.y == 0,
        Direction::PlusY => min.y == last.y,
        Direction::MinusZ => min.z == 0,
        Direction::PlusZ => min.z == last.z,
    }
}

/// [`frame_visibility`] for every frame, in parallel, indexed like `frames`.
#[tracing::instrument(skip(frames), fields(frames = frames.len()))]
pub fn all_frame_visibility(frames: &[VoxelFrame]) -> Vec<Vec<VisibleVoxel>> {
    let started = std::time::Instant::now();
    let out = frames.par_iter().map(frame_visibility).collect::<Vec<_>>();
    tracing::info!(
        elapsed_ms = started.elapsed().as_millis() as u64,
        voxels = out.iter().map(Vec::len).sum::<usize>(),
        "frame visibility computed"
    );
    out
}

#[cfg(test)]
#[path = "../../tests/unit/voxels/visibility.rs"]
mod tests;
