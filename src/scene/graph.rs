//! Scene graph handed over by the voxel container adapter.
//!
//! Node ids are plain indices into the owning vectors. The graph is read-only input to
//! flattening; nothing here knows about the container's binary layout.

use std::collections::BTreeMap;

use glam::IVec3;

use crate::foundation::error::{IsovoxError, IsovoxResult};
use crate::geometry::rotation::Rotation;

/// Occupancy and palette data of one voxel frame (a model in the container).
///
/// Cells are addressed over padded dimensions (`size + 1` per axis); the extra plane on the
/// maximum side of each axis is always empty.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct VoxelFrame {
    size: IVec3,
    cells: BTreeMap<usize, u8>,
}

impl VoxelFrame {
    /// Empty frame of `size` voxels.
    pub fn new(size: IVec3) -> IsovoxResult<Self> {
        if size.x <= 0 || size.y <= 0 || size.z <= 0 {
            return Err(IsovoxError::validation(format!(
                "voxel frame size must be positive, got {size:?}"
            )));
        }
        Ok(Self {
            size,
            cells: BTreeMap::new(),
        })
    }

    /// Frame size in voxels.
    pub fn size(&self) -> IVec3 {
        self.size
    }

    /// Padded data dimensions.
    pub fn padded_dims(&self) -> IVec3 {
        self.size + IVec3::new(1, 1, 1)
    }

    /// Linear cell index of `p`, or `None` outside the padded dimensions.
    pub fn linear_index(&self, p: IVec3) -> Option<usize> {
        let d = self.padded_dims();
        if p.x < 0 || p.y < 0 || p.z < 0 || p.x >= d.x || p.y >= d.y || p.z >= d.z {
            return None;
        }
        usize::try_from(p.x + p.y * d.x + p.z * d.x * d.y).ok()
    }

    /// Cell coordinates of a linear index.
    pub fn position_of(&self, index: usize) -> IVec3 {
        let d = self.padded_dims();
        let w = d.x as usize;
        let wh = w * d.y as usize;
        IVec3::new((index % w) as i32, ((index % wh) / w) as i32, (index / wh) as i32)
    }

    /// Occupy the voxel at `p` with palette index `color`.
    pub fn set(&mut self, p: IVec3, color: u8) -> IsovoxResult<()> {
        let inside = p.x >= 0
            && p.y >= 0
            && p.z >= 0
            && p.x < self.size.x
            && p.y < self.size.y
            && p.z < self.size.z;
        let index = self.linear_index(p).filter(|_| inside).ok_or_else(|| {
            IsovoxError::validation(format!(
                "voxel {p:?} lies outside frame of size {:?}",
                self.size
            ))
        })?;
        self.cells.insert(index, color);
        Ok(())
    }

    /// Whether the cell at `p` holds a voxel. Out-of-range cells are empty.
    pub fn is_occupied(&self, p: IVec3) -> bool {
        self.linear_index(p)
            .is_some_and(|i| self.cells.contains_key(&i))
    }

    /// Occupied cells as `(linear index, palette index)`, in index order.
    pub fn cells(&self) -> impl Iterator<Item = (usize, u8)> + '_ {
        self.cells.iter().map(|(i, c)| (*i, *c))
    }

    /// Number of occupied cells.
    pub fn len(&self) -> usize {
        self.cells.len()
    }

    /// Whether no cell is occupied.
    pub fn is_empty(&self) -> bool {
        self.cells.is_empty()
    }
}

/// Shape node: one placement of a voxel frame.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct ShapeRef {
    /// Index into [`SceneGraph::frames`].
    pub frame: usize,
}

/// What a transform node points at.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ChildRef {
    /// Index into [`SceneGraph::shapes`].
    Shape(usize),
    /// Index into [`SceneGraph::groups`].
    Group(usize),
}

/// Transform node with its display name.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct TransformRef {
    /// Display name; may carry a volume-type suffix.
    pub name: String,
    /// Translation applied after rotation.
    pub translation: IVec3,
    /// Discrete rotation about the child's center.
    pub rotation: Rotation,
    /// Transformed child.
    pub child: ChildRef,
}

/// Group node listing child transform ids.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct GroupRef {
    /// Indices into [`SceneGraph::transforms`].
    pub children: Vec<usize>,
}

/// Whole scene as seen by flattening and visibility.
#[derive(Clone, Debug, Default)]
pub struct SceneGraph {
    /// Voxel frames.
    pub frames: Vec<VoxelFrame>,
    /// Shape nodes.
    pub shapes: Vec<ShapeRef>,
    /// Transform nodes.
    pub transforms: Vec<TransformRef>,
    /// Group nodes.
    pub groups: Vec<GroupRef>,
    /// Top-level transform ids, in traversal order. Each becomes one structure.
    pub roots: Vec<usize>,
    /// RGBA palette addressed by voxel palette index.
    pub palette: Vec<[u8; 4]>,
}

impl SceneGraph {
    /// Frame by index.
    pub fn frame(&self, index: usize) -> IsovoxResult<&VoxelFrame> {
        self.frames
            .get(index)
            .ok_or_else(|| IsovoxError::scene(format!("no voxel frame with index {index}")))
    }

    /// Shape node by index.
    pub fn shape(&self, index: usize) -> IsovoxResult<&ShapeRef> {
        self.shapes
            .get(index)
            .ok_or_else(|| IsovoxError::scene(format!("no shape node with index {index}")))
    }

    /// Transform node by index.
    pub fn transform(&self, index: usize) -> IsovoxResult<&TransformRef> {
        self.transforms
            .get(index)
            .ok_or_else(|| IsovoxError::scene(format!("no transform node with index {index}")))
    }

    /// Group node by index.
    pub fn group(&self, index: usize) -> IsovoxResult<&GroupRef> {
        self.groups
            .get(index)
            .ok_or_else(|| IsovoxError::scene(format!("no group node with index {index}")))
    }

    /// Palette color, opaque black when the palette is short.
    pub fn color(&self, index: u8) -> [u8; 4] {
        self.palette
            .get(usize::from(index))
            .copied()
            .unwrap_or([0, 0, 0, 255])
    }
}

#[cfg(test)]
#[path = "../../tests/unit/scene/graph.rs"]
mod tests;
