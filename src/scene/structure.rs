use std::str::FromStr;

use glam::IVec3;

use crate::foundation::config::Constants;
use crate::foundation::error::{IsovoxError, IsovoxResult};
use crate::geometry::{affine::IntAffine, direction::DirectionMap, int_box::IntBox};
use crate::projection::{framing::RenderParams, isometric::IsometricPolygon};

/// Coarse hull declared for a structure through its transform node's name.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
pub enum VolumeType {
    /// Full box.
    #[default]
    Cuboid,
    /// Prism sloping down towards -X.
    MinusXPrism,
    /// Prism sloping down towards +X.
    PlusXPrism,
    /// Prism sloping down towards -Z.
    MinusZPrism,
    /// Prism sloping down towards +Z.
    PlusZPrism,
}

impl VolumeType {
    /// Canonical name.
    pub fn as_str(self) -> &'static str {
        match self {
            VolumeType::Cuboid => "Cuboid",
            VolumeType::MinusXPrism => "MinusXPrism",
            VolumeType::PlusXPrism => "PlusXPrism",
            VolumeType::MinusZPrism => "MinusZPrism",
            VolumeType::PlusZPrism => "PlusZPrism",
        }
    }

    /// Parse the suffix after the last `_` of a node name; anything unrecognized is a cuboid.
    pub fn from_node_name(name: &str) -> VolumeType {
        let suffix = name.rsplit('_').next().unwrap_or(name);
        suffix.trim().parse().unwrap_or_default()
    }
}

impl FromStr for VolumeType {
    type Err = IsovoxError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        [
            VolumeType::Cuboid,
            VolumeType::MinusXPrism,
            VolumeType::PlusXPrism,
            VolumeType::MinusZPrism,
            VolumeType::PlusZPrism,
        ]
        .into_iter()
        .find(|v| v.as_str().eq_ignore_ascii_case(s))
        .ok_or_else(|| IsovoxError::validation(format!("unknown volume type '{s}'")))
    }
}

/// Node of the flattened scene tree.
///
/// A leaf instances one voxel frame. A group parent has no frame and owns its flattened leaf
/// shapes, whose transforms already include the parent's.
#[derive(Clone, Debug, PartialEq)]
pub struct ShapeNode {
    /// Composed transform from frame space into source world space.
    pub transform: IntAffine,
    /// Bounds in source world space.
    pub source_box: IntBox,
    /// Bounds in target (Y-up) space.
    pub target_box: IntBox,
    /// Instanced frame, `None` for group parents.
    pub frame: Option<usize>,
    /// Face direction remap for `transform`'s rotation.
    pub directions: DirectionMap,
    /// Leaf shapes of a group parent.
    pub children: Vec<ShapeNode>,
}

impl ShapeNode {
    /// Leaf for `frame`, transformed by `transform` from the frame's `[0, size]` box.
    pub fn leaf(frame: usize, frame_size: IVec3, transform: IntAffine) -> IsovoxResult<Self> {
        let mut node = Self {
            transform: IntAffine::IDENTITY,
            source_box: IntBox::default(),
            target_box: IntBox::default(),
            frame: Some(frame),
            directions: DirectionMap::default(),
            children: Vec::new(),
        };
        node.apply_transform(transform, IntBox::from_size(frame_size))?;
        Ok(node)
    }

    /// Group parent over `children`, transformed by `transform` from `local_box`.
    pub fn group(
        children: Vec<ShapeNode>,
        transform: IntAffine,
        local_box: IntBox,
    ) -> IsovoxResult<Self> {
        let mut node = Self {
            transform: IntAffine::IDENTITY,
            source_box: IntBox::default(),
            target_box: IntBox::default(),
            frame: None,
            directions: DirectionMap::default(),
            children,
        };
        node.apply_transform(transform, local_box)?;
        Ok(node)
    }

    /// Set the transform and recompute bounds from `local_box`.
    pub fn apply_transform(&mut self, transform: IntAffine, local_box: IntBox) -> IsovoxResult<()> {
        self.transform = transform;
        self.directions = DirectionMap::from_transform(&transform)?;
        self.set_source_box(local_box.transformed(&transform));
        Ok(())
    }

    /// Replace the source bounds and derive the target bounds from them.
    pub fn set_source_box(&mut self, source_box: IntBox) {
        self.source_box = source_box;
        self.target_box = source_box.to_target();
    }

    /// Whether this node is a group parent.
    pub fn is_group(&self) -> bool {
        !self.children.is_empty()
    }

    /// Shapes that carry voxels: the children of a group, or the node itself.
    pub fn leaves(&self) -> &[ShapeNode] {
        if self.children.is_empty() {
            std::slice::from_ref(self)
        } else {
            &self.children
        }
    }
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
/// Final image size of a structure, in pixels.
pub struct ImageDimensions {
    /// Width.
    #[serde(rename = "Width")]
    pub width: u32,
    /// Height.
    #[serde(rename = "Height")]
    pub height: u32,
}

impl ImageDimensions {
    /// Width over height; zero when the height is zero.
    pub fn aspect(&self) -> f64 {
        if self.height == 0 {
            0.0
        } else {
            f64::from(self.width) / f64::from(self.height)
        }
    }
}

/// One renderable unit: a top-level transform node and everything under it.
#[derive(Clone, Debug, PartialEq)]
pub struct Structure {
    /// `structure<index>`.
    pub name: String,
    /// Declared hull.
    pub volume_type: VolumeType,
    /// Root of the structure's shape tree.
    pub shape: ShapeNode,
    /// Isometric silhouette of the un-offset target box.
    pub polygon: IsometricPolygon,
    /// Image size derived from `polygon`.
    pub image_dimensions: ImageDimensions,
    /// Per-structure render framing, once computed.
    pub render_params: Option<RenderParams>,
}

impl Structure {
    /// New structure with empty projection data.
    pub fn new(name: impl Into<String>, volume_type: VolumeType, shape: ShapeNode) -> Self {
        Self {
            name: name.into(),
            volume_type,
            shape,
            polygon: IsometricPolygon::default(),
            image_dimensions: ImageDimensions::default(),
            render_params: None,
        }
    }
}

/// Minimum cartesian corner `(x, z)` of a property tile.
pub fn tile_to_cartesian(tile_x: i32, tile_z: i32, tile_width: i32) -> (i32, i32) {
    (tile_x * tile_width, tile_z * tile_width)
}

/// Project every structure, check the scene invariants, then move the scene so its minimum
/// horizontal corner sits on the property origin tile.
///
/// Projection runs on un-offset boxes. Returns the applied `(x, z)` offset.
#[tracing::instrument(skip(structures, constants))]
pub fn place_structures(
    structures: &mut [Structure],
    min_tile_x: i32,
    min_tile_z: i32,
    constants: &Constants,
) -> IsovoxResult<(i32, i32)> {
    for s in structures.iter_mut() {
        let polygon = IsometricPolygon::for_volume(&s.shape.target_box, s.volume_type);
        s.image_dimensions = polygon.image_dimensions();
        s.polygon = polygon;
    }

    let bounds = structures
        .iter()
        .map(|s| s.shape.target_box)
        .reduce(|a, b| a.union(&b))
        .ok_or_else(|| IsovoxError::scene("scene contains no structures"))?;

    if bounds.min.x + bounds.max.x != 0 || bounds.min.z + bounds.max.z != 0 {
        return Err(IsovoxError::scene(format!(
            "bounding box is not centered around origin (0, 0); bounds are minX: {}, maxX: {}, minZ: {}, maxZ: {}",
            bounds.min.x, bounds.max.x, bounds.min.z, bounds.max.z
        )));
    }
    let len = bounds.lengths();
    if len.x % 2 != 0 || len.z % 2 != 0 {
        return Err(IsovoxError::scene(format!(
            "scene x and z lengths must be even; lengths are x: {}, z: {}",
            len.x, len.z
        )));
    }

    let (origin_x, origin_z) = tile_to_cartesian(min_tile_x, min_tile_z, constants.tile_width);
    let x_offset = origin_x - bounds.min.x;
    let z_offset = origin_z - bounds.min.z;
    tracing::info!(x_offset, z_offset, "scene to target offsets");
    for s in structures.iter_mut() {
        s.shape.target_box.offset(x_offset, z_offset);
    }
    Ok((x_offset, z_offset))
}

#[cfg(test)]
#[path = "../../tests/unit/scene/structure.rs"]
mod tests;
