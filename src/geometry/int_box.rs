use glam::IVec3;

use crate::geometry::affine::IntAffine;

/// Axis-aligned integer box. `min <= max` holds on every axis after any update.
///
/// Serializes as flat `minX`/`maxX`/`minY`/`maxY`/`minZ`/`maxZ` fields.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
#[serde(from = "IntBoxSer", into = "IntBoxSer")]
pub struct IntBox {
    /// Minimum corner.
    pub min: IVec3,
    /// Maximum corner.
    pub max: IVec3,
}

impl IntBox {
    /// Construct from per-axis bounds; each pair is sorted.
    pub fn new(min_x: i32, max_x: i32, min_y: i32, max_y: i32, min_z: i32, max_z: i32) -> Self {
        Self::from_corners(IVec3::new(min_x, min_y, min_z), IVec3::new(max_x, max_y, max_z))
    }

    /// Box spanning two corners, in any order.
    pub fn from_corners(a: IVec3, b: IVec3) -> Self {
        let mut out = Self::default();
        out.update(a, b);
        out
    }

    /// Box `[0, size]` on every axis.
    pub fn from_size(size: IVec3) -> Self {
        Self::from_corners(IVec3::ZERO, size)
    }

    /// Unit voxel box with its minimum corner at `min`.
    pub fn unit_at(min: IVec3) -> Self {
        Self::from_corners(min, min + IVec3::ONE)
    }

    /// Overwrite both corners in place, re-sorting per axis.
    pub fn update(&mut self, a: IVec3, b: IVec3) {
        self.min = a.min(b);
        self.max = a.max(b);
    }

    /// Shift along the two horizontal axes.
    pub fn offset(&mut self, dx: i32, dz: i32) {
        let delta = IVec3::new(dx, 0, dz);
        self.min += delta;
        self.max += delta;
    }

    /// Per-axis extents.
    pub fn lengths(&self) -> IVec3 {
        self.max - self.min
    }

    /// Center rounded towards the minimum (`min + len / 2`).
    pub fn center(&self) -> IVec3 {
        self.min + self.lengths() / 2
    }

    /// Smallest box containing both.
    pub fn union(&self, other: &IntBox) -> IntBox {
        IntBox {
            min: self.min.min(other.min),
            max: self.max.max(other.max),
        }
    }

    /// Transform both corners and re-sort per axis.
    pub fn transformed(&self, t: &IntAffine) -> IntBox {
        IntBox::from_corners(t.transform_point(self.min), t.transform_point(self.max))
    }

    /// Remap from the voxel editor's Z-up convention into the Y-up target convention.
    ///
    /// Target X is source -Y, target Y is source Z and target Z is source -X.
    pub fn to_target(&self) -> IntBox {
        IntBox {
            min: IVec3::new(-self.max.y, self.min.z, -self.max.x),
            max: IVec3::new(-self.min.y, self.max.z, -self.min.x),
        }
    }
}

#[derive(serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "camelCase")]
struct IntBoxSer {
    min_x: i32,
    max_x: i32,
    min_y: i32,
    max_y: i32,
    min_z: i32,
    max_z: i32,
}

impl From<IntBoxSer> for IntBox {
    fn from(r: IntBoxSer) -> Self {
        IntBox::new(r.min_x, r.max_x, r.min_y, r.max_y, r.min_z, r.max_z)
    }
}

impl From<IntBox> for IntBoxSer {
    fn from(b: IntBox) -> Self {
        IntBoxSer {
            min_x: b.min.x,
            max_x: b.max.x,
            min_y: b.min.y,
            max_y: b.max.y,
            min_z: b.min.z,
            max_z: b.max.z,
        }
    }
}

#[cfg(test)]
#[path = "../../tests/unit/geometry/int_box.rs"]
mod tests;
