use glam::IVec3;

use crate::foundation::error::{IsovoxError, IsovoxResult};
use crate::geometry::affine::IntAffine;

/// One of the six axis directions, in the fixed order used for face tables.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
pub enum Direction {
    /// Towards negative X.
    MinusX = 0,
    /// Towards positive X.
    PlusX = 1,
    /// Towards negative Y.
    MinusY = 2,
    /// Towards positive Y.
    PlusY = 3,
    /// Towards negative Z.
    MinusZ = 4,
    /// Towards positive Z.
    PlusZ = 5,
}

impl Direction {
    /// All directions in table order.
    pub const ALL: [Direction; 6] = [
        Direction::MinusX,
        Direction::PlusX,
        Direction::MinusY,
        Direction::PlusY,
        Direction::MinusZ,
        Direction::PlusZ,
    ];

    /// Table index `0..6`.
    #[inline]
    pub fn index(self) -> usize {
        self as usize
    }

    /// Unit vector pointing along this direction.
    pub fn unit(self) -> IVec3 {
        match self {
            Direction::MinusX => IVec3::new(-1, 0, 0),
            Direction::PlusX => IVec3::new(1, 0, 0),
            Direction::MinusY => IVec3::new(0, -1, 0),
            Direction::PlusY => IVec3::new(0, 1, 0),
            Direction::MinusZ => IVec3::new(0, 0, -1),
            Direction::PlusZ => IVec3::new(0, 0, 1),
        }
    }

    /// Direction pointing the other way.
    pub fn opposite(self) -> Direction {
        match self {
            Direction::MinusX => Direction::PlusX,
            Direction::PlusX => Direction::MinusX,
            Direction::MinusY => Direction::PlusY,
            Direction::PlusY => Direction::MinusY,
            Direction::MinusZ => Direction::PlusZ,
            Direction::PlusZ => Direction::MinusZ,
        }
    }

    /// Classify a rotated unit vector by its first nonzero component (X, then Y, then Z).
    pub fn classify(v: IVec3) -> IsovoxResult<Direction> {
        let d = if v.x < 0 {
            Direction::MinusX
        } else if v.x > 0 {
            Direction::PlusX
        } else if v.y < 0 {
            Direction::MinusY
        } else if v.y > 0 {
            Direction::PlusY
        } else if v.z < 0 {
            Direction::MinusZ
        } else if v.z > 0 {
            Direction::PlusZ
        } else {
            return Err(IsovoxError::scene(
                "rotation collapsed a face direction to the zero vector",
            ));
        };
        Ok(d)
    }
}

/// Where each local face direction ends up after a shape's rotation, and the inverse.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct DirectionMap {
    local_to_world: [Direction; 6],
    world_to_local: [Direction; 6],
}

impl Default for DirectionMap {
    fn default() -> Self {
        Self {
            local_to_world: Direction::ALL,
            world_to_local: Direction::ALL,
        }
    }
}

impl DirectionMap {
    /// Derive the table from the rotation part of `transform`.
    pub fn from_transform(transform: &IntAffine) -> IsovoxResult<Self> {
        let rotation = transform.rotation_part();
        let mut map = Self::default();
        let mut seen = [false; 6];
        for local in Direction::ALL {
            let world = Direction::classify(rotation.transform_vector(local.unit()))?;
            if seen[world.index()] {
                return Err(IsovoxError::scene(format!(
                    "rotation maps two faces onto {world:?}"
                )));
            }
            seen[world.index()] = true;
            map.local_to_world[local.index()] = world;
            map.world_to_local[world.index()] = local;
        }
        Ok(map)
    }

    /// World direction that local face `local` faces after rotation.
    #[inline]
    pub fn world_of(&self, local: Direction) -> Direction {
        self.local_to_world[local.index()]
    }

    /// Local face that ends up facing world direction `world`.
    #[inline]
    pub fn local_of(&self, world: Direction) -> Direction {
        self.world_to_local[world.index()]
    }
}

#[cfg(test)]
#[path = "../../tests/unit/geometry/direction.rs"]
mod tests;
