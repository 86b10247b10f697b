//! Coarse hull meshes used to measure a structure's silhouette in its render.

use crate::geometry::int_box::IntBox;
use crate::mesh::pool::{Vertex, to_world};
use crate::scene::structure::VolumeType;

/// Triangle mesh over a fixed vertex list; indices are 1-based.
#[derive(Clone, Debug, PartialEq)]
pub struct VolumeMesh {
    pub vertices: Vec<Vertex>,
    pub triangles: Vec<[u32; 3]>,
}

/// Which bound each coordinate of a table vertex takes.
#[derive(Clone, Copy)]
enum B {
    Min,
    Max,
}

type Corner = (B, B, B);

const BASE: [Corner; 4] = [
    (B::Max, B::Max, B::Min),
    (B::Max, B::Min, B::Min),
    (B::Min, B::Min, B::Min),
    (B::Min, B::Max, B::Min),
];

fn table(volume_type: VolumeType) -> (&'static [Corner], &'static [[u32; 3]]) {
    match volume_type {
        VolumeType::Cuboid => (
            &[
                (B::Max, B::Max, B::Max),
                (B::Max, B::Min, B::Max),
                (B::Min, B::Min, B::Max),
                (B::Min, B::Max, B::Max),
            ],
            &[
                [1, 2, 3],
                [1, 3, 4],
                [5, 8, 7],
                [5, 7, 6],
                [1, 5, 6],
                [1, 6, 2],
                [2, 6, 7],
                [2, 7, 3],
                [3, 7, 8],
                [3, 8, 4],
                [5, 1, 4],
                [5, 4, 8],
            ],
        ),
        VolumeType::MinusXPrism => (
            &[(B::Max, B::Max, B::Max), (B::Min, B::Max, B::Max)],
            &[
                [1, 2, 3],
                [1, 3, 4],
                [2, 3, 6],
                [2, 6, 5],
                [1, 5, 6],
                [1, 6, 4],
                [1, 5, 2],
                [4, 6, 3],
            ],
        ),
        VolumeType::MinusZPrism => (
            &[(B::Max, B::Max, B::Max), (B::Max, B::Min, B::Max)],
            &[
                [1, 2, 3],
                [1, 3, 4],
                [3, 4, 5],
                [3, 5, 6],
                [1, 6, 2],
                [1, 5, 6],
                [1, 4, 5],
                [2, 3, 6],
            ],
        ),
        VolumeType::PlusXPrism => (
            &[(B::Max, B::Min, B::Max), (B::Min, B::Min, B::Max)],
            &[
                [1, 2, 3],
                [1, 3, 4],
                [1, 5, 6],
                [1, 6, 4],
                [2, 3, 6],
                [2, 6, 5],
                [1, 5, 2],
                [4, 6, 3],
            ],
        ),
        VolumeType::PlusZPrism => (
            &[(B::Min, B::Min, B::Max), (B::Min, B::Max, B::Max)],
            &[
                [1, 2, 3],
                [1, 3, 4],
                [1, 2, 5],
                [1, 5, 6],
                [3, 4, 6],
                [3, 6, 5],
                [1, 4, 6],
                [2, 3, 5],
            ],
        ),
    }
}

impl VolumeMesh {
    /// Hull of `volume_type` spanning the source-space box `b`.
    pub fn for_box(b: &IntBox, volume_type: VolumeType, divisor: f64) -> Self {
        let pick = |bound: B, lo: i32, hi: i32| match bound {
            B::Min => to_world(lo, divisor),
            B::Max => to_world(hi, divisor),
        };
        let (extra, triangles) = table(volume_type);
        let vertices = BASE
            .iter()
            .chain(extra)
            .map(|&(x, y, z)| {
                Vertex::new(
                    pick(x, b.min.x, b.max.x),
                    pick(y, b.min.y, b.max.y),
                    pick(z, b.min.z, b.max.z),
                )
            })
            .collect();
        Self {
            vertices,
            triangles: triangles.to_vec(),
        }
    }
}

#[cfg(test)]
#[path = "../../tests/unit/mesh/volume.rs"]
mod tests;
