use std::collections::HashMap;
use std::hash::{Hash, Hasher};

use crate::geometry::{direction::Direction, int_box::IntBox};

/// Mesh vertex in renderer world units, before the OBJ axis swap.
#[derive(Clone, Copy, Debug, Default)]
pub struct Vertex {
    pub x: f32,
    pub y: f32,
    pub z: f32,
}

impl Vertex {
    pub fn new(x: f32, y: f32, z: f32) -> Self {
        Self { x, y, z }
    }

    fn key(&self) -> [u32; 3] {
        // +0.0 and -0.0 must land on one pool entry.
        let bits = |v: f32| if v == 0.0 { 0 } else { v.to_bits() };
        [bits(self.x), bits(self.y), bits(self.z)]
    }
}

impl PartialEq for Vertex {
    fn eq(&self, other: &Self) -> bool {
        self.key() == other.key()
    }
}

impl Eq for Vertex {}

impl Hash for Vertex {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.key().hash(state);
    }
}

/// Cartesian coordinate to world units, rounded to one decimal.
pub fn to_world(v: i32, divisor: f64) -> f32 {
    ((f64::from(v) / divisor) * 10.0).round() as f32 / 10.0
}

/// The 8 corners of `b` in world units.
///
/// Corners 0-3 walk the `min_z` square starting at the minimum corner, 4-7 repeat that walk
/// on the `max_z` square.
pub fn box_corners(b: &IntBox, divisor: f64) -> [Vertex; 8] {
    let (x0, x1) = (to_world(b.min.x, divisor), to_world(b.max.x, divisor));
    let (y0, y1) = (to_world(b.min.y, divisor), to_world(b.max.y, divisor));
    let (z0, z1) = (to_world(b.min.z, divisor), to_world(b.max.z, divisor));
    [
        Vertex::new(x0, y0, z0),
        Vertex::new(x1, y0, z0),
        Vertex::new(x1, y1, z0),
        Vertex::new(x0, y1, z0),
        Vertex::new(x0, y0, z1),
        Vertex::new(x1, y0, z1),
        Vertex::new(x1, y1, z1),
        Vertex::new(x0, y1, z1),
    ]
}

/// Corner indices of the outward-wound quad facing `direction`.
pub fn face_winding(direction: Direction) -> [usize; 4] {
    match direction {
        Direction::MinusX => [0, 4, 7, 3],
        Direction::PlusX => [5, 1, 2, 6],
        Direction::MinusY => [0, 1, 5, 4],
        Direction::PlusY => [3, 7, 6, 2],
        Direction::MinusZ => [0, 3, 2, 1],
        Direction::PlusZ => [4, 5, 6, 7],
    }
}

/// 1-based `vn` line for faces pointing along `direction`.
pub fn normal_number(direction: Direction) -> u32 {
    direction.index() as u32 + 1
}

/// Quad of `corners` facing `direction`.
pub fn face_quad(corners: &[Vertex; 8], direction: Direction) -> [Vertex; 4] {
    face_winding(direction).map(|i| corners[i])
}

/// Insertion-ordered vertex set handing out 1-based indices.
#[derive(Clone, Debug, Default)]
pub struct VertexPool {
    vertices: Vec<Vertex>,
    index: HashMap<Vertex, u32>,
}

impl VertexPool {
    /// Index of `v`, adding it on first sight.
    pub fn insert(&mut self, v: Vertex) -> u32 {
        if let Some(&i) = self.index.get(&v) {
            return i;
        }
        self.vertices.push(v);
        let i = self.vertices.len() as u32;
        self.index.insert(v, i);
        i
    }

    pub fn vertices(&self) -> &[Vertex] {
        &self.vertices
    }

    pub fn len(&self) -> usize {
        self.vertices.len()
    }

    pub fn is_empty(&self) -> bool {
        self.vertices.is_empty()
    }
}

/// Quad referencing pooled vertices. `texcoord` and `normal` are 0 when unused.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct QuadFace {
    pub vertices: [u32; 4],
    pub texcoord: u32,
    pub normal: u32,
}

/// Quad that has not been pooled yet.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Quad {
    pub corners: [Vertex; 4],
    pub texcoord: u32,
    pub normal: u32,
}

/// Deduplicated vertices plus the quads over them.
#[derive(Clone, Debug, Default)]
pub struct MeshBuffer {
    pub pool: VertexPool,
    pub faces: Vec<QuadFace>,
}

impl MeshBuffer {
    pub fn push_quad(&mut self, quad: Quad) {
        let vertices = quad.corners.map(|v| self.pool.insert(v));
        self.faces.push(QuadFace {
            vertices,
            texcoord: quad.texcoord,
            normal: quad.normal,
        });
    }

    /// Append quads in order.
    pub fn extend(&mut self, quads: impl IntoIterator<Item = Quad>) {
        for quad in quads {
            self.push_quad(quad);
        }
    }

    pub fn is_empty(&self) -> bool {
        self.faces.is_empty()
    }
}

#[cfg(test)]
#[path = "../../tests/unit/mesh/pool.rs"]
mod tests;
