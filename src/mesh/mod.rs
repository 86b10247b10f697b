//! Wavefront OBJ emission for structures, their occluded faces and their volume envelopes.

pub mod obj;
pub mod occluded;
pub mod pool;
pub mod structure_mesh;
pub mod texture;
pub mod volume;
