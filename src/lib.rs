//! isovox turns a MagicaVoxel scene into isometric sprites.
//!
//! Every top-level transform of the scene becomes a structure. For each structure the crate
//! writes a textured OBJ of its visible faces, a hull and an occluded-face mesh for the
//! post-render crop and repair, and framing for an orthographic camera. Blender renders the
//! meshes; the renders are then cropped, repaired and scaled into final images.
//!
//! - [`run`] drives a whole conversion from a [`RunConfig`].
//! - [`generate`] covers every stage before the renderer.
#![forbid(unsafe_code)]

mod foundation;

/// Integer affine math, boxes, face directions and packed rotations.
pub mod geometry;
/// Untextured and textured OBJ meshes.
pub mod mesh;
/// Top-level stage orchestration.
pub mod pipeline;
/// Isometric projection and camera framing.
pub mod projection;
/// External renderer hand-off.
pub mod render;
/// Post-render crop and color repair.
pub mod repair;
/// Scene graph, flattening and structure placement.
pub mod scene;
/// `.vox` container adapter.
pub mod vox;
/// Per-frame face visibility and the scene-wide visibility map.
pub mod voxels;

pub use crate::foundation::config::{
    Constants, OutputLayout, RendererConfig, RunConfig, find_default_vox,
};
pub use crate::foundation::error::{IsovoxError, IsovoxResult};

pub use crate::pipeline::{Generated, RunReport, build_meshes, generate, run};
pub use crate::projection::framing::RenderParams;
pub use crate::scene::graph::SceneGraph;
pub use crate::scene::structure::{ImageDimensions, Structure, VolumeType};
pub use crate::vox::load_scene;
