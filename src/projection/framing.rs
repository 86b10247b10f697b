use std::f64::consts::SQRT_2;

use kurbo::Point;

use crate::foundation::config::Constants;
use crate::foundation::error::{IsovoxError, IsovoxResult};
use crate::projection::isometric::IsometricPolygon;
use crate::scene::structure::Structure;

/// Orthographic camera framing handed to the renderer.
#[derive(Clone, Copy, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RenderParams {
    /// Visible horizontal extent, in world units.
    pub ortho_scale: f64,
    pub resolution_width: u32,
    pub resolution_height: u32,
    pub camera_x: f64,
    pub camera_y: f64,
    pub camera_z: f64,
}

/// Orthographic width that fits `iso_width` isometric units across the screen.
///
/// The screen-right axis is `(√2/2, -√2/2, 0)` in world space and isometric x is
/// `divisor * (wx - wy)`, so screen extent is `iso_width * √2 / (2 * divisor)`.
pub fn ortho_scale_for_width(iso_width: f64, constants: &Constants) -> f64 {
    iso_width / (constants.world_unit_divisor * SQRT_2)
}

/// Camera position looking at the cartesian point under an isometric `center`.
///
/// The look-at point solves the projection for `y = 0`, expressed in renderer world axes,
/// and the camera backs away from it along the fixed 60°/0°/-45° view direction.
pub fn camera_for_center(center: Point, constants: &Constants) -> (f64, f64, f64) {
    let Point { x: cx, y: cy } = center;
    let world_x = (cx - 2.0 * cy) / 2.0 / constants.world_unit_divisor;
    let world_y = (-cx - 2.0 * cy) / 2.0 / constants.world_unit_divisor;

    let back = 6f64.sqrt() / 4.0;
    let d = constants.camera_distance;
    (world_x - d * back, world_y - d * back, 0.5 * d)
}

fn scaled_pixels(extent: f64, supersampling: u32) -> u32 {
    (extent * f64::from(supersampling)).ceil().max(0.0) as u32
}

/// Framing for one image of everything in `polygon`.
pub fn frame_scene(
    polygon: &IsometricPolygon,
    supersampling: u32,
    constants: &Constants,
) -> IsovoxResult<RenderParams> {
    if polygon.is_empty() {
        return Err(IsovoxError::scene("cannot frame an empty scene"));
    }
    let bounds = polygon.bounds();
    let (camera_x, camera_y, camera_z) = camera_for_center(bounds.center(), constants);
    let params = RenderParams {
        ortho_scale: ortho_scale_for_width(bounds.width(), constants),
        resolution_width: scaled_pixels(bounds.width(), supersampling),
        resolution_height: scaled_pixels(bounds.height(), supersampling),
        camera_x,
        camera_y,
        camera_z,
    };
    tracing::info!(
        ortho_scale = params.ortho_scale,
        width = params.resolution_width,
        height = params.resolution_height,
        "full scene framing"
    );
    Ok(params)
}

/// Framing for one structure, padded on every side.
///
/// The orthographic width follows the padded pixel width so pixels stay square.
pub fn frame_structure(
    polygon: &IsometricPolygon,
    supersampling: u32,
    constants: &Constants,
) -> RenderParams {
    let bounds = polygon.bounds();
    let pad = 2 * constants.padding_px;
    let resolution_width = scaled_pixels(bounds.width(), supersampling) + pad;
    let resolution_height = scaled_pixels(bounds.height(), supersampling) + pad;
    let padded_iso_width = f64::from(resolution_width) / f64::from(supersampling.max(1));
    let (camera_x, camera_y, camera_z) = camera_for_center(bounds.center(), constants);
    RenderParams {
        ortho_scale: ortho_scale_for_width(padded_iso_width, constants),
        resolution_width,
        resolution_height,
        camera_x,
        camera_y,
        camera_z,
    }
}

/// Union of every structure's polygon.
pub fn scene_polygon(structures: &[Structure]) -> IsometricPolygon {
    let mut polygon = IsometricPolygon::default();
    for s in structures {
        polygon.merge(&s.polygon);
    }
    polygon
}

/// Compute and store per-structure framing.
pub fn frame_structures(structures: &mut [Structure], supersampling: u32, constants: &Constants) {
    for s in structures.iter_mut() {
        let params = frame_structure(&s.polygon, supersampling, constants);
        tracing::debug!(
            name = %s.name,
            ortho_scale = params.ortho_scale,
            width = params.resolution_width,
            height = params.resolution_height,
            "structure framing"
        );
        s.render_params = Some(params);
    }
}

#[cfg(test)]
#[path = "../../tests/unit/projection/framing.rs"]
mod tests;
