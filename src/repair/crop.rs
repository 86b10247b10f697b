use image::RgbaImage;

use crate::foundation::error::{IsovoxError, IsovoxResult};
use crate::projection::isometric::IsometricPolygon;
use crate::scene::structure::ImageDimensions;

/// Pixel rectangle cut out of a render.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct CropRect {
    pub left: i64,
    pub top: i64,
    pub width: u32,
    pub height: u32,
}

/// Opaque bounds of `volume`: `(top, bottom, left, right)`, inclusive.
///
/// A pixel counts once its alpha reaches `threshold`.
pub fn opaque_bounds(volume: &RgbaImage, threshold: u8) -> Option<(u32, u32, u32, u32)> {
    let (w, h) = volume.dimensions();
    let hit = |x: u32, y: u32| volume.get_pixel(x, y)[3] >= threshold;

    let top = (0..h).find(|&y| (0..w).any(|x| hit(x, y)))?;
    let bottom = (0..h).rev().find(|&y| (0..w).any(|x| hit(x, y)))?;
    let left = (0..w).find(|&x| (0..h).any(|y| hit(x, y)))?;
    let right = (0..w).rev().find(|&x| (0..h).any(|y| hit(x, y)))?;
    Some((top, bottom, left, right))
}

/// Crop rectangle for a structure render, found from its volume silhouette.
///
/// The width follows the opaque columns exactly. The height is then forced to the aspect of
/// `dimensions`, and the rows gained or lost are split between top and bottom in proportion
/// to how far the polygon's vertical edges sit from whole pixels.
pub fn find_crop_rect(
    volume: &RgbaImage,
    threshold: u8,
    dimensions: &ImageDimensions,
    polygon: &IsometricPolygon,
) -> IsovoxResult<CropRect> {
    if volume.width() == 0 || volume.height() == 0 {
        return Err(IsovoxError::repair("volume render is empty"));
    }
    if dimensions.width == 0 || dimensions.height == 0 {
        return Err(IsovoxError::repair(format!(
            "cannot crop to degenerate image size {}x{}",
            dimensions.width, dimensions.height
        )));
    }
    let (top, bottom, left, right) = opaque_bounds(volume, threshold).ok_or_else(|| {
        IsovoxError::repair(format!(
            "no pixel in the volume render reaches alpha {threshold}"
        ))
    })?;

    let width = right - left + 1;
    let height = i64::from(bottom - top + 1);
    let mut top = i64::from(top);

    let adjusted = (f64::from(width) / dimensions.aspect()).round_ties_even() as i64;
    let diff = (adjusted - height).abs();
    if diff > 0 {
        let (top_excess, bottom_excess) = polygon.vertical_excess();
        let total = top_excess + bottom_excess;
        let top_share = if total > 0.0 { top_excess / total } else { 0.5 };
        let diff = diff as f64;
        if adjusted > height {
            top -= (top_share * diff).round_ties_even() as i64;
        } else {
            top += ((1.0 - top_share) * diff).round_ties_even() as i64;
        }
    }

    Ok(CropRect {
        left: i64::from(left),
        top,
        width,
        height: u32::try_from(adjusted)
            .map_err(|_| IsovoxError::repair(format!("invalid crop height {adjusted}")))?,
    })
}

/// Copy `rect` out of `image`; the rectangle must lie inside it.
pub fn crop(image: &RgbaImage, rect: &CropRect) -> IsovoxResult<RgbaImage> {
    let (w, h) = image.dimensions();
    let inside = rect.left >= 0
        && rect.top >= 0
        && rect.width > 0
        && rect.height > 0
        && rect.left + i64::from(rect.width) <= i64::from(w)
        && rect.top + i64::from(rect.height) <= i64::from(h);
    if !inside {
        return Err(IsovoxError::repair(format!(
            "crop {}x{} at ({}, {}) falls outside the {w}x{h} render",
            rect.width, rect.height, rect.left, rect.top
        )));
    }
    Ok(image::imageops::crop_imm(image, rect.left as u32, rect.top as u32, rect.width, rect.height)
        .to_image())
}

#[cfg(test)]
#[path = "../../tests/unit/repair/crop.rs"]
mod tests;
