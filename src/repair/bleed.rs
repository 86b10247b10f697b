use image::{Rgba, RgbaImage};

use crate::foundation::error::{IsovoxError, IsovoxResult};

/// Neighbor scan order used to pick a replacement color, as `(dx, dy)`.
///
/// Concentric square rings out to distance 6. Each ring starts with the four axis
/// neighbors (up, down, left, right), then walks the off-axis cells outwards and ends
/// on the corners.
#[rustfmt::skip]
pub const BLEED_OFFSETS: [(i32, i32); 168] = [
    // ring 1
    (0, -1), (0, 1), (-1, 0), (1, 0), (1, -1), (1, 1), (-1, 1), (-1, -1),
    // ring 2
    (0, -2), (0, 2), (-2, 0), (2, 0), (2, -1), (2, 1), (-2, -1), (-2, 1), (1, -2), (1, 2),
    (-1, -2), (-1, 2), (2, -2), (2, 2), (-2, -2), (-2, 2),
    // ring 3
    (0, -3), (0, 3), (-3, 0), (3, 0), (3, -1), (3, 1), (-3, -1), (-3, 1), (1, -3), (1, 3),
    (-1, -3), (-1, 3), (3, -2), (3, 2), (-3, -2), (-3, 2), (2, -3), (2, 3), (-2, -3), (-2, 3),
    (3, -3), (3, 3), (-3, -3), (-3, 3),
    // ring 4
    (0, -4), (0, 4), (-4, 0), (4, 0), (4, -1), (4, 1), (-4, -1), (-4, 1), (1, -4), (1, 4),
    (-1, -4), (-1, 4), (4, -2), (4, 2), (-4, -2), (-4, 2), (2, -4), (2, 4), (-2, -4), (-2, 4),
    (4, -3), (4, 3), (-4, -3), (-4, 3), (3, -4), (3, 4), (-3, -4), (-3, 4), (4, -4), (4, 4),
    (-4, -4), (-4, 4),
    // ring 5
    (0, -5), (0, 5), (-5, 0), (5, 0), (5, -1), (5, 1), (-5, -1), (-5, 1), (1, -5), (1, 5),
    (-1, -5), (-1, 5), (5, -2), (5, 2), (-5, -2), (-5, 2), (2, -5), (2, 5), (-2, -5), (-2, 5),
    (5, -3), (5, 3), (-5, -3), (-5, 3), (3, -5), (3, 5), (-3, -5), (-3, 5), (5, -4), (5, 4),
    (-5, -4), (-5, 4), (4, -5), (4, 5), (-4, -5), (-4, 5), (5, -5), (5, 5), (-5, -5), (-5, 5),
    // ring 6
    (0, -6), (0, 6), (-6, 0), (6, 0), (6, -1), (6, 1), (-6, -1), (-6, 1), (1, -6), (1, 6),
    (-1, -6), (-1, 6), (6, -2), (6, 2), (-6, -2), (-6, 2), (2, -6), (2, 6), (-2, -6), (-2, 6),
    (6, -3), (6, 3), (-6, -3), (-6, 3), (3, -6), (3, 6), (-3, -6), (-3, 6), (6, -4), (6, 4),
    (-6, -4), (-6, 4), (4, -6), (4, 6), (-4, -6), (-4, 6), (6, -5), (6, 5), (-6, -5), (-6, 5),
    (5, -6), (5, 6), (-5, -6), (-5, 6), (6, -6), (6, 6), (-6, -6), (-6, 6),
];

/// Thresholds for [`bleed_occluded`].
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct BleedThresholds {
    /// Occluded-mask alpha at or above which a pixel needs repair.
    pub occluded_alpha: u8,
    /// Candidates with every RGB channel below this are skipped.
    pub near_black: u8,
}

/// Replace every pixel of `actual` that `occluded` marks with the color of the first
/// acceptable neighbor in [`BLEED_OFFSETS`] order.
///
/// A candidate is acceptable when it is inside the image and not itself marked. It must
/// also be neither fully transparent nor near-black. The copied color is made opaque.
/// Pixels with no acceptable neighbor stay as rendered. Returns the number of repaired
/// pixels.
pub fn bleed_occluded(
    actual: &mut RgbaImage,
    occluded: &RgbaImage,
    thresholds: BleedThresholds,
) -> IsovoxResult<usize> {
    if actual.dimensions() != occluded.dimensions() {
        return Err(IsovoxError::repair(format!(
            "occluded-face mask is {:?} but the render is {:?}",
            occluded.dimensions(),
            actual.dimensions()
        )));
    }
    let (w, h) = actual.dimensions();
    let marked = |x: u32, y: u32| occluded.get_pixel(x, y)[3] >= thresholds.occluded_alpha;

    let mut repaired = 0;
    for y in 0..h {
        for x in 0..w {
            if !marked(x, y) {
                continue;
            }
            if let Some(color) = replacement(actual, &marked, x, y, thresholds.near_black) {
                actual.put_pixel(x, y, color);
                repaired += 1;
            }
        }
    }
    Ok(repaired)
}

fn replacement(
    actual: &RgbaImage,
    marked: &impl Fn(u32, u32) -> bool,
    x: u32,
    y: u32,
    near_black: u8,
) -> Option<Rgba<u8>> {
    let (w, h) = actual.dimensions();
    BLEED_OFFSETS.iter().find_map(|&(dx, dy)| {
        let nx = u32::try_from(i64::from(x) + i64::from(dx)).ok()?;
        let ny = u32::try_from(i64::from(y) + i64::from(dy)).ok()?;
        if nx >= w || ny >= h || marked(nx, ny) {
            return None;
        }
        let Rgba([r, g, b, a]) = *actual.get_pixel(nx, ny);
        if a == 0 || (r < near_black && g < near_black && b < near_black) {
            return None;
        }
        Some(Rgba([r, g, b, 255]))
    })
}

#[cfg(test)]
#[path = "../../tests/unit/repair/bleed.rs"]
mod tests;
