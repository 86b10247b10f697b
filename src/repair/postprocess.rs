use std::path::{Path, PathBuf};

use anyhow::Context as _;
use image::RgbaImage;
use image::imageops::FilterType;
use rayon::prelude::*;

use crate::foundation::config::{Constants, OutputLayout};
use crate::foundation::error::{IsovoxError, IsovoxResult};
use crate::repair::bleed::{BleedThresholds, bleed_occluded};
use crate::repair::crop::{crop, find_crop_rect};
use crate::scene::structure::Structure;

/// Per-run repair knobs.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct RepairSettings {
    /// Alpha a volume pixel needs to count towards the crop.
    pub crop_alpha: u8,
    /// Color-bleed thresholds.
    pub bleed: BleedThresholds,
}

impl RepairSettings {
    pub fn new(constants: &Constants, full_resolution: bool) -> Self {
        Self {
            crop_alpha: constants.crop_alpha_threshold(full_resolution),
            bleed: BleedThresholds {
                occluded_alpha: constants.occluded_alpha,
                near_black: constants.near_black,
            },
        }
    }
}

pub fn render_file(renders: &Path, name: &str) -> PathBuf {
    renders.join(format!("{name}.png"))
}

pub fn volume_render_file(renders: &Path, name: &str) -> PathBuf {
    renders.join(format!("{name}_volume.png"))
}

pub fn occluded_render_file(renders: &Path, name: &str) -> PathBuf {
    renders.join(format!("{name}_occludedFaces.png"))
}

pub fn fixed_render_file(renders: &Path, name: &str) -> PathBuf {
    renders.join(format!("{name}_fixed.png"))
}

fn load_rgba(path: &Path) -> IsovoxResult<RgbaImage> {
    let img = image::open(path).with_context(|| format!("read render '{}'", path.display()))?;
    Ok(img.to_rgba8())
}

fn save_png(img: &RgbaImage, path: &Path) -> IsovoxResult<()> {
    img.save_with_format(path, image::ImageFormat::Png)
        .with_context(|| format!("write png '{}'", path.display()))?;
    Ok(())
}

/// Crop, repair and scale the renders of one structure.
///
/// The crop comes from the volume render and is applied to both the color render and the
/// optional occluded-face mask. The repaired full-size crop is kept next to the renders for
/// inspection; the scaled result lands in the final image directory. Returns its path.
#[tracing::instrument(skip_all, fields(structure = %structure.name))]
pub fn repair_structure(
    structure: &Structure,
    layout: &OutputLayout,
    settings: &RepairSettings,
) -> IsovoxResult<PathBuf> {
    let name = &structure.name;
    let volume = load_rgba(&volume_render_file(&layout.renders, name))?;
    let rect = find_crop_rect(
        &volume,
        settings.crop_alpha,
        &structure.image_dimensions,
        &structure.polygon,
    )
    .map_err(|e| IsovoxError::repair(format!("structure '{name}': {e}")))?;
    tracing::debug!(
        left = rect.left,
        top = rect.top,
        width = rect.width,
        height = rect.height,
        "render crop"
    );

    let mut actual = crop(&load_rgba(&render_file(&layout.renders, name))?, &rect)?;

    let mask_path = occluded_render_file(&layout.renders, name);
    if mask_path.is_file() {
        let mask = crop(&load_rgba(&mask_path)?, &rect)?;
        let repaired = bleed_occluded(&mut actual, &mask, settings.bleed)?;
        tracing::debug!(repaired, "occluded pixels repaired");
    }

    save_png(&actual, &fixed_render_file(&layout.renders, name))?;

    let dims = structure.image_dimensions;
    let scaled = image::imageops::resize(&actual, dims.width, dims.height, FilterType::CatmullRom);
    let out = layout.images.join(format!("{name}.png"));
    save_png(&scaled, &out)?;
    tracing::debug!(path = %out.display(), "final image written");
    Ok(out)
}

/// Clear the final image directory and repair every structure in parallel.
///
/// Runs on the current rayon pool. The first failing structure, in structure order, is
/// returned.
#[tracing::instrument(skip_all, fields(structures = structures.len()))]
pub fn repair_all(
    structures: &[Structure],
    layout: &OutputLayout,
    settings: &RepairSettings,
) -> IsovoxResult<Vec<PathBuf>> {
    let started = std::time::Instant::now();
    layout.reset_images()?;

    let results = structures
        .par_iter()
        .map(|s| repair_structure(s, layout, settings))
        .collect::<Vec<_>>();
    let mut out = Vec::with_capacity(results.len());
    for r in results {
        out.push(r?);
    }

    tracing::info!(
        elapsed_ms = started.elapsed().as_millis() as u64,
        images = out.len(),
        "renders cropped and scaled"
    );
    Ok(out)
}

#[cfg(test)]
#[path = "../../tests/unit/repair/postprocess.rs"]
mod tests;
