use std::path::{Path, PathBuf};

use anyhow::Context as _;

use crate::foundation::error::{IsovoxError, IsovoxResult};

#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(default)]
/// Numeric constants shared by every stage.
pub struct Constants {
    /// Cartesian units per renderer world unit.
    pub world_unit_divisor: f64,
    /// Cartesian width of one property tile.
    pub tile_width: i32,
    /// Largest structure extent allowed on any axis.
    pub max_extent: i32,
    /// Symmetric pixel padding added around per-structure renders.
    pub padding_px: u32,
    /// Supersampling factor used in full-resolution mode.
    pub full_resolution_supersampling: u32,
    /// Camera distance from its look-at point, in world units.
    pub camera_distance: f64,
    /// Crop alpha threshold in full-resolution mode.
    pub full_resolution_crop_alpha: u8,
    /// Crop alpha threshold otherwise.
    pub crop_alpha: u8,
    /// Occluded-face pixels at or above this alpha get repaired.
    pub occluded_alpha: u8,
    /// Source pixels whose RGB channels are all below this are skipped when bleeding.
    pub near_black: u8,
}

impl Default for Constants {
    fn default() -> Self {
        Self {
            world_unit_divisor: 10.0,
            tile_width: 32,
            max_extent: 512,
            padding_px: 8,
            full_resolution_supersampling: 4,
            camera_distance: 500.0,
            full_resolution_crop_alpha: 255,
            crop_alpha: 170,
            occluded_alpha: 16,
            near_black: 16,
        }
    }
}

impl Constants {
    /// Render supersampling factor.
    pub fn supersampling(&self, full_resolution: bool) -> u32 {
        if full_resolution {
            self.full_resolution_supersampling
        } else {
            1
        }
    }

    /// Alpha a pixel must reach to count towards crop bounds.
    ///
    /// Higher supersampling leaves fewer partially covered edge pixels, so the bar is raised.
    pub fn crop_alpha_threshold(&self, full_resolution: bool) -> u8 {
        if full_resolution {
            self.full_resolution_crop_alpha
        } else {
            self.crop_alpha
        }
    }
}

#[derive(Clone, Debug, Default, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(default)]
/// External renderer settings.
pub struct RendererConfig {
    /// Explicit renderer executable. When unset, a bundled `blender/blender` next to the
    /// current executable is preferred, then `blender` on PATH.
    pub executable: Option<PathBuf>,
    /// Renderer-side script. Defaults to `main.py` next to the current executable, then in
    /// the working directory.
    pub script: Option<PathBuf>,
}

#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(default)]
/// Options for one conversion run.
pub struct RunConfig {
    /// Input `.vox` file.
    pub vox_path: PathBuf,
    /// Property origin tile, X.
    pub min_tile_x: i32,
    /// Property origin tile, Z.
    pub min_tile_z: i32,
    /// Only build structure meshes and render the whole scene once.
    pub scene_test_run: bool,
    /// Ask the renderer for its full sample count.
    pub full_samples: bool,
    /// Render supersampled and crop with the strict alpha threshold.
    pub full_resolution: bool,
    /// Drop frame-edge `-Z` faces that sit below the ground plane.
    pub cull_ground_faces: bool,
    /// Worker threads; `None` lets rayon decide.
    pub threads: Option<usize>,
    /// Root of the output tree.
    pub output_dir: PathBuf,
    /// External renderer settings.
    pub renderer: RendererConfig,
    /// Numeric constants.
    pub constants: Constants,
}

impl Default for RunConfig {
    fn default() -> Self {
        Self {
            vox_path: PathBuf::new(),
            min_tile_x: 0,
            min_tile_z: 0,
            scene_test_run: false,
            full_samples: false,
            full_resolution: false,
            cull_ground_faces: false,
            threads: None,
            output_dir: PathBuf::from("out"),
            renderer: RendererConfig::default(),
            constants: Constants::default(),
        }
    }
}

impl RunConfig {
    /// Check options before any stage runs.
    pub fn validate(&self) -> IsovoxResult<()> {
        if self.vox_path.as_os_str().is_empty() {
            return Err(IsovoxError::validation("no .vox input path given"));
        }
        if let Some(n) = self.threads
            && n == 0
        {
            return Err(IsovoxError::validation("'threads' must be >= 1 when set"));
        }
        let c = &self.constants;
        if c.world_unit_divisor <= 0.0 || c.tile_width <= 0 || c.max_extent <= 0 {
            return Err(IsovoxError::validation(
                "world unit divisor, tile width and max extent must be positive",
            ));
        }
        if c.full_resolution_supersampling == 0 {
            return Err(IsovoxError::validation("supersampling must be >= 1"));
        }
        Ok(())
    }

    /// Supersampling factor for this run.
    pub fn supersampling(&self) -> u32 {
        self.constants.supersampling(self.full_resolution)
    }

    /// Output directory tree for this run.
    pub fn layout(&self) -> OutputLayout {
        OutputLayout::new(&self.output_dir)
    }
}

/// Directory tree written by a run.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct OutputLayout {
    /// Output root.
    pub root: PathBuf,
    /// Intermediate artifacts.
    pub temp: PathBuf,
    /// Renderer output images.
    pub renders: PathBuf,
    /// Generated meshes, materials and texture.
    pub obj: PathBuf,
    /// Final deliverables.
    pub bin: PathBuf,
    /// Final per-structure images.
    pub images: PathBuf,
}

impl OutputLayout {
    /// Derive the tree under `root`.
    pub fn new(root: impl AsRef<Path>) -> Self {
        let root = root.as_ref().to_path_buf();
        let temp = root.join("temp");
        let bin = root.join("bin");
        Self {
            renders: temp.join("renders"),
            obj: temp.join("obj"),
            images: bin.join("images"),
            root,
            temp,
            bin,
        }
    }

    /// Create every directory of the tree.
    pub fn create_all(&self) -> IsovoxResult<()> {
        for dir in [&self.renders, &self.obj, &self.images] {
            std::fs::create_dir_all(dir)
                .with_context(|| format!("failed to create directory '{}'", dir.display()))?;
        }
        Ok(())
    }

    /// Remove and recreate the final image directory.
    pub fn reset_images(&self) -> IsovoxResult<()> {
        if self.images.exists() {
            std::fs::remove_dir_all(&self.images).with_context(|| {
                format!("failed to clear directory '{}'", self.images.display())
            })?;
        }
        std::fs::create_dir_all(&self.images)
            .with_context(|| format!("failed to create directory '{}'", self.images.display()))?;
        Ok(())
    }
}

/// First `*.vox` file in `dir`, by file name.
pub fn find_default_vox(dir: &Path) -> IsovoxResult<PathBuf> {
    let entries = std::fs::read_dir(dir)
        .with_context(|| format!("failed to list directory '{}'", dir.display()))?;
    let mut found = Vec::new();
    for entry in entries {
        let path = entry
            .with_context(|| format!("failed to read entry in '{}'", dir.display()))?
            .path();
        let is_vox = path
            .extension()
            .is_some_and(|ext| ext.eq_ignore_ascii_case("vox"));
        if is_vox && path.is_file() {
            found.push(path);
        }
    }
    found.sort();
    found.into_iter().next().ok_or_else(|| {
        IsovoxError::validation(format!("no .vox file found in '{}'", dir.display()))
    })
}

#[cfg(test)]
#[path = "../../tests/unit/foundation/config.rs"]
mod tests;
