use std::path::{Path, PathBuf};

use anyhow::Context as _;
use serde::ser::{SerializeMap as _, Serializer};

use crate::foundation::error::{IsovoxError, IsovoxResult};
use crate::geometry::int_box::IntBox;
use crate::projection::framing::RenderParams;
use crate::scene::structure::{ImageDimensions, Structure, VolumeType};

pub const RENDER_PARAMS_FILE: &str = "render_params.json";
pub const STRUCTURE_INFOS_FILE: &str = "structure_infos.json";

/// Public description of one structure in `structure_infos.json`.
#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StructureInfo {
    pub name: String,
    pub image_dimensions: ImageDimensions,
    pub volume_type: VolumeType,
    pub shape_info: ShapeInfo,
}

#[derive(Clone, Copy, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct ShapeInfo {
    /// Target-space bounds after placement.
    pub location: IntBox,
}

impl From<&Structure> for StructureInfo {
    fn from(s: &Structure) -> Self {
        Self {
            name: s.name.clone(),
            image_dimensions: s.image_dimensions,
            volume_type: s.volume_type,
            shape_info: ShapeInfo {
                location: s.shape.target_box,
            },
        }
    }
}

/// Structure name to framing, in structure order.
struct ParamsByName<'a>(Vec<(&'a str, &'a RenderParams)>);

impl serde::Serialize for ParamsByName<'_> {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.0.len()))?;
        for (name, params) in &self.0 {
            map.serialize_entry(name, params)?;
        }
        map.end()
    }
}

fn write_json(path: &Path, value: &impl serde::Serialize) -> IsovoxResult<()> {
    let json = serde_json::to_string_pretty(value)
        .map_err(|e| IsovoxError::serde(format!("{}: {e}", path.display())))?;
    std::fs::write(path, json).with_context(|| format!("write '{}'", path.display()))?;
    tracing::debug!(path = %path.display(), "record written");
    Ok(())
}

/// Write `render_params.json` into `obj_dir` for the renderer script.
///
/// Every structure must already be framed.
pub fn write_render_params(obj_dir: &Path, structures: &[Structure]) -> IsovoxResult<PathBuf> {
    let mut entries = Vec::with_capacity(structures.len());
    for s in structures {
        let params = s.render_params.as_ref().ok_or_else(|| {
            IsovoxError::render(format!("structure '{}' has no render framing", s.name))
        })?;
        entries.push((s.name.as_str(), params));
    }
    let path = obj_dir.join(RENDER_PARAMS_FILE);
    write_json(&path, &ParamsByName(entries))?;
    Ok(path)
}

/// Write `structure_infos.json` into `bin_dir`.
pub fn write_structure_infos(bin_dir: &Path, structures: &[Structure]) -> IsovoxResult<PathBuf> {
    let infos: Vec<StructureInfo> = structures.iter().map(StructureInfo::from).collect();
    let path = bin_dir.join(STRUCTURE_INFOS_FILE);
    write_json(&path, &infos)?;
    tracing::info!(path = %path.display(), structures = infos.len(), "structure infos written");
    Ok(path)
}

#[cfg(test)]
#[path = "../../tests/unit/render/records.rs"]
mod tests;
