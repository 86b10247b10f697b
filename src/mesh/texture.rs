use std::collections::BTreeSet;
use std::path::Path;

use anyhow::Context as _;

use crate::foundation::error::{IsovoxError, IsovoxResult};
use crate::scene::graph::SceneGraph;

pub const TEXTURE_FILE: &str = "texture.png";
pub const STRUCTURES_MTL: &str = "structures.mtl";
pub const SHARED_MTL: &str = "shared.mtl";

const STRUCTURES_MTL_BODY: &str = "newmtl palette
illum 1
Ka 0.000 0.000 0.000
Kd 1.000 1.000 1.000
Ks 0.000 0.000 0.000
map_Kd texture.png
";

const SHARED_MTL_BODY: &str = "newmtl red_mtl
Kd 1.0 0.0 0.0
";

/// One-row texture holding one opaque texel per used palette color.
#[derive(Clone, Debug)]
pub struct PaletteTexture {
    texels: Vec<(u8, [u8; 4])>,
    numbers: [u32; 256],
}

impl PaletteTexture {
    /// Texels for the palette indices in `used`, sorted ascending.
    pub fn from_used(
        used: impl IntoIterator<Item = u8>,
        color: impl Fn(u8) -> [u8; 4],
    ) -> IsovoxResult<Self> {
        let used: BTreeSet<u8> = used.into_iter().collect();
        if used.is_empty() {
            return Err(IsovoxError::mesh("scene uses no palette colors"));
        }
        let mut numbers = [0u32; 256];
        let texels = used
            .into_iter()
            .enumerate()
            .map(|(i, index)| {
                numbers[usize::from(index)] = i as u32 + 1;
                let [r, g, b, _] = color(index);
                (index, [r, g, b, 255])
            })
            .collect();
        Ok(Self { texels, numbers })
    }

    /// Texels for every palette index occupied in any frame of `graph`.
    pub fn from_scene(graph: &SceneGraph) -> IsovoxResult<Self> {
        let used = graph
            .frames
            .iter()
            .flat_map(|f| f.cells().map(|(_, color)| color));
        Self::from_used(used, |i| graph.color(i))
    }

    pub fn len(&self) -> usize {
        self.texels.len()
    }

    pub fn is_empty(&self) -> bool {
        self.texels.is_empty()
    }

    /// 1-based `vt` line of palette index `index`.
    pub fn texcoord_number(&self, index: u8) -> IsovoxResult<u32> {
        match self.numbers[usize::from(index)] {
            0 => Err(IsovoxError::mesh(format!(
                "palette index {index} has no texel"
            ))),
            n => Ok(n),
        }
    }

    /// `(u, v)` at the center of each texel, in `vt` order.
    pub fn texcoords(&self) -> impl Iterator<Item = (f64, f64)> + '_ {
        let n = self.texels.len() as f64;
        (0..self.texels.len()).map(move |i| ((i as f64 + 0.5) / n, 0.5))
    }

    pub fn to_image(&self) -> image::RgbaImage {
        let mut img = image::RgbaImage::new(self.texels.len() as u32, 1);
        for (x, (_, rgba)) in self.texels.iter().enumerate() {
            img.put_pixel(x as u32, 0, image::Rgba(*rgba));
        }
        img
    }

    pub fn write_png(&self, path: &Path) -> IsovoxResult<()> {
        self.to_image()
            .save_with_format(path, image::ImageFormat::Png)
            .with_context(|| format!("failed to write texture '{}'", path.display()))?;
        tracing::debug!(path = %path.display(), texels = self.len(), "wrote palette texture");
        Ok(())
    }
}

/// Write `structures.mtl`, plus `shared.mtl` for the occluded and volume meshes.
pub fn write_materials(dir: &Path, include_shared: bool) -> IsovoxResult<()> {
    let mut files = vec![(STRUCTURES_MTL, STRUCTURES_MTL_BODY)];
    if include_shared {
        files.push((SHARED_MTL, SHARED_MTL_BODY));
    }
    for (name, body) in files {
        let path = dir.join(name);
        std::fs::write(&path, body)
            .with_context(|| format!("failed to write material '{}'", path.display()))?;
        tracing::debug!(path = %path.display(), "wrote material");
    }
    Ok(())
}

#[cfg(test)]
#[path = "../../tests/unit/mesh/texture.rs"]
mod tests;
