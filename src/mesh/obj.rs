//! OBJ text for the renderer.
//!
//! Vertices are written as `x z -y` because the renderer's importer swaps and negates those
//! axes on load.

use std::fmt::{self, Write as _};
use std::path::Path;

use anyhow::Context as _;

use crate::foundation::error::IsovoxResult;
use crate::mesh::pool::{MeshBuffer, Vertex};
use crate::mesh::texture::PaletteTexture;
use crate::mesh::volume::VolumeMesh;

const NORMALS: &str = "vn -1 0 0\nvn 1 0 0\nvn 0 0 1\nvn 0 0 -1\nvn 0 -1 0\nvn 0 1 0";

pub fn structure_obj_file(name: &str) -> String {
    format!("{name}.obj")
}

pub fn occluded_obj_file(name: &str) -> String {
    format!("{name}_occludedFaces.obj")
}

pub fn volume_obj_file(name: &str) -> String {
    format!("{name}_volume.obj")
}

fn negate(v: f32) -> f32 {
    if v == 0.0 { 0.0 } else { -v }
}

fn push_vertices<'a>(
    out: &mut String,
    vertices: impl IntoIterator<Item = &'a Vertex>,
) -> fmt::Result {
    out.push_str("\n# vertices\n");
    for v in vertices {
        writeln!(out, "v {} {} {}", v.x, v.z, negate(v.y))?;
    }
    Ok(())
}

/// Textured structure mesh with per-direction normals.
pub fn structure_obj(mesh: &MeshBuffer, texture: &PaletteTexture) -> Result<String, fmt::Error> {
    let mut out = String::new();
    out.push_str("# material\nmtllib structures.mtl\nusemtl palette\n");
    writeln!(out, "\n# normals\n{NORMALS}")?;
    out.push_str("\n# texcoords\n");
    for (u, v) in texture.texcoords() {
        writeln!(out, "vt {u} {v}")?;
    }
    push_vertices(&mut out, mesh.pool.vertices())?;
    out.push_str("\n# faces\n");
    for f in &mesh.faces {
        let [a, b, c, d] = f.vertices;
        let (t, n) = (f.texcoord, f.normal);
        writeln!(out, "f {a}/{t}/{n} {b}/{t}/{n} {c}/{t}/{n}")?;
        writeln!(out, "f {a}/{t}/{n} {c}/{t}/{n} {d}/{t}/{n}")?;
    }
    Ok(out)
}

/// Flat red mesh of covered faces.
pub fn occluded_obj(mesh: &MeshBuffer) -> Result<String, fmt::Error> {
    let mut out = String::new();
    out.push_str("# material\nmtllib shared.mtl\n");
    push_vertices(&mut out, mesh.pool.vertices())?;
    out.push_str("\n# faces\nusemtl red_mtl\n");
    for f in &mesh.faces {
        let [a, b, c, d] = f.vertices;
        writeln!(out, "f {a} {b} {c}")?;
        writeln!(out, "f {a} {c} {d}")?;
    }
    Ok(out)
}

/// Flat red hull mesh.
pub fn volume_obj(mesh: &VolumeMesh) -> Result<String, fmt::Error> {
    let mut out = String::new();
    out.push_str("# material\nmtllib shared.mtl\n");
    push_vertices(&mut out, &mesh.vertices)?;
    out.push_str("\n# faces\nusemtl red_mtl\n");
    for [a, b, c] in &mesh.triangles {
        writeln!(out, "f {a} {b} {c}")?;
    }
    Ok(out)
}

fn write_text(path: &Path, text: &str) -> IsovoxResult<()> {
    std::fs::write(path, text)
        .with_context(|| format!("failed to write obj '{}'", path.display()))?;
    tracing::debug!(path = %path.display(), bytes = text.len(), "wrote obj");
    Ok(())
}

pub fn write_structure_obj(
    dir: &Path,
    name: &str,
    mesh: &MeshBuffer,
    texture: &PaletteTexture,
) -> IsovoxResult<()> {
    let text = structure_obj(mesh, texture).context("failed to format structure obj")?;
    write_text(&dir.join(structure_obj_file(name)), &text)
}

/// Writes nothing for an empty mesh. Returns whether a file was written.
pub fn write_occluded_obj(dir: &Path, name: &str, mesh: &MeshBuffer) -> IsovoxResult<bool> {
    if mesh.pool.is_empty() {
        return Ok(false);
    }
    let text = occluded_obj(mesh).context("failed to format occluded obj")?;
    write_text(&dir.join(occluded_obj_file(name)), &text)?;
    Ok(true)
}

pub fn write_volume_obj(dir: &Path, name: &str, mesh: &VolumeMesh) -> IsovoxResult<()> {
    let text = volume_obj(mesh).context("failed to format volume obj")?;
    write_text(&dir.join(volume_obj_file(name)), &text)
}

#[cfg(test)]
#[path = "../../tests/unit/mesh/obj.rs"]
mod tests;
