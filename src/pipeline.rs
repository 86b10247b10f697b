use std::path::PathBuf;

use rayon::prelude::*;

use crate::foundation::config::{OutputLayout, RunConfig};
use crate::foundation::error::{IsovoxError, IsovoxResult};
use crate::mesh::obj::{write_occluded_obj, write_structure_obj, write_volume_obj};
use crate::mesh::occluded::build_occluded_mesh;
use crate::mesh::structure_mesh::{StructureMeshSettings, build_structure_mesh};
use crate::mesh::texture::{PaletteTexture, TEXTURE_FILE, write_materials};
use crate::mesh::volume::VolumeMesh;
use crate::projection::framing::{RenderParams, frame_scene, frame_structures, scene_polygon};
use crate::render::blender::BlenderInvocation;
use crate::render::records::{write_render_params, write_structure_infos};
use crate::repair::postprocess::{RepairSettings, repair_all};
use crate::scene::flatten::flatten_scene;
use crate::scene::graph::SceneGraph;
use crate::scene::structure::{Structure, place_structures};
use crate::voxels::visibility::{VisibleVoxel, all_frame_visibility};
use crate::voxels::world_map::WorldVisibilityMap;

#[derive(Clone, Debug, PartialEq)]
/// Summary of a finished run.
pub struct RunReport {
    /// Structures found in the scene.
    pub structures: usize,
    /// Whole-scene framing handed to the renderer.
    pub scene: RenderParams,
    /// Structures that got an occluded-face mesh.
    pub occluded_meshes: usize,
    /// Final per-structure images; empty for scene test runs.
    pub images: Vec<PathBuf>,
}

#[derive(Clone, Debug)]
/// Everything produced before the external renderer runs.
pub struct Generated {
    /// Placed and framed structures.
    pub structures: Vec<Structure>,
    /// Whole-scene framing.
    pub scene: RenderParams,
    /// Structures that got an occluded-face mesh.
    pub occluded_meshes: usize,
}

/// Convert `cfg.vox_path` end to end: meshes, renderer run, then image repair.
#[tracing::instrument(skip(cfg), fields(vox = %cfg.vox_path.display()))]
pub fn run(cfg: &RunConfig) -> IsovoxResult<RunReport> {
    cfg.validate()?;
    let started = std::time::Instant::now();
    let pool = build_thread_pool(cfg.threads)?;
    let layout = cfg.layout();
    layout.create_all()?;

    let graph = crate::vox::load_scene(&cfg.vox_path)?;
    let generated = pool.install(|| generate(&graph, cfg, &layout))?;

    BlenderInvocation::new(
        &cfg.renderer,
        &layout,
        cfg.scene_test_run,
        cfg.full_samples,
        generated.scene,
    )
    .run()?;

    let images = if cfg.scene_test_run {
        Vec::new()
    } else {
        let settings = RepairSettings::new(&cfg.constants, cfg.full_resolution);
        pool.install(|| repair_all(&generated.structures, &layout, &settings))?
    };

    tracing::info!(
        elapsed_ms = started.elapsed().as_millis() as u64,
        structures = generated.structures.len(),
        "vox successfully processed"
    );
    Ok(RunReport {
        structures: generated.structures.len(),
        scene: generated.scene,
        occluded_meshes: generated.occluded_meshes,
        images,
    })
}

/// Every stage before the renderer: flatten, place and frame the scene, write the records,
/// then build and write the meshes.
///
/// Runs on the current rayon pool.
pub fn generate(
    graph: &SceneGraph,
    cfg: &RunConfig,
    layout: &OutputLayout,
) -> IsovoxResult<Generated> {
    let constants = &cfg.constants;
    let mut structures = flatten_scene(graph, constants)?;
    place_structures(&mut structures, cfg.min_tile_x, cfg.min_tile_z, constants)?;

    let supersampling = cfg.supersampling();
    let scene = frame_scene(&scene_polygon(&structures), supersampling, constants)?;
    frame_structures(&mut structures, supersampling, constants);

    write_structure_infos(&layout.bin, &structures)?;
    if !cfg.scene_test_run {
        write_render_params(&layout.obj, &structures)?;
    }

    let occluded_meshes = build_meshes(graph, &structures, cfg, layout)?;
    Ok(Generated {
        structures,
        scene,
        occluded_meshes,
    })
}

/// Visibility, the world map, the palette texture and every structure's OBJ files.
///
/// Volume and occluded-face meshes are skipped for scene test runs. Returns how many
/// occluded-face meshes were written.
#[tracing::instrument(skip_all, fields(structures = structures.len()))]
pub fn build_meshes(
    graph: &SceneGraph,
    structures: &[Structure],
    cfg: &RunConfig,
    layout: &OutputLayout,
) -> IsovoxResult<usize> {
    let started = std::time::Instant::now();
    let frame_voxels = all_frame_visibility(&graph.frames);
    let world = WorldVisibilityMap::populate(structures, &frame_voxels)?;

    let texture = PaletteTexture::from_scene(graph)?;
    texture.write_png(&layout.obj.join(TEXTURE_FILE))?;
    write_materials(&layout.obj, !cfg.scene_test_run)?;

    let settings = StructureMeshSettings {
        divisor: cfg.constants.world_unit_divisor,
        cull_ground_faces: cfg.cull_ground_faces,
    };
    let results = structures
        .par_iter()
        .map(|s| write_structure_meshes(s, &frame_voxels, &world, &texture, settings, cfg, layout))
        .collect::<Vec<_>>();
    let mut occluded = 0;
    for r in results {
        if r? {
            occluded += 1;
        }
    }

    tracing::info!(
        elapsed_ms = started.elapsed().as_millis() as u64,
        occluded,
        "meshes written"
    );
    Ok(occluded)
}

fn write_structure_meshes(
    structure: &Structure,
    frame_voxels: &[Vec<VisibleVoxel>],
    world: &WorldVisibilityMap,
    texture: &PaletteTexture,
    settings: StructureMeshSettings,
    cfg: &RunConfig,
    layout: &OutputLayout,
) -> IsovoxResult<bool> {
    let name = &structure.name;
    let mesh = build_structure_mesh(structure, frame_voxels, world, texture, settings)?;
    write_structure_obj(&layout.obj, name, &mesh, texture)?;
    if cfg.scene_test_run {
        return Ok(false);
    }

    let volume = VolumeMesh::for_box(
        &structure.shape.source_box,
        structure.volume_type,
        settings.divisor,
    );
    write_volume_obj(&layout.obj, name, &volume)?;

    let occluded = build_occluded_mesh(structure, frame_voxels, world, settings.divisor)?;
    write_occluded_obj(&layout.obj, name, &occluded)
}

/// Expects `threads` already checked by [`RunConfig::validate`].
fn build_thread_pool(threads: Option<usize>) -> IsovoxResult<rayon::ThreadPool> {
    let mut builder = rayon::ThreadPoolBuilder::new();
    if let Some(n) = threads {
        builder = builder.num_threads(n);
    }
    builder
        .build()
        .map_err(|e| IsovoxError::validation(format!("failed to build rayon thread pool: {e}")))
}

#[cfg(test)]
#[path = "../tests/unit/pipeline.rs"]
mod tests;
