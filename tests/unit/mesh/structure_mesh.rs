use super::*;
use crate::geometry::affine::IntAffine;
use crate::scene::graph::VoxelFrame;
use crate::scene::structure::VolumeType;
use crate::voxels::visibility::frame_visibility;
use glam::IVec3;

const SETTINGS: StructureMeshSettings = StructureMeshSettings {
    divisor: 10.0,
    cull_ground_faces: false,
};

fn unit_frames(color: u8) -> Vec<Vec<VisibleVoxel>> {
    let mut frame = VoxelFrame::new(IVec3::new(1, 1, 1)).unwrap();
    frame.set(IVec3::ZERO, color).unwrap();
    vec![frame_visibility(&frame)]
}

fn single(transform: IntAffine) -> Structure {
    let leaf = ShapeNode::leaf(0, IVec3::new(1, 1, 1), transform).unwrap();
    Structure::new("structure0", VolumeType::Cuboid, leaf)
}

fn pair() -> Structure {
    let a = ShapeNode::leaf(0, IVec3::new(1, 1, 1), IntAffine::IDENTITY).unwrap();
    let b = ShapeNode::leaf(0, IVec3::new(1, 1, 1), IntAffine::translate(IVec3::new(1, 0, 0)))
        .unwrap();
    let group = ShapeNode::group(vec![a, b], IntAffine::IDENTITY, IntBox::new(0, 2, 0, 1, 0, 1))
        .unwrap();
    Structure::new("structure0", VolumeType::Cuboid, group)
}

fn mesh_for(structures: &[Structure], settings: StructureMeshSettings) -> MeshBuffer {
    let frames = unit_frames(6);
    let world = WorldVisibilityMap::populate(structures, &frames).unwrap();
    let texture = PaletteTexture::from_used([2, 6], |_| [0, 0, 0, 255]).unwrap();
    build_structure_mesh(&structures[0], &frames, &world, &texture, settings).unwrap()
}

#[test]
fn lone_voxel_is_a_closed_cube() {
    let mesh = mesh_for(&[single(IntAffine::translate(IVec3::new(0, 0, 3)))], SETTINGS);
    assert_eq!(mesh.pool.len(), 8);
    assert_eq!(mesh.faces.len(), 6);
    let normals: Vec<u32> = mesh.faces.iter().map(|f| f.normal).collect();
    assert_eq!(normals, [1, 2, 3, 4, 5, 6]);
}

#[test]
fn faces_reference_their_palette_texel() {
    let mesh = mesh_for(&[single(IntAffine::IDENTITY)], SETTINGS);
    assert!(mesh.faces.iter().all(|f| f.texcoord == 2));
}

#[test]
fn adjacent_shapes_hide_each_other() {
    let mesh = mesh_for(&[pair()], SETTINGS);
    assert_eq!(mesh.faces.len(), 10);
    assert_eq!(mesh.pool.len(), 12);
    assert!(mesh.faces.iter().filter(|f| f.normal == 1).count() == 1);
    assert!(mesh.faces.iter().filter(|f| f.normal == 2).count() == 1);
}

#[test]
fn other_structures_occlude_too() {
    let structures = [
        single(IntAffine::IDENTITY),
        single(IntAffine::translate(IVec3::new(0, 0, 1))),
    ];
    let mesh = mesh_for(&structures, SETTINGS);
    assert_eq!(mesh.faces.len(), 5);
    assert!(mesh.faces.iter().all(|f| f.normal != 6));
}

#[test]
fn ground_faces_are_culled_only_when_asked() {
    let grounded = [single(IntAffine::IDENTITY)];
    assert_eq!(mesh_for(&grounded, SETTINGS).faces.len(), 6);

    let culling = StructureMeshSettings {
        cull_ground_faces: true,
        ..SETTINGS
    };
    let mesh = mesh_for(&grounded, culling);
    assert_eq!(mesh.faces.len(), 5);
    assert!(mesh.faces.iter().all(|f| f.normal != 5));

    let raised = [single(IntAffine::translate(IVec3::new(0, 0, 1)))];
    assert_eq!(mesh_for(&raised, culling).faces.len(), 6);
}

#[test]
fn voxel_absent_from_world_map_is_an_error() {
    let frames = unit_frames(6);
    let texture = PaletteTexture::from_used([6], |_| [0, 0, 0, 255]).unwrap();
    let err = build_structure_mesh(
        &single(IntAffine::IDENTITY),
        &frames,
        &WorldVisibilityMap::default(),
        &texture,
        SETTINGS,
    )
    .unwrap_err();
    assert!(matches!(err, IsovoxError::Mesh(_)));
}
