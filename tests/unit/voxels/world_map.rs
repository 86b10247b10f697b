use super::*;
use crate::geometry::{affine::IntAffine, int_box::IntBox, rotation::Rotation};
use crate::scene::graph::VoxelFrame;
use crate::scene::structure::VolumeType;
use crate::voxels::visibility::{FaceVisibility, frame_visibility};
use glam::IVec3;

fn single_voxel_frames() -> Vec<Vec<VisibleVoxel>> {
    let mut frame = VoxelFrame::new(IVec3::new(1, 1, 1)).unwrap();
    frame.set(IVec3::ZERO, 1).unwrap();
    vec![frame_visibility(&frame)]
}

fn pair_structure() -> Structure {
    let a = ShapeNode::leaf(0, IVec3::new(1, 1, 1), IntAffine::IDENTITY).unwrap();
    let b = ShapeNode::leaf(0, IVec3::new(1, 1, 1), IntAffine::translate(IVec3::new(1, 0, 0)))
        .unwrap();
    let group = ShapeNode::group(vec![a, b], IntAffine::IDENTITY, IntBox::new(0, 2, 0, 1, 0, 1))
        .unwrap();
    Structure::new("structure0", VolumeType::Cuboid, group)
}

#[test]
fn leaves_write_their_transformed_corners() {
    let map = WorldVisibilityMap::populate(&[pair_structure()], &single_voxel_frames()).unwrap();
    assert_eq!(map.len(), 2);
    assert!(map.contains(IVec3::ZERO));
    assert!(map.contains(IVec3::new(1, 0, 0)));
    assert!(map.occluded(IVec3::ZERO, Direction::PlusX));
    assert!(map.occluded(IVec3::new(1, 0, 0), Direction::MinusX));
    assert!(!map.occluded(IVec3::ZERO, Direction::MinusX));
    assert!(!map.occluded(IVec3::ZERO, Direction::PlusZ));
}

#[test]
fn rotated_leaf_stores_world_keyed_faces() {
    let mut frame = VoxelFrame::new(IVec3::new(2, 1, 1)).unwrap();
    frame.set(IVec3::ZERO, 1).unwrap();
    frame.set(IVec3::new(1, 0, 0), 1).unwrap();
    let frames = vec![frame_visibility(&frame)];

    // Byte 1 maps local +X onto world +Y.
    let rotation = Rotation::from_byte(0b0000_0001).unwrap().to_affine();
    let leaf = ShapeNode::leaf(0, IVec3::new(2, 1, 1), rotation).unwrap();
    assert_eq!(leaf.directions.world_of(Direction::PlusX), Direction::PlusY);

    let entries = shape_entries(&leaf, &frames).unwrap();
    assert_eq!(entries.len(), 2);
    // The first voxel's +X face is shared with its neighbor, so world +Y is hidden.
    let (_, faces) = entries
        .iter()
        .find(|(_, f)| f.get(Direction::PlusY) == FaceVisibility::Hidden)
        .unwrap();
    assert_eq!(faces.get(Direction::MinusY), FaceVisibility::VisibleAtFrameEdge);
}

#[test]
fn missing_frame_data_is_a_scene_error() {
    let leaf = ShapeNode::leaf(4, IVec3::new(1, 1, 1), IntAffine::IDENTITY).unwrap();
    let s = Structure::new("structure0", VolumeType::Cuboid, leaf);
    let err = WorldVisibilityMap::populate(&[s], &single_voxel_frames()).unwrap_err();
    assert!(matches!(err, IsovoxError::Scene(_)));
}

#[test]
fn later_shape_wins_a_shared_key() {
    let mut map = WorldVisibilityMap::default();
    let mut first = FaceVisibilities::default();
    first.set(Direction::PlusZ, FaceVisibility::Visible);
    map.insert(IVec3::ZERO, first);
    map.insert(IVec3::ZERO, FaceVisibilities::default());
    assert_eq!(map.get(IVec3::ZERO), Some(&FaceVisibilities::default()));
    assert!(!map.is_empty());
}

#[test]
fn empty_map_answers_lookups() {
    let mut map = WorldVisibilityMap::default();
    assert!(map.is_empty());
    assert_eq!(map.len(), 0);
    assert_eq!(map.get(IVec3::ONE), None);
    assert!(!map.contains(IVec3::ONE));

    map.insert(IVec3::ONE, FaceVisibilities::default());
    assert_eq!(map.len(), 1);
    assert!(map.contains(IVec3::ONE));
    assert!(!map.occluded(IVec3::ZERO, Direction::PlusX));
}
