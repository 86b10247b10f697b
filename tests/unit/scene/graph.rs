use super::*;
use glam::IVec3;

#[test]
fn padded_indexing_roundtrips() {
    let frame = VoxelFrame::new(IVec3::new(3, 2, 4)).unwrap();
    assert_eq!(frame.padded_dims(), IVec3::new(4, 3, 5));

    let p = IVec3::new(2, 1, 3);
    let i = frame.linear_index(p).unwrap();
    assert_eq!(i, 2 + 4 + 3 * 12);
    assert_eq!(frame.position_of(i), p);
    assert_eq!(frame.linear_index(IVec3::new(4, 0, 0)), None);
    assert_eq!(frame.linear_index(IVec3::new(-1, 0, 0)), None);
}

#[test]
fn set_rejects_padding_plane_and_outside() {
    let mut frame = VoxelFrame::new(IVec3::new(2, 2, 2)).unwrap();
    frame.set(IVec3::new(1, 1, 1), 7).unwrap();
    assert!(frame.set(IVec3::new(2, 0, 0), 1).is_err());
    assert!(frame.set(IVec3::new(0, -1, 0), 1).is_err());
    assert!(frame.is_occupied(IVec3::new(1, 1, 1)));
    assert!(!frame.is_occupied(IVec3::new(0, 0, 0)));
    assert!(!frame.is_occupied(IVec3::new(9, 9, 9)));
    assert_eq!(frame.cells().collect::<Vec<_>>(), vec![(1 + 3 + 9, 7)]);
}

#[test]
fn zero_sized_frame_is_invalid() {
    assert!(VoxelFrame::new(IVec3::new(0, 1, 1)).is_err());
}

#[test]
fn lookups_report_missing_nodes() {
    let g = SceneGraph::default();
    assert!(matches!(g.frame(0), Err(IsovoxError::Scene(_))));
    assert!(matches!(g.shape(3), Err(IsovoxError::Scene(_))));
    assert!(matches!(g.transform(1), Err(IsovoxError::Scene(_))));
    assert!(matches!(g.group(0), Err(IsovoxError::Scene(_))));
    assert_eq!(g.color(5), [0, 0, 0, 255]);
}
