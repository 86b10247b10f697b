use super::*;
use glam::IVec3;

#[test]
fn flat_index_is_column_major() {
    let m = IntAffine::translate(IVec3::new(7, 8, 9));
    assert_eq!(m.get_flat(12).unwrap(), 7);
    assert_eq!(m.get(0, 3).unwrap(), 7);
    assert_eq!(m.get(2, 3).unwrap(), 9);
    assert_eq!(m.row(1).unwrap(), IVec4::new(0, 1, 0, 8));
    assert_eq!(m.column(3).unwrap(), IVec4::new(7, 8, 9, 1));
}

#[test]
fn out_of_range_indices_fail() {
    let mut m = IntAffine::IDENTITY;
    assert!(m.get(4, 0).is_err());
    assert!(m.get_flat(16).is_err());
    assert!(m.set(0, 4, 1).is_err());
    assert!(m.set_flat(99, 1).is_err());
    assert!(m.row(4).is_err());
    assert!(m.set_column(5, IVec4::default()).is_err());
}

#[test]
fn set_row_and_column_roundtrip() {
    let mut m = IntAffine::ZERO;
    m.set_row(2, IVec4::new(1, 2, 3, 4)).unwrap();
    assert_eq!(m.get(2, 1).unwrap(), 2);
    m.set_column(0, IVec4::new(5, 6, 7, 8)).unwrap();
    assert_eq!(m.row(2).unwrap(), IVec4::new(7, 2, 3, 4));
    m.set(3, 3, 11).unwrap();
    assert_eq!(m.get_flat(15).unwrap(), 11);
}

#[test]
fn composition_applies_right_to_left() {
    // Rotate 90 degrees about Z: x -> y, y -> -x.
    let rot = IntAffine::from_rows([[0, -1, 0, 0], [1, 0, 0, 0], [0, 0, 1, 0], [0, 0, 0, 1]]);
    let t = IntAffine::translate(IVec3::new(10, 0, 0));

    let rotate_then_translate = t * rot;
    assert_eq!(
        rotate_then_translate.transform_point(IVec3::new(1, 0, 0)),
        IVec3::new(10, 1, 0)
    );

    let translate_then_rotate = rot * t;
    assert_eq!(
        translate_then_rotate.transform_point(IVec3::new(1, 0, 0)),
        IVec3::new(0, 11, 0)
    );
}

#[test]
fn identity_is_neutral() {
    let m = IntAffine::translate(IVec3::new(1, -2, 3)) * IntAffine::scale(IVec3::new(2, 2, 2));
    assert_eq!(m * IntAffine::IDENTITY, m);
    assert_eq!(IntAffine::IDENTITY * m, m);
    assert_eq!(IntAffine::default(), IntAffine::IDENTITY);
}

#[test]
fn vector_transform_ignores_translation() {
    let m = IntAffine::translate(IVec3::new(100, 100, 100)) * IntAffine::scale(IVec3::new(-1, 1, 2));
    assert_eq!(m.transform_vector(IVec3::new(1, 1, 1)), IVec3::new(-1, 1, 2));
    assert_eq!(m.transform_point3x4(IVec3::new(1, 1, 1)), IVec3::new(99, 101, 102));
    assert_eq!(m.transform_point(IVec3::new(1, 1, 1)), IVec3::new(99, 101, 102));
}

#[test]
fn point_transform_divides_by_w() {
    let mut m = IntAffine::IDENTITY;
    m.set(3, 3, 2).unwrap();
    assert_eq!(m.transform_point(IVec3::new(4, 6, -8)), IVec3::new(2, 3, -4));
    assert_eq!(m.transform_point3x4(IVec3::new(4, 6, -8)), IVec3::new(4, 6, -8));
}

#[test]
fn rotation_part_drops_translation() {
    let rot = IntAffine::from_rows([[0, 0, 1, 0], [0, 1, 0, 0], [-1, 0, 0, 0], [0, 0, 0, 1]]);
    let m = IntAffine::translate(IVec3::new(3, 4, 5)) * rot;
    assert_eq!(m.rotation_part(), rot);
    assert_eq!(m.translation(), IVec3::new(3, 4, 5));
}
