use super::*;

fn unit_box() -> IntBox {
    IntBox::new(-10, 10, 0, 20, 0, 10)
}

#[test]
fn cuboid_has_eight_corners_and_twelve_triangles() {
    let mesh = VolumeMesh::for_box(&unit_box(), VolumeType::Cuboid, 10.0);
    assert_eq!(mesh.vertices.len(), 8);
    assert_eq!(mesh.triangles.len(), 12);
    assert_eq!(mesh.vertices[0], Vertex::new(1.0, 2.0, 0.0));
    assert_eq!(mesh.vertices[2], Vertex::new(-1.0, 0.0, 0.0));
    assert_eq!(mesh.vertices[7], Vertex::new(-1.0, 2.0, 1.0));
}

#[test]
fn prisms_have_six_corners_and_eight_triangles() {
    for t in [
        VolumeType::MinusXPrism,
        VolumeType::MinusZPrism,
        VolumeType::PlusXPrism,
        VolumeType::PlusZPrism,
    ] {
        let mesh = VolumeMesh::for_box(&unit_box(), t, 10.0);
        assert_eq!(mesh.vertices.len(), 6, "{t:?}");
        assert_eq!(mesh.triangles.len(), 8, "{t:?}");
        assert!(
            mesh.triangles.iter().flatten().all(|&i| (1..=6).contains(&i)),
            "{t:?}"
        );
    }
}

#[test]
fn prism_top_edges_follow_the_slope() {
    let minus_x = VolumeMesh::for_box(&unit_box(), VolumeType::MinusXPrism, 10.0);
    assert_eq!(minus_x.vertices[4], Vertex::new(1.0, 2.0, 1.0));
    assert_eq!(minus_x.vertices[5], Vertex::new(-1.0, 2.0, 1.0));

    let plus_z = VolumeMesh::for_box(&unit_box(), VolumeType::PlusZPrism, 10.0);
    assert_eq!(plus_z.vertices[4], Vertex::new(-1.0, 0.0, 1.0));
    assert_eq!(plus_z.vertices[5], Vertex::new(-1.0, 2.0, 1.0));
}
