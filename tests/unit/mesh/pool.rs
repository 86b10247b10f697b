use super::*;

#[test]
fn repeated_point_reuses_its_index() {
    let mut pool = VertexPool::default();
    let a = Vertex::new(0.1, 0.2, 0.3);
    assert_eq!(pool.insert(a), 1);
    assert_eq!(pool.insert(a), 1);
    assert_eq!(pool.len(), 1);
}

#[test]
fn distinct_points_number_in_first_seen_order() {
    let mut pool = VertexPool::default();
    let points = [
        Vertex::new(1.0, 0.0, 0.0),
        Vertex::new(0.0, 1.0, 0.0),
        Vertex::new(0.0, 0.0, 1.0),
    ];
    let indices: Vec<u32> = points.iter().map(|p| pool.insert(*p)).collect();
    assert_eq!(indices, [1, 2, 3]);
    assert_eq!(pool.vertices(), &points);
}

#[test]
fn signed_zero_is_one_vertex() {
    let mut pool = VertexPool::default();
    assert_eq!(pool.insert(Vertex::new(0.0, 1.0, 0.0)), 1);
    assert_eq!(pool.insert(Vertex::new(-0.0, 1.0, -0.0)), 1);
}

#[test]
fn world_units_round_to_one_decimal() {
    assert_eq!(to_world(15, 10.0), 1.5);
    assert_eq!(to_world(-3, 10.0), -0.3);
    assert_eq!(to_world(0, 10.0), 0.0);
}

#[test]
fn cube_faces_share_eight_corners() {
    let corners = box_corners(&IntBox::new(0, 10, 0, 10, 0, 10), 10.0);
    assert_eq!(corners[0], Vertex::new(0.0, 0.0, 0.0));
    assert_eq!(corners[6], Vertex::new(1.0, 1.0, 1.0));

    let mut mesh = MeshBuffer::default();
    for d in Direction::ALL {
        mesh.push_quad(Quad {
            corners: face_quad(&corners, d),
            texcoord: 1,
            normal: normal_number(d),
        });
    }
    assert_eq!(mesh.pool.len(), 8);
    assert_eq!(mesh.faces.len(), 6);
    assert_eq!(mesh.faces[0].vertices, [1, 2, 3, 4]);
    assert_eq!(mesh.faces[0].normal, 1);
    assert_eq!(mesh.faces[5].normal, 6);
}

#[test]
fn windings_point_outwards() {
    let corners = box_corners(&IntBox::new(0, 10, 0, 10, 0, 10), 10.0);
    for d in Direction::ALL {
        let [a, b, c, _] = face_quad(&corners, d);
        let u = [b.x - a.x, b.y - a.y, b.z - a.z];
        let v = [c.x - a.x, c.y - a.y, c.z - a.z];
        let n = [
            u[1] * v[2] - u[2] * v[1],
            u[2] * v[0] - u[0] * v[2],
            u[0] * v[1] - u[1] * v[0],
        ];
        let unit = d.unit();
        let dot = n[0] * unit.x as f32 + n[1] * unit.y as f32 + n[2] * unit.z as f32;
        assert!(dot > 0.0, "{d:?} winds inwards");
    }
}
