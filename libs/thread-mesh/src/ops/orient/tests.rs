//! # Orientation Tests

use super::*;
use crate::topology::TopologyReport;
use glam::DVec3;

fn tetrahedron(mesh: &mut PolyMesh, offset: DVec3, loops: [[usize; 3]; 4]) {
    let ids = [
        mesh.add_vertex(offset),
        mesh.add_vertex(offset + DVec3::X),
        mesh.add_vertex(offset + DVec3::Y),
        mesh.add_vertex(offset + DVec3::Z),
    ];
    for l in loops {
        mesh.add_face(&[ids[l[0]], ids[l[1]], ids[l[2]]]).unwrap();
    }
}

const OUTWARD: [[usize; 3]; 4] = [[0, 2, 1], [0, 1, 3], [0, 3, 2], [1, 2, 3]];
const ONE_FLIPPED: [[usize; 3]; 4] = [[0, 2, 1], [0, 1, 3], [0, 3, 2], [1, 3, 2]];
const INWARD: [[usize; 3]; 4] = [[0, 1, 2], [0, 3, 1], [0, 2, 3], [1, 3, 2]];

#[test]
fn test_consistent_mesh_untouched() {
    let mut mesh = PolyMesh::new();
    tetrahedron(&mut mesh, DVec3::ZERO, OUTWARD);
    assert_eq!(make_consistent(&mut mesh).unwrap(), 0);
}

#[test]
fn test_single_flipped_face_repaired() {
    let mut mesh = PolyMesh::new();
    tetrahedron(&mut mesh, DVec3::ZERO, ONE_FLIPPED);
    assert!(!TopologyReport::analyze(&mesh).is_consistent());

    assert_eq!(make_consistent(&mut mesh).unwrap(), 1);
    let report = TopologyReport::analyze(&mesh);
    assert!(report.is_closed_solid());
}

#[test]
fn test_components_oriented_independently() {
    let mut mesh = PolyMesh::new();
    tetrahedron(&mut mesh, DVec3::ZERO, OUTWARD);
    tetrahedron(&mut mesh, DVec3::splat(5.0), INWARD);

    assert_eq!(make_consistent(&mut mesh).unwrap(), 4);
    let report = TopologyReport::analyze(&mesh);
    assert!(report.is_closed_solid());
    assert!((report.signed_volume - 2.0 / 6.0).abs() < 1e-12);
}
