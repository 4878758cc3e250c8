//! # Extrude Tests

use super::*;
use crate::error::MeshError;
use crate::topology::TopologyReport;
use glam::DVec3;

#[test]
fn test_free_edge_keeps_stored_direction() {
    let mut mesh = PolyMesh::new();
    let a = mesh.add_vertex(DVec3::ZERO);
    let b = mesh.add_vertex(DVec3::X);
    let e = mesh.add_edge(a, b).unwrap();

    let out = extrude_edges(&mut mesh, &[e], false).unwrap();
    let face = mesh.face(out.created.faces[0]).unwrap();
    assert_eq!(&face[..2], &[a, b]);
}

#[test]
fn test_free_edge_flipped() {
    let mut mesh = PolyMesh::new();
    let a = mesh.add_vertex(DVec3::ZERO);
    let b = mesh.add_vertex(DVec3::X);
    let e = mesh.add_edge(a, b).unwrap();

    let out = extrude_edges(&mut mesh, &[e], true).unwrap();
    let face = mesh.face(out.created.faces[0]).unwrap();
    assert_eq!(&face[..2], &[b, a]);
}

#[test]
fn test_bridge_continues_face_winding() {
    let mut mesh = PolyMesh::new();
    let a = mesh.add_vertex(DVec3::ZERO);
    let b = mesh.add_vertex(DVec3::X);
    let c = mesh.add_vertex(DVec3::Y);
    mesh.add_face(&[a, b, c]).unwrap();
    let ab = mesh.find_edge(a, b).unwrap();

    // The flag only applies to free edges
    let out = extrude_edges(&mut mesh, &[ab], true).unwrap();
    for v in &out.created.vertices {
        let p = mesh.position(*v).unwrap();
        mesh.set_position(*v, p - DVec3::Y).unwrap();
    }

    let report = TopologyReport::analyze(&mesh);
    assert!(report.is_consistent());
    assert_eq!(report.open_edges, 5);
}

#[test]
fn test_chain_shares_copies() {
    let mut mesh = PolyMesh::new();
    let ids: Vec<_> = (0..4)
        .map(|i| mesh.add_vertex(DVec3::new(i as f64, 0.0, 0.0)))
        .collect();
    let edges: Vec<_> = ids
        .windows(2)
        .map(|w| mesh.add_edge(w[0], w[1]).unwrap())
        .collect();

    let out = extrude_edges(&mut mesh, &edges, false).unwrap();
    assert_eq!(out.created.vertices.len(), 4);
    assert_eq!(out.created.faces.len(), 3);
    assert_eq!(out.boundary.len(), 3);
    // 4 bridges + 3 copies
    assert_eq!(out.created.edges.len(), 7);
}

#[test]
fn test_repeated_extrusion_stays_consistent() {
    let mut mesh = PolyMesh::new();
    let ids: Vec<_> = (0..3)
        .map(|i| mesh.add_vertex(DVec3::new(i as f64, 0.0, 0.0)))
        .collect();
    let edges: Vec<_> = ids
        .windows(2)
        .map(|w| mesh.add_edge(w[0], w[1]).unwrap())
        .collect();

    let first = extrude_edges(&mut mesh, &edges, true).unwrap();
    for v in &first.created.vertices {
        let p = mesh.position(*v).unwrap();
        mesh.set_position(*v, p + DVec3::Z).unwrap();
    }
    let second = extrude_edges(&mut mesh, &first.boundary, true).unwrap();
    for v in &second.created.vertices {
        let p = mesh.position(*v).unwrap();
        mesh.set_position(*v, p + DVec3::Z).unwrap();
    }

    let report = TopologyReport::analyze(&mesh);
    assert!(report.is_consistent());
    assert_eq!(report.face_count, 4);
}

#[test]
fn test_unknown_edge() {
    let mut mesh = PolyMesh::new();
    let err = extrude_edges(&mut mesh, &[EdgeId(3)], false).unwrap_err();
    assert!(matches!(err, MeshError::InvalidReference { .. }));
}
