//! # Transform Tests

use super::*;
use approx::assert_relative_eq;
use std::f64::consts::{FRAC_PI_2, TAU};

fn ring(mesh: &mut PolyMesh, n: usize, radius: f64, z: f64) -> Vec<VertexId> {
    (0..n)
        .map(|i| {
            let a = i as f64 * TAU / n as f64;
            mesh.add_vertex(DVec3::new(radius * a.cos(), radius * a.sin(), z))
        })
        .collect()
}

#[test]
fn test_translate_moves_duplicates_once() {
    let mut mesh = PolyMesh::new();
    let v = mesh.add_vertex(DVec3::ZERO);
    translate(&mut mesh, &[v, v, v], DVec3::Z).unwrap();
    assert_eq!(mesh.position(v).unwrap(), DVec3::Z);
}

#[test]
fn test_scale_xy_to_zero_collapses_ring() {
    let mut mesh = PolyMesh::new();
    let verts = ring(&mut mesh, 12, 1.48, 0.7);
    scale(&mut mesh, &verts, DVec3::new(0.0, 0.0, 1.0), DVec3::ZERO).unwrap();
    for v in verts {
        let p = mesh.position(v).unwrap();
        assert!(p.abs_diff_eq(DVec3::new(0.0, 0.0, 0.7), 1e-12));
    }
}

#[test]
fn test_scale_z_flattens_about_pivot() {
    let mut mesh = PolyMesh::new();
    let v = mesh.add_vertex(DVec3::new(1.0, 0.0, 3.0));
    scale(&mut mesh, &[v], DVec3::new(1.0, 1.0, 0.0), DVec3::new(0.0, 0.0, 2.0)).unwrap();
    assert!(mesh.position(v).unwrap().abs_diff_eq(DVec3::new(1.0, 0.0, 2.0), 1e-12));
}

#[test]
fn test_rotate_about_z() {
    let mut mesh = PolyMesh::new();
    let v = mesh.add_vertex(DVec3::new(2.0, 0.0, 1.0));
    rotate(&mut mesh, &[v], FRAC_PI_2, DVec3::Z, DVec3::ZERO).unwrap();
    assert!(mesh.position(v).unwrap().abs_diff_eq(DVec3::new(0.0, 2.0, 1.0), 1e-12));
}

#[test]
fn test_rotate_zero_axis_rejected() {
    let mut mesh = PolyMesh::new();
    let v = mesh.add_vertex(DVec3::X);
    assert!(rotate(&mut mesh, &[v], 1.0, DVec3::ZERO, DVec3::ZERO).is_err());
}

#[test]
fn test_scale_global_round_trip() {
    let mut mesh = PolyMesh::new();
    let verts = ring(&mut mesh, 7, 1.3, -0.4);
    let before: Vec<DVec3> = mesh.positions().to_vec();

    scale_global(&mut mesh, 0.1).unwrap();
    assert_relative_eq!(mesh.position(verts[0]).unwrap().x, 0.13, epsilon = 1e-12);
    scale_global(&mut mesh, 10.0).unwrap();

    for (p, q) in mesh.positions().iter().zip(&before) {
        assert!(p.abs_diff_eq(*q, 1e-12));
    }
}

#[test]
fn test_scale_global_zero_rejected() {
    let mut mesh = PolyMesh::new();
    mesh.add_vertex(DVec3::X);
    assert!(scale_global(&mut mesh, 0.0).is_err());
}

#[test]
fn test_unknown_vertex() {
    let mut mesh = PolyMesh::new();
    let err = translate(&mut mesh, &[VertexId(4)], DVec3::X).unwrap_err();
    assert!(matches!(err, MeshError::InvalidReference { .. }));
}

#[test]
fn test_non_finite_inputs_rejected() {
    let mut mesh = PolyMesh::new();
    let v = mesh.add_vertex(DVec3::X);

    assert!(translate(&mut mesh, &[v], DVec3::new(f64::NAN, 0.0, 0.0)).is_err());
    assert!(rotate(&mut mesh, &[v], f64::NAN, DVec3::Z, DVec3::ZERO).is_err());
    assert!(rotate(&mut mesh, &[v], 1.0, DVec3::new(f64::NAN, 0.0, 1.0), DVec3::ZERO).is_err());
    assert!(scale(&mut mesh, &[v], DVec3::splat(f64::INFINITY), DVec3::ZERO).is_err());

    assert_eq!(mesh.position(v).unwrap(), DVec3::X);
}
