//! # Affine Transforms
//!
//! Coordinate-only edits of a vertex subset. Topology is never touched.
//! Each vertex in the set is moved once even if it is listed repeatedly.

use crate::error::{MeshError, MeshResult};
use crate::mesh::{PolyMesh, VertexId};
use config::constants::EPSILON;
use glam::{DMat4, DQuat, DVec3};
use std::collections::HashSet;

#[cfg(test)]
mod tests;

/// Applies a general affine matrix to `vertices`.
///
/// # Example
///
/// ```rust
/// use thread_mesh::{PolyMesh, ops::transform};
/// use glam::{DMat4, DVec3};
///
/// let mut mesh = PolyMesh::new();
/// let v = mesh.add_vertex(DVec3::X);
/// transform(&mut mesh, &[v], &DMat4::from_translation(DVec3::Z)).unwrap();
/// assert_eq!(mesh.position(v).unwrap(), DVec3::new(1.0, 0.0, 1.0));
/// ```
pub fn transform(mesh: &mut PolyMesh, vertices: &[VertexId], matrix: &DMat4) -> MeshResult<()> {
    let mut done = HashSet::with_capacity(vertices.len());
    for &v in vertices {
        if done.insert(v) {
            let p = mesh.position_mut(v)?;
            *p = matrix.transform_point3(*p);
        }
    }
    Ok(())
}

/// Moves `vertices` by `offset`.
pub fn translate(mesh: &mut PolyMesh, vertices: &[VertexId], offset: DVec3) -> MeshResult<()> {
    if !offset.is_finite() {
        return Err(MeshError::out_of_range("offset", "translation must be finite"));
    }
    transform(mesh, vertices, &DMat4::from_translation(offset))
}

/// Scales `vertices` per axis about `pivot`.
///
/// A zero factor flattens the set onto the pivot plane (or axis, or point).
pub fn scale(mesh: &mut PolyMesh, vertices: &[VertexId], factors: DVec3, pivot: DVec3) -> MeshResult<()> {
    if !factors.is_finite() {
        return Err(MeshError::out_of_range("factors", "scale factors must be finite"));
    }
    let matrix = DMat4::from_translation(pivot)
        * DMat4::from_diagonal(factors.extend(1.0))
        * DMat4::from_translation(-pivot);
    transform(mesh, vertices, &matrix)
}

/// Rotates `vertices` by `angle` radians about `axis` through `pivot`.
pub fn rotate(
    mesh: &mut PolyMesh,
    vertices: &[VertexId],
    angle: f64,
    axis: DVec3,
    pivot: DVec3,
) -> MeshResult<()> {
    if !angle.is_finite() {
        return Err(MeshError::out_of_range("angle", format!("rotation angle must be finite, got {angle}")));
    }
    if !axis.is_finite() || axis.length_squared() < EPSILON {
        return Err(MeshError::out_of_range("axis", "rotation axis must be finite and non-zero"));
    }
    let matrix = DMat4::from_translation(pivot)
        * DMat4::from_quat(DQuat::from_axis_angle(axis.normalize(), angle))
        * DMat4::from_translation(-pivot);
    transform(mesh, vertices, &matrix)
}

/// Uniformly scales the whole mesh about the origin.
///
/// # Errors
///
/// `ParameterOutOfRange` for a zero or non-finite factor, which could not
/// be undone.
pub fn scale_global(mesh: &mut PolyMesh, factor: f64) -> MeshResult<()> {
    if !factor.is_finite() || factor.abs() < EPSILON {
        return Err(MeshError::out_of_range(
            "factor",
            format!("global scale must be finite and non-zero, got {factor}"),
        ));
    }
    let all: Vec<VertexId> = mesh.vertices().collect();
    scale(mesh, &all, DVec3::splat(factor), DVec3::ZERO)
}
