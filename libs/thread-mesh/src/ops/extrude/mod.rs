//! # Extrude Edges
//!
//! Duplicates a set of edges and bridges each original edge to its copy with
//! a quad. The copies start coincident with the originals; callers then move
//! the returned vertices to form a wall, a flange or a folded disk.
//!
//! ## Winding
//!
//! The bridge quad walks its original edge opposite to the face already
//! using it, so the new strip continues that face's orientation. Free edges
//! (no face yet) keep their stored direction, optionally flipped. The copy
//! edge is stored so that extruding it again follows the same rule.

use super::Created;
use crate::error::MeshResult;
use crate::mesh::{EdgeId, PolyMesh, VertexId};
use std::collections::hash_map::{Entry, HashMap};
use tracing::debug;

#[cfg(test)]
mod tests;

/// Output of [`extrude_edges`].
#[derive(Debug, Clone, Default)]
pub struct Extruded {
    /// Copied vertices, bridge edges, copy edges and bridge quads
    pub created: Created,
    /// Copy of each input edge, in input order
    pub boundary: Vec<EdgeId>,
}

/// Extrudes `edges`, returning the new geometry.
///
/// Every distinct vertex of the input is duplicated once, so a chain stays a
/// chain after extrusion.
///
/// # Arguments
///
/// * `mesh` - Mesh to extend
/// * `edges` - Edges to extrude
/// * `flip_free` - Reverse the bridge winding of edges no face uses yet
///
/// # Example
///
/// ```rust
/// use thread_mesh::{PolyMesh, ops::extrude_edges};
/// use glam::DVec3;
///
/// let mut mesh = PolyMesh::new();
/// let a = mesh.add_vertex(DVec3::ZERO);
/// let b = mesh.add_vertex(DVec3::X);
/// let e = mesh.add_edge(a, b).unwrap();
///
/// let out = extrude_edges(&mut mesh, &[e], false).unwrap();
/// assert_eq!(out.created.vertices.len(), 2);
/// assert_eq!(out.created.faces.len(), 1);
/// ```
pub fn extrude_edges(mesh: &mut PolyMesh, edges: &[EdgeId], flip_free: bool) -> MeshResult<Extruded> {
    let mut copies: HashMap<VertexId, VertexId> = HashMap::with_capacity(edges.len() + 1);
    let mut out = Extruded::default();

    let mut oriented = Vec::with_capacity(edges.len());
    for &e in edges {
        let [a, b] = mesh.edge(e)?;
        let forward = mesh.face_using(a, b).is_some();
        let backward = mesh.face_using(b, a).is_some();
        let (u, w) = match (forward, backward) {
            (true, false) => (b, a),
            (false, true) => (a, b),
            _ if flip_free => (b, a),
            _ => (a, b),
        };
        oriented.push((u, w));
    }

    for &(u, w) in &oriented {
        for v in [u, w] {
            if let Entry::Vacant(slot) = copies.entry(v) {
                let p = mesh.position(v)?;
                let copy = mesh.add_vertex(p);
                let bridge = mesh.add_edge(v, copy)?;
                slot.insert(copy);
                out.created.vertices.push(copy);
                out.created.edges.push(bridge);
            }
        }
    }

    for &(u, w) in &oriented {
        let (u2, w2) = (copies[&u], copies[&w]);
        let e = mesh.add_edge(u2, w2)?;
        out.created.edges.push(e);
        out.boundary.push(e);
        let f = mesh.add_face(&[u, w, w2, u2])?;
        out.created.faces.push(f);
    }

    debug!(
        edges = edges.len(),
        vertices = out.created.vertices.len(),
        "extrude_edges"
    );

    Ok(out)
}
