//! # Region Inset
//!
//! Shrinks a face region inward by `thickness` and optionally lifts its core
//! along the region normal by `depth`. Every vertex on the region boundary
//! gets an inner copy; the region faces are re-pointed at the copies and a
//! ring of bridge faces fills the gap between old and new boundary:
//!
//! ```text
//!   a ─────────── b          a ─────────── b
//!   │             │          │ ╲    ring   ╱│
//!   │   region    │   ──►    │  a' ───── b' │
//!   │             │          │  │  core   │ │
//! ```
//!
//! Sides whose neighbour lies outside the region are inset. Sides with no
//! neighbour at all are inset only when `use_boundary` is set; otherwise they
//! are held in place together with their end vertices.
//!
//! With `use_even_offset` the inner copy is pushed further at corners so
//! that every inset side ends up `thickness` away from its original.

use super::Created;
use crate::error::{MeshError, MeshResult};
use crate::mesh::{EdgeId, FaceId, PolyMesh, VertexId};
use config::constants::MIN_EVEN_OFFSET_COS;
use glam::DVec3;
use std::collections::{HashMap, HashSet};
use tracing::debug;


/// Parameters for [`inset_region`].
#[derive(Debug, Clone, PartialEq)]
pub struct InsetParams {
    /// Distance the boundary moves inward
    pub thickness: f64,
    /// Distance the core moves along its normal (negative moves inward)
    pub depth: f64,
    /// Also inset sides that have no neighbouring face
    pub use_boundary: bool,
    /// Keep the inset distance constant at corners
    pub use_even_offset: bool,
}

impl Default for InsetParams {
    fn default() -> Self {
        Self {
            thickness: 0.0,
            depth: 0.0,
            use_boundary: true,
            use_even_offset: true,
        }
    }
}

/// Output of [`inset_region`].
#[derive(Debug, Clone, Default)]
pub struct InsetReport {
    /// Inner copies, new edges and ring faces
    pub created: Created,
    /// Original boundary vertex and its inner copy
    pub split: Vec<(VertexId, VertexId)>,
}

/// One inset side of a region face.
struct Side {
    face: FaceId,
    a: VertexId,
    b: VertexId,
}

/// Insets the region formed by `faces`.
///
/// The faces keep their handles; their loops now run through the inner
/// copies. An empty region is a no-op.
///
/// # Errors
///
/// `ParameterOutOfRange` for a negative or non-finite thickness or a
/// non-finite depth.
///
/// # Example
///
/// ```rust
/// use thread_mesh::{PolyMesh, ops::{inset_region, InsetParams}};
/// use glam::DVec3;
///
/// let mut mesh = PolyMesh::new();
/// let a = mesh.add_vertex(DVec3::new(0.0, 0.0, 0.0));
/// let b = mesh.add_vertex(DVec3::new(1.0, 0.0, 0.0));
/// let c = mesh.add_vertex(DVec3::new(1.0, 1.0, 0.0));
/// let d = mesh.add_vertex(DVec3::new(0.0, 1.0, 0.0));
/// let f = mesh.add_face(&[a, b, c, d]).unwrap();
///
/// let params = InsetParams { thickness: 0.1, ..InsetParams::default() };
/// let out = inset_region(&mut mesh, &[f], &params).unwrap();
/// assert_eq!(out.created.faces.len(), 4);
/// ```
pub fn inset_region(mesh: &mut PolyMesh, faces: &[FaceId], params: &InsetParams) -> MeshResult<InsetReport> {
    if !params.thickness.is_finite() || params.thickness < 0.0 {
        return Err(MeshError::out_of_range(
            "thickness",
            format!("inset thickness must be finite and non-negative, got {}", params.thickness),
        ));
    }
    if !params.depth.is_finite() {
        return Err(MeshError::out_of_range("depth", "inset depth must be finite"));
    }

    let mut region: Vec<FaceId> = Vec::with_capacity(faces.len());
    let mut members: HashSet<FaceId> = HashSet::with_capacity(faces.len());
    for &f in faces {
        mesh.face(f)?;
        if members.insert(f) {
            region.push(f);
        }
    }
    if region.is_empty() {
        return Ok(InsetReport::default());
    }

    // =========================================================================
    // CLASSIFY SIDES
    // =========================================================================

    let mut face_normals: HashMap<FaceId, DVec3> = HashMap::with_capacity(region.len());
    let mut inset_sides: Vec<Side> = Vec::new();
    let mut held: HashSet<VertexId> = HashSet::new();
    let mut interior_sides: Vec<(VertexId, VertexId)> = Vec::new();
    let mut touched: Vec<VertexId> = Vec::new();
    let mut seen: HashSet<VertexId> = HashSet::new();

    for &f in &region {
        let loop_ = mesh.face(f)?.to_vec();
        face_normals.insert(f, mesh.loop_normal(&loop_));
        let n = loop_.len();
        for i in 0..n {
            let (a, b) = (loop_[i], loop_[(i + 1) % n]);
            if seen.insert(a) {
                touched.push(a);
            }
            match mesh.face_using(b, a) {
                Some(g) if members.contains(&g) => interior_sides.push((a, b)),
                None if !params.use_boundary => {
                    held.insert(a);
                    held.insert(b);
                }
                _ => inset_sides.push(Side { face: f, a, b }),
            }
        }
    }

    // Inward perpendiculars of the inset sides meeting at each vertex
    let mut perps: HashMap<VertexId, Vec<DVec3>> = HashMap::new();
    let mut order: Vec<VertexId> = Vec::new();
    for side in &inset_sides {
        let normal = face_normals[&side.face];
        let dir = mesh.position(side.b)? - mesh.position(side.a)?;
        let perp = normal.cross(dir).normalize_or_zero();
        for v in [side.a, side.b] {
            if held.contains(&v) {
                continue;
            }
            let entry = perps.entry(v).or_default();
            if entry.is_empty() {
                order.push(v);
            }
            entry.push(perp);
        }
    }

    // Averaged region normal per vertex, used for depth
    let mut vertex_normals: HashMap<VertexId, DVec3> = HashMap::new();
    for &f in &region {
        let normal = face_normals[&f];
        for v in mesh.face(f)? {
            *vertex_normals.entry(*v).or_insert(DVec3::ZERO) += normal;
        }
    }
    let lift = |v: VertexId| -> DVec3 {
        vertex_normals
            .get(&v)
            .map_or(DVec3::ZERO, |n| n.normalize_or_zero() * params.depth)
    };

    // =========================================================================
    // CREATE INNER COPIES
    // =========================================================================

    let first_edge = mesh.edge_count();
    let mut report = InsetReport::default();
    let mut split: HashMap<VertexId, VertexId> = HashMap::with_capacity(order.len());

    for &v in &order {
        let list = &perps[&v];
        let mut dir = list.iter().copied().sum::<DVec3>().normalize_or_zero();
        if dir == DVec3::ZERO {
            dir = list[0];
        }
        let mut distance = params.thickness;
        if params.use_even_offset {
            let cos = list.iter().map(|p| dir.dot(*p)).sum::<f64>() / list.len() as f64;
            distance /= cos.max(MIN_EVEN_OFFSET_COS);
        }
        let p = mesh.position(v)?;
        let copy = mesh.add_vertex(p + dir * distance + lift(v));
        split.insert(v, copy);
        report.created.vertices.push(copy);
        report.split.push((v, copy));
    }

    // Vertices strictly inside the region only move with the depth
    if params.depth != 0.0 {
        for &v in &touched {
            if !split.contains_key(&v) && !held.contains(&v) {
                let p = mesh.position(v)?;
                mesh.set_position(v, p + lift(v))?;
            }
        }
    }

    let inner = |v: VertexId| split.get(&v).copied().unwrap_or(v);

    // =========================================================================
    // REWIRE REGION
    // =========================================================================

    let mut relinked: HashSet<EdgeId> = HashSet::new();
    for &(a, b) in &interior_sides {
        if !split.contains_key(&a) && !split.contains_key(&b) {
            continue;
        }
        if let Some(e) = mesh.find_edge(a, b) {
            if relinked.insert(e) {
                mesh.relink_edge(e, inner(a), inner(b))?;
            }
        }
    }

    for &f in &region {
        let loop_: Vec<VertexId> = mesh.face(f)?.iter().map(|v| inner(*v)).collect();
        mesh.replace_face_loop(f, loop_)?;
    }

    for side in &inset_sides {
        let (a2, b2) = (inner(side.a), inner(side.b));
        let ring: Vec<VertexId> = match (a2 == side.a, b2 == side.b) {
            (true, true) => continue,
            (true, false) => vec![side.a, side.b, b2],
            (false, true) => vec![side.a, side.b, a2],
            (false, false) => vec![side.a, side.b, b2, a2],
        };
        let f = mesh.add_face(&ring)?;
        report.created.faces.push(f);
    }

    report.created.edges = (first_edge..mesh.edge_count())
        .map(|i| EdgeId(i as u32))
        .collect();

    debug!(
        faces = region.len(),
        split = report.split.len(),
        ring = report.created.faces.len(),
        thickness = params.thickness,
        depth = params.depth,
        "inset_region"
    );

    Ok(report)
}
