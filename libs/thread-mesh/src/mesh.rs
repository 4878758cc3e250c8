//! # Polygon Mesh Kernel
//!
//! Mutable polygon mesh that the sweep operators build up in place.
//! Elements are addressed by index handles that stay valid until a weld
//! compacts the mesh.
//!
//! ## Structure
//!
//! - **Vertex**: 3D position, identified by [`VertexId`]
//! - **Edge**: unordered vertex pair, identified by [`EdgeId`]. Duplicate
//!   edges between the same pair may exist until the mesh is welded.
//! - **Face**: ordered loop of at least three distinct vertices. The loop
//!   winding defines the outward side.
//!
//! Two lookup tables are kept alongside the element arrays: an undirected
//! edge table used to reuse edges when faces are added, and a directed
//! half-edge table mapping `(from, to)` to the face that walks it.
//!
//! ## Example
//!
//! ```rust
//! use thread_mesh::PolyMesh;
//! use glam::DVec3;
//!
//! let mut mesh = PolyMesh::new();
//! let a = mesh.add_vertex(DVec3::ZERO);
//! let b = mesh.add_vertex(DVec3::X);
//! let c = mesh.add_vertex(DVec3::Y);
//! mesh.add_face(&[a, b, c]).unwrap();
//! assert_eq!(mesh.edge_count(), 3);
//! ```

use crate::error::{MeshError, MeshResult};
use crate::indexed::IndexedMesh;
use glam::DVec3;
use std::collections::HashMap;

/// Index type for vertices in the mesh.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Default)]
pub struct VertexId(pub u32);

/// Index type for edges in the mesh.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Default)]
pub struct EdgeId(pub u32);

/// Index type for faces in the mesh.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Default)]
pub struct FaceId(pub u32);

impl VertexId {
    #[inline]
    pub(crate) fn index(self) -> usize {
        self.0 as usize
    }
}

impl EdgeId {
    #[inline]
    pub(crate) fn index(self) -> usize {
        self.0 as usize
    }
}

impl FaceId {
    #[inline]
    pub(crate) fn index(self) -> usize {
        self.0 as usize
    }
}

/// Undirected lookup key for a vertex pair.
#[inline]
fn edge_key(a: VertexId, b: VertexId) -> (u32, u32) {
    if a.0 <= b.0 {
        (a.0, b.0)
    } else {
        (b.0, a.0)
    }
}

/// Signed volume of the cone from the origin over one face loop.
pub(crate) fn loop_signed_volume(positions: &[DVec3], loop_: &[VertexId]) -> f64 {
    let p0 = positions[loop_[0].index()];
    let mut volume = 0.0;
    for i in 1..loop_.len().saturating_sub(1) {
        let p1 = positions[loop_[i].index()];
        let p2 = positions[loop_[i + 1].index()];
        volume += p0.dot(p1.cross(p2));
    }
    volume / 6.0
}

/// Mutable polygon mesh owning all vertices, edges and faces of one solid.
#[derive(Debug, Clone, Default)]
pub struct PolyMesh {
    positions: Vec<DVec3>,
    edges: Vec<[VertexId; 2]>,
    faces: Vec<Vec<VertexId>>,
    /// Undirected pair -> most recently created edge between them
    edge_lookup: HashMap<(u32, u32), EdgeId>,
    /// Directed pair -> face whose loop contains `from -> to`
    half_edges: HashMap<(u32, u32), FaceId>,
}

impl PolyMesh {
    /// Creates an empty mesh.
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a mesh with pre-allocated capacity.
    pub fn with_capacity(vertex_count: usize, face_count: usize) -> Self {
        Self {
            positions: Vec::with_capacity(vertex_count),
            edges: Vec::with_capacity(vertex_count + face_count),
            faces: Vec::with_capacity(face_count),
            edge_lookup: HashMap::with_capacity(vertex_count + face_count),
            half_edges: HashMap::with_capacity(face_count * 4),
        }
    }

    /// Rebuilds a mesh from raw element arrays.
    ///
    /// Lookup tables are recomputed. Faces keep their loops as given; any
    /// side without a matching edge gets one.
    pub(crate) fn from_parts(
        positions: Vec<DVec3>,
        edges: Vec<[VertexId; 2]>,
        faces: Vec<Vec<VertexId>>,
    ) -> MeshResult<Self> {
        let mut mesh = Self {
            positions,
            edges,
            faces: Vec::with_capacity(faces.len()),
            edge_lookup: HashMap::new(),
            half_edges: HashMap::new(),
        };
        for (i, [a, b]) in mesh.edges.iter().enumerate() {
            mesh.edge_lookup.insert(edge_key(*a, *b), EdgeId(i as u32));
        }
        for face in faces {
            mesh.add_face(&face)?;
        }
        Ok(mesh)
    }

    // =========================================================================
    // COUNTS
    // =========================================================================

    /// Returns the number of vertices.
    #[inline]
    pub fn vertex_count(&self) -> usize {
        self.positions.len()
    }

    /// Returns the number of edges.
    #[inline]
    pub fn edge_count(&self) -> usize {
        self.edges.len()
    }

    /// Returns the number of faces.
    #[inline]
    pub fn face_count(&self) -> usize {
        self.faces.len()
    }

    /// Returns true if the mesh has no vertices.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.positions.is_empty()
    }

    // =========================================================================
    // CONSTRUCTION
    // =========================================================================

    /// Adds a vertex at `position`.
    pub fn add_vertex(&mut self, position: DVec3) -> VertexId {
        let id = VertexId(self.positions.len() as u32);
        self.positions.push(position);
        id
    }

    /// Adds an edge between two vertices.
    ///
    /// A new edge is always created, even if one already joins the pair.
    ///
    /// # Errors
    ///
    /// `DegenerateEdge` if `a == b`, `InvalidReference` for unknown vertices.
    pub fn add_edge(&mut self, a: VertexId, b: VertexId) -> MeshResult<EdgeId> {
        self.check_vertex(a)?;
        self.check_vertex(b)?;
        if a == b {
            return Err(MeshError::DegenerateEdge { vertex: a });
        }
        let id = EdgeId(self.edges.len() as u32);
        self.edges.push([a, b]);
        self.edge_lookup.insert(edge_key(a, b), id);
        Ok(id)
    }

    /// Adds a face with the given vertex loop.
    ///
    /// Missing side edges are created; existing ones are reused.
    ///
    /// # Errors
    ///
    /// `DegenerateFace` if the loop has fewer than three distinct vertices.
    pub fn add_face(&mut self, loop_: &[VertexId]) -> MeshResult<FaceId> {
        self.check_loop(loop_)?;
        let id = FaceId(self.faces.len() as u32);
        self.link_loop(id, loop_)?;
        self.faces.push(loop_.to_vec());
        Ok(id)
    }

    fn check_vertex(&self, v: VertexId) -> MeshResult<()> {
        if v.index() < self.positions.len() {
            Ok(())
        } else {
            Err(MeshError::invalid_reference(format!(
                "vertex {} (mesh has {})",
                v.0,
                self.positions.len()
            )))
        }
    }

    fn check_loop(&self, loop_: &[VertexId]) -> MeshResult<()> {
        for v in loop_ {
            self.check_vertex(*v)?;
        }
        let mut distinct = loop_.to_vec();
        distinct.sort_unstable();
        distinct.dedup();
        if distinct.len() < 3 {
            return Err(MeshError::DegenerateFace {
                distinct: distinct.len(),
            });
        }
        Ok(())
    }

    /// Ensures every side of `loop_` has an edge and records the half-edges.
    fn link_loop(&mut self, face: FaceId, loop_: &[VertexId]) -> MeshResult<()> {
        let n = loop_.len();
        for i in 0..n {
            let a = loop_[i];
            let b = loop_[(i + 1) % n];
            if !self.edge_lookup.contains_key(&edge_key(a, b)) {
                self.add_edge(a, b)?;
            }
            self.half_edges.insert((a.0, b.0), face);
        }
        Ok(())
    }

    fn unlink_loop(&mut self, face: FaceId) {
        let Some(loop_) = self.faces.get(face.index()) else {
            return;
        };
        let n = loop_.len();
        for i in 0..n {
            let key = (loop_[i].0, loop_[(i + 1) % n].0);
            if self.half_edges.get(&key) == Some(&face) {
                self.half_edges.remove(&key);
            }
        }
    }

    // =========================================================================
    // IN-PLACE EDITS (operators only)
    // =========================================================================

    /// Replaces the vertex loop of an existing face.
    pub(crate) fn replace_face_loop(&mut self, face: FaceId, loop_: Vec<VertexId>) -> MeshResult<()> {
        self.check_face(face)?;
        self.check_loop(&loop_)?;
        self.unlink_loop(face);
        self.link_loop(face, &loop_)?;
        self.faces[face.index()] = loop_;
        Ok(())
    }

    /// Points an existing edge at a new vertex pair.
    pub(crate) fn relink_edge(&mut self, edge: EdgeId, a: VertexId, b: VertexId) -> MeshResult<()> {
        self.check_vertex(a)?;
        self.check_vertex(b)?;
        if a == b {
            return Err(MeshError::DegenerateEdge { vertex: a });
        }
        let [old_a, old_b] = self.edge(edge)?;
        let old_key = edge_key(old_a, old_b);
        if self.edge_lookup.get(&old_key) == Some(&edge) {
            self.edge_lookup.remove(&old_key);
        }
        self.edges[edge.index()] = [a, b];
        self.edge_lookup.insert(edge_key(a, b), edge);
        Ok(())
    }

    /// Mutable access to a vertex position.
    pub(crate) fn position_mut(&mut self, v: VertexId) -> MeshResult<&mut DVec3> {
        self.check_vertex(v)?;
        Ok(&mut self.positions[v.index()])
    }

    /// Consumes the mesh into its raw element arrays.
    pub(crate) fn into_parts(self) -> (Vec<DVec3>, Vec<[VertexId; 2]>, Vec<Vec<VertexId>>) {
        (self.positions, self.edges, self.faces)
    }

    // =========================================================================
    // QUERIES
    // =========================================================================

    fn check_face(&self, f: FaceId) -> MeshResult<()> {
        if f.index() < self.faces.len() {
            Ok(())
        } else {
            Err(MeshError::invalid_reference(format!(
                "face {} (mesh has {})",
                f.0,
                self.faces.len()
            )))
        }
    }

    /// Returns the position of a vertex.
    pub fn position(&self, v: VertexId) -> MeshResult<DVec3> {
        self.check_vertex(v)?;
        Ok(self.positions[v.index()])
    }

    /// Moves a vertex.
    pub fn set_position(&mut self, v: VertexId, position: DVec3) -> MeshResult<()> {
        *self.position_mut(v)? = position;
        Ok(())
    }

    /// All vertex positions, indexed by [`VertexId`].
    pub fn positions(&self) -> &[DVec3] {
        &self.positions
    }

    /// Returns the endpoints of an edge in stored order.
    pub fn edge(&self, e: EdgeId) -> MeshResult<[VertexId; 2]> {
        self.edges.get(e.index()).copied().ok_or_else(|| {
            MeshError::invalid_reference(format!("edge {} (mesh has {})", e.0, self.edges.len()))
        })
    }

    /// Returns the vertex loop of a face.
    pub fn face(&self, f: FaceId) -> MeshResult<&[VertexId]> {
        self.check_face(f)?;
        Ok(&self.faces[f.index()])
    }

    /// Iterates over all vertex handles.
    pub fn vertices(&self) -> impl Iterator<Item = VertexId> + '_ {
        (0..self.positions.len() as u32).map(VertexId)
    }

    /// Iterates over all edges with their endpoints.
    pub fn edges(&self) -> impl Iterator<Item = (EdgeId, [VertexId; 2])> + '_ {
        self.edges
            .iter()
            .enumerate()
            .map(|(i, e)| (EdgeId(i as u32), *e))
    }

    /// Iterates over all faces with their loops.
    pub fn faces(&self) -> impl Iterator<Item = (FaceId, &[VertexId])> + '_ {
        self.faces
            .iter()
            .enumerate()
            .map(|(i, f)| (FaceId(i as u32), f.as_slice()))
    }

    /// Finds an edge joining `a` and `b` in either direction.
    pub fn find_edge(&self, a: VertexId, b: VertexId) -> Option<EdgeId> {
        self.edge_lookup.get(&edge_key(a, b)).copied()
    }

    /// Returns the face whose loop walks `from -> to`, if any.
    pub fn face_using(&self, from: VertexId, to: VertexId) -> Option<FaceId> {
        self.half_edges.get(&(from.0, to.0)).copied()
    }

    /// Returns the last `n` created vertices, oldest first.
    pub fn last_vertices(&self, n: usize) -> Vec<VertexId> {
        let len = self.positions.len();
        (len.saturating_sub(n)..len).map(|i| VertexId(i as u32)).collect()
    }

    /// Returns the last `n` created edges, oldest first.
    pub fn last_edges(&self, n: usize) -> Vec<EdgeId> {
        let len = self.edges.len();
        (len.saturating_sub(n)..len).map(|i| EdgeId(i as u32)).collect()
    }

    /// Returns the edges on the boundary of a face set.
    ///
    /// A side is on the boundary when the face across it is missing or not
    /// part of `faces`. Edges are returned in face order, each once.
    pub fn boundary_edges(&self, faces: &[FaceId]) -> MeshResult<Vec<EdgeId>> {
        let members: std::collections::HashSet<FaceId> = faces.iter().copied().collect();
        let mut seen = std::collections::HashSet::new();
        let mut boundary = Vec::new();
        for &f in faces {
            let loop_ = self.face(f)?;
            let n = loop_.len();
            for i in 0..n {
                let a = loop_[i];
                let b = loop_[(i + 1) % n];
                let across = self.face_using(b, a);
                if across.map_or(true, |g| !members.contains(&g)) {
                    if let Some(e) = self.find_edge(a, b) {
                        if seen.insert(e) {
                            boundary.push(e);
                        }
                    }
                }
            }
        }
        Ok(boundary)
    }

    /// Unit normal of a face (Newell's method). Zero for collapsed faces.
    pub fn face_normal(&self, f: FaceId) -> MeshResult<DVec3> {
        let loop_ = self.face(f)?;
        Ok(self.loop_normal(loop_))
    }

    pub(crate) fn loop_normal(&self, loop_: &[VertexId]) -> DVec3 {
        let n = loop_.len();
        let centroid = loop_
            .iter()
            .map(|v| self.positions[v.index()])
            .sum::<DVec3>()
            / n as f64;
        let mut normal = DVec3::ZERO;
        for i in 0..n {
            let p = self.positions[loop_[i].index()] - centroid;
            let q = self.positions[loop_[(i + 1) % n].index()] - centroid;
            normal += p.cross(q);
        }
        normal.normalize_or_zero()
    }

    /// Computes the axis-aligned bounding box.
    ///
    /// Returns (min, max) corners.
    pub fn bounding_box(&self) -> (DVec3, DVec3) {
        if self.positions.is_empty() {
            return (DVec3::ZERO, DVec3::ZERO);
        }

        let mut min = self.positions[0];
        let mut max = self.positions[0];

        for v in &self.positions[1..] {
            min = min.min(*v);
            max = max.max(*v);
        }

        (min, max)
    }

    /// Signed volume enclosed by the faces, positive when they wind outward.
    ///
    /// Only meaningful for closed meshes.
    pub fn signed_volume(&self) -> f64 {
        self.faces
            .iter()
            .map(|loop_| loop_signed_volume(&self.positions, loop_))
            .sum()
    }

    /// `V - E + F`. Equals 2 for a closed mesh of genus zero.
    pub fn euler_characteristic(&self) -> i64 {
        self.positions.len() as i64 - self.edges.len() as i64 + self.faces.len() as i64
    }

    /// Exports positions and polygon index loops.
    pub fn to_indexed(&self) -> IndexedMesh {
        IndexedMesh {
            positions: self.positions.clone(),
            polygons: self
                .faces
                .iter()
                .map(|loop_| loop_.iter().map(|v| v.0).collect())
                .collect(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    fn unit_square(mesh: &mut PolyMesh) -> [VertexId; 4] {
        [
            mesh.add_vertex(DVec3::new(0.0, 0.0, 0.0)),
            mesh.add_vertex(DVec3::new(1.0, 0.0, 0.0)),
            mesh.add_vertex(DVec3::new(1.0, 1.0, 0.0)),
            mesh.add_vertex(DVec3::new(0.0, 1.0, 0.0)),
        ]
    }

    #[test]
    fn test_add_vertex_returns_sequential_ids() {
        let mut mesh = PolyMesh::new();
        assert!(mesh.is_empty());
        let a = mesh.add_vertex(DVec3::X);
        let b = mesh.add_vertex(DVec3::Y);
        assert_eq!(a, VertexId(0));
        assert_eq!(b, VertexId(1));
        assert_eq!(mesh.position(b).unwrap(), DVec3::Y);
    }

    #[test]
    fn test_add_edge_rejects_self_loop() {
        let mut mesh = PolyMesh::new();
        let a = mesh.add_vertex(DVec3::ZERO);
        let err = mesh.add_edge(a, a).unwrap_err();
        assert_eq!(err, MeshError::DegenerateEdge { vertex: a });
    }

    #[test]
    fn test_add_edge_allows_duplicates() {
        let mut mesh = PolyMesh::new();
        let a = mesh.add_vertex(DVec3::ZERO);
        let b = mesh.add_vertex(DVec3::X);
        let e0 = mesh.add_edge(a, b).unwrap();
        let e1 = mesh.add_edge(b, a).unwrap();
        assert_ne!(e0, e1);
        assert_eq!(mesh.edge_count(), 2);
    }

    #[test]
    fn test_add_edge_unknown_vertex() {
        let mut mesh = PolyMesh::new();
        let a = mesh.add_vertex(DVec3::ZERO);
        let err = mesh.add_edge(a, VertexId(7)).unwrap_err();
        assert!(matches!(err, MeshError::InvalidReference { .. }));
    }

    #[test]
    fn test_add_face_creates_and_reuses_edges() {
        let mut mesh = PolyMesh::new();
        let [a, b, c, d] = unit_square(&mut mesh);
        mesh.add_edge(a, b).unwrap();
        let f = mesh.add_face(&[a, b, c, d]).unwrap();
        assert_eq!(mesh.edge_count(), 4);
        assert_eq!(mesh.face_using(a, b), Some(f));
        assert_eq!(mesh.face_using(b, a), None);
    }

    #[test]
    fn test_add_face_rejects_two_distinct() {
        let mut mesh = PolyMesh::new();
        let a = mesh.add_vertex(DVec3::ZERO);
        let b = mesh.add_vertex(DVec3::X);
        let err = mesh.add_face(&[a, b, a]).unwrap_err();
        assert_eq!(err, MeshError::DegenerateFace { distinct: 2 });
    }

    #[test]
    fn test_face_normal_follows_winding() {
        let mut mesh = PolyMesh::new();
        let [a, b, c, d] = unit_square(&mut mesh);
        let up = mesh.add_face(&[a, b, c, d]).unwrap();
        let down = mesh.add_face(&[d, c, b, a]).unwrap();
        assert!(mesh.face_normal(up).unwrap().abs_diff_eq(DVec3::Z, 1e-12));
        assert!(mesh.face_normal(down).unwrap().abs_diff_eq(-DVec3::Z, 1e-12));
    }

    #[test]
    fn test_boundary_edges_of_face_pair() {
        let mut mesh = PolyMesh::new();
        let [a, b, c, d] = unit_square(&mut mesh);
        let e = mesh.add_vertex(DVec3::new(2.0, 0.0, 0.0));
        let f = mesh.add_vertex(DVec3::new(2.0, 1.0, 0.0));
        let f0 = mesh.add_face(&[a, b, c, d]).unwrap();
        let f1 = mesh.add_face(&[b, e, f, c]).unwrap();

        assert_eq!(mesh.boundary_edges(&[f0, f1]).unwrap().len(), 6);
        // The shared side counts once the neighbour is outside the set
        assert_eq!(mesh.boundary_edges(&[f0]).unwrap().len(), 4);
    }

    #[test]
    fn test_last_elements() {
        let mut mesh = PolyMesh::new();
        let [a, b, c, _] = unit_square(&mut mesh);
        mesh.add_edge(a, b).unwrap();
        let e = mesh.add_edge(b, c).unwrap();
        assert_eq!(mesh.last_vertices(2), vec![VertexId(2), VertexId(3)]);
        assert_eq!(mesh.last_edges(1), vec![e]);
        assert_eq!(mesh.last_vertices(10).len(), 4);
    }

    #[test]
    fn test_bounding_box() {
        let mut mesh = PolyMesh::new();
        mesh.add_vertex(DVec3::new(-1.0, -2.0, -3.0));
        mesh.add_vertex(DVec3::new(4.0, 5.0, 6.0));
        let (min, max) = mesh.bounding_box();
        assert_eq!(min, DVec3::new(-1.0, -2.0, -3.0));
        assert_eq!(max, DVec3::new(4.0, 5.0, 6.0));
    }

    #[test]
    fn test_signed_volume_of_tetrahedron() {
        let mut mesh = PolyMesh::new();
        let o = mesh.add_vertex(DVec3::ZERO);
        let x = mesh.add_vertex(DVec3::X);
        let y = mesh.add_vertex(DVec3::Y);
        let z = mesh.add_vertex(DVec3::Z);
        mesh.add_face(&[o, y, x]).unwrap();
        mesh.add_face(&[o, x, z]).unwrap();
        mesh.add_face(&[o, z, y]).unwrap();
        mesh.add_face(&[x, y, z]).unwrap();
        assert_relative_eq!(mesh.signed_volume(), 1.0 / 6.0, epsilon = 1e-12);
        assert_eq!(mesh.euler_characteristic(), 2);
    }

    #[test]
    fn test_replace_face_loop_updates_half_edges() {
        let mut mesh = PolyMesh::new();
        let [a, b, c, d] = unit_square(&mut mesh);
        let f = mesh.add_face(&[a, b, c, d]).unwrap();
        mesh.replace_face_loop(f, vec![a, b, c]).unwrap();
        assert_eq!(mesh.face(f).unwrap(), &[a, b, c]);
        assert_eq!(mesh.face_using(c, d), None);
        assert_eq!(mesh.face_using(c, a), Some(f));
    }
}
