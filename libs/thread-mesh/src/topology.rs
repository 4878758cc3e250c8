//! # Topology Report
//!
//! Edge-use analysis of a polygon mesh: open edges, non-manifold edges and
//! winding conflicts. Counts are taken from the face loops directly, so the
//! report is valid even when the half-edge table has collisions.

use crate::mesh::PolyMesh;
use std::collections::HashMap;

/// Edge-use counts for one mesh.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TopologyReport {
    /// Total number of vertices.
    pub vertex_count: usize,
    /// Total number of edges.
    pub edge_count: usize,
    /// Total number of faces.
    pub face_count: usize,

    /// Edges walked by exactly one face.
    pub open_edges: usize,
    /// Edges walked by more than two faces.
    pub non_manifold_edges: usize,
    /// Edges walked twice in the same direction.
    pub inconsistent_edges: usize,
    /// Edges no face walks.
    pub loose_edges: usize,
    /// Enclosed volume, positive when faces wind outward.
    pub signed_volume: f64,
}

impl TopologyReport {
    /// Builds the report for `mesh`.
    pub fn analyze(mesh: &PolyMesh) -> Self {
        // Undirected pair -> (forward uses, backward uses)
        let mut uses: HashMap<(u32, u32), (usize, usize)> = HashMap::new();
        for (_, loop_) in mesh.faces() {
            let n = loop_.len();
            for i in 0..n {
                let a = loop_[i].0;
                let b = loop_[(i + 1) % n].0;
                let entry = uses.entry((a.min(b), a.max(b))).or_default();
                if a < b {
                    entry.0 += 1;
                } else {
                    entry.1 += 1;
                }
            }
        }

        let mut report = Self {
            vertex_count: mesh.vertex_count(),
            edge_count: mesh.edge_count(),
            face_count: mesh.face_count(),
            signed_volume: mesh.signed_volume(),
            ..Self::default()
        };

        for (forward, backward) in uses.values() {
            match forward + backward {
                1 => report.open_edges += 1,
                2 if *forward != 1 => report.inconsistent_edges += 1,
                2 => {}
                _ => report.non_manifold_edges += 1,
            }
        }

        for (_, [a, b]) in mesh.edges() {
            if !uses.contains_key(&(a.0.min(b.0), a.0.max(b.0))) {
                report.loose_edges += 1;
            }
        }

        report
    }

    /// No open edges.
    #[must_use]
    pub fn is_watertight(&self) -> bool {
        self.open_edges == 0
    }

    /// Every edge walked by at most two faces.
    #[must_use]
    pub fn is_manifold(&self) -> bool {
        self.non_manifold_edges == 0
    }

    /// Every shared edge walked once in each direction.
    #[must_use]
    pub fn is_consistent(&self) -> bool {
        self.inconsistent_edges == 0
    }

    /// Watertight, manifold, consistently wound and outward facing.
    #[must_use]
    pub fn is_closed_solid(&self) -> bool {
        self.is_watertight()
            && self.is_manifold()
            && self.is_consistent()
            && self.loose_edges == 0
            && self.signed_volume > 0.0
    }
}

impl std::fmt::Display for TopologyReport {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        writeln!(f, "Topology Report:")?;
        writeln!(f, "  Vertices: {}", self.vertex_count)?;
        writeln!(f, "  Edges: {}", self.edge_count)?;
        writeln!(f, "  Faces: {}", self.face_count)?;
        writeln!(f, "  Open edges: {}", self.open_edges)?;
        writeln!(f, "  Non-manifold edges: {}", self.non_manifold_edges)?;
        writeln!(f, "  Inconsistent edges: {}", self.inconsistent_edges)?;
        writeln!(f, "  Loose edges: {}", self.loose_edges)?;
        write!(f, "  Signed volume: {:.6}", self.signed_volume)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use glam::DVec3;

    fn tetrahedron(flip_last: bool) -> PolyMesh {
        let mut mesh = PolyMesh::new();
        let o = mesh.add_vertex(DVec3::ZERO);
        let x = mesh.add_vertex(DVec3::X);
        let y = mesh.add_vertex(DVec3::Y);
        let z = mesh.add_vertex(DVec3::Z);
        mesh.add_face(&[o, y, x]).unwrap();
        mesh.add_face(&[o, x, z]).unwrap();
        mesh.add_face(&[o, z, y]).unwrap();
        if flip_last {
            mesh.add_face(&[x, z, y]).unwrap();
        } else {
            mesh.add_face(&[x, y, z]).unwrap();
        }
        mesh
    }

    #[test]
    fn test_closed_tetrahedron() {
        let report = TopologyReport::analyze(&tetrahedron(false));
        assert!(report.is_watertight());
        assert!(report.is_consistent());
        assert!(report.is_closed_solid());
    }

    #[test]
    fn test_flipped_face_is_inconsistent() {
        let report = TopologyReport::analyze(&tetrahedron(true));
        assert!(report.is_watertight());
        assert_eq!(report.inconsistent_edges, 3);
        assert!(!report.is_closed_solid());
    }

    #[test]
    fn test_open_and_loose_edges() {
        let mut mesh = PolyMesh::new();
        let a = mesh.add_vertex(DVec3::ZERO);
        let b = mesh.add_vertex(DVec3::X);
        let c = mesh.add_vertex(DVec3::Y);
        let d = mesh.add_vertex(DVec3::Z);
        mesh.add_face(&[a, b, c]).unwrap();
        mesh.add_edge(c, d).unwrap();

        let report = TopologyReport::analyze(&mesh);
        assert_eq!(report.open_edges, 3);
        assert_eq!(report.loose_edges, 1);
        assert!(!report.is_watertight());
    }
}
