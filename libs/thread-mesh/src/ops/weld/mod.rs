//! # Remove Doubles
//!
//! Merges vertices that lie within a distance of each other, then compacts
//! the mesh: references are rewritten, zero-length and duplicate edges are
//! dropped, and faces that collapse below three distinct vertices vanish.
//!
//! ## Algorithm
//!
//! 1. Hash every candidate into a grid with cell size = distance
//! 2. For each candidate, scan the 27 surrounding cells for partners
//! 3. Partners point at the lowest index in their group, which keeps its
//!    position
//! 4. Rebuild element arrays and lookups over the surviving vertices
//!
//! The operator enforces no semantic limit on the distance: merging across
//! intentionally distinct features is the caller's problem.

use crate::error::{MeshError, MeshResult};
use crate::mesh::{PolyMesh, VertexId};
use config::constants::MIN_WELD_CELL;
use glam::DVec3;
use std::collections::{HashMap, HashSet};
use tracing::debug;


/// Output of [`remove_doubles`].
#[derive(Debug, Clone, Default, PartialEq)]
pub struct WeldReport {
    /// Vertices merged into another one
    pub merged: usize,
    /// Edges dropped as zero-length or duplicate
    pub removed_edges: usize,
    /// Faces dropped as collapsed
    pub removed_faces: usize,
    /// Old vertex index -> surviving vertex handle
    pub remap: Vec<VertexId>,
}

fn cell_of(p: DVec3, size: f64) -> (i64, i64, i64) {
    (
        (p.x / size).floor() as i64,
        (p.y / size).floor() as i64,
        (p.z / size).floor() as i64,
    )
}

/// Welds `vertices` whose mutual distance is at most `distance`.
///
/// Vertices outside the set are never merged. All handles are invalidated;
/// use [`WeldReport::remap`] to translate old ones.
///
/// # Errors
///
/// `InvalidWeldTolerance` for a negative or non-finite distance.
///
/// # Example
///
/// ```rust
/// use thread_mesh::{PolyMesh, ops::remove_doubles};
/// use glam::DVec3;
///
/// let mut mesh = PolyMesh::new();
/// let a = mesh.add_vertex(DVec3::ZERO);
/// let b = mesh.add_vertex(DVec3::new(0.001, 0.0, 0.0));
/// let all: Vec<_> = mesh.vertices().collect();
///
/// let report = remove_doubles(&mut mesh, &all, 0.01).unwrap();
/// assert_eq!(report.merged, 1);
/// assert_eq!(mesh.vertex_count(), 1);
/// ```
pub fn remove_doubles(mesh: &mut PolyMesh, vertices: &[VertexId], distance: f64) -> MeshResult<WeldReport> {
    if !distance.is_finite() || distance < 0.0 {
        return Err(MeshError::InvalidWeldTolerance { distance });
    }

    let count = mesh.vertex_count();
    let mut candidates: Vec<u32> = Vec::with_capacity(vertices.len());
    for &v in vertices {
        mesh.position(v)?;
        candidates.push(v.0);
    }
    candidates.sort_unstable();
    candidates.dedup();

    let positions = mesh.positions();
    let cell_size = distance.max(MIN_WELD_CELL);

    // Build spatial hash
    let mut spatial_hash: HashMap<(i64, i64, i64), Vec<u32>> = HashMap::new();
    for &idx in &candidates {
        let cell = cell_of(positions[idx as usize], cell_size);
        spatial_hash.entry(cell).or_default().push(idx);
    }

    // Find canonical representatives
    let mut remap: Vec<u32> = (0..count as u32).collect();
    let mut merged = 0;

    for &idx in &candidates {
        if remap[idx as usize] != idx {
            continue;
        }
        let position = positions[idx as usize];
        let cell = cell_of(position, cell_size);

        for dx in -1..=1 {
            for dy in -1..=1 {
                for dz in -1..=1 {
                    let Some(others) = spatial_hash.get(&(cell.0 + dx, cell.1 + dy, cell.2 + dz)) else {
                        continue;
                    };
                    for &other in others {
                        if other <= idx || remap[other as usize] != other {
                            continue;
                        }
                        if position.distance(positions[other as usize]) <= distance {
                            remap[other as usize] = idx;
                            merged += 1;
                        }
                    }
                }
            }
        }
    }

    // Resolve transitive merges
    for i in 0..remap.len() {
        let mut target = remap[i];
        while remap[target as usize] != target {
            target = remap[target as usize];
        }
        remap[i] = target;
    }

    // Compact surviving vertices
    let mut compact: Vec<u32> = vec![0; count];
    let mut kept_positions = Vec::with_capacity(count - merged);
    for i in 0..count {
        if remap[i] == i as u32 {
            compact[i] = kept_positions.len() as u32;
            kept_positions.push(positions[i]);
        }
    }
    let resolve = |v: VertexId| VertexId(compact[remap[v.index()] as usize]);

    let (_, old_edges, old_faces) = std::mem::take(mesh).into_parts();

    let mut seen: HashSet<(u32, u32)> = HashSet::with_capacity(old_edges.len());
    let mut edges = Vec::with_capacity(old_edges.len());
    for [a, b] in &old_edges {
        let (a, b) = (resolve(*a), resolve(*b));
        if a != b && seen.insert((a.0.min(b.0), a.0.max(b.0))) {
            edges.push([a, b]);
        }
    }

    let mut faces = Vec::with_capacity(old_faces.len());
    for loop_ in &old_faces {
        let mut collapsed: Vec<VertexId> = Vec::with_capacity(loop_.len());
        for v in loop_.iter().map(|v| resolve(*v)) {
            if collapsed.last() != Some(&v) {
                collapsed.push(v);
            }
        }
        while collapsed.len() > 1 && collapsed.first() == collapsed.last() {
            collapsed.pop();
        }
        let distinct: HashSet<VertexId> = collapsed.iter().copied().collect();
        if distinct.len() >= 3 {
            faces.push(collapsed);
        }
    }

    let report = WeldReport {
        merged,
        removed_edges: old_edges.len() - edges.len(),
        removed_faces: old_faces.len() - faces.len(),
        remap: (0..count).map(|i| resolve(VertexId(i as u32))).collect(),
    };

    *mesh = PolyMesh::from_parts(kept_positions, edges, faces)?;

    debug!(
        candidates = candidates.len(),
        distance,
        merged = report.merged,
        removed_edges = report.removed_edges,
        removed_faces = report.removed_faces,
        "remove_doubles"
    );

    Ok(report)
}
