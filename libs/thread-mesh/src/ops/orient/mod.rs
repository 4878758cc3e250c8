//! # Make Consistent
//!
//! Recalculates face winding: within each connected component the faces
//! are flipped to agree with a seed face across every two-face edge, and a
//! component whose enclosed volume comes out negative is turned outward.

use crate::error::MeshResult;
use crate::mesh::{loop_signed_volume, PolyMesh, VertexId};
use std::collections::{HashMap, VecDeque};
use tracing::debug;

#[cfg(test)]
mod tests;

fn walks(loop_: &[VertexId], a: VertexId, b: VertexId) -> bool {
    let n = loop_.len();
    (0..n).any(|i| loop_[i] == a && loop_[(i + 1) % n] == b)
}

/// Makes face winding consistent and outward. Returns the number of faces
/// whose winding changed.
///
/// Edges shared by more than two faces do not propagate orientation.
///
/// # Example
///
/// ```rust
/// use thread_mesh::{PolyMesh, ops::make_consistent};
/// use glam::DVec3;
///
/// let mut mesh = PolyMesh::new();
/// let o = mesh.add_vertex(DVec3::ZERO);
/// let x = mesh.add_vertex(DVec3::X);
/// let y = mesh.add_vertex(DVec3::Y);
/// let z = mesh.add_vertex(DVec3::Z);
/// // Every face wound inward
/// for f in [[o, x, y], [o, z, x], [o, y, z], [x, z, y]] {
///     mesh.add_face(&f).unwrap();
/// }
/// assert_eq!(make_consistent(&mut mesh).unwrap(), 4);
/// assert!(mesh.signed_volume() > 0.0);
/// ```
pub fn make_consistent(mesh: &mut PolyMesh) -> MeshResult<usize> {
    let (positions, edges, mut faces) = std::mem::take(mesh).into_parts();

    let mut users: HashMap<(u32, u32), Vec<usize>> = HashMap::new();
    for (f, loop_) in faces.iter().enumerate() {
        let n = loop_.len();
        for i in 0..n {
            let (a, b) = (loop_[i].0, loop_[(i + 1) % n].0);
            users.entry((a.min(b), a.max(b))).or_default().push(f);
        }
    }

    let mut component: Vec<Option<usize>> = vec![None; faces.len()];
    let mut flipped = vec![false; faces.len()];
    let mut components = 0;

    for start in 0..faces.len() {
        if component[start].is_some() {
            continue;
        }
        component[start] = Some(components);
        let mut members = vec![start];
        let mut queue = VecDeque::from([start]);

        while let Some(f) = queue.pop_front() {
            let loop_ = faces[f].clone();
            let n = loop_.len();
            for i in 0..n {
                let (a, b) = (loop_[i], loop_[(i + 1) % n]);
                let Some(sharing) = users.get(&(a.0.min(b.0), a.0.max(b.0))) else {
                    continue;
                };
                if sharing.len() != 2 {
                    continue;
                }
                let g = if sharing[0] == f { sharing[1] } else { sharing[0] };
                if g == f || component[g].is_some() {
                    continue;
                }
                if walks(&faces[g], a, b) {
                    faces[g].reverse();
                    flipped[g] = !flipped[g];
                }
                component[g] = Some(components);
                members.push(g);
                queue.push_back(g);
            }
        }

        let volume: f64 = members
            .iter()
            .map(|&f| loop_signed_volume(&positions, &faces[f]))
            .sum();
        if volume < 0.0 {
            for &f in &members {
                faces[f].reverse();
                flipped[f] = !flipped[f];
            }
        }
        components += 1;
    }

    let count = flipped.iter().filter(|f| **f).count();
    *mesh = PolyMesh::from_parts(positions, edges, faces)?;

    debug!(components, flipped = count, "make_consistent");

    Ok(count)
}
