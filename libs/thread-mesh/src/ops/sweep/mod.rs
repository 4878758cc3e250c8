//! # Spin
//!
//! Revolves a seed chain around an axis in discrete steps. Each step copies
//! the current frontier, rotates the copy by `angle / steps` about the axis
//! through `center`, adds `offset`, and bridges old and new frontier:
//!
//! ```text
//!   a ──── a'        one step of a seed edge (a, b)
//!   │  f   │         f = [a, b, b', a']
//!   b ──── b'
//! ```
//!
//! With a non-zero `offset` along the axis this winds a helical ribbon;
//! with zero offset and a full turn it sweeps a surface of revolution.
//! The last ring is never fused with the first. Closing that seam is the
//! weld operator's job.

use super::Created;
use crate::error::{MeshError, MeshResult};
use crate::mesh::{EdgeId, PolyMesh, VertexId};
use config::constants::{DEFAULT_VERTICES, EPSILON};
use glam::{DQuat, DVec3};
use std::collections::hash_map::{Entry, HashMap};
use tracing::debug;


/// Parameters for [`spin`].
#[derive(Debug, Clone, PartialEq)]
pub struct SpinParams {
    /// Rotation axis (need not be normalized)
    pub axis: DVec3,
    /// Point the axis passes through
    pub center: DVec3,
    /// Translation added after each step's rotation
    pub offset: DVec3,
    /// Total rotation in radians, split evenly over the steps
    pub angle: f64,
    /// Number of copies of the seed
    pub steps: u32,
}

impl Default for SpinParams {
    fn default() -> Self {
        Self::revolve(DEFAULT_VERTICES)
    }
}

impl SpinParams {
    /// Full turn about +Z through the origin without rise.
    pub fn revolve(steps: u32) -> Self {
        Self {
            axis: DVec3::Z,
            center: DVec3::ZERO,
            offset: DVec3::ZERO,
            angle: std::f64::consts::TAU,
            steps,
        }
    }

    /// Helix about +Z: `steps` steps of one `vertices`-th of a turn each,
    /// rising `pitch` per full turn.
    ///
    /// # Example
    ///
    /// ```rust
    /// use thread_mesh::ops::SpinParams;
    ///
    /// let p = SpinParams::helix(12, 28, 0.5);
    /// assert!((p.offset.z - 0.5 / 12.0).abs() < 1e-12);
    /// ```
    pub fn helix(vertices: u32, steps: u32, pitch: f64) -> Self {
        let turn = std::f64::consts::TAU / vertices.max(1) as f64;
        Self {
            axis: DVec3::Z,
            center: DVec3::ZERO,
            offset: DVec3::new(0.0, 0.0, pitch / vertices.max(1) as f64),
            angle: turn * steps as f64,
            steps,
        }
    }

    fn validate(&self) -> MeshResult<()> {
        if self.steps < 1 {
            return Err(MeshError::InvalidStepCount { steps: self.steps });
        }
        if !self.axis.is_finite() || self.axis.length_squared() < EPSILON {
            return Err(MeshError::out_of_range("axis", "spin axis has zero length"));
        }
        if !self.angle.is_finite() || !self.offset.is_finite() || !self.center.is_finite() {
            return Err(MeshError::out_of_range("angle", "spin parameters must be finite"));
        }
        Ok(())
    }
}

/// Output of [`spin`].
#[derive(Debug, Clone, Default)]
pub struct Swept {
    /// Everything the spin added
    pub created: Created,
    /// Per seed vertex: the seed followed by its `steps` copies
    pub rings: Vec<Vec<VertexId>>,
    /// Per seed vertex: the `steps` edges joining consecutive copies
    pub ring_edges: Vec<Vec<EdgeId>>,
    /// Final copies of the seed edges, in seed order
    pub frontier_edges: Vec<EdgeId>,
}

impl Swept {
    /// Final copy of every seed vertex, in seed order.
    pub fn frontier(&self) -> Vec<VertexId> {
        self.rings.iter().filter_map(|ring| ring.last().copied()).collect()
    }
}

/// Revolves `seed_vertices` (and the `seed_edges` between them) `steps` times.
///
/// # Arguments
///
/// * `mesh` - Mesh to extend
/// * `seed_vertices` - Vertices to sweep
/// * `seed_edges` - Edges between seed vertices; each produces a strip of quads
/// * `params` - Axis, center, per-step offset, total angle and step count
///
/// # Errors
///
/// `InvalidStepCount` when `steps < 1`; `InvalidReference` when a seed edge
/// touches a vertex that is not a seed.
///
/// # Example
///
/// ```rust
/// use thread_mesh::{PolyMesh, ops::{spin, SpinParams}};
/// use glam::DVec3;
///
/// let mut mesh = PolyMesh::new();
/// let top = mesh.add_vertex(DVec3::new(1.0, 0.0, 0.5));
/// let bottom = mesh.add_vertex(DVec3::new(1.0, 0.0, 0.0));
/// let seed = mesh.add_edge(top, bottom).unwrap();
///
/// let swept = spin(&mut mesh, &[top, bottom], &[seed], &SpinParams::helix(12, 24, 0.5)).unwrap();
/// assert_eq!(swept.created.faces.len(), 24);
/// ```
pub fn spin(
    mesh: &mut PolyMesh,
    seed_vertices: &[VertexId],
    seed_edges: &[EdgeId],
    params: &SpinParams,
) -> MeshResult<Swept> {
    params.validate()?;

    let mut seeds: Vec<VertexId> = Vec::with_capacity(seed_vertices.len());
    let mut slot: HashMap<VertexId, usize> = HashMap::with_capacity(seed_vertices.len());
    for &v in seed_vertices {
        mesh.position(v)?;
        if let Entry::Vacant(entry) = slot.entry(v) {
            entry.insert(seeds.len());
            seeds.push(v);
        }
    }

    let mut links = Vec::with_capacity(seed_edges.len());
    for &e in seed_edges {
        let [a, b] = mesh.edge(e)?;
        match (slot.get(&a), slot.get(&b)) {
            (Some(&ia), Some(&ib)) => links.push((ia, ib)),
            _ => {
                return Err(MeshError::invalid_reference(format!(
                    "seed edge {} touches a vertex outside the seed set",
                    e.0
                )))
            }
        }
    }

    let rotation = DQuat::from_axis_angle(params.axis.normalize(), params.angle / params.steps as f64);
    let step_count = params.steps as usize;

    let mut swept = Swept {
        created: Created {
            vertices: Vec::with_capacity(seeds.len() * step_count),
            edges: Vec::with_capacity((seeds.len() + links.len()) * step_count),
            faces: Vec::with_capacity(links.len() * step_count),
        },
        rings: seeds.iter().map(|v| vec![*v]).collect(),
        ring_edges: vec![Vec::with_capacity(step_count); seeds.len()],
        frontier_edges: seed_edges.to_vec(),
    };

    let mut frontier = seeds.clone();
    for _ in 0..params.steps {
        let mut next = Vec::with_capacity(frontier.len());
        for &v in &frontier {
            let p = mesh.position(v)?;
            let moved = params.center + rotation * (p - params.center) + params.offset;
            let copy = mesh.add_vertex(moved);
            swept.created.vertices.push(copy);
            next.push(copy);
        }

        for (i, (&old, &new)) in frontier.iter().zip(&next).enumerate() {
            let e = mesh.add_edge(old, new)?;
            swept.created.edges.push(e);
            swept.ring_edges[i].push(e);
            swept.rings[i].push(new);
        }

        for (k, &(ia, ib)) in links.iter().enumerate() {
            let e = mesh.add_edge(next[ia], next[ib])?;
            swept.created.edges.push(e);
            swept.frontier_edges[k] = e;
            let f = mesh.add_face(&[frontier[ia], frontier[ib], next[ib], next[ia]])?;
            swept.created.faces.push(f);
        }

        frontier = next;
    }

    debug!(
        seeds = seeds.len(),
        strips = links.len(),
        steps = params.steps,
        vertices = swept.created.vertices.len(),
        faces = swept.created.faces.len(),
        "spin"
    );

    Ok(swept)
}
