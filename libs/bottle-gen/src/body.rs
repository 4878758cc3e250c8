//! # Bottle Body
//!
//! Side profile of the bottle below the neck, as an edge chain in the XZ
//! plane. The chain starts at the bottom of the neck and either stops after
//! one short segment (a seed for an external revolve) or follows the five
//! manual profile points and closes on the axis.
//!
//! [`BodyProfile::revolve`] turns the chain into a surface of revolution.

use crate::error::{GenerateError, GenerateResult};
use config::constants::{DEFAULT_BODY_X, DEFAULT_BODY_Z, SEAM_WELD_DISTANCE};
use glam::DVec3;
use serde::{Deserialize, Serialize};
use thread_mesh::ops::{remove_doubles, scale_global, spin, SpinParams};
use thread_mesh::{EdgeId, MeshError, PolyMesh, VertexId};
use tracing::debug;

/// Manual body profile.
///
/// Point `i` sits `x[i]` outside the neck radius and `z[i]` below the
/// neck's lower lip.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct BodyParams {
    /// Follow the manual profile; otherwise emit only the two-point seed
    pub manual: bool,
    /// Radial offsets
    pub x: [f64; 5],
    /// Drops
    pub z: [f64; 5],
}

impl Default for BodyParams {
    fn default() -> Self {
        Self {
            manual: true,
            x: DEFAULT_BODY_X,
            z: DEFAULT_BODY_Z,
        }
    }
}

impl BodyParams {
    /// Rejects non-finite profile values.
    pub fn validate(&self) -> GenerateResult<()> {
        for (&value, parameter) in self.x.iter().zip(["x1", "x2", "x3", "x4", "x5"]) {
            if !value.is_finite() {
                return Err(GenerateError::out_of_range(parameter, value, "must be finite"));
            }
        }
        for (&value, parameter) in self.z.iter().zip(["z1", "z2", "z3", "z4", "z5"]) {
            if !value.is_finite() {
                return Err(GenerateError::out_of_range(parameter, value, "must be finite"));
            }
        }
        Ok(())
    }

    /// Lowest drop, which sets where the body's base ends up.
    pub fn base_drop(&self) -> f64 {
        self.z[4]
    }
}

/// Edge-only body profile.
#[derive(Debug, Clone)]
pub struct BodyProfile {
    /// Profile chain, already scaled
    pub mesh: PolyMesh,
    /// Chain vertices from the neck downward
    pub chain: Vec<VertexId>,
    /// Chain edges in the same order
    pub edges: Vec<EdgeId>,
}

impl BodyProfile {
    /// Builds the profile below a neck of `radius` whose lower lip sits at
    /// `-(neck_length + depth)`.
    pub fn build(
        params: &BodyParams,
        radius: f64,
        neck_length: f64,
        depth: f64,
        overall_scale: f64,
    ) -> GenerateResult<Self> {
        params.validate()?;

        let lip = -neck_length - depth;
        let mut points = vec![DVec3::new(radius, 0.0, -neck_length), DVec3::new(radius, 0.0, lip)];
        if params.manual {
            for (x, z) in params.x.iter().zip(&params.z) {
                points.push(DVec3::new(radius + x, 0.0, lip - z));
            }
            points.push(DVec3::new(0.0, 0.0, lip - params.base_drop()));
        }

        let mut mesh = PolyMesh::with_capacity(points.len(), 0);
        let chain: Vec<VertexId> = points.into_iter().map(|p| mesh.add_vertex(p)).collect();
        let mut edges = Vec::with_capacity(chain.len() - 1);
        for pair in chain.windows(2) {
            edges.push(mesh.add_edge(pair[0], pair[1])?);
        }
        scale_global(&mut mesh, overall_scale)?;

        debug!(manual = params.manual, points = chain.len(), "body profile");

        Ok(Self { mesh, chain, edges })
    }

    /// Revolves the profile into a surface with `steps` segments and closes
    /// its seam.
    ///
    /// # Errors
    ///
    /// `InvalidStepCount` when `steps < 1`.
    pub fn revolve(&self, steps: u32) -> GenerateResult<PolyMesh> {
        if steps == 0 {
            return Err(MeshError::InvalidStepCount { steps }.into());
        }
        let mut mesh = self.mesh.clone();
        spin(&mut mesh, &self.chain, &self.edges, &SpinParams::revolve(steps))?;
        let all: Vec<VertexId> = mesh.vertices().collect();
        remove_doubles(&mut mesh, &all, SEAM_WELD_DISTANCE)?;
        Ok(mesh)
    }
}

// =============================================================================
// TESTS
// =============================================================================
