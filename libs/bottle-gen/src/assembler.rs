//! # Thread Solid Assembler
//!
//! Builds one thread solid by driving the mesh operators through a fixed
//! sequence of stages:
//!
//! ```text
//! SeedThread → SpinHelix → InsetShoulder → InsetGroove
//!   → CapBottomSeed → CapBottomSpin → CapBottomExtrude → Neck → CapBottomFold
//!   → CapTopSeed → CapTopSpin → CapTopExtrude → Collar → CapTopFold
//!   → InnerWallSeed → InnerWallSpin → Weld → Orient → ScaleGlobal → Done
//! ```
//!
//! Stages that do not apply to the parameters (no neck, no collar, no back
//! wall, weld disabled) pass through without touching the mesh. Every stage
//! hands its output to the next one through explicit element handles.
//!
//! ## Geometry
//!
//! With `v` vertices per turn, pitch `h` and `n` steps, the helix ribbon
//! winds from `z = 0` to `z = h * n / v + h`. Turn `k + v` lies directly on
//! top of turn `k`, so after welding the ribbon is one surface whose only
//! open edges are the first turn's lower edge, the last turn's upper edge
//! and the two short ends. The bottom cap spins a ring over the first turn
//! and flattens its copy onto `z = 0`; the top cap starts at the helix exit
//! angle and walks the last turn backward, flattening onto the top plane.
//! Folding then pulls each flat ring onto the axis or the back wall.

use crate::error::GenerateResult;
use crate::params::{Closure, ThreadHand, ThreadParams};
use glam::DVec3;
use std::f64::consts::TAU;
use thread_mesh::ops::{
    extrude_edges, inset_region, make_consistent, remove_doubles, rotate, scale, scale_global, spin,
    InsetParams, SpinParams,
};
use thread_mesh::{EdgeId, FaceId, PolyMesh, VertexId};
use tracing::{debug, info, warn};

/// Assembly stage, in execution order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Stage {
    /// Two-point seed edge of the thread band
    SeedThread,
    /// Helical ribbon
    SpinHelix,
    /// Shoulder inset of the groove faces
    InsetShoulder,
    /// Trapezoid groove inset with depth
    InsetGroove,
    /// Single seed point of the bottom ring
    CapBottomSeed,
    /// Bottom ring following the first turn
    CapBottomSpin,
    /// Bottom ring flattened onto `z = 0`
    CapBottomExtrude,
    /// Straight band below the thread
    Neck,
    /// Bottom rim folded onto the axis or the back wall
    CapBottomFold,
    /// Phase-aligned seed point of the top ring
    CapTopSeed,
    /// Top ring following the last turn backward
    CapTopSpin,
    /// Top ring flattened onto the thread top
    CapTopExtrude,
    /// Straight band above the thread
    Collar,
    /// Top rim folded onto the axis or the back wall
    CapTopFold,
    /// Back wall profile
    InnerWallSeed,
    /// Back wall revolved
    InnerWallSpin,
    /// Vertex weld
    Weld,
    /// Face winding made consistent
    Orient,
    /// Uniform scale
    ScaleGlobal,
    /// Finished
    Done,
}

impl Stage {
    /// The stage after this one. `Done` stays `Done`.
    pub fn next(self) -> Stage {
        use Stage::*;
        match self {
            SeedThread => SpinHelix,
            SpinHelix => InsetShoulder,
            InsetShoulder => InsetGroove,
            InsetGroove => CapBottomSeed,
            CapBottomSeed => CapBottomSpin,
            CapBottomSpin => CapBottomExtrude,
            CapBottomExtrude => Neck,
            Neck => CapBottomFold,
            CapBottomFold => CapTopSeed,
            CapTopSeed => CapTopSpin,
            CapTopSpin => CapTopExtrude,
            CapTopExtrude => Collar,
            Collar => CapTopFold,
            CapTopFold => InnerWallSeed,
            InnerWallSeed => InnerWallSpin,
            InnerWallSpin => Weld,
            Weld => Orient,
            Orient => ScaleGlobal,
            ScaleGlobal => Done,
            Done => Done,
        }
    }
}

/// Figures recorded while assembling.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ThreadStats {
    /// Vertex count before the weld
    pub pre_weld_vertices: usize,
    /// Vertex count after the weld (equal to the above when skipped)
    pub post_weld_vertices: usize,
    /// Helix faces that received a groove
    pub groove_faces: usize,
    /// Faces whose winding the orient stage changed
    pub reoriented_faces: usize,
    /// Azimuth of the helix's last seed copy, radians in `[0, 2π)`
    pub exit_azimuth: f64,
    /// Azimuth of the top ring seed after phase alignment, radians in `[0, 2π)`
    pub top_seed_azimuth: f64,
    /// Vertical extent of the finished solid
    pub height: f64,
}

/// A finished thread solid.
#[derive(Debug, Clone)]
pub struct ThreadSolid {
    /// Welded, scaled mesh
    pub mesh: PolyMesh,
    /// Assembly figures
    pub stats: ThreadStats,
}

/// Drives one thread solid through [`Stage`]s.
///
/// # Example
///
/// ```rust
/// use bottle_gen::{Stage, ThreadAssembler, ThreadParams};
///
/// let mut assembler = ThreadAssembler::new(ThreadParams::default()).unwrap();
/// assert_eq!(assembler.stage(), Stage::SeedThread);
/// assembler.step().unwrap();
/// assert_eq!(assembler.stage(), Stage::SpinHelix);
///
/// let solid = assembler.run().unwrap();
/// assert!(solid.stats.post_weld_vertices < solid.stats.pre_weld_vertices);
/// ```
#[derive(Debug)]
pub struct ThreadAssembler {
    params: ThreadParams,
    mesh: PolyMesh,
    stage: Stage,
    /// Seed chain waiting for the next spin stage
    seed: (Vec<VertexId>, Vec<EdgeId>),
    grooves: Vec<FaceId>,
    /// Ring edges waiting for the next extrude
    ring: Vec<EdgeId>,
    /// Rim edges waiting for the next fold
    rim: Vec<EdgeId>,
    z_bottom: f64,
    z_top: f64,
    stats: ThreadStats,
}

fn azimuth(p: DVec3) -> f64 {
    p.y.atan2(p.x).rem_euclid(TAU)
}

impl ThreadAssembler {
    /// Validates `params` and prepares an empty mesh.
    pub fn new(params: ThreadParams) -> GenerateResult<Self> {
        params.validate()?;
        let estimate = (params.thread_steps as usize + 2) * 6 + params.vertices as usize * 12;
        Ok(Self {
            mesh: PolyMesh::with_capacity(estimate, estimate),
            stage: Stage::SeedThread,
            seed: (Vec::new(), Vec::new()),
            grooves: Vec::new(),
            ring: Vec::new(),
            rim: Vec::new(),
            z_bottom: 0.0,
            z_top: params.thread_top(),
            stats: ThreadStats::default(),
            params,
        })
    }

    /// Stage that the next [`step`](Self::step) runs.
    pub fn stage(&self) -> Stage {
        self.stage
    }

    /// Mesh built so far.
    pub fn mesh(&self) -> &PolyMesh {
        &self.mesh
    }

    /// Parameters in use.
    pub fn params(&self) -> &ThreadParams {
        &self.params
    }

    /// Runs the current stage and advances. Returns the new stage.
    ///
    /// # Errors
    ///
    /// The failing operator's error. The assembler should be dropped after
    /// an error; its mesh is incomplete.
    pub fn step(&mut self) -> GenerateResult<Stage> {
        let stage = self.stage;
        match stage {
            Stage::SeedThread => self.seed_thread()?,
            Stage::SpinHelix => self.spin_helix()?,
            Stage::InsetShoulder => self.inset(self.params.shoulder(), 0.0, true)?,
            Stage::InsetGroove => self.inset(self.params.trap, self.params.depth, false)?,
            Stage::CapBottomSeed => self.seed_point(DVec3::new(self.params.radius, 0.0, 0.0), 0.0)?,
            Stage::CapBottomSpin => self.spin_ring(DVec3::Z, self.params.step_rise())?,
            Stage::CapBottomExtrude => self.flatten(0.0)?,
            Stage::Neck => self.neck()?,
            Stage::CapBottomFold => self.fold(self.bottom_fold_factor(), self.z_bottom)?,
            Stage::CapTopSeed => {
                let phase = self.params.step_angle() * self.params.residual_steps() as f64;
                let seed = DVec3::new(self.params.radius, 0.0, self.params.thread_top());
                self.seed_point(seed, phase)?;
            }
            Stage::CapTopSpin => self.spin_ring(DVec3::NEG_Z, -self.params.step_rise())?,
            Stage::CapTopExtrude => self.flatten(self.params.thread_top())?,
            Stage::Collar => self.collar()?,
            Stage::CapTopFold => self.fold(self.top_fold_factor(), self.z_top)?,
            Stage::InnerWallSeed => self.seed_wall()?,
            Stage::InnerWallSpin => self.spin_wall()?,
            Stage::Weld => self.weld()?,
            Stage::Orient => {
                if self.params.recalculate_normals {
                    self.stats.reoriented_faces = make_consistent(&mut self.mesh)?;
                }
            }
            Stage::ScaleGlobal => {
                scale_global(&mut self.mesh, self.params.overall_scale)?;
                let (min, max) = self.mesh.bounding_box();
                self.stats.height = max.z - min.z;
            }
            Stage::Done => return Ok(Stage::Done),
        }

        debug!(
            ?stage,
            vertices = self.mesh.vertex_count(),
            faces = self.mesh.face_count(),
            "assembler stage"
        );

        self.stage = stage.next();
        Ok(self.stage)
    }

    /// Runs all remaining stages and returns the finished solid.
    pub fn run(mut self) -> GenerateResult<ThreadSolid> {
        while self.stage != Stage::Done {
            self.step()?;
        }

        info!(
            hand = ?self.params.hand,
            closure = ?self.params.closure,
            vertices = self.mesh.vertex_count(),
            faces = self.mesh.face_count(),
            welded = self.stats.pre_weld_vertices - self.stats.post_weld_vertices,
            "thread solid generated"
        );

        Ok(ThreadSolid {
            mesh: self.mesh,
            stats: self.stats,
        })
    }

    // =========================================================================
    // THREAD BAND
    // =========================================================================

    /// Adds an edge between `upper` and `lower` wound for the thread hand.
    fn hand_edge(&mut self, upper: VertexId, lower: VertexId) -> GenerateResult<EdgeId> {
        let edge = match self.params.hand {
            ThreadHand::Male => self.mesh.add_edge(upper, lower)?,
            ThreadHand::Female => self.mesh.add_edge(lower, upper)?,
        };
        Ok(edge)
    }

    fn seed_thread(&mut self) -> GenerateResult<()> {
        let r = self.params.radius;
        let upper = self.mesh.add_vertex(DVec3::new(r, 0.0, self.params.thread_height));
        let lower = self.mesh.add_vertex(DVec3::new(r, 0.0, 0.0));
        let edge = self.hand_edge(upper, lower)?;
        self.seed = (vec![upper, lower], vec![edge]);
        Ok(())
    }

    fn spin_helix(&mut self) -> GenerateResult<()> {
        let (vertices, edges) = std::mem::take(&mut self.seed);
        let params = SpinParams::helix(self.params.vertices, self.params.thread_steps, self.params.thread_height);
        let swept = spin(&mut self.mesh, &vertices, &edges, &params)?;

        self.grooves = match self.params.skip {
            Some(skip) => swept
                .created
                .faces
                .iter()
                .enumerate()
                .filter(|(i, _)| i % skip as usize != 0)
                .map(|(_, f)| *f)
                .collect(),
            None => swept.created.faces.clone(),
        };
        self.stats.groove_faces = self.grooves.len();

        if let Some(exit) = swept.frontier().first() {
            self.stats.exit_azimuth = azimuth(self.mesh.position(*exit)?);
        }
        Ok(())
    }

    fn inset(&mut self, thickness: f64, depth: f64, use_boundary: bool) -> GenerateResult<()> {
        let params = InsetParams {
            thickness,
            depth,
            use_boundary,
            use_even_offset: true,
        };
        inset_region(&mut self.mesh, &self.grooves, &params)?;
        Ok(())
    }

    // =========================================================================
    // END CAPS
    // =========================================================================

    /// Adds a lone seed point rotated by `phase` about Z.
    fn seed_point(&mut self, position: DVec3, phase: f64) -> GenerateResult<()> {
        let v = self.mesh.add_vertex(position);
        if phase != 0.0 {
            rotate(&mut self.mesh, &[v], phase, DVec3::Z, DVec3::ZERO)?;
        }
        if self.stage == Stage::CapTopSeed {
            self.stats.top_seed_azimuth = azimuth(self.mesh.position(v)?);
        }
        self.seed = (vec![v], Vec::new());
        Ok(())
    }

    /// Spins the pending seed point one full turn, rising `rise` per step.
    fn spin_ring(&mut self, axis: DVec3, rise: f64) -> GenerateResult<()> {
        let (vertices, edges) = std::mem::take(&mut self.seed);
        let params = SpinParams {
            axis,
            offset: DVec3::new(0.0, 0.0, rise),
            ..SpinParams::revolve(self.params.vertices)
        };
        let swept = spin(&mut self.mesh, &vertices, &edges, &params)?;
        self.ring = swept.ring_edges.into_iter().next().unwrap_or_default();
        Ok(())
    }

    /// Extrudes the pending ring and flattens the copy onto `z = plane`.
    fn flatten(&mut self, plane: f64) -> GenerateResult<()> {
        let ring = std::mem::take(&mut self.ring);
        let out = extrude_edges(&mut self.mesh, &ring, self.params.hand.faces_outward())?;
        scale(
            &mut self.mesh,
            &out.created.vertices,
            DVec3::new(1.0, 1.0, 0.0),
            DVec3::new(0.0, 0.0, plane),
        )?;
        self.rim = out.boundary;
        Ok(())
    }

    /// Revolves a vertical band between `lower_z` and `upper_z` and returns
    /// the ring edges of the upper and lower seed.
    fn band(&mut self, lower_z: f64, upper_z: f64) -> GenerateResult<(Vec<EdgeId>, Vec<EdgeId>)> {
        let r = self.params.radius;
        let upper = self.mesh.add_vertex(DVec3::new(r, 0.0, upper_z));
        let lower = self.mesh.add_vertex(DVec3::new(r, 0.0, lower_z));
        let edge = self.hand_edge(upper, lower)?;
        let swept = spin(
            &mut self.mesh,
            &[upper, lower],
            &[edge],
            &SpinParams::revolve(self.params.vertices),
        )?;
        let mut rings = swept.ring_edges.into_iter();
        let upper_ring = rings.next().unwrap_or_default();
        let lower_ring = rings.next().unwrap_or_default();
        Ok((upper_ring, lower_ring))
    }

    fn neck(&mut self) -> GenerateResult<()> {
        let length = self.params.neck_length;
        if length > 0.0 {
            let (_, lower) = self.band(-length, 0.0)?;
            self.rim = lower;
            self.z_bottom = -length;
        }
        Ok(())
    }

    fn collar(&mut self) -> GenerateResult<()> {
        let top = self.params.thread_top();
        let length = self.params.top_length;
        if length > 0.0 {
            let (upper, _) = self.band(top, top + length)?;
            self.rim = upper;
            self.z_top = top + length;
        }
        Ok(())
    }

    fn bottom_fold_factor(&self) -> f64 {
        match self.params.back_radius() {
            Some(back) => back / self.params.radius,
            None => 0.0,
        }
    }

    fn top_fold_factor(&self) -> f64 {
        match (self.params.closure, self.params.back_radius()) {
            (Closure::Tube { .. }, Some(back)) => back / self.params.radius,
            _ => 0.0,
        }
    }

    /// Extrudes the pending rim and scales the copy radially by `factor`
    /// about the axis point at `z`.
    fn fold(&mut self, factor: f64, z: f64) -> GenerateResult<()> {
        let rim = std::mem::take(&mut self.rim);
        let out = extrude_edges(&mut self.mesh, &rim, self.params.hand.faces_outward())?;
        scale(
            &mut self.mesh,
            &out.created.vertices,
            DVec3::new(factor, factor, 1.0),
            DVec3::new(0.0, 0.0, z),
        )?;
        Ok(())
    }

    // =========================================================================
    // BACK WALL
    // =========================================================================

    /// Profile of the back wall in the (radius, z) plane, ordered bottom up.
    fn wall_profile(&self) -> Vec<(f64, f64)> {
        let (Some(wall), Some(back)) = (self.params.closure.wall(), self.params.back_radius()) else {
            return Vec::new();
        };
        match self.params.closure {
            Closure::Plug => Vec::new(),
            Closure::Tube { .. } => vec![(back, self.z_bottom), (back, self.z_top)],
            Closure::Cup { .. } => {
                let ceiling = match self.params.hand {
                    ThreadHand::Male => self.z_top - wall,
                    ThreadHand::Female => self.z_top + wall,
                };
                vec![(back, self.z_bottom), (back, ceiling), (0.0, ceiling)]
            }
        }
    }

    fn seed_wall(&mut self) -> GenerateResult<()> {
        let mut profile = self.wall_profile();
        if profile.is_empty() {
            return Ok(());
        }
        if self.params.hand == ThreadHand::Female {
            profile.reverse();
        }

        let vertices: Vec<VertexId> = profile
            .iter()
            .map(|&(r, z)| self.mesh.add_vertex(DVec3::new(r, 0.0, z)))
            .collect();
        let mut edges = Vec::with_capacity(vertices.len() - 1);
        for pair in vertices.windows(2) {
            edges.push(self.mesh.add_edge(pair[0], pair[1])?);
        }
        self.seed = (vertices, edges);
        Ok(())
    }

    fn spin_wall(&mut self) -> GenerateResult<()> {
        let (vertices, edges) = std::mem::take(&mut self.seed);
        if vertices.is_empty() {
            return Ok(());
        }
        spin(&mut self.mesh, &vertices, &edges, &SpinParams::revolve(self.params.vertices))?;
        Ok(())
    }

    // =========================================================================
    // FINISH
    // =========================================================================

    fn weld(&mut self) -> GenerateResult<()> {
        let before = self.mesh.vertex_count();
        self.stats.pre_weld_vertices = before;
        self.stats.post_weld_vertices = before;

        let distance = self.params.weld_distance;
        if !self.params.weld || distance == 0.0 {
            return Ok(());
        }

        let all: Vec<VertexId> = self.mesh.vertices().collect();
        let report = remove_doubles(&mut self.mesh, &all, distance)?;
        if report.merged == 0 {
            warn!(distance, "weld merged no vertices");
        }
        self.stats.post_weld_vertices = self.mesh.vertex_count();
        Ok(())
    }
}

/// Builds one thread solid from `params`.
///
/// # Example
///
/// ```rust
/// use bottle_gen::{generate_thread, ThreadParams};
/// use thread_mesh::TopologyReport;
///
/// let solid = generate_thread(&ThreadParams::default()).unwrap();
/// assert!(TopologyReport::analyze(&solid.mesh).is_closed_solid());
/// ```
pub fn generate_thread(params: &ThreadParams) -> GenerateResult<ThreadSolid> {
    ThreadAssembler::new(params.clone())?.run()
}

// =============================================================================
// TESTS
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_stage_order_ends_in_done() {
        let mut stage = Stage::SeedThread;
        let mut count = 0;
        while stage != Stage::Done {
            stage = stage.next();
            count += 1;
        }
        assert_eq!(count, 19);
        assert_eq!(Stage::Done.next(), Stage::Done);
    }

    #[test]
    fn test_new_rejects_invalid_params() {
        let params = ThreadParams {
            vertices: 2,
            ..ThreadParams::default()
        };
        assert!(ThreadAssembler::new(params).is_err());
    }

    #[test]
    fn test_seed_then_helix() {
        let mut assembler = ThreadAssembler::new(ThreadParams::default()).unwrap();
        assembler.step().unwrap();
        assert_eq!(assembler.mesh().vertex_count(), 2);
        assert_eq!(assembler.mesh().edge_count(), 1);

        assembler.step().unwrap();
        assert_eq!(assembler.mesh().face_count(), 28);
        assert_eq!(assembler.mesh().vertex_count(), 58);
    }

    #[test]
    fn test_stepping_matches_run() {
        let mut assembler = ThreadAssembler::new(ThreadParams::default()).unwrap();
        let mut stages = 0;
        while assembler.step().unwrap() != Stage::Done {
            stages += 1;
        }
        assert_eq!(stages, 18);
        assert_eq!(assembler.step().unwrap(), Stage::Done);

        let stepped = assembler.mesh().vertex_count();
        let run = generate_thread(&ThreadParams::default()).unwrap();
        assert_eq!(stepped, run.mesh.vertex_count());
    }

    #[test]
    fn test_fold_factors() {
        let tube = ThreadAssembler::new(ThreadParams {
            closure: Closure::Tube { wall: 0.3 },
            ..ThreadParams::default()
        })
        .unwrap();
        assert_relative_eq!(tube.bottom_fold_factor(), (1.48 - 0.3) / 1.48);
        assert_relative_eq!(tube.top_fold_factor(), (1.48 - 0.3) / 1.48);

        let cup = ThreadAssembler::new(ThreadParams {
            hand: ThreadHand::Female,
            closure: Closure::Cup { wall: 0.2 },
            ..ThreadParams::default()
        })
        .unwrap();
        assert_relative_eq!(cup.bottom_fold_factor(), (1.48 + 0.2) / 1.48);
        assert_eq!(cup.top_fold_factor(), 0.0);

        let plug = ThreadAssembler::new(ThreadParams::default()).unwrap();
        assert_eq!(plug.bottom_fold_factor(), 0.0);
        assert_eq!(plug.top_fold_factor(), 0.0);
    }

    #[test]
    fn test_wall_profile_shapes() {
        let mut tube = ThreadAssembler::new(ThreadParams {
            closure: Closure::Tube { wall: 0.3 },
            neck_length: 0.1,
            top_length: 0.1,
            ..ThreadParams::default()
        })
        .unwrap();
        while tube.stage() != Stage::InnerWallSeed {
            tube.step().unwrap();
        }
        let profile = tube.wall_profile();
        assert_eq!(profile.len(), 2);
        assert_relative_eq!(profile[0].1, -0.1);
        assert_relative_eq!(profile[1].1, tube.params().thread_top() + 0.1);

        let plug = ThreadAssembler::new(ThreadParams::default()).unwrap();
        assert!(plug.wall_profile().is_empty());
    }
}
