//! # Bottle and Cap
//!
//! Derives a male neck thread and a matching female cap thread from one
//! parameter record and builds both solids concurrently.
//!
//! ## Derivation
//!
//! | | Bottle | Cap |
//! |---|---|---|
//! | Hand | male | female, with normals recalculated |
//! | Radius | `neck_radius` | `neck_radius + depth + clearance` |
//! | Closure | tube, wall `top_thickness` | cup, wall `depth` |
//! | Below thread | `neck_length` | `depth` |
//! | Above thread | `top_length` | `top_length` |
//!
//! Without `complete_body` both threads are generated as plain plugs.

use crate::assembler::{generate_thread, ThreadSolid};
use crate::body::{BodyParams, BodyProfile};
use crate::error::{GenerateError, GenerateResult};
use crate::params::{Closure, ThreadHand, ThreadParams};
use config::constants::{
    DEFAULT_CAP_ENLARGE_PERCENT, DEFAULT_DEPTH, DEFAULT_NECK_LENGTH, DEFAULT_NECK_RADIUS,
    DEFAULT_OVERALL_SCALE, DEFAULT_SKIP_OFFSET, DEFAULT_THREAD_HEIGHT, DEFAULT_THREAD_STEPS,
    DEFAULT_TOP_LENGTH, DEFAULT_TOP_THICKNESS, DEFAULT_TRAP, DEFAULT_VERTICES,
    DEFAULT_WELD_DISTANCE, EPSILON,
};
use serde::{Deserialize, Serialize};
use tracing::info;

/// Parameters for a bottle neck, its cap and the body profile.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct BottleParams {
    /// Vertices per revolution
    pub vertices: u32,
    /// Rise per full turn
    pub thread_height: f64,
    /// Number of helical steps
    pub thread_steps: u32,
    /// Neck radius the bottle thread is wound on
    pub neck_radius: f64,
    /// Trapezoid groove inset width
    pub trap: f64,
    /// Groove depth; also the cap's lip and wall thickness
    pub depth: f64,
    /// Interrupt the bottle thread
    pub bottle_skip: bool,
    /// Bottle skip offset
    pub bottle_skip_offset: u32,
    /// Interrupt the cap thread
    pub cap_skip: bool,
    /// Cap skip offset
    pub cap_skip_offset: u32,
    /// Enlarge the cap so the threads do not intersect
    pub enlarge_cap: bool,
    /// Cap clearance in percent of the neck radius
    pub enlarge_cap_percent: u32,
    /// Run the weld pass on both solids
    pub remove_doubles: bool,
    /// Weld distance
    pub weld_distance: f64,
    /// Uniform scale of every output
    pub overall_scale: f64,
    /// Generate neck, collar, walls and body; otherwise threads only
    pub complete_body: bool,
    /// Neck length below the thread
    pub neck_length: f64,
    /// Collar length above the thread
    pub top_length: f64,
    /// Neck wall thickness
    pub top_thickness: f64,
    /// Body profile
    pub body: BodyParams,
}

impl Default for BottleParams {
    fn default() -> Self {
        Self {
            vertices: DEFAULT_VERTICES,
            thread_height: DEFAULT_THREAD_HEIGHT,
            thread_steps: DEFAULT_THREAD_STEPS,
            neck_radius: DEFAULT_NECK_RADIUS,
            trap: DEFAULT_TRAP,
            depth: DEFAULT_DEPTH,
            bottle_skip: false,
            bottle_skip_offset: DEFAULT_SKIP_OFFSET,
            cap_skip: false,
            cap_skip_offset: DEFAULT_SKIP_OFFSET,
            enlarge_cap: true,
            enlarge_cap_percent: DEFAULT_CAP_ENLARGE_PERCENT,
            remove_doubles: true,
            weld_distance: DEFAULT_WELD_DISTANCE,
            overall_scale: DEFAULT_OVERALL_SCALE,
            complete_body: true,
            neck_length: DEFAULT_NECK_LENGTH,
            top_length: DEFAULT_TOP_LENGTH,
            top_thickness: DEFAULT_TOP_THICKNESS,
            body: BodyParams::default(),
        }
    }
}

impl BottleParams {
    /// Radial gap added to the cap thread.
    pub fn cap_clearance(&self) -> f64 {
        if self.enlarge_cap {
            self.neck_radius / 100.0 * self.enlarge_cap_percent as f64
        } else {
            0.0
        }
    }

    fn shared(&self) -> ThreadParams {
        ThreadParams {
            vertices: self.vertices,
            thread_height: self.thread_height,
            thread_steps: self.thread_steps,
            radius: self.neck_radius,
            trap: self.trap,
            depth: self.depth,
            weld: self.remove_doubles,
            weld_distance: self.weld_distance,
            overall_scale: self.overall_scale,
            ..ThreadParams::default()
        }
    }

    /// Parameters of the male bottle thread.
    pub fn bottle_thread(&self) -> ThreadParams {
        let shared = self.shared();
        let skip = self.bottle_skip.then_some(self.bottle_skip_offset);
        if !self.complete_body {
            return ThreadParams { skip, ..shared };
        }
        ThreadParams {
            skip,
            closure: Closure::Tube {
                wall: self.top_thickness,
            },
            neck_length: self.neck_length,
            top_length: self.top_length,
            ..shared
        }
    }

    /// Parameters of the female cap thread.
    pub fn cap_thread(&self) -> ThreadParams {
        let shared = self.shared();
        let radius = self.neck_radius + self.depth + self.cap_clearance();
        let skip = self.cap_skip.then_some(self.cap_skip_offset);
        let cap = ThreadParams {
            radius,
            skip,
            hand: ThreadHand::Female,
            recalculate_normals: true,
            ..shared
        };
        if !self.complete_body {
            return cap;
        }
        ThreadParams {
            closure: Closure::Cup { wall: self.depth },
            neck_length: self.depth,
            top_length: self.top_length,
            ..cap
        }
    }

    /// Z offsets at which the outputs sit in a shared scene.
    pub fn placement(&self) -> Placement {
        let base = self.body.base_drop() + self.neck_length + self.depth;
        Placement {
            bottle_z: base * self.overall_scale,
            cap_z: (self.thread_height / 2.0 + base) * self.overall_scale,
            body_z: base * self.overall_scale,
        }
    }

    /// Validates both derived thread records and the body profile.
    ///
    /// With `complete_body`, `depth` doubles as the cap wall and must be
    /// positive.
    pub fn validate(&self) -> GenerateResult<()> {
        if self.enlarge_cap_percent > 100 {
            return Err(GenerateError::out_of_range(
                "enlarge_cap_percent",
                self.enlarge_cap_percent,
                "expected 0..=100",
            ));
        }
        // The cap's cup wall is `depth` thick
        if self.complete_body && !(self.depth.is_finite() && self.depth > EPSILON) {
            return Err(GenerateError::out_of_range(
                "depth",
                self.depth,
                "must be positive to give the cap a wall",
            ));
        }
        self.bottle_thread().validate()?;
        self.cap_thread().validate()?;
        self.body.validate()
    }
}

/// Scene offsets along Z.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct Placement {
    /// Bottle neck
    pub bottle_z: f64,
    /// Cap, half a pitch higher so the threads interleave
    pub cap_z: f64,
    /// Body profile
    pub body_z: f64,
}

/// Everything [`generate_bottle_set`] produces.
#[derive(Debug, Clone)]
pub struct BottleSet {
    /// Male neck thread solid
    pub bottle: ThreadSolid,
    /// Female cap thread solid
    pub cap: ThreadSolid,
    /// Body profile, present with `complete_body`
    pub body: Option<BodyProfile>,
    /// Scene offsets
    pub placement: Placement,
}

/// Builds the bottle and the cap on two rayon workers, then the body.
///
/// # Example
///
/// ```rust
/// use bottle_gen::{generate_bottle_set, BottleParams};
///
/// let set = generate_bottle_set(&BottleParams::default()).unwrap();
/// assert!(set.body.is_some());
/// assert!(set.placement.cap_z > set.placement.bottle_z);
/// ```
pub fn generate_bottle_set(params: &BottleParams) -> GenerateResult<BottleSet> {
    params.validate()?;

    let bottle_params = params.bottle_thread();
    let cap_params = params.cap_thread();
    let (bottle, cap) = rayon::join(
        || generate_thread(&bottle_params),
        || generate_thread(&cap_params),
    );
    let (bottle, cap) = (bottle?, cap?);

    let body = if params.complete_body {
        Some(BodyProfile::build(
            &params.body,
            params.neck_radius,
            params.neck_length,
            params.depth,
            params.overall_scale,
        )?)
    } else {
        None
    };

    info!(
        bottle_faces = bottle.mesh.face_count(),
        cap_faces = cap.mesh.face_count(),
        body = body.is_some(),
        "bottle set generated"
    );

    Ok(BottleSet {
        bottle,
        cap,
        body,
        placement: params.placement(),
    })
}

// =============================================================================
// TESTS
// =============================================================================
