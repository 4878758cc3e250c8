//! # Thread Parameters
//!
//! Parameter record for one thread solid. Values are supplied once per
//! generation and never change while the assembler runs.
//!
//! Out-of-range values are rejected with
//! [`GenerateError::ParameterOutOfRange`]; nothing is clamped.

use crate::error::{GenerateError, GenerateResult};
use config::constants::{
    DEFAULT_DEPTH, DEFAULT_NECK_RADIUS, DEFAULT_OVERALL_SCALE, DEFAULT_THREAD_HEIGHT,
    DEFAULT_THREAD_STEPS, DEFAULT_TRAP, DEFAULT_VERTICES, DEFAULT_WELD_DISTANCE, EPSILON,
    MAX_THREAD_STEPS, MAX_VERTICES, MIN_VERTICES, SHOULDER_DIVISOR,
};
use serde::{Deserialize, Serialize};
use thread_mesh::MeshError;

/// Which side of the thread surface the material is on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ThreadHand {
    /// Thread on the outside of a neck; surface faces away from the axis.
    #[default]
    Male,
    /// Thread on the inside of a cap; surface faces the axis.
    Female,
}

impl ThreadHand {
    /// Whether faces of this hand point away from the axis.
    pub fn faces_outward(self) -> bool {
        matches!(self, ThreadHand::Male)
    }
}

/// How the two open ends of the thread band are closed.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Closure {
    /// Both ends fold onto the axis: a solid threaded plug.
    #[default]
    Plug,
    /// Both ends fold onto a back wall `wall` away from the thread radius,
    /// which closes a hollow tube.
    Tube {
        /// Wall thickness
        wall: f64,
    },
    /// The lower end folds onto a back wall, the upper end onto the axis,
    /// and the back wall continues `wall` past the top into a cover disk.
    Cup {
        /// Wall thickness
        wall: f64,
    },
}

impl Closure {
    /// Back wall thickness, if any.
    pub fn wall(self) -> Option<f64> {
        match self {
            Closure::Plug => None,
            Closure::Tube { wall } | Closure::Cup { wall } => Some(wall),
        }
    }
}

/// Parameters of one thread solid.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ThreadParams {
    /// Vertices per revolution
    pub vertices: u32,
    /// Rise per full turn
    pub thread_height: f64,
    /// Number of helical steps, each one `vertices`-th of a turn
    pub thread_steps: u32,
    /// Radius the thread surface is wound on
    pub radius: f64,
    /// Trapezoid groove inset width
    pub trap: f64,
    /// Groove depth along the surface normal
    pub depth: f64,
    /// Leave every n-th helix face ungrooved
    pub skip: Option<u32>,
    /// Side the material is on
    pub hand: ThreadHand,
    /// End closure shape
    pub closure: Closure,
    /// Straight band below the thread
    pub neck_length: f64,
    /// Straight band above the thread
    pub top_length: f64,
    /// Run the weld pass
    pub weld: bool,
    /// Weld distance; 0 disables the pass like `weld = false`
    pub weld_distance: f64,
    /// Make face winding consistent and outward after welding
    pub recalculate_normals: bool,
    /// Uniform scale applied last
    pub overall_scale: f64,
}

impl Default for ThreadParams {
    fn default() -> Self {
        Self {
            vertices: DEFAULT_VERTICES,
            thread_height: DEFAULT_THREAD_HEIGHT,
            thread_steps: DEFAULT_THREAD_STEPS,
            radius: DEFAULT_NECK_RADIUS,
            trap: DEFAULT_TRAP,
            depth: DEFAULT_DEPTH,
            skip: None,
            hand: ThreadHand::Male,
            closure: Closure::Plug,
            neck_length: 0.0,
            top_length: 0.0,
            weld: true,
            weld_distance: DEFAULT_WELD_DISTANCE,
            recalculate_normals: false,
            overall_scale: DEFAULT_OVERALL_SCALE,
        }
    }
}

fn positive(parameter: &'static str, value: f64) -> GenerateResult<()> {
    if value.is_finite() && value > EPSILON {
        Ok(())
    } else {
        Err(GenerateError::out_of_range(parameter, value, "must be finite and positive"))
    }
}

fn non_negative(parameter: &'static str, value: f64) -> GenerateResult<()> {
    if value.is_finite() && value >= 0.0 {
        Ok(())
    } else {
        Err(GenerateError::out_of_range(parameter, value, "must be finite and non-negative"))
    }
}

impl ThreadParams {
    /// Rise per helical step.
    pub fn step_rise(&self) -> f64 {
        self.thread_height / self.vertices as f64
    }

    /// Angle per helical step in radians.
    pub fn step_angle(&self) -> f64 {
        std::f64::consts::TAU / self.vertices as f64
    }

    /// Height of the helix top edge: `rise * steps + thread_height`.
    pub fn thread_top(&self) -> f64 {
        self.step_rise() * self.thread_steps as f64 + self.thread_height
    }

    /// Helix steps past the last whole turn.
    pub fn residual_steps(&self) -> u32 {
        self.thread_steps % self.vertices
    }

    /// Width of the first, shoulder inset pass.
    pub fn shoulder(&self) -> f64 {
        self.thread_height / SHOULDER_DIVISOR
    }

    /// Radius of the back wall, or `None` for a plug.
    pub fn back_radius(&self) -> Option<f64> {
        self.closure.wall().map(|wall| match self.hand {
            ThreadHand::Male => self.radius - wall,
            ThreadHand::Female => self.radius + wall,
        })
    }

    /// Checks every range the assembler relies on.
    ///
    /// `thread_steps` must cover at least one full turn (`>= vertices`),
    /// not merely be positive: the end caps close against the turn below or
    /// above them, and a partial turn leaves them nothing to meet.
    ///
    /// # Errors
    ///
    /// `Mesh(InvalidStepCount)` for zero steps, `ParameterOutOfRange` for
    /// everything else.
    pub fn validate(&self) -> GenerateResult<()> {
        if !(MIN_VERTICES..=MAX_VERTICES).contains(&self.vertices) {
            return Err(GenerateError::out_of_range(
                "vertices",
                self.vertices,
                format!("expected {MIN_VERTICES}..={MAX_VERTICES}"),
            ));
        }
        if self.thread_steps == 0 {
            return Err(MeshError::InvalidStepCount { steps: 0 }.into());
        }
        if self.thread_steps < self.vertices || self.thread_steps > MAX_THREAD_STEPS {
            return Err(GenerateError::out_of_range(
                "thread_steps",
                self.thread_steps,
                format!(
                    "expected {}..={MAX_THREAD_STEPS} (at least one full turn)",
                    self.vertices
                ),
            ));
        }

        positive("thread_height", self.thread_height)?;
        positive("radius", self.radius)?;
        non_negative("trap", self.trap)?;
        non_negative("depth", self.depth)?;
        non_negative("neck_length", self.neck_length)?;
        non_negative("top_length", self.top_length)?;

        // A female groove core moves toward the axis
        if self.hand == ThreadHand::Female && self.depth >= self.radius {
            return Err(GenerateError::out_of_range(
                "depth",
                self.depth,
                format!("female groove must stay short of the axis: below the radius {}", self.radius),
            ));
        }

        // Both passes inset from the top and the bottom of one band
        if 2.0 * (self.shoulder() + self.trap) >= self.thread_height {
            return Err(GenerateError::out_of_range(
                "trap",
                self.trap,
                format!(
                    "grooves meet inside the band: trap must stay below {}",
                    self.thread_height / 2.0 - self.shoulder()
                ),
            ));
        }

        if let Some(skip) = self.skip {
            if skip == 0 {
                return Err(GenerateError::out_of_range("skip", skip, "must be at least 1"));
            }
        }

        if let Some(wall) = self.closure.wall() {
            positive("wall", wall)?;
            if self.hand == ThreadHand::Male && wall >= self.radius {
                return Err(GenerateError::out_of_range(
                    "wall",
                    wall,
                    format!("must be less than the radius {}", self.radius),
                ));
            }
            let span = self.neck_length + self.thread_top() + self.top_length;
            if matches!(self.closure, Closure::Cup { .. })
                && self.hand == ThreadHand::Male
                && wall >= span
            {
                return Err(GenerateError::out_of_range(
                    "wall",
                    wall,
                    format!("must be less than the solid height {span}"),
                ));
            }
        }

        if !self.overall_scale.is_finite() || self.overall_scale.abs() < EPSILON {
            return Err(GenerateError::out_of_range(
                "overall_scale",
                self.overall_scale,
                "must be finite and non-zero",
            ));
        }

        Ok(())
    }
}

// =============================================================================
// TESTS
// =============================================================================
