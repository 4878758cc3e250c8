//! # Configuration Constants
//!
//! Defaults for the thread, closure and body parameters plus the numeric
//! tolerances shared by the mesh operators.
//!
//! ## Categories
//!
//! - **Precision**: Floating-point comparison tolerances
//! - **Thread**: Helix and groove profile defaults
//! - **Closure**: Neck, collar and wall defaults
//! - **Body**: Manual bottle body profile
//! - **Limits**: Bounds enforced by parameter validation

// =============================================================================
// PRECISION CONSTANTS
// =============================================================================

/// Epsilon for floating-point comparisons.
///
/// # Example
///
/// ```rust
/// use config::constants::EPSILON;
///
/// fn approximately_equal(a: f64, b: f64) -> bool {
///     (a - b).abs() < EPSILON
/// }
///
/// assert!(approximately_equal(1.0, 1.0 + 1e-11));
/// ```
pub const EPSILON: f64 = 1e-10;

/// Smallest spatial hash cell used by the weld operator.
///
/// A zero tolerance still has to hash coincident points into the same
/// cell, so the cell size never drops below this value.
pub const MIN_WELD_CELL: f64 = 1e-9;

/// Tolerance used to close the seam of a plain revolve.
///
/// Only fuses points that are coincident up to rounding, never
/// intentionally distinct geometry.
pub const SEAM_WELD_DISTANCE: f64 = 1e-6;

/// Lower bound for the cosine between an inset direction and the inward
/// perpendicular of an adjacent side.
///
/// Keeps the even-offset factor finite at very sharp region corners.
pub const MIN_EVEN_OFFSET_COS: f64 = 0.1;

// =============================================================================
// THREAD CONSTANTS
// =============================================================================

/// Default vertices per revolution.
pub const DEFAULT_VERTICES: u32 = 12;

/// Minimum vertices per revolution.
pub const MIN_VERTICES: u32 = 3;

/// Maximum vertices per revolution.
pub const MAX_VERTICES: u32 = 24;

/// Default thread pitch (rise per full turn).
pub const DEFAULT_THREAD_HEIGHT: f64 = 0.5;

/// Default number of helical steps.
///
/// With the default 12 vertices this is two and a third turns.
pub const DEFAULT_THREAD_STEPS: u32 = 28;

/// Default neck radius the thread is wound on.
pub const DEFAULT_NECK_RADIUS: f64 = 1.48;

/// Default trapezoid groove inset width.
pub const DEFAULT_TRAP: f64 = 0.09;

/// Default groove depth along the face normal.
pub const DEFAULT_DEPTH: f64 = 0.2;

/// The first inset pass uses `thread_height / SHOULDER_DIVISOR`.
///
/// # Example
///
/// ```rust
/// use config::constants::{DEFAULT_THREAD_HEIGHT, SHOULDER_DIVISOR};
///
/// let shoulder = DEFAULT_THREAD_HEIGHT / SHOULDER_DIVISOR;
/// assert!((shoulder - 0.1).abs() < 1e-12);
/// ```
pub const SHOULDER_DIVISOR: f64 = 5.0;

/// Default skip offset: every n-th helix face keeps no groove.
pub const DEFAULT_SKIP_OFFSET: u32 = 4;

/// Default weld (remove doubles) distance.
pub const DEFAULT_WELD_DISTANCE: f64 = 0.01;

/// Default uniform scale applied to every finished solid.
pub const DEFAULT_OVERALL_SCALE: f64 = 0.1;

/// Upper bound on helical steps accepted by validation.
pub const MAX_THREAD_STEPS: u32 = 100_000;

// =============================================================================
// CLOSURE CONSTANTS
// =============================================================================

/// Default neck length below the thread.
pub const DEFAULT_NECK_LENGTH: f64 = 0.1;

/// Default collar length above the thread.
pub const DEFAULT_TOP_LENGTH: f64 = 0.1;

/// Default wall thickness of the bottle neck.
pub const DEFAULT_TOP_THICKNESS: f64 = 0.3;

/// Default cap clearance, in percent of the neck radius.
pub const DEFAULT_CAP_ENLARGE_PERCENT: u32 = 1;

// =============================================================================
// BODY PROFILE CONSTANTS
// =============================================================================

/// Default radial offsets of the manual body profile, added to the neck radius.
pub const DEFAULT_BODY_X: [f64; 5] = [2.11, 1.58, 1.0, 3.01, 0.5];

/// Default drops of the manual body profile below the neck.
pub const DEFAULT_BODY_Z: [f64; 5] = [1.0, 3.62, 4.0, 8.75, 8.69];
