//! # Config Crate
//!
//! Centralized defaults and tolerances for the helical thread generator.
//! Every tunable number used by `thread-mesh` and `bottle-gen` lives here so
//! that parameter records, validation and tests agree on one value.
//!
//! ## Usage
//!
//! ```rust
//! use config::constants::{DEFAULT_THREAD_HEIGHT, DEFAULT_VERTICES, SHOULDER_DIVISOR};
//!
//! // Rise of the helix per step of the spin
//! let dz = DEFAULT_THREAD_HEIGHT / DEFAULT_VERTICES as f64;
//! assert!(dz > 0.0);
//!
//! // Width of the flat shoulder either side of the groove
//! let shoulder = DEFAULT_THREAD_HEIGHT / SHOULDER_DIVISOR;
//! assert!(shoulder < DEFAULT_THREAD_HEIGHT / 2.0);
//! ```
//!
//! ## Design Principles
//!
//! - **Single Source of Truth**: All constants defined once, used everywhere
//! - **Pure Data**: No dependencies, no runtime state
//! - **Well-Documented**: Every constant has clear documentation

pub mod constants;
