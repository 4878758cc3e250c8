//! # Bottle Generator
//!
//! Parametric threaded bottle necks, caps and body profiles built on the
//! [`thread_mesh`] kernel.
//!
//! ## Architecture
//!
//! ```text
//! BottleParams ──► ThreadParams (bottle, male) ──► ThreadAssembler ──► ThreadSolid
//!              ──► ThreadParams (cap, female)  ──► ThreadAssembler ──► ThreadSolid
//!              ──► BodyParams ──► BodyProfile
//! ```
//!
//! The bottle and cap assemblers share no state and run on separate rayon
//! workers. Each produces one welded, globally scaled mesh.
//!
//! ## Usage
//!
//! ```rust
//! use bottle_gen::{generate_thread, ThreadParams};
//!
//! let solid = generate_thread(&ThreadParams::default()).unwrap();
//! let indexed = solid.mesh.to_indexed();
//! assert_eq!(indexed.vertex_count(), solid.mesh.vertex_count());
//! ```

pub mod assembler;
pub mod body;
pub mod bottle;
pub mod error;
pub mod params;

pub use assembler::{generate_thread, Stage, ThreadAssembler, ThreadSolid, ThreadStats};
pub use body::{BodyParams, BodyProfile};
pub use bottle::{generate_bottle_set, BottleParams, BottleSet, Placement};
pub use error::{GenerateError, GenerateResult};
pub use params::{Closure, ThreadHand, ThreadParams};
