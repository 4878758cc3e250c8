//! # Thread Mesh
//!
//! Mutable polygon mesh kernel plus the operators used to build helical
//! thread solids.
//!
//! ## Architecture
//!
//! ```text
//! PolyMesh ──► ops::{spin, extrude_edges, inset_region, transform...}
//!          ──► ops::remove_doubles ──► ops::make_consistent
//!          ──► TopologyReport / IndexedMesh
//! ```
//!
//! Every operator mutates the mesh in place and returns explicit handles to
//! what it created. Geometry built by separate operator calls stays
//! disjoint until [`ops::remove_doubles`] fuses coincident vertices.
//!
//! ## Usage
//!
//! ```rust
//! use thread_mesh::{PolyMesh, TopologyReport, ops::{spin, SpinParams}};
//! use glam::DVec3;
//!
//! let mut mesh = PolyMesh::new();
//! let top = mesh.add_vertex(DVec3::new(1.0, 0.0, 1.0));
//! let bottom = mesh.add_vertex(DVec3::new(1.0, 0.0, 0.0));
//! let seed = mesh.add_edge(top, bottom).unwrap();
//! spin(&mut mesh, &[top, bottom], &[seed], &SpinParams::revolve(8)).unwrap();
//!
//! let report = TopologyReport::analyze(&mesh);
//! assert_eq!(report.face_count, 8);
//! ```

pub mod error;
pub mod indexed;
pub mod mesh;
pub mod ops;
pub mod topology;

pub use error::{MeshError, MeshResult};
pub use indexed::IndexedMesh;
pub use mesh::{EdgeId, FaceId, PolyMesh, VertexId};
pub use ops::Created;
pub use topology::TopologyReport;
