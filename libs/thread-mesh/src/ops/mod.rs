//! # Mesh Operators
//!
//! In-place operators on a [`PolyMesh`](crate::PolyMesh):
//! - **spin**: revolve a seed chain around an axis with a per-step rise
//! - **extrude_edges**: duplicate an edge set and bridge it with quads
//! - **inset_region**: shrink a face region and optionally lift its core
//! - **translate / scale / rotate / transform**: move a vertex subset
//! - **remove_doubles**: weld vertices within a distance
//! - **make_consistent**: unify face winding and point it outward
//!
//! Every constructive operator reports what it created through
//! [`Created`], so callers thread explicit handles forward instead of
//! addressing "the last N elements" of the mesh.

mod extrude;
mod inset;
mod orient;
mod sweep;
mod transform;
mod weld;

pub use extrude::{extrude_edges, Extruded};
pub use inset::{inset_region, InsetParams, InsetReport};
pub use orient::make_consistent;
pub use sweep::{spin, SpinParams, Swept};
pub use transform::{rotate, scale, scale_global, transform, translate};
pub use weld::{remove_doubles, WeldReport};

use crate::mesh::{EdgeId, FaceId, VertexId};

/// Elements created by one operator call, in creation order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Created {
    /// New vertices
    pub vertices: Vec<VertexId>,
    /// New edges
    pub edges: Vec<EdgeId>,
    /// New faces
    pub faces: Vec<FaceId>,
}
