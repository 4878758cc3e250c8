//! # Mesh Errors
//!
//! Error types for kernel and operator calls.

use crate::mesh::VertexId;
use thiserror::Error;

/// Errors that can occur while building or editing a [`crate::PolyMesh`].
#[derive(Debug, Clone, PartialEq, Error)]
pub enum MeshError {
    /// A sweep was asked for fewer than one step.
    #[error("Invalid step count: {steps} (at least 1 required)")]
    InvalidStepCount {
        /// Requested step count
        steps: u32,
    },

    /// An edge would connect a vertex to itself.
    #[error("Degenerate edge: both ends are vertex {}", vertex.0)]
    DegenerateEdge {
        /// The repeated vertex
        vertex: VertexId,
    },

    /// A face has fewer than three distinct vertices.
    #[error("Degenerate face: {distinct} distinct vertices (at least 3 required)")]
    DegenerateFace {
        /// Number of distinct vertices supplied
        distinct: usize,
    },

    /// Weld distance is negative or not a number.
    #[error("Invalid weld tolerance: {distance}")]
    InvalidWeldTolerance {
        /// Requested merge distance
        distance: f64,
    },

    /// An operator argument is outside its usable range.
    #[error("Parameter '{parameter}' out of range: {message}")]
    ParameterOutOfRange {
        /// Argument name
        parameter: &'static str,
        /// Why it was rejected
        message: String,
    },

    /// A handle does not refer to an element of this mesh.
    #[error("Invalid reference: {message}")]
    InvalidReference {
        /// Description of the stale handle
        message: String,
    },
}

impl MeshError {
    /// Creates a parameter out of range error.
    pub fn out_of_range(parameter: &'static str, message: impl Into<String>) -> Self {
        Self::ParameterOutOfRange {
            parameter,
            message: message.into(),
        }
    }

    /// Creates an invalid reference error.
    pub fn invalid_reference(message: impl Into<String>) -> Self {
        Self::InvalidReference {
            message: message.into(),
        }
    }
}

/// Result alias for mesh operations.
pub type MeshResult<T> = Result<T, MeshError>;
