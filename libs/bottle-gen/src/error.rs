//! # Generation Errors
//!
//! Error types for parameter validation and solid assembly.

use thiserror::Error;
use thread_mesh::MeshError;

/// Errors that can occur while generating a solid.
///
/// A failed generation yields no mesh at all; there is no partial result.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum GenerateError {
    /// A mesh operator failed.
    #[error("Mesh error: {0}")]
    Mesh(#[from] MeshError),

    /// A parameter is outside the range the generator accepts.
    #[error("Parameter '{parameter}' = {value} out of range: {reason}")]
    ParameterOutOfRange {
        /// Parameter name
        parameter: &'static str,
        /// Offending value
        value: f64,
        /// Accepted range
        reason: String,
    },
}

impl GenerateError {
    /// Creates a parameter out of range error.
    pub fn out_of_range(parameter: &'static str, value: impl Into<f64>, reason: impl Into<String>) -> Self {
        Self::ParameterOutOfRange {
            parameter,
            value: value.into(),
            reason: reason.into(),
        }
    }
}

/// Result alias for generation.
pub type GenerateResult<T> = Result<T, GenerateError>;

// =============================================================================
// TESTS
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = GenerateError::out_of_range("vertices", 2u32, "expected 3..=24");
        assert_eq!(
            err.to_string(),
            "Parameter 'vertices' = 2 out of range: expected 3..=24"
        );
    }

    #[test]
    fn test_mesh_error_converts() {
        let err: GenerateError = MeshError::InvalidStepCount { steps: 0 }.into();
        assert!(err.to_string().contains("Invalid step count"));
    }
}
