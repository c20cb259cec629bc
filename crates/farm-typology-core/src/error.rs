//! Error types for farm-typology-core.
//!
//! Structural problems in the observation matrix or the fit parameters fail
//! fast with a [`TypologyError`] before any computation begins. Numerical
//! degradation (zero-variance features, an eigensolver that runs out of
//! iterations) is deliberately NOT an error: those conditions are handled
//! in-line and surfaced through `FitDiagnostics` and `tracing` warnings.

use thiserror::Error;

/// Result alias used throughout the crate.
pub type Result<T> = std::result::Result<T, TypologyError>;

/// Errors raised by matrix validation and parameter validation.
///
/// Every variant is fatal to the call that produced it: no partial result
/// is returned.
#[derive(Debug, Error)]
pub enum TypologyError {
    /// The observation matrix has no rows, or rows of width zero.
    #[error("Empty input: observation matrix has no rows or no columns")]
    EmptyInput,

    /// A row's width differs from the first row's width.
    #[error("Ragged matrix: row {row} has {actual} features, expected {expected}")]
    RaggedMatrix {
        /// Index of the offending row
        row: usize,
        /// Width of row 0, which sets the feature count
        expected: usize,
        /// Width actually found
        actual: usize,
    },

    /// The matrix contains NaN or an infinity.
    #[error("Non-finite value at row {row}, column {col}")]
    NonFinite {
        /// Row of the offending entry
        row: usize,
        /// Column of the offending entry
        col: usize,
    },

    /// Too few observations for the requested computation.
    ///
    /// Raised when N < 2 (sample variance is undefined) and when N is not
    /// strictly greater than the requested cluster count.
    #[error("Insufficient observations: need at least {needed}, got {actual}")]
    InsufficientObservations {
        /// Minimum row count for the call to proceed
        needed: usize,
        /// Row count actually supplied
        actual: usize,
    },

    /// A fit parameter is out of range for the engine or for this matrix.
    #[error("Invalid parameter: {0}")]
    InvalidParameter(String),
}

impl TypologyError {
    /// Create a RaggedMatrix error.
    pub fn ragged(row: usize, expected: usize, actual: usize) -> Self {
        Self::RaggedMatrix {
            row,
            expected,
            actual,
        }
    }

    /// Create a NonFinite error.
    pub fn non_finite(row: usize, col: usize) -> Self {
        Self::NonFinite { row, col }
    }

    /// Create an InsufficientObservations error.
    pub fn insufficient_observations(needed: usize, actual: usize) -> Self {
        Self::InsufficientObservations { needed, actual }
    }

    /// Create an InvalidParameter error.
    pub fn invalid_parameter(message: impl Into<String>) -> Self {
        Self::InvalidParameter(message.into())
    }
}
