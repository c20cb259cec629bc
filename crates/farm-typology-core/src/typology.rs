//! The typology pipeline: standardize → covariance → eigen-decompose →
//! project → cluster.
//!
//! One pure entry point replaces the per-view copies of this computation
//! that the original application carried. The engine holds nothing but its
//! parameters: every fit recomputes from scratch, outputs are row-aligned
//! with the input, and independent fits may run on independent threads
//! with no coordination.

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::covariance::covariance;
use crate::eigen::{JacobiSolver, DEFAULT_MAX_ITERATIONS, DEFAULT_TOLERANCE};
use crate::error::{Result, TypologyError};
use crate::projection::project;
use crate::standardize::{standardize, validate_matrix};
use crate::ward;

/// Parameters for a typology fit.
///
/// # Example
///
/// ```
/// use farm_typology_core::TypologyParams;
///
/// let params = TypologyParams::default();
/// assert_eq!(params.clusters, 3);
/// assert_eq!(params.components, 2);
///
/// let params = params.with_clusters(4).with_components(3);
/// assert!(params.validate().is_ok());
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TypologyParams {
    /// Target cluster count K. Must be >= 2 and strictly below the row
    /// count of the fitted matrix.
    pub clusters: usize,

    /// Number of retained principal components k. Must be >= 1 and at
    /// most the feature count of the fitted matrix.
    pub components: usize,

    /// Jacobi convergence tolerance on the largest off-diagonal
    /// magnitude.
    pub tolerance: f64,

    /// Jacobi rotation cap. Exhausting it degrades gracefully to a
    /// partial diagonalization.
    pub max_iterations: usize,
}

impl Default for TypologyParams {
    fn default() -> Self {
        Self {
            clusters: 3,
            components: 2,
            tolerance: DEFAULT_TOLERANCE,
            max_iterations: DEFAULT_MAX_ITERATIONS,
        }
    }
}

impl TypologyParams {
    /// Set the target cluster count.
    ///
    /// Value is NOT automatically clamped - use validate() to check.
    #[must_use]
    pub fn with_clusters(mut self, clusters: usize) -> Self {
        self.clusters = clusters;
        self
    }

    /// Set the number of retained principal components.
    #[must_use]
    pub fn with_components(mut self, components: usize) -> Self {
        self.components = components;
        self
    }

    /// Set the Jacobi convergence tolerance.
    #[must_use]
    pub fn with_tolerance(mut self, tolerance: f64) -> Self {
        self.tolerance = tolerance;
        self
    }

    /// Set the Jacobi rotation cap.
    #[must_use]
    pub fn with_max_iterations(mut self, max_iterations: usize) -> Self {
        self.max_iterations = max_iterations;
        self
    }

    /// Validate matrix-independent parameter ranges.
    ///
    /// # Errors
    ///
    /// Returns `TypologyError::InvalidParameter` if:
    /// - clusters < 2
    /// - components < 1
    /// - tolerance is not finite and positive
    /// - max_iterations < 1
    pub fn validate(&self) -> Result<()> {
        if self.clusters < 2 {
            return Err(TypologyError::invalid_parameter(format!(
                "clusters must be >= 2, got {}",
                self.clusters
            )));
        }
        if self.components < 1 {
            return Err(TypologyError::invalid_parameter(
                "components must be >= 1, got 0",
            ));
        }
        if !self.tolerance.is_finite() || self.tolerance <= 0.0 {
            return Err(TypologyError::invalid_parameter(format!(
                "tolerance must be finite and > 0, got {}",
                self.tolerance
            )));
        }
        if self.max_iterations < 1 {
            return Err(TypologyError::invalid_parameter(
                "max_iterations must be >= 1, got 0",
            ));
        }
        Ok(())
    }
}

/// Non-fatal observations from a fit, surfaced so degraded numerics are
/// visible instead of silently swallowed.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FitDiagnostics {
    /// Indices of zero-variance feature columns (standardized to all-zero)
    pub constant_features: Vec<usize>,
    /// Whether the eigensolver reached tolerance within its rotation cap
    pub eigen_converged: bool,
    /// Rotations the eigensolver applied
    pub eigen_iterations: usize,
    /// Ward merge costs in execution order; non-decreasing for
    /// well-formed input
    pub merge_costs: Vec<f64>,
}

/// Output of a typology fit, row-aligned with the input matrix.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TypologyResult {
    /// N×k principal component scores
    pub scores: Vec<Vec<f64>>,
    /// One cluster label per row, each in [0, clusters)
    pub labels: Vec<usize>,
    /// k×P loadings, for interpretability only
    pub loadings: Vec<Vec<f64>>,
    /// Non-fatal fit observations
    pub diagnostics: FitDiagnostics,
}

/// Stateless PCA + Ward typology engine.
///
/// # Example
///
/// ```
/// use farm_typology_core::{TypologyEngine, TypologyParams};
///
/// // Farm-season rows: N rate, pesticide load, yield, mechanization.
/// let observations = vec![
///     vec![120.0, 1.4, 8200.0, 0.9],
///     vec![118.0, 1.3, 8050.0, 0.8],
///     vec![64.0, 0.5, 5400.0, 0.4],
///     vec![61.0, 0.4, 5300.0, 0.5],
///     vec![95.0, 1.0, 7100.0, 0.7],
///     vec![97.0, 0.9, 7000.0, 0.6],
/// ];
///
/// let engine = TypologyEngine::new(TypologyParams::default().with_clusters(2));
/// let result = engine.fit(&observations).unwrap();
///
/// assert_eq!(result.scores.len(), 6);
/// assert_eq!(result.labels.len(), 6);
/// assert_eq!(result.loadings.len(), 2);
/// ```
#[derive(Debug, Clone, Default)]
pub struct TypologyEngine {
    params: TypologyParams,
}

impl TypologyEngine {
    /// Create an engine with explicit parameters.
    pub fn new(params: TypologyParams) -> Self {
        Self { params }
    }

    /// Create an engine with default parameters (K=3, k=2).
    pub fn with_defaults() -> Self {
        Self::new(TypologyParams::default())
    }

    /// The parameters this engine fits with.
    pub fn params(&self) -> &TypologyParams {
        &self.params
    }

    /// Run the full pipeline on an observation matrix.
    ///
    /// Outputs are aligned with the input by row index, so the caller can
    /// zip scores and labels back onto its own richer per-row records.
    ///
    /// # Errors
    ///
    /// All structural: invalid parameters, empty/ragged/non-finite input,
    /// N < 2, N <= clusters, or components > feature count. No partial
    /// result is produced on error. Zero-variance features and eigensolver
    /// non-convergence are NOT errors; see [`FitDiagnostics`].
    pub fn fit(&self, observations: &[Vec<f64>]) -> Result<TypologyResult> {
        self.params.validate()?;
        let (n, p) = validate_matrix(observations)?;

        if n <= self.params.clusters {
            return Err(TypologyError::insufficient_observations(
                self.params.clusters + 1,
                n,
            ));
        }
        if self.params.components > p {
            return Err(TypologyError::invalid_parameter(format!(
                "components ({}) cannot exceed feature count ({})",
                self.params.components, p
            )));
        }

        // 1. Standardize to zero mean, unit variance
        let standardized = standardize(observations)?;

        // 2. Feature covariance of the standardized matrix
        let cov = covariance(&standardized.matrix)?;

        // 3. Jacobi eigen-decomposition
        let solver = JacobiSolver::new(self.params.tolerance, self.params.max_iterations);
        let eigen = solver.decompose(&cov);

        // 4. Project onto the top-k components
        let projection = project(&standardized.matrix, &eigen, self.params.components);

        // 5. Ward agglomeration of the score rows
        let clustering = ward::cluster(&projection.scores, self.params.clusters);

        debug!(
            observations = n,
            features = p,
            components = self.params.components,
            clusters = self.params.clusters,
            eigen_iterations = eigen.iterations,
            eigen_converged = eigen.converged,
            constant_features = standardized.constant_features.len(),
            "Typology fit complete"
        );

        Ok(TypologyResult {
            scores: projection.scores,
            labels: clustering.labels,
            loadings: projection.loadings,
            diagnostics: FitDiagnostics {
                constant_features: standardized.constant_features,
                eigen_converged: eigen.converged,
                eigen_iterations: eigen.iterations,
                merge_costs: clustering.merges.into_iter().map(|m| m.cost).collect(),
            },
        })
    }
}
