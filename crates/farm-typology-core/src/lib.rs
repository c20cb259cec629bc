//! Farm Typology Core Library
//!
//! Pure unsupervised-learning engine for farm-season typology analysis:
//! reduces a numeric observation matrix to principal components via a
//! from-scratch Jacobi eigen-decomposition, then groups rows with Ward's
//! minimum-variance agglomerative clustering.
//!
//! # Architecture
//!
//! Data flows strictly forward through five components, leaves first:
//!
//! 1. [`standardize`] - z-score each feature column (Bessel-corrected)
//! 2. [`covariance`] - exact-symmetric feature covariance of Z
//! 3. [`eigen`] - greedy Jacobi rotations on the covariance matrix
//! 4. [`projection`] - top-k eigenpair selection and row projection
//! 5. [`ward`] - minimum-variance agglomeration of the score rows
//!
//! [`typology::TypologyEngine`] composes them into one pure call:
//! (observations, K, k) → (scores, labels, loadings). No component
//! touches I/O or holds state between calls; outputs are row-aligned with
//! the input so callers can zip them back onto their own records.
//!
//! # Example
//!
//! ```
//! use farm_typology_core::{TypologyEngine, TypologyParams};
//!
//! let observations = vec![
//!     vec![120.0, 1.4, 8200.0, 0.9],
//!     vec![118.0, 1.3, 8050.0, 0.8],
//!     vec![64.0, 0.5, 5400.0, 0.4],
//!     vec![61.0, 0.4, 5300.0, 0.5],
//!     vec![95.0, 1.0, 7100.0, 0.7],
//!     vec![97.0, 0.9, 7000.0, 0.6],
//! ];
//!
//! let engine = TypologyEngine::new(TypologyParams::default().with_clusters(2));
//! let result = engine.fit(&observations).unwrap();
//!
//! assert_eq!(result.labels.len(), observations.len());
//! assert!(result.labels.iter().all(|&label| label < 2));
//! ```

pub mod covariance;
pub mod eigen;
pub mod error;
pub mod projection;
pub mod standardize;
pub mod typology;
pub mod ward;

// Re-exports for convenience
pub use error::{Result, TypologyError};
pub use typology::{FitDiagnostics, TypologyEngine, TypologyParams, TypologyResult};
