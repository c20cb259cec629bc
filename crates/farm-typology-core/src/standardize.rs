//! Column-wise z-score standardization.
//!
//! Rescales every feature to zero mean and unit sample variance (Bessel
//! correction, N−1 denominator) so that no feature dominates downstream
//! distance computations purely through raw magnitude. A zero-variance
//! column cannot be rescaled; it is normalized with a divisor of 1 instead,
//! which leaves the column all-zero after centering. The indices of such
//! columns are reported so callers can flag degenerate features.

use tracing::warn;

use crate::error::{Result, TypologyError};

/// Output of [`standardize`]: the rescaled matrix plus the per-column
/// statistics that produced it.
#[derive(Debug, Clone, PartialEq)]
pub struct Standardized {
    /// Z-scored matrix, same shape as the input
    pub matrix: Vec<Vec<f64>>,
    /// Per-column arithmetic means of the raw input
    pub means: Vec<f64>,
    /// Per-column sample standard deviations actually used as divisors.
    /// Zero-variance columns hold 1.0 here, not 0.0.
    pub std_devs: Vec<f64>,
    /// Indices of columns whose raw variance was exactly zero
    pub constant_features: Vec<usize>,
}

/// Validate that the observation matrix is rectangular, finite, and has at
/// least two rows. Returns (rows, columns).
///
/// # Errors
///
/// - `EmptyInput` if there are no rows or rows have zero width
/// - `RaggedMatrix` if any row's width differs from row 0's
/// - `NonFinite` if any entry is NaN or infinite
/// - `InsufficientObservations` if fewer than 2 rows (sample variance
///   is undefined for N < 2)
pub fn validate_matrix(observations: &[Vec<f64>]) -> Result<(usize, usize)> {
    let n = observations.len();
    if n == 0 {
        return Err(TypologyError::EmptyInput);
    }

    let p = observations[0].len();
    if p == 0 {
        return Err(TypologyError::EmptyInput);
    }

    for (row, values) in observations.iter().enumerate() {
        if values.len() != p {
            return Err(TypologyError::ragged(row, p, values.len()));
        }
        for (col, &value) in values.iter().enumerate() {
            if !value.is_finite() {
                return Err(TypologyError::non_finite(row, col));
            }
        }
    }

    if n < 2 {
        return Err(TypologyError::insufficient_observations(2, n));
    }

    Ok((n, p))
}

/// Standardize an observation matrix column by column.
///
/// Z[i][j] = (X[i][j] − mean_j) / std_j, with std_j the Bessel-corrected
/// sample standard deviation. Row order is preserved.
///
/// # Errors
///
/// Structural errors only; see [`validate_matrix`]. Zero variance in a
/// column is not an error: the column comes out all-zero and its index is
/// recorded in `constant_features`.
pub fn standardize(observations: &[Vec<f64>]) -> Result<Standardized> {
    let (n, p) = validate_matrix(observations)?;

    let mut means = vec![0.0; p];
    for row in observations {
        for (j, &value) in row.iter().enumerate() {
            means[j] += value;
        }
    }
    for mean in &mut means {
        *mean /= n as f64;
    }

    let mut std_devs = vec![0.0; p];
    for row in observations {
        for (j, &value) in row.iter().enumerate() {
            let centered = value - means[j];
            std_devs[j] += centered * centered;
        }
    }

    let mut constant_features = Vec::new();
    for (j, std_dev) in std_devs.iter_mut().enumerate() {
        *std_dev = (*std_dev / (n - 1) as f64).sqrt();
        if *std_dev == 0.0 {
            constant_features.push(j);
            *std_dev = 1.0;
        }
    }

    if !constant_features.is_empty() {
        warn!(
            columns = ?constant_features,
            "Zero-variance features: standardized to all-zero columns with divisor 1"
        );
    }

    let matrix = observations
        .iter()
        .map(|row| {
            row.iter()
                .enumerate()
                .map(|(j, &value)| (value - means[j]) / std_devs[j])
                .collect()
        })
        .collect();

    Ok(Standardized {
        matrix,
        means,
        std_devs,
        constant_features,
    })
}
