//! Feature covariance matrix construction.
//!
//! Computes C = ZᵗZ/(N−1) for a standardized matrix Z. Since Z has unit
//! sample variance per column, C is also the feature correlation matrix.
//! Only the upper triangle is accumulated; the lower triangle is mirrored
//! from the same values, so C[i][j] and C[j][i] are bitwise identical
//! rather than merely equal within round-off.

use crate::error::Result;
use crate::standardize::validate_matrix;

/// Build the P×P sample covariance matrix of a standardized matrix.
///
/// # Errors
///
/// Structural errors only (empty, ragged, non-finite, fewer than 2 rows);
/// see [`validate_matrix`](crate::standardize::validate_matrix).
pub fn covariance(standardized: &[Vec<f64>]) -> Result<Vec<Vec<f64>>> {
    let (n, p) = validate_matrix(standardized)?;

    let mut cov = vec![vec![0.0; p]; p];
    for row in standardized {
        for i in 0..p {
            for j in i..p {
                cov[i][j] += row[i] * row[j];
            }
        }
    }

    let denominator = (n - 1) as f64;
    for i in 0..p {
        for j in i..p {
            cov[i][j] /= denominator;
            cov[j][i] = cov[i][j];
        }
    }

    Ok(cov)
}
