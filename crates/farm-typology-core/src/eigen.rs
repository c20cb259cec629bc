//! Symmetric eigen-decomposition via Jacobi rotations.
//!
//! # Algorithm
//!
//! Classical (greedy) Jacobi iteration over a working copy A of the input:
//!
//! 1. Scan the strict upper triangle for the entry of largest magnitude.
//! 2. If that magnitude is below the convergence tolerance, stop.
//! 3. Otherwise compute the rotation angle
//!    θ = ½·atan2(2·A[p][q], A[q][q] − A[p][p]) and apply the Givens
//!    rotation to rows and columns p, q of A, zeroing A[p][q]. The same
//!    rotation is accumulated into V so that A_in = Vᵗ·diag(A_out)·V.
//!
//! The pivot is the globally largest off-diagonal entry rather than a
//! cyclic sweep; with the first maximal pair winning ties, the rotation
//! sequence is fully determined by the magnitudes in A and the output is
//! deterministic for a given input.
//!
//! Iteration is capped. Running out of iterations is NOT an error: the
//! partially diagonalized result is returned as-is with `converged = false`
//! and a warning is emitted, leaving the decision to the caller.

use tracing::warn;

/// Default convergence tolerance on the largest off-diagonal magnitude.
pub const DEFAULT_TOLERANCE: f64 = 1e-8;

/// Default cap on the number of Jacobi rotations.
pub const DEFAULT_MAX_ITERATIONS: usize = 100;

/// Result of a Jacobi diagonalization.
///
/// `eigenvectors[i]` is the unit eigenvector paired with `eigenvalues[i]`.
/// Pairs are in the order the rotations left them; no sort is applied
/// here. Ordering by eigenvalue happens in the projection step.
#[derive(Debug, Clone, PartialEq)]
pub struct EigenDecomposition {
    /// Diagonal of the (partially) diagonalized working matrix
    pub eigenvalues: Vec<f64>,
    /// One eigenvector per row, index-paired with `eigenvalues`
    pub eigenvectors: Vec<Vec<f64>>,
    /// Whether the off-diagonal mass fell below tolerance before the
    /// iteration cap
    pub converged: bool,
    /// Number of rotations actually applied
    pub iterations: usize,
}

/// Greedy Jacobi eigensolver for symmetric matrices.
#[derive(Debug, Clone, PartialEq)]
pub struct JacobiSolver {
    tolerance: f64,
    max_iterations: usize,
}

impl Default for JacobiSolver {
    fn default() -> Self {
        Self {
            tolerance: DEFAULT_TOLERANCE,
            max_iterations: DEFAULT_MAX_ITERATIONS,
        }
    }
}

impl JacobiSolver {
    /// Create a solver with explicit tolerance and iteration cap.
    pub fn new(tolerance: f64, max_iterations: usize) -> Self {
        Self {
            tolerance,
            max_iterations,
        }
    }

    /// Diagonalize a symmetric matrix.
    ///
    /// The caller is expected to pass a symmetric matrix (the covariance
    /// builder guarantees exact symmetry); asymmetry is not detected here
    /// and leads to meaningless output.
    pub fn decompose(&self, matrix: &[Vec<f64>]) -> EigenDecomposition {
        let n = matrix.len();
        let mut a: Vec<Vec<f64>> = matrix.to_vec();
        let mut v = identity(n);

        // A 1×1 matrix has no off-diagonal to reduce.
        if n < 2 {
            return EigenDecomposition {
                eigenvalues: (0..n).map(|i| a[i][i]).collect(),
                eigenvectors: v,
                converged: true,
                iterations: 0,
            };
        }

        let mut iterations = 0;
        let mut converged = false;
        while iterations < self.max_iterations {
            let (p, q, magnitude) = largest_off_diagonal(&a);
            if magnitude < self.tolerance {
                converged = true;
                break;
            }
            rotate(&mut a, &mut v, p, q);
            iterations += 1;
        }

        if !converged {
            warn!(
                iterations,
                tolerance = self.tolerance,
                remaining = largest_off_diagonal(&a).2,
                "Jacobi iteration budget exhausted before tolerance; \
                 returning partial diagonalization"
            );
        }

        EigenDecomposition {
            eigenvalues: (0..n).map(|i| a[i][i]).collect(),
            eigenvectors: v,
            converged,
            iterations,
        }
    }
}

/// Find the strict-upper-triangle entry of largest magnitude.
///
/// Ties go to the first pair in ascending (i, then j) scan order, which
/// pins down the rotation sequence for inputs with repeated magnitudes.
fn largest_off_diagonal(a: &[Vec<f64>]) -> (usize, usize, f64) {
    let n = a.len();
    let mut p = 0;
    let mut q = 1;
    let mut magnitude = a[0][1].abs();

    for i in 0..n {
        for j in (i + 1)..n {
            let value = a[i][j].abs();
            if value > magnitude {
                magnitude = value;
                p = i;
                q = j;
            }
        }
    }

    (p, q, magnitude)
}

/// Apply the Givens rotation that zeroes A[p][q], and accumulate it into V.
fn rotate(a: &mut [Vec<f64>], v: &mut [Vec<f64>], p: usize, q: usize) {
    let n = a.len();
    let theta = 0.5 * (2.0 * a[p][q]).atan2(a[q][q] - a[p][p]);
    let c = theta.cos();
    let s = theta.sin();

    // Pre-rotation copies of the pivot rows; the diagonal update below
    // needs the original values after the rows are overwritten.
    let row_p = a[p].clone();
    let row_q = a[q].clone();

    for j in 0..n {
        a[p][j] = c * row_p[j] - s * row_q[j];
        a[q][j] = s * row_p[j] + c * row_q[j];
    }
    for row in a.iter_mut() {
        let aip = row[p];
        let aiq = row[q];
        row[p] = c * aip - s * aiq;
        row[q] = s * aip + c * aiq;
    }

    // The rotation angle zeroes the pivot pair analytically.
    a[p][q] = 0.0;
    a[q][p] = 0.0;
    a[p][p] = c * c * row_p[p] - 2.0 * s * c * row_p[q] + s * s * row_q[q];
    a[q][q] = s * s * row_p[p] + 2.0 * s * c * row_p[q] + c * c * row_q[q];

    let v_row_p = v[p].clone();
    let v_row_q = v[q].clone();
    for j in 0..n {
        v[p][j] = c * v_row_p[j] - s * v_row_q[j];
        v[q][j] = s * v_row_p[j] + c * v_row_q[j];
    }
}

fn identity(n: usize) -> Vec<Vec<f64>> {
    (0..n)
        .map(|i| (0..n).map(|j| if i == j { 1.0 } else { 0.0 }).collect())
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::{Rng, SeedableRng};
    use rand_chacha::ChaCha8Rng;

    use crate::covariance::covariance;
    use crate::standardize::standardize;

    /// Seeded observation matrix: groups of correlated features with noise.
    fn seeded_observations(rows: usize, cols: usize, seed: u64) -> Vec<Vec<f64>> {
        let mut rng = ChaCha8Rng::seed_from_u64(seed);
        (0..rows)
            .map(|_| {
                let base: f64 = rng.gen_range(-2.0..2.0);
                (0..cols)
                    .map(|j| base * (j as f64 + 1.0) + rng.gen_range(-0.5..0.5))
                    .collect()
            })
            .collect()
    }

    fn reconstruct(eigen: &EigenDecomposition, i: usize, j: usize) -> f64 {
        eigen
            .eigenvalues
            .iter()
            .zip(&eigen.eigenvectors)
            .map(|(lambda, vector)| lambda * vector[i] * vector[j])
            .sum()
    }

    #[test]
    fn test_diagonal_matrix_converges_immediately() {
        let matrix = vec![vec![3.0, 0.0], vec![0.0, 1.0]];

        let eigen = JacobiSolver::default().decompose(&matrix);

        assert!(eigen.converged);
        assert_eq!(eigen.iterations, 0);
        assert_eq!(eigen.eigenvalues, vec![3.0, 1.0]);
        assert_eq!(eigen.eigenvectors, vec![vec![1.0, 0.0], vec![0.0, 1.0]]);

        println!("[PASS] test_diagonal_matrix_converges_immediately");
    }

    #[test]
    fn test_known_two_by_two_eigenpairs() {
        // [[2, 1], [1, 2]] has eigenvalues 1 and 3 with eigenvectors
        // (1, -1)/√2 and (1, 1)/√2. One rotation zeroes the off-diagonal.
        let matrix = vec![vec![2.0, 1.0], vec![1.0, 2.0]];

        let eigen = JacobiSolver::default().decompose(&matrix);

        assert!(eigen.converged);
        assert_eq!(eigen.iterations, 1);

        let mut values = eigen.eigenvalues.clone();
        values.sort_by(|a, b| a.partial_cmp(b).unwrap());
        assert!((values[0] - 1.0).abs() < 1e-12);
        assert!((values[1] - 3.0).abs() < 1e-12);

        // Eigenvector for eigenvalue 3 must align with (1, 1)/√2; sign is
        // unspecified, compare through the absolute dot product.
        let idx = eigen
            .eigenvalues
            .iter()
            .position(|&l| (l - 3.0).abs() < 1e-9)
            .unwrap();
        let aligned = (eigen.eigenvectors[idx][0] + eigen.eigenvectors[idx][1]).abs()
            / std::f64::consts::SQRT_2;
        assert!((aligned - 1.0).abs() < 1e-9);

        println!("[PASS] test_known_two_by_two_eigenpairs");
    }

    #[test]
    fn test_reconstruction_within_tolerance() {
        let observations = seeded_observations(40, 5, 42);
        let standardized = standardize(&observations).unwrap();
        let cov = covariance(&standardized.matrix).unwrap();

        let eigen = JacobiSolver::default().decompose(&cov);
        assert!(eigen.converged, "5×5 correlation matrix should converge");

        for i in 0..5 {
            for j in 0..5 {
                let rebuilt = reconstruct(&eigen, i, j);
                assert!(
                    (rebuilt - cov[i][j]).abs() < 1e-6,
                    "V'·diag(λ)·V mismatch at ({i},{j}): {rebuilt} vs {}",
                    cov[i][j]
                );
            }
        }

        println!("[PASS] test_reconstruction_within_tolerance");
    }

    #[test]
    fn test_eigenvectors_orthonormal() {
        let observations = seeded_observations(30, 6, 7);
        let standardized = standardize(&observations).unwrap();
        let cov = covariance(&standardized.matrix).unwrap();

        let eigen = JacobiSolver::default().decompose(&cov);

        for i in 0..6 {
            for j in 0..6 {
                let dot: f64 = eigen.eigenvectors[i]
                    .iter()
                    .zip(&eigen.eigenvectors[j])
                    .map(|(x, y)| x * y)
                    .sum();
                let expected = if i == j { 1.0 } else { 0.0 };
                assert!(
                    (dot - expected).abs() < 1e-6,
                    "v[{i}]·v[{j}] = {dot}, expected {expected}"
                );
            }
        }

        println!("[PASS] test_eigenvectors_orthonormal");
    }

    #[test]
    fn test_iteration_budget_exhaustion_is_not_fatal() {
        let observations = seeded_observations(25, 5, 99);
        let standardized = standardize(&observations).unwrap();
        let cov = covariance(&standardized.matrix).unwrap();

        // One rotation cannot diagonalize a coupled 5×5 matrix.
        let eigen = JacobiSolver::new(DEFAULT_TOLERANCE, 1).decompose(&cov);

        assert!(!eigen.converged);
        assert_eq!(eigen.iterations, 1);
        assert_eq!(eigen.eigenvalues.len(), 5);
        assert!(eigen.eigenvalues.iter().all(|l| l.is_finite()));
        assert!(eigen
            .eigenvectors
            .iter()
            .flatten()
            .all(|x| x.is_finite()));

        println!("[PASS] test_iteration_budget_exhaustion_is_not_fatal");
    }

    #[test]
    fn test_one_by_one_matrix() {
        let eigen = JacobiSolver::default().decompose(&[vec![4.2]]);

        assert!(eigen.converged);
        assert_eq!(eigen.iterations, 0);
        assert_eq!(eigen.eigenvalues, vec![4.2]);
        assert_eq!(eigen.eigenvectors, vec![vec![1.0]]);

        println!("[PASS] test_one_by_one_matrix");
    }

    #[test]
    fn test_decomposition_deterministic() {
        let observations = seeded_observations(20, 4, 3);
        let standardized = standardize(&observations).unwrap();
        let cov = covariance(&standardized.matrix).unwrap();

        let first = JacobiSolver::default().decompose(&cov);
        let second = JacobiSolver::default().decompose(&cov);

        assert_eq!(first, second, "identical input must give identical output");

        println!("[PASS] test_decomposition_deterministic");
    }
}
