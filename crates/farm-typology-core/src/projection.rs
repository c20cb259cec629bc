//! Principal component selection and projection.
//!
//! Orders eigenpairs by descending eigenvalue, keeps the top k as the
//! loadings matrix, and projects every standardized row onto them. The
//! sort is stable, so exactly-tied eigenvalues keep their decomposition
//! order and repeated runs produce identical output.

use std::cmp::Ordering;

use crate::eigen::EigenDecomposition;

/// Scores and loadings of a principal component projection.
#[derive(Debug, Clone, PartialEq)]
pub struct Projection {
    /// N×k score matrix; row i is the projection of standardized row i,
    /// column 0 belongs to the largest eigenvalue
    pub scores: Vec<Vec<f64>>,
    /// k×P loadings; row c is the unit eigenvector of component c
    pub loadings: Vec<Vec<f64>>,
}

/// Project a standardized matrix onto its top-k principal components.
///
/// Row order of `standardized` is preserved in `scores`. If `components`
/// exceeds the number of eigenpairs, all available pairs are used.
pub fn project(
    standardized: &[Vec<f64>],
    eigen: &EigenDecomposition,
    components: usize,
) -> Projection {
    let mut order: Vec<usize> = (0..eigen.eigenvalues.len()).collect();
    order.sort_by(|&a, &b| {
        eigen.eigenvalues[b]
            .partial_cmp(&eigen.eigenvalues[a])
            .unwrap_or(Ordering::Equal)
    });

    let loadings: Vec<Vec<f64>> = order
        .iter()
        .take(components)
        .map(|&i| eigen.eigenvectors[i].clone())
        .collect();

    let scores = standardized
        .iter()
        .map(|row| {
            loadings
                .iter()
                .map(|axis| axis.iter().zip(row).map(|(l, z)| l * z).sum())
                .collect()
        })
        .collect();

    Projection { scores, loadings }
}
