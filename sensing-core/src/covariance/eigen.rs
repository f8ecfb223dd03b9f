//! Symmetric eigen-decomposition of covariance matrices

use super::estimator::CovarianceMatrix;

/// Eigenvalue magnitude spectrum of a covariance matrix
///
/// Returns the L absolute eigenvalues, unsorted; consumers sort as needed.
/// Taking magnitudes guards against tiny negative values introduced by
/// rounding noise in near-singular matrices.
pub fn eigen_spectrum(matrix: &CovarianceMatrix) -> Vec<f64> {
    matrix
        .to_dense()
        .symmetric_eigenvalues()
        .iter()
        .map(|v| v.abs())
        .collect()
}
