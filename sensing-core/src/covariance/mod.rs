//! Lag-covariance estimation and symmetric eigen-decomposition

pub mod eigen;
pub mod estimator;

pub use eigen::eigen_spectrum;
pub use estimator::{CovarianceMatrix, LagEstimator};
