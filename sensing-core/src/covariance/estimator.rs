//! Lag-covariance estimation
//!
//! Builds a real symmetric Toeplitz autocovariance matrix from a sample
//! window. Two estimators exist: a mean-removed unbiased estimator for
//! sampled time series, and a raw scaled estimator for a narrowband hardware
//! profile whose input already holds per-lag quantities.

use crate::error::SensingError;
use nalgebra::DMatrix;

/// Scale divisor applied by the raw narrowband-hardware estimator.
/// Fixed by the hardware's accumulator width; must not change.
pub(crate) const RAW_LAG_SCALE: f64 = 8.0;

/// Real symmetric Toeplitz covariance matrix of order L
///
/// Fully determined by its length-L lag vector `r`: entry (i, j) = r[|i - j|].
/// The unbiased estimator always produces r[0] >= 0; the raw scaled variant
/// forwards hardware values unchanged, so consumers take magnitudes where a
/// sign-safe normalizer is needed.
#[derive(Debug, Clone, PartialEq)]
pub struct CovarianceMatrix {
    lags: Vec<f64>,
}

impl CovarianceMatrix {
    /// Build a matrix from its lag vector
    ///
    /// # Panics
    /// Panics if `lags` is empty; an order-0 matrix has no zero-lag term.
    pub fn from_lags(lags: Vec<f64>) -> Self {
        assert!(!lags.is_empty(), "covariance matrix requires at least the zero lag");
        Self { lags }
    }

    /// Matrix order L
    pub fn order(&self) -> usize {
        self.lags.len()
    }

    /// The lag vector r (first matrix row)
    pub fn lags(&self) -> &[f64] {
        &self.lags
    }

    /// Zero-lag term r[0] (entry (0,0))
    pub fn zero_lag(&self) -> f64 {
        self.lags[0]
    }

    /// Entry (i, j) = r[|i - j|]
    ///
    /// # Panics
    /// Panics if `|i - j| >= order()`.
    pub fn entry(&self, i: usize, j: usize) -> f64 {
        self.lags[i.abs_diff(j)]
    }

    /// Expand to a dense matrix for eigen-decomposition
    pub fn to_dense(&self) -> DMatrix<f64> {
        let order = self.order();
        DMatrix::from_fn(order, order, |i, j| self.entry(i, j))
    }
}

/// Lag-covariance estimator variants
#[derive(Debug, Clone, PartialEq)]
pub enum LagEstimator {
    /// Mean-removed unbiased estimator:
    /// r[l] = sum(x0[n] * x0[n+l]) / (Ns - l) with x0 = x - mean(x)
    Unbiased { order: usize },

    /// Narrowband hardware profile: r[l] = x[l] / 8, no mean removal.
    /// The input already holds per-lag accumulator readings, not a time
    /// series. `None` takes the whole window as the lag vector.
    RawScaled { order: Option<usize> },
}

impl LagEstimator {
    /// Check the fixed parameters, independent of any window
    ///
    /// Used by detector constructors to fail fast before per-window work.
    pub fn validate(&self) -> Result<(), SensingError> {
        match self {
            LagEstimator::Unbiased { order: 0 } => Err(SensingError::ZeroLagOrder),
            LagEstimator::RawScaled { order: Some(0) } => Err(SensingError::ZeroLagOrder),
            _ => Ok(()),
        }
    }

    /// Estimate the covariance matrix of `x`
    ///
    /// # Returns
    /// Symmetric Toeplitz matrix of the configured order
    pub fn estimate(&self, x: &[f64]) -> Result<CovarianceMatrix, SensingError> {
        match self {
            LagEstimator::Unbiased { order } => {
                let order = check_order(*order, x.len())?;

                let mean = x.iter().sum::<f64>() / x.len() as f64;
                let x0: Vec<f64> = x.iter().map(|&v| v - mean).collect();

                let lags = (0..order).map(|l| unbiased_lag(&x0, l)).collect();
                Ok(CovarianceMatrix::from_lags(lags))
            }
            LagEstimator::RawScaled { order } => {
                let order = check_order(order.unwrap_or(x.len()), x.len())?;

                let lags = x[..order].iter().map(|&v| v / RAW_LAG_SCALE).collect();
                Ok(CovarianceMatrix::from_lags(lags))
            }
        }
    }
}

fn check_order(order: usize, window_len: usize) -> Result<usize, SensingError> {
    if order == 0 {
        return Err(SensingError::ZeroLagOrder);
    }
    if order > window_len {
        return Err(SensingError::LagOrderTooLarge { order, window_len });
    }
    Ok(order)
}

/// Unbiased lag product of an already mean-removed window
///
/// r[l] = sum_{n=0}^{Ns-l-1} x0[n] * x0[n+l] / (Ns - l)
///
/// Callers guarantee `lag < x0.len()`.
pub(crate) fn unbiased_lag(x0: &[f64], lag: usize) -> f64 {
    let n = x0.len();
    let dot: f64 = x0[..n - lag].iter().zip(&x0[lag..]).map(|(a, b)| a * b).sum();
    dot / (n - lag) as f64
}
