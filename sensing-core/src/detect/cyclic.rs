//! Cyclic-spectrum detection statistics
//!
//! Both statistics scan the two surface halves around the center column;
//! the exact center (zero cyclic frequency) is the stationary reference and
//! is excluded from the scan.

use crate::cyclic::{CyclicSpectrumEstimator, CyclicSpectrumSurface, FamConfig};
use crate::error::SensingError;

/// Closed set of cyclic-surface statistics
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CyclicStatistic {
    /// Spectral coherence: rows normalized by their center-column value
    Scf,

    /// Cyclic autocorrelation norm: unnormalized peak magnitude
    Can,
}

impl CyclicStatistic {
    /// Stable slug for result naming
    pub fn slug(&self) -> &'static str {
        match self {
            CyclicStatistic::Scf => "scf",
            CyclicStatistic::Can => "can",
        }
    }
}

/// Cyclic detector: a FAM estimator composed with one statistic
#[derive(Debug, Clone)]
pub struct CyclicDetector {
    estimator: CyclicSpectrumEstimator,
    statistic: CyclicStatistic,
}

impl CyclicDetector {
    pub fn new(config: FamConfig, statistic: CyclicStatistic) -> Result<Self, SensingError> {
        Ok(Self {
            estimator: CyclicSpectrumEstimator::new(config)?,
            statistic,
        })
    }

    pub fn statistic(&self) -> CyclicStatistic {
        self.statistic
    }

    pub fn estimator(&self) -> &CyclicSpectrumEstimator {
        &self.estimator
    }

    /// Compute the statistic for one window
    pub fn compute(&self, x: &[f64]) -> Result<f64, SensingError> {
        let surface = self.estimator.estimate(x)?;
        Ok(match self.statistic {
            CyclicStatistic::Scf => spectral_coherence(&surface),
            CyclicStatistic::Can => cyclic_autocorrelation_norm(&surface),
        })
    }
}

/// Peak coherence over both surface halves
///
/// Every row is normalized by its own center-column value before taking
/// magnitudes. A zero center value makes the result non-finite, which
/// callers treat as "no decision".
pub fn spectral_coherence(surface: &CyclicSpectrumSurface) -> f64 {
    let data = surface.data();
    let center = data.ncols() / 2;
    let mut peak = f64::NEG_INFINITY;

    for row in data.rows() {
        let reference = row[center];
        for (col, value) in row.iter().enumerate() {
            if col == center {
                continue;
            }
            let coherence = (*value / reference).norm();
            if coherence.is_nan() {
                return f64::NAN;
            }
            if coherence > peak {
                peak = coherence;
            }
        }
    }
    peak
}

/// Peak magnitude over both surface halves, unnormalized
pub fn cyclic_autocorrelation_norm(surface: &CyclicSpectrumSurface) -> f64 {
    let data = surface.data();
    let center = data.ncols() / 2;
    let mut peak = f64::NEG_INFINITY;

    for row in data.rows() {
        for (col, value) in row.iter().enumerate() {
            if col == center {
                continue;
            }
            let magnitude = value.norm();
            if magnitude > peak {
                peak = magnitude;
            }
        }
    }
    peak
}
