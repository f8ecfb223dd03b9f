//! Eigenvalue-based detection statistics
//!
//! All four statistics work on the absolute eigenvalue spectrum of the
//! mean-removed unbiased covariance matrix.

use crate::covariance::{eigen_spectrum, LagEstimator};
use crate::error::SensingError;

/// Closed set of eigenvalue-spectrum statistics
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EigenStatistic {
    /// Maximum over minimum eigenvalue
    Mme,

    /// Raw-window energy over minimum eigenvalue
    Eme,

    /// Arithmetic over geometric mean of the eigenvalues
    Agm,

    /// Maximum eigenvalue over the eigenvalue sum
    Met,
}

impl EigenStatistic {
    /// Stable slug for result naming
    pub fn slug(&self) -> &'static str {
        match self {
            EigenStatistic::Mme => "mme",
            EigenStatistic::Eme => "eme",
            EigenStatistic::Agm => "agm",
            EigenStatistic::Met => "met",
        }
    }
}

/// Eigenvalue detector: covariance order composed with one statistic
#[derive(Debug, Clone)]
pub struct EigenvalueDetector {
    order: usize,
    statistic: EigenStatistic,
}

impl EigenvalueDetector {
    pub fn new(order: usize, statistic: EigenStatistic) -> Result<Self, SensingError> {
        if order == 0 {
            return Err(SensingError::ZeroLagOrder);
        }
        Ok(Self { order, statistic })
    }

    pub fn order(&self) -> usize {
        self.order
    }

    pub fn statistic(&self) -> EigenStatistic {
        self.statistic
    }

    /// Compute the statistic for one window
    pub fn compute(&self, x: &[f64]) -> Result<f64, SensingError> {
        let matrix = LagEstimator::Unbiased { order: self.order }.estimate(x)?;
        let spectrum = eigen_spectrum(&matrix);

        Ok(match self.statistic {
            EigenStatistic::Mme => max_min_ratio(&spectrum),
            EigenStatistic::Eme => energy_min_ratio(x, &spectrum),
            EigenStatistic::Agm => arithmetic_geometric_ratio(&spectrum),
            EigenStatistic::Met => max_over_sum(&spectrum),
        })
    }
}

/// MME: largest eigenvalue over smallest
pub fn max_min_ratio(spectrum: &[f64]) -> f64 {
    spectrum_max(spectrum) / spectrum_min(spectrum)
}

/// EME: raw-window energy over the smallest eigenvalue
///
/// The numerator deliberately comes from the window itself, not the
/// covariance matrix; the mix of raw energy and covariance spectrum is part
/// of the statistic's definition.
pub fn energy_min_ratio(x: &[f64], spectrum: &[f64]) -> f64 {
    let energy: f64 = x.iter().map(|&v| v * v).sum();
    energy / spectrum_min(spectrum)
}

/// AGM: arithmetic mean over geometric mean of the eigenvalues
pub fn arithmetic_geometric_ratio(spectrum: &[f64]) -> f64 {
    let count = spectrum.len() as f64;
    let arithmetic = spectrum.iter().sum::<f64>() / count;
    let geometric = spectrum.iter().product::<f64>().powf(1.0 / count);
    arithmetic / geometric
}

/// MET: largest eigenvalue over the eigenvalue sum
pub fn max_over_sum(spectrum: &[f64]) -> f64 {
    spectrum_max(spectrum) / spectrum.iter().sum::<f64>()
}

fn spectrum_max(spectrum: &[f64]) -> f64 {
    spectrum.iter().fold(f64::NEG_INFINITY, |a, &b| a.max(b))
}

fn spectrum_min(spectrum: &[f64]) -> f64 {
    spectrum.iter().fold(f64::INFINITY, |a, &b| a.min(b))
}
