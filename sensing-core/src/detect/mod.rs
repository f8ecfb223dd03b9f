//! Detection statistics and detector composition
//!
//! A detector is a named, parametrized, stateless window-to-scalar function.
//! Parameters are fixed at construction, validated up front, and never
//! mutated afterwards, so detectors are freely shared across threads. The
//! scalar is compared to a threshold elsewhere; this crate never makes an
//! occupancy decision.

pub mod covariance;
pub mod cyclic;
pub mod eigenvalue;
pub mod energy;

pub use covariance::{CovarianceDetector, CovarianceStatistic};
pub use cyclic::{CyclicDetector, CyclicStatistic};
pub use eigenvalue::{EigenStatistic, EigenvalueDetector};
pub use energy::{AdcPowerSum, EnergyDetector};

use crate::error::SensingError;

/// Closed set of detector families
#[derive(Debug, Clone)]
pub enum DetectorKind {
    Energy(EnergyDetector),
    AdcPowerSum(AdcPowerSum),
    Covariance(CovarianceDetector),
    Eigenvalue(EigenvalueDetector),
    Cyclic(CyclicDetector),
}

/// A named, parametrized detection statistic
///
/// The slug identifies the statistic; the optional variant label
/// distinguishes parametrizations of the same statistic (lag order,
/// channel width, sample count) in persisted results.
#[derive(Debug, Clone)]
pub struct Detector {
    kind: DetectorKind,
    variant: Option<String>,
}

impl Detector {
    pub fn new(kind: DetectorKind) -> Self {
        Self { kind, variant: None }
    }

    pub fn with_variant(kind: DetectorKind, variant: impl Into<String>) -> Self {
        Self {
            kind,
            variant: Some(variant.into()),
        }
    }

    /// Stable slug naming the statistic
    pub fn slug(&self) -> &'static str {
        match &self.kind {
            DetectorKind::Energy(_) => "ed",
            DetectorKind::AdcPowerSum(_) => "ed",
            DetectorKind::Covariance(detector) => detector.slug(),
            DetectorKind::Eigenvalue(detector) => detector.statistic().slug(),
            DetectorKind::Cyclic(detector) => detector.statistic().slug(),
        }
    }

    /// Variant label, when parametrizations need distinguishing
    pub fn variant(&self) -> Option<&str> {
        self.variant.as_deref()
    }

    pub fn kind(&self) -> &DetectorKind {
        &self.kind
    }

    /// Compute the detection statistic for one window
    ///
    /// Pure: identical windows yield bit-identical results. A non-finite
    /// value means the statistic is indeterminate for this window (a zero
    /// normalizer), which callers must treat as "no decision" rather than
    /// discard.
    pub fn compute(&self, window: &[f64]) -> Result<f64, SensingError> {
        match &self.kind {
            DetectorKind::Energy(detector) => Ok(detector.compute(window)),
            DetectorKind::AdcPowerSum(detector) => detector.compute(window),
            DetectorKind::Covariance(detector) => detector.compute(window),
            DetectorKind::Eigenvalue(detector) => detector.compute(window),
            DetectorKind::Cyclic(detector) => detector.compute(window),
        }
    }
}
