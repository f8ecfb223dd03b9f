//! Covariance-matrix detection statistics
//!
//! Each detector composes a lag estimator with one statistic from a closed
//! set. The estimator is an injected capability, so every estimator variant
//! pairs with every statistic without any shared implicit state.

use crate::covariance::estimator::{unbiased_lag, RAW_LAG_SCALE};
use crate::covariance::{CovarianceMatrix, LagEstimator};
use crate::error::SensingError;

/// Closed set of covariance-based statistics
#[derive(Debug, Clone, PartialEq)]
pub enum CovarianceStatistic {
    /// Zero-lag power: R[0,0]
    Energy,

    /// Covariance absolute value: (sum of |R[i,j]|)/L, over |R[0,0]|
    Cav,

    /// Maximum autocorrelation: max over j>0 of |R[0,j]|, over |R[0,0]|
    Mac,

    /// Covariance Frobenius norm: (sum of R[i,j]^2)/L, over R[0,0]^2
    Cfn,

    /// Weighted lag combination over (lag, weight) pairs; the single
    /// zero-lag entry is both a summand and the normalizer
    Fscbd(Vec<(usize, f64)>),
}

impl CovarianceStatistic {
    /// Stable slug for result naming
    pub fn slug(&self) -> &'static str {
        match self {
            CovarianceStatistic::Energy => "ed",
            CovarianceStatistic::Cav => "cav",
            CovarianceStatistic::Mac => "mac",
            CovarianceStatistic::Cfn => "cfn",
            CovarianceStatistic::Fscbd(_) => "fscbd",
        }
    }
}

/// Covariance detector: a lag estimator composed with one statistic
///
/// Stateless after construction; `compute` touches only its arguments.
#[derive(Debug, Clone)]
pub struct CovarianceDetector {
    estimator: LagEstimator,
    statistic: CovarianceStatistic,
}

impl CovarianceDetector {
    /// Compose an estimator with a statistic, failing fast on malformed
    /// parameters
    pub fn new(
        estimator: LagEstimator,
        statistic: CovarianceStatistic,
    ) -> Result<Self, SensingError> {
        estimator.validate()?;
        if let CovarianceStatistic::Fscbd(pairs) = &statistic {
            let count = pairs.iter().filter(|(lag, _)| *lag == 0).count();
            if count != 1 {
                return Err(SensingError::ZeroLagPairCount { count });
            }
        }
        Ok(Self { estimator, statistic })
    }

    pub fn slug(&self) -> &'static str {
        self.statistic.slug()
    }

    pub fn estimator(&self) -> &LagEstimator {
        &self.estimator
    }

    pub fn statistic(&self) -> &CovarianceStatistic {
        &self.statistic
    }

    /// Compute the statistic for one window
    ///
    /// A zero zero-lag term yields a non-finite value, not an error.
    pub fn compute(&self, x: &[f64]) -> Result<f64, SensingError> {
        match &self.statistic {
            CovarianceStatistic::Fscbd(pairs) => self.weighted_lag_combination(x, pairs),
            statistic => {
                let matrix = self.estimator.estimate(x)?;
                Ok(match statistic {
                    CovarianceStatistic::Energy => energy(&matrix),
                    CovarianceStatistic::Cav => cav(&matrix),
                    CovarianceStatistic::Mac => mac(&matrix),
                    CovarianceStatistic::Cfn => cfn(&matrix),
                    CovarianceStatistic::Fscbd(_) => unreachable!(),
                })
            }
        }
    }

    // FSCBD estimates exactly the lags its pairs name, using the injected
    // estimator's lag rule rather than a full covariance matrix.
    fn weighted_lag_combination(
        &self,
        x: &[f64],
        pairs: &[(usize, f64)],
    ) -> Result<f64, SensingError> {
        for &(lag, _) in pairs {
            if lag >= x.len() {
                return Err(SensingError::WindowTooShort {
                    window_len: x.len(),
                    required: lag + 1,
                });
            }
        }

        let mut combined = 0.0;
        let mut normalizer = 0.0;

        match &self.estimator {
            LagEstimator::Unbiased { .. } => {
                let mean = x.iter().sum::<f64>() / x.len() as f64;
                let x0: Vec<f64> = x.iter().map(|&v| v - mean).collect();
                for &(lag, weight) in pairs {
                    let magnitude = unbiased_lag(&x0, lag).abs();
                    combined += weight * magnitude;
                    if lag == 0 {
                        normalizer = magnitude;
                    }
                }
            }
            LagEstimator::RawScaled { .. } => {
                for &(lag, weight) in pairs {
                    let magnitude = (x[lag] / RAW_LAG_SCALE).abs();
                    combined += weight * magnitude;
                    if lag == 0 {
                        normalizer = magnitude;
                    }
                }
            }
        }

        Ok(combined / normalizer)
    }
}

/// Zero-lag power R[0,0]
pub fn energy(matrix: &CovarianceMatrix) -> f64 {
    matrix.zero_lag()
}

/// Covariance absolute value statistic
pub fn cav(matrix: &CovarianceMatrix) -> f64 {
    let order = matrix.order();
    let mut sum = 0.0;
    for i in 0..order {
        for j in 0..order {
            sum += matrix.entry(i, j).abs();
        }
    }
    sum / order as f64 / matrix.zero_lag().abs()
}

/// Maximum off-diagonal autocorrelation statistic
pub fn mac(matrix: &CovarianceMatrix) -> f64 {
    let lags = matrix.lags();
    // Order 1 has no off-diagonal lags; the statistic degenerates to unity
    let peak = if lags.len() == 1 {
        lags[0].abs()
    } else {
        lags[1..]
            .iter()
            .fold(f64::NEG_INFINITY, |peak, &v| peak.max(v.abs()))
    };
    peak / lags[0].abs()
}

/// Covariance Frobenius norm statistic
pub fn cfn(matrix: &CovarianceMatrix) -> f64 {
    let order = matrix.order();
    let mut sum = 0.0;
    for i in 0..order {
        for j in 0..order {
            let value = matrix.entry(i, j);
            sum += value * value;
        }
    }
    sum / order as f64 / (matrix.zero_lag() * matrix.zero_lag())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ErrorKind;

    fn test_window(len: usize) -> Vec<f64> {
        (0..len)
            .map(|n| (0.7 * n as f64).sin() + 0.3 * (1.9 * n as f64).cos() + 0.5)
            .collect()
    }

    #[test]
    fn test_energy_is_zero_lag() {
        let x = test_window(64);
        let detector = CovarianceDetector::new(
            LagEstimator::Unbiased { order: 5 },
            CovarianceStatistic::Energy,
        )
        .unwrap();

        let matrix = LagEstimator::Unbiased { order: 5 }.estimate(&x).unwrap();
        assert_eq!(detector.compute(&x).unwrap(), matrix.zero_lag());
    }

    #[test]
    fn test_order_one_degenerates_to_unity() {
        // With L = 1 there are no off-diagonal terms: CAV == MAC == CFN == 1
        let x = test_window(32);
        for statistic in [
            CovarianceStatistic::Cav,
            CovarianceStatistic::Mac,
            CovarianceStatistic::Cfn,
        ] {
            let detector =
                CovarianceDetector::new(LagEstimator::Unbiased { order: 1 }, statistic).unwrap();
            assert!((detector.compute(&x).unwrap() - 1.0).abs() < 1e-12);
        }
    }

    #[test]
    fn test_cav_closed_form() {
        // Order 2, lags [1.0, 0.5]: sum |R| = 2*1 + 2*0.5 = 3, /2 /1 = 1.5
        let matrix = CovarianceMatrix::from_lags(vec![1.0, 0.5]);
        assert!((cav(&matrix) - 1.5).abs() < 1e-12);
    }

    #[test]
    fn test_mac_takes_largest_off_diagonal() {
        let matrix = CovarianceMatrix::from_lags(vec![2.0, -1.0, 0.5]);
        assert!((mac(&matrix) - 0.5).abs() < 1e-12);
    }

    #[test]
    fn test_cfn_closed_form() {
        // Order 2, lags [2.0, 1.0]: sum R^2 = 2*4 + 2*1 = 10, /2 /4 = 1.25
        let matrix = CovarianceMatrix::from_lags(vec![2.0, 1.0]);
        assert!((cfn(&matrix) - 1.25).abs() < 1e-12);
    }

    #[test]
    fn test_zero_window_is_indeterminate() {
        let x = vec![0.0; 32];
        let detector = CovarianceDetector::new(
            LagEstimator::Unbiased { order: 4 },
            CovarianceStatistic::Cav,
        )
        .unwrap();

        // 0/0 propagates as a non-finite value, never an error
        let value = detector.compute(&x).unwrap();
        assert!(!value.is_finite());
    }

    #[test]
    fn test_fscbd_requires_single_zero_lag() {
        let err = CovarianceDetector::new(
            LagEstimator::Unbiased { order: 4 },
            CovarianceStatistic::Fscbd(vec![(1, 1.0), (2, 1.0)]),
        )
        .unwrap_err();
        assert!(matches!(err, SensingError::ZeroLagPairCount { count: 0 }));
        assert_eq!(err.kind(), ErrorKind::InvalidParameter);

        let err = CovarianceDetector::new(
            LagEstimator::Unbiased { order: 4 },
            CovarianceStatistic::Fscbd(vec![(0, 1.0), (0, 2.0)]),
        )
        .unwrap_err();
        assert!(matches!(err, SensingError::ZeroLagPairCount { count: 2 }));
    }

    #[test]
    fn test_fscbd_zero_lag_only_is_unity() {
        let x = test_window(32);
        let detector = CovarianceDetector::new(
            LagEstimator::Unbiased { order: 1 },
            CovarianceStatistic::Fscbd(vec![(0, 1.0)]),
        )
        .unwrap();
        assert!((detector.compute(&x).unwrap() - 1.0).abs() < 1e-12);
    }

    #[test]
    fn test_fscbd_weighted_sum() {
        // x = [1,2,3,4]: r[0] = 1.25, r[1] = 1.25/3
        // T = (1*1.25 + 2*1.25/3) / 1.25 = 5/3
        let x = vec![1.0, 2.0, 3.0, 4.0];
        let detector = CovarianceDetector::new(
            LagEstimator::Unbiased { order: 1 },
            CovarianceStatistic::Fscbd(vec![(0, 1.0), (1, 2.0)]),
        )
        .unwrap();
        assert!((detector.compute(&x).unwrap() - 5.0 / 3.0).abs() < 1e-12);
    }

    #[test]
    fn test_fscbd_lag_beyond_window_fails() {
        let x = vec![1.0, 2.0, 3.0];
        let detector = CovarianceDetector::new(
            LagEstimator::Unbiased { order: 1 },
            CovarianceStatistic::Fscbd(vec![(0, 1.0), (3, 1.0)]),
        )
        .unwrap();
        let err = detector.compute(&x).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::InvalidInput);
    }

    #[test]
    fn test_raw_scaled_composition() {
        // Hardware lag vector [8, 4]: r = [1.0, 0.5] after the /8 scale
        let x = vec![8.0, 4.0];
        let detector = CovarianceDetector::new(
            LagEstimator::RawScaled { order: None },
            CovarianceStatistic::Mac,
        )
        .unwrap();
        assert!((detector.compute(&x).unwrap() - 0.5).abs() < 1e-12);
    }

    #[test]
    fn test_slugs() {
        assert_eq!(CovarianceStatistic::Energy.slug(), "ed");
        assert_eq!(CovarianceStatistic::Cav.slug(), "cav");
        assert_eq!(CovarianceStatistic::Mac.slug(), "mac");
        assert_eq!(CovarianceStatistic::Cfn.slug(), "cfn");
        assert_eq!(CovarianceStatistic::Fscbd(vec![(0, 1.0)]).slug(), "fscbd");
    }
}
