//! Raw-window detection statistics

use crate::error::SensingError;

/// Classic energy detector: inner product of the window with itself
#[derive(Debug, Clone, Copy, Default)]
pub struct EnergyDetector;

impl EnergyDetector {
    pub fn new() -> Self {
        Self
    }

    pub fn compute(&self, x: &[f64]) -> f64 {
        x.iter().map(|&v| v * v).sum()
    }
}

// Fixed ADC calibration of the narrowband hardware front end. The codes map
// to dBm through an affine transform measured on the deployed boards; the
// constants must be reproduced exactly.
const ADC_FULL_SCALE_VOLTS: f64 = 3.3;
const ADC_CODE_RANGE: f64 = 4095.0;
const ADC_GAIN_DIVISOR: f64 = 25.0;
const ADC_OFFSET_DBM: f64 = -84.0 - 66.0;

/// Summed linear power of the first N raw ADC codes
///
/// Each code converts to dBm via the fixed calibration, then to linear
/// milliwatt-referenced power in watts; the result is the sum over the
/// first `sample_count` codes.
#[derive(Debug, Clone, Copy)]
pub struct AdcPowerSum {
    sample_count: usize,
}

impl AdcPowerSum {
    /// # Arguments
    /// * `sample_count` - Number of leading ADC codes to accumulate
    pub fn new(sample_count: usize) -> Self {
        Self { sample_count }
    }

    pub fn sample_count(&self) -> usize {
        self.sample_count
    }

    pub fn compute(&self, x: &[f64]) -> Result<f64, SensingError> {
        if x.len() < self.sample_count {
            return Err(SensingError::WindowTooShort {
                window_len: x.len(),
                required: self.sample_count,
            });
        }

        let sum = x[..self.sample_count]
            .iter()
            .map(|&code| {
                let dbm =
                    code * ADC_FULL_SCALE_VOLTS * 1000.0 / ADC_CODE_RANGE / ADC_GAIN_DIVISOR
                        + ADC_OFFSET_DBM;
                1e-3 * 10f64.powf(dbm / 10.0)
            })
            .sum();
        Ok(sum)
    }
}
