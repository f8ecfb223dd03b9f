//! FFT accumulation method (FAM) cyclic spectral correlation estimator
//!
//! Channelizes a sample window into overlapping tapered segments, computes
//! per-segment spectra, converts each channel to baseband in segment time,
//! then correlates every ordered channel pair with a second FFT across
//! segments. The pair results assemble into a cyclic-frequency x
//! spectral-frequency surface whose magnitude estimates spectral correlation
//! density. Cyclostationary signals show off-center peaks; stationary noise
//! concentrates on the center (zero cyclic frequency) column.

use crate::cyclic::taper::energy_normalized_hamming;
use crate::error::SensingError;
use crate::window::SlidingWindowView;
use ndarray::Array2;
use rustfft::{num_complex::Complex, FftPlanner};
use std::f64::consts::PI;

/// Configuration for the FAM estimator
#[derive(Debug, Clone)]
pub struct FamConfig {
    /// Channelizer segment width Np (number of frequency channels)
    pub channel_width: usize,

    /// Stride L between successive segments
    pub stride: usize,

    /// Spectral half-width N of the output surface (columns = 2N).
    /// `None` derives N = stride * P where P is the segment count reduced
    /// to the nearest lower power of two.
    pub output_size: Option<usize>,
}

impl Default for FamConfig {
    fn default() -> Self {
        Self {
            channel_width: 64,
            stride: 16,
            output_size: None,
        }
    }
}

/// Cyclic-frequency x spectral-frequency correlation surface
///
/// Shape Np x 2N. Row k is cyclic-frequency bin k/Np; column a is spectral
/// frequency (a/N - 1)/2 in normalized units. The exact center column holds
/// the non-cyclic (stationary) reference.
#[derive(Debug, Clone)]
pub struct CyclicSpectrumSurface {
    data: Array2<Complex<f64>>,
    channel_width: usize,
    half_width: usize,
}

impl CyclicSpectrumSurface {
    /// Complex surface values
    pub fn data(&self) -> &Array2<Complex<f64>> {
        &self.data
    }

    /// Number of cyclic-frequency bins Np
    pub fn channel_width(&self) -> usize {
        self.channel_width
    }

    /// Spectral half-width N (the center column index)
    pub fn half_width(&self) -> usize {
        self.half_width
    }

    /// Normalized cyclic frequency of row `row`: row / Np
    pub fn cyclic_frequency(&self, row: usize) -> f64 {
        row as f64 / self.channel_width as f64
    }

    /// Normalized spectral frequency of column `col`: (col/N - 1)/2
    pub fn spectral_frequency(&self, col: usize) -> f64 {
        (col as f64 / self.half_width as f64 - 1.0) / 2.0
    }
}

/// FAM estimator with fixed channelization parameters
///
/// Stateless after construction; `estimate` allocates its own working
/// buffers, so a single estimator is safe to share across threads.
#[derive(Debug, Clone)]
pub struct CyclicSpectrumEstimator {
    config: FamConfig,
}

impl CyclicSpectrumEstimator {
    /// Validate the configuration and build an estimator
    pub fn new(config: FamConfig) -> Result<Self, SensingError> {
        if config.channel_width == 0 {
            return Err(SensingError::ZeroSegmentWidth);
        }
        if config.stride == 0 {
            return Err(SensingError::ZeroStride);
        }
        // The kept resolution half-width per channel pair is
        // P * stride / (2 * Np); it must fit the second FFT half-length P/2
        if config.stride > config.channel_width {
            return Err(SensingError::StrideExceedsChannelWidth {
                stride: config.stride,
                channel_width: config.channel_width,
            });
        }
        if let Some(output_size) = config.output_size {
            if output_size % config.stride != 0 {
                return Err(SensingError::OutputSizeMisaligned {
                    output_size,
                    stride: config.stride,
                });
            }
            let count = output_size / config.stride;
            if !count.is_power_of_two() {
                return Err(SensingError::AveragingCountNotPowerOfTwo { count });
            }
            if output_size / config.channel_width / 2 == 0 {
                return Err(SensingError::EmptyResolutionWindow {
                    output_size,
                    channel_width: config.channel_width,
                });
            }
        }
        Ok(Self { config })
    }

    pub fn config(&self) -> &FamConfig {
        &self.config
    }

    /// Estimate the cyclic spectral correlation surface of `x`
    ///
    /// # Arguments
    /// * `x` - Sample window, at least one segment long
    ///
    /// # Returns
    /// Np x 2N complex surface
    pub fn estimate(&self, x: &[f64]) -> Result<CyclicSpectrumSurface, SensingError> {
        let np = self.config.channel_width;
        let stride = self.config.stride;

        // Input channelization
        let segments = SlidingWindowView::new(x, np, stride)?;

        // The second FFT averages across P segments; P must be a power of
        // two, either reduced from the available segment count or implied
        // by the requested output size.
        let (p, n) = match self.config.output_size {
            None => {
                let p = prev_power_of_two(segments.len());
                (p, stride * p)
            }
            Some(n) => {
                let p = n / stride;
                if p > segments.len() {
                    return Err(SensingError::WindowTooShort {
                        window_len: x.len(),
                        required: np + (p - 1) * stride,
                    });
                }
                (p, n)
            }
        };

        // Resolution samples kept per channel pair
        let mp = n / np / 2;
        if mp == 0 {
            return Err(SensingError::EmptyResolutionWindow {
                output_size: n,
                channel_width: np,
            });
        }

        let mut planner = FftPlanner::new();
        let first_fft = planner.plan_fft_forward(np);
        let second_fft = planner.plan_fft_forward(p);

        // Windowing, first FFT, and complex demodulation. Channel k of
        // segment s lands in channels[[k, s]] so each channel's segment-time
        // series is contiguous for the pair products below.
        let taper = energy_normalized_hamming(np);
        let mut channels = Array2::<Complex<f64>>::zeros((np, p));
        let mut segment_buf = vec![Complex::new(0.0, 0.0); np];

        for (seg_idx, segment) in segments.iter().take(p).enumerate() {
            for ((value, &sample), &w) in segment_buf.iter_mut().zip(segment).zip(&taper) {
                *value = Complex::new(sample * w, 0.0);
            }
            first_fft.process(&mut segment_buf);
            fftshift(&mut segment_buf);

            // Remove each channel's center-frequency phase ramp across
            // segments (baseband conversion in segment time)
            let t = (seg_idx * stride) as f64;
            for (k, &value) in segment_buf.iter().enumerate() {
                let f = k as f64 / np as f64 - 0.5;
                channels[[k, seg_idx]] = value * Complex::from_polar(1.0, -2.0 * PI * f * t);
            }
        }

        // Conjugate products and second FFT for every ordered channel pair,
        // assembled into the surface. Fractional row/column indices truncate
        // and later pairs overwrite earlier ones; both choices reproduce the
        // reference output exactly and must not change.
        let mut surface = Array2::<Complex<f64>>::zeros((np, 2 * n));
        let mut product = vec![Complex::new(0.0, 0.0); p];
        let half_p = p / 2;
        let scale = 1.0 / p as f64;

        for k in 0..np {
            for l in 0..np {
                for (s, value) in product.iter_mut().enumerate() {
                    *value = channels[[k, s]] * channels[[l, s]].conj();
                }
                second_fft.process(&mut product);
                fftshift(&mut product);

                let row = (k + l) / 2;
                let col = (((k as f64 - l as f64) / np as f64 + 1.0) * n as f64) as usize;
                for (offset, &value) in product[half_p - mp..half_p + mp].iter().enumerate() {
                    surface[[row, col - mp + offset]] = value * scale;
                }
            }
        }

        Ok(CyclicSpectrumSurface {
            data: surface,
            channel_width: np,
            half_width: n,
        })
    }
}

/// Largest power of two <= `value`
fn prev_power_of_two(value: usize) -> usize {
    debug_assert!(value > 0);
    1 << (usize::BITS - 1 - value.leading_zeros())
}

/// Rotate so the zero-frequency bin lands at the center
fn fftshift(buf: &mut [Complex<f64>]) {
    let shift = buf.len() / 2;
    buf.rotate_right(shift);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ErrorKind;

    // 64 segments at width 32, stride 8: P = 64, N = 512, surface 32 x 1024
    fn test_config() -> FamConfig {
        FamConfig {
            channel_width: 32,
            stride: 8,
            output_size: None,
        }
    }

    fn test_window_len() -> usize {
        32 + 8 * 63
    }

    fn peak_position(surface: &CyclicSpectrumSurface) -> (usize, usize, f64) {
        let mut peak = (0, 0, f64::NEG_INFINITY);
        for ((row, col), value) in surface.data().indexed_iter() {
            let magnitude = value.norm();
            if magnitude > peak.2 {
                peak = (row, col, magnitude);
            }
        }
        peak
    }

    #[test]
    fn test_surface_shape_and_axes() {
        let x = vec![1.0; test_window_len()];
        let estimator = CyclicSpectrumEstimator::new(test_config()).unwrap();
        let surface = estimator.estimate(&x).unwrap();

        assert_eq!(surface.data().dim(), (32, 1024));
        assert_eq!(surface.channel_width(), 32);
        assert_eq!(surface.half_width(), 512);

        assert_eq!(surface.cyclic_frequency(0), 0.0);
        assert_eq!(surface.cyclic_frequency(16), 0.5);
        // Center column is zero spectral frequency
        assert_eq!(surface.spectral_frequency(512), 0.0);
        assert_eq!(surface.spectral_frequency(0), -0.5);
    }

    #[test]
    fn test_constant_signal_peaks_at_dc_channel() {
        // A constant signal is pure DC: the peak sits on the stationary
        // column at the center channel, and cross-channel products fall
        // outside the kept resolution window.
        let x = vec![1.0; test_window_len()];
        let estimator = CyclicSpectrumEstimator::new(test_config()).unwrap();
        let surface = estimator.estimate(&x).unwrap();

        let (row, col, magnitude) = peak_position(&surface);
        assert_eq!(row, 16);
        assert_eq!(col, 512);
        assert!(magnitude > 0.0);
    }

    #[test]
    fn test_sinusoid_peaks_on_center_column() {
        // f0 = 0.25 sits exactly on channel 24 (and its image on channel 8).
        // The conjugate carriers produce an off-center feature of the same
        // magnitude as the per-carrier power, so compare the center column
        // against the global peak with a tie tolerance.
        let x: Vec<f64> = (0..test_window_len())
            .map(|n| (2.0 * PI * 0.25 * n as f64).cos())
            .collect();
        let estimator = CyclicSpectrumEstimator::new(test_config()).unwrap();
        let surface = estimator.estimate(&x).unwrap();

        let (_, _, global_peak) = peak_position(&surface);
        let center = surface.half_width();
        let center_peak = (0..surface.channel_width())
            .map(|row| surface.data()[[row, center]].norm())
            .fold(f64::NEG_INFINITY, f64::max);

        assert!(global_peak > 0.0);
        assert!(center_peak >= global_peak * (1.0 - 1e-9));
    }

    #[test]
    fn test_derived_averaging_count_rounds_down() {
        // 70 segments available: P reduces to 64, so N = 8 * 64 = 512
        let len = 32 + 8 * 69;
        let x = vec![0.5; len];
        let estimator = CyclicSpectrumEstimator::new(test_config()).unwrap();
        let surface = estimator.estimate(&x).unwrap();
        assert_eq!(surface.half_width(), 512);
    }

    #[test]
    fn test_explicit_output_size() {
        let config = FamConfig {
            channel_width: 32,
            stride: 8,
            output_size: Some(256),
        };
        let estimator = CyclicSpectrumEstimator::new(config).unwrap();

        let x = vec![0.5; test_window_len()];
        let surface = estimator.estimate(&x).unwrap();
        assert_eq!(surface.half_width(), 256);
        assert_eq!(surface.data().dim(), (32, 512));
    }

    #[test]
    fn test_output_size_validation() {
        // Not a multiple of the stride
        let err = CyclicSpectrumEstimator::new(FamConfig {
            channel_width: 32,
            stride: 8,
            output_size: Some(260),
        })
        .unwrap_err();
        assert_eq!(err.kind(), ErrorKind::InvalidParameter);

        // P = 24 is not a power of two
        let err = CyclicSpectrumEstimator::new(FamConfig {
            channel_width: 32,
            stride: 8,
            output_size: Some(192),
        })
        .unwrap_err();
        assert!(matches!(err, SensingError::AveragingCountNotPowerOfTwo { count: 24 }));

        // N too small to keep any resolution samples
        let err = CyclicSpectrumEstimator::new(FamConfig {
            channel_width: 64,
            stride: 8,
            output_size: Some(64),
        })
        .unwrap_err();
        assert!(matches!(err, SensingError::EmptyResolutionWindow { .. }));
    }

    #[test]
    fn test_stride_wider_than_channel_is_rejected() {
        // stride > Np would keep more resolution samples per pair than the
        // second FFT produces; the configuration must fail up front rather
        // than at estimate time
        let err = CyclicSpectrumEstimator::new(FamConfig {
            channel_width: 16,
            stride: 32,
            output_size: None,
        })
        .unwrap_err();
        assert!(matches!(
            err,
            SensingError::StrideExceedsChannelWidth { stride: 32, channel_width: 16 }
        ));
        assert_eq!(err.kind(), ErrorKind::InvalidParameter);
    }

    #[test]
    fn test_stride_equal_to_channel_width() {
        // Non-overlapping channelization is the boundary case: the kept
        // window spans the whole second FFT output
        let config = FamConfig {
            channel_width: 16,
            stride: 16,
            output_size: None,
        };
        let estimator = CyclicSpectrumEstimator::new(config).unwrap();

        // 64 segments: P = 64, N = 1024
        let x = vec![0.5; 16 + 16 * 63];
        let surface = estimator.estimate(&x).unwrap();
        assert_eq!(surface.data().dim(), (16, 2048));
    }

    #[test]
    fn test_window_too_short_for_requested_size() {
        let config = FamConfig {
            channel_width: 32,
            stride: 8,
            output_size: Some(512),
        };
        let estimator = CyclicSpectrumEstimator::new(config).unwrap();

        // Only 33 segments fit but P = 64 are required
        let x = vec![0.5; 288];
        let err = estimator.estimate(&x).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::InvalidInput);
    }

    #[test]
    fn test_estimate_is_deterministic() {
        let x: Vec<f64> = (0..test_window_len())
            .map(|n| (0.31 * n as f64).sin() + 0.2 * (1.7 * n as f64).cos())
            .collect();
        let estimator = CyclicSpectrumEstimator::new(test_config()).unwrap();

        let first = estimator.estimate(&x).unwrap();
        let second = estimator.estimate(&x).unwrap();

        for (a, b) in first.data().iter().zip(second.data().iter()) {
            assert_eq!(a.re.to_bits(), b.re.to_bits());
            assert_eq!(a.im.to_bits(), b.im.to_bits());
        }
    }

    #[test]
    fn test_fftshift_matches_half_rotation() {
        let mut buf: Vec<Complex<f64>> = (0..4).map(|n| Complex::new(n as f64, 0.0)).collect();
        fftshift(&mut buf);
        let shifted: Vec<f64> = buf.iter().map(|c| c.re).collect();
        assert_eq!(shifted, vec![2.0, 3.0, 0.0, 1.0]);
    }

    #[test]
    fn test_prev_power_of_two() {
        assert_eq!(prev_power_of_two(1), 1);
        assert_eq!(prev_power_of_two(63), 32);
        assert_eq!(prev_power_of_two(64), 64);
        assert_eq!(prev_power_of_two(100), 64);
    }
}
