//! Hamming taper for the FAM channelizer
//!
//! Applied per segment before the first FFT to control spectral leakage
//! between channels.

use std::f64::consts::PI;

/// Generate Hamming window coefficients
///
/// w[n] = 0.54 - 0.46*cos(2πn/(M-1)) for n = 0..M-1
pub fn hamming(length: usize) -> Vec<f64> {
    // Degenerate single-point window
    if length == 1 {
        return vec![1.0];
    }

    let m = length as f64;
    (0..length)
        .map(|n| {
            let angle = 2.0 * PI * n as f64 / (m - 1.0);
            0.54 - 0.46 * angle.cos()
        })
        .collect()
}

/// Hamming taper normalized to unit energy (sum of squares = 1)
///
/// Keeps channel power estimates comparable across channel widths.
pub fn energy_normalized_hamming(length: usize) -> Vec<f64> {
    let mut window = hamming(length);
    let energy: f64 = window.iter().map(|&w| w * w).sum();
    let scale = 1.0 / energy.sqrt();
    for w in window.iter_mut() {
        *w *= scale;
    }
    window
}
