//! Spectrum-sensing detection statistics
//!
//! Computes scalar detection statistics from fixed-length windows of real
//! sampled amplitudes: covariance-based statistics over symmetric Toeplitz
//! lag estimates, eigenvalue-spectrum statistics, and cyclic spectral
//! correlation (FAM) statistics. Every computation is pure and synchronous;
//! thresholding, waveform generation and campaign orchestration live with
//! the callers.

pub mod covariance;
pub mod cyclic;
pub mod detect;
pub mod error;
pub mod window;

pub use detect::{Detector, DetectorKind};
pub use error::{ErrorKind, SensingError};
