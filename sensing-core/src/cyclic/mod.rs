//! Cyclic spectral correlation (FAM) estimation

pub mod fam;
pub mod taper;

pub use fam::{CyclicSpectrumEstimator, CyclicSpectrumSurface, FamConfig};
