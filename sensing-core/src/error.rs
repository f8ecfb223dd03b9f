//! Error types for detector construction and per-window computation
//!
//! Malformed configuration is caught at detector construction wherever the
//! parameters allow it; windows that are too short for a statistic fail at
//! compute time. A zero normalizer is not an error: it produces a non-finite
//! statistic that callers must treat as "no decision".

use thiserror::Error;

/// Coarse classification of a [`SensingError`]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    /// Malformed configuration, independent of any particular window
    InvalidParameter,

    /// Window does not satisfy a statistic's minimum-length requirement
    InvalidInput,
}

#[derive(Error, Debug)]
pub enum SensingError {
    #[error("segment width must be at least 1")]
    ZeroSegmentWidth,

    #[error("segment stride must be at least 1")]
    ZeroStride,

    #[error("stride {stride} exceeds channel width {channel_width}")]
    StrideExceedsChannelWidth { stride: usize, channel_width: usize },

    #[error("lag order must be at least 1")]
    ZeroLagOrder,

    #[error("lag order {order} exceeds window length {window_len}")]
    LagOrderTooLarge { order: usize, window_len: usize },

    #[error("weighted lag combination requires exactly one zero-lag pair (found {count})")]
    ZeroLagPairCount { count: usize },

    #[error("spectral averaging count {count} is not a power of two")]
    AveragingCountNotPowerOfTwo { count: usize },

    #[error("output size {output_size} is not a multiple of stride {stride}")]
    OutputSizeMisaligned { output_size: usize, stride: usize },

    #[error("output size {output_size} keeps no resolution samples per channel pair at channel width {channel_width}")]
    EmptyResolutionWindow { output_size: usize, channel_width: usize },

    #[error("window length {window_len} is shorter than required {required}")]
    WindowTooShort { window_len: usize, required: usize },
}

impl SensingError {
    /// Classify this error per the two failure kinds detectors expose
    pub fn kind(&self) -> ErrorKind {
        match self {
            SensingError::ZeroSegmentWidth
            | SensingError::ZeroStride
            | SensingError::StrideExceedsChannelWidth { .. }
            | SensingError::ZeroLagOrder
            | SensingError::LagOrderTooLarge { .. }
            | SensingError::ZeroLagPairCount { .. }
            | SensingError::AveragingCountNotPowerOfTwo { .. }
            | SensingError::OutputSizeMisaligned { .. }
            | SensingError::EmptyResolutionWindow { .. } => ErrorKind::InvalidParameter,
            SensingError::WindowTooShort { .. } => ErrorKind::InvalidInput,
        }
    }
}
