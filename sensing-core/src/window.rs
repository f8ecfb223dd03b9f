//! Overlapping-segment view of a sample window
//!
//! Borrows the underlying slice; every segment is a subslice, so building
//! the view never copies sample data.

use crate::error::SensingError;

/// Zero-copy view of a sample window as overlapping segments
///
/// Given a window of length `n`, segment width `w` and stride `s`, the view
/// exposes `(n - w)/s + 1` segments where segment `i` covers samples
/// `[i*s, i*s + w)`.
#[derive(Debug, Clone, Copy)]
pub struct SlidingWindowView<'a> {
    samples: &'a [f64],
    width: usize,
    stride: usize,
    count: usize,
}

impl<'a> SlidingWindowView<'a> {
    /// Create a view over `samples`
    ///
    /// # Arguments
    /// * `samples` - Underlying sample window
    /// * `width` - Segment width in samples
    /// * `stride` - Offset between successive segment starts
    pub fn new(samples: &'a [f64], width: usize, stride: usize) -> Result<Self, SensingError> {
        if width == 0 {
            return Err(SensingError::ZeroSegmentWidth);
        }
        if stride == 0 {
            return Err(SensingError::ZeroStride);
        }
        if width > samples.len() {
            return Err(SensingError::WindowTooShort {
                window_len: samples.len(),
                required: width,
            });
        }

        let count = (samples.len() - width) / stride + 1;

        Ok(Self {
            samples,
            width,
            stride,
            count,
        })
    }

    /// Number of segments that fit the window, always at least 1
    pub fn len(&self) -> usize {
        self.count
    }

    /// Segment width in samples
    pub fn width(&self) -> usize {
        self.width
    }

    /// Stride between successive segments
    pub fn stride(&self) -> usize {
        self.stride
    }

    /// Borrow segment `index`
    ///
    /// # Panics
    /// Panics if `index >= len()`.
    pub fn segment(&self, index: usize) -> &'a [f64] {
        assert!(index < self.count, "segment index out of range");
        let start = index * self.stride;
        &self.samples[start..start + self.width]
    }

    /// Iterate over all segments in order
    pub fn iter(&self) -> impl Iterator<Item = &'a [f64]> + '_ {
        (0..self.count).map(move |i| self.segment(i))
    }
}
