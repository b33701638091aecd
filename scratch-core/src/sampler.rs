//! Strided coverage estimation.
//!
//! Only every `stride`-th pixel is inspected, so an estimate costs
//! O(N / stride). Sample positions are fixed, which makes the result exactly
//! reproducible for a given buffer and stride.

use serde::{Deserialize, Serialize};

use crate::surface::AlphaChannel;

/// Outcome of one sampling pass.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct SampleResult {
    /// Sampled pixels with zero alpha.
    pub transparent: usize,
    /// Pixels sampled.
    pub total: usize,
    /// `transparent / total`, or 0 when nothing was sampled.
    pub coverage: f64,
}

impl SampleResult {
    /// Build a result from raw counts.
    #[must_use]
    #[allow(clippy::cast_precision_loss)]
    pub fn from_counts(transparent: usize, total: usize) -> Self {
        let coverage = if total == 0 {
            0.0
        } else {
            transparent as f64 / total as f64
        };
        Self {
            transparent,
            total,
            coverage,
        }
    }
}

/// Estimate the erased fraction of a mask.
///
/// A stride of zero is treated as one. An empty channel yields zero
/// coverage.
#[must_use]
pub fn estimate(alpha: &AlphaChannel<'_>, stride: usize) -> SampleResult {
    let (transparent, total) = alpha
        .strided(stride)
        .fold((0, 0), |(clear, seen), a| (clear + usize::from(a == 0), seen + 1));
    SampleResult::from_counts(transparent, total)
}
