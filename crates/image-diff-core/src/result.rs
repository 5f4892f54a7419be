use serde::{Deserialize, Serialize};

use crate::render::Classification;

/// Aggregate statistics of one comparison.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CompareResult {
    pub mismatched_pixels: u64,
    pub total_pixels: u64,
    /// `mismatched_pixels / total_pixels`; 0.0 = identical, 1.0 = every pixel differs.
    pub difference_ratio: f64,
}

impl CompareResult {
    pub fn is_match(&self) -> bool {
        self.mismatched_pixels == 0
    }
}

/// Running mismatch counter for one pass (or one band of a parallel pass).
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub(crate) struct Tally {
    mismatched: u64,
}

impl Tally {
    pub(crate) fn record(&mut self, classification: Classification, include_anti_aliasing: bool) {
        if classification.is_mismatch(include_anti_aliasing) {
            self.mismatched += 1;
        }
    }

    /// Order-independent merge of per-band tallies.
    pub(crate) fn merge(self, other: Self) -> Self {
        Self {
            mismatched: self.mismatched + other.mismatched,
        }
    }

    /// `total_pixels` is non-zero for any buffer that passed the precondition checks.
    pub(crate) fn finish(self, total_pixels: u64) -> CompareResult {
        let difference_ratio = if total_pixels > 0 {
            self.mismatched as f64 / total_pixels as f64
        } else {
            0.0
        };
        CompareResult {
            mismatched_pixels: self.mismatched,
            total_pixels,
            difference_ratio,
        }
    }
}
