//! Decimal rounding applied uniformly to one packing run.

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Absolute tolerance used by every geometric comparison.
pub const EPSILON: f64 = 1e-9;

/// Number of decimal places coordinates and dimensions are rounded to.
///
/// Rounding happens once when items and containers enter a run and again
/// after every coordinate sum, so comparisons never see accumulated
/// floating-point drift.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Precision {
    decimals: u32,
}

impl Precision {
    /// Largest supported number of decimals.
    pub const MAX_DECIMALS: u32 = 12;

    /// Creates a precision of `decimals` places (clamped to [`Self::MAX_DECIMALS`]).
    pub fn new(decimals: u32) -> Self {
        Self {
            decimals: decimals.min(Self::MAX_DECIMALS),
        }
    }

    /// Returns the number of decimal places.
    pub fn decimals(&self) -> u32 {
        self.decimals
    }

    /// Rounds a value half away from zero.
    pub fn round(&self, value: f64) -> f64 {
        let factor = 10f64.powi(self.decimals as i32);
        (value * factor).round() / factor
    }

    /// Rounds each component of a triple.
    pub fn round3(&self, values: [f64; 3]) -> [f64; 3] {
        [
            self.round(values[0]),
            self.round(values[1]),
            self.round(values[2]),
        ]
    }
}
