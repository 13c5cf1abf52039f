//! Packing configuration and the solver trait.

use crate::geometry::{Boundary, Geometry};
use crate::precision::Precision;
use crate::{Error, Result};

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Options recognized by one packing run.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct PackingConfig {
    /// Try larger items first (stable sort by descending volume).
    pub bigger_first: bool,

    /// Spread groups of identical items across containers instead of
    /// filling each container before moving on.
    pub distribute_items: bool,

    /// Use floor-up extreme points with downward projection. When disabled,
    /// items are anchored at the corner pivots of earlier items in
    /// placement order.
    pub fix_point: bool,

    /// Enforce support and load-bearing limits.
    pub check_stable: bool,

    /// Minimum supported fraction of a raised item's base (0.0 exclusive - 1.0).
    pub support_surface_ratio: f64,

    /// Decimal places coordinates and dimensions are rounded to.
    pub decimal_precision: u32,
}

impl Default for PackingConfig {
    fn default() -> Self {
        Self {
            bigger_first: true,
            distribute_items: false,
            fix_point: true,
            check_stable: true,
            support_surface_ratio: 0.75,
            decimal_precision: 0,
        }
    }
}

impl PackingConfig {
    /// Creates a new configuration with default values.
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets bigger-first ordering.
    pub fn with_bigger_first(mut self, enabled: bool) -> Self {
        self.bigger_first = enabled;
        self
    }

    /// Sets distribute mode.
    pub fn with_distribute_items(mut self, enabled: bool) -> Self {
        self.distribute_items = enabled;
        self
    }

    /// Sets the anchor policy.
    pub fn with_fix_point(mut self, enabled: bool) -> Self {
        self.fix_point = enabled;
        self
    }

    /// Enables or disables stability checking.
    pub fn with_check_stable(mut self, enabled: bool) -> Self {
        self.check_stable = enabled;
        self
    }

    /// Sets the minimum support ratio.
    pub fn with_support_surface_ratio(mut self, ratio: f64) -> Self {
        self.support_surface_ratio = ratio;
        self
    }

    /// Sets the rounding precision.
    pub fn with_decimal_precision(mut self, decimals: u32) -> Self {
        self.decimal_precision = decimals;
        self
    }

    /// Returns the rounding precision for this run.
    pub fn precision(&self) -> Precision {
        Precision::new(self.decimal_precision)
    }

    /// Validates the configuration.
    pub fn validate(&self) -> Result<()> {
        let ratio = self.support_surface_ratio;
        if !ratio.is_finite() || ratio <= 0.0 || ratio > 1.0 {
            return Err(Error::ConfigError(format!(
                "support_surface_ratio must be in (0, 1], got {}",
                ratio
            )));
        }

        if self.decimal_precision > Precision::MAX_DECIMALS {
            return Err(Error::ConfigError(format!(
                "decimal_precision must be at most {}, got {}",
                Precision::MAX_DECIMALS,
                self.decimal_precision
            )));
        }

        Ok(())
    }
}

/// Trait for single-container packers.
pub trait Solver {
    /// The geometry type this solver handles.
    type Geometry: Geometry;
    /// The boundary type this solver handles.
    type Boundary: Boundary;
    /// What one solve produces.
    type Output;

    /// Packs `geometries` into `boundary`.
    fn solve(
        &self,
        geometries: &[Self::Geometry],
        boundary: &Self::Boundary,
    ) -> Result<Self::Output>;
}
