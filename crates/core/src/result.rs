//! Result aggregation: per-container reports, unfitted items and run summary.

use crate::placement::Placement;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Utilization in percent, rounded to two decimals. Zero when `total` is not positive.
pub fn utilization_percent(used: f64, total: f64) -> f64 {
    if total > 0.0 {
        (used / total * 100.0 * 100.0).round() / 100.0
    } else {
        0.0
    }
}

/// One placed item as reported to callers.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct PlacedItemReport {
    /// Item name.
    pub name: String,
    /// Minimum corner `[x, y, z]`.
    pub position: [f64; 3],
    /// Dimensions in the placed orientation.
    pub dimensions: [f64; 3],
    /// Volume in the placed orientation.
    pub volume: f64,
    /// Weight.
    pub weight: f64,
}

impl From<&Placement> for PlacedItemReport {
    fn from(p: &Placement) -> Self {
        Self {
            name: p.item_id.clone(),
            position: p.position,
            dimensions: p.dimensions,
            volume: p.volume(),
            weight: p.weight,
        }
    }
}

/// Packing outcome of a single container that received at least one item.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct ContainerReport {
    /// Container name.
    pub bin_name: String,
    /// Container dimensions `[width, height, depth]`.
    pub dimensions: [f64; 3],
    /// Container volume.
    pub total_volume: f64,
    /// Sum of placed item volumes.
    pub used_volume: f64,
    /// `used_volume / total_volume` in percent.
    pub utilization: f64,
    /// Placed items in placement order.
    pub items: Vec<PlacedItemReport>,
}

impl ContainerReport {
    /// Builds the report for one container from its placements.
    pub fn from_placements(
        bin_name: impl Into<String>,
        dimensions: [f64; 3],
        placements: &[Placement],
    ) -> Self {
        let total_volume = dimensions[0] * dimensions[1] * dimensions[2];
        let used_volume = placements.iter().map(Placement::volume).fold(0.0, |a, v| a + v);

        Self {
            bin_name: bin_name.into(),
            dimensions,
            total_volume,
            used_volume,
            utilization: utilization_percent(used_volume, total_volume),
            items: placements.iter().map(PlacedItemReport::from).collect(),
        }
    }

    /// Returns the number of placed items.
    pub fn item_count(&self) -> usize {
        self.items.len()
    }

    /// Returns the total placed weight.
    pub fn total_weight(&self) -> f64 {
        self.items.iter().map(|i| i.weight).fold(0.0, |a, w| a + w)
    }
}

/// An item that no container could take.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct UnfittedItem {
    /// Item name.
    pub name: String,
    /// Nominal dimensions `[width, height, depth]`.
    pub dimensions: [f64; 3],
    /// Nominal volume.
    pub volume: f64,
    /// Weight.
    pub weight: f64,
}

/// A container whose packing attempt failed and was skipped.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct ContainerFailure {
    /// Container name.
    pub bin_name: String,
    /// Why the attempt failed.
    pub reason: String,
}

/// Run-level totals.
#[derive(Debug, Clone, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct PackingSummary {
    /// Containers that received at least one item.
    pub total_bins_used: usize,
    /// Input items after count expansion.
    pub total_items: usize,
    /// Items placed in any container.
    pub total_packed_items: usize,
    /// Items left unfitted.
    pub total_unpacked_items: usize,
    /// Sum of used container volumes.
    pub total_volume: f64,
    /// Sum of placed item volumes.
    pub total_used_volume: f64,
    /// `total_used_volume / total_volume` in percent.
    pub overall_utilization: f64,
}

impl PackingSummary {
    /// Aggregates totals over the used containers and the unfitted list.
    pub fn aggregate(bins: &[ContainerReport], unfitted: &[UnfittedItem]) -> Self {
        let total_packed_items: usize = bins.iter().map(ContainerReport::item_count).sum();
        // Starting from 0.0 keeps an empty run at +0.0 rather than -0.0.
        let total_volume = bins.iter().map(|b| b.total_volume).fold(0.0, |a, v| a + v);
        let total_used_volume = bins.iter().map(|b| b.used_volume).fold(0.0, |a, v| a + v);

        Self {
            total_bins_used: bins.len(),
            total_items: total_packed_items + unfitted.len(),
            total_packed_items,
            total_unpacked_items: unfitted.len(),
            total_volume,
            total_used_volume,
            overall_utilization: utilization_percent(total_used_volume, total_volume),
        }
    }
}

/// Complete outcome of a multi-container run.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct PackingResult {
    /// Used containers in processing order.
    pub bins: Vec<ContainerReport>,
    /// Items no container could take, in input order.
    pub unfitted_items: Vec<UnfittedItem>,
    /// Run totals.
    pub summary: PackingSummary,
    /// Containers skipped because their packing attempt failed.
    #[cfg_attr(feature = "serde", serde(default))]
    pub failed_containers: Vec<ContainerFailure>,
}

impl PackingResult {
    /// Builds a result and computes its summary.
    pub fn new(
        bins: Vec<ContainerReport>,
        unfitted_items: Vec<UnfittedItem>,
        failed_containers: Vec<ContainerFailure>,
    ) -> Self {
        let summary = PackingSummary::aggregate(&bins, &unfitted_items);
        Self {
            bins,
            unfitted_items,
            summary,
            failed_containers,
        }
    }

    /// Returns true if every item was placed.
    pub fn all_placed(&self) -> bool {
        self.unfitted_items.is_empty()
    }

    /// Returns the number of placed items.
    pub fn placed_count(&self) -> usize {
        self.summary.total_packed_items
    }

    /// Returns the number of unfitted items.
    pub fn unfitted_count(&self) -> usize {
        self.unfitted_items.len()
    }

    /// Finds the report of a container by name.
    pub fn bin(&self, name: &str) -> Option<&ContainerReport> {
        self.bins.iter().find(|b| b.bin_name == name)
    }
}

impl Default for PackingResult {
    fn default() -> Self {
        Self::new(Vec::new(), Vec::new(), Vec::new())
    }
}
