//! Stability analysis for placed items.
//!
//! An item resting on the container floor is always supported. A raised item
//! is supported when the top faces of items directly beneath it cover at
//! least a configured fraction of its base. On top of that, every item
//! beneath it, directly or through other items, must be able to carry the
//! added weight.
//!
//! Load does not split between supporters: the full weight of an item counts
//! against every item holding it up. Load flows only to supporters that were
//! placed before the item.

use crate::extreme_point::PlacedBox;
use crate::geometry::Item;
use nalgebra::Vector3;
use stowage_core::geometry::{Geometry, ItemId};
use stowage_core::{Aabb3, EPSILON};

/// Finds the placed boxes whose top face touches the bottom of `region`.
///
/// Returns the total supported area and the indices of the supporters.
pub fn direct_supporters(region: &Aabb3, placed: &[PlacedBox]) -> (f64, Vec<usize>) {
    let bottom = region.bottom();
    let mut area = 0.0;
    let mut supporters = Vec::new();

    for (idx, support) in placed.iter().enumerate() {
        if (support.region.top() - bottom).abs() > EPSILON {
            continue;
        }

        let overlap = region.footprint_overlap(&support.region);
        if overlap > EPSILON {
            area += overlap;
            supporters.push(idx);
        }
    }

    (area, supporters)
}

/// Expands direct supporters to everything beneath them. Sorted, no duplicates.
pub fn transitive_supporters(placed: &[PlacedBox], direct: &[usize]) -> Vec<usize> {
    let mut visited = vec![false; placed.len()];
    let mut stack: Vec<usize> = direct.to_vec();
    let mut result = Vec::new();

    while let Some(idx) = stack.pop() {
        if idx >= placed.len() || visited[idx] {
            continue;
        }
        visited[idx] = true;
        result.push(idx);
        stack.extend(placed[idx].supported_by.iter().copied());
    }

    result.sort_unstable();
    result
}

/// Checks candidate placements against support and load-bearing limits.
#[derive(Debug, Clone, Copy)]
pub struct StabilityEvaluator {
    support_ratio: f64,
}

impl StabilityEvaluator {
    /// Creates an evaluator requiring `support_ratio` (clamped to 0.0-1.0) of
    /// a raised item's base to be supported.
    pub fn new(support_ratio: f64) -> Self {
        Self {
            support_ratio: support_ratio.clamp(0.0, 1.0),
        }
    }

    /// Returns the minimum support ratio.
    pub fn support_ratio(&self) -> f64 {
        self.support_ratio
    }

    /// Checks whether `item` would be stable at `position` in `orientation`.
    pub fn is_stable(
        &self,
        item: &Item,
        position: Vector3<f64>,
        orientation: usize,
        placed: &[PlacedBox],
        floor: f64,
    ) -> bool {
        let region = item.occupied_region(position, orientation);
        self.is_region_stable(&region, item.weight(), placed, floor)
    }

    /// Checks whether a region carrying `weight` would be stable.
    pub fn is_region_stable(
        &self,
        region: &Aabb3,
        weight: f64,
        placed: &[PlacedBox],
        floor: f64,
    ) -> bool {
        if (region.bottom() - floor).abs() <= EPSILON {
            return true;
        }

        let (area, direct) = direct_supporters(region, placed);
        let base = region.base_area();
        if base <= 0.0 || area / base < self.support_ratio - EPSILON {
            return false;
        }

        transitive_supporters(placed, &direct)
            .into_iter()
            .all(|idx| placed[idx].load + weight <= placed[idx].load_bear + EPSILON)
    }

    /// Re-derives support and load for a finished packing.
    ///
    /// Nothing stored on the boxes beyond region, weight and limit is
    /// trusted; supporters and loads are recomputed in placement order.
    pub fn analyze(&self, placed: &[PlacedBox], floor: f64) -> StabilityReport {
        let mut report = StabilityReport::default();
        let mut rebuilt: Vec<PlacedBox> = Vec::with_capacity(placed.len());

        for b in placed {
            let mut result = StabilityResult::new(&b.id);

            let on_floor = (b.region.bottom() - floor).abs() <= EPSILON;
            let (area, direct) = direct_supporters(&b.region, &rebuilt);
            if !on_floor {
                result.support_ratio = (area / b.region.base_area()).min(1.0);
                result.supported_by = direct.iter().map(|&i| rebuilt[i].id.clone()).collect();
                result.is_stable = result.support_ratio >= self.support_ratio - EPSILON;
            }

            for idx in transitive_supporters(&rebuilt, &direct) {
                rebuilt[idx].load += b.weight;
            }

            let mut copy = b.clone();
            copy.load = 0.0;
            copy.supported_by = if on_floor { Vec::new() } else { direct };
            rebuilt.push(copy);
            report.results.push(result);
        }

        for (result, b) in report.results.iter_mut().zip(&rebuilt) {
            result.load = b.load;
            if b.load > b.load_bear + EPSILON {
                result.overloaded = true;
                result.is_stable = false;
            }
        }

        report.summarize();
        report
    }
}

impl Default for StabilityEvaluator {
    fn default() -> Self {
        Self::new(0.75)
    }
}

/// Result of stability analysis for a single box.
#[derive(Debug, Clone)]
pub struct StabilityResult {
    /// Item identifier.
    pub id: ItemId,
    /// Whether the box is supported and not overloaded.
    pub is_stable: bool,
    /// Supported fraction of the base (1.0 on the floor).
    pub support_ratio: f64,
    /// Items directly beneath.
    pub supported_by: Vec<ItemId>,
    /// Weight resting on this box.
    pub load: f64,
    /// Whether `load` exceeds the box's load-bearing limit.
    pub overloaded: bool,
}

impl StabilityResult {
    fn new(id: &str) -> Self {
        Self {
            id: id.to_string(),
            is_stable: true,
            support_ratio: 1.0,
            supported_by: Vec::new(),
            load: 0.0,
            overloaded: false,
        }
    }
}

/// Stability report for a whole container.
#[derive(Debug, Clone, Default)]
pub struct StabilityReport {
    /// Individual results in placement order.
    pub results: Vec<StabilityResult>,
    /// Number of stable boxes.
    pub stable_count: usize,
    /// Number of unstable boxes.
    pub unstable_count: usize,
    /// Minimum support ratio among all boxes.
    pub min_support_ratio: f64,
}

impl StabilityReport {
    /// Returns true if all boxes are stable.
    pub fn is_all_stable(&self) -> bool {
        self.unstable_count == 0
    }

    /// Returns the unstable boxes.
    pub fn unstable_boxes(&self) -> Vec<&StabilityResult> {
        self.results.iter().filter(|r| !r.is_stable).collect()
    }

    fn summarize(&mut self) {
        self.stable_count = self.results.iter().filter(|r| r.is_stable).count();
        self.unstable_count = self.results.len() - self.stable_count;
        self.min_support_ratio = self
            .results
            .iter()
            .map(|r| r.support_ratio)
            .fold(1.0, f64::min);
    }
}
