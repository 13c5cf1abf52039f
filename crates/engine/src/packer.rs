//! Single-container packing.

use crate::boundary::Container;
use crate::extreme_point::{AnchorPolicy, ExtremePointSet, PlacedBox};
use crate::geometry::Item;
use crate::stability::StabilityEvaluator;
use std::collections::HashSet;
use stowage_core::geometry::{Boundary, Geometry};
use stowage_core::result::ContainerReport;
use stowage_core::solver::{PackingConfig, Solver};
use stowage_core::{Error, Placement, Result, EPSILON};

/// Outcome of packing one container.
#[derive(Debug, Clone, Default)]
pub struct ContainerPacking {
    /// Name of the packed container.
    pub container_id: String,
    /// Placements in placement order.
    pub placements: Vec<Placement>,
    /// Items that did not fit, in input order.
    pub rejected: Vec<Item>,
}

impl ContainerPacking {
    /// Returns the number of placed items.
    pub fn placed_count(&self) -> usize {
        self.placements.len()
    }

    /// Returns the number of rejected items.
    pub fn rejected_count(&self) -> usize {
        self.rejected.len()
    }

    /// Returns true if nothing was placed.
    pub fn is_empty(&self) -> bool {
        self.placements.is_empty()
    }

    /// Returns the total placed volume.
    pub fn placed_volume(&self) -> f64 {
        self.placements.iter().map(Placement::volume).fold(0.0, |a, v| a + v)
    }

    /// Returns the total placed weight.
    pub fn placed_weight(&self) -> f64 {
        self.placements.iter().map(|p| p.weight).fold(0.0, |a, w| a + w)
    }

    /// Returns true if an item with this id was placed.
    pub fn contains(&self, item_id: &str) -> bool {
        self.placements.iter().any(|p| p.item_id == item_id)
    }

    /// Builds the caller-facing report for `container`.
    pub fn report(&self, container: &Container) -> ContainerReport {
        ContainerReport::from_placements(
            container.id(),
            (*container.dimensions()).into(),
            &self.placements,
        )
    }
}

/// Extreme point packer for a single container.
#[derive(Debug, Clone, Default)]
pub struct ContainerPacker {
    config: PackingConfig,
}

impl ContainerPacker {
    /// Creates a new packer with the given configuration.
    pub fn new(config: PackingConfig) -> Self {
        Self { config }
    }

    /// Creates a packer with default configuration.
    pub fn default_config() -> Self {
        Self::new(PackingConfig::default())
    }

    /// Returns the configuration.
    pub fn config(&self) -> &PackingConfig {
        &self.config
    }

    /// Packs `items` into `container`.
    ///
    /// Every item is either placed or returned as rejected. Invalid input
    /// fails before anything is placed.
    pub fn pack(&self, container: &Container, items: &[Item]) -> Result<ContainerPacking> {
        self.config.validate()?;
        container.validate()?;

        let mut seen = HashSet::with_capacity(items.len());
        for item in items {
            item.validate()?;
            if !seen.insert(item.id().as_str()) {
                return Err(Error::InvalidInput(format!(
                    "Duplicate item name '{}'",
                    item.id()
                )));
            }
        }

        let precision = self.config.precision();
        let bin = container.rounded(precision);
        let mut order = items
            .iter()
            .map(|item| item.rounded(precision))
            .collect::<Result<Vec<_>>>()?
            .into_iter()
            .enumerate()
            .collect::<Vec<_>>();

        if self.config.bigger_first {
            // sort_by is stable: equal volumes keep input order
            order.sort_by(|(_, a), (_, b)| b.measure().total_cmp(&a.measure()));
        }

        let stability = self
            .config
            .check_stable
            .then(|| StabilityEvaluator::new(self.config.support_surface_ratio));
        let mut eps = ExtremePointSet::new(
            &bin,
            AnchorPolicy::from_fix_point(self.config.fix_point),
            precision,
        );

        let mut placements = Vec::new();
        let mut rejected_idx = Vec::new();

        for (idx, item) in &order {
            if eps.total_weight() + item.weight() > bin.max_weight() + EPSILON {
                log::debug!(
                    "{}: '{}' exceeds remaining weight capacity",
                    bin.id(),
                    item.id()
                );
                rejected_idx.push(*idx);
                continue;
            }

            match eps.try_place(item, stability.as_ref()) {
                Some((position, orientation)) => {
                    let dims = item.dimensions_for_orientation(orientation);
                    log::debug!(
                        "{}: placed '{}' at ({}, {}, {}) as {}x{}x{}",
                        bin.id(),
                        item.id(),
                        position.x,
                        position.y,
                        position.z,
                        dims.x,
                        dims.y,
                        dims.z
                    );
                    placements.push(
                        Placement::new(item.id().clone(), bin.id(), position, dims)
                            .with_orientation_index(orientation)
                            .with_weight(item.weight()),
                    );
                }
                None => rejected_idx.push(*idx),
            }
        }

        self.verify(&bin, eps.placed_boxes())?;

        rejected_idx.sort_unstable();
        log::debug!(
            "{}: {} placed, {} rejected",
            bin.id(),
            placements.len(),
            rejected_idx.len()
        );

        Ok(ContainerPacking {
            container_id: bin.id().to_string(),
            placements,
            rejected: rejected_idx.into_iter().map(|i| items[i].clone()).collect(),
        })
    }

    /// Re-checks a finished packing against bounds, overlap, weight and
    /// (when enabled) stability.
    fn verify(&self, container: &Container, placed: &[PlacedBox]) -> Result<()> {
        for (i, b) in placed.iter().enumerate() {
            if !container.fits(&b.region) {
                return Err(Error::Internal(format!(
                    "'{}' lies outside container '{}'",
                    b.id,
                    container.id()
                )));
            }

            if let Some(other) = placed[i + 1..].iter().find(|o| o.overlaps(b)) {
                return Err(Error::Internal(format!(
                    "'{}' overlaps '{}' in container '{}'",
                    b.id,
                    other.id,
                    container.id()
                )));
            }
        }

        let weight: f64 = placed.iter().map(|b| b.weight).sum();
        if weight > container.max_weight() + EPSILON {
            return Err(Error::Internal(format!(
                "Container '{}' carries {} over a capacity of {}",
                container.id(),
                weight,
                container.max_weight()
            )));
        }

        if self.config.check_stable {
            let report = StabilityEvaluator::new(self.config.support_surface_ratio)
                .analyze(placed, container.floor());
            if let Some(unstable) = report.unstable_boxes().first() {
                return Err(Error::Internal(format!(
                    "'{}' is unsupported or overloaded in container '{}'",
                    unstable.id,
                    container.id()
                )));
            }
        }

        Ok(())
    }
}

impl Solver for ContainerPacker {
    type Geometry = Item;
    type Boundary = Container;
    type Output = ContainerPacking;

    fn solve(
        &self,
        geometries: &[Self::Geometry],
        boundary: &Self::Boundary,
    ) -> Result<Self::Output> {
        self.pack(boundary, geometries)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::geometry::OrientationConstraint;
    use approx::assert_relative_eq;

    fn cubes(prefix: &str, count: usize, side: f64) -> Vec<Item> {
        (1..=count)
            .map(|i| Item::new(format!("{}-{}", prefix, i), side, side, side))
            .collect()
    }

    #[test]
    fn test_simple_packing() {
        let container = Container::new("C1", 10.0, 10.0, 10.0);
        let packer = ContainerPacker::default_config();

        let result = packer.pack(&container, &cubes("cube", 20, 2.0)).unwrap();

        assert_eq!(result.placed_count(), 20);
        assert!(result.rejected.is_empty());
        assert_relative_eq!(result.report(&container).utilization, 16.0);
    }

    #[test]
    fn test_too_large_rejected() {
        let container = Container::new("C1", 5.0, 5.0, 5.0);
        let items = vec![Item::new("long", 6.0, 1.0, 1.0)];

        let result = ContainerPacker::default_config()
            .pack(&container, &items)
            .unwrap();

        assert!(result.is_empty());
        assert_eq!(result.rejected[0].id(), "long");
        assert_relative_eq!(result.report(&container).utilization, 0.0);
    }

    #[test]
    fn test_weight_constraint() {
        let container = Container::new("C1", 100.0, 50.0, 80.0).with_max_weight(350.0);
        let items: Vec<Item> = cubes("B", 10, 20.0)
            .into_iter()
            .map(|i| i.with_weight(100.0))
            .collect();

        let result = ContainerPacker::default_config()
            .pack(&container, &items)
            .unwrap();

        assert_eq!(result.placed_count(), 3);
        assert_eq!(result.rejected_count(), 7);
        assert!(result.placed_weight() <= 350.0);
    }

    #[test]
    fn test_placement_within_corner() {
        let container = Container::new("C1", 50.0, 50.0, 50.0).with_corner(5.0);
        let result = ContainerPacker::default_config()
            .pack(&container, &cubes("B", 4, 10.0))
            .unwrap();

        assert_eq!(result.placed_count(), 4);
        for p in &result.placements {
            assert!(p.position.iter().all(|&c| c >= 5.0));
            assert!(p.region().max.iter().all(|&c| c <= 45.0));
        }
    }

    #[test]
    fn test_bigger_first_order() {
        let container = Container::new("C1", 10.0, 10.0, 10.0);
        let items = vec![
            Item::new("small", 1.0, 1.0, 1.0),
            Item::new("big", 5.0, 5.0, 5.0),
        ];

        let sorted = ContainerPacker::default_config()
            .pack(&container, &items)
            .unwrap();
        assert_eq!(sorted.placements[0].item_id, "big");

        let unsorted = ContainerPacker::new(PackingConfig::new().with_bigger_first(false))
            .pack(&container, &items)
            .unwrap();
        assert_eq!(unsorted.placements[0].item_id, "small");
    }

    #[test]
    fn test_rejected_in_input_order() {
        let container = Container::new("C1", 2.0, 2.0, 2.0);
        let items = vec![
            Item::new("a", 3.0, 3.0, 3.0),
            Item::new("fits", 2.0, 2.0, 2.0),
            Item::new("b", 1.0, 1.0, 1.0),
            Item::new("c", 4.0, 4.0, 4.0),
        ];

        let result = ContainerPacker::default_config()
            .pack(&container, &items)
            .unwrap();
        let rejected: Vec<&str> = result.rejected.iter().map(|i| i.id().as_str()).collect();
        assert_eq!(rejected, vec!["a", "b", "c"]);
    }

    #[test]
    fn test_fixed_orientation_respected() {
        let container = Container::new("C1", 2.0, 6.0, 2.0);
        let items =
            vec![Item::new("lying", 6.0, 2.0, 2.0).with_orientation(OrientationConstraint::Fixed)];

        let result = ContainerPacker::default_config()
            .pack(&container, &items)
            .unwrap();
        assert!(result.is_empty());
    }

    #[test]
    fn test_corner_pivot_policy() {
        let container = Container::new("C1", 10.0, 10.0, 10.0);
        let packer = ContainerPacker::new(PackingConfig::new().with_fix_point(false));

        let result = packer.pack(&container, &cubes("cube", 8, 5.0)).unwrap();
        assert_eq!(result.placed_count(), 8);
        assert_relative_eq!(result.placed_volume(), 1000.0);
    }

    #[test]
    fn test_zero_volume_container() {
        let container = Container::new("flat", 10.0, 0.0, 10.0);
        let result = ContainerPacker::default_config()
            .pack(&container, &cubes("cube", 2, 1.0))
            .unwrap();

        assert!(result.is_empty());
        assert_eq!(result.rejected_count(), 2);
        assert_relative_eq!(result.report(&container).utilization, 0.0);
    }

    #[test]
    fn test_duplicate_ids_rejected() {
        let container = Container::new("C1", 10.0, 10.0, 10.0);
        let items = vec![Item::new("x", 1.0, 1.0, 1.0), Item::new("x", 2.0, 2.0, 2.0)];

        let err = ContainerPacker::default_config()
            .pack(&container, &items)
            .unwrap_err();
        assert!(err.is_input_error());
    }

    #[test]
    fn test_invalid_config() {
        let packer = ContainerPacker::new(PackingConfig::new().with_support_surface_ratio(0.0));
        let result = packer.pack(&Container::new("C1", 1.0, 1.0, 1.0), &[]);
        assert!(matches!(result, Err(Error::ConfigError(_))));
    }

    #[test]
    fn test_solver_trait() {
        let container = Container::new("C1", 4.0, 4.0, 4.0);
        let packer = ContainerPacker::default_config();
        let out = packer.solve(&cubes("c", 8, 2.0), &container).unwrap();
        assert_eq!(out.container_id, "C1");
        assert!(out.contains("c-8"));
    }
}
