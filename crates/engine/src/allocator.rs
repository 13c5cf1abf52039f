//! Sequential multi-container allocation.
//!
//! Containers are filled one at a time in caller order. Each container gets a
//! fresh [`ContainerPacker`] and is offered the items still left over from the
//! containers before it. Nothing is moved once placed, so container order
//! changes the outcome.

use crate::boundary::Container;
use crate::geometry::{GroupKey, Item};
use crate::packer::{ContainerPacker, ContainerPacking};
use std::collections::{HashMap, HashSet};
use stowage_core::geometry::{Boundary, Geometry};
use stowage_core::result::{ContainerFailure, PackingResult, UnfittedItem};
use stowage_core::solver::{PackingConfig, Solver};
use stowage_core::{Error, Result};

/// Packs items across a list of containers, one container at a time.
#[derive(Debug, Clone, Default)]
pub struct SequentialAllocator {
    config: PackingConfig,
}

impl SequentialAllocator {
    /// Creates a new allocator with the given configuration.
    pub fn new(config: PackingConfig) -> Self {
        Self { config }
    }

    /// Creates an allocator with default configuration.
    pub fn default_config() -> Self {
        Self::new(PackingConfig::default())
    }

    /// Returns the configuration.
    pub fn config(&self) -> &PackingConfig {
        &self.config
    }

    /// Allocates `items` to `containers`.
    ///
    /// Invalid input fails before any container is touched. A container
    /// whose packing fails is logged, recorded in
    /// [`PackingResult::failed_containers`] and skipped; its items stay
    /// available to later containers.
    pub fn allocate(&self, containers: &[Container], items: Vec<Item>) -> Result<PackingResult> {
        let packer = ContainerPacker::new(self.config.clone());
        self.allocate_with(&packer, containers, items)
    }

    /// Allocates with a caller-supplied single-container solver.
    pub fn allocate_with<S>(
        &self,
        solver: &S,
        containers: &[Container],
        items: Vec<Item>,
    ) -> Result<PackingResult>
    where
        S: Solver<Geometry = Item, Boundary = Container, Output = ContainerPacking>,
    {
        self.validate(containers, &items)?;

        let mut remaining = items;
        let mut bins = Vec::new();
        let mut failures = Vec::new();

        for (k, container) in containers.iter().enumerate() {
            if remaining.is_empty() {
                break;
            }

            let offered = if self.config.distribute_items {
                distribution_quota(&remaining, containers.len() - k)
            } else {
                remaining.clone()
            };

            let packing = match solver.solve(&offered, container) {
                Ok(packing) => packing,
                Err(e) => {
                    log::warn!("Skipping container '{}': {}", container.id(), e);
                    failures.push(ContainerFailure {
                        bin_name: container.id().to_string(),
                        reason: e.to_string(),
                    });
                    continue;
                }
            };

            if packing.is_empty() {
                log::debug!("{}: nothing fits, container dropped", container.id());
                continue;
            }

            let placed: HashSet<&str> = packing
                .placements
                .iter()
                .map(|p| p.item_id.as_str())
                .collect();
            remaining.retain(|item| !placed.contains(item.id().as_str()));

            bins.push(packing.report(container));
        }

        let unfitted = remaining.iter().map(unfitted_item).collect();
        Ok(PackingResult::new(bins, unfitted, failures))
    }

    fn validate(&self, containers: &[Container], items: &[Item]) -> Result<()> {
        self.config.validate()?;
        let precision = self.config.precision();

        let mut names = HashSet::with_capacity(containers.len());
        for container in containers {
            container.validate()?;
            if !names.insert(container.id()) {
                return Err(Error::InvalidInput(format!(
                    "Duplicate container name '{}'",
                    container.id()
                )));
            }
        }

        let mut ids = HashSet::with_capacity(items.len());
        for item in items {
            item.validate()?;
            item.rounded(precision)?;
            if !ids.insert(item.id().as_str()) {
                return Err(Error::InvalidInput(format!(
                    "Duplicate item name '{}'",
                    item.id()
                )));
            }
        }

        Ok(())
    }
}

/// Allocates `items` to `containers` in order with the given configuration.
pub fn allocate(
    containers: &[Container],
    items: Vec<Item>,
    config: &PackingConfig,
) -> Result<PackingResult> {
    SequentialAllocator::new(config.clone()).allocate(containers, items)
}

/// Selects the share of `remaining` offered to the next container when
/// `containers_left` containers (including it) remain.
///
/// Each group of identical items with `r` units left contributes its first
/// `ceil(r / containers_left)` units. Relative order is kept.
pub fn distribution_quota(remaining: &[Item], containers_left: usize) -> Vec<Item> {
    let containers_left = containers_left.max(1);

    let mut group_sizes: HashMap<GroupKey, usize> = HashMap::new();
    for item in remaining {
        *group_sizes.entry(item.group_key()).or_default() += 1;
    }

    let mut taken: HashMap<GroupKey, usize> = HashMap::new();
    remaining
        .iter()
        .filter(|item| {
            let key = item.group_key();
            let quota = group_sizes[&key].div_ceil(containers_left);
            let count = taken.entry(key).or_default();
            if *count < quota {
                *count += 1;
                true
            } else {
                false
            }
        })
        .cloned()
        .collect()
}

fn unfitted_item(item: &Item) -> UnfittedItem {
    UnfittedItem {
        name: item.id().clone(),
        dimensions: (*item.dimensions()).into(),
        volume: item.measure(),
        weight: item.weight(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    fn cubes(prefix: &str, count: usize, side: f64) -> Vec<Item> {
        (1..=count)
            .map(|i| Item::new(format!("{}-{}", prefix, i), side, side, side))
            .collect()
    }

    #[test]
    fn test_single_container() {
        let containers = vec![Container::new("C1", 10.0, 10.0, 10.0)];
        let result = allocate(&containers, cubes("cube", 20, 2.0), &PackingConfig::default())
            .unwrap();

        assert_eq!(result.bins.len(), 1);
        assert!(result.all_placed());
        assert_relative_eq!(result.bins[0].utilization, 16.0);
        assert_relative_eq!(result.summary.overall_utilization, 16.0);
    }

    #[test]
    fn test_overflow_to_next_container() {
        let containers = vec![
            Container::new("A", 4.0, 4.0, 4.0),
            Container::new("B", 10.0, 10.0, 10.0),
        ];
        let result = SequentialAllocator::default_config()
            .allocate(&containers, cubes("cube", 15, 2.0))
            .unwrap();

        assert_eq!(result.bins.len(), 2);
        assert_eq!(result.bins[0].item_count(), 8);
        assert_eq!(result.bins[1].item_count(), 7);
        assert_eq!(result.summary.total_packed_items, 15);
    }

    #[test]
    fn test_empty_containers_dropped() {
        let containers = vec![
            Container::new("big", 10.0, 10.0, 10.0),
            Container::new("unused", 4.0, 4.0, 4.0),
        ];
        let result = SequentialAllocator::default_config()
            .allocate(&containers, cubes("cube", 15, 2.0))
            .unwrap();

        assert_eq!(result.bins.len(), 1);
        assert_eq!(result.bins[0].bin_name, "big");
        assert!(result.bin("unused").is_none());
    }

    #[test]
    fn test_unfitted_reported() {
        let containers = vec![Container::new("C1", 5.0, 5.0, 5.0)];
        let items = vec![Item::new("long", 6.0, 1.0, 1.0)];
        let result = SequentialAllocator::default_config()
            .allocate(&containers, items)
            .unwrap();

        assert!(result.bins.is_empty());
        assert_eq!(result.unfitted_items.len(), 1);
        assert_eq!(result.unfitted_items[0].name, "long");
        assert_eq!(result.unfitted_items[0].dimensions, [6.0, 1.0, 1.0]);
        assert_relative_eq!(result.summary.overall_utilization, 0.0);
    }

    #[test]
    fn test_no_containers() {
        let result = SequentialAllocator::default_config()
            .allocate(&[], cubes("cube", 3, 1.0))
            .unwrap();
        assert_eq!(result.unfitted_count(), 3);
        assert_eq!(result.summary.total_items, 3);
    }

    #[test]
    fn test_invalid_input_fails_up_front() {
        let containers = vec![Container::new("C1", 10.0, 10.0, 10.0)];
        let items = vec![Item::new("bad", 0.0, 1.0, 1.0)];
        let err = SequentialAllocator::default_config()
            .allocate(&containers, items)
            .unwrap_err();
        assert!(err.is_input_error());
    }

    #[test]
    fn test_duplicate_container_names() {
        let containers = vec![
            Container::new("C1", 10.0, 10.0, 10.0),
            Container::new("C1", 5.0, 5.0, 5.0),
        ];
        assert!(SequentialAllocator::default_config()
            .allocate(&containers, cubes("cube", 1, 1.0))
            .is_err());
    }

    /// Delegates to a real packer but fails on one container.
    struct FailOn {
        inner: ContainerPacker,
        container: &'static str,
    }

    impl Solver for FailOn {
        type Geometry = Item;
        type Boundary = Container;
        type Output = ContainerPacking;

        fn solve(&self, geometries: &[Item], boundary: &Container) -> Result<ContainerPacking> {
            if boundary.id() == self.container {
                return Err(Error::Internal(format!(
                    "'{}' failed verification",
                    boundary.id()
                )));
            }
            self.inner.solve(geometries, boundary)
        }
    }

    #[test]
    fn test_failed_container_skipped() {
        let containers = vec![
            Container::new("A", 10.0, 10.0, 10.0),
            Container::new("B", 4.0, 4.0, 4.0),
            Container::new("C", 4.0, 4.0, 4.0),
        ];
        let solver = FailOn {
            inner: ContainerPacker::default_config(),
            container: "A",
        };
        let result = SequentialAllocator::default_config()
            .allocate_with(&solver, &containers, cubes("cube", 10, 2.0))
            .unwrap();

        assert_eq!(result.failed_containers.len(), 1);
        assert_eq!(result.failed_containers[0].bin_name, "A");
        assert!(result.failed_containers[0].reason.contains("failed verification"));
        assert!(result.bin("A").is_none());

        // Items offered to A stay available to B and C.
        assert_eq!(result.bin("B").unwrap().item_count(), 8);
        assert_eq!(result.bin("C").unwrap().item_count(), 2);
        assert_eq!(result.summary.total_packed_items, 10);
        assert!(result.all_placed());
    }

    #[test]
    fn test_failed_last_container_leaves_items_unfitted() {
        let containers = vec![
            Container::new("B", 4.0, 4.0, 4.0),
            Container::new("A", 10.0, 10.0, 10.0),
        ];
        let solver = FailOn {
            inner: ContainerPacker::default_config(),
            container: "A",
        };
        let result = SequentialAllocator::default_config()
            .allocate_with(&solver, &containers, cubes("cube", 10, 2.0))
            .unwrap();

        assert_eq!(result.failed_containers[0].bin_name, "A");
        assert_eq!(result.summary.total_packed_items, 8);
        let unfitted: Vec<&str> = result.unfitted_items.iter().map(|u| u.name.as_str()).collect();
        assert_eq!(unfitted, vec!["cube-9", "cube-10"]);
        assert_eq!(result.summary.total_items, 10);
    }

    #[test]
    fn test_distribution_quota() {
        let mut items = cubes("a", 5, 1.0);
        items.extend(cubes("b", 2, 2.0));

        let offered = distribution_quota(&items, 2);
        let names: Vec<&str> = offered.iter().map(|i| i.id().as_str()).collect();
        assert_eq!(names, vec!["a-1", "a-2", "a-3", "b-1"]);

        assert_eq!(distribution_quota(&items, 1).len(), 7);
    }

    #[test]
    fn test_distribute_items_spreads_groups() {
        let containers = vec![
            Container::new("C1", 10.0, 10.0, 10.0),
            Container::new("C2", 10.0, 10.0, 10.0),
        ];
        let config = PackingConfig::new().with_distribute_items(true);
        let result = allocate(&containers, cubes("cube", 10, 2.0), &config).unwrap();

        assert_eq!(result.bins.len(), 2);
        assert_eq!(result.bins[0].item_count(), 5);
        assert_eq!(result.bins[1].item_count(), 5);
    }
}
