//! Extreme Point heuristic for 3D bin packing.
//!
//! Extreme points are positions where a new item could rest against the
//! container walls or earlier items. Placing an item at a point generates
//! new points at its far corners along each axis.
//!
//! Two anchor policies are supported:
//!
//! - [`AnchorPolicy::ExtremePoints`]: points are tried floor-up (ascending
//!   height, then depth, then width). The width and depth corners of each new
//!   item are additionally dropped onto the nearest surface below.
//! - [`AnchorPolicy::CornerPivots`]: points are tried in the order they were
//!   created, without sorting or projection.
//!
//! # References
//!
//! - Crainic, T. G., Perboli, G., & Tadei, R. (2008). Extreme point-based heuristics
//!   for three-dimensional bin packing.

use crate::boundary::Container;
use crate::geometry::{Item, DEFAULT_LOAD_BEAR, DEFAULT_WEIGHT};
use crate::stability::{direct_supporters, transitive_supporters, StabilityEvaluator};
use nalgebra::Vector3;
use std::cmp::Ordering;
use stowage_core::geometry::{Boundary, Geometry, ItemId};
use stowage_core::{Aabb3, Precision, EPSILON};

/// How candidate anchors are generated and ordered.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AnchorPolicy {
    /// Floor-up ordering with downward projection.
    ExtremePoints,
    /// Corner pivots of earlier items in placement order.
    CornerPivots,
}

impl AnchorPolicy {
    /// Maps the `fix_point` option onto a policy.
    pub fn from_fix_point(fix_point: bool) -> Self {
        if fix_point {
            Self::ExtremePoints
        } else {
            Self::CornerPivots
        }
    }
}

/// A 3D point representing a potential placement position.
#[derive(Debug, Clone, Copy)]
pub struct ExtremePoint {
    /// Position (x = width, y = height, z = depth).
    pub position: Vector3<f64>,
    /// Distance to the far interior walls along each axis.
    pub residual: Vector3<f64>,
}

impl ExtremePoint {
    /// Creates a new extreme point inside `interior`.
    pub fn new(position: Vector3<f64>, interior: &Aabb3) -> Self {
        Self {
            position,
            residual: interior.max - position,
        }
    }

    /// Checks if an item with the given dimensions could fit at this point
    /// ignoring other items.
    pub fn fits(&self, dims: &Vector3<f64>) -> bool {
        dims.x <= self.residual.x + EPSILON
            && dims.y <= self.residual.y + EPSILON
            && dims.z <= self.residual.z + EPSILON
    }

    fn floor_up(&self, other: &Self) -> Ordering {
        self.position
            .y
            .total_cmp(&other.position.y)
            .then(self.position.z.total_cmp(&other.position.z))
            .then(self.position.x.total_cmp(&other.position.x))
    }
}

impl PartialEq for ExtremePoint {
    fn eq(&self, other: &Self) -> bool {
        (self.position - other.position).norm() < EPSILON
    }
}

/// An item placed in the container.
#[derive(Debug, Clone)]
pub struct PlacedBox {
    /// Item ID.
    pub id: ItemId,
    /// Occupied region.
    pub region: Aabb3,
    /// Index into the item's allowed orientations.
    pub orientation: usize,
    /// Weight of the item.
    pub weight: f64,
    /// Maximum weight that may rest on the item.
    pub load_bear: f64,
    /// Weight currently resting on the item.
    pub load: f64,
    /// Indices of the boxes directly beneath, at the time of placement.
    pub supported_by: Vec<usize>,
}

impl PlacedBox {
    /// Creates a placed box with default weight and no load.
    pub fn new(id: impl Into<ItemId>, region: Aabb3) -> Self {
        Self {
            id: id.into(),
            region,
            orientation: 0,
            weight: DEFAULT_WEIGHT,
            load_bear: DEFAULT_LOAD_BEAR,
            load: 0.0,
            supported_by: Vec::new(),
        }
    }

    /// Creates a placed box for `item` occupying `region`.
    pub fn from_item(item: &Item, region: Aabb3, orientation: usize) -> Self {
        Self {
            orientation,
            weight: item.weight(),
            load_bear: item.load_bear(),
            ..Self::new(item.id().clone(), region)
        }
    }

    /// Returns the max corner of the box.
    pub fn max_corner(&self) -> Vector3<f64> {
        self.region.max
    }

    /// Checks if this box overlaps with another box.
    pub fn overlaps(&self, other: &PlacedBox) -> bool {
        self.region.intersects(&other.region)
    }
}

/// Extreme Point Set manager.
pub struct ExtremePointSet {
    /// Candidate points in creation order.
    points: Vec<ExtremePoint>,
    /// Usable interior of the container.
    interior: Aabb3,
    /// Placed boxes in placement order.
    placed: Vec<PlacedBox>,
    /// Sum of placed weights.
    total_weight: f64,
    policy: AnchorPolicy,
    precision: Precision,
}

impl ExtremePointSet {
    /// Creates a new extreme point set with a single point at the interior
    /// origin corner.
    pub fn new(container: &Container, policy: AnchorPolicy, precision: Precision) -> Self {
        let interior = container.interior();

        Self {
            points: vec![ExtremePoint::new(interior.min, &interior)],
            interior,
            placed: Vec::new(),
            total_weight: 0.0,
            policy,
            precision,
        }
    }

    /// Returns the number of extreme points.
    pub fn len(&self) -> usize {
        self.points.len()
    }

    /// Returns true if empty.
    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    /// Returns the number of placed boxes.
    pub fn placed_count(&self) -> usize {
        self.placed.len()
    }

    /// Returns total placed volume.
    pub fn total_volume(&self) -> f64 {
        self.placed.iter().map(|b| b.region.volume()).fold(0.0, |a, v| a + v)
    }

    /// Returns total placed weight.
    pub fn total_weight(&self) -> f64 {
        self.total_weight
    }

    /// Returns the placed boxes.
    pub fn placed_boxes(&self) -> &[PlacedBox] {
        &self.placed
    }

    /// Returns the anchor policy.
    pub fn policy(&self) -> AnchorPolicy {
        self.policy
    }

    /// Returns the points in the order they will be tried.
    pub fn candidates(&self) -> Vec<ExtremePoint> {
        let mut candidates = self.points.clone();
        if self.policy == AnchorPolicy::ExtremePoints {
            candidates.sort_by(|a, b| a.floor_up(b));
        }
        candidates
    }

    /// Tries to place an item, returns the position and orientation index
    /// if successful.
    ///
    /// Points are tried in candidate order and, for each point, the item's
    /// orientations in enumeration order. The first combination that stays
    /// inside the interior, overlaps nothing and passes `stability` (when
    /// given) is recorded.
    pub fn try_place(
        &mut self,
        item: &Item,
        stability: Option<&StabilityEvaluator>,
    ) -> Option<(Vector3<f64>, usize)> {
        let dims: Vec<Vector3<f64>> = (0..item.allowed_orientations().len())
            .map(|o| item.dimensions_for_orientation(o))
            .collect();

        for ep in self.candidates() {
            for (orientation, d) in dims.iter().enumerate() {
                if !ep.fits(d) {
                    continue;
                }

                let region = Aabb3::from_origin_size(ep.position, *d).rounded(self.precision);
                if !self.interior.contains(&region) {
                    continue;
                }
                if self.placed.iter().any(|p| p.region.intersects(&region)) {
                    continue;
                }
                if let Some(eval) = stability {
                    if !eval.is_region_stable(&region, item.weight(), &self.placed, self.floor())
                    {
                        continue;
                    }
                }

                self.record(PlacedBox::from_item(item, region, orientation));
                return Some((region.min, orientation));
            }
        }

        None
    }

    /// Records a placement: updates supporter loads and the point set.
    pub fn record(&mut self, mut placed: PlacedBox) {
        let (_, direct) = direct_supporters(&placed.region, &self.placed);
        for idx in transitive_supporters(&self.placed, &direct) {
            self.placed[idx].load += placed.weight;
        }
        placed.supported_by = direct;
        placed.load = 0.0;

        self.points
            .retain(|ep| !placed.region.occupies_point(&ep.position));
        self.total_weight += placed.weight;
        self.placed.push(placed);
        self.generate_new_eps(self.placed.len() - 1);
    }

    /// Consumes the set and returns the placed boxes.
    pub fn into_placed(self) -> Vec<PlacedBox> {
        self.placed
    }

    fn floor(&self) -> f64 {
        self.interior.min.y
    }

    /// Generates new extreme points after placing a box.
    fn generate_new_eps(&mut self, idx: usize) {
        let region = self.placed[idx].region;
        let (min, max) = (region.min, region.max);

        let along_width = Vector3::new(max.x, min.y, min.z);
        let along_height = Vector3::new(min.x, max.y, min.z);
        let along_depth = Vector3::new(min.x, min.y, max.z);

        match self.policy {
            AnchorPolicy::ExtremePoints => {
                for side in [along_width, along_depth] {
                    let dropped = self.project_down(side);
                    self.add_ep_if_valid(dropped);
                    self.add_ep_if_valid(side);
                }
                self.add_ep_if_valid(along_height);
            }
            AnchorPolicy::CornerPivots => {
                for pivot in [along_width, along_height, along_depth] {
                    self.add_ep_if_valid(pivot);
                }
            }
        }
    }

    /// Drops a point onto the highest surface at or below it.
    fn project_down(&self, point: Vector3<f64>) -> Vector3<f64> {
        let surface = self
            .placed
            .iter()
            .filter(|b| {
                let r = &b.region;
                r.top() <= point.y + EPSILON
                    && point.x >= r.min.x - EPSILON
                    && point.x < r.max.x - EPSILON
                    && point.z >= r.min.z - EPSILON
                    && point.z < r.max.z - EPSILON
            })
            .map(|b| b.region.top())
            .fold(self.floor(), f64::max);

        Vector3::new(point.x, surface, point.z)
    }

    /// Adds a point unless it lies outside the interior, inside a placed
    /// box, or on top of an existing point.
    fn add_ep_if_valid(&mut self, position: Vector3<f64>) {
        let position = Vector3::from(self.precision.round3(position.into()));
        let (lo, hi) = (self.interior.min, self.interior.max);

        for axis in 0..3 {
            if position[axis] < lo[axis] - EPSILON || position[axis] >= hi[axis] - EPSILON {
                return;
            }
        }

        if self.placed.iter().any(|b| b.region.occupies_point(&position)) {
            return;
        }

        let ep = ExtremePoint::new(position, &self.interior);
        if self.points.contains(&ep) {
            return;
        }

        self.points.push(ep);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::geometry::OrientationConstraint;
    use approx::assert_relative_eq;

    fn set(policy: AnchorPolicy) -> ExtremePointSet {
        ExtremePointSet::new(
            &Container::new("bin", 10.0, 10.0, 10.0),
            policy,
            Precision::new(0),
        )
    }

    #[test]
    fn test_initial_point() {
        let eps = set(AnchorPolicy::ExtremePoints);
        assert_eq!(eps.len(), 1);
        assert_eq!(eps.candidates()[0].position, Vector3::zeros());
    }

    #[test]
    fn test_initial_point_respects_corner() {
        let container = Container::new("bin", 10.0, 10.0, 10.0).with_corner(1.0);
        let eps =
            ExtremePointSet::new(&container, AnchorPolicy::ExtremePoints, Precision::new(0));
        let ep = eps.candidates()[0];
        assert_eq!(ep.position, Vector3::new(1.0, 1.0, 1.0));
        assert_eq!(ep.residual, Vector3::new(8.0, 8.0, 8.0));
    }

    #[test]
    fn test_place_generates_three_points() {
        let mut eps = set(AnchorPolicy::ExtremePoints);
        let item = Item::new("A", 2.0, 2.0, 2.0);

        let (pos, orientation) = eps.try_place(&item, None).unwrap();
        assert_eq!(pos, Vector3::zeros());
        assert_eq!(orientation, 0);
        assert_eq!(eps.placed_count(), 1);
        // Origin pruned; side points already rest on the floor.
        assert_eq!(eps.len(), 3);
    }

    #[test]
    fn test_floor_up_order() {
        let mut eps = set(AnchorPolicy::ExtremePoints);
        eps.try_place(&Item::new("A", 2.0, 2.0, 2.0), None).unwrap();

        let order: Vec<Vector3<f64>> = eps.candidates().iter().map(|e| e.position).collect();
        assert_eq!(
            order,
            vec![
                Vector3::new(2.0, 0.0, 0.0),
                Vector3::new(0.0, 0.0, 2.0),
                Vector3::new(0.0, 2.0, 0.0),
            ]
        );
    }

    #[test]
    fn test_corner_pivots_keep_creation_order() {
        let mut eps = set(AnchorPolicy::CornerPivots);
        eps.try_place(&Item::new("A", 2.0, 2.0, 2.0), None).unwrap();

        let order: Vec<Vector3<f64>> = eps.candidates().iter().map(|e| e.position).collect();
        assert_eq!(
            order,
            vec![
                Vector3::new(2.0, 0.0, 0.0),
                Vector3::new(0.0, 2.0, 0.0),
                Vector3::new(0.0, 0.0, 2.0),
            ]
        );
    }

    #[test]
    fn test_floor_points_tried_first() {
        let mut eps = set(AnchorPolicy::ExtremePoints);
        eps.try_place(&Item::new("base", 4.0, 2.0, 4.0), None).unwrap();

        let (pos, _) = eps.try_place(&Item::new("next", 2.0, 2.0, 2.0), None).unwrap();
        assert_eq!(pos, Vector3::new(4.0, 0.0, 0.0));

        let positions: Vec<Vector3<f64>> = eps.candidates().iter().map(|e| e.position).collect();
        assert!(positions.contains(&Vector3::new(6.0, 0.0, 0.0)));
        assert!(positions.contains(&Vector3::new(0.0, 2.0, 0.0)));
    }

    #[test]
    fn test_projection_lands_on_surface() {
        let mut eps = set(AnchorPolicy::ExtremePoints);
        eps.record(PlacedBox::new(
            "base",
            Aabb3::from_origin_size(Vector3::zeros(), Vector3::new(10.0, 2.0, 10.0)),
        ));
        eps.record(PlacedBox::new(
            "top",
            Aabb3::from_origin_size(Vector3::new(0.0, 2.0, 0.0), Vector3::new(3.0, 3.0, 3.0)),
        ));

        let positions: Vec<Vector3<f64>> = eps.candidates().iter().map(|e| e.position).collect();
        assert!(positions.contains(&Vector3::new(3.0, 2.0, 0.0)));
        assert!(positions.contains(&Vector3::new(0.0, 2.0, 3.0)));
        assert!(positions.contains(&Vector3::new(0.0, 5.0, 0.0)));
    }

    #[test]
    fn test_rotation_used_when_needed() {
        let mut eps = ExtremePointSet::new(
            &Container::new("bin", 2.0, 6.0, 2.0),
            AnchorPolicy::ExtremePoints,
            Precision::new(0),
        );
        let item = Item::new("tall", 6.0, 2.0, 2.0);
        let (_, orientation) = eps.try_place(&item, None).unwrap();
        assert_eq!(item.dimensions_for_orientation(orientation), Vector3::new(2.0, 6.0, 2.0));
    }

    #[test]
    fn test_no_overlap_when_full() {
        let mut eps = set(AnchorPolicy::ExtremePoints);
        assert!(eps.try_place(&Item::new("A", 10.0, 10.0, 10.0), None).is_some());
        assert!(eps.try_place(&Item::new("B", 1.0, 1.0, 1.0), None).is_none());
        assert!(eps.is_empty());
    }

    #[test]
    fn test_stability_rejects_overhang() {
        let mut eps = ExtremePointSet::new(
            &Container::new("bin", 4.0, 10.0, 4.0),
            AnchorPolicy::ExtremePoints,
            Precision::new(0),
        );
        let eval = StabilityEvaluator::new(0.75);
        let base = Item::new("base", 2.0, 2.0, 4.0).with_orientation(OrientationConstraint::Fixed);
        eps.try_place(&base, Some(&eval)).unwrap();

        // Only half of its base would rest on the first item.
        let wide = Item::new("wide", 4.0, 1.0, 4.0).with_orientation(OrientationConstraint::Fixed);
        assert!(eps.try_place(&wide, Some(&eval)).is_none());

        let (pos, _) = eps.try_place(&wide, None).unwrap();
        assert_relative_eq!(pos.y, 2.0);
    }

    #[test]
    fn test_loads_tracked() {
        let mut eps = set(AnchorPolicy::ExtremePoints);
        eps.record(PlacedBox::new(
            "bottom",
            Aabb3::from_origin_size(Vector3::zeros(), Vector3::new(4.0, 2.0, 4.0)),
        ));
        let mut middle = PlacedBox::new(
            "middle",
            Aabb3::from_origin_size(Vector3::new(0.0, 2.0, 0.0), Vector3::new(4.0, 2.0, 4.0)),
        );
        middle.weight = 3.0;
        eps.record(middle);
        let mut top = PlacedBox::new(
            "top",
            Aabb3::from_origin_size(Vector3::new(0.0, 4.0, 0.0), Vector3::new(4.0, 2.0, 4.0)),
        );
        top.weight = 2.0;
        eps.record(top);

        let boxes = eps.placed_boxes();
        assert_relative_eq!(boxes[0].load, 5.0);
        assert_relative_eq!(boxes[1].load, 2.0);
        assert_relative_eq!(boxes[2].load, 0.0);
        assert_eq!(boxes[2].supported_by, vec![1]);
        assert_relative_eq!(eps.total_weight(), 6.0);
    }
}
