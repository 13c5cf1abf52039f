//! Item models: boxes and cylinders with their rotation rules.

use nalgebra::Vector3;
use stowage_core::geometry::{Geometry, ItemId};
use stowage_core::{Aabb3, Error, Precision, Result};

/// Default weight of an item when none is given.
pub const DEFAULT_WEIGHT: f64 = 1.0;

/// Default load-bearing limit; large enough to never bind in practice.
pub const DEFAULT_LOAD_BEAR: f64 = 100_000.0;

/// Axis permutation `(x_source, y_source, z_source)` into the nominal
/// `(width, height, depth)` triple.
pub type Orientation = (usize, usize, usize);

/// Upright orientations first, so the reference orientation is always tried first.
const ALL_ORIENTATIONS: [Orientation; 6] = [
    (0, 1, 2), // As given
    (2, 1, 0), // Turned 90° about the vertical axis
    (0, 2, 1), // Laid over forward
    (1, 0, 2), // Laid over sideways
    (1, 2, 0), // Laid over, then turned
    (2, 0, 1), // Laid over sideways, then turned
];

/// Shape of an item.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Shape {
    /// Rectangular box.
    #[default]
    Cuboid,
    /// Cylinder standing on its circular base. Its footprint is the
    /// width × depth rectangle and it is treated as that bounding box for
    /// overlap, containment and support.
    Cylinder,
}

/// Orientation constraint for placement.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum OrientationConstraint {
    /// Any axis-aligned orientation (up to 6 for boxes).
    #[default]
    Any,
    /// Keeps the up face; may turn 90° about the vertical axis.
    Upright,
    /// Reference orientation only.
    Fixed,
}

/// Key identifying items that look identical to the allocator.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct GroupKey {
    shape: Shape,
    orientation: OrientationConstraint,
    dimensions: [u64; 3],
    weight: u64,
    load_bear: u64,
}

/// A single item unit to be packed.
#[derive(Debug, Clone, PartialEq)]
pub struct Item {
    /// Unique identifier.
    id: ItemId,

    /// Box or cylinder.
    shape: Shape,

    /// Nominal dimensions (width, height, depth).
    dimensions: Vector3<f64>,

    /// Weight.
    weight: f64,

    /// Maximum weight that may rest on top of this item.
    load_bear: f64,

    /// Orientation constraint.
    orientation: OrientationConstraint,

    /// Presentation tag only.
    color: Option<String>,
}

impl Item {
    /// Creates a new box item with the given ID and dimensions.
    pub fn new(id: impl Into<ItemId>, width: f64, height: f64, depth: f64) -> Self {
        Self {
            id: id.into(),
            shape: Shape::Cuboid,
            dimensions: Vector3::new(width, height, depth),
            weight: DEFAULT_WEIGHT,
            load_bear: DEFAULT_LOAD_BEAR,
            orientation: OrientationConstraint::default(),
            color: None,
        }
    }

    /// Alias for creating a box item.
    pub fn box_shape(id: impl Into<ItemId>, width: f64, height: f64, depth: f64) -> Self {
        Self::new(id, width, height, depth)
    }

    /// Creates a cylinder item. `width` and `depth` span its footprint.
    pub fn cylinder(id: impl Into<ItemId>, width: f64, height: f64, depth: f64) -> Self {
        Self::new(id, width, height, depth).with_shape(Shape::Cylinder)
    }

    /// Sets the shape.
    pub fn with_shape(mut self, shape: Shape) -> Self {
        self.shape = shape;
        self
    }

    /// Sets the weight.
    pub fn with_weight(mut self, weight: f64) -> Self {
        self.weight = weight;
        self
    }

    /// Sets the load-bearing limit.
    pub fn with_load_bear(mut self, load_bear: f64) -> Self {
        self.load_bear = load_bear;
        self
    }

    /// Sets the orientation constraint.
    pub fn with_orientation(mut self, constraint: OrientationConstraint) -> Self {
        self.orientation = constraint;
        self
    }

    /// Sets the color tag.
    pub fn with_color(mut self, color: impl Into<String>) -> Self {
        self.color = Some(color.into());
        self
    }

    /// Returns the shape.
    pub fn shape(&self) -> Shape {
        self.shape
    }

    /// Returns the nominal dimensions (width, height, depth).
    pub fn dimensions(&self) -> &Vector3<f64> {
        &self.dimensions
    }

    /// Returns the width.
    pub fn width(&self) -> f64 {
        self.dimensions.x
    }

    /// Returns the height.
    pub fn height(&self) -> f64 {
        self.dimensions.y
    }

    /// Returns the depth.
    pub fn depth(&self) -> f64 {
        self.dimensions.z
    }

    /// Returns the load-bearing limit.
    pub fn load_bear(&self) -> f64 {
        self.load_bear
    }

    /// Returns the color tag.
    pub fn color(&self) -> Option<&str> {
        self.color.as_deref()
    }

    /// Returns the requested orientation constraint.
    pub fn orientation_constraint(&self) -> OrientationConstraint {
        self.orientation
    }

    /// Returns the constraint actually applied. Cylinders never lie on
    /// their side.
    pub fn effective_constraint(&self) -> OrientationConstraint {
        match (self.shape, self.orientation) {
            (Shape::Cylinder, OrientationConstraint::Any) => OrientationConstraint::Upright,
            (_, constraint) => constraint,
        }
    }

    /// Returns the allowed orientations with duplicate dimension triples removed.
    pub fn allowed_orientations(&self) -> Vec<Orientation> {
        let candidates: &[Orientation] = match self.effective_constraint() {
            OrientationConstraint::Fixed => &ALL_ORIENTATIONS[..1],
            OrientationConstraint::Upright => &ALL_ORIENTATIONS[..2],
            OrientationConstraint::Any => &ALL_ORIENTATIONS,
        };

        let mut seen: Vec<Vector3<f64>> = Vec::with_capacity(candidates.len());
        let mut orientations = Vec::with_capacity(candidates.len());
        for &orientation in candidates {
            let dims = self.permute(orientation);
            if !seen.contains(&dims) {
                seen.push(dims);
                orientations.push(orientation);
            }
        }
        orientations
    }

    /// Returns dimensions for a given orientation index.
    pub fn dimensions_for_orientation(&self, orientation: usize) -> Vector3<f64> {
        let orientations = self.allowed_orientations();
        match orientations.get(orientation) {
            Some(&o) => self.permute(o),
            None => self.dimensions,
        }
    }

    /// Returns the region occupied at `position` in the given orientation.
    pub fn occupied_region(&self, position: Vector3<f64>, orientation: usize) -> Aabb3 {
        Aabb3::from_origin_size(position, self.dimensions_for_orientation(orientation))
    }

    /// Returns a copy with its dimensions rounded.
    ///
    /// Fails when a dimension rounds to zero, since such an item could not
    /// be checked for overlap.
    pub fn rounded(&self, precision: Precision) -> Result<Self> {
        let dims = precision.round3(self.dimensions.into());
        if dims.iter().any(|d| *d <= 0.0) {
            return Err(Error::InvalidItem(format!(
                "Dimensions of '{}' round to zero at {} decimal places",
                self.id,
                precision.decimals()
            )));
        }

        Ok(Self {
            dimensions: Vector3::from(dims),
            ..self.clone()
        })
    }

    /// Returns the key shared by identical-looking items.
    pub fn group_key(&self) -> GroupKey {
        GroupKey {
            shape: self.shape,
            orientation: self.orientation,
            dimensions: [
                self.dimensions.x.to_bits(),
                self.dimensions.y.to_bits(),
                self.dimensions.z.to_bits(),
            ],
            weight: self.weight.to_bits(),
            load_bear: self.load_bear.to_bits(),
        }
    }

    fn permute(&self, (x, y, z): Orientation) -> Vector3<f64> {
        Vector3::new(self.dimensions[x], self.dimensions[y], self.dimensions[z])
    }
}

impl Geometry for Item {
    fn id(&self) -> &ItemId {
        &self.id
    }

    fn measure(&self) -> f64 {
        self.dimensions.x * self.dimensions.y * self.dimensions.z
    }

    fn weight(&self) -> f64 {
        self.weight
    }

    fn validate(&self) -> Result<()> {
        if self.id.is_empty() {
            return Err(Error::InvalidItem("Item name must not be empty".into()));
        }

        if self.dimensions.iter().any(|d| !d.is_finite() || *d <= 0.0) {
            return Err(Error::InvalidItem(format!(
                "All dimensions for '{}' must be positive",
                self.id
            )));
        }

        if !self.weight.is_finite() || self.weight < 0.0 {
            return Err(Error::InvalidItem(format!(
                "Weight for '{}' cannot be negative",
                self.id
            )));
        }

        if self.load_bear.is_nan() || self.load_bear < 0.0 {
            return Err(Error::InvalidItem(format!(
                "Load-bearing limit for '{}' cannot be negative",
                self.id
            )));
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_box_volume() {
        let item = Item::new("B1", 10.0, 20.0, 30.0);
        assert_relative_eq!(item.measure(), 6000.0, epsilon = 0.001);
        assert_relative_eq!(item.weight(), DEFAULT_WEIGHT);
        assert_relative_eq!(item.load_bear(), DEFAULT_LOAD_BEAR);
    }

    #[test]
    fn test_orientations() {
        let item = Item::new("B1", 10.0, 20.0, 30.0);
        assert_eq!(item.allowed_orientations().len(), 6);

        let upright = item.clone().with_orientation(OrientationConstraint::Upright);
        assert_eq!(upright.allowed_orientations().len(), 2);
        for i in 0..2 {
            assert_relative_eq!(upright.dimensions_for_orientation(i).y, 20.0);
        }

        let fixed = item.with_orientation(OrientationConstraint::Fixed);
        assert_eq!(fixed.allowed_orientations().len(), 1);
    }

    #[test]
    fn test_orientations_deduplicated() {
        let cube = Item::new("C", 2.0, 2.0, 2.0);
        assert_eq!(cube.allowed_orientations().len(), 1);

        let square_base = Item::new("S", 4.0, 1.0, 4.0);
        assert_eq!(square_base.allowed_orientations().len(), 3);
    }

    #[test]
    fn test_cylinder_stays_upright() {
        let cyl = Item::cylinder("R", 3.0, 8.0, 3.0);
        assert_eq!(cyl.effective_constraint(), OrientationConstraint::Upright);
        let orientations = cyl.allowed_orientations();
        assert_eq!(orientations.len(), 1);
        assert_relative_eq!(cyl.dimensions_for_orientation(0).y, 8.0);
    }

    #[test]
    fn test_orientation_is_permutation() {
        let item = Item::new("B1", 1.0, 2.0, 3.0);
        for i in 0..item.allowed_orientations().len() {
            let d = item.dimensions_for_orientation(i);
            let mut v = [d.x, d.y, d.z];
            v.sort_by(f64::total_cmp);
            assert_eq!(v, [1.0, 2.0, 3.0]);
        }
    }

    #[test]
    fn test_occupied_region() {
        let item = Item::new("B1", 1.0, 2.0, 3.0).with_orientation(OrientationConstraint::Upright);
        let region = item.occupied_region(Vector3::new(5.0, 0.0, 5.0), 1);
        assert_relative_eq!(region.max.x, 8.0);
        assert_relative_eq!(region.max.y, 2.0);
        assert_relative_eq!(region.max.z, 6.0);
    }

    #[test]
    fn test_validation() {
        assert!(Item::new("B1", 10.0, 20.0, 30.0).validate().is_ok());
        assert!(Item::new("B2", -10.0, 20.0, 30.0).validate().is_err());
        assert!(Item::new("B3", 10.0, 0.0, 30.0).validate().is_err());
        assert!(Item::new("B4", 1.0, 1.0, 1.0)
            .with_weight(-1.0)
            .validate()
            .is_err());
        assert!(Item::new("", 1.0, 1.0, 1.0).validate().is_err());
    }

    #[test]
    fn test_rounding() {
        let item = Item::new("B1", 2.4, 2.6, 3.0);
        let rounded = item.rounded(Precision::new(0)).unwrap();
        assert_relative_eq!(rounded.width(), 2.0);
        assert_relative_eq!(rounded.height(), 3.0);

        let tiny = Item::new("B2", 0.3, 1.0, 1.0);
        assert!(tiny.rounded(Precision::new(0)).is_err());
        assert!(tiny.rounded(Precision::new(1)).is_ok());
    }

    #[test]
    fn test_group_key() {
        let a = Item::new("A-1", 1.0, 2.0, 3.0);
        let b = Item::new("A-2", 1.0, 2.0, 3.0);
        let c = Item::new("A-3", 1.0, 2.0, 3.0).with_weight(5.0);
        assert_eq!(a.group_key(), b.group_key());
        assert_ne!(a.group_key(), c.group_key());
    }
}
