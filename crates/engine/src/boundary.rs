//! Container model.

use nalgebra::Vector3;
use stowage_core::geometry::Boundary;
use stowage_core::{Aabb3, Error, Precision, Result};

/// Default weight capacity of a container when none is given.
pub const DEFAULT_MAX_WEIGHT: f64 = 1_000_000.0;

/// A container (bin) items are packed into.
#[derive(Debug, Clone, PartialEq)]
pub struct Container {
    /// Unique name.
    id: String,

    /// Dimensions (width, height, depth).
    dimensions: Vector3<f64>,

    /// Maximum total weight of placed items.
    max_weight: f64,

    /// Clearance reserved along every wall, floor and ceiling.
    corner: f64,
}

impl Container {
    /// Creates a new container with the given dimensions.
    pub fn new(id: impl Into<String>, width: f64, height: f64, depth: f64) -> Self {
        Self {
            id: id.into(),
            dimensions: Vector3::new(width, height, depth),
            max_weight: DEFAULT_MAX_WEIGHT,
            corner: 0.0,
        }
    }

    /// Sets the weight capacity.
    pub fn with_max_weight(mut self, weight: f64) -> Self {
        self.max_weight = weight;
        self
    }

    /// Sets the corner clearance.
    pub fn with_corner(mut self, corner: f64) -> Self {
        self.corner = corner;
        self
    }

    /// Returns the dimensions (width, height, depth).
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

    /// Returns the weight capacity.
    pub fn max_weight(&self) -> f64 {
        self.max_weight
    }

    /// Returns the corner clearance.
    pub fn corner(&self) -> f64 {
        self.corner
    }

    /// Returns the y coordinate of the usable floor.
    pub fn floor(&self) -> f64 {
        self.corner
    }

    /// Checks whether a region lies entirely inside the usable interior.
    pub fn fits(&self, region: &Aabb3) -> bool {
        self.contains_region(region)
    }

    /// Returns a copy with dimensions and clearance rounded.
    pub fn rounded(&self, precision: Precision) -> Self {
        Self {
            dimensions: Vector3::from(precision.round3(self.dimensions.into())),
            corner: precision.round(self.corner),
            ..self.clone()
        }
    }
}

impl Boundary for Container {
    fn id(&self) -> &str {
        &self.id
    }

    fn measure(&self) -> f64 {
        self.dimensions.x * self.dimensions.y * self.dimensions.z
    }

    fn interior(&self) -> Aabb3 {
        let c = Vector3::new(self.corner, self.corner, self.corner);
        Aabb3::new(c, self.dimensions - c)
    }

    fn validate(&self) -> Result<()> {
        if self.id.is_empty() {
            return Err(Error::InvalidContainer(
                "Container name must not be empty".into(),
            ));
        }

        if self.dimensions.iter().any(|d| !d.is_finite() || *d < 0.0) {
            return Err(Error::InvalidContainer(format!(
                "Dimensions of '{}' must not be negative",
                self.id
            )));
        }

        if self.max_weight.is_nan() || self.max_weight < 0.0 {
            return Err(Error::InvalidContainer(format!(
                "Weight capacity of '{}' must not be negative",
                self.id
            )));
        }

        if !self.corner.is_finite() || self.corner < 0.0 {
            return Err(Error::InvalidContainer(format!(
                "Corner clearance of '{}' must not be negative",
                self.id
            )));
        }

        Ok(())
    }
}
