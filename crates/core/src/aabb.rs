//! Axis-aligned regions.
//!
//! Every occupied region in the engine is an [`Aabb3`]. The vertical axis is
//! `y`: `x` runs along a container's width, `y` along its height and `z`
//! along its depth, so a region's footprint lies in the `x`/`z` plane.

use crate::precision::{Precision, EPSILON};
use nalgebra::Vector3;

/// A 3D axis-aligned bounding box.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Aabb3 {
    /// Minimum corner.
    pub min: Vector3<f64>,
    /// Maximum corner.
    pub max: Vector3<f64>,
}

impl Aabb3 {
    /// Creates a new AABB from its corners.
    pub fn new(min: Vector3<f64>, max: Vector3<f64>) -> Self {
        Self { min, max }
    }

    /// Creates an AABB with its minimum corner at `origin` and extent `size`.
    pub fn from_origin_size(origin: Vector3<f64>, size: Vector3<f64>) -> Self {
        Self {
            min: origin,
            max: origin + size,
        }
    }

    /// Returns the extent along each axis.
    pub fn size(&self) -> Vector3<f64> {
        self.max - self.min
    }

    /// Returns the width (x extent).
    pub fn width(&self) -> f64 {
        self.max.x - self.min.x
    }

    /// Returns the height (y extent).
    pub fn height(&self) -> f64 {
        self.max.y - self.min.y
    }

    /// Returns the depth (z extent).
    pub fn depth(&self) -> f64 {
        self.max.z - self.min.z
    }

    /// Returns the volume.
    pub fn volume(&self) -> f64 {
        self.width() * self.height() * self.depth()
    }

    /// Returns the area of the bottom face.
    pub fn base_area(&self) -> f64 {
        self.width() * self.depth()
    }

    /// Returns the y coordinate of the top face.
    pub fn top(&self) -> f64 {
        self.max.y
    }

    /// Returns the y coordinate of the bottom face.
    pub fn bottom(&self) -> f64 {
        self.min.y
    }

    /// Checks whether the two regions share positive volume.
    ///
    /// Regions that only touch along a face, edge or corner do not intersect.
    pub fn intersects(&self, other: &Self) -> bool {
        self.min.x < other.max.x - EPSILON
            && other.min.x < self.max.x - EPSILON
            && self.min.y < other.max.y - EPSILON
            && other.min.y < self.max.y - EPSILON
            && self.min.z < other.max.z - EPSILON
            && other.min.z < self.max.z - EPSILON
    }

    /// Checks whether `other` lies entirely inside this region.
    pub fn contains(&self, other: &Self) -> bool {
        other.min.x >= self.min.x - EPSILON
            && other.min.y >= self.min.y - EPSILON
            && other.min.z >= self.min.z - EPSILON
            && other.max.x <= self.max.x + EPSILON
            && other.max.y <= self.max.y + EPSILON
            && other.max.z <= self.max.z + EPSILON
    }

    /// Checks whether a point is occupied by this region.
    ///
    /// The test is half-open: a point on a minimum face is occupied, a point
    /// on a maximum face is free. This is what makes a box's far corners
    /// usable as placement anchors.
    pub fn occupies_point(&self, point: &Vector3<f64>) -> bool {
        point.x >= self.min.x - EPSILON
            && point.x < self.max.x - EPSILON
            && point.y >= self.min.y - EPSILON
            && point.y < self.max.y - EPSILON
            && point.z >= self.min.z - EPSILON
            && point.z < self.max.z - EPSILON
    }

    /// Returns the overlap area of the two footprints (projection onto `x`/`z`).
    pub fn footprint_overlap(&self, other: &Self) -> f64 {
        let x = (self.max.x.min(other.max.x) - self.min.x.max(other.min.x)).max(0.0);
        let z = (self.max.z.min(other.max.z) - self.min.z.max(other.min.z)).max(0.0);
        x * z
    }

    /// Returns the region with every coordinate rounded.
    pub fn rounded(&self, precision: Precision) -> Self {
        Self {
            min: Vector3::from(precision.round3(self.min.into())),
            max: Vector3::from(precision.round3(self.max.into())),
        }
    }
}
