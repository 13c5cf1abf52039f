//! Traits shared by packable items and containers.

use crate::aabb::Aabb3;
use crate::Result;

/// Identifier of an item unit. Unique within one packing run.
pub type ItemId = String;

/// Something that can be placed into a container.
pub trait Geometry {
    /// Returns the unique identifier.
    fn id(&self) -> &ItemId;

    /// Returns the volume in the reference orientation.
    fn measure(&self) -> f64;

    /// Returns the weight.
    fn weight(&self) -> f64;

    /// Validates the geometry.
    fn validate(&self) -> Result<()>;
}

/// A container items are placed into.
pub trait Boundary {
    /// Returns the container name.
    fn id(&self) -> &str;

    /// Returns the full volume (outer dimensions, ignoring any reserved margin).
    fn measure(&self) -> f64;

    /// Returns the usable interior region.
    fn interior(&self) -> Aabb3;

    /// Validates the container.
    fn validate(&self) -> Result<()>;

    /// Checks whether a region lies entirely inside the usable interior.
    fn contains_region(&self, region: &Aabb3) -> bool {
        self.interior().contains(region)
    }
}
