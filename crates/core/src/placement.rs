//! Placement records for positioned items.

use crate::aabb::Aabb3;
use crate::geometry::ItemId;
use nalgebra::Vector3;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// The final position of one item unit inside one container.
///
/// Placements refer to items and containers by name; they never hold the
/// item itself.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Placement {
    /// Name of the placed item unit.
    pub item_id: ItemId,

    /// Name of the container the item was placed in.
    pub container_id: String,

    /// Minimum corner (x = width axis, y = height axis, z = depth axis).
    pub position: [f64; 3],

    /// Dimensions after the chosen orientation was applied.
    pub dimensions: [f64; 3],

    /// Index into the item's allowed orientations.
    pub orientation_index: usize,

    /// Weight of the item.
    pub weight: f64,
}

impl Placement {
    /// Creates a new placement.
    pub fn new(
        item_id: impl Into<ItemId>,
        container_id: impl Into<String>,
        position: Vector3<f64>,
        dimensions: Vector3<f64>,
    ) -> Self {
        Self {
            item_id: item_id.into(),
            container_id: container_id.into(),
            position: position.into(),
            dimensions: dimensions.into(),
            orientation_index: 0,
            weight: 0.0,
        }
    }

    /// Sets the orientation index.
    pub fn with_orientation_index(mut self, index: usize) -> Self {
        self.orientation_index = index;
        self
    }

    /// Sets the weight.
    pub fn with_weight(mut self, weight: f64) -> Self {
        self.weight = weight;
        self
    }

    /// Returns the occupied region.
    pub fn region(&self) -> Aabb3 {
        Aabb3::from_origin_size(
            Vector3::from(self.position),
            Vector3::from(self.dimensions),
        )
    }

    /// Returns the volume in the placed orientation.
    pub fn volume(&self) -> f64 {
        self.dimensions[0] * self.dimensions[1] * self.dimensions[2]
    }

    /// Returns the x coordinate.
    pub fn x(&self) -> f64 {
        self.position[0]
    }

    /// Returns the y (height) coordinate.
    pub fn y(&self) -> f64 {
        self.position[1]
    }

    /// Returns the z (depth) coordinate.
    pub fn z(&self) -> f64 {
        self.position[2]
    }
}
