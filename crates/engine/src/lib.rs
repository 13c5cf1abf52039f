//! # Stowage Engine
//!
//! 3D container loading for the Stowage packing engine.
//!
//! This crate places boxes and cylinders into containers with the extreme
//! point heuristic, enforcing overlap, weight capacity, support and
//! load-bearing limits, and fills a sequence of containers one after the
//! other.
//!
//! ## Quick Start
//!
//! ```rust
//! use stowage_engine::{allocate, Container, Item, PackingConfig};
//!
//! let containers = vec![Container::new("C1", 10.0, 10.0, 10.0)];
//! let items = (1..=20)
//!     .map(|i| Item::new(format!("cube-{}", i), 2.0, 2.0, 2.0))
//!     .collect();
//!
//! let result = allocate(&containers, items, &PackingConfig::default()).unwrap();
//! assert_eq!(result.summary.total_packed_items, 20);
//! assert_eq!(result.bins[0].utilization, 16.0);
//! ```

pub mod allocator;
pub mod boundary;
pub mod extreme_point;
pub mod geometry;
pub mod packer;
pub mod request;
pub mod stability;

// Re-exports
pub use allocator::{allocate, distribution_quota, SequentialAllocator};
pub use boundary::Container;
pub use extreme_point::{AnchorPolicy, ExtremePointSet, PlacedBox};
pub use geometry::{Item, Orientation, OrientationConstraint, Shape};
pub use packer::{ContainerPacker, ContainerPacking};
pub use request::{pack_batch, pack_json, pack_request, PackRequest, PackResponse};
pub use stability::{StabilityEvaluator, StabilityReport};
pub use stowage_core::{Error, PackingConfig, PackingResult, Placement, Result};
