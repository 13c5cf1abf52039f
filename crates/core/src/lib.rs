//! # Stowage Core
//!
//! Core types shared by the Stowage container-loading engine.
//!
//! ## Core Components
//!
//! - **Geometry traits**: [`Geometry`] for packable items, [`Boundary`] for containers
//! - **Regions**: [`Aabb3`] with the overlap and containment tests every check builds on
//! - **Precision**: per-run decimal rounding ([`Precision`])
//! - **Configuration**: [`PackingConfig`] and the [`Solver`] trait
//! - **Results**: [`Placement`] records and the aggregated [`PackingResult`]
//!
//! ## Coordinates
//!
//! `x` runs along width, `y` along height (vertical), `z` along depth.
//!
//! ## Feature Flags
//!
//! - `serde`: Enable serialization/deserialization support

pub mod aabb;
pub mod error;
pub mod geometry;
pub mod placement;
pub mod precision;
pub mod result;
pub mod solver;

// Re-exports
pub use aabb::Aabb3;
pub use error::{Error, Result};
pub use geometry::{Boundary, Geometry, ItemId};
pub use placement::Placement;
pub use precision::{Precision, EPSILON};
pub use result::{
    utilization_percent, ContainerFailure, ContainerReport, PackingResult, PackingSummary,
    PlacedItemReport, UnfittedItem,
};
pub use solver::{PackingConfig, Solver};
