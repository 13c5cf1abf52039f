//! # Stowage
//!
//! Container loading: places boxes and cylinders into containers so that
//! nothing overlaps, every raised item is supported, and weight and
//! load-bearing limits hold. Items that do not fit one container overflow
//! into the next.
//!
//! ## Quick Start
//!
//! ```rust
//! use stowage::{allocate, Container, Item, PackingConfig};
//!
//! let containers = vec![
//!     Container::new("A", 4.0, 4.0, 4.0),
//!     Container::new("B", 10.0, 10.0, 10.0),
//! ];
//! let items = (1..=15)
//!     .map(|i| Item::new(format!("cube-{}", i), 2.0, 2.0, 2.0))
//!     .collect();
//!
//! let result = allocate(&containers, items, &PackingConfig::default()).unwrap();
//! assert_eq!(result.bins[0].item_count(), 8);
//! assert_eq!(result.bins[1].item_count(), 7);
//! ```
//!
//! JSON requests in the `box`/`item` format go through [`pack_json`].

/// Core types, configuration and result aggregation.
pub use stowage_core as core;

/// Packing engine.
pub use stowage_engine as engine;

// Re-export commonly used types at root level
pub use stowage_core::{
    ContainerReport, Error, PackingConfig, PackingResult, PackingSummary, Placement, Result,
    Solver, UnfittedItem,
};
pub use stowage_engine::{
    allocate, pack_batch, pack_json, pack_request, Container, ContainerPacker, Item,
    OrientationConstraint, PackRequest, PackResponse, SequentialAllocator, Shape,
};
