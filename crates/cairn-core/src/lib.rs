//! Core types for the Cairn pathfinding engine.
//!
//! This is the leaf crate with zero internal Cairn dependencies. It defines
//! the typed identifiers, the navigation layer mask, the error enum, and the
//! cost-hook signatures shared by the rest of the workspace.

#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]
#![forbid(unsafe_code)]

pub mod cost;
pub mod error;
pub mod id;
pub mod layers;

// Re-export core types at crate root for convenience.
pub use cost::{PointCostFn, RegionCostFn, StraightLineFn};
pub use error::GraphError;
pub use id::{PointId, RegionId};
pub use layers::LayerMask;
