//! Cairn: a hierarchical A* pathfinding engine over weighted directed
//! graphs embedded in 3-D space.
//!
//! This is the top-level facade crate re-exporting the public API from the
//! Cairn sub-crates. For most users, adding `cairn` as a single dependency
//! is sufficient.
//!
//! # Quick start
//!
//! ```rust
//! use cairn::prelude::*;
//!
//! let mut graph = NavGraph::new();
//! graph.add_point(PointId(0), Vec3::new(0.0, 0.0, 0.0), 1.0, 0).unwrap();
//! graph.add_point(PointId(1), Vec3::new(1.0, 0.0, 0.0), 1.0, 0).unwrap();
//! graph.add_point(PointId(2), Vec3::new(2.0, 0.0, 0.0), 1.0, 0).unwrap();
//! graph.connect_points(PointId(0), PointId(1), true).unwrap();
//! graph.connect_points(PointId(1), PointId(2), true).unwrap();
//!
//! let path = graph.id_path(PointId(0), PointId(2), 0, false).unwrap();
//! assert_eq!(path, vec![PointId(0), PointId(1), PointId(2)]);
//!
//! // Group points into regions for coarse queries over large graphs.
//! graph.add_region(RegionId(0), &[PointId(0), PointId(1)], Vec3::ZERO, PointId(0)).unwrap();
//! graph.add_region(RegionId(1), &[PointId(2)], Vec3::new(2.0, 0.0, 0.0), PointId(2)).unwrap();
//! graph.connect_regions(RegionId(0), RegionId(1), true).unwrap();
//!
//! let coarse = graph.id_path(PointId(0), PointId(2), 0, true).unwrap();
//! assert_eq!(coarse, vec![PointId(0), PointId(1), PointId(2)]);
//! ```
//!
//! # Modules
//!
//! | Module | Sub-crate | Contents |
//! |--------|-----------|----------|
//! | [`types`] | `cairn-core` | Ids, layer masks, errors, cost-hook signatures |
//! | [`graph`] | `cairn-graph` | The [`graph::NavGraph`] store and its searches |

#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]
#![forbid(unsafe_code)]

/// Core ids, layer masks, and error types (`cairn-core`).
pub use cairn_core as types;

/// The navigation graph store and search engines (`cairn-graph`).
pub use cairn_graph as graph;

/// Common imports for typical Cairn usage.
///
/// ```rust
/// use cairn::prelude::*;
/// ```
pub mod prelude {
    pub use cairn_core::{GraphError, LayerMask, PointId, RegionId};
    pub use cairn_graph::NavGraph;
    pub use glam::Vec3;
}
