//! Hierarchical A* pathfinding over weighted directed graphs in 3-D space.
//!
//! Clients build a [`NavGraph`] by inserting identified points with
//! positions, optional per-point weight multipliers, and navigation layer
//! masks, then connect them with directed or bidirectional segments and
//! query shortest paths. Points may additionally be grouped into disjoint
//! [regions](NavGraph::add_region): a coarse query then plans across
//! regions first and refines each region transition into a point-level
//! sub-path, optionally shortcut by a client-supplied straight-line
//! callback.
//!
//! # Quick start
//!
//! ```
//! use cairn_graph::NavGraph;
//! use cairn_core::PointId;
//! use glam::Vec3;
//!
//! let mut graph = NavGraph::new();
//! graph.add_point(PointId(0), Vec3::new(0.0, 0.0, 0.0), 1.0, 0).unwrap();
//! graph.add_point(PointId(1), Vec3::new(1.0, 1.0, 0.0), 1.0, 0).unwrap();
//! graph.add_point(PointId(2), Vec3::new(2.0, 0.0, 0.0), 1.0, 0).unwrap();
//! graph.connect_points(PointId(0), PointId(1), true).unwrap();
//! graph.connect_points(PointId(1), PointId(2), true).unwrap();
//!
//! let path = graph.id_path(PointId(0), PointId(2), 0, false).unwrap();
//! assert_eq!(path, vec![PointId(0), PointId(1), PointId(2)]);
//!
//! // Disabling the middle point severs the only route; the engine
//! // remembers the closest approach instead.
//! graph.set_point_disabled(PointId(1), true).unwrap();
//! assert!(graph.id_path(PointId(0), PointId(2), 0, false).unwrap().is_empty());
//! assert_eq!(graph.proximity_id_path_of_last_call(), vec![PointId(0)]);
//! ```

#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]
#![forbid(unsafe_code)]

mod graph;
mod heap;
mod oracle;
mod path;
mod point;
mod region;
mod segment;
mod solve;

pub use graph::NavGraph;

// Re-export the position type and the core vocabulary so most users need
// only this crate.
pub use cairn_core::{GraphError, LayerMask, PointId, RegionId};
pub use glam::Vec3;
