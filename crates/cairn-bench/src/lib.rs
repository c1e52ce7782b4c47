//! Shared graph builders for the Cairn benchmarks.

#![deny(missing_docs)]
#![forbid(unsafe_code)]

use cairn_core::{PointId, RegionId};
use cairn_graph::NavGraph;
use glam::Vec3;

/// Build a `side × side` 4-connected grid with unit spacing.
pub fn grid_graph(side: i64) -> NavGraph {
    let mut graph = NavGraph::new();
    for row in 0..side {
        for col in 0..side {
            let id = PointId(row * side + col);
            graph
                .add_point(id, Vec3::new(col as f32, row as f32, 0.0), 1.0, 0)
                .expect("grid point");
        }
    }
    for row in 0..side {
        for col in 0..side {
            let id = PointId(row * side + col);
            if col + 1 < side {
                graph.connect_points(id, PointId(row * side + col + 1), true).expect("edge");
            }
            if row + 1 < side {
                graph.connect_points(id, PointId((row + 1) * side + col), true).expect("edge");
            }
        }
    }
    graph
}

/// Partition a grid built by [`grid_graph`] into `side`-wide column strips,
/// one region per strip, and connect adjacent strips.
pub fn add_strip_regions(graph: &mut NavGraph, side: i64, strips: i64) {
    let strip_width = side / strips;
    for strip in 0..strips {
        let mut members = Vec::new();
        for row in 0..side {
            for col in (strip * strip_width)..((strip + 1) * strip_width) {
                members.push(PointId(row * side + col));
            }
        }
        let origin = members[0];
        let anchor = Vec3::new((strip * strip_width) as f32, 0.0, 0.0);
        graph
            .add_region(RegionId(strip), &members, anchor, origin)
            .expect("strip region");
    }
    for strip in 1..strips {
        graph
            .connect_regions(RegionId(strip - 1), RegionId(strip), true)
            .expect("strip link");
    }
}
