//! Integration tests: coarse (region) queries.
//!
//! Covers the same-region downgrade, multi-region routes and their
//! reconstruction peephole, the straight-line callback, and closest-path
//! recovery when the region graph connects but the point graph does not.

use cairn_core::{GraphError, PointId, RegionId};
use cairn_graph::NavGraph;
use glam::Vec3;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

fn p(id: i64) -> PointId {
    PointId(id)
}

fn r(id: i64) -> RegionId {
    RegionId(id)
}

/// Points `0..n` on the x axis, consecutive bidirectional edges.
fn line_graph(n: i64) -> NavGraph {
    let mut g = NavGraph::new();
    for id in 0..n {
        g.add_point(p(id), Vec3::new(id as f32, 0.0, 0.0), 1.0, 0)
            .unwrap();
    }
    for id in 1..n {
        g.connect_points(p(id - 1), p(id), true).unwrap();
    }
    g
}

#[test]
fn same_region_query_downgrades_to_flat() {
    let mut g = line_graph(4);
    g.add_region(r(0), &[p(0), p(1), p(2), p(3)], Vec3::ZERO, p(0))
        .unwrap();

    let coarse = g.id_path(p(0), p(3), 0, true).unwrap();
    let flat = g.id_path(p(0), p(3), 0, false).unwrap();
    assert_eq!(coarse, flat);
    assert_eq!(coarse, vec![p(0), p(1), p(2), p(3)]);
}

#[test]
fn corridor_across_two_regions() {
    let mut g = line_graph(6);
    g.add_region(r(0), &[p(0), p(1), p(2)], Vec3::new(1.0, 0.0, 0.0), p(0))
        .unwrap();
    g.add_region(r(1), &[p(3), p(4), p(5)], Vec3::new(4.0, 0.0, 0.0), p(3))
        .unwrap();
    g.connect_regions(r(0), r(1), true).unwrap();

    let coarse = g.id_path(p(0), p(5), 0, true).unwrap();
    assert_eq!(coarse, vec![p(0), p(1), p(2), p(3), p(4), p(5)]);

    let flat = g.id_path(p(0), p(5), 0, false).unwrap();
    assert_eq!(coarse, flat);
}

#[test]
fn coarse_query_requires_region_attachment() {
    let mut g = line_graph(3);
    g.add_region(r(0), &[p(0), p(1)], Vec3::ZERO, p(0)).unwrap();

    assert_eq!(
        g.id_path(p(0), p(2), 0, true),
        Err(GraphError::PointNotInRegion { id: p(2) })
    );
    // Flat mode has no such requirement.
    assert!(!g.id_path(p(0), p(2), 0, false).unwrap().is_empty());
}

/// A dog-leg through a region origin that a direct edge can bypass.
fn dogleg_graph() -> NavGraph {
    let mut g = line_graph(4);
    g.connect_points(p(0), p(2), true).unwrap();
    g.add_region(r(0), &[p(0)], Vec3::ZERO, p(0)).unwrap();
    g.add_region(r(1), &[p(1), p(2)], Vec3::new(1.5, 0.0, 0.0), p(1))
        .unwrap();
    g.add_region(r(2), &[p(3)], Vec3::new(3.0, 0.0, 0.0), p(3))
        .unwrap();
    g.connect_regions(r(0), r(1), true).unwrap();
    g.connect_regions(r(1), r(2), true).unwrap();
    g
}

#[test]
fn reconstruction_peephole_drops_origin_dogleg() {
    let mut g = dogleg_graph();
    // Region stitching enters r(1) through its origin 1, but the direct
    // edge 0 → 2 costs no more than 0 → 1 → 2, so 1 is dropped.
    assert_eq!(g.id_path(p(0), p(3), 0, true).unwrap(), vec![p(0), p(2), p(3)]);
}

#[test]
fn peephole_keeps_midpoint_when_direct_edge_costs_more() {
    let mut g = dogleg_graph();
    // Same shape, but the direct edge is made expensive: the cost-aware
    // peephole must keep the midpoint.
    g.set_compute_cost(|a, b| match (a.0, b.0) {
        (0, 2) | (2, 0) => 10.0,
        _ => (a.0 - b.0).abs() as f32,
    });
    assert_eq!(
        g.id_path(p(0), p(3), 0, true).unwrap(),
        vec![p(0), p(1), p(2), p(3)]
    );
}

#[test]
fn straight_line_callback_resolves_transitions() {
    let mut g = line_graph(6);
    g.add_region(r(0), &[p(0), p(1), p(2)], Vec3::new(1.0, 0.0, 0.0), p(0))
        .unwrap();
    g.add_region(r(1), &[p(3), p(4), p(5)], Vec3::new(4.0, 0.0, 0.0), p(3))
        .unwrap();
    g.connect_regions(r(0), r(1), true).unwrap();

    let calls = Arc::new(AtomicUsize::new(0));
    let seen = Arc::clone(&calls);
    g.set_straight_line_function(move |from, to| {
        seen.fetch_add(1, Ordering::Relaxed);
        if from.0 <= to.0 {
            (from.0..=to.0).map(PointId).collect()
        } else {
            (to.0..=from.0).rev().map(PointId).collect()
        }
    })
    .unwrap();

    let path = g.id_path(p(0), p(5), 0, true).unwrap();
    assert_eq!(path, vec![p(0), p(1), p(2), p(3), p(4), p(5)]);
    assert!(calls.load(Ordering::Relaxed) >= 1, "callback never consulted");
}

#[test]
fn broken_straight_line_falls_back_to_flat_search() {
    let mut g = line_graph(6);
    g.add_region(r(0), &[p(0), p(1), p(2)], Vec3::new(1.0, 0.0, 0.0), p(0))
        .unwrap();
    g.add_region(r(1), &[p(3), p(4), p(5)], Vec3::new(4.0, 0.0, 0.0), p(3))
        .unwrap();
    g.connect_regions(r(0), r(1), true).unwrap();

    // The proposed line names a point that doesn't exist; the prefix
    // breaks immediately and the restricted search takes over.
    g.set_straight_line_function(|from, _| vec![from, PointId(99)])
        .unwrap();

    let path = g.id_path(p(0), p(5), 0, true).unwrap();
    assert_eq!(path, vec![p(0), p(1), p(2), p(3), p(4), p(5)]);
}

#[test]
fn region_route_without_point_route_recovers_closest() {
    let mut g = NavGraph::new();
    g.add_point(p(0), Vec3::new(0.0, 0.0, 0.0), 1.0, 0).unwrap();
    g.add_point(p(1), Vec3::new(1.0, 0.0, 0.0), 1.0, 0).unwrap();
    g.add_point(p(2), Vec3::new(10.0, 0.0, 0.0), 1.0, 0).unwrap();
    g.add_point(p(3), Vec3::new(11.0, 0.0, 0.0), 1.0, 0).unwrap();
    g.connect_points(p(0), p(1), true).unwrap();
    g.connect_points(p(2), p(3), true).unwrap();
    g.add_region(r(0), &[p(0), p(1)], Vec3::ZERO, p(0)).unwrap();
    g.add_region(r(1), &[p(2), p(3)], Vec3::new(10.5, 0.0, 0.0), p(2))
        .unwrap();
    // The region graph claims a route the point graph cannot realize.
    g.connect_regions(r(0), r(1), true).unwrap();

    assert!(g.id_path(p(0), p(3), 0, true).unwrap().is_empty());
    assert_eq!(g.proximity_id_path_of_last_call(), vec![p(0), p(1)]);
}

#[test]
fn single_member_dead_end_region_is_rejected() {
    let mut g = NavGraph::new();
    g.add_point(p(0), Vec3::ZERO, 1.0, 0).unwrap();
    g.add_point(p(1), Vec3::new(1.0, 0.0, 0.0), 1.0, 0).unwrap();
    g.add_point(p(2), Vec3::new(2.0, 0.0, 0.0), 1.0, 0).unwrap();
    g.connect_points(p(0), p(1), true).unwrap();
    // Point 2 has no edges at all.
    g.add_region(r(0), &[p(0), p(1)], Vec3::ZERO, p(0)).unwrap();
    g.add_region(r(1), &[p(2)], Vec3::new(2.0, 0.0, 0.0), p(2))
        .unwrap();
    g.connect_regions(r(0), r(1), true).unwrap();

    assert!(g.id_path(p(0), p(2), 0, true).unwrap().is_empty());
    // The transition validator rejected the region before any sub-search.
    assert!(g.proximity_id_path_of_last_call().is_empty());
}

#[test]
fn disabled_or_unsupported_goal_fails_fast_in_coarse_mode() {
    let mut g = line_graph(6);
    g.add_region(r(0), &[p(0), p(1), p(2)], Vec3::new(1.0, 0.0, 0.0), p(0))
        .unwrap();
    g.add_region(r(1), &[p(3), p(4), p(5)], Vec3::new(4.0, 0.0, 0.0), p(3))
        .unwrap();
    g.connect_regions(r(0), r(1), true).unwrap();

    g.set_point_disabled(p(5), true).unwrap();
    assert!(g.id_path(p(0), p(5), 0, true).unwrap().is_empty());
    g.set_point_disabled(p(5), false).unwrap();

    // Goal carries no layer of the query mask.
    assert!(g.id_path(p(0), p(5), 0b01, true).unwrap().is_empty());
}

#[test]
fn coarse_route_respects_one_way_region_links() {
    let mut g = line_graph(4);
    g.add_region(r(0), &[p(0), p(1)], Vec3::ZERO, p(0)).unwrap();
    g.add_region(r(1), &[p(2), p(3)], Vec3::new(2.5, 0.0, 0.0), p(2))
        .unwrap();
    g.connect_regions(r(0), r(1), false).unwrap();

    assert_eq!(
        g.id_path(p(0), p(3), 0, true).unwrap(),
        vec![p(0), p(1), p(2), p(3)]
    );
    // The reverse region direction does not exist.
    assert!(g.id_path(p(3), p(0), 0, true).unwrap().is_empty());
}
