//! Integration tests: flat queries.
//!
//! Covers the literal end-to-end scenarios (two-point path, triangle
//! shortcut, disabled detour, layer filtering, closest-path recovery) and
//! checks A* optimality against a reference Dijkstra on random graphs.

use cairn_core::{GraphError, PointId};
use cairn_graph::NavGraph;
use glam::Vec3;
use proptest::prelude::*;
use std::collections::{HashMap, HashSet};

fn p(id: i64) -> PointId {
    PointId(id)
}

fn line_point(id: i64) -> Vec3 {
    Vec3::new(id as f32, 0.0, 0.0)
}

#[test]
fn two_point_path() {
    let mut g = NavGraph::new();
    g.add_point(p(0), Vec3::new(0.0, 0.0, 0.0), 1.0, 0).unwrap();
    g.add_point(p(1), Vec3::new(1.0, 0.0, 0.0), 1.0, 0).unwrap();
    g.connect_points(p(0), p(1), true).unwrap();

    assert_eq!(g.id_path(p(0), p(1), 0, false).unwrap(), vec![p(0), p(1)]);
    assert_eq!(
        g.point_path(p(0), p(1), 0, false).unwrap(),
        vec![Vec3::new(0.0, 0.0, 0.0), Vec3::new(1.0, 0.0, 0.0)]
    );
}

#[test]
fn triangle_routes_tie_at_equal_cost() {
    let mut g = NavGraph::new();
    g.add_point(p(0), Vec3::new(0.0, 0.0, 0.0), 1.0, 0).unwrap();
    g.add_point(p(1), Vec3::new(5.0, 0.0, 0.0), 1.0, 0).unwrap();
    g.add_point(p(2), Vec3::new(1.0, 0.0, 0.0), 1.0, 0).unwrap();
    g.connect_points(p(0), p(1), true).unwrap();
    g.connect_points(p(0), p(2), true).unwrap();
    g.connect_points(p(2), p(1), true).unwrap();

    // On a line the detour through 2 costs 1 + 4 = 5, exactly the direct
    // segment. Either route is optimal; the result must cost 5.
    let path = g.id_path(p(0), p(1), 0, false).unwrap();
    assert!(
        path == vec![p(0), p(1)] || path == vec![p(0), p(2), p(1)],
        "unexpected route {path:?}"
    );
    assert!((path_cost(&g, &path) - 5.0).abs() < 1e-6);
}

#[test]
fn strictly_cheaper_detour_wins() {
    let mut g = NavGraph::new();
    // 2 sits just off the straight line, but the direct segment detours
    // through a third dimension, so the two-hop route is strictly cheaper.
    g.add_point(p(0), Vec3::new(0.0, 0.0, 0.0), 1.0, 0).unwrap();
    g.add_point(p(1), Vec3::new(5.0, 0.0, 0.0), 1.0, 0).unwrap();
    g.add_point(p(2), Vec3::new(2.5, 0.1, 0.0), 1.0, 0).unwrap();
    g.connect_points(p(0), p(2), true).unwrap();
    g.connect_points(p(2), p(1), true).unwrap();
    // Direct edge made expensive by a cost override standing in for a
    // longer physical route.
    g.connect_points(p(0), p(1), true).unwrap();
    let pos = |id: i64| match id {
        0 => Vec3::new(0.0, 0.0, 0.0),
        1 => Vec3::new(5.0, 0.0, 0.0),
        _ => Vec3::new(2.5, 0.1, 0.0),
    };
    g.set_compute_cost(move |a, b| match (a.0, b.0) {
        (0, 1) | (1, 0) => 9.0,
        _ => pos(a.0).distance(pos(b.0)),
    });

    assert_eq!(
        g.id_path(p(0), p(1), 0, false).unwrap(),
        vec![p(0), p(2), p(1)]
    );
}

#[test]
fn disabled_point_forces_detour() {
    let mut g = NavGraph::new();
    g.add_point(p(0), Vec3::new(0.0, 0.0, 0.0), 1.0, 0).unwrap();
    g.add_point(p(1), Vec3::new(5.0, 0.0, 0.0), 1.0, 0).unwrap();
    g.add_point(p(2), Vec3::new(1.0, 0.0, 0.0), 1.0, 0).unwrap();
    g.connect_points(p(0), p(1), true).unwrap();
    g.connect_points(p(0), p(2), true).unwrap();
    g.connect_points(p(2), p(1), true).unwrap();

    g.set_point_disabled(p(2), true).unwrap();
    assert_eq!(g.id_path(p(0), p(1), 0, false).unwrap(), vec![p(0), p(1)]);
}

#[test]
fn layer_filter_blocks_route_and_reports_closest() {
    let mut g = NavGraph::new();
    g.add_point(p(0), line_point(0), 1.0, 0b01).unwrap();
    g.add_point(p(1), line_point(1), 1.0, 0b10).unwrap();
    g.add_point(p(2), line_point(2), 1.0, 0b01).unwrap();
    g.connect_points(p(0), p(1), true).unwrap();
    g.connect_points(p(1), p(2), true).unwrap();

    // Point 1 is not on layer 0b01, so 2 is unreachable under the mask.
    assert!(g.id_path(p(0), p(2), 0b01, false).unwrap().is_empty());
    assert_eq!(g.proximity_id_path_of_last_call(), vec![p(0)]);

    // Without the mask the route exists.
    assert_eq!(
        g.id_path(p(0), p(2), 0, false).unwrap(),
        vec![p(0), p(1), p(2)]
    );
}

#[test]
fn no_route_reports_path_to_closest_component_point() {
    let mut g = NavGraph::new();
    g.add_point(p(0), line_point(0), 1.0, 0).unwrap();
    g.add_point(p(1), line_point(1), 1.0, 0).unwrap();
    g.add_point(p(2), line_point(10), 1.0, 0).unwrap();
    g.add_point(p(3), line_point(11), 1.0, 0).unwrap();
    g.connect_points(p(0), p(1), true).unwrap();
    g.connect_points(p(2), p(3), true).unwrap();

    assert!(g.id_path(p(0), p(3), 0, false).unwrap().is_empty());
    // Point 1 is the component's nearest approach to point 3.
    assert_eq!(g.proximity_id_path_of_last_call(), vec![p(0), p(1)]);
    assert_eq!(
        g.proximity_point_path_of_last_call(),
        vec![line_point(0), line_point(1)]
    );

    // A later successful query clears the buffers.
    assert_eq!(g.id_path(p(0), p(1), 0, false).unwrap(), vec![p(0), p(1)]);
    assert!(g.proximity_id_path_of_last_call().is_empty());
}

#[test]
fn one_way_edges_are_respected() {
    let mut g = NavGraph::new();
    g.add_point(p(0), line_point(0), 1.0, 0).unwrap();
    g.add_point(p(1), line_point(1), 1.0, 0).unwrap();
    g.connect_points(p(0), p(1), false).unwrap();

    assert_eq!(g.id_path(p(0), p(1), 0, false).unwrap(), vec![p(0), p(1)]);
    assert!(g.id_path(p(1), p(0), 0, false).unwrap().is_empty());
}

#[test]
fn weight_scale_makes_detour_expensive() {
    let mut g = NavGraph::new();
    g.add_point(p(0), Vec3::new(0.0, 0.0, 0.0), 1.0, 0).unwrap();
    g.add_point(p(1), Vec3::new(5.0, 0.0, 0.0), 1.0, 0).unwrap();
    g.add_point(p(2), Vec3::new(1.0, 0.0, 0.0), 10.0, 0).unwrap();
    g.connect_points(p(0), p(1), true).unwrap();
    g.connect_points(p(0), p(2), true).unwrap();
    g.connect_points(p(2), p(1), true).unwrap();

    // Entering point 2 costs 1 × 10; the direct segment wins.
    assert_eq!(g.id_path(p(0), p(1), 0, false).unwrap(), vec![p(0), p(1)]);
}

#[test]
fn cost_hook_redirects_the_search() {
    let mut g = NavGraph::new();
    for id in 0..3 {
        g.add_point(p(id), line_point(id), 1.0, 0).unwrap();
    }
    g.connect_points(p(0), p(1), true).unwrap();
    g.connect_points(p(1), p(2), true).unwrap();
    g.connect_points(p(0), p(2), true).unwrap();

    // By distance the direct hop 0 → 2 wins; make it prohibitive.
    g.set_compute_cost(|a, b| {
        if (a, b) == (PointId(0), PointId(2)) || (a, b) == (PointId(2), PointId(0)) {
            100.0
        } else {
            (a.0 - b.0).abs() as f32
        }
    });
    assert_eq!(
        g.id_path(p(0), p(2), 0, false).unwrap(),
        vec![p(0), p(1), p(2)]
    );
}

#[test]
fn querying_missing_points_is_an_error() {
    let mut g = NavGraph::new();
    g.add_point(p(0), Vec3::ZERO, 1.0, 0).unwrap();

    assert_eq!(
        g.id_path(p(0), p(9), 0, false),
        Err(GraphError::UnknownPoint { id: p(9) })
    );
    assert_eq!(
        g.id_path(p(9), p(0), 0, false),
        Err(GraphError::UnknownPoint { id: p(9) })
    );
}

#[test]
fn path_to_self_is_a_single_entry() {
    let mut g = NavGraph::new();
    g.add_point(p(0), Vec3::ZERO, 1.0, 0).unwrap();
    assert_eq!(g.id_path(p(0), p(0), 0, false).unwrap(), vec![p(0)]);
    assert_eq!(g.point_path(p(0), p(0), 0, false).unwrap(), vec![Vec3::ZERO]);
}

// ── Optimality against a reference Dijkstra ─────────────────────

/// Cheapest cost from `from` to `to` over enabled points, or `None`.
fn reference_dijkstra(g: &NavGraph, from: PointId, to: PointId) -> Option<f32> {
    let mut dist: HashMap<PointId, f32> = HashMap::new();
    let mut visited: HashSet<PointId> = HashSet::new();
    dist.insert(from, 0.0);

    loop {
        let u = dist
            .iter()
            .filter(|&(id, _)| !visited.contains(id))
            .min_by(|a, b| a.1.partial_cmp(b.1).expect("finite costs"))
            .map(|(id, _)| *id)?;
        if u == to {
            return dist.get(&to).copied();
        }
        visited.insert(u);
        let du = dist[&u];

        for v in g.point_connections(u).expect("point exists") {
            if g.is_point_disabled(v).expect("point exists") {
                continue;
            }
            let cost = g
                .point_position(u)
                .unwrap()
                .distance(g.point_position(v).unwrap())
                * g.point_weight_scale(v).unwrap();
            let candidate = du + cost;
            if dist.get(&v).map_or(true, |&d| candidate < d) {
                dist.insert(v, candidate);
            }
        }
    }
}

/// Total cost of a returned path, verifying each hop is a directed edge.
fn path_cost(g: &NavGraph, path: &[PointId]) -> f32 {
    path.windows(2)
        .map(|w| {
            assert!(
                g.are_points_connected(w[0], w[1], false),
                "path hop {} → {} has no edge",
                w[0],
                w[1]
            );
            g.point_position(w[0])
                .unwrap()
                .distance(g.point_position(w[1]).unwrap())
                * g.point_weight_scale(w[1]).unwrap()
        })
        .sum()
}

proptest! {
    #[test]
    fn flat_search_is_optimal(
        n in 2i64..8,
        coords in prop::collection::vec((0i32..10, 0i32..10, 0i32..10), 8),
        weights in prop::collection::vec(1u32..4, 8),
        edges in prop::collection::vec((0i64..8, 0i64..8, any::<bool>()), 0..24),
    ) {
        let mut g = NavGraph::new();
        for id in 0..n {
            let (x, y, z) = coords[id as usize];
            g.add_point(
                p(id),
                Vec3::new(x as f32, y as f32, z as f32),
                weights[id as usize] as f32,
                0,
            ).unwrap();
        }
        for (a, b, bidirectional) in edges {
            if a != b && a < n && b < n {
                g.connect_points(p(a), p(b), bidirectional).unwrap();
            }
        }

        let expected = reference_dijkstra(&g, p(0), p(n - 1));
        let path = g.id_path(p(0), p(n - 1), 0, false).unwrap();

        match expected {
            None => prop_assert!(path.is_empty(), "A* found a path Dijkstra could not"),
            Some(best) => {
                prop_assert!(!path.is_empty(), "A* missed an existing route");
                prop_assert_eq!(*path.first().unwrap(), p(0));
                prop_assert_eq!(*path.last().unwrap(), p(n - 1));
                let cost = path_cost(&g, &path);
                prop_assert!(
                    (cost - best).abs() <= 1e-3 * best.max(1.0),
                    "A* cost {} differs from optimal {}",
                    cost,
                    best
                );
            }
        }
    }
}
