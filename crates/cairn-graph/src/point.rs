//! Graph vertex records with colocated search state.

use cairn_core::{LayerMask, PointId, RegionId};
use glam::Vec3;
use indexmap::{IndexMap, IndexSet};

/// A vertex in the navigation graph.
///
/// Search-state fields live on the point itself so a query allocates no
/// per-visit map; the `open_pass`/`closed_pass` epochs distinguish fresh
/// state from leftovers of earlier queries.
pub(crate) struct Point {
    pub pos: Vec3,
    /// Multiplier applied to the cost of every edge *into* this point.
    pub weight_scale: f32,
    pub enabled: bool,
    pub nav_layers: LayerMask,
    /// The owning region, if any. A point belongs to at most one region.
    pub region: Option<RegionId>,
    /// Ids reachable from this point (outgoing edges).
    pub neighbors: IndexSet<PointId>,
    /// Ids that point at this one without a reverse edge.
    pub unlinked_neighbours: IndexSet<PointId>,

    /// Per-direction entry predecessors, keyed by the id of the region the
    /// path came *from* (`None` for the query's start region). Written by
    /// the transition validator, consumed and cleared by coarse
    /// reconstruction.
    pub region_entry: IndexMap<Option<RegionId>, PointId>,

    // Search state.
    pub prev_point: Option<PointId>,
    pub g_score: f32,
    pub f_score: f32,
    pub open_pass: u64,
    pub closed_pass: u64,

    /// Cumulative true cost from the top-level query's start. Survives the
    /// recursive sub-searches of coarse mode so the closest-reached point
    /// keeps a meaningful score.
    pub abs_g_score: f32,
    /// Heuristic from this point to the top-level query's goal.
    pub abs_f_score: f32,
}

impl Point {
    pub fn new(pos: Vec3, weight_scale: f32, nav_layers: LayerMask) -> Self {
        Self {
            pos,
            weight_scale,
            enabled: true,
            nav_layers,
            region: None,
            neighbors: IndexSet::new(),
            unlinked_neighbours: IndexSet::new(),
            region_entry: IndexMap::new(),
            prev_point: None,
            g_score: 0.0,
            f_score: 0.0,
            open_pass: 0,
            closed_pass: 0,
            abs_g_score: 0.0,
            abs_f_score: 0.0,
        }
    }
}
