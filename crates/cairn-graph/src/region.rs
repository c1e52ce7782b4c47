//! Region (super-node) records with colocated search state.

use cairn_core::{LayerMask, PointId, RegionId};
use glam::Vec3;
use indexmap::IndexSet;

/// A user-declared super-node grouping a disjoint set of points.
///
/// Carries an anchor position for region-level cost estimates, an origin
/// point used as the default entry target during the coarse search, and an
/// averaged weight scale maintained incrementally as members change.
pub(crate) struct Region {
    pub pos: Vec3,
    /// The member the coarse search aims for when entering this region.
    pub origin: Option<PointId>,
    /// Member points. Disjoint across regions.
    pub points: IndexSet<PointId>,
    /// Members whose weight scale differs from 1.
    pub weighted_points: Vec<PointId>,
    /// `1 + Σ (wᵢ − 1)/N` over the N members; pinned back to exactly 1
    /// whenever the weighted-member list empties.
    pub weight_scale: f32,
    /// Bitwise OR of the members' layers.
    pub nav_layers: LayerMask,
    /// Regions reachable from this one.
    pub neighbours: IndexSet<RegionId>,
    /// Regions that point at this one without a reverse edge.
    pub unlinked_neighbours: IndexSet<RegionId>,

    // Search state.
    /// Candidate predecessors to try during transition validation, newest
    /// prepended. Cleared whenever the region is freshly opened.
    pub prev_regions: Vec<RegionId>,
    pub prev_region: Option<RegionId>,
    pub g_score: f32,
    pub f_score: f32,
    pub open_pass: u64,
    pub closed_pass: u64,
    /// The member point through which the region is currently entered.
    pub search_point: Option<PointId>,
}

impl Region {
    pub fn new(pos: Vec3) -> Self {
        Self {
            pos,
            origin: None,
            points: IndexSet::new(),
            weighted_points: Vec::new(),
            weight_scale: 1.0,
            nav_layers: LayerMask::default(),
            neighbours: IndexSet::new(),
            unlinked_neighbours: IndexSet::new(),
            prev_regions: Vec::new(),
            prev_region: None,
            g_score: 0.0,
            f_score: 0.0,
            open_pass: 0,
            closed_pass: 0,
            search_point: None,
        }
    }
}
