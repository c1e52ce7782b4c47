//! Cost hooks and the straight-line callback.
//!
//! Four cost functions drive the searches: estimate/compute at the point
//! level and at the region level. Each defaults to Euclidean distance over
//! the stored positions; an installed override is consulted first and its
//! result returned unconditionally.

use cairn_core::{GraphError, PointCostFn, PointId, RegionCostFn, RegionId, StraightLineFn};

use crate::graph::NavGraph;

/// Storage for the four optional cost overrides.
#[derive(Default)]
pub(crate) struct CostHooks {
    pub estimate_point: Option<PointCostFn>,
    pub compute_point: Option<PointCostFn>,
    pub estimate_region: Option<RegionCostFn>,
    pub compute_region: Option<RegionCostFn>,
}

impl NavGraph {
    /// Heuristic cost between two points: the installed override, or the
    /// Euclidean distance between their positions.
    pub(crate) fn estimate_cost(&self, from: PointId, to: PointId) -> f32 {
        if let Some(hook) = &self.hooks.estimate_point {
            return hook(from, to);
        }
        match (self.points.get(&from), self.points.get(&to)) {
            (Some(a), Some(b)) => a.pos.distance(b.pos),
            _ => 0.0,
        }
    }

    /// True edge cost between two points: override, or Euclidean distance.
    pub(crate) fn compute_cost(&self, from: PointId, to: PointId) -> f32 {
        if let Some(hook) = &self.hooks.compute_point {
            return hook(from, to);
        }
        match (self.points.get(&from), self.points.get(&to)) {
            (Some(a), Some(b)) => a.pos.distance(b.pos),
            _ => 0.0,
        }
    }

    /// Heuristic cost between two regions: override, or Euclidean distance
    /// between their anchor positions.
    pub(crate) fn estimate_region_cost(&self, from: RegionId, to: RegionId) -> f32 {
        if let Some(hook) = &self.hooks.estimate_region {
            return hook(from, to);
        }
        match (self.regions.get(&from), self.regions.get(&to)) {
            (Some(a), Some(b)) => a.pos.distance(b.pos),
            _ => 0.0,
        }
    }

    /// True transition cost between two regions: override, or Euclidean
    /// distance between their anchor positions.
    pub(crate) fn compute_region_cost(&self, from: RegionId, to: RegionId) -> f32 {
        if let Some(hook) = &self.hooks.compute_region {
            return hook(from, to);
        }
        match (self.regions.get(&from), self.regions.get(&to)) {
            (Some(a), Some(b)) => a.pos.distance(b.pos),
            _ => 0.0,
        }
    }

    /// Override the point-level heuristic. Must be admissible for optimal
    /// results; a non-admissible heuristic only degrades optimality. The
    /// hook must not mutate the graph.
    pub fn set_estimate_cost(
        &mut self,
        hook: impl Fn(PointId, PointId) -> f32 + Send + Sync + 'static,
    ) {
        self.hooks.estimate_point = Some(Box::new(hook));
    }

    /// Override the point-level true edge cost.
    pub fn set_compute_cost(
        &mut self,
        hook: impl Fn(PointId, PointId) -> f32 + Send + Sync + 'static,
    ) {
        self.hooks.compute_point = Some(Box::new(hook));
    }

    /// Override the region-level heuristic.
    pub fn set_estimate_region_cost(
        &mut self,
        hook: impl Fn(RegionId, RegionId) -> f32 + Send + Sync + 'static,
    ) {
        self.hooks.estimate_region = Some(Box::new(hook));
    }

    /// Override the region-level transition cost.
    pub fn set_compute_region_cost(
        &mut self,
        hook: impl Fn(RegionId, RegionId) -> f32 + Send + Sync + 'static,
    ) {
        self.hooks.compute_region = Some(Box::new(hook));
    }

    /// Install the straight-line callback consulted by the coarse search's
    /// transition validator (see [`cairn_core::StraightLineFn`]).
    ///
    /// # Errors
    ///
    /// Installation requires the probe points `0` and `1` to exist.
    pub fn set_straight_line_function(
        &mut self,
        hook: impl Fn(PointId, PointId) -> Vec<PointId> + Send + Sync + 'static,
    ) -> Result<(), GraphError> {
        for probe in [PointId(0), PointId(1)] {
            if !self.points.contains_key(&probe) {
                return Err(GraphError::StraightLineProbeMissing { id: probe });
            }
        }
        self.straight_line = Some(Box::new(hook) as StraightLineFn);
        Ok(())
    }
}
