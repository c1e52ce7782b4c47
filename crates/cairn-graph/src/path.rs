//! Query entry points and path reconstruction.
//!
//! On success the path is back-traced from the goal: flat mode chases the
//! predecessor chain directly; coarse mode first resolves each region
//! transition by consuming the per-direction entry maps, then applies a
//! cost-aware one-hop peephole over the resulting chain. On failure the
//! same machinery traces the path to the closest reached point into the
//! proximity buffers and the primary result is empty.

use cairn_core::{GraphError, LayerMask, PointId};
use glam::Vec3;
use tracing::warn;

use crate::graph::NavGraph;

impl NavGraph {
    /// Shortest path between two points as a sequence of ids.
    ///
    /// `relevant_layers` filters traversable points (zero means no
    /// filtering). With `use_regions` set, both points must belong to
    /// regions and the search plans across regions first; when both share a
    /// region the query downgrades to the flat search.
    ///
    /// An empty result means no route exists; the path to the closest
    /// reached point is then available from
    /// [`NavGraph::proximity_id_path_of_last_call`].
    pub fn id_path(
        &mut self,
        from: PointId,
        to: PointId,
        relevant_layers: u32,
        use_regions: bool,
    ) -> Result<Vec<PointId>, GraphError> {
        let (ids, found) = self.query_path(from, to, relevant_layers, use_regions)?;
        if !found {
            return Ok(Vec::new());
        }
        Ok(ids)
    }

    /// Shortest path between two points as a sequence of positions.
    ///
    /// Identical to [`NavGraph::id_path`] with ids mapped to positions.
    pub fn point_path(
        &mut self,
        from: PointId,
        to: PointId,
        relevant_layers: u32,
        use_regions: bool,
    ) -> Result<Vec<Vec3>, GraphError> {
        let (ids, found) = self.query_path(from, to, relevant_layers, use_regions)?;
        if !found {
            return Ok(Vec::new());
        }
        Ok(self.positions_of(&ids))
    }

    fn positions_of(&self, ids: &[PointId]) -> Vec<Vec3> {
        ids.iter()
            .filter_map(|id| self.points.get(id).map(|p| p.pos))
            .collect()
    }

    /// Shared query body: validate, solve, reconstruct. Returns the id
    /// chain and whether it is a real route (as opposed to the traced
    /// closest-reached fallback already stored in the proximity buffers).
    fn query_path(
        &mut self,
        from: PointId,
        to: PointId,
        relevant_layers: u32,
        mut use_regions: bool,
    ) -> Result<(Vec<PointId>, bool), GraphError> {
        if !self.points.contains_key(&from) {
            return Err(GraphError::UnknownPoint { id: from });
        }
        if !self.points.contains_key(&to) {
            return Err(GraphError::UnknownPoint { id: to });
        }

        if use_regions {
            let from_region = self.points.get(&from).and_then(|p| p.region);
            if from_region.is_none() {
                return Err(GraphError::PointNotInRegion { id: from });
            }
            let to_region = self.points.get(&to).and_then(|p| p.region);
            if to_region.is_none() {
                return Err(GraphError::PointNotInRegion { id: to });
            }
            // The coarse search needs at least one region transition.
            if from_region == to_region {
                use_regions = false;
            }
        }

        if from == to {
            return Ok((vec![from], true));
        }

        let mask = LayerMask::new(relevant_layers)?;
        let found = self.solve(from, to, mask, use_regions);

        let end = if found {
            to
        } else {
            match self.closest_reached {
                None => return Ok((Vec::new(), false)),
                Some(closest) => {
                    warn!(%closest, "no route; tracing path to closest reached point");
                    closest
                }
            }
        };

        let ids = self.trace_path(from, end, use_regions);

        if !found {
            self.last_point_path = self.positions_of(&ids);
            self.last_id_path = ids.clone();
            return Ok((ids, false));
        }
        Ok((ids, true))
    }

    /// Back-trace the chain from `end` to `begin` and return it in forward
    /// order. In coarse mode the region chain is resolved first and the
    /// one-hop peephole is applied during the walk.
    fn trace_path(&mut self, begin: PointId, end: PointId, use_regions: bool) -> Vec<PointId> {
        let start = if use_regions {
            self.resolve_region_chain(begin, end)
        } else {
            begin
        };

        let mut reversed = Vec::new();
        let mut p = end;
        loop {
            reversed.push(p);
            if p == start {
                break;
            }
            let Some(mid) = self.points.get(&p).and_then(|q| q.prev_point) else {
                break;
            };
            let mut next = mid;
            if use_regions && mid != start {
                // Region transitions route through each region's entry
                // point, which often bends the chain; drop the middle node
                // when a direct edge is present and no more expensive.
                if let Some(skip) = self.points.get(&mid).and_then(|q| q.prev_point) {
                    if self.has_directed_edge(skip, p) && self.shortcut_not_costlier(skip, mid, p)
                    {
                        next = skip;
                    }
                }
            }
            p = next;
        }
        reversed.reverse();
        reversed
    }

    /// Whether the direct edge `skip → p` costs no more than the two-edge
    /// chain `skip → mid → p` it would replace.
    fn shortcut_not_costlier(&self, skip: PointId, mid: PointId, p: PointId) -> bool {
        let w_mid = self.points.get(&mid).map_or(1.0, |q| q.weight_scale);
        let w_p = self.points.get(&p).map_or(1.0, |q| q.weight_scale);
        let direct = self.compute_cost(skip, p) * w_p;
        let through = self.compute_cost(skip, mid) * w_mid + self.compute_cost(mid, p) * w_p;
        direct <= through
    }

    /// Resolve the coarse chain into `prev_point` links by walking the
    /// region chain backward and consuming each point's per-direction
    /// entry-predecessor, keyed by the region one step further back.
    ///
    /// Returns the effective start of the chain: `begin` when the walk
    /// resolves fully, otherwise the point at which it stopped (possible
    /// only when tracing the fallback path of a failed query).
    fn resolve_region_chain(&mut self, begin: PointId, end: PointId) -> PointId {
        let mut p = end;
        let mut current = self.points.get(&end).and_then(|q| q.region);

        while p != begin {
            let Some(region_id) = current else {
                return p;
            };
            let prev = self.regions.get(&region_id).and_then(|r| r.prev_region);

            // The sub-path that entered `region_id` may cross regions
            // outside the validated chain, so walk by entry map rather
            // than region identity until the previous region is reached.
            while p != begin && self.points.get(&p).and_then(|q| q.region) != prev {
                let entry = match self.points.get_mut(&p) {
                    Some(q) => {
                        let entry = q.region_entry.get(&prev).copied();
                        q.region_entry.clear();
                        entry
                    }
                    None => None,
                };
                let Some(pp) = entry else {
                    return p;
                };
                if let Some(q) = self.points.get_mut(&p) {
                    q.prev_point = Some(pp);
                }
                p = pp;
            }
            current = prev;
        }
        p
    }
}
