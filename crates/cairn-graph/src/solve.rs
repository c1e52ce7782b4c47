//! The flat and coarse search engines.
//!
//! Flat mode is classic A* over points keyed on `f_score`, with epoch
//! counters distinguishing fresh search state from leftovers of earlier
//! queries. Coarse mode runs an outer A* over regions; each region pop
//! validates the transition from a predecessor region by realizing an
//! actual point-level sub-path, via the straight-line callback when one is
//! installed, otherwise via a flat search restricted to the two adjacent
//! regions.

use cairn_core::{LayerMask, PointId, RegionId};
use indexmap::IndexMap;
use smallvec::SmallVec;
use tracing::{debug, trace};

use crate::graph::NavGraph;
use crate::heap;
use crate::point::Point;
use crate::region::Region;

/// Heap comparator: whether point `a` sorts below point `b`.
///
/// Lower `f_score` wins; on equal `f_score` the point with the larger
/// `g_score` — the one farther from the start — is preferred.
fn point_worse(points: &IndexMap<PointId, Point>, a: PointId, b: PointId) -> bool {
    let (Some(pa), Some(pb)) = (points.get(&a), points.get(&b)) else {
        return false;
    };
    if pa.f_score > pb.f_score {
        true
    } else if pa.f_score < pb.f_score {
        false
    } else {
        pa.g_score < pb.g_score
    }
}

/// Region counterpart of [`point_worse`], same tie-break.
fn region_worse(regions: &IndexMap<RegionId, Region>, a: RegionId, b: RegionId) -> bool {
    let (Some(ra), Some(rb)) = (regions.get(&a), regions.get(&b)) else {
        return false;
    };
    if ra.f_score > rb.f_score {
        true
    } else if ra.f_score < rb.f_score {
        false
    } else {
        ra.g_score < rb.g_score
    }
}

impl NavGraph {
    /// Run a query between two existing points. Clears the proximity
    /// buffers, dispatches to the requested mode, and reports whether a
    /// route was found.
    pub(crate) fn solve(
        &mut self,
        begin: PointId,
        end: PointId,
        mask: LayerMask,
        use_regions: bool,
    ) -> bool {
        self.last_id_path.clear();
        self.last_point_path.clear();
        self.closest_reached = None;

        if use_regions {
            return self.solve_regions(begin, end, mask);
        }

        self.pass += 1;
        let pass = self.pass;

        match self.points.get(&end) {
            Some(p) if p.enabled => {}
            _ => return false,
        }

        let h = self.estimate_cost(begin, end);
        {
            let Some(b) = self.points.get_mut(&begin) else {
                return false;
            };
            b.g_score = 0.0;
            b.f_score = h;
            b.abs_g_score = 0.0;
            b.abs_f_score = h;
        }

        let mut open = vec![begin];
        let mut found = false;

        while let Some(&p_id) = open.first() {
            self.track_closest(p_id);
            if p_id == end {
                found = true;
                break;
            }
            heap::pop_root(&mut open, |a, b| point_worse(&self.points, a, b));
            if let Some(p) = self.points.get_mut(&p_id) {
                p.closed_pass = pass;
            }

            let (p_g, neighbor_ids) = match self.points.get(&p_id) {
                Some(p) => (
                    p.g_score,
                    p.neighbors.iter().copied().collect::<SmallVec<[PointId; 8]>>(),
                ),
                None => continue,
            };

            for e_id in neighbor_ids {
                let Some(e) = self.points.get(&e_id) else {
                    continue;
                };
                if !e.enabled || e.closed_pass == pass || !mask.matches(e.nav_layers) {
                    continue;
                }
                let weight = e.weight_scale;
                let was_open = e.open_pass == pass;
                let g_old = e.g_score;

                let tentative = p_g + self.compute_cost(p_id, e_id) * weight;
                if was_open && tentative >= g_old {
                    continue;
                }
                let h = self.estimate_cost(e_id, end);
                let Some(e) = self.points.get_mut(&e_id) else {
                    continue;
                };
                if !was_open {
                    e.open_pass = pass;
                }
                e.prev_point = Some(p_id);
                e.g_score = tentative;
                e.f_score = tentative + h;
                e.abs_g_score = tentative;
                e.abs_f_score = h;

                if !was_open {
                    heap::push(&mut open, e_id, |a, b| point_worse(&self.points, a, b));
                } else {
                    heap::decrease(&mut open, e_id, |a, b| point_worse(&self.points, a, b));
                }
            }
        }
        found
    }

    /// Record `p` as the closest reached point when its absolute scores
    /// beat the current holder: smaller `abs_f_score`, ties to the smaller
    /// `abs_g_score`.
    fn track_closest(&mut self, p_id: PointId) {
        let Some(p) = self.points.get(&p_id) else {
            return;
        };
        let (abs_f, abs_g) = (p.abs_f_score, p.abs_g_score);
        let replace = match self.closest_reached.and_then(|c| self.points.get(&c)) {
            None => true,
            Some(c) => {
                c.abs_f_score > abs_f || (c.abs_f_score >= abs_f && c.abs_g_score > abs_g)
            }
        };
        if replace {
            self.closest_reached = Some(p_id);
        }
    }

    /// The outer A* over regions.
    fn solve_regions(&mut self, begin: PointId, end: PointId, mask: LayerMask) -> bool {
        self.region_pass += 1;
        let pass = self.region_pass;

        match self.points.get(&end) {
            Some(p) if p.enabled && mask.matches(p.nav_layers) => {}
            _ => return false,
        }

        let Some(begin_region) = self.points.get(&begin).and_then(|p| p.region) else {
            return false;
        };
        let Some(end_region) = self.points.get(&end).and_then(|p| p.region) else {
            return false;
        };

        debug!(from = %begin_region, to = %end_region, "coarse search over regions");

        let h = self.estimate_region_cost(begin_region, end_region);
        {
            let Some(r) = self.regions.get_mut(&begin_region) else {
                return false;
            };
            r.search_point = Some(begin);
            r.g_score = 0.0;
            r.f_score = h;
            r.prev_region = None;
            r.prev_regions.clear();
        }

        let mut open = vec![begin_region];
        let mut found = false;

        while !open.is_empty() {
            let Some(o_id) = heap::pop_root(&mut open, |a, b| region_worse(&self.regions, a, b))
            else {
                break;
            };

            let candidates = match self.regions.get_mut(&o_id) {
                Some(r) => std::mem::take(&mut r.prev_regions),
                None => continue,
            };

            if candidates.is_empty() {
                // Only the start region is admitted without predecessors.
                if let Some(r) = self.regions.get_mut(&o_id) {
                    r.closed_pass = pass;
                }
            } else {
                let reach_target = o_id == end_region;
                let target = if reach_target {
                    Some(end)
                } else {
                    self.regions.get(&o_id).and_then(|r| r.origin)
                };

                let mut connection = None;
                let mut valid_prev = None;
                if let Some(target) = target {
                    for prev_id in candidates {
                        let (search_point, prev_prev) = match self.regions.get(&prev_id) {
                            Some(prev) => (prev.search_point, prev.prev_region),
                            None => continue,
                        };
                        let Some(search_point) = search_point else {
                            continue;
                        };
                        trace!(region = %o_id, from = %prev_id, "validating region transition");
                        if let Some(entry) = self.can_path(
                            search_point,
                            target,
                            mask,
                            prev_id,
                            o_id,
                            reach_target,
                            prev_prev,
                            begin,
                            end,
                        ) {
                            connection = Some(entry);
                            valid_prev = Some(prev_id);
                            break;
                        }
                    }
                }

                let Some(entry) = connection else {
                    // Un-open the region: every candidate failed, but a
                    // future neighbor relaxation re-admits it with a fresh
                    // predecessor.
                    trace!(region = %o_id, "no predecessor reaches region, un-opening");
                    if let Some(r) = self.regions.get_mut(&o_id) {
                        r.open_pass = r.open_pass.saturating_sub(1);
                    }
                    continue;
                };
                if let Some(r) = self.regions.get_mut(&o_id) {
                    r.prev_region = valid_prev;
                    r.search_point = Some(entry);
                    r.closed_pass = pass;
                }
            }

            if o_id == end_region {
                found = true;
                break;
            }

            let (o_g, neighbor_ids) = match self.regions.get(&o_id) {
                Some(r) => (
                    r.g_score,
                    r.neighbours.iter().copied().collect::<SmallVec<[RegionId; 8]>>(),
                ),
                None => continue,
            };

            for oe_id in neighbor_ids {
                let Some(oe) = self.regions.get(&oe_id) else {
                    continue;
                };
                if oe.closed_pass == pass || !mask.matches(oe.nav_layers) {
                    continue;
                }
                let weight = oe.weight_scale;
                let was_open = oe.open_pass == pass;
                let g_old = oe.g_score;

                let tentative = o_g + self.compute_region_cost(o_id, oe_id) * weight;
                if was_open && tentative >= g_old {
                    continue;
                }
                let h = self.estimate_region_cost(oe_id, end_region);
                let Some(oe) = self.regions.get_mut(&oe_id) else {
                    continue;
                };
                if !was_open {
                    oe.open_pass = pass;
                    oe.prev_regions.clear();
                }
                // Prepend so the newest candidate is validated first.
                oe.prev_regions.insert(0, o_id);
                oe.g_score = tentative;
                oe.f_score = tentative + h;

                if !was_open {
                    heap::push(&mut open, oe_id, |a, b| region_worse(&self.regions, a, b));
                } else {
                    heap::decrease(&mut open, oe_id, |a, b| region_worse(&self.regions, a, b));
                }
            }
        }

        debug!(found, "coarse search finished");
        found
    }

    /// Try to realize the transition from `begin` (the entry point of the
    /// predecessor region) into `end_region`, returning the id of the point
    /// at which the transition enters it.
    ///
    /// `target` is the query goal when `end_region` is the goal region and
    /// `reach_target` is set; otherwise the region's origin, and any point
    /// of `end_region` suffices. `prev_region` keys the per-direction entry
    /// map used by coarse reconstruction.
    #[allow(clippy::too_many_arguments)]
    fn can_path(
        &mut self,
        begin: PointId,
        target: PointId,
        mask: LayerMask,
        begin_region: RegionId,
        end_region: RegionId,
        reach_target: bool,
        prev_region: Option<RegionId>,
        absolute_begin: PointId,
        absolute_end: PointId,
    ) -> Option<PointId> {
        // Single-member destination shortcut: reject without searching when
        // the only point is disabled or a dead end.
        {
            let r = self.regions.get(&end_region)?;
            if r.points.len() == 1 {
                let only = *r.points.first()?;
                let p = self.points.get(&only)?;
                if !p.enabled || p.neighbors.is_empty() {
                    return None;
                }
            }
        }

        // Seed the absolute scores at the very first sub-search so the
        // closest-reached point is meaningful across the whole query.
        if begin == absolute_begin {
            let h = self.estimate_cost(begin, absolute_end);
            if let Some(p) = self.points.get_mut(&begin) {
                p.abs_g_score = 0.0;
                p.abs_f_score = h;
            }
        }

        let mut found = None;
        if self.straight_line.is_some() {
            found = self.walk_straight_line(
                begin,
                target,
                mask,
                begin_region,
                end_region,
                reach_target,
                prev_region,
                absolute_end,
            );
        }
        if found.is_none() {
            found = self.restricted_solve(
                begin,
                target,
                mask,
                begin_region,
                end_region,
                reach_target,
                prev_region,
                absolute_end,
            );
        }
        found
    }

    /// Walk the valid prefix of the straight-line callback's sequence.
    ///
    /// A prefix step is valid while the point exists, the previous point
    /// has a directed edge to it, and the point is enabled,
    /// layer-compatible, and unit-weight. The walk may cross regions
    /// outside the `{begin, end}` pair; reconstruction handles that by
    /// chasing the per-direction entry map rather than region identity.
    #[allow(clippy::too_many_arguments)]
    fn walk_straight_line(
        &mut self,
        begin: PointId,
        target: PointId,
        mask: LayerMask,
        begin_region: RegionId,
        end_region: RegionId,
        reach_target: bool,
        prev_region: Option<RegionId>,
        absolute_end: PointId,
    ) -> Option<PointId> {
        let sequence = match &self.straight_line {
            Some(hook) => hook(begin, target),
            None => return None,
        };
        if sequence.first() != Some(&begin) {
            return None;
        }

        let mut found = None;
        let mut prev_id = begin;
        for &p_id in sequence.iter().skip(1) {
            let Some(p) = self.points.get(&p_id) else {
                break;
            };
            let enabled = p.enabled;
            let supported = mask.matches(p.nav_layers);
            let weight = p.weight_scale;
            let p_region = p.region;

            if !self.has_directed_edge(prev_id, p_id) {
                break;
            }
            if !enabled || !supported || weight != 1.0 {
                break;
            }

            let cost = self.compute_cost(prev_id, p_id);
            let prev_abs_g = self
                .points
                .get(&prev_id)
                .map_or(0.0, |q| q.abs_g_score);
            let h = self.estimate_cost(p_id, absolute_end);

            let Some(p) = self.points.get_mut(&p_id) else {
                break;
            };
            p.abs_g_score = prev_abs_g + cost * weight;
            p.abs_f_score = h;
            if p_region == Some(begin_region) {
                p.region_entry.insert(prev_region, prev_id);
            } else {
                p.region_entry.insert(Some(begin_region), prev_id);
            }
            self.track_closest(p_id);

            if p_region == Some(end_region) {
                if reach_target {
                    if p_id == target {
                        found = Some(p_id);
                        break;
                    }
                } else {
                    found = Some(p_id);
                    break;
                }
            }
            prev_id = p_id;
        }
        found
    }

    /// Flat A* restricted to the union of two adjacent regions, populating
    /// the per-direction entry map for coarse reconstruction.
    #[allow(clippy::too_many_arguments)]
    fn restricted_solve(
        &mut self,
        begin: PointId,
        target: PointId,
        mask: LayerMask,
        begin_region: RegionId,
        end_region: RegionId,
        reach_target: bool,
        prev_region: Option<RegionId>,
        absolute_end: PointId,
    ) -> Option<PointId> {
        self.pass += 1;
        let pass = self.pass;

        let h = self.estimate_cost(begin, target);
        {
            let p = self.points.get_mut(&begin)?;
            p.g_score = 0.0;
            p.f_score = h;
        }

        let mut open = vec![begin];

        while let Some(&p_id) = open.first() {
            self.track_closest(p_id);

            let p_region = self.points.get(&p_id).and_then(|p| p.region);
            if p_region == Some(end_region) {
                if reach_target {
                    if p_id == target {
                        return Some(p_id);
                    }
                } else {
                    return Some(p_id);
                }
            }

            heap::pop_root(&mut open, |a, b| point_worse(&self.points, a, b));
            if let Some(p) = self.points.get_mut(&p_id) {
                p.closed_pass = pass;
            }

            let (p_g, p_abs_g, neighbor_ids) = match self.points.get(&p_id) {
                Some(p) => (
                    p.g_score,
                    p.abs_g_score,
                    p.neighbors.iter().copied().collect::<SmallVec<[PointId; 8]>>(),
                ),
                None => continue,
            };

            for e_id in neighbor_ids {
                let Some(e) = self.points.get(&e_id) else {
                    continue;
                };
                let e_region = e.region;
                let in_scope =
                    e_region == Some(begin_region) || e_region == Some(end_region);
                if !e.enabled || e.closed_pass == pass || !mask.matches(e.nav_layers) || !in_scope
                {
                    continue;
                }
                let weight = e.weight_scale;
                let was_open = e.open_pass == pass;
                let g_old = e.g_score;

                let cost = self.compute_cost(p_id, e_id);
                let tentative = p_g + cost * weight;
                if was_open && tentative >= g_old {
                    continue;
                }

                let h = self.estimate_cost(e_id, target);
                let abs_h = self.estimate_cost(e_id, absolute_end);
                let entry_key = if e_region == Some(end_region) {
                    Some(begin_region)
                } else {
                    prev_region
                };

                let Some(e) = self.points.get_mut(&e_id) else {
                    continue;
                };
                if !was_open {
                    e.open_pass = pass;
                }
                e.region_entry.insert(entry_key, p_id);
                e.prev_point = Some(p_id);
                e.g_score = tentative;
                e.f_score = tentative + h;
                e.abs_g_score = p_abs_g + cost * weight;
                e.abs_f_score = abs_h;

                if !was_open {
                    heap::push(&mut open, e_id, |a, b| point_worse(&self.points, a, b));
                } else {
                    heap::decrease(&mut open, e_id, |a, b| point_worse(&self.points, a, b));
                }
            }
        }
        None
    }
}
