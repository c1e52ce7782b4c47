//! The navigation graph store.
//!
//! Owns the points, regions, and both segment sets, and enforces the
//! structural invariants under mutation: segment direction bits mirror the
//! endpoint neighbor sets, region membership stays disjoint, and region
//! layer masks and averaged weights track their members.

use cairn_core::{GraphError, LayerMask, PointId, RegionId};
use glam::Vec3;
use indexmap::IndexMap;
use std::fmt;

use crate::oracle::CostHooks;
use crate::point::Point;
use crate::region::Region;
use crate::segment::{Direction, SegmentKey};

/// A weighted directed graph in 3-D space with hierarchical A* queries.
///
/// Points are inserted with caller-chosen ids, positions, optional weight
/// multipliers, and navigation layer masks, then connected by directed or
/// bidirectional segments. Points may be grouped into disjoint regions to
/// enable the coarse search mode of [`NavGraph::id_path`] /
/// [`NavGraph::point_path`].
///
/// A graph instance is single-threaded: queries mutate per-node search
/// state, so they take `&mut self`.
///
/// # Examples
///
/// ```
/// use cairn_graph::NavGraph;
/// use cairn_core::PointId;
/// use glam::Vec3;
///
/// let mut graph = NavGraph::new();
/// graph.add_point(PointId(0), Vec3::ZERO, 1.0, 0).unwrap();
/// graph.add_point(PointId(1), Vec3::new(1.0, 0.0, 0.0), 1.0, 0).unwrap();
/// graph.connect_points(PointId(0), PointId(1), true).unwrap();
///
/// let path = graph.id_path(PointId(0), PointId(1), 0, false).unwrap();
/// assert_eq!(path, vec![PointId(0), PointId(1)]);
/// ```
pub struct NavGraph {
    pub(crate) points: IndexMap<PointId, Point>,
    pub(crate) regions: IndexMap<RegionId, Region>,
    pub(crate) segments: IndexMap<SegmentKey<PointId>, Direction>,
    pub(crate) region_segments: IndexMap<SegmentKey<RegionId>, Direction>,

    /// Advisory hint for [`NavGraph::available_point_id`]; set to the last
    /// removed id.
    pub(crate) last_free_id: PointId,

    /// Point-search epoch, bumped once per flat search (including the
    /// restricted sub-searches of coarse mode).
    pub(crate) pass: u64,
    /// Region-search epoch, bumped once per coarse query.
    pub(crate) region_pass: u64,

    pub(crate) hooks: CostHooks,
    pub(crate) straight_line: Option<cairn_core::StraightLineFn>,

    pub(crate) last_id_path: Vec<PointId>,
    pub(crate) last_point_path: Vec<Vec3>,
    pub(crate) closest_reached: Option<PointId>,
}

impl NavGraph {
    /// Create an empty graph.
    pub fn new() -> Self {
        Self {
            points: IndexMap::new(),
            regions: IndexMap::new(),
            segments: IndexMap::new(),
            region_segments: IndexMap::new(),
            last_free_id: PointId(0),
            pass: 1,
            region_pass: 1,
            hooks: CostHooks::default(),
            straight_line: None,
            last_id_path: Vec::new(),
            last_point_path: Vec::new(),
            closest_reached: None,
        }
    }

    fn try_point(&self, id: PointId) -> Result<&Point, GraphError> {
        self.points.get(&id).ok_or(GraphError::UnknownPoint { id })
    }

    fn try_point_mut(&mut self, id: PointId) -> Result<&mut Point, GraphError> {
        self.points
            .get_mut(&id)
            .ok_or(GraphError::UnknownPoint { id })
    }

    /// Whether a directed edge `from → to` exists.
    pub(crate) fn has_directed_edge(&self, from: PointId, to: PointId) -> bool {
        let (key, forward) = SegmentKey::new(from, to);
        self.segments
            .get(&key)
            .is_some_and(|d| d.contains(forward))
    }

    // ── Points ──────────────────────────────────────────────────

    /// Insert a point, or update it in place if `id` already exists.
    ///
    /// Updating overwrites the position and routes the weight and layer
    /// values through [`NavGraph::set_point_weight_scale`] and
    /// [`NavGraph::set_point_layers_value`], so an owning region is updated
    /// or removed per their contracts.
    ///
    /// # Errors
    ///
    /// Rejects negative ids, weight scales below zero, and layer values
    /// outside `[0, 2³¹ − 1)`.
    pub fn add_point(
        &mut self,
        id: PointId,
        pos: Vec3,
        weight_scale: f32,
        layers: u32,
    ) -> Result<(), GraphError> {
        if id.0 < 0 {
            return Err(GraphError::NegativeId { id: id.0 });
        }
        if weight_scale < 0.0 {
            return Err(GraphError::NegativeWeight {
                weight: weight_scale,
            });
        }
        let mask = LayerMask::new(layers)?;

        if self.points.contains_key(&id) {
            if let Some(p) = self.points.get_mut(&id) {
                p.pos = pos;
            }
            self.set_point_weight_scale(id, weight_scale)?;
            self.set_point_layers_value(id, layers)?;
        } else {
            self.points.insert(id, Point::new(pos, weight_scale, mask));
        }
        Ok(())
    }

    /// Whether a point with `id` exists.
    pub fn has_point(&self, id: PointId) -> bool {
        self.points.contains_key(&id)
    }

    /// Position of the point.
    pub fn point_position(&self, id: PointId) -> Result<Vec3, GraphError> {
        Ok(self.try_point(id)?.pos)
    }

    /// Move the point. Region anchors are independent and unaffected.
    pub fn set_point_position(&mut self, id: PointId, pos: Vec3) -> Result<(), GraphError> {
        self.try_point_mut(id)?.pos = pos;
        Ok(())
    }

    /// Weight multiplier applied to edges entering the point.
    pub fn point_weight_scale(&self, id: PointId) -> Result<f32, GraphError> {
        Ok(self.try_point(id)?.weight_scale)
    }

    /// Update the point's weight scale.
    ///
    /// If a region owns the point, the region's averaged weight is adjusted
    /// incrementally: the old contribution `(old − 1)/N` is subtracted and,
    /// when the new weight differs from 1, `(new − 1)/N` is added. A region
    /// left with no weighted member is pinned back to exactly 1 so repeated
    /// updates cannot accumulate floating-point drift.
    pub fn set_point_weight_scale(
        &mut self,
        id: PointId,
        weight_scale: f32,
    ) -> Result<(), GraphError> {
        let p = self.try_point_mut(id)?;
        if weight_scale < 0.0 {
            return Err(GraphError::NegativeWeight {
                weight: weight_scale,
            });
        }
        let original = p.weight_scale;
        p.weight_scale = weight_scale;
        let owner = p.region;

        if let Some(region_id) = owner {
            if let Some(region) = self.regions.get_mut(&region_id) {
                let member_count = region.points.len() as f32;
                region.weight_scale -= (original - 1.0) / member_count;
                region.weighted_points.retain(|&m| m != id);

                if weight_scale != 1.0 {
                    region.weighted_points.push(id);
                    region.weight_scale += (weight_scale - 1.0) / member_count;
                } else if region.weighted_points.is_empty() {
                    region.weight_scale = 1.0;
                }
            }
        }
        Ok(())
    }

    /// Remove the point, severing every incident segment and neighbor
    /// back-reference. If a region owns the point, that region is removed
    /// first. The removed id becomes the next-free-id hint.
    pub fn remove_point(&mut self, id: PointId) -> Result<(), GraphError> {
        let p = self.try_point(id)?;
        let incident: Vec<PointId> = p
            .neighbors
            .iter()
            .chain(p.unlinked_neighbours.iter())
            .copied()
            .collect();
        let owner = p.region;

        for other_id in incident {
            let (key, _) = SegmentKey::new(id, other_id);
            self.segments.shift_remove(&key);
            if let Some(other) = self.points.get_mut(&other_id) {
                other.neighbors.shift_remove(&id);
                other.unlinked_neighbours.shift_remove(&id);
            }
        }

        if let Some(region_id) = owner {
            self.remove_region(region_id)?;
        }

        self.points.shift_remove(&id);
        self.last_free_id = id;
        Ok(())
    }

    /// Ids reachable from the point over outgoing edges.
    pub fn point_connections(&self, id: PointId) -> Result<Vec<PointId>, GraphError> {
        Ok(self.try_point(id)?.neighbors.iter().copied().collect())
    }

    /// All point ids, in insertion order.
    pub fn point_ids(&self) -> Vec<PointId> {
        self.points.keys().copied().collect()
    }

    /// Disable or re-enable the point. Disabled points are skipped by
    /// searches and by [`NavGraph::closest_point`].
    pub fn set_point_disabled(&mut self, id: PointId, disabled: bool) -> Result<(), GraphError> {
        self.try_point_mut(id)?.enabled = !disabled;
        Ok(())
    }

    /// Whether the point is disabled.
    pub fn is_point_disabled(&self, id: PointId) -> Result<bool, GraphError> {
        Ok(!self.try_point(id)?.enabled)
    }

    // ── Layers ──────────────────────────────────────────────────

    /// Set or clear a single layer bit on the point.
    ///
    /// If a region owns the point, that region is removed in its entirety:
    /// its layer OR can no longer be maintained without rescanning every
    /// member.
    pub fn set_point_layer(
        &mut self,
        id: PointId,
        layer_index: u32,
        enabled: bool,
    ) -> Result<(), GraphError> {
        let p = self.try_point_mut(id)?;
        p.nav_layers = p.nav_layers.with_bit(layer_index, enabled)?;
        let owner = p.region;
        if let Some(region_id) = owner {
            self.remove_region(region_id)?;
        }
        Ok(())
    }

    /// Replace the point's whole layer mask. Removes an owning region, as
    /// [`NavGraph::set_point_layer`] does.
    pub fn set_point_layers_value(&mut self, id: PointId, layers: u32) -> Result<(), GraphError> {
        let p = self.try_point_mut(id)?;
        let mask = LayerMask::new(layers)?;
        p.nav_layers = mask;
        let owner = p.region;
        if let Some(region_id) = owner {
            self.remove_region(region_id)?;
        }
        Ok(())
    }

    /// Whether the point participates in the layer at `layer_index`.
    pub fn point_layer(&self, id: PointId, layer_index: u32) -> Result<bool, GraphError> {
        let p = self.try_point(id)?;
        if layer_index >= LayerMask::LAYER_COUNT {
            return Err(GraphError::LayerIndexOutOfRange { index: layer_index });
        }
        Ok(p.nav_layers.has_bit(layer_index))
    }

    /// The point's raw layer mask value.
    pub fn point_layers_value(&self, id: PointId) -> Result<u32, GraphError> {
        Ok(self.try_point(id)?.nav_layers.value())
    }

    // ── Regions ─────────────────────────────────────────────────

    /// Declare a region over `member_ids` with anchor `pos` and entry point
    /// `origin`.
    ///
    /// Re-adding an existing id resets the region in place — members are
    /// detached and re-admitted, the weight average restarts — while its
    /// region-level connections survive.
    ///
    /// # Errors
    ///
    /// Rejects negative ids and empty member lists. If any member is
    /// missing, already owned by another region, or the origin is not among
    /// the admitted members, the partially built region is rolled back via
    /// [`NavGraph::remove_region`] and the error is returned.
    pub fn add_region(
        &mut self,
        id: RegionId,
        member_ids: &[PointId],
        pos: Vec3,
        origin: PointId,
    ) -> Result<(), GraphError> {
        if id.0 < 0 {
            return Err(GraphError::NegativeId { id: id.0 });
        }
        if member_ids.is_empty() {
            return Err(GraphError::EmptyRegion { id });
        }

        if let Some(region) = self.regions.get_mut(&id) {
            region.pos = pos;
            region.origin = None;
            region.weighted_points.clear();
            region.weight_scale = 1.0;
            let old_members = std::mem::take(&mut region.points);
            for member in old_members {
                if let Some(p) = self.points.get_mut(&member) {
                    p.region = None;
                }
            }
        } else {
            self.regions.insert(id, Region::new(pos));
        }

        let member_count = member_ids.len() as f32;
        let mut nav_layers = LayerMask::default();
        let mut failure: Option<GraphError> = None;

        for &point_id in member_ids {
            let Some(p) = self.points.get_mut(&point_id) else {
                failure = Some(GraphError::RegionMemberMissing {
                    region: id,
                    point: point_id,
                });
                break;
            };
            nav_layers = nav_layers.union(p.nav_layers);
            if p.region.is_some() {
                failure = Some(GraphError::RegionOverlap {
                    region: id,
                    point: point_id,
                });
                break;
            }
            p.region = Some(id);
            let weight = p.weight_scale;

            if let Some(region) = self.regions.get_mut(&id) {
                if point_id == origin {
                    region.origin = Some(point_id);
                }
                region.points.insert(point_id);
                if weight != 1.0 {
                    region.weighted_points.push(point_id);
                    region.weight_scale += (weight - 1.0) / member_count;
                }
            }
        }

        if let Some(region) = self.regions.get_mut(&id) {
            region.nav_layers = nav_layers;
            if failure.is_none() && region.origin.is_none() {
                failure = Some(GraphError::OriginNotMember { region: id, origin });
            }
        }

        if let Some(err) = failure {
            self.remove_region(id)?;
            return Err(err);
        }
        Ok(())
    }

    /// Remove the region: members are detached (the points survive), every
    /// region segment touching it is erased, then the region itself.
    pub fn remove_region(&mut self, id: RegionId) -> Result<(), GraphError> {
        let region = self
            .regions
            .get(&id)
            .ok_or(GraphError::UnknownRegion { id })?;
        let members: Vec<PointId> = region.points.iter().copied().collect();
        let incident: Vec<RegionId> = region
            .neighbours
            .iter()
            .chain(region.unlinked_neighbours.iter())
            .copied()
            .collect();

        for member in members {
            if let Some(p) = self.points.get_mut(&member) {
                p.region = None;
            }
        }
        for other_id in incident {
            let (key, _) = SegmentKey::new(id, other_id);
            self.region_segments.shift_remove(&key);
            if let Some(other) = self.regions.get_mut(&other_id) {
                other.neighbours.shift_remove(&id);
                other.unlinked_neighbours.shift_remove(&id);
            }
        }

        self.regions.shift_remove(&id);
        Ok(())
    }

    /// Diagnostic summary of a region: `[layer_mask]`, extended to
    /// `[layer_mask, 0, weighted_member_ids…]` when any member carries a
    /// non-unit weight.
    pub fn debug_region(&self, id: RegionId) -> Result<Vec<i64>, GraphError> {
        let region = self
            .regions
            .get(&id)
            .ok_or(GraphError::UnknownRegion { id })?;
        let mut data = vec![i64::from(region.nav_layers.value())];
        if !region.weighted_points.is_empty() {
            data.push(0);
            data.extend(region.weighted_points.iter().map(|p| p.0));
        }
        Ok(data)
    }

    /// The region owning the point, if any.
    pub fn region_id_of_point(&self, id: PointId) -> Result<Option<RegionId>, GraphError> {
        Ok(self.try_point(id)?.region)
    }

    /// All region ids, in insertion order.
    pub fn region_ids(&self) -> Vec<RegionId> {
        self.regions.keys().copied().collect()
    }

    /// Connect two regions for the coarse search, optionally one-way.
    pub fn connect_regions(
        &mut self,
        id: RegionId,
        with_id: RegionId,
        bidirectional: bool,
    ) -> Result<(), GraphError> {
        if id == with_id {
            return Err(GraphError::SelfConnection { id: id.0 });
        }
        if !self.regions.contains_key(&id) {
            return Err(GraphError::UnknownRegion { id });
        }
        if !self.regions.contains_key(&with_id) {
            return Err(GraphError::UnknownRegion { id: with_id });
        }

        if let Some(a) = self.regions.get_mut(&id) {
            a.neighbours.insert(with_id);
        }
        if let Some(b) = self.regions.get_mut(&with_id) {
            if bidirectional {
                b.neighbours.insert(id);
            } else {
                b.unlinked_neighbours.insert(id);
            }
        }

        let (key, forward) = SegmentKey::new(id, with_id);
        let mut direction = if bidirectional {
            Direction::BIDIRECTIONAL
        } else {
            forward
        };
        if let Some(&existing) = self.region_segments.get(&key) {
            direction = direction.union(existing);
            if direction == Direction::BIDIRECTIONAL {
                if let Some(a) = self.regions.get_mut(&id) {
                    a.unlinked_neighbours.shift_remove(&with_id);
                }
                if let Some(b) = self.regions.get_mut(&with_id) {
                    b.unlinked_neighbours.shift_remove(&id);
                }
            }
        }
        self.region_segments.insert(key, direction);
        Ok(())
    }

    /// Whether a region segment joins the pair. With `bidirectional` false,
    /// only the `id → with_id` orientation counts.
    pub fn are_regions_connected(
        &self,
        id: RegionId,
        with_id: RegionId,
        bidirectional: bool,
    ) -> bool {
        let (key, forward) = SegmentKey::new(id, with_id);
        match self.region_segments.get(&key) {
            None => false,
            Some(&d) => bidirectional || d.contains(forward),
        }
    }

    // ── Point segments ──────────────────────────────────────────

    /// Connect two points, optionally one-way (`id → with_id`).
    ///
    /// Connecting an existing pair ORs the new direction into the stored
    /// segment; when the combination becomes bidirectional, the unlinked
    /// back-references on both endpoints are dropped.
    pub fn connect_points(
        &mut self,
        id: PointId,
        with_id: PointId,
        bidirectional: bool,
    ) -> Result<(), GraphError> {
        if id == with_id {
            return Err(GraphError::SelfConnection { id: id.0 });
        }
        if !self.points.contains_key(&id) {
            return Err(GraphError::UnknownPoint { id });
        }
        if !self.points.contains_key(&with_id) {
            return Err(GraphError::UnknownPoint { id: with_id });
        }

        if let Some(a) = self.points.get_mut(&id) {
            a.neighbors.insert(with_id);
        }
        if let Some(b) = self.points.get_mut(&with_id) {
            if bidirectional {
                b.neighbors.insert(id);
            } else {
                b.unlinked_neighbours.insert(id);
            }
        }

        let (key, forward) = SegmentKey::new(id, with_id);
        let mut direction = if bidirectional {
            Direction::BIDIRECTIONAL
        } else {
            forward
        };
        if let Some(&existing) = self.segments.get(&key) {
            direction = direction.union(existing);
            if direction == Direction::BIDIRECTIONAL {
                if let Some(a) = self.points.get_mut(&id) {
                    a.unlinked_neighbours.shift_remove(&with_id);
                }
                if let Some(b) = self.points.get_mut(&with_id) {
                    b.unlinked_neighbours.shift_remove(&id);
                }
            }
        }
        self.segments.insert(key, direction);
        Ok(())
    }

    /// Remove a connection, or one direction of it.
    ///
    /// Disconnecting one direction of a bidirectional segment leaves the
    /// other in place and moves the surviving back-reference to the
    /// unlinked set of the point it targets.
    pub fn disconnect_points(
        &mut self,
        id: PointId,
        with_id: PointId,
        bidirectional: bool,
    ) -> Result<(), GraphError> {
        if !self.points.contains_key(&id) {
            return Err(GraphError::UnknownPoint { id });
        }
        if !self.points.contains_key(&with_id) {
            return Err(GraphError::UnknownPoint { id: with_id });
        }

        let (key, forward) = SegmentKey::new(id, with_id);
        let Some(&existing) = self.segments.get(&key) else {
            return Ok(());
        };
        let remove_direction = if bidirectional {
            Direction::BIDIRECTIONAL
        } else {
            forward
        };
        let remaining = existing.without(remove_direction);

        if let Some(a) = self.points.get_mut(&id) {
            a.neighbors.shift_remove(&with_id);
        }
        if bidirectional {
            if let Some(b) = self.points.get_mut(&with_id) {
                b.neighbors.shift_remove(&id);
            }
            if existing != Direction::BIDIRECTIONAL {
                if let Some(a) = self.points.get_mut(&id) {
                    a.unlinked_neighbours.shift_remove(&with_id);
                }
                if let Some(b) = self.points.get_mut(&with_id) {
                    b.unlinked_neighbours.shift_remove(&id);
                }
            }
        } else if remaining.is_none() {
            if let Some(b) = self.points.get_mut(&with_id) {
                b.unlinked_neighbours.shift_remove(&id);
            }
        } else if let Some(a) = self.points.get_mut(&id) {
            a.unlinked_neighbours.insert(with_id);
        }

        self.segments.shift_remove(&key);
        if !remaining.is_none() {
            self.segments.insert(key, remaining);
        }
        Ok(())
    }

    /// Whether a segment joins the pair. With `bidirectional` false, only
    /// the `id → with_id` orientation counts.
    pub fn are_points_connected(&self, id: PointId, with_id: PointId, bidirectional: bool) -> bool {
        let (key, forward) = SegmentKey::new(id, with_id);
        match self.segments.get(&key) {
            None => false,
            Some(&d) => bidirectional || d.contains(forward),
        }
    }

    // ── Capacity and lifecycle ──────────────────────────────────

    /// Number of points.
    pub fn point_count(&self) -> usize {
        self.points.len()
    }

    /// Current point-store capacity.
    pub fn point_capacity(&self) -> usize {
        self.points.capacity()
    }

    /// Pre-size the point store for `num_nodes` points.
    ///
    /// # Errors
    ///
    /// The requested capacity must be above zero and at least the current
    /// capacity.
    pub fn reserve_space(&mut self, num_nodes: usize) -> Result<(), GraphError> {
        if num_nodes == 0 || num_nodes < self.points.capacity() {
            return Err(GraphError::InvalidCapacity {
                requested: num_nodes,
                current: self.points.capacity(),
            });
        }
        self.points.reserve(num_nodes - self.points.len());
        Ok(())
    }

    /// Release every point, region, and segment.
    pub fn clear(&mut self) {
        self.last_free_id = PointId(0);
        self.points.clear();
        self.regions.clear();
        self.segments.clear();
        self.region_segments.clear();
        self.last_id_path.clear();
        self.last_point_path.clear();
        self.closest_reached = None;
    }

    /// The smallest unused id at or above the next-free-id hint.
    pub fn available_point_id(&self) -> PointId {
        let mut id = self.last_free_id.0;
        while self.points.contains_key(&PointId(id)) {
            id += 1;
        }
        PointId(id)
    }

    // ── Spatial queries ─────────────────────────────────────────

    /// Id of the point nearest `pos`.
    ///
    /// Disabled points are skipped unless `include_disabled` is set; with a
    /// non-zero `relevant_layers` mask, points sharing no layer bit are
    /// skipped. Ties on squared distance resolve to the smaller id.
    pub fn closest_point(
        &self,
        pos: Vec3,
        include_disabled: bool,
        relevant_layers: u32,
    ) -> Result<Option<PointId>, GraphError> {
        let mask = LayerMask::new(relevant_layers)?;
        let mut best: Option<(f32, PointId)> = None;

        for (&id, p) in &self.points {
            let supported = mask.matches(p.nav_layers);
            if (!include_disabled && !p.enabled) || !supported {
                continue;
            }
            let d = pos.distance_squared(p.pos);
            best = match best {
                Some((best_d, best_id)) if d > best_d || (d == best_d && id > best_id) => {
                    Some((best_d, best_id))
                }
                _ => Some((d, id)),
            };
        }
        Ok(best.map(|(_, id)| id))
    }

    /// Point on an enabled segment nearest `pos`, or `None` when no segment
    /// has both endpoints enabled.
    pub fn closest_position_in_segment(&self, pos: Vec3) -> Option<Vec3> {
        let mut best: Option<(f32, Vec3)> = None;

        for key in self.segments.keys() {
            let (Some(from), Some(to)) = (self.points.get(&key.a), self.points.get(&key.b)) else {
                continue;
            };
            if !(from.enabled && to.enabled) {
                continue;
            }
            let candidate = closest_point_on_segment(pos, from.pos, to.pos);
            let d = pos.distance_squared(candidate);
            if best.map_or(true, |(best_d, _)| d < best_d) {
                best = Some((d, candidate));
            }
        }
        best.map(|(_, p)| p)
    }

    // ── Bulk loaders ────────────────────────────────────────────

    /// Insert points and connections from packed streams.
    ///
    /// `pool_points` holds six reals per point: `(id, x, y, z, weight,
    /// layers)`. `pool_connections` holds `1 + max_connections` ids per row
    /// — the point id followed by its neighbors, negative meaning "no
    /// connection". Existing content is kept; rows route through
    /// [`NavGraph::add_point`] and [`NavGraph::connect_points`].
    pub fn append_as_bulk_array(
        &mut self,
        pool_points: &[f64],
        max_connections: usize,
        pool_connections: &[i64],
    ) -> Result<(), GraphError> {
        if pool_points.len() % 6 != 0 {
            return Err(GraphError::BulkStrideMismatch {
                len: pool_points.len(),
                stride: 6,
            });
        }
        let stride = max_connections + 1;
        if pool_connections.len() % stride != 0 {
            return Err(GraphError::BulkStrideMismatch {
                len: pool_connections.len(),
                stride,
            });
        }

        for row in pool_points.chunks_exact(6) {
            let layers = row[5] as i64;
            if layers < 0 || layers >= i64::from(LayerMask::LIMIT) {
                return Err(GraphError::LayerValueOutOfRange { value: layers });
            }
            self.add_point(
                PointId(row[0] as i64),
                Vec3::new(row[1] as f32, row[2] as f32, row[3] as f32),
                row[4] as f32,
                layers as u32,
            )?;
        }
        for row in pool_connections.chunks_exact(stride) {
            let id = PointId(row[0]);
            for &with in &row[1..] {
                if with >= 0 {
                    self.connect_points(id, PointId(with), true)?;
                }
            }
        }
        Ok(())
    }

    /// Replace the whole graph from packed streams: [`NavGraph::clear`]
    /// followed by [`NavGraph::append_as_bulk_array`].
    pub fn set_as_bulk_array(
        &mut self,
        pool_points: &[f64],
        max_connections: usize,
        pool_connections: &[i64],
    ) -> Result<(), GraphError> {
        self.clear();
        self.append_as_bulk_array(pool_points, max_connections, pool_connections)
    }

    // ── Proximity buffers ───────────────────────────────────────

    /// Id path from the last failed query's start to its closest reached
    /// point. Empty when the last query succeeded or reached nothing.
    pub fn proximity_id_path_of_last_call(&self) -> Vec<PointId> {
        self.last_id_path.clone()
    }

    /// Position path counterpart of
    /// [`NavGraph::proximity_id_path_of_last_call`].
    pub fn proximity_point_path_of_last_call(&self) -> Vec<Vec3> {
        self.last_point_path.clone()
    }
}

impl Default for NavGraph {
    fn default() -> Self {
        Self::new()
    }
}

// Manual `Debug`: the cost hooks are opaque closures.
impl fmt::Debug for NavGraph {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("NavGraph")
            .field("points", &self.points.len())
            .field("regions", &self.regions.len())
            .field("segments", &self.segments.len())
            .field("region_segments", &self.region_segments.len())
            .finish_non_exhaustive()
    }
}

/// Closest point to `p` on the segment `a`–`b`.
fn closest_point_on_segment(p: Vec3, a: Vec3, b: Vec3) -> Vec3 {
    let ab = b - a;
    let len_sq = ab.length_squared();
    if len_sq < 1e-12 {
        return a;
    }
    let t = ((p - a).dot(ab) / len_sq).clamp(0.0, 1.0);
    a + ab * t
}
