//! Cost-hook and straight-line-callback signatures.
//!
//! The engine's four cost functions (estimate/compute × point/region) default
//! to Euclidean distance over stored positions. Clients override any of them
//! by installing a boxed closure; an installed override is consulted first
//! and its result returned unconditionally. Overrides must not mutate the
//! graph they are installed on.

use crate::id::{PointId, RegionId};

/// A point-level cost hook: `(from, to) → cost`.
pub type PointCostFn = Box<dyn Fn(PointId, PointId) -> f32 + Send + Sync>;

/// A region-level cost hook: `(from, to) → cost`.
pub type RegionCostFn = Box<dyn Fn(RegionId, RegionId) -> f32 + Send + Sync>;

/// The optional straight-line callback: `(from, to) → candidate id sequence`.
///
/// The returned sequence must start with `from`. The region search walks the
/// longest valid prefix (existing, enabled, layer-compatible, unit-weight
/// points joined by existing directed edges) and falls back to the flat
/// search when the prefix breaks before reaching the target region.
pub type StraightLineFn = Box<dyn Fn(PointId, PointId) -> Vec<PointId> + Send + Sync>;
