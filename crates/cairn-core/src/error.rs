//! Error types for graph mutation and queries.
//!
//! Every variant is a precondition violation: an input the caller must never
//! supply. A query that runs but finds no route is *not* an error — it
//! returns an empty path and populates the proximity buffers instead.

use crate::id::{PointId, RegionId};
use std::fmt;

/// Errors arising from graph construction, mutation, or query preconditions.
#[derive(Clone, Debug, PartialEq)]
pub enum GraphError {
    /// An id supplied for insertion was negative.
    NegativeId {
        /// The offending raw id.
        id: i64,
    },
    /// A weight scale below zero was supplied.
    NegativeWeight {
        /// The offending weight.
        weight: f32,
    },
    /// A raw layer mask value outside `[0, 2³¹ − 1)`.
    LayerValueOutOfRange {
        /// The offending raw value.
        value: i64,
    },
    /// A layer bit index of 31 or above (bit 31 is reserved).
    LayerIndexOutOfRange {
        /// The offending index.
        index: u32,
    },
    /// The referenced point does not exist.
    UnknownPoint {
        /// The missing point id.
        id: PointId,
    },
    /// The referenced region does not exist.
    UnknownRegion {
        /// The missing region id.
        id: RegionId,
    },
    /// Attempted to connect a point or region to itself.
    SelfConnection {
        /// The id on both ends of the rejected segment.
        id: i64,
    },
    /// `add_region` was called with an empty member list.
    EmptyRegion {
        /// The rejected region id.
        id: RegionId,
    },
    /// A declared region member does not exist; the region was rolled back.
    RegionMemberMissing {
        /// The rejected region id.
        region: RegionId,
        /// The missing member.
        point: PointId,
    },
    /// A declared region member already belongs to another region; the
    /// region was rolled back.
    RegionOverlap {
        /// The rejected region id.
        region: RegionId,
        /// The contested member.
        point: PointId,
    },
    /// The declared origin is not among the admitted members; the region
    /// was rolled back.
    OriginNotMember {
        /// The rejected region id.
        region: RegionId,
        /// The declared origin.
        origin: PointId,
    },
    /// `reserve_space` was called with zero capacity or less than the
    /// current capacity.
    InvalidCapacity {
        /// The requested capacity.
        requested: usize,
        /// The capacity already held.
        current: usize,
    },
    /// A bulk stream's length is not a multiple of its row stride.
    BulkStrideMismatch {
        /// Length of the offending stream.
        len: usize,
        /// Expected row stride.
        stride: usize,
    },
    /// Installing the straight-line callback requires probe points `0` and
    /// `1` to exist.
    StraightLineProbeMissing {
        /// The missing probe point.
        id: PointId,
    },
    /// A coarse query was issued for a point that belongs to no region.
    PointNotInRegion {
        /// The unattached point.
        id: PointId,
    },
}

impl fmt::Display for GraphError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::NegativeId { id } => write!(f, "can't insert with negative id: {id}"),
            Self::NegativeWeight { weight } => {
                write!(f, "weight scale must not be below zero: {weight}")
            }
            Self::LayerValueOutOfRange { value } => {
                write!(f, "layer value out of range [0, 2^31 - 1): {value}")
            }
            Self::LayerIndexOutOfRange { index } => {
                write!(f, "layer index out of range [0, 31): {index}")
            }
            Self::UnknownPoint { id } => write!(f, "point with id {id} doesn't exist"),
            Self::UnknownRegion { id } => write!(f, "region with id {id} doesn't exist"),
            Self::SelfConnection { id } => write!(f, "can't connect id {id} to itself"),
            Self::EmptyRegion { id } => {
                write!(f, "can't add region {id} with no member points")
            }
            Self::RegionMemberMissing { region, point } => {
                write!(f, "region {region} names member {point} which doesn't exist")
            }
            Self::RegionOverlap { region, point } => write!(
                f,
                "region {region} overlaps another region at point {point}"
            ),
            Self::OriginNotMember { region, origin } => write!(
                f,
                "region {region} does not contain its declared origin {origin}"
            ),
            Self::InvalidCapacity { requested, current } => write!(
                f,
                "new capacity {requested} must be above zero and at least the current capacity {current}"
            ),
            Self::BulkStrideMismatch { len, stride } => write!(
                f,
                "bulk stream of length {len} is not a whole number of rows of stride {stride}"
            ),
            Self::StraightLineProbeMissing { id } => write!(
                f,
                "straight-line function requires probe point {id} to exist"
            ),
            Self::PointNotInRegion { id } => {
                write!(f, "point {id} isn't attached to a region")
            }
        }
    }
}

impl std::error::Error for GraphError {}
