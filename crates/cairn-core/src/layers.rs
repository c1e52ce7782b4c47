//! Navigation layer masks.

use crate::error::GraphError;
use std::fmt;

/// A 31-bit navigation layer mask.
///
/// Each point carries a mask naming the layers it participates in. A query
/// passes a mask of its own: a point is traversable when the query mask is
/// empty (no filtering) or the two masks share at least one bit.
///
/// Bit index 31 is reserved; valid raw values lie in `[0, 2³¹ − 1)`.
///
/// # Examples
///
/// ```
/// use cairn_core::LayerMask;
///
/// let ground = LayerMask::new(0b01).unwrap();
/// let air = LayerMask::new(0b10).unwrap();
/// let both = ground.union(air);
///
/// assert!(ground.matches(both));
/// assert!(!ground.matches(air));
/// // The empty mask matches everything.
/// assert!(LayerMask::default().matches(air));
/// ```
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub struct LayerMask(u32);

impl LayerMask {
    /// Number of usable layer bits. Bit 31 is reserved.
    pub const LAYER_COUNT: u32 = 31;

    /// Exclusive upper bound on raw mask values: `2³¹ − 1`.
    pub const LIMIT: u32 = (1 << 31) - 1;

    /// Validate a raw mask value.
    ///
    /// Returns `Err(GraphError::LayerValueOutOfRange)` when `value` is not
    /// below [`LayerMask::LIMIT`].
    pub fn new(value: u32) -> Result<Self, GraphError> {
        if value >= Self::LIMIT {
            return Err(GraphError::LayerValueOutOfRange {
                value: i64::from(value),
            });
        }
        Ok(Self(value))
    }

    /// A mask with the single layer `index` set.
    ///
    /// Returns `Err(GraphError::LayerIndexOutOfRange)` when
    /// `index >= LayerMask::LAYER_COUNT`.
    pub fn from_bit(index: u32) -> Result<Self, GraphError> {
        if index >= Self::LAYER_COUNT {
            return Err(GraphError::LayerIndexOutOfRange { index });
        }
        Ok(Self(1 << index))
    }

    /// The raw mask value.
    pub fn value(self) -> u32 {
        self.0
    }

    /// Whether no layer bit is set.
    pub fn is_empty(self) -> bool {
        self.0 == 0
    }

    /// Whether this query mask admits a point carrying `layers`.
    ///
    /// An empty query mask admits every point; otherwise the masks must
    /// share at least one bit.
    pub fn matches(self, layers: LayerMask) -> bool {
        self.0 == 0 || self.0 & layers.0 != 0
    }

    /// Whether the layer at `index` is set. `index` must be valid.
    pub fn has_bit(self, index: u32) -> bool {
        self.0 & (1 << index) != 0
    }

    /// Copy of this mask with the layer at `index` set or cleared.
    ///
    /// Returns `Err(GraphError::LayerIndexOutOfRange)` when
    /// `index >= LayerMask::LAYER_COUNT`.
    pub fn with_bit(self, index: u32, enabled: bool) -> Result<Self, GraphError> {
        if index >= Self::LAYER_COUNT {
            return Err(GraphError::LayerIndexOutOfRange { index });
        }
        let bit = 1 << index;
        Ok(Self(if enabled { self.0 | bit } else { self.0 & !bit }))
    }

    /// Bitwise union of two masks.
    pub fn union(self, other: LayerMask) -> LayerMask {
        Self(self.0 | other.0)
    }
}

impl fmt::Display for LayerMask {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:#b}", self.0)
    }
}
