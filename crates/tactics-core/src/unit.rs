//! Unit roster value types.

use crate::geom::Point;

/// Stable unit identifier.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct UnitId(pub u32);

impl UnitId {
    /// Create a new id.
    pub const fn new(value: u32) -> Self {
        Self(value)
    }
}

impl From<u32> for UnitId {
    fn from(v: u32) -> Self {
        Self(v)
    }
}

/// A unit as the movement engine sees it.
///
/// Only the fields the engine consumes: identity, current tile, the
/// per-turn movement budget, and hit points (units at 0 HP no longer
/// block tiles).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Unit {
    pub id: UnitId,
    pub pos: Point,
    pub move_points: i32,
    pub hp: i32,
}

impl Unit {
    /// Create a unit with full movement and the given HP.
    pub const fn new(id: UnitId, pos: Point, move_points: i32, hp: i32) -> Self {
        Self {
            id,
            pos,
            move_points,
            hp,
        }
    }

    /// Whether this unit currently blocks its tile.
    #[inline]
    pub fn blocks(&self) -> bool {
        self.hp > 0
    }
}
