//! Terrain types, the cost table and the cost model.

use std::collections::HashMap;

use crate::geom::Point;
use crate::map::BattleMap;

/// Sentinel cost meaning "this tile cannot be entered".
pub const IMPASSABLE: i32 = i32::MAX;

/// A terrain-type identifier, wrapping an `i32`.
///
/// Different integer values represent different terrain types (plains,
/// forest, mountain, etc.) as determined by map content.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct TerrainId(pub i32);

impl TerrainId {
    /// The fallback terrain id, resolved for unknown types and
    /// out-of-bounds queries. A [`TerrainTable`] always has an entry
    /// for it.
    pub const FALLBACK: Self = Self(0);

    /// Create a new terrain id.
    pub const fn new(value: i32) -> Self {
        Self(value)
    }

    /// Get the underlying integer value.
    pub const fn value(self) -> i32 {
        self.0
    }
}

impl From<i32> for TerrainId {
    fn from(v: i32) -> Self {
        Self(v)
    }
}

/// Cost and passability of one terrain type.
///
/// `move_cost` must be ≥ 1: the A* Manhattan heuristic is only
/// admissible when no step is cheaper than one.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct TerrainEntry {
    pub move_cost: i32,
    pub passable: bool,
}

impl TerrainEntry {
    /// Create a new entry.
    pub const fn new(move_cost: i32, passable: bool) -> Self {
        Self {
            move_cost,
            passable,
        }
    }
}

impl Default for TerrainEntry {
    /// Cost 1, passable. This is the entry [`TerrainId::FALLBACK`] gets
    /// unless the table overrides it.
    fn default() -> Self {
        Self {
            move_cost: 1,
            passable: true,
        }
    }
}

// ---------------------------------------------------------------------------
// TerrainTable
// ---------------------------------------------------------------------------

/// A total mapping from terrain id to [`TerrainEntry`].
///
/// "Total" because lookup never fails: ids without an explicit entry
/// resolve to the entry for [`TerrainId::FALLBACK`], which the table
/// guarantees exists.
#[derive(Debug, Clone, PartialEq)]
pub struct TerrainTable {
    entries: HashMap<TerrainId, TerrainEntry>,
}

impl Default for TerrainTable {
    fn default() -> Self {
        Self::new()
    }
}

impl TerrainTable {
    /// Create a table holding only the fallback entry.
    pub fn new() -> Self {
        let mut entries = HashMap::new();
        entries.insert(TerrainId::FALLBACK, TerrainEntry::default());
        Self { entries }
    }

    /// Build a table from explicit entries. A fallback entry is added if
    /// the input does not provide one.
    pub fn from_entries(entries: impl IntoIterator<Item = (TerrainId, TerrainEntry)>) -> Self {
        let mut table = Self::new();
        for (id, entry) in entries {
            table.entries.insert(id, entry);
        }
        table
    }

    /// Insert or replace the entry for `id`.
    pub fn insert(&mut self, id: TerrainId, entry: TerrainEntry) {
        self.entries.insert(id, entry);
    }

    /// Resolve the entry for `id`, falling back to the entry for
    /// [`TerrainId::FALLBACK`]. Never fails.
    pub fn entry(&self, id: TerrainId) -> TerrainEntry {
        match self.entries.get(&id) {
            Some(e) => *e,
            // The fallback entry is inserted in every constructor.
            None => self.entries[&TerrainId::FALLBACK],
        }
    }
}

// ---------------------------------------------------------------------------
// CostModel
// ---------------------------------------------------------------------------

/// Resolves per-tile movement costs from a terrain layer plus a
/// [`TerrainTable`].
///
/// Out-of-bounds coordinates and unknown terrain ids resolve to the
/// fallback entry, so every query produces a cost/passability decision.
#[derive(Debug, Clone, Default)]
pub struct CostModel {
    table: TerrainTable,
}

impl CostModel {
    /// Create a model over the given table.
    pub fn new(table: TerrainTable) -> Self {
        Self { table }
    }

    /// Cost of entering `to` on `map`, or [`IMPASSABLE`].
    pub fn step_cost(&self, map: &BattleMap, to: Point) -> i32 {
        let id = map.at(to).unwrap_or(TerrainId::FALLBACK);
        let entry = self.table.entry(id);
        if entry.passable {
            entry.move_cost
        } else {
            IMPASSABLE
        }
    }

    /// Whether `p` can be entered at all.
    pub fn passable(&self, map: &BattleMap, p: Point) -> bool {
        self.step_cost(map, p) != IMPASSABLE
    }

    /// Cost of a single move from `from` to `to`, or [`IMPASSABLE`] when
    /// the tiles are not cardinally adjacent or `to` cannot be entered.
    pub fn movement_cost(&self, from: Point, to: Point, map: &BattleMap) -> i32 {
        let dist = (from.x - to.x).abs() + (from.y - to.y).abs();
        if dist != 1 {
            return IMPASSABLE;
        }
        self.step_cost(map, to)
    }

    /// Replace the terrain table.
    ///
    /// Takes effect for all subsequent queries. Any caches built against
    /// the old table are the caller's to discard.
    pub fn set_table(&mut self, table: TerrainTable) {
        self.table = table;
    }

    /// A copy of the current table.
    pub fn table(&self) -> TerrainTable {
        self.table.clone()
    }
}
