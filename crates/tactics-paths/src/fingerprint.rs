//! Cache key composition.
//!
//! A query is memoizable only if its key changes whenever anything the
//! search reads changes: the unit and its budget, the terrain layer, and
//! the occupancy snapshot. Terrain uses the map's full content hash (no
//! partial sampling, so no false hits); occupancy hashes the sorted
//! canonical keys of every blocked tile.

use tactics_core::{BattleMap, OccupancyView, Point, Unit, UnitId};
use xxhash_rust::xxh3::xxh3_64;

/// Sentinel fingerprint for a view with no blocked tiles.
const EMPTY_OCCUPANCY_FP: u64 = u64::MAX;

/// Digest of an occupancy snapshot.
pub(crate) fn occupancy_fingerprint(view: &OccupancyView) -> u64 {
    if view.is_empty() {
        return EMPTY_OCCUPANCY_FP;
    }
    let mut joined = String::new();
    for p in view.positions() {
        joined.push_str(&p.key());
        joined.push(';');
    }
    xxh3_64(joined.as_bytes())
}

/// Key for reachable-set queries.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub(crate) struct RangeKey {
    unit: UnitId,
    pos: Point,
    budget: i32,
    terrain_fp: u64,
    occupancy_fp: u64,
}

impl RangeKey {
    pub(crate) fn new(unit: &Unit, map: &BattleMap, occupancy: &OccupancyView) -> Self {
        Self {
            unit: unit.id,
            pos: unit.pos,
            budget: unit.move_points,
            terrain_fp: map.fingerprint(),
            occupancy_fp: occupancy_fingerprint(occupancy),
        }
    }
}

/// Key for path queries.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub(crate) struct PathKey {
    start: Point,
    goal: Point,
    max_cost: i32,
    terrain_fp: u64,
    occupancy_fp: u64,
}

impl PathKey {
    pub(crate) fn new(
        start: Point,
        goal: Point,
        max_cost: i32,
        map: &BattleMap,
        occupancy: &OccupancyView,
    ) -> Self {
        Self {
            start,
            goal,
            max_cost,
            terrain_fp: map.fingerprint(),
            occupancy_fp: occupancy_fingerprint(occupancy),
        }
    }
}
