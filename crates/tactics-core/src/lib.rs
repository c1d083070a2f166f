//! Value types for a grid tactics movement engine.
//!
//! This crate holds the data the search engine operates on, and nothing
//! else:
//!
//! - [`Point`] — integer grid coordinates
//! - [`BattleMap`] — a bounded, row-major terrain layer with a memoized
//!   content fingerprint
//! - [`TerrainTable`] / [`CostModel`] — terrain-type to cost/passability
//!   resolution with a guaranteed fallback entry
//! - [`Unit`] / [`OccupancyView`] — the unit roster and the derived
//!   "which tiles block movement" query surface
//!
//! The search algorithms themselves live in the `tactics-paths` crate.

mod geom;
mod map;
mod occupancy;
mod terrain;
mod unit;

pub use geom::Point;
pub use map::{BattleMap, MapError};
pub use occupancy::OccupancyView;
pub use terrain::{CostModel, IMPASSABLE, TerrainEntry, TerrainId, TerrainTable};
pub use unit::{Unit, UnitId};
