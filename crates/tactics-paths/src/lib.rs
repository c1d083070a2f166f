//! Movement-range and pathfinding engine for grid tactics games.
//!
//! This crate computes, for a unit on a bounded rectangular grid, the
//! set of tiles reachable within a movement budget, and the least-cost
//! route between two tiles, under per-tile terrain costs and dynamic
//! unit occupancy:
//!
//! - **Reachable sets** via uniform-cost search ([`MovementRange::reachable_set`])
//! - **Shortest paths** via A\* with a Manhattan heuristic ([`PathFinder::find_path`])
//!
//! Both calculators memoize results in a TTL/size-bounded [`ResultCache`]
//! keyed by full terrain and occupancy fingerprints, and record timings,
//! hit ratios and search complexity in a per-instance
//! [`PerformanceMonitor`]. Terrain costs resolve through
//! `tactics_core::CostModel`; blocking units through
//! `tactics_core::OccupancyView`.
//!
//! Every operation runs to completion on the caller's thread; the map
//! and occupancy snapshot are treated as immutable for the duration of
//! one call.

mod astar;
mod cache;
mod config;
mod distance;
mod fingerprint;
mod metrics;
mod range;
mod scratch;

pub use astar::PathFinder;
pub use cache::ResultCache;
pub use config::EngineConfig;
pub use distance::manhattan;
pub use metrics::{COMPLEX_PATH_THRESHOLD, MetricsSnapshot, PerformanceMonitor};
pub use range::MovementRange;
