//! Reachable-tile computation via uniform-cost search.

use std::collections::{BTreeSet, BinaryHeap};
use std::time::Instant;

use tactics_core::{
    BattleMap, CostModel, IMPASSABLE, OccupancyView, Point, TerrainTable, Unit,
};

use crate::cache::ResultCache;
use crate::config::EngineConfig;
use crate::fingerprint::RangeKey;
use crate::metrics::{MetricsSnapshot, PerformanceMonitor};
use crate::scratch::{NodeRef, SearchScratch};

/// Computes the set of tiles a unit can reach within its movement
/// budget.
///
/// The frontier is expanded in strictly non-decreasing order of
/// accumulated cost (uniform-cost search), so the first finalization of
/// any tile is via a cheapest route. A plain FIFO scan is not good
/// enough here: on non-uniform terrain it can finalize a tile via an
/// expensive route and never revisit it.
///
/// Results are memoized in a TTL/size-bounded cache keyed by unit,
/// budget, terrain fingerprint and occupancy fingerprint; hits return a
/// defensive copy. Timings and hit ratios accumulate in a per-instance
/// [`PerformanceMonitor`].
pub struct MovementRange {
    cost_model: CostModel,
    cache: ResultCache<RangeKey, BTreeSet<Point>>,
    metrics: PerformanceMonitor,
    scratch: SearchScratch,
}

impl MovementRange {
    /// Create a calculator over the given terrain table.
    pub fn new(table: TerrainTable, config: EngineConfig) -> Self {
        Self {
            cost_model: CostModel::new(table),
            cache: ResultCache::new(config.cache_ttl, config.max_cache_entries),
            metrics: PerformanceMonitor::new(),
            scratch: SearchScratch::new(),
        }
    }

    /// All tiles `unit` can reach on `map` within its movement budget.
    ///
    /// The unit's own tile is always part of the result (cost 0 is
    /// always affordable), including when the budget is zero or
    /// negative. A unit positioned outside the map yields the empty
    /// set. Tiles held by other living units are not entered; the
    /// mover's own tile never blocks its own search.
    pub fn reachable_set(
        &mut self,
        unit: &Unit,
        map: &BattleMap,
        occupancy: &OccupancyView,
    ) -> BTreeSet<Point> {
        let started = Instant::now();

        if !map.contains(unit.pos) {
            self.metrics.record_search(started.elapsed(), 0);
            return BTreeSet::new();
        }
        if unit.move_points <= 0 {
            self.metrics.record_search(started.elapsed(), 0);
            return BTreeSet::from([unit.pos]);
        }

        let key = RangeKey::new(unit, map, occupancy);
        if let Some(hit) = self.cache.get(&key) {
            log::debug!("range cache hit for unit {:?} at {}", unit.id, unit.pos);
            self.metrics.record_cache_hit(started.elapsed());
            return hit;
        }

        let (result, expanded) = self.search(unit, map, occupancy);
        self.cache.put(key, result.clone());
        self.metrics.record_search(started.elapsed(), expanded);
        result
    }

    fn search(
        &mut self,
        unit: &Unit,
        map: &BattleMap,
        occupancy: &OccupancyView,
    ) -> (BTreeSet<Point>, usize) {
        let budget = unit.move_points;
        let cur_gen = self.scratch.begin(map);
        let mut result = BTreeSet::new();

        let Some(start_idx) = self.scratch.idx(unit.pos) else {
            return (result, 0);
        };
        {
            let node = &mut self.scratch.nodes[start_idx];
            node.g = 0;
            node.f = 0;
            node.parent = usize::MAX;
            node.generation = cur_gen;
            node.open = true;
        }

        let mut open: BinaryHeap<NodeRef> = BinaryHeap::new();
        open.push(NodeRef {
            idx: start_idx,
            f: 0,
        });
        let mut expanded = 0usize;

        while let Some(current) = open.pop() {
            let ci = current.idx;
            let cn = &self.scratch.nodes[ci];

            // Skip stale entries.
            if cn.generation != cur_gen || !cn.open {
                continue;
            }
            let current_g = cn.g;
            self.scratch.nodes[ci].open = false;
            expanded += 1;

            let cp = self.scratch.point(ci);
            result.insert(cp);

            for np in cp.neighbors_4() {
                let Some(ni) = self.scratch.idx(np) else {
                    continue;
                };
                if occupancy.blocks(np) && np != unit.pos {
                    continue;
                }
                let step = self.cost_model.step_cost(map, np);
                if step == IMPASSABLE {
                    continue;
                }
                let tentative = current_g.saturating_add(step);
                if tentative > budget {
                    continue;
                }

                let n = &mut self.scratch.nodes[ni];
                if n.generation == cur_gen {
                    if tentative >= n.g {
                        continue;
                    }
                } else {
                    n.generation = cur_gen;
                }

                n.g = tentative;
                n.f = tentative;
                n.parent = ci;
                n.open = true;
                open.push(NodeRef {
                    idx: ni,
                    f: tentative,
                });
            }
        }

        (result, expanded)
    }

    /// Replace the terrain table for all subsequent queries.
    ///
    /// Cached results computed against the old table are NOT discarded;
    /// call [`clear_cache`] after structural map or table changes.
    ///
    /// [`clear_cache`]: MovementRange::clear_cache
    pub fn set_terrain_costs(&mut self, table: TerrainTable) {
        self.cost_model.set_table(table);
    }

    /// A copy of the current terrain table.
    pub fn terrain_costs(&self) -> TerrainTable {
        self.cost_model.table()
    }

    /// The cost model, for ad-hoc `movement_cost` queries.
    pub fn cost_model(&self) -> &CostModel {
        &self.cost_model
    }

    /// Drop all cached results.
    pub fn clear_cache(&mut self) {
        self.cache.clear();
    }

    /// Drop expired cached results. Cheap; suitable for a periodic
    /// maintenance tick.
    pub fn sweep_cache(&mut self) {
        self.cache.sweep();
    }

    /// Current performance counters.
    pub fn metrics(&self) -> MetricsSnapshot {
        self.metrics.snapshot()
    }

    /// Zero the performance counters.
    pub fn reset_metrics(&mut self) {
        self.metrics.reset();
    }
}
