//! Least-cost route computation via A*.

use std::collections::BinaryHeap;
use std::time::Instant;

use tactics_core::{
    BattleMap, CostModel, IMPASSABLE, OccupancyView, Point, TerrainTable, Unit, UnitId,
};

use crate::cache::ResultCache;
use crate::config::EngineConfig;
use crate::distance::manhattan;
use crate::fingerprint::PathKey;
use crate::metrics::{MetricsSnapshot, PerformanceMonitor};
use crate::scratch::{NodeRef, SearchScratch};

/// Computes least-cost ordered routes between two tiles.
///
/// A* with a Manhattan heuristic, which is admissible because no step
/// costs less than 1. The goal tile may be entered even while occupied
/// (moving onto an enemy is the caller's business); occupied
/// intermediate tiles are never entered.
///
/// A hard cap on node expansions bounds worst-case latency on
/// maze-like maps. A capped search returns an empty path exactly like
/// a genuinely disconnected query; the distinction shows up only in
/// the metrics.
pub struct PathFinder {
    cost_model: CostModel,
    config: EngineConfig,
    cache: ResultCache<PathKey, Vec<Point>>,
    metrics: PerformanceMonitor,
    scratch: SearchScratch,
}

impl PathFinder {
    /// Create a path finder over the given terrain table.
    pub fn new(table: TerrainTable, config: EngineConfig) -> Self {
        Self {
            cost_model: CostModel::new(table),
            config,
            cache: ResultCache::new(config.cache_ttl, config.max_cache_entries),
            metrics: PerformanceMonitor::new(),
            scratch: SearchScratch::new(),
        }
    }

    /// The least-cost route from `start` to `goal`, inclusive of both
    /// endpoints. An empty vector means "no path found within budget or
    /// complexity" — never a structural guarantee of disconnection.
    ///
    /// `start == goal` yields `[start]`. Out-of-bounds endpoints, a
    /// non-positive `max_cost`, or impassable goal terrain yield an
    /// empty path.
    pub fn find_path(
        &mut self,
        start: Point,
        goal: Point,
        map: &BattleMap,
        max_cost: i32,
        occupancy: &OccupancyView,
    ) -> Vec<Point> {
        let started = Instant::now();

        if max_cost <= 0 || !map.contains(start) || !map.contains(goal) {
            self.metrics.record_search(started.elapsed(), 0);
            return Vec::new();
        }
        if start == goal {
            self.metrics.record_search(started.elapsed(), 0);
            return vec![start];
        }
        if !self.cost_model.passable(map, goal) {
            self.metrics.record_search(started.elapsed(), 0);
            return Vec::new();
        }

        let key = PathKey::new(start, goal, max_cost, map, occupancy);
        if let Some(hit) = self.cache.get(&key) {
            log::debug!("path cache hit for {} -> {}", start, goal);
            self.metrics.record_cache_hit(started.elapsed());
            return hit;
        }

        let (path, expanded, capped) = self.search(start, goal, map, max_cost, occupancy);
        if capped {
            log::debug!(
                "path search {} -> {} hit the {}-node cap",
                start,
                goal,
                self.config.node_exploration_cap
            );
            self.metrics.record_cap_termination();
        }
        self.cache.put(key, path.clone());
        self.metrics.record_search(started.elapsed(), expanded);
        path
    }

    /// [`find_path`] against a unit roster: living units block except
    /// the one identified by `exclude` (typically the mover).
    ///
    /// [`find_path`]: PathFinder::find_path
    pub fn find_path_for_units(
        &mut self,
        start: Point,
        goal: Point,
        map: &BattleMap,
        max_cost: i32,
        units: &[Unit],
        exclude: Option<UnitId>,
    ) -> Vec<Point> {
        let occupancy = OccupancyView::from_units(units, exclude);
        self.find_path(start, goal, map, max_cost, &occupancy)
    }

    fn search(
        &mut self,
        start: Point,
        goal: Point,
        map: &BattleMap,
        max_cost: i32,
        occupancy: &OccupancyView,
    ) -> (Vec<Point>, usize, bool) {
        let cap = self.config.node_exploration_cap;
        let cur_gen = self.scratch.begin(map);

        let (Some(start_idx), Some(goal_idx)) = (self.scratch.idx(start), self.scratch.idx(goal))
        else {
            return (Vec::new(), 0, false);
        };
        {
            let node = &mut self.scratch.nodes[start_idx];
            node.g = 0;
            node.f = manhattan(start, goal);
            node.parent = usize::MAX;
            node.generation = cur_gen;
            node.open = true;
        }

        let mut open: BinaryHeap<NodeRef> = BinaryHeap::new();
        open.push(NodeRef {
            idx: start_idx,
            f: self.scratch.nodes[start_idx].f,
        });

        let mut expanded = 0usize;
        let mut found = false;
        let mut capped = false;

        while let Some(current) = open.pop() {
            let ci = current.idx;
            let cn = &self.scratch.nodes[ci];

            // Skip stale entries.
            if cn.generation != cur_gen || !cn.open {
                continue;
            }
            if ci == goal_idx {
                found = true;
                break;
            }
            if expanded >= cap {
                capped = true;
                break;
            }

            let current_g = cn.g;
            self.scratch.nodes[ci].open = false;
            expanded += 1;
            let cp = self.scratch.point(ci);

            for np in cp.neighbors_4() {
                let Some(ni) = self.scratch.idx(np) else {
                    continue;
                };
                // The goal itself may be entered while occupied.
                if occupancy.blocks(np) && np != goal {
                    continue;
                }
                let step = self.cost_model.step_cost(map, np);
                if step == IMPASSABLE {
                    continue;
                }
                let tentative = current_g.saturating_add(step);
                if tentative > max_cost {
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
                n.f = tentative + manhattan(np, goal);
                n.parent = ci;
                n.open = true;
                open.push(NodeRef { idx: ni, f: n.f });
            }
        }

        if !found {
            return (Vec::new(), expanded, capped);
        }

        // Reconstruct by walking the parent chain back from the goal.
        let mut path = Vec::new();
        let mut ci = goal_idx;
        while ci != usize::MAX {
            path.push(self.scratch.point(ci));
            ci = self.scratch.nodes[ci].parent;
        }
        path.reverse();
        (path, expanded, capped)
    }

    /// Total cost of walking `path`, or `-1` if any tile is out of
    /// bounds, any consecutive pair is not cardinally adjacent, or any
    /// entered tile is impassable. Empty and single-tile paths cost 0.
    pub fn calculate_path_cost(&self, path: &[Point], map: &BattleMap) -> i32 {
        if path.iter().any(|&p| !map.contains(p)) {
            return -1;
        }
        let mut total = 0;
        for pair in path.windows(2) {
            if manhattan(pair[0], pair[1]) != 1 {
                return -1;
            }
            let step = self.cost_model.step_cost(map, pair[1]);
            if step == IMPASSABLE {
                return -1;
            }
            total += step;
        }
        total
    }

    /// Whether `path` is walkable right now: structurally valid per
    /// [`calculate_path_cost`], affordable within `max_cost`, and free
    /// of occupied tiles strictly between its endpoints.
    ///
    /// [`calculate_path_cost`]: PathFinder::calculate_path_cost
    pub fn is_path_valid(
        &self,
        path: &[Point],
        map: &BattleMap,
        max_cost: i32,
        occupancy: &OccupancyView,
    ) -> bool {
        if path.is_empty() {
            return false;
        }
        let cost = self.calculate_path_cost(path, map);
        if cost < 0 || cost > max_cost {
            return false;
        }
        if path.len() > 2 && path[1..path.len() - 1].iter().any(|&p| occupancy.blocks(p)) {
            return false;
        }
        true
    }

    /// Candidate stand-in goals when the direct goal is blocked: the
    /// passable, unoccupied cardinal neighbors of `goal`, sorted by
    /// Manhattan distance from `start` (ties row-major).
    pub fn alternative_goals(
        &self,
        start: Point,
        goal: Point,
        map: &BattleMap,
        occupancy: &OccupancyView,
    ) -> Vec<Point> {
        let mut candidates: Vec<Point> = goal
            .neighbors_4()
            .into_iter()
            .filter(|&n| {
                map.contains(n) && self.cost_model.passable(map, n) && !occupancy.blocks(n)
            })
            .collect();
        candidates.sort_by_key(|&n| (manhattan(start, n), n));
        candidates
    }

    /// The first non-empty path to one of [`alternative_goals`], or an
    /// empty path when none of the alternates works either.
    ///
    /// [`alternative_goals`]: PathFinder::alternative_goals
    pub fn find_alternative_path(
        &mut self,
        start: Point,
        goal: Point,
        map: &BattleMap,
        max_cost: i32,
        occupancy: &OccupancyView,
    ) -> Vec<Point> {
        for alt in self.alternative_goals(start, goal, map, occupancy) {
            let path = self.find_path(start, alt, map, max_cost, occupancy);
            if !path.is_empty() {
                return path;
            }
        }
        Vec::new()
    }

    /// Replace the terrain table for all subsequent queries.
    ///
    /// Cached results computed against the old table are NOT discarded;
    /// call [`clear_cache`] after structural map or table changes.
    ///
    /// [`clear_cache`]: PathFinder::clear_cache
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

    /// Drop expired cached results.
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

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;
    use tactics_core::{TerrainEntry, TerrainId};

    const SLOW: TerrainId = TerrainId(1);
    const WALL: TerrainId = TerrainId(9);

    fn table() -> TerrainTable {
        TerrainTable::from_entries([
            (SLOW, TerrainEntry::new(2, true)),
            (WALL, TerrainEntry::new(1, false)),
        ])
    }

    fn finder() -> PathFinder {
        PathFinder::new(table(), EngineConfig::default())
    }

    /// 3x1 corridor with a cost-2 tile in the middle.
    fn corridor() -> BattleMap {
        let mut map = BattleMap::new(3, 1);
        map.set_terrain(Point::new(1, 0), SLOW);
        map
    }

    #[test]
    fn path_cost_sums_entered_tiles() {
        let finder = finder();
        let map = corridor();
        let path = [Point::new(0, 0), Point::new(1, 0), Point::new(2, 0)];
        assert_eq!(finder.calculate_path_cost(&path, &map), 3);
    }

    #[test]
    fn budget_gates_the_expensive_corridor() {
        let mut finder = finder();
        let map = corridor();
        let (start, goal) = (Point::new(0, 0), Point::new(2, 0));
        let occ = OccupancyView::empty();

        assert!(finder.find_path(start, goal, &map, 2, &occ).is_empty());
        assert_eq!(
            finder.find_path(start, goal, &map, 3, &occ),
            vec![Point::new(0, 0), Point::new(1, 0), Point::new(2, 0)]
        );
    }

    #[test]
    fn degenerate_queries_yield_empty_or_singleton() {
        let mut finder = finder();
        let map = BattleMap::new(4, 4);
        let occ = OccupancyView::empty();
        let p = Point::new(1, 1);

        assert_eq!(finder.find_path(p, p, &map, 5, &occ), vec![p]);
        assert!(finder.find_path(p, Point::new(9, 0), &map, 5, &occ).is_empty());
        assert!(finder.find_path(Point::new(-1, 0), p, &map, 5, &occ).is_empty());
        assert!(finder.find_path(p, Point::new(2, 2), &map, 0, &occ).is_empty());
    }

    #[test]
    fn path_endpoints_and_adjacency_invariants_hold() {
        let mut finder = finder();
        let mut map = BattleMap::new(6, 6);
        map.set_terrain(Point::new(2, 1), WALL);
        map.set_terrain(Point::new(2, 2), WALL);
        map.set_terrain(Point::new(2, 3), WALL);
        let (start, goal) = (Point::new(0, 2), Point::new(5, 2));

        let path = finder.find_path(start, goal, &map, 20, &OccupancyView::empty());
        assert_eq!(path.first(), Some(&start));
        assert_eq!(path.last(), Some(&goal));
        for pair in path.windows(2) {
            assert_eq!(manhattan(pair[0], pair[1]), 1);
        }
    }

    #[test]
    fn occupied_goal_may_be_entered_but_occupied_transit_may_not() {
        let mut finder = finder();
        let map = BattleMap::new(3, 1);
        let (start, goal) = (Point::new(0, 0), Point::new(2, 0));

        // Occupied goal: still pathable.
        let occ = OccupancyView::from_positions([goal]);
        assert_eq!(finder.find_path(start, goal, &map, 5, &occ).len(), 3);

        // Occupied middle of a one-lane corridor: no path.
        let occ = OccupancyView::from_positions([Point::new(1, 0)]);
        assert!(finder.find_path(start, goal, &map, 5, &occ).is_empty());
    }

    #[test]
    fn impassable_goal_terrain_blocks_even_unoccupied() {
        let mut finder = finder();
        let mut map = BattleMap::new(3, 3);
        map.set_terrain(Point::new(2, 2), WALL);
        let path = finder.find_path(
            Point::new(0, 0),
            Point::new(2, 2),
            &map,
            10,
            &OccupancyView::empty(),
        );
        assert!(path.is_empty());
    }

    #[test]
    fn node_cap_terminates_with_empty_path() {
        let config = EngineConfig {
            node_exploration_cap: 4,
            ..EngineConfig::default()
        };
        let mut finder = PathFinder::new(table(), config);
        let map = BattleMap::new(20, 20);
        let path = finder.find_path(
            Point::new(0, 0),
            Point::new(19, 19),
            &map,
            1000,
            &OccupancyView::empty(),
        );
        assert!(path.is_empty());
        let snap = finder.metrics();
        assert_eq!(snap.cap_terminations, 1);
        assert!(snap.max_nodes_explored <= 4);
    }

    #[test]
    fn is_path_valid_rejects_occupied_interior_and_over_budget() {
        let finder = finder();
        let map = BattleMap::new(4, 1);
        let path = [
            Point::new(0, 0),
            Point::new(1, 0),
            Point::new(2, 0),
            Point::new(3, 0),
        ];
        let free = OccupancyView::empty();
        assert!(finder.is_path_valid(&path, &map, 3, &free));
        assert!(!finder.is_path_valid(&path, &map, 2, &free));

        let occupied = OccupancyView::from_positions([Point::new(2, 0)]);
        assert!(!finder.is_path_valid(&path, &map, 3, &occupied));
        // Occupied endpoints are fine.
        let endpoints = OccupancyView::from_positions([Point::new(0, 0), Point::new(3, 0)]);
        assert!(finder.is_path_valid(&path, &map, 3, &endpoints));
    }

    #[test]
    fn path_cost_rejects_teleports_and_walls() {
        let finder = finder();
        let mut map = BattleMap::new(4, 4);
        map.set_terrain(Point::new(1, 0), WALL);
        assert_eq!(
            finder.calculate_path_cost(&[Point::new(0, 0), Point::new(2, 0)], &map),
            -1
        );
        assert_eq!(
            finder.calculate_path_cost(&[Point::new(0, 0), Point::new(1, 0)], &map),
            -1
        );
        assert_eq!(
            finder.calculate_path_cost(&[Point::new(0, 0), Point::new(9, 9)], &map),
            -1
        );
        assert_eq!(finder.calculate_path_cost(&[], &map), 0);
        assert_eq!(finder.calculate_path_cost(&[Point::new(0, 0)], &map), 0);
    }

    #[test]
    fn alternates_are_sorted_by_distance_from_start() {
        let mut finder = finder();
        let map = BattleMap::new(5, 5);
        let start = Point::new(0, 2);
        let goal = Point::new(3, 2);
        let occ = OccupancyView::from_positions([goal]);

        let alts = finder.alternative_goals(start, goal, &map, &occ);
        assert_eq!(alts.first(), Some(&Point::new(2, 2)));
        assert_eq!(alts.len(), 4);

        let path = finder.find_alternative_path(start, goal, &map, 10, &occ);
        assert_eq!(path.last(), Some(&Point::new(2, 2)));
    }

    #[test]
    fn repeated_query_hits_the_cache_with_equal_result() {
        let mut finder = finder();
        let map = BattleMap::new(8, 8);
        let occ = OccupancyView::empty();
        let (start, goal) = (Point::new(0, 0), Point::new(6, 5));

        let first = finder.find_path(start, goal, &map, 20, &occ);
        let second = finder.find_path(start, goal, &map, 20, &occ);
        assert_eq!(first, second);

        let snap = finder.metrics();
        assert_eq!(snap.cache_hits, 1);
        assert_eq!(snap.cache_misses, 1);
    }

    #[test]
    fn expired_entry_is_recomputed_identically() {
        let config = EngineConfig {
            cache_ttl: Duration::from_millis(10),
            ..EngineConfig::default()
        };
        let mut finder = PathFinder::new(table(), config);
        let map = BattleMap::new(6, 6);
        let occ = OccupancyView::empty();

        let first = finder.find_path(Point::new(0, 0), Point::new(5, 5), &map, 20, &occ);
        std::thread::sleep(Duration::from_millis(25));
        let second = finder.find_path(Point::new(0, 0), Point::new(5, 5), &map, 20, &occ);
        assert_eq!(first, second);
        assert_eq!(finder.metrics().cache_hits, 0);
        assert_eq!(finder.metrics().cache_misses, 2);
    }

    #[test]
    fn roster_exclusion_unblocks_the_mover() {
        let mut finder = finder();
        let map = BattleMap::new(3, 1);
        let mover = Unit::new(UnitId::new(1), Point::new(1, 0), 4, 10);
        let units = [mover];
        let (start, goal) = (Point::new(0, 0), Point::new(2, 0));

        // Without exclusion the mover's tile plugs the corridor.
        assert!(
            finder
                .find_path_for_units(start, goal, &map, 5, &units, None)
                .is_empty()
        );
        assert_eq!(
            finder
                .find_path_for_units(start, goal, &map, 5, &units, Some(mover.id))
                .len(),
            3
        );
    }
}
