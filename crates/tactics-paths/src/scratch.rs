//! Reusable search arena shared by both calculators.
//!
//! Nodes are stamped with a generation counter so that starting a new
//! search is O(1): bumping the generation lazily invalidates every node
//! from previous searches without touching the array.

use tactics_core::{BattleMap, Point};

/// Per-tile search node state.
#[derive(Clone)]
pub(crate) struct Node {
    /// Accumulated cost from the start tile.
    pub(crate) g: i32,
    /// Priority (`g` for uniform-cost, `g + h` for A*).
    pub(crate) f: i32,
    /// Back-reference for path reconstruction; `usize::MAX` at roots.
    pub(crate) parent: usize,
    pub(crate) generation: u32,
    pub(crate) open: bool,
}

impl Default for Node {
    fn default() -> Self {
        Self {
            g: 0,
            f: 0,
            parent: usize::MAX,
            generation: 0,
            open: false,
        }
    }
}

/// Reference into the node array, ordered by `f` for use in `BinaryHeap`.
#[derive(Clone, Copy, Eq, PartialEq)]
pub(crate) struct NodeRef {
    pub(crate) idx: usize,
    pub(crate) f: i32,
}

impl Ord for NodeRef {
    fn cmp(&self, other: &Self) -> std::cmp::Ordering {
        // Reverse so BinaryHeap (max-heap) pops smallest f first.
        other.f.cmp(&self.f)
    }
}

impl PartialOrd for NodeRef {
    fn partial_cmp(&self, other: &Self) -> Option<std::cmp::Ordering> {
        Some(self.cmp(other))
    }
}

/// Node arena plus flat coordinate mapping for one map's dimensions.
///
/// Owned by a calculator and resized to whichever map the current query
/// targets; shrinking keeps capacity and only bumps the generation.
pub(crate) struct SearchScratch {
    width: i32,
    height: i32,
    pub(crate) nodes: Vec<Node>,
    generation: u32,
}

impl SearchScratch {
    pub(crate) fn new() -> Self {
        Self {
            width: 0,
            height: 0,
            nodes: Vec::new(),
            generation: 0,
        }
    }

    /// Prepare for a fresh search over `map`: adopt its dimensions, bump
    /// the generation, and grow the arena if it no longer fits. Returns
    /// the generation stamp for this search.
    pub(crate) fn begin(&mut self, map: &BattleMap) -> u32 {
        self.width = map.width();
        self.height = map.height();
        let len = (self.width * self.height) as usize;
        if len > self.nodes.len() {
            self.nodes.clear();
            self.nodes.resize(len, Node::default());
            self.generation = 0;
        }
        self.generation = self.generation.wrapping_add(1);
        self.generation
    }

    /// Convert a point to a flat index. `None` if outside the map.
    #[inline]
    pub(crate) fn idx(&self, p: Point) -> Option<usize> {
        if p.x < 0 || p.y < 0 || p.x >= self.width || p.y >= self.height {
            return None;
        }
        Some((p.y * self.width + p.x) as usize)
    }

    /// Convert a flat index back to a point.
    #[inline]
    pub(crate) fn point(&self, idx: usize) -> Point {
        Point::new(idx as i32 % self.width, idx as i32 / self.width)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn begin_with_smaller_map_keeps_capacity() {
        let mut scratch = SearchScratch::new();
        let g1 = scratch.begin(&BattleMap::new(10, 10));
        let cap = scratch.nodes.len();
        let g2 = scratch.begin(&BattleMap::new(3, 3));
        assert_eq!(scratch.nodes.len(), cap);
        assert_ne!(g1, g2);
        // Index mapping follows the new width.
        assert_eq!(scratch.idx(Point::new(2, 1)), Some(5));
        assert_eq!(scratch.idx(Point::new(3, 0)), None);
    }

    #[test]
    fn begin_with_larger_map_grows() {
        let mut scratch = SearchScratch::new();
        scratch.begin(&BattleMap::new(2, 2));
        scratch.begin(&BattleMap::new(6, 6));
        assert_eq!(scratch.nodes.len(), 36);
    }

    #[test]
    fn point_round_trips_through_idx() {
        let mut scratch = SearchScratch::new();
        scratch.begin(&BattleMap::new(7, 5));
        let p = Point::new(4, 3);
        let i = scratch.idx(p).unwrap();
        assert_eq!(scratch.point(i), p);
    }
}
