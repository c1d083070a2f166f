//! Which tiles currently hold a blocking unit.

use std::collections::BTreeSet;

use crate::geom::Point;
use crate::unit::{Unit, UnitId};

/// A snapshot of the tiles blocked by living units.
///
/// Built once per query from the unit roster (or a raw position list)
/// and treated as immutable for the duration of the search. One unit —
/// typically the mover itself — can be excluded at construction time so
/// that its own tile never blocks its own search.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct OccupancyView {
    blocked: BTreeSet<Point>,
}

impl OccupancyView {
    /// An empty view: nothing blocks.
    pub fn empty() -> Self {
        Self::default()
    }

    /// Build from a unit roster. Units with `hp <= 0` do not block;
    /// neither does the unit identified by `exclude`.
    pub fn from_units(units: &[Unit], exclude: Option<UnitId>) -> Self {
        let blocked = units
            .iter()
            .filter(|u| u.blocks() && Some(u.id) != exclude)
            .map(|u| u.pos)
            .collect();
        Self { blocked }
    }

    /// Build from raw blocked positions.
    pub fn from_positions(positions: impl IntoIterator<Item = Point>) -> Self {
        Self {
            blocked: positions.into_iter().collect(),
        }
    }

    /// Whether `p` is blocked.
    #[inline]
    pub fn blocks(&self, p: Point) -> bool {
        self.blocked.contains(&p)
    }

    /// Whether nothing is blocked.
    pub fn is_empty(&self) -> bool {
        self.blocked.is_empty()
    }

    /// Number of blocked tiles.
    pub fn len(&self) -> usize {
        self.blocked.len()
    }

    /// Blocked tiles in sorted (row-major) order.
    pub fn positions(&self) -> impl Iterator<Item = Point> + '_ {
        self.blocked.iter().copied()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn roster() -> Vec<Unit> {
        vec![
            Unit::new(UnitId::new(1), Point::new(1, 1), 4, 10),
            Unit::new(UnitId::new(2), Point::new(2, 2), 4, 0),
            Unit::new(UnitId::new(3), Point::new(3, 3), 4, 5),
        ]
    }

    #[test]
    fn dead_units_do_not_block() {
        let view = OccupancyView::from_units(&roster(), None);
        assert!(view.blocks(Point::new(1, 1)));
        assert!(!view.blocks(Point::new(2, 2)));
        assert!(view.blocks(Point::new(3, 3)));
    }

    #[test]
    fn excluded_unit_does_not_block() {
        let view = OccupancyView::from_units(&roster(), Some(UnitId::new(1)));
        assert!(!view.blocks(Point::new(1, 1)));
        assert!(view.blocks(Point::new(3, 3)));
        assert_eq!(view.len(), 1);
    }

    #[test]
    fn positions_iterate_sorted() {
        let view =
            OccupancyView::from_positions([Point::new(5, 0), Point::new(0, 5), Point::new(2, 2)]);
        let pts: Vec<_> = view.positions().collect();
        assert_eq!(
            pts,
            vec![Point::new(5, 0), Point::new(2, 2), Point::new(0, 5)]
        );
    }
}
