use tactics_core::Point;

/// Manhattan (L1) distance between two points.
///
/// Movement is 4-directional and no step costs less than 1, so this is
/// an admissible A* heuristic.
#[inline]
pub fn manhattan(a: Point, b: Point) -> i32 {
    (a.x - b.x).abs() + (a.y - b.y).abs()
}
