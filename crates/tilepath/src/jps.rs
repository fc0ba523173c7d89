//! Jump Point Search successor lookup.
//!
//! A jump starts with one step from `from` to `to` and keeps stepping in the
//! same direction until it reaches the goal, finds a point with a forced
//! neighbour, or runs into a solid or out-of-bounds cell. Forced-neighbour
//! rules depend on the diagonal mode so that a jump never skips a point the
//! plain neighbour enumeration would have had to expand.

use tilepath_core::Point;

use crate::grid::Grid;
use crate::neighbors::DiagonalMode;

/// Jump from `from` through the adjacent `to` towards `goal`.
///
/// Returns the jump point, or `None` when the run dead-ends. Straight runs
/// are iterative; only the orthogonal probes from a diagonal step (or, in
/// [`DiagonalMode::Never`], from a vertical step) recurse, so the call depth
/// is at most two.
pub(crate) fn jump(
    grid: &Grid,
    mode: DiagonalMode,
    from: Point,
    to: Point,
    goal: Point,
) -> Option<Point> {
    let Point { x: dx, y: dy } = to - from;
    let w = |x: i32, y: i32| grid.is_walkable(Point::new(x, y));
    let probe = |p: Point, ddx: i32, ddy: i32| jump(grid, mode, p, p.shift(ddx, ddy), goal).is_some();

    let mut p = to;
    loop {
        if !grid.is_walkable(p) {
            return None;
        }
        if p == goal {
            return Some(p);
        }
        let Point { x, y } = p;

        let advance = match mode {
            DiagonalMode::Always | DiagonalMode::AtLeastOneWalkable => {
                if dx != 0 && dy != 0 {
                    if (w(x - dx, y + dy) && !w(x - dx, y)) || (w(x + dx, y - dy) && !w(x, y - dy)) {
                        return Some(p);
                    }
                    if probe(p, dx, 0) || probe(p, 0, dy) {
                        return Some(p);
                    }
                } else if dx != 0 {
                    if (w(x + dx, y + 1) && !w(x, y + 1)) || (w(x + dx, y - 1) && !w(x, y - 1)) {
                        return Some(p);
                    }
                } else if (w(x + 1, y + dy) && !w(x + 1, y)) || (w(x - 1, y + dy) && !w(x - 1, y))
                {
                    return Some(p);
                }
                w(x + dx, y + dy)
                    && (mode == DiagonalMode::Always || w(x + dx, y) || w(x, y + dy))
            }
            DiagonalMode::OnlyIfNoObstacles => {
                if dx != 0 && dy != 0 {
                    if (w(x + dx, y + dy) && !w(x, y + dy)) || !w(x + dx, y) {
                        return Some(p);
                    }
                    if probe(p, dx, 0) || probe(p, 0, dy) {
                        return Some(p);
                    }
                } else if dx != 0 {
                    if (w(x, y + 1) && !w(x - dx, y + 1)) || (w(x, y - 1) && !w(x - dx, y - 1)) {
                        return Some(p);
                    }
                } else if (w(x + 1, y) && !w(x + 1, y - dy)) || (w(x - 1, y) && !w(x - 1, y - dy))
                {
                    return Some(p);
                }
                w(x + dx, y + dy) && w(x + dx, y) && w(x, y + dy)
            }
            DiagonalMode::Never => {
                if dx != 0 {
                    if (w(x, y - 1) && !w(x - dx, y - 1)) || (w(x, y + 1) && !w(x - dx, y + 1)) {
                        return Some(p);
                    }
                } else if dy != 0 {
                    if (w(x - 1, y) && !w(x - 1, y - dy)) || (w(x + 1, y) && !w(x + 1, y - dy)) {
                        return Some(p);
                    }
                    if probe(p, 1, 0) || probe(p, -1, 0) {
                        return Some(p);
                    }
                }
                true
            }
        };

        if !advance || (dx == 0 && dy == 0) {
            return None;
        }
        p = p.shift(dx, dy);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn open_grid(w: i32, h: i32) -> Grid {
        let mut g = Grid::new();
        g.set_region(Point::ZERO, Point::new(w, h)).unwrap();
        g.update();
        g
    }

    #[test]
    fn straight_run_reaches_goal() {
        let g = open_grid(10, 1);
        let goal = Point::new(9, 0);
        let j = jump(&g, DiagonalMode::Never, Point::ZERO, Point::new(1, 0), goal);
        assert_eq!(j, Some(goal));
    }

    #[test]
    fn straight_run_dead_ends_at_wall() {
        let mut g = open_grid(10, 1);
        g.set_solid(Point::new(5, 0), true).unwrap();
        let j = jump(&g, DiagonalMode::Never, Point::ZERO, Point::new(1, 0), Point::new(9, 0));
        assert_eq!(j, None);
    }

    #[test]
    fn first_step_into_solid_fails() {
        let mut g = open_grid(3, 3);
        g.set_solid(Point::new(1, 0), true).unwrap();
        let j = jump(&g, DiagonalMode::Always, Point::ZERO, Point::new(1, 0), Point::new(2, 2));
        assert_eq!(j, None);
    }

    #[test]
    fn horizontal_forced_neighbour_stops_the_run() {
        // (3,1) is solid, so (4,1) is a forced neighbour of (3,0).
        let mut g = open_grid(8, 3);
        g.set_solid(Point::new(3, 1), true).unwrap();
        let j = jump(&g, DiagonalMode::Always, Point::ZERO, Point::new(1, 0), Point::new(7, 2));
        assert_eq!(j, Some(Point::new(3, 0)));
    }

    #[test]
    fn never_mode_vertical_probe_finds_goal_sideways() {
        // Moving down column 0, the goal lies to the right on row 3.
        let g = open_grid(6, 6);
        let goal = Point::new(4, 3);
        let j = jump(&g, DiagonalMode::Never, Point::ZERO, Point::new(0, 1), goal);
        assert_eq!(j, Some(Point::new(0, 3)));
    }

    #[test]
    fn diagonal_probe_finds_goal_on_axis() {
        let g = open_grid(8, 8);
        let goal = Point::new(6, 2);
        let j = jump(&g, DiagonalMode::Always, Point::ZERO, Point::new(1, 1), goal);
        assert_eq!(j, Some(Point::new(2, 2)));
    }
}
