use tilepath_core::Point;

use crate::grid::Grid;

/// When a diagonal step is allowed.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum DiagonalMode {
    /// Diagonal steps are always allowed, even between two solid flanks.
    #[default]
    Always,
    /// Only orthogonal steps.
    Never,
    /// At least one of the two flanking orthogonal cells must be walkable.
    AtLeastOneWalkable,
    /// Both flanking orthogonal cells must be walkable.
    OnlyIfNoObstacles,
}

/// Append the walkable neighbors of `p` into `buf`.
///
/// Orthogonal neighbors come first (top, right, bottom, left), then the
/// permitted diagonals (top-left, top-right, bottom-right, bottom-left). The
/// caller clears `buf` before calling.
pub(crate) fn collect_neighbors(grid: &Grid, p: Point, mode: DiagonalMode, buf: &mut Vec<Point>) {
    let mut straight = [false; 4];
    for (open, n) in straight.iter_mut().zip(p.neighbors_4()) {
        if grid.is_walkable(n) {
            buf.push(n);
            *open = true;
        }
    }
    let [top, right, bottom, left] = straight;

    let allowed = match mode {
        DiagonalMode::Always => [true; 4],
        DiagonalMode::Never => return,
        DiagonalMode::AtLeastOneWalkable => [
            left || top,
            top || right,
            right || bottom,
            bottom || left,
        ],
        DiagonalMode::OnlyIfNoObstacles => [
            left && top,
            top && right,
            right && bottom,
            bottom && left,
        ],
    };

    for (ok, n) in allowed.into_iter().zip(p.diagonals()) {
        if ok && grid.is_walkable(n) {
            buf.push(n);
        }
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

    fn collect(g: &Grid, p: Point, mode: DiagonalMode) -> Vec<Point> {
        let mut buf = Vec::new();
        collect_neighbors(g, p, mode, &mut buf);
        buf
    }

    #[test]
    fn open_cell_order() {
        let g = open_grid(3, 3);
        let c = Point::new(1, 1);
        assert_eq!(
            collect(&g, c, DiagonalMode::Always),
            vec![
                Point::new(1, 0),
                Point::new(2, 1),
                Point::new(1, 2),
                Point::new(0, 1),
                Point::new(0, 0),
                Point::new(2, 0),
                Point::new(2, 2),
                Point::new(0, 2),
            ]
        );
        assert_eq!(collect(&g, c, DiagonalMode::Never).len(), 4);
    }

    #[test]
    fn corner_stays_in_bounds() {
        let g = open_grid(3, 3);
        assert_eq!(
            collect(&g, Point::ZERO, DiagonalMode::Always),
            vec![Point::new(1, 0), Point::new(0, 1), Point::new(1, 1)]
        );
    }

    #[test]
    fn flank_rules() {
        // Top and left of the center are solid.
        let mut g = open_grid(3, 3);
        g.set_solid(Point::new(1, 0), true).unwrap();
        g.set_solid(Point::new(0, 1), true).unwrap();
        let c = Point::new(1, 1);

        let always = collect(&g, c, DiagonalMode::Always);
        assert!(always.contains(&Point::new(0, 0)));

        let one = collect(&g, c, DiagonalMode::AtLeastOneWalkable);
        assert!(!one.contains(&Point::new(0, 0)));
        assert!(one.contains(&Point::new(2, 0)));
        assert!(one.contains(&Point::new(0, 2)));

        let none = collect(&g, c, DiagonalMode::OnlyIfNoObstacles);
        assert_eq!(
            none,
            vec![Point::new(2, 1), Point::new(1, 2), Point::new(2, 2)]
        );
    }

    #[test]
    fn solid_diagonal_is_skipped() {
        let mut g = open_grid(3, 3);
        g.set_solid(Point::new(2, 2), true).unwrap();
        let n = collect(&g, Point::new(1, 1), DiagonalMode::Always);
        assert_eq!(n.len(), 7);
        assert!(!n.contains(&Point::new(2, 2)));
    }
}
