use std::f32::consts::SQRT_2;

use tilepath_core::Point;

/// Built-in distance functions usable as traversal cost or as heuristic.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Heuristic {
    /// Straight-line distance.
    #[default]
    Euclidean,
    /// `|dx| + |dy|`.
    Manhattan,
    /// Diagonal steps cost `sqrt(2)`, straight steps cost 1.
    Octile,
    /// `max(|dx|, |dy|)`.
    Chebyshev,
}

impl Heuristic {
    /// Distance between `a` and `b` under this metric.
    #[inline]
    pub fn distance(self, a: Point, b: Point) -> f32 {
        match self {
            Self::Euclidean => euclidean(a, b),
            Self::Manhattan => manhattan(a, b),
            Self::Octile => octile(a, b),
            Self::Chebyshev => chebyshev(a, b),
        }
    }
}

#[inline]
fn deltas(a: Point, b: Point) -> (f32, f32) {
    ((a.x - b.x).abs() as f32, (a.y - b.y).abs() as f32)
}

/// Euclidean (L2) distance between two points.
#[inline]
pub fn euclidean(a: Point, b: Point) -> f32 {
    let (dx, dy) = deltas(a, b);
    (dx * dx + dy * dy).sqrt()
}

/// Manhattan (L1) distance between two points.
#[inline]
pub fn manhattan(a: Point, b: Point) -> f32 {
    let (dx, dy) = deltas(a, b);
    dx + dy
}

/// Octile distance between two points.
#[inline]
pub fn octile(a: Point, b: Point) -> f32 {
    let (dx, dy) = deltas(a, b);
    (SQRT_2 - 1.0) * dx.min(dy) + dx.max(dy)
}

/// Chebyshev (L∞) distance between two points.
#[inline]
pub fn chebyshev(a: Point, b: Point) -> f32 {
    let (dx, dy) = deltas(a, b);
    dx.max(dy)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn close(a: f32, b: f32) -> bool {
        (a - b).abs() < 1e-5
    }

    #[test]
    fn metrics_on_a_knight_move() {
        let a = Point::new(0, 0);
        let b = Point::new(2, -1);
        assert!(close(euclidean(a, b), 5f32.sqrt()));
        assert!(close(manhattan(a, b), 3.0));
        assert!(close(octile(a, b), SQRT_2 + 1.0));
        assert!(close(chebyshev(a, b), 2.0));
    }

    #[test]
    fn metrics_are_symmetric() {
        let a = Point::new(-3, 7);
        let b = Point::new(4, 1);
        for h in [
            Heuristic::Euclidean,
            Heuristic::Manhattan,
            Heuristic::Octile,
            Heuristic::Chebyshev,
        ] {
            assert_eq!(h.distance(a, b), h.distance(b, a));
            assert_eq!(h.distance(a, a), 0.0);
        }
    }

    #[test]
    fn default_is_euclidean() {
        assert_eq!(Heuristic::default(), Heuristic::Euclidean);
    }
}
