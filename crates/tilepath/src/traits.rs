use tilepath_core::Point;

/// Cost interface consumed by the solver.
pub trait CostModel {
    /// Cost of stepping from `from` to the adjacent `to`, before weight scaling.
    fn compute_cost(&self, from: Point, to: Point) -> f32;

    /// Heuristic estimate of the remaining cost from `from` to `to`.
    fn estimate_cost(&self, from: Point, to: Point) -> f32;
}
