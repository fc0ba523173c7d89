use std::fmt;

use tilepath_core::Point;

use crate::distance::Heuristic;
use crate::traits::CostModel;

/// Caller-supplied cost function of two grid coordinates.
pub type CostFn = Box<dyn Fn(Point, Point) -> f32 + Send + Sync>;

/// The pathfinder's cost policy: a built-in metric for each role, optionally
/// replaced by a caller closure.
///
/// Overrides are looked up on every call, so installing or clearing one takes
/// effect on the next evaluation.
#[derive(Default)]
pub struct CostPolicy {
    pub(crate) compute_heuristic: Heuristic,
    pub(crate) estimate_heuristic: Heuristic,
    compute_fn: Option<CostFn>,
    estimate_fn: Option<CostFn>,
}

impl CostPolicy {
    pub fn new(compute_heuristic: Heuristic, estimate_heuristic: Heuristic) -> Self {
        Self {
            compute_heuristic,
            estimate_heuristic,
            compute_fn: None,
            estimate_fn: None,
        }
    }

    pub fn compute_heuristic(&self) -> Heuristic {
        self.compute_heuristic
    }

    pub fn estimate_heuristic(&self) -> Heuristic {
        self.estimate_heuristic
    }

    pub fn set_compute_fn(&mut self, f: CostFn) {
        self.compute_fn = Some(f);
    }

    pub fn set_estimate_fn(&mut self, f: CostFn) {
        self.estimate_fn = Some(f);
    }

    pub fn clear_compute_fn(&mut self) {
        self.compute_fn = None;
    }

    pub fn clear_estimate_fn(&mut self) {
        self.estimate_fn = None;
    }

    pub fn has_compute_fn(&self) -> bool {
        self.compute_fn.is_some()
    }

    pub fn has_estimate_fn(&self) -> bool {
        self.estimate_fn.is_some()
    }
}

impl CostModel for CostPolicy {
    #[inline]
    fn compute_cost(&self, from: Point, to: Point) -> f32 {
        match &self.compute_fn {
            Some(f) => f(from, to),
            None => self.compute_heuristic.distance(from, to),
        }
    }

    #[inline]
    fn estimate_cost(&self, from: Point, to: Point) -> f32 {
        match &self.estimate_fn {
            Some(f) => f(from, to),
            None => self.estimate_heuristic.distance(from, to),
        }
    }
}

impl fmt::Debug for CostPolicy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CostPolicy")
            .field("compute_heuristic", &self.compute_heuristic)
            .field("estimate_heuristic", &self.estimate_heuristic)
            .field("compute_fn", &self.compute_fn.is_some())
            .field("estimate_fn", &self.estimate_fn.is_some())
            .finish()
    }
}
