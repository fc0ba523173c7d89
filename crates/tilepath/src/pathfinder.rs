use glam::Vec2;
use log::{debug, error, warn};
use tilepath_core::{Point, Range};

use crate::config::{HpaConfig, PathfinderConfig};
use crate::cost::{CostFn, CostPolicy};
use crate::distance::Heuristic;
use crate::error::{ConfigError, GraphError, GridError, PathError};
use crate::grid::Grid;
use crate::hpa::{HpaGraph, HpaStats};
use crate::neighbors::DiagonalMode;
use crate::solver::Solver;
use crate::traits::CostModel;

/// A* pathfinder over a rectangular grid, with optional HPA* acceleration.
///
/// Typical use: set the region, call [`update`](Self::update), mark solid
/// cells and weights, optionally enable HPA and call
/// [`update_hpa`](Self::update_hpa), then query paths.
///
/// ```
/// use tilepath::{DiagonalMode, GridPathfinder};
/// use tilepath_core::Point;
///
/// let mut pf = GridPathfinder::new();
/// pf.set_region(Point::ZERO, Point::new(8, 8)).unwrap();
/// pf.set_diagonal_mode(DiagonalMode::Never);
/// pf.update();
/// pf.set_point_solid(Point::new(1, 0), true).unwrap();
///
/// let path = pf.get_id_path(Point::ZERO, Point::new(2, 0));
/// assert_eq!(path.len(), 5);
/// ```
#[derive(Debug)]
pub struct GridPathfinder {
    grid: Grid,
    solver: Solver,
    costs: CostPolicy,
    diagonal_mode: DiagonalMode,
    jumping_enabled: bool,
    hpa: HpaConfig,
    hpa_enabled: bool,
    hpa_dirty: bool,
    graph: HpaGraph,
}

impl Default for GridPathfinder {
    fn default() -> Self {
        Self::new()
    }
}

fn rejected(e: ConfigError) -> ConfigError {
    warn!("{e}");
    e
}

impl GridPathfinder {
    /// An empty pathfinder: zero-sized region, Euclidean costs, diagonals
    /// always allowed, HPA disabled.
    pub fn new() -> Self {
        Self {
            grid: Grid::new(),
            solver: Solver::new(),
            costs: CostPolicy::default(),
            diagonal_mode: DiagonalMode::default(),
            jumping_enabled: false,
            hpa: HpaConfig::default(),
            hpa_enabled: false,
            hpa_dirty: false,
            graph: HpaGraph::new(),
        }
    }

    /// Build a pathfinder from `config` and allocate its cells.
    ///
    /// The hierarchical graph, if enabled, still needs
    /// [`update_hpa`](Self::update_hpa) once the cells are set up.
    pub fn from_config(config: &PathfinderConfig) -> Result<Self, ConfigError> {
        let mut pf = Self::new();
        pf.set_region(config.origin, config.size)?;
        pf.set_offset(config.offset);
        pf.set_cell_size(config.cell_size);
        pf.diagonal_mode = config.diagonal_mode;
        pf.costs = CostPolicy::new(config.compute_heuristic, config.estimate_heuristic);
        pf.jumping_enabled = config.jumping_enabled;
        if let Some(hpa) = config.hpa {
            hpa.validate(config.size).map_err(rejected)?;
            pf.hpa = hpa;
            pf.hpa_enabled = true;
            pf.hpa_dirty = true;
        }
        pf.update();
        Ok(pf)
    }

    /// The current configuration.
    pub fn config(&self) -> PathfinderConfig {
        let region = self.grid.region();
        PathfinderConfig {
            origin: region.min,
            size: region.size(),
            offset: self.grid.offset(),
            cell_size: self.grid.cell_size(),
            diagonal_mode: self.diagonal_mode,
            compute_heuristic: self.costs.compute_heuristic(),
            estimate_heuristic: self.costs.estimate_heuristic(),
            jumping_enabled: self.jumping_enabled,
            hpa: self.hpa_enabled.then_some(self.hpa),
        }
    }

    // -----------------------------------------------------------------------
    // Geometry
    // -----------------------------------------------------------------------

    /// Set the region. With HPA enabled the new size must satisfy the HPA
    /// constraints, otherwise the previous region is kept.
    pub fn set_region(&mut self, origin: Point, size: Point) -> Result<(), ConfigError> {
        if size.x < 0 || size.y < 0 {
            return Err(rejected(ConfigError::NegativeSize(size)));
        }
        let current = self.grid.region();
        if current.min == origin && current.size() == size {
            return Ok(());
        }
        if self.hpa_enabled {
            self.hpa.validate(size).map_err(rejected)?;
            self.hpa_dirty = true;
        }
        self.grid.set_region(origin, size).map_err(rejected)
    }

    #[inline]
    pub fn region(&self) -> Range {
        self.grid.region()
    }

    /// Change the region size, keeping its origin.
    pub fn set_size(&mut self, size: Point) -> Result<(), ConfigError> {
        self.set_region(self.grid.region().min, size)
    }

    #[inline]
    pub fn size(&self) -> Point {
        self.grid.size()
    }

    pub fn set_offset(&mut self, offset: Vec2) {
        self.grid.set_offset(offset);
    }

    #[inline]
    pub fn offset(&self) -> Vec2 {
        self.grid.offset()
    }

    pub fn set_cell_size(&mut self, cell_size: Vec2) {
        self.grid.set_cell_size(cell_size);
    }

    #[inline]
    pub fn cell_size(&self) -> Vec2 {
        self.grid.cell_size()
    }

    #[inline]
    pub fn is_in_bounds(&self, x: i32, y: i32) -> bool {
        self.grid.is_in_bounds(x, y)
    }

    #[inline]
    pub fn is_in_boundsv(&self, id: Point) -> bool {
        self.grid.is_in_boundsv(id)
    }

    /// Whether geometry changed since the last [`update`](Self::update).
    #[inline]
    pub fn is_dirty(&self) -> bool {
        self.grid.is_dirty()
    }

    /// Reallocate the cells for the current geometry. All cells become
    /// walkable with unit weight.
    pub fn update(&mut self) {
        self.grid.update();
        self.solver.resize(self.grid.len());
        if self.hpa_enabled {
            self.hpa_dirty = true;
        }
    }

    /// Release all cells and reset the region to empty.
    pub fn clear(&mut self) {
        self.grid.clear();
        self.solver.resize(0);
        self.graph = HpaGraph::new();
        self.hpa_dirty = self.hpa_enabled;
    }

    // -----------------------------------------------------------------------
    // Search policy
    // -----------------------------------------------------------------------

    pub fn set_diagonal_mode(&mut self, mode: DiagonalMode) {
        if self.diagonal_mode != mode {
            self.diagonal_mode = mode;
            self.mark_hpa_dirty();
        }
    }

    #[inline]
    pub fn diagonal_mode(&self) -> DiagonalMode {
        self.diagonal_mode
    }

    pub fn set_default_compute_heuristic(&mut self, heuristic: Heuristic) {
        if self.costs.compute_heuristic != heuristic {
            self.costs.compute_heuristic = heuristic;
            self.mark_hpa_dirty();
        }
    }

    #[inline]
    pub fn default_compute_heuristic(&self) -> Heuristic {
        self.costs.compute_heuristic()
    }

    pub fn set_default_estimate_heuristic(&mut self, heuristic: Heuristic) {
        self.costs.estimate_heuristic = heuristic;
    }

    #[inline]
    pub fn default_estimate_heuristic(&self) -> Heuristic {
        self.costs.estimate_heuristic()
    }

    /// Enable Jump Point Search. Only used by flat searches; paths then
    /// contain jump points only and cell weights are ignored.
    pub fn set_jumping_enabled(&mut self, enabled: bool) {
        self.jumping_enabled = enabled;
    }

    #[inline]
    pub fn is_jumping_enabled(&self) -> bool {
        self.jumping_enabled
    }

    /// Replace the built-in step cost with `f`.
    pub fn set_compute_cost_fn(&mut self, f: impl Fn(Point, Point) -> f32 + Send + Sync + 'static) {
        let f: CostFn = Box::new(f);
        self.costs.set_compute_fn(f);
        self.mark_hpa_dirty();
    }

    pub fn clear_compute_cost_fn(&mut self) {
        if self.costs.has_compute_fn() {
            self.costs.clear_compute_fn();
            self.mark_hpa_dirty();
        }
    }

    /// Replace the built-in heuristic with `f`.
    pub fn set_estimate_cost_fn(&mut self, f: impl Fn(Point, Point) -> f32 + Send + Sync + 'static) {
        self.costs.set_estimate_fn(Box::new(f));
    }

    pub fn clear_estimate_cost_fn(&mut self) {
        self.costs.clear_estimate_fn();
    }

    /// Step cost between two adjacent cells, before weight scaling.
    pub fn compute_cost(&self, from: Point, to: Point) -> f32 {
        self.costs.compute_cost(from, to)
    }

    /// Heuristic estimate between two cells.
    pub fn estimate_cost(&self, from: Point, to: Point) -> f32 {
        self.costs.estimate_cost(from, to)
    }

    // -----------------------------------------------------------------------
    // Cells
    // -----------------------------------------------------------------------

    pub fn set_point_solid(&mut self, id: Point, solid: bool) -> Result<(), GridError> {
        self.grid.set_solid(id, solid)?;
        self.mark_hpa_dirty();
        Ok(())
    }

    pub fn is_point_solid(&self, id: Point) -> Result<bool, GridError> {
        self.grid.is_solid(id)
    }

    pub fn set_point_weight_scale(&mut self, id: Point, weight_scale: f32) -> Result<(), GridError> {
        self.grid.set_weight_scale(id, weight_scale)?;
        self.mark_hpa_dirty();
        Ok(())
    }

    pub fn point_weight_scale(&self, id: Point) -> Result<f32, GridError> {
        self.grid.weight_scale(id)
    }

    /// Set the solid flag of every cell of `region` that lies in the grid.
    pub fn fill_solid_region(&mut self, region: Range, solid: bool) -> Result<(), GridError> {
        self.grid.fill_solid(region, solid)?;
        self.mark_hpa_dirty();
        Ok(())
    }

    /// Set the weight scale of every cell of `region` that lies in the grid.
    pub fn fill_weight_scale_region(&mut self, region: Range, weight_scale: f32) -> Result<(), GridError> {
        self.grid.fill_weight_scale(region, weight_scale)?;
        self.mark_hpa_dirty();
        Ok(())
    }

    /// World position of a cell.
    pub fn point_position(&self, id: Point) -> Result<Vec2, GridError> {
        self.grid.position(id)
    }

    // -----------------------------------------------------------------------
    // Hierarchical graph
    // -----------------------------------------------------------------------

    /// Enable or disable HPA. Enabling checks the current size against the
    /// HPA constraints and leaves the graph dirty.
    pub fn set_hpa_enabled(&mut self, enabled: bool) -> Result<(), ConfigError> {
        if self.hpa_enabled == enabled {
            return Ok(());
        }
        if enabled {
            self.hpa.validate(self.grid.size()).map_err(rejected)?;
        }
        self.hpa_enabled = enabled;
        self.hpa_dirty = enabled;
        self.graph = HpaGraph::new();
        Ok(())
    }

    #[inline]
    pub fn is_hpa_enabled(&self) -> bool {
        self.hpa_enabled
    }

    /// Whether [`update_hpa`](Self::update_hpa) is needed before querying.
    #[inline]
    pub fn is_hpa_dirty(&self) -> bool {
        self.hpa_dirty
    }

    pub fn set_hpa_max_level(&mut self, max_level: i32) -> Result<(), ConfigError> {
        self.set_hpa_config(HpaConfig {
            max_level,
            ..self.hpa
        })
    }

    #[inline]
    pub fn hpa_max_level(&self) -> i32 {
        self.hpa.max_level
    }

    pub fn set_hpa_cluster_size(&mut self, cluster_size: i32) -> Result<(), ConfigError> {
        self.set_hpa_config(HpaConfig {
            cluster_size,
            ..self.hpa
        })
    }

    #[inline]
    pub fn hpa_cluster_size(&self) -> i32 {
        self.hpa.cluster_size
    }

    pub fn set_hpa_level_growth(&mut self, level_growth: i32) -> Result<(), ConfigError> {
        self.set_hpa_config(HpaConfig {
            level_growth,
            ..self.hpa
        })
    }

    #[inline]
    pub fn hpa_level_growth(&self) -> i32 {
        self.hpa.level_growth
    }

    /// Replace all HPA parameters at once. HPA must be enabled.
    pub fn set_hpa_config(&mut self, config: HpaConfig) -> Result<(), ConfigError> {
        if config == self.hpa {
            return Ok(());
        }
        if !self.hpa_enabled {
            return Err(rejected(ConfigError::HpaNotEnabled));
        }
        config.validate(self.grid.size()).map_err(rejected)?;
        self.hpa = config;
        self.hpa_dirty = true;
        Ok(())
    }

    #[inline]
    pub fn hpa_config(&self) -> HpaConfig {
        self.hpa
    }

    /// Rebuild the hierarchical graph from the current cells.
    pub fn update_hpa(&mut self) -> Result<(), GraphError> {
        if !self.hpa_enabled {
            error!("{}", GraphError::HpaDisabled);
            return Err(GraphError::HpaDisabled);
        }
        if self.grid.is_dirty() {
            error!("{}", GraphError::GridDirty);
            return Err(GraphError::GridDirty);
        }
        self.hpa_dirty = true;
        self.graph
            .build(&self.grid, &self.costs, self.diagonal_mode, &self.hpa, &mut self.solver)
            .inspect_err(|e| error!("{e}"))?;
        self.hpa_dirty = false;
        Ok(())
    }

    /// Size of the built graph, if HPA is enabled and up to date.
    pub fn hpa_stats(&self) -> Option<HpaStats> {
        (self.hpa_enabled && !self.hpa_dirty).then(|| self.graph.stats())
    }

    fn mark_hpa_dirty(&mut self) {
        if self.hpa_enabled {
            self.hpa_dirty = true;
        }
    }

    // -----------------------------------------------------------------------
    // Queries
    // -----------------------------------------------------------------------

    fn check_query(&self, from: Point, to: Point) -> Result<(), PathError> {
        if self.grid.is_dirty() {
            return Err(PathError::NotInitialized);
        }
        for id in [from, to] {
            if !self.grid.is_in_boundsv(id) {
                return Err(PathError::OutOfBounds {
                    id,
                    region: self.grid.region(),
                });
            }
        }
        if self.hpa_enabled && self.hpa_dirty {
            return Err(PathError::HpaNotInitialized);
        }
        Ok(())
    }

    /// Cells from `from` to `to`, both included.
    pub fn try_id_path(&mut self, from: Point, to: Point) -> Result<Vec<Point>, PathError> {
        self.check_query(from, to)?;
        if from == to {
            return Ok(vec![from]);
        }
        let path = if self.hpa_enabled {
            self.graph.find_path(&mut self.solver, &self.costs, from, to)?
        } else {
            self.solver.solve_grid(
                &self.grid,
                &self.costs,
                self.diagonal_mode,
                self.jumping_enabled,
                from,
                to,
            )
        };
        path.ok_or(PathError::NoPath { from, to })
    }

    /// World positions of the cells from `from` to `to`.
    pub fn try_point_path(&mut self, from: Point, to: Point) -> Result<Vec<Vec2>, PathError> {
        let ids = self.try_id_path(from, to)?;
        Ok(ids
            .into_iter()
            .filter_map(|p| self.grid.cell_at(p).map(|c| c.position))
            .collect())
    }

    /// Like [`try_id_path`](Self::try_id_path), but logs failures and
    /// returns an empty path instead.
    pub fn get_id_path(&mut self, from: Point, to: Point) -> Vec<Point> {
        self.try_id_path(from, to).unwrap_or_else(|e| {
            log_failure(&e);
            Vec::new()
        })
    }

    /// Like [`try_point_path`](Self::try_point_path), but logs failures and
    /// returns an empty path instead.
    pub fn get_point_path(&mut self, from: Point, to: Point) -> Vec<Vec2> {
        self.try_point_path(from, to).unwrap_or_else(|e| {
            log_failure(&e);
            Vec::new()
        })
    }
}

fn log_failure(e: &PathError) {
    match e {
        PathError::NoPath { .. } => debug!("{e}"),
        _ => error!("{e}"),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::f32::consts::SQRT_2;

    fn pathfinder(w: i32, h: i32) -> GridPathfinder {
        let mut pf = GridPathfinder::new();
        pf.set_region(Point::ZERO, Point::new(w, h)).unwrap();
        pf.update();
        pf
    }

    fn manhattan_four_way(w: i32, h: i32) -> GridPathfinder {
        let mut pf = pathfinder(w, h);
        pf.set_diagonal_mode(DiagonalMode::Never);
        pf.set_default_compute_heuristic(Heuristic::Manhattan);
        pf.set_default_estimate_heuristic(Heuristic::Manhattan);
        pf
    }

    fn cost(pf: &GridPathfinder, path: &[Point]) -> f32 {
        path.windows(2)
            .map(|w| pf.compute_cost(w[0], w[1]) * pf.point_weight_scale(w[1]).unwrap())
            .sum()
    }

    /// 20x20, wall on column 9 except y=4, HPA with one level of 10x10 clusters.
    fn walled_hpa() -> GridPathfinder {
        let mut pf = manhattan_four_way(20, 20);
        pf.fill_solid_region(Range::new(9, 0, 10, 20), true).unwrap();
        pf.set_point_solid(Point::new(9, 4), false).unwrap();
        pf
    }

    #[test]
    fn manhattan_path_cost_and_length() {
        let mut pf = manhattan_four_way(10, 10);
        let path = pf.get_id_path(Point::ZERO, Point::new(5, 3));
        assert_eq!(path.len(), 9);
        assert_eq!(cost(&pf, &path), 8.0);
    }

    #[test]
    fn euclidean_open_grid() {
        let mut pf = pathfinder(10, 10);
        let path = pf.get_id_path(Point::ZERO, Point::new(9, 9));
        assert!((cost(&pf, &path) - 9.0 * SQRT_2).abs() < 1e-3);
    }

    #[test]
    fn start_equals_goal_skips_the_solver() {
        let mut pf = pathfinder(10, 10);
        pf.set_point_solid(Point::new(3, 3), true).unwrap();
        let pass = pf.solver.pass;
        assert_eq!(pf.get_id_path(Point::new(3, 3), Point::new(3, 3)), vec![Point::new(3, 3)]);
        assert_eq!(pf.solver.pass, pass);
    }

    #[test]
    fn full_wall_means_no_path() {
        let mut pf = manhattan_four_way(10, 10);
        pf.fill_solid_region(Range::new(5, 0, 6, 10), true).unwrap();
        assert!(pf.get_id_path(Point::ZERO, Point::new(9, 9)).is_empty());
        assert_eq!(
            pf.try_id_path(Point::ZERO, Point::new(9, 9)),
            Err(PathError::NoPath {
                from: Point::ZERO,
                to: Point::new(9, 9)
            })
        );
    }

    #[test]
    fn solid_goal_fails() {
        let mut pf = pathfinder(10, 10);
        pf.set_point_solid(Point::new(5, 5), true).unwrap();
        assert!(pf.get_id_path(Point::ZERO, Point::new(5, 5)).is_empty());
    }

    #[test]
    fn repeated_queries_are_identical() {
        let mut pf = pathfinder(16, 16);
        pf.fill_solid_region(Range::new(4, 2, 5, 14), true).unwrap();
        pf.fill_solid_region(Range::new(8, 0, 9, 12), true).unwrap();
        let a = pf.get_id_path(Point::new(0, 8), Point::new(15, 3));
        let b = pf.get_id_path(Point::new(0, 8), Point::new(15, 3));
        assert!(!a.is_empty());
        assert_eq!(a, b);
    }

    #[test]
    fn weight_scale_raises_cost_along_the_only_corridor() {
        let mut pf = manhattan_four_way(10, 3);
        pf.fill_solid_region(Range::new(0, 0, 10, 1), true).unwrap();
        pf.fill_solid_region(Range::new(0, 2, 10, 3), true).unwrap();
        let from = Point::new(0, 1);
        let to = Point::new(9, 1);
        let plain = pf.get_id_path(from, to);
        assert_eq!(cost(&pf, &plain), 9.0);

        pf.fill_weight_scale_region(Range::new(3, 1, 6, 2), 4.0).unwrap();
        let weighted = pf.get_id_path(from, to);
        assert_eq!(weighted, plain);
        assert_eq!(cost(&pf, &weighted), 18.0);
    }

    #[test]
    fn point_path_uses_world_positions() {
        let mut pf = GridPathfinder::new();
        pf.set_region(Point::new(-2, -2), Point::new(4, 4)).unwrap();
        pf.set_offset(Vec2::new(100.0, 0.0));
        pf.set_cell_size(Vec2::splat(16.0));
        pf.set_diagonal_mode(DiagonalMode::Never);
        pf.update();
        let path = pf.get_point_path(Point::new(-2, -2), Point::new(-2, 0));
        assert_eq!(
            path,
            vec![
                Vec2::new(68.0, -32.0),
                Vec2::new(68.0, -16.0),
                Vec2::new(68.0, 0.0),
            ]
        );
        assert_eq!(pf.point_position(Point::new(1, 1)).unwrap(), Vec2::new(116.0, 16.0));
    }

    #[test]
    fn preconditions() {
        let mut pf = GridPathfinder::new();
        pf.set_region(Point::ZERO, Point::new(4, 4)).unwrap();
        assert_eq!(
            pf.try_id_path(Point::ZERO, Point::new(1, 1)),
            Err(PathError::NotInitialized)
        );
        pf.update();
        assert_eq!(
            pf.try_id_path(Point::ZERO, Point::new(4, 1)),
            Err(PathError::OutOfBounds {
                id: Point::new(4, 1),
                region: Range::new(0, 0, 4, 4)
            })
        );
        assert!(pf.get_point_path(Point::new(-1, 0), Point::ZERO).is_empty());
    }

    #[test]
    fn region_changes_mark_dirty() {
        let mut pf = pathfinder(4, 4);
        pf.set_size(Point::new(4, 4)).unwrap();
        assert!(!pf.is_dirty());
        pf.set_size(Point::new(6, 4)).unwrap();
        assert!(pf.is_dirty());
        assert_eq!(pf.size(), Point::new(6, 4));
        assert!(pf.set_size(Point::new(6, -4)).is_err());
        assert_eq!(pf.size(), Point::new(6, 4));
    }

    #[test]
    fn cost_overrides() {
        let mut pf = manhattan_four_way(10, 10);
        // Moving right costs 3.
        pf.set_compute_cost_fn(|a, b| if b.x > a.x { 3.0 } else { 1.0 });
        assert_eq!(pf.compute_cost(Point::ZERO, Point::new(1, 0)), 3.0);
        let path = pf.get_id_path(Point::ZERO, Point::new(2, 2));
        assert_eq!(cost(&pf, &path), 8.0);

        pf.clear_compute_cost_fn();
        assert_eq!(pf.compute_cost(Point::ZERO, Point::new(1, 0)), 1.0);

        pf.set_estimate_cost_fn(|_, _| 0.0);
        assert_eq!(pf.estimate_cost(Point::ZERO, Point::new(9, 9)), 0.0);
        let path = pf.get_id_path(Point::ZERO, Point::new(2, 2));
        assert_eq!(cost(&pf, &path), 4.0);
        pf.clear_estimate_cost_fn();
        assert_eq!(pf.estimate_cost(Point::ZERO, Point::new(9, 9)), 18.0);
    }

    #[test]
    fn jumping_returns_waypoints() {
        let mut pf = manhattan_four_way(10, 10);
        pf.set_jumping_enabled(true);
        assert_eq!(
            pf.get_id_path(Point::ZERO, Point::new(9, 0)),
            vec![Point::ZERO, Point::new(9, 0)]
        );
    }

    #[test]
    fn hpa_lifecycle() {
        let mut pf = walled_hpa();
        assert_eq!(pf.set_hpa_max_level(2), Err(ConfigError::HpaNotEnabled));
        assert_eq!(pf.update_hpa(), Err(GraphError::HpaDisabled));

        pf.set_hpa_enabled(true).unwrap();
        assert!(pf.is_hpa_dirty());
        assert_eq!(
            pf.try_id_path(Point::ZERO, Point::new(1, 1)),
            Err(PathError::HpaNotInitialized)
        );
        pf.update_hpa().unwrap();
        assert!(!pf.is_hpa_dirty());
        assert!(pf.hpa_stats().is_some());

        pf.set_point_solid(Point::new(0, 0), true).unwrap();
        assert!(pf.is_hpa_dirty());
        assert!(pf.hpa_stats().is_none());
        pf.update_hpa().unwrap();

        pf.set_hpa_enabled(false).unwrap();
        assert!(!pf.is_hpa_dirty());
        assert!(!pf.get_id_path(Point::new(1, 1), Point::new(18, 18)).is_empty());
    }

    #[test]
    fn cost_policy_changes_dirty_the_hpa_graph() {
        let mut pf = walled_hpa();
        pf.set_hpa_enabled(true).unwrap();
        pf.update_hpa().unwrap();

        pf.set_diagonal_mode(DiagonalMode::Always);
        assert!(pf.is_hpa_dirty());
        pf.update_hpa().unwrap();

        pf.set_default_compute_heuristic(Heuristic::Euclidean);
        assert!(pf.is_hpa_dirty());
        pf.update_hpa().unwrap();

        pf.set_compute_cost_fn(|_, _| 2.0);
        assert!(pf.is_hpa_dirty());
        pf.update_hpa().unwrap();

        pf.clear_compute_cost_fn();
        assert!(pf.is_hpa_dirty());
        pf.update_hpa().unwrap();

        // Cached edge weights never depend on the estimate.
        pf.set_default_estimate_heuristic(Heuristic::Octile);
        assert!(!pf.is_hpa_dirty());
        pf.set_estimate_cost_fn(|_, _| 0.0);
        assert!(!pf.is_hpa_dirty());
        pf.clear_estimate_cost_fn();
        pf.set_jumping_enabled(true);
        assert!(!pf.is_hpa_dirty());
        assert!(pf.hpa_stats().is_some());
    }

    #[test]
    fn hpa_matches_flat_cost_on_weighted_corridor() {
        // Only row 5 is open; it crosses from the left clusters to the right.
        let mut pf = manhattan_four_way(20, 20);
        pf.fill_solid_region(Range::new(0, 0, 20, 20), true).unwrap();
        pf.fill_solid_region(Range::new(0, 5, 20, 6), false).unwrap();
        pf.fill_weight_scale_region(Range::new(6, 5, 14, 6), 3.0).unwrap();
        let from = Point::new(1, 5);
        let to = Point::new(18, 5);

        let flat = pf.get_id_path(from, to);
        assert_eq!(cost(&pf, &flat), 33.0);

        pf.set_hpa_enabled(true).unwrap();
        pf.update_hpa().unwrap();
        let hpa = pf.get_id_path(from, to);
        assert_eq!(hpa, flat);
        assert_eq!(cost(&pf, &hpa), 33.0);

        pf.fill_weight_scale_region(Range::new(6, 5, 14, 6), 1.0).unwrap();
        pf.update_hpa().unwrap();
        let plain = pf.get_id_path(from, to);
        assert_eq!(cost(&pf, &plain), 17.0);
    }

    #[test]
    fn hpa_rejects_incompatible_sizes() {
        let mut pf = pathfinder(25, 20);
        assert!(matches!(
            pf.set_hpa_enabled(true),
            Err(ConfigError::OddGridSize(_))
        ));
        assert!(!pf.is_hpa_enabled());

        let mut pf = pathfinder(40, 20);
        pf.set_hpa_enabled(true).unwrap();
        assert!(pf.set_size(Point::new(44, 20)).is_err());
        assert_eq!(pf.size(), Point::new(40, 20));
        pf.set_hpa_cluster_size(20).unwrap();
        assert_eq!(pf.hpa_cluster_size(), 20);
        assert_eq!(
            pf.set_hpa_cluster_size(30),
            Err(ConfigError::ClusterTooLarge {
                cluster_size: 30,
                size: Point::new(40, 20)
            })
        );
        assert_eq!(pf.set_hpa_max_level(0), Err(ConfigError::MaxLevelOutOfRange(0)));
        assert_eq!(pf.set_hpa_level_growth(1), Err(ConfigError::LevelGrowthTooSmall(1)));
        assert_eq!(pf.hpa_config().level_growth, 3);
    }

    #[test]
    fn hpa_matches_flat_cost_across_clusters() {
        let mut pf = walled_hpa();
        let from = Point::new(2, 2);
        let to = Point::new(17, 15);
        let flat = pf.get_id_path(from, to);
        pf.set_hpa_enabled(true).unwrap();
        pf.update_hpa().unwrap();
        let hpa = pf.get_id_path(from, to);
        assert_eq!(cost(&pf, &flat), 28.0);
        assert_eq!(cost(&pf, &hpa), 28.0);
    }

    #[test]
    fn hpa_matches_flat_cost_inside_one_cluster() {
        let mut pf = walled_hpa();
        let from = Point::new(1, 1);
        let to = Point::new(7, 8);
        let flat = pf.get_id_path(from, to);
        pf.set_hpa_enabled(true).unwrap();
        pf.update_hpa().unwrap();
        let hpa = pf.get_id_path(from, to);
        assert_eq!(cost(&pf, &flat), 13.0);
        assert_eq!(cost(&pf, &hpa), 13.0);
    }

    #[test]
    fn hpa_multi_level_open_grid() {
        let mut pf = manhattan_four_way(60, 60);
        pf.set_hpa_enabled(true).unwrap();
        pf.set_hpa_max_level(2).unwrap();
        pf.update_hpa().unwrap();
        assert_eq!(pf.hpa_stats().map(|s| s.levels), Some(2));
        let path = pf.get_id_path(Point::new(1, 1), Point::new(58, 57));
        assert_eq!(cost(&pf, &path), 113.0);
    }

    #[test]
    fn hpa_teardown_is_idempotent() {
        let mut pf = walled_hpa();
        pf.set_hpa_enabled(true).unwrap();
        pf.update_hpa().unwrap();
        let stats = pf.hpa_stats();
        for (from, to) in [
            (Point::new(2, 2), Point::new(17, 15)),
            (Point::new(1, 1), Point::new(7, 8)),
            (Point::new(15, 15), Point::new(0, 19)),
        ] {
            assert!(!pf.get_id_path(from, to).is_empty());
            assert_eq!(pf.hpa_stats(), stats);
        }
    }

    #[test]
    fn hpa_solid_start_fails() {
        let mut pf = walled_hpa();
        pf.set_hpa_enabled(true).unwrap();
        pf.update_hpa().unwrap();
        assert_eq!(
            pf.try_id_path(Point::new(9, 9), Point::new(1, 1)),
            Err(PathError::NoPath {
                from: Point::new(9, 9),
                to: Point::new(1, 1)
            })
        );
    }

    #[test]
    fn config_round_trip_through_pathfinder() {
        let config = PathfinderConfig {
            origin: Point::new(-10, -10),
            size: Point::new(20, 20),
            diagonal_mode: DiagonalMode::AtLeastOneWalkable,
            estimate_heuristic: Heuristic::Octile,
            jumping_enabled: true,
            hpa: Some(HpaConfig::default()),
            ..PathfinderConfig::default()
        };
        let pf = GridPathfinder::from_config(&config).unwrap();
        assert!(!pf.is_dirty());
        assert!(pf.is_hpa_dirty());
        assert_eq!(pf.config(), config);
    }

    #[test]
    fn from_config_rejects_bad_hpa() {
        let config = PathfinderConfig {
            size: Point::new(15, 15),
            hpa: Some(HpaConfig::default()),
            ..PathfinderConfig::default()
        };
        assert!(GridPathfinder::from_config(&config).is_err());
    }

    #[test]
    fn clear_empties_the_grid() {
        let mut pf = pathfinder(10, 10);
        pf.clear();
        assert!(pf.region().is_empty());
        assert!(!pf.is_in_bounds(0, 0));
        assert!(pf.get_id_path(Point::ZERO, Point::new(1, 1)).is_empty());
    }
}
