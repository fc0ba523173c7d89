use log::debug;
use tilepath_core::{Point, Range};

use crate::config::HpaConfig;
use crate::error::GraphError;
use crate::grid::Grid;
use crate::hpa::arena::{ClusterId, EdgeId, EdgeKind, NodeId};
use crate::hpa::{HpaGraph, Level, Transaction};
use crate::neighbors::DiagonalMode;
use crate::solver::Solver;
use crate::traits::CostModel;

/// Border runs up to this length get a single entrance.
const SHORT_RUN: usize = 5;

/// How two clusters of the same level touch.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Adjacency {
    /// The second cluster is right of the first.
    LeftRight,
    /// The second cluster is below the first.
    TopBottom,
}

impl HpaGraph {
    /// Rebuild the whole graph from `grid`.
    ///
    /// On error the graph is left half-built and must not be queried.
    pub(crate) fn build<C: CostModel>(
        &mut self,
        grid: &Grid,
        costs: &C,
        mode: DiagonalMode,
        config: &HpaConfig,
        solver: &mut Solver,
    ) -> Result<(), GraphError> {
        self.arena.clear();
        self.concrete.clear();
        self.levels.clear();
        self.txn = Transaction::default();
        self.region = grid.region();
        self.built_nodes = 0;
        self.built_edges = 0;

        self.create_concrete_layer(grid, costs, mode);

        let mut size = config.cluster_size;
        for level in 0..config.max_level.max(0) as usize {
            if level > 0 {
                size = size.saturating_mul(config.level_growth);
            }
            let cols = ceil_div(self.region.width(), size);
            let rows = ceil_div(self.region.height(), size);
            // A single cluster has no borders to route through.
            if cols <= 1 && rows <= 1 {
                break;
            }
            self.build_level(grid, costs, solver, level, size, cols, rows)?;
        }

        self.built_nodes = self.arena.nodes.len();
        self.built_edges = self.arena.edges.len();
        let stats = self.stats();
        debug!(
            "hpa graph built: {} levels, {} clusters, {} nodes, {} edges",
            stats.levels, stats.clusters, stats.nodes, stats.edges
        );
        Ok(())
    }

    /// One node per walkable cell, twin edges between legal neighbours.
    fn create_concrete_layer<C: CostModel>(&mut self, grid: &Grid, costs: &C, mode: DiagonalMode) {
        for p in self.region {
            if grid.is_walkable(p) {
                let id = self.arena.add_node(p, None);
                self.concrete.insert(p, id);
            }
        }

        const STRAIGHT: [Point; 2] = [Point::new(1, 0), Point::new(0, 1)];
        const DIAGONAL: [Point; 2] = [Point::new(1, 1), Point::new(-1, 1)];

        for p in self.region {
            let Some(&a) = self.concrete.get(&p) else {
                continue;
            };
            let diagonals: &[Point] = if mode == DiagonalMode::Never { &[] } else { &DIAGONAL };
            for &d in STRAIGHT.iter().chain(diagonals) {
                let q = p + d;
                let Some(&b) = self.concrete.get(&q) else {
                    continue;
                };
                if d.x != 0 && d.y != 0 && !(grid.is_walkable(p.shift(d.x, 0)) && grid.is_walkable(p.shift(0, d.y))) {
                    continue;
                }
                let forward = costs.compute_cost(p, q) * grid.weight_at(q);
                let backward = costs.compute_cost(q, p) * grid.weight_at(p);
                self.arena
                    .add_edge_pair(a, b, EdgeKind::Step, (forward, Vec::new()), (backward, Vec::new()));
            }
        }
    }

    #[allow(clippy::too_many_arguments)]
    fn build_level<C: CostModel>(
        &mut self,
        grid: &Grid,
        costs: &C,
        solver: &mut Solver,
        level: usize,
        size: i32,
        cols: i32,
        rows: i32,
    ) -> Result<(), GraphError> {
        let mut clusters = Vec::with_capacity((cols * rows) as usize);
        for i in 0..rows {
            for j in 0..cols {
                let min = self.region.min + Point::new(j * size, i * size);
                let bounds = Range::with_size(min, Point::new(size, size)).intersect(self.region);
                let children = match level.checked_sub(1) {
                    Some(below) => self.levels[below]
                        .clusters
                        .iter()
                        .copied()
                        .filter(|&c| self.arena.cluster(c).bounds.in_range(bounds))
                        .collect(),
                    None => Vec::new(),
                };
                clusters.push(self.arena.add_cluster(bounds, children));
            }
        }

        for i in 0..rows {
            for j in 0..cols {
                let a = clusters[(i * cols + j) as usize];
                if j + 1 < cols {
                    let b = clusters[(i * cols + j + 1) as usize];
                    self.connect_clusters(grid, costs, level, a, b, Adjacency::LeftRight)?;
                }
                if i + 1 < rows {
                    let b = clusters[((i + 1) * cols + j) as usize];
                    self.connect_clusters(grid, costs, level, a, b, Adjacency::TopBottom)?;
                }
            }
        }

        for &c in &clusters {
            let bounds = self.arena.cluster(c).bounds;
            let border: Vec<NodeId> = self.arena.cluster(c).nodes.values().copied().collect();
            for (k, &a) in border.iter().enumerate() {
                for &b in &border[k + 1..] {
                    self.connect_pair(costs, solver, a, b, bounds)?;
                }
            }
        }

        debug!("hpa level {level}: {cols}x{rows} clusters of size {size}");
        self.levels.push(Level {
            cluster_size: size,
            cols,
            clusters,
        });
        Ok(())
    }

    fn connect_clusters<C: CostModel>(
        &mut self,
        grid: &Grid,
        costs: &C,
        level: usize,
        a: ClusterId,
        b: ClusterId,
        adjacency: Adjacency,
    ) -> Result<(), GraphError> {
        if level == 0 {
            self.scan_border(grid, costs, a, b, adjacency)
        } else {
            self.promote_entrances(a, b)
        }
    }

    /// Place entrances along the shared border of two level-0 clusters.
    ///
    /// Each maximal run of cell pairs that are walkable on both sides gets one
    /// entrance in its middle, or one at each end if the run is long.
    fn scan_border<C: CostModel>(
        &mut self,
        grid: &Grid,
        costs: &C,
        a: ClusterId,
        b: ClusterId,
        adjacency: Adjacency,
    ) -> Result<(), GraphError> {
        let ba = self.arena.cluster(a).bounds;
        let bb = self.arena.cluster(b).bounds;
        let pairs: Vec<(Point, Point)> = match adjacency {
            Adjacency::LeftRight => (ba.min.y..ba.max.y)
                .map(|y| (Point::new(ba.max.x - 1, y), Point::new(bb.min.x, y)))
                .collect(),
            Adjacency::TopBottom => (ba.min.x..ba.max.x)
                .map(|x| (Point::new(x, ba.max.y - 1), Point::new(x, bb.min.y)))
                .collect(),
        };

        let mut run = 0;
        for k in 0..=pairs.len() {
            let open = pairs
                .get(k)
                .is_some_and(|&(p, q)| grid.is_walkable(p) && grid.is_walkable(q));
            if open {
                run += 1;
                continue;
            }
            if run == 0 {
                continue;
            }
            if run <= SHORT_RUN {
                self.add_entrance(grid, costs, a, b, pairs[k - (run / 2 + 1)])?;
            } else {
                self.add_entrance(grid, costs, a, b, pairs[k - run])?;
                self.add_entrance(grid, costs, a, b, pairs[k - 1])?;
            }
            run = 0;
        }
        Ok(())
    }

    fn add_entrance<C: CostModel>(
        &mut self,
        grid: &Grid,
        costs: &C,
        a: ClusterId,
        b: ClusterId,
        (p, q): (Point, Point),
    ) -> Result<(), GraphError> {
        let cp = self.concrete.get(&p).copied().ok_or(GraphError::MissingNode(p))?;
        let cq = self.concrete.get(&q).copied().ok_or(GraphError::MissingNode(q))?;
        let na = self.border_node(a, p, cp);
        let nb = self.border_node(b, q, cq);
        let forward = costs.compute_cost(p, q) * grid.weight_at(q);
        let backward = costs.compute_cost(q, p) * grid.weight_at(p);
        self.arena
            .add_edge_pair(na, nb, EdgeKind::Inter, (forward, Vec::new()), (backward, Vec::new()));
        Ok(())
    }

    /// Lift the inter edges between the children of `a` and `b` one level up.
    fn promote_entrances(&mut self, a: ClusterId, b: ClusterId) -> Result<(), GraphError> {
        let target_bounds = self.arena.cluster(b).bounds;
        let mut crossings = Vec::new();
        for &child in &self.arena.cluster(a).children {
            for &n in self.arena.cluster(child).nodes.values() {
                for &e in &self.arena.node(n).edges {
                    let edge = self.arena.edge(e);
                    if edge.kind == EdgeKind::Inter && target_bounds.contains(self.arena.node(edge.to).pos) {
                        crossings.push(e);
                    }
                }
            }
        }

        for e in crossings {
            let edge = self.arena.edge(e);
            let (from, to, weight) = (edge.from, edge.to, edge.weight);
            let (p, q) = (self.arena.node(from).pos, self.arena.node(to).pos);
            let twin = edge.twin.ok_or(GraphError::MissingTwin { from: p, to: q })?;
            let twin_weight = self.arena.edge(twin).weight;
            let na = self.border_node(a, p, from);
            let nb = self.border_node(b, q, to);
            self.arena
                .add_edge_pair(na, nb, EdgeKind::Inter, (weight, vec![e]), (twin_weight, vec![twin]));
        }
        Ok(())
    }

    /// The border node of `cluster` at `pos`, created on first use.
    fn border_node(&mut self, cluster: ClusterId, pos: Point, child: NodeId) -> NodeId {
        if let Some(&n) = self.arena.cluster(cluster).nodes.get(&pos) {
            return n;
        }
        let n = self.arena.add_node(pos, Some(child));
        self.arena.clusters[cluster.index()].nodes.insert(pos, n);
        n
    }

    /// Cache the shortest path between the children of `a` and `b` inside
    /// `scope` as an intra edge pair. Returns whether a path exists.
    pub(super) fn connect_pair<C: CostModel>(
        &mut self,
        costs: &C,
        solver: &mut Solver,
        a: NodeId,
        b: NodeId,
        scope: Range,
    ) -> Result<bool, GraphError> {
        let (Some(ca), Some(cb)) = (self.arena.node(a).child, self.arena.node(b).child) else {
            return Ok(false);
        };
        let Some(path) = solver.solve_graph(&mut self.arena, costs, ca, cb, scope) else {
            return Ok(false);
        };

        let mut back = Vec::with_capacity(path.len());
        for &e in path.iter().rev() {
            let edge = self.arena.edge(e);
            let twin = edge.twin.ok_or(GraphError::MissingTwin {
                from: self.arena.node(edge.from).pos,
                to: self.arena.node(edge.to).pos,
            })?;
            back.push(twin);
        }
        let weight = self.path_weight(&path);
        let back_weight = self.path_weight(&back);
        self.arena
            .add_edge_pair(a, b, EdgeKind::Intra, (weight, path), (back_weight, back));
        Ok(true)
    }

    pub(super) fn path_weight(&self, path: &[EdgeId]) -> f32 {
        path.iter().map(|&e| self.arena.edge(e).weight).sum()
    }
}

fn ceil_div(n: i32, d: i32) -> i32 {
    if d <= 0 {
        return 0;
    }
    (n + d - 1) / d
}
