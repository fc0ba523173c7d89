use log::trace;
use tilepath_core::Point;

use crate::error::GraphError;
use crate::hpa::HpaGraph;
use crate::hpa::arena::{ClusterId, EdgeKind, NodeId};
use crate::solver::Solver;
use crate::traits::CostModel;

impl HpaGraph {
    /// Route from `from` to `to` through the hierarchy.
    ///
    /// Returns the concrete cells of the path including both endpoints, or
    /// `None` when either endpoint is solid or no route exists. The graph is
    /// restored to its built state before returning.
    pub(crate) fn find_path<C: CostModel>(
        &mut self,
        solver: &mut Solver,
        costs: &C,
        from: Point,
        to: Point,
    ) -> Result<Option<Vec<Point>>, GraphError> {
        let result = self.route(solver, costs, from, to);
        self.remove_added_nodes();
        result
    }

    fn route<C: CostModel>(
        &mut self,
        solver: &mut Solver,
        costs: &C,
        from: Point,
        to: Point,
    ) -> Result<Option<Vec<Point>>, GraphError> {
        let Some((start, goal)) = self.insert_nodes(solver, costs, from, to)? else {
            return Ok(None);
        };
        let Some(edges) = solver.solve_graph(&mut self.arena, costs, start, goal, self.region) else {
            return Ok(None);
        };
        let mut path = Vec::with_capacity(edges.len() + 1);
        path.push(from);
        for e in edges {
            self.expand(e, &mut path);
        }
        Ok(Some(path))
    }

    /// Wire `from` and `to` into every level and return the nodes to search
    /// between on the topmost layer reached.
    ///
    /// Leftovers of a previous query are released first. `None` if either
    /// endpoint has no concrete node.
    pub(crate) fn insert_nodes<C: CostModel>(
        &mut self,
        solver: &mut Solver,
        costs: &C,
        from: Point,
        to: Point,
    ) -> Result<Option<(NodeId, NodeId)>, GraphError> {
        self.remove_added_nodes();

        let (Some(&concrete_start), Some(&concrete_goal)) = (self.concrete.get(&from), self.concrete.get(&to))
        else {
            return Ok(None);
        };
        let (mut start, mut goal) = (concrete_start, concrete_goal);

        for level in 0..self.levels.len() {
            let (Some(sc), Some(gc)) = (self.cluster_at(level, from), self.cluster_at(level, to)) else {
                return Ok(None);
            };

            if sc == gc {
                let bounds = self.arena.cluster(sc).bounds;
                if let Some(path) = solver.solve_graph(&mut self.arena, costs, start, goal, bounds) {
                    let weight = self.path_weight(&path);
                    let ts = self.arena.add_node(from, Some(start));
                    let tg = self.arena.add_node(to, Some(goal));
                    self.arena.add_edge(ts, tg, EdgeKind::Intra, weight, path);
                    self.txn.temp.extend([ts, tg]);
                    trace!("hpa query {from} -> {to}: direct path inside level {level} cluster");
                    return Ok(Some((ts, tg)));
                }
            }

            start = self.connect_to_border(solver, costs, sc, start)?;
            goal = self.connect_to_border(solver, costs, gc, goal)?;
        }

        trace!(
            "hpa query {from} -> {to}: {} added nodes, {} touched border nodes",
            self.txn.added.len(),
            self.txn.touched.len()
        );
        Ok(Some((start, goal)))
    }

    /// The border node of `cluster` standing for `child`, added and linked
    /// to the other border nodes if the position is not a border already.
    fn connect_to_border<C: CostModel>(
        &mut self,
        solver: &mut Solver,
        costs: &C,
        cluster: ClusterId,
        child: NodeId,
    ) -> Result<NodeId, GraphError> {
        let pos = self.arena.node(child).pos;
        if let Some(&existing) = self.arena.cluster(cluster).nodes.get(&pos) {
            return Ok(existing);
        }

        let node = self.arena.add_node(pos, Some(child));
        self.txn.added.push(node);

        let bounds = self.arena.cluster(cluster).bounds;
        let border: Vec<NodeId> = self.arena.cluster(cluster).nodes.values().copied().collect();
        for b in border {
            if self.connect_pair(costs, solver, node, b, bounds)? {
                self.txn.touched.push(b);
            }
        }

        self.arena.clusters[cluster.index()].nodes.insert(pos, node);
        self.txn.registered.push((cluster, pos));
        Ok(node)
    }

    /// Undo everything the last `insert_nodes` added.
    pub(crate) fn remove_added_nodes(&mut self) {
        for (cluster, pos) in self.txn.registered.drain(..).rev() {
            self.arena.clusters[cluster.index()].nodes.shift_remove(&pos);
        }

        let (built_nodes, built_edges) = (self.built_nodes, self.built_edges);
        for n in self.txn.touched.drain(..) {
            if n.index() < built_nodes {
                self.arena.nodes[n.index()]
                    .edges
                    .retain(|e| e.index() < built_edges);
            }
        }

        self.arena.nodes.truncate(built_nodes);
        self.arena.edges.truncate(built_edges);
        self.txn.added.clear();
        self.txn.temp.clear();
    }
}
