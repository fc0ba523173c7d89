use std::collections::BinaryHeap;

use tilepath_core::Range;

use crate::hpa::arena::{Arena, EdgeId, NodeId};
use crate::solver::{NO_PARENT, OpenEntry, SearchState, Solver};
use crate::traits::CostModel;

impl Solver {
    /// Shortest edge chain from `from` to `to` in the graph.
    ///
    /// Only edges whose target lies inside `scope` are followed. Step cost is
    /// the edge weight; the heuristic is the cost model's estimate between
    /// node positions. Returns the edges in start-to-goal order.
    pub(crate) fn solve_graph<C: CostModel>(
        &mut self,
        arena: &mut Arena,
        costs: &C,
        from: NodeId,
        to: NodeId,
        scope: Range,
    ) -> Option<Vec<EdgeId>> {
        let pass = self.begin_pass();
        let goal_pos = arena.node(to).pos;

        let start = SearchState::start(costs.estimate_cost(arena.node(from).pos, goal_pos), pass);
        arena.nodes[from.index()].search = start;

        let mut open: BinaryHeap<OpenEntry> = BinaryHeap::new();
        open.push(OpenEntry {
            idx: from.index(),
            f: start.f,
            g: 0.0,
        });

        let found = 'search: loop {
            let Some(current) = open.pop() else {
                break 'search false;
            };
            let ci = current.idx;

            let state = arena.nodes[ci].search;
            if state.closed_pass == pass || current.g > state.g {
                continue;
            }
            if ci == to.index() {
                break 'search true;
            }
            arena.nodes[ci].search.closed_pass = pass;

            for k in 0..arena.nodes[ci].edges.len() {
                let eid = arena.nodes[ci].edges[k];
                let (target, weight) = {
                    let e = arena.edge(eid);
                    (e.to, e.weight)
                };
                let n = &mut arena.nodes[target.index()];
                if !scope.contains(n.pos) || n.search.closed_pass == pass {
                    continue;
                }

                let tentative_g = state.g + weight;
                if n.search.open_pass != pass {
                    n.search.open_pass = pass;
                } else if tentative_g >= n.search.g {
                    continue;
                }

                n.search.parent = eid.index();
                n.search.g = tentative_g;
                n.search.f = tentative_g + costs.estimate_cost(n.pos, goal_pos);
                open.push(OpenEntry {
                    idx: target.index(),
                    f: n.search.f,
                    g: tentative_g,
                });
            }
        };

        if !found {
            return None;
        }

        let mut path = Vec::new();
        let mut ci = to.index();
        while ci != from.index() {
            let parent = arena.nodes[ci].search.parent;
            if parent == NO_PARENT {
                break;
            }
            let eid = EdgeId(parent as u32);
            path.push(eid);
            ci = arena.edge(eid).from.index();
        }
        path.reverse();
        Some(path)
    }
}
