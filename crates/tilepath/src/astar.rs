use std::collections::BinaryHeap;

use tilepath_core::Point;

use crate::grid::Grid;
use crate::jps;
use crate::neighbors::{DiagonalMode, collect_neighbors};
use crate::solver::{NO_PARENT, OpenEntry, SearchState, Solver};
use crate::traits::CostModel;

impl Solver {
    /// Shortest path from `from` to `to` over the grid cells.
    ///
    /// Step cost is `compute_cost * weight_scale` of the entered cell. With
    /// `jumping` the successors are jump points, weights are ignored and the
    /// returned path only contains the jump points.
    ///
    /// Returns `None` when the goal is solid or unreachable.
    pub(crate) fn solve_grid<C: CostModel>(
        &mut self,
        grid: &Grid,
        costs: &C,
        mode: DiagonalMode,
        jumping: bool,
        from: Point,
        to: Point,
    ) -> Option<Vec<Point>> {
        let start_idx = grid.idx(from)?;
        let goal_idx = grid.idx(to)?;
        if self.nodes.len() < grid.len() {
            self.resize(grid.len());
        }

        let pass = self.begin_pass();

        if !grid.is_walkable(to) {
            return None;
        }

        let start = SearchState::start(costs.estimate_cost(from, to), pass);
        self.nodes[start_idx] = start;

        let mut open: BinaryHeap<OpenEntry> = BinaryHeap::new();
        open.push(OpenEntry {
            idx: start_idx,
            f: start.f,
            g: 0.0,
        });

        let mut nbuf = std::mem::take(&mut self.nbuf);

        let found = 'search: loop {
            let Some(current) = open.pop() else {
                break 'search false;
            };
            let ci = current.idx;

            // Skip closed nodes and entries superseded by a cheaper one.
            let node = self.nodes[ci];
            if node.closed_pass == pass || current.g > node.g {
                continue;
            }
            if ci == goal_idx {
                break 'search true;
            }
            self.nodes[ci].closed_pass = pass;

            let cp = grid.point(ci);
            nbuf.clear();
            collect_neighbors(grid, cp, mode, &mut nbuf);

            for &np in nbuf.iter() {
                let (target, weight_scale) = if jumping {
                    match jps::jump(grid, mode, cp, np, to) {
                        Some(jp) => (jp, 1.0),
                        None => continue,
                    }
                } else {
                    (np, grid.weight_at(np))
                };
                let Some(ni) = grid.idx(target) else {
                    continue;
                };
                if self.nodes[ni].closed_pass == pass {
                    continue;
                }

                let tentative_g = node.g + costs.compute_cost(cp, target) * weight_scale;

                let n = &mut self.nodes[ni];
                if n.open_pass != pass {
                    n.open_pass = pass;
                } else if tentative_g >= n.g {
                    continue;
                }

                n.parent = ci;
                n.g = tentative_g;
                n.f = tentative_g + costs.estimate_cost(target, to);
                open.push(OpenEntry {
                    idx: ni,
                    f: n.f,
                    g: n.g,
                });
            }
        };

        self.nbuf = nbuf;

        if !found {
            return None;
        }

        let mut path = Vec::new();
        let mut ci = goal_idx;
        while ci != NO_PARENT {
            path.push(grid.point(ci));
            ci = self.nodes[ci].parent;
        }
        path.reverse();
        Some(path)
    }
}
