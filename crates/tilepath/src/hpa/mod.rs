//! Hierarchical pathfinding (HPA*).
//!
//! The graph has one concrete layer (a node per walkable cell, an edge per
//! legal step) and up to five abstract layers. Each abstract layer tiles the
//! grid with clusters; a cluster keeps the nodes on its border and caches the
//! shortest in-cluster path between every pair of them as a single intra
//! edge. Inter edges link border nodes of neighbouring clusters.
//!
//! A query temporarily wires its start and goal into every layer, searches
//! the topmost layer and expands the resulting edges back into grid cells.
//! Everything the query added is rolled back afterwards, so between queries
//! the arena only holds what [`HpaGraph::build`] created.

mod arena;
mod build;
mod insert;
mod search;

use std::collections::HashMap;

use tilepath_core::{Point, Range};

use arena::{Arena, ClusterId, EdgeId, NodeId};

/// Size summary of a built hierarchical graph.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct HpaStats {
    /// Abstract levels actually built.
    pub levels: usize,
    pub clusters: usize,
    pub nodes: usize,
    pub edges: usize,
}

/// Cluster tiling of one abstract level.
#[derive(Debug)]
struct Level {
    cluster_size: i32,
    cols: i32,
    clusters: Vec<ClusterId>,
}

/// Arena additions made by the query in flight.
#[derive(Debug, Default)]
struct Transaction {
    /// Build-time nodes that received query edges.
    touched: Vec<NodeId>,
    /// Border positions registered in cluster maps.
    registered: Vec<(ClusterId, Point)>,
    added: Vec<NodeId>,
    temp: Vec<NodeId>,
}

#[derive(Debug, Default)]
pub(crate) struct HpaGraph {
    region: Range,
    arena: Arena,
    concrete: HashMap<Point, NodeId>,
    levels: Vec<Level>,
    built_nodes: usize,
    built_edges: usize,
    txn: Transaction,
}

impl HpaGraph {
    pub(crate) fn new() -> Self {
        Self::default()
    }

    pub(crate) fn stats(&self) -> HpaStats {
        HpaStats {
            levels: self.levels.len(),
            clusters: self.arena.clusters.len(),
            nodes: self.arena.nodes.len(),
            edges: self.arena.edges.len(),
        }
    }

    /// The cluster of `level` that contains `p`.
    fn cluster_at(&self, level: usize, p: Point) -> Option<ClusterId> {
        if !self.region.contains(p) {
            return None;
        }
        let lv = self.levels.get(level)?;
        let rel = p - self.region.min;
        let (cx, cy) = (rel.x / lv.cluster_size, rel.y / lv.cluster_size);
        lv.clusters.get((cy * lv.cols + cx) as usize).copied()
    }

    /// Append the grid cells `e` stands for, excluding its source cell.
    fn expand(&self, e: EdgeId, out: &mut Vec<Point>) {
        let edge = self.arena.edge(e);
        if edge.path.is_empty() {
            out.push(self.arena.node(edge.to).pos);
            return;
        }
        for &sub in &edge.path {
            self.expand(sub, out);
        }
    }
}
