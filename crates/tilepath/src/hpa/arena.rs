use indexmap::IndexMap;
use tilepath_core::{Point, Range};

use crate::solver::SearchState;

macro_rules! handle {
    ($(#[$meta:meta])* $name:ident) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
        pub struct $name(pub(crate) u32);

        impl $name {
            #[inline]
            pub(crate) fn index(self) -> usize {
                self.0 as usize
            }
        }
    };
}

handle!(
    /// Handle to a node in the graph arena.
    NodeId
);
handle!(
    /// Handle to a directed edge in the graph arena.
    EdgeId
);
handle!(
    /// Handle to a cluster in the graph arena.
    ClusterId
);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum EdgeKind {
    /// Between two 8-adjacent concrete cells.
    Step,
    /// Across a cluster boundary.
    Inter,
    /// A cached path inside one cluster.
    Intra,
}

#[derive(Debug, Clone)]
pub(crate) struct GraphNode {
    pub(crate) pos: Point,
    /// The node at the same position one layer down. `None` on the concrete layer.
    pub(crate) child: Option<NodeId>,
    pub(crate) edges: Vec<EdgeId>,
    pub(crate) search: SearchState,
}

#[derive(Debug, Clone)]
pub(crate) struct GraphEdge {
    pub(crate) from: NodeId,
    pub(crate) to: NodeId,
    pub(crate) kind: EdgeKind,
    pub(crate) weight: f32,
    pub(crate) twin: Option<EdgeId>,
    /// Child-layer edges this edge stands for. Empty for a single step.
    pub(crate) path: Vec<EdgeId>,
}

#[derive(Debug, Clone)]
pub(crate) struct Cluster {
    pub(crate) bounds: Range,
    /// Border nodes of this cluster, in insertion order.
    pub(crate) nodes: IndexMap<Point, NodeId>,
    pub(crate) children: Vec<ClusterId>,
}

/// Flat storage for every node, edge and cluster of the graph.
#[derive(Debug, Default)]
pub(crate) struct Arena {
    pub(crate) nodes: Vec<GraphNode>,
    pub(crate) edges: Vec<GraphEdge>,
    pub(crate) clusters: Vec<Cluster>,
}

impl Arena {
    pub(crate) fn clear(&mut self) {
        self.nodes.clear();
        self.edges.clear();
        self.clusters.clear();
    }

    #[inline]
    pub(crate) fn node(&self, id: NodeId) -> &GraphNode {
        &self.nodes[id.index()]
    }

    #[inline]
    pub(crate) fn edge(&self, id: EdgeId) -> &GraphEdge {
        &self.edges[id.index()]
    }

    #[inline]
    pub(crate) fn cluster(&self, id: ClusterId) -> &Cluster {
        &self.clusters[id.index()]
    }

    pub(crate) fn add_node(&mut self, pos: Point, child: Option<NodeId>) -> NodeId {
        let id = NodeId(self.nodes.len() as u32);
        self.nodes.push(GraphNode {
            pos,
            child,
            edges: Vec::new(),
            search: SearchState::default(),
        });
        id
    }

    /// Add a single directed edge and register it on its source node.
    pub(crate) fn add_edge(
        &mut self,
        from: NodeId,
        to: NodeId,
        kind: EdgeKind,
        weight: f32,
        path: Vec<EdgeId>,
    ) -> EdgeId {
        let id = EdgeId(self.edges.len() as u32);
        self.edges.push(GraphEdge {
            from,
            to,
            kind,
            weight,
            twin: None,
            path,
        });
        self.nodes[from.index()].edges.push(id);
        id
    }

    /// Add `a -> b` and `b -> a` as twins of each other.
    pub(crate) fn add_edge_pair(
        &mut self,
        a: NodeId,
        b: NodeId,
        kind: EdgeKind,
        (forward_weight, forward_path): (f32, Vec<EdgeId>),
        (backward_weight, backward_path): (f32, Vec<EdgeId>),
    ) -> (EdgeId, EdgeId) {
        let fwd = self.add_edge(a, b, kind, forward_weight, forward_path);
        let back = self.add_edge(b, a, kind, backward_weight, backward_path);
        self.edges[fwd.index()].twin = Some(back);
        self.edges[back.index()].twin = Some(fwd);
        (fwd, back)
    }

    pub(crate) fn add_cluster(&mut self, bounds: Range, children: Vec<ClusterId>) -> ClusterId {
        let id = ClusterId(self.clusters.len() as u32);
        self.clusters.push(Cluster {
            bounds,
            nodes: IndexMap::new(),
            children,
        });
        id
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn edge_pairs_are_twinned() {
        let mut a = Arena::default();
        let n0 = a.add_node(Point::new(0, 0), None);
        let n1 = a.add_node(Point::new(1, 0), None);
        let (f, b) = a.add_edge_pair(n0, n1, EdgeKind::Step, (1.0, vec![]), (2.0, vec![]));
        assert_eq!(a.edge(f).twin, Some(b));
        assert_eq!(a.edge(b).twin, Some(f));
        assert_eq!(a.edge(b).weight, 2.0);
        assert_eq!(a.node(n0).edges, vec![f]);
        assert_eq!(a.node(n1).edges, vec![b]);
        assert_eq!(a.edge(b).to, n0);
    }

    #[test]
    fn clear_empties_everything() {
        let mut a = Arena::default();
        let n = a.add_node(Point::ZERO, None);
        a.add_edge(n, n, EdgeKind::Inter, 0.0, vec![]);
        a.add_cluster(Range::new(0, 0, 10, 10), vec![]);
        a.clear();
        assert!(a.nodes.is_empty() && a.edges.is_empty() && a.clusters.is_empty());
    }
}
