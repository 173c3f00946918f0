//! Validated simulation topology.
//!
//! The caller's `links` array is echoed back verbatim, but the simulation
//! itself only traverses edges whose endpoints actually exist. `Topology`
//! holds that validated view using petgraph, keeping index bookkeeping and
//! adjacency queries out of the force loop.

use petgraph::Directed;
use petgraph::graph::{Graph as PetGraph, NodeIndex};
use petgraph::visit::EdgeRef;

use super::Edge;

/// Adjacency structure built once at layout construction.
///
/// Edges referencing out-of-range node indices are skipped here (they still
/// appear in the output `links`). Self-loops are kept: they contribute a
/// zero-length attraction which the force pass already tolerates.
pub struct Topology {
    graph: PetGraph<(), f32, Directed>,
}

impl Topology {
    /// Build the topology for `node_count` nodes from the caller's edges.
    pub fn new(node_count: usize, edges: &[Edge]) -> Self {
        let mut graph = PetGraph::with_capacity(node_count, edges.len());
        for _ in 0..node_count {
            graph.add_node(());
        }
        for edge in edges {
            if edge.source >= node_count || edge.target >= node_count {
                continue;
            }
            graph.add_edge(
                NodeIndex::new(edge.source),
                NodeIndex::new(edge.target),
                1.0,
            );
        }
        Self { graph }
    }

    /// Number of nodes.
    pub fn node_count(&self) -> usize {
        self.graph.node_count()
    }

    /// Number of validated edges.
    pub fn edge_count(&self) -> usize {
        self.graph.edge_count()
    }

    /// Iterate validated edges as `(source, target)` index pairs.
    pub fn endpoints(&self) -> impl Iterator<Item = (usize, usize)> + '_ {
        self.graph
            .edge_references()
            .map(|e| (e.source().index(), e.target().index()))
    }

    /// Undirected degree of a node (edge direction is irrelevant to forces).
    pub fn degree(&self, index: usize) -> usize {
        self.graph
            .neighbors_undirected(NodeIndex::new(index))
            .count()
    }
}
