//! Graph data model shared by all layout strategies.
//!
//! The JS caller exchanges a `{nodes, links}` structure; both collections
//! default to empty when absent and unknown caller fields ride along
//! untouched. The same [`Graph`] type serves as input and output so the
//! force and grid strategies stay structurally interchangeable.

mod edge;
mod node;
mod topology;

pub use edge::Edge;
pub use node::Node;
pub use topology::Topology;

use serde::{Deserialize, Serialize};

/// A `{nodes, links}` pair as exchanged with the JS caller.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Graph {
    /// Ordered node collection.
    #[serde(default)]
    pub nodes: Vec<Node>,
    /// Ordered edge collection, indices into `nodes`.
    #[serde(default)]
    pub links: Vec<Edge>,
}

impl Graph {
    /// Build a graph from bare node ids and `(source, target)` pairs, for
    /// tests and programmatic callers.
    pub fn from_pairs(node_count: usize, pairs: &[(usize, usize)]) -> Self {
        Self {
            nodes: (0..node_count as u32).map(Node::with_id).collect(),
            links: pairs.iter().map(|&(s, t)| Edge::new(s, t)).collect(),
        }
    }
}
