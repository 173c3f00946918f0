//! Edge type for the layout data model.
//!
//! Edges are `{source, target}` records with 0-based indices into the node
//! collection. They are read-only throughout a layout: strategies traverse
//! them but never create, reorder, or drop them, and the output `links`
//! sequence is the input sequence verbatim.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// A directed edge between two nodes, by index into the node collection.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Edge {
    /// Index of the source node.
    pub source: usize,
    /// Index of the target node.
    pub target: usize,
    /// All other caller fields, preserved verbatim.
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl Edge {
    /// Create a bare edge between two node indices.
    pub fn new(source: usize, target: usize) -> Self {
        Self {
            source,
            target,
            extra: Map::new(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_deserialize() {
        let edge: Edge = serde_json::from_str(r#"{"source": 0, "target": 2}"#).unwrap();
        assert_eq!(edge.source, 0);
        assert_eq!(edge.target, 2);
    }

    #[test]
    fn test_extra_fields_preserved() {
        let edge: Edge =
            serde_json::from_str(r#"{"source": 1, "target": 0, "kind": "calls"}"#).unwrap();
        let out = serde_json::to_value(&edge).unwrap();
        assert_eq!(out["source"], Value::from(1));
        assert_eq!(out["kind"], Value::from("calls"));
    }
}
