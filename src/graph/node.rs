//! Node type for the layout data model.
//!
//! Nodes arrive from the JS caller as arbitrary objects. The layout only
//! cares about writing `x` and `y`; everything else the caller put on the
//! node (labels, colors, weights, ...) is captured in a flattened map and
//! echoed back untouched.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// A graph vertex as exchanged with the JS caller.
///
/// Input nodes are deserialized into owned copies, so the caller's objects
/// are never mutated in place. `x` and `y` default to zero on input and are
/// overwritten by the layout strategies.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Node {
    /// Caller-assigned identifier. Any JSON value; absent ids stay absent.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<Value>,
    /// X coordinate, written by the layout.
    #[serde(default)]
    pub x: f32,
    /// Y coordinate, written by the layout.
    #[serde(default)]
    pub y: f32,
    /// All other caller fields, preserved verbatim.
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl Node {
    /// Create a node with a numeric id, for tests and programmatic callers.
    pub fn with_id(id: u32) -> Self {
        Self {
            id: Some(Value::from(id)),
            ..Self::default()
        }
    }
}
