//! Grid (rectangle) placement.
//!
//! Deterministic row-major placement: nodes are laid into a grid whose
//! column count is `min(colmax, ceil(sqrt(n)))`, with `x = column * gap_x`
//! and `y = row * gap_y`. No iteration, no forces; the counterpart to the
//! force strategy for callers that want instant, regular placement.

use serde::{Deserialize, Deserializer, Serialize};

use super::LayoutStrategy;
use crate::error::ConfigError;
use crate::graph::{Edge, Graph, Node};

/// Configuration for the grid layout.
///
/// All fields are optional at the JS boundary; unknown keys are ignored.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GridConfig {
    /// Column and row spacing as `[gap_x, gap_y]` (default: `[50, 50]`).
    /// A bare number is broadcast into both slots.
    #[serde(deserialize_with = "deserialize_gap")]
    pub gap: [f32; 2],
    /// Maximum number of nodes per row (default: 20).
    pub colmax: usize,
}

impl Default for GridConfig {
    fn default() -> Self {
        Self {
            gap: [50.0, 50.0],
            colmax: 20,
        }
    }
}

impl GridConfig {
    /// Reject configuration that would produce NaN positions or an empty row.
    pub fn validate(&self) -> Result<(), ConfigError> {
        let [gx, gy] = self.gap;
        if !gx.is_finite() || !gy.is_finite() || gx < 0.0 || gy < 0.0 {
            return Err(ConfigError::InvalidGap(gx, gy));
        }
        if self.colmax == 0 {
            return Err(ConfigError::InvalidColmax(self.colmax));
        }
        Ok(())
    }
}

/// Accept either `gap: 30` or `gap: [30, 40]`.
fn deserialize_gap<'de, D>(deserializer: D) -> Result<[f32; 2], D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum GapSpec {
        Scalar(f32),
        Pair([f32; 2]),
    }

    Ok(match GapSpec::deserialize(deserializer)? {
        GapSpec::Scalar(g) => [g, g],
        GapSpec::Pair(pair) => pair,
    })
}

/// The grid placement strategy.
///
/// Owns deep copies of the caller's nodes and edges, like the force engine,
/// and produces the same `{nodes, links}` output shape.
pub struct GridLayout {
    config: GridConfig,
    nodes: Vec<Node>,
    links: Vec<Edge>,
}

impl GridLayout {
    /// Create a grid layout over the given graph.
    pub fn new(graph: Graph, config: GridConfig) -> Result<Self, ConfigError> {
        config.validate()?;
        let Graph { nodes, links } = graph;
        Ok(Self {
            config,
            nodes,
            links,
        })
    }

    /// The active configuration.
    pub fn config(&self) -> &GridConfig {
        &self.config
    }

    /// Replace the configuration. Takes effect on the next `calculate`.
    pub fn set_config(&mut self, config: GridConfig) -> Result<(), ConfigError> {
        config.validate()?;
        self.config = config;
        Ok(())
    }
}

impl LayoutStrategy for GridLayout {
    fn kind(&self) -> &'static str {
        "grid"
    }

    fn calculate(&mut self) -> Graph {
        let n = self.nodes.len();
        if n == 0 {
            return Graph::default();
        }

        let columns = self.config.colmax.min((n as f32).sqrt().ceil() as usize);
        let [gap_x, gap_y] = self.config.gap;
        for (i, node) in self.nodes.iter_mut().enumerate() {
            node.x = (i % columns) as f32 * gap_x;
            node.y = (i / columns) as f32 * gap_y;
        }

        Graph {
            nodes: self.nodes.clone(),
            links: self.links.clone(),
        }
    }
}
