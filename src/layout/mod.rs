//! Layout strategies.
//!
//! Each strategy consumes a `{nodes, links}` graph plus a configuration
//! block at construction and produces the same structure with `x`,`y`
//! assigned on every node. The force and grid strategies share the
//! [`LayoutStrategy`] interface so callers can swap them transparently.

pub mod force;
pub mod grid;

pub use force::{ForceConfig, ForceLayout};
pub use grid::{GridConfig, GridLayout};

use crate::graph::Graph;

/// Common interface over the concrete layout strategies.
pub trait LayoutStrategy {
    /// Strategy tag, `"force"` or `"grid"`.
    fn kind(&self) -> &'static str;

    /// Compute positions and return the annotated `{nodes, links}` pair.
    ///
    /// The returned edge sequence is the caller's input verbatim; only
    /// nodes gain coordinates.
    fn calculate(&mut self) -> Graph;
}
