//! Configuration validation errors.
//!
//! The simulation itself never fails: degenerate inputs (empty graphs,
//! coincident nodes) are absorbed by in-algorithm guards. The only failure
//! surface is construction-time configuration that would poison the
//! arithmetic with NaN or Infinity, rejected eagerly here.

use thiserror::Error;
use wasm_bindgen::JsValue;

/// Rejected layout configuration.
#[derive(Debug, Error, PartialEq)]
pub enum ConfigError {
    /// Canvas dimensions must be finite and strictly positive.
    #[error("canvas {axis} must be a finite positive number, got {value}")]
    InvalidDimension {
        /// Which dimension was rejected, "width" or "height".
        axis: &'static str,
        /// The offending value.
        value: f32,
    },

    /// The repulsion coefficient must be finite and strictly positive.
    #[error("gravity must be a finite positive number, got {0}")]
    InvalidGravity(f32),

    /// Grid gaps must be finite and non-negative.
    #[error("grid gap must be finite and non-negative, got [{0}, {1}]")]
    InvalidGap(f32, f32),

    /// The grid needs at least one column.
    #[error("colmax must be at least 1, got {0}")]
    InvalidColmax(usize),
}

impl From<ConfigError> for JsValue {
    fn from(err: ConfigError) -> Self {
        js_sys::Error::new(&err.to_string()).into()
    }
}
