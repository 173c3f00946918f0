//! Fieldline - WASM layout module
//!
//! Computes 2-D coordinates for the nodes of an arbitrary graph so the
//! result is visually readable: connected nodes cluster, unconnected nodes
//! separate. Compiled to WebAssembly and exposed to JavaScript via
//! wasm-bindgen; the caller hands in `{nodes, links}` plus an options
//! object and receives the same structure back with `x`,`y` assigned.
//!
//! # Architecture
//!
//! - `graph`: data model (`Node`, `Edge`, `Graph`) plus the validated
//!   petgraph-backed simulation topology
//! - `layout`: the Fruchterman-Reingold force simulator and the grid
//!   placement strategy, behind a common `LayoutStrategy` trait
//! - `error`: construction-time configuration validation

use serde::Serialize;
use serde::de::DeserializeOwned;
use wasm_bindgen::prelude::*;

pub mod error;
pub mod graph;
pub mod layout;

use graph::Graph;
use layout::{ForceConfig, ForceLayout, GridConfig, GridLayout, LayoutStrategy};

/// Initialize the WASM module.
#[wasm_bindgen(start)]
pub fn init() {
    console_error_panic_hook::set_once();
}

// =========================================================================
// JS boundary helpers
// =========================================================================

/// Serialize into plain JS objects (not Maps), so passthrough fields look
/// exactly like the caller's originals.
fn to_js<T: Serialize>(value: &T) -> Result<JsValue, JsValue> {
    let serializer = serde_wasm_bindgen::Serializer::json_compatible();
    value.serialize(&serializer).map_err(JsValue::from)
}

/// Deserialize an options or graph object; `undefined`/`null` mean "use
/// defaults".
fn from_js<T: Default + DeserializeOwned>(value: JsValue) -> Result<T, JsValue> {
    if value.is_undefined() || value.is_null() {
        return Ok(T::default());
    }
    serde_wasm_bindgen::from_value(value).map_err(JsValue::from)
}

/// Look up a single configuration field by name; absent names come back as
/// `undefined`, the whole block when no name is given.
fn option_by_name<T: Serialize>(config: &T, name: Option<String>) -> Result<JsValue, JsValue> {
    let all = to_js(config)?;
    match name {
        None => Ok(all),
        Some(name) => js_sys::Reflect::get(&all, &JsValue::from_str(&name)),
    }
}

// =========================================================================
// Force-directed layout
// =========================================================================

/// Fruchterman-Reingold force-directed layout, as exposed to JavaScript.
///
/// Construction copies the graph and initializes node positions;
/// `calculate()` runs the simulation to convergence.
#[wasm_bindgen]
pub struct FrLayout {
    inner: ForceLayout,
}

#[wasm_bindgen]
impl FrLayout {
    /// Create a force layout over `{nodes, links}` with the given options.
    ///
    /// Recognized options: `width`, `height`, `gravity`,
    /// `fixedInitialization`; unknown keys are ignored. Throws on
    /// non-positive or non-finite dimensions or gravity.
    #[wasm_bindgen(constructor)]
    pub fn new(graph: JsValue, options: JsValue) -> Result<FrLayout, JsValue> {
        let graph: Graph = from_js(graph)?;
        let config: ForceConfig = from_js(options)?;
        Ok(Self {
            inner: ForceLayout::new(graph, config)?,
        })
    }

    /// Strategy tag, always `"force"`.
    #[wasm_bindgen(getter, js_name = "type")]
    pub fn kind(&self) -> String {
        self.inner.kind().to_string()
    }

    /// Run the simulation to convergence and return `{nodes, links}`.
    pub fn calculate(&mut self) -> Result<JsValue, JsValue> {
        let result = self.inner.calculate();
        #[cfg(target_arch = "wasm32")]
        web_sys::console::debug_1(
            &format!(
                "fieldline: force layout settled after {} iterations (T={})",
                self.inner.iterations(),
                self.inner.temperature()
            )
            .into(),
        );
        to_js(&result)
    }

    /// Read one option by name, or the whole options block when called
    /// without arguments.
    #[wasm_bindgen(js_name = getOption)]
    pub fn get_option(&self, name: Option<String>) -> Result<JsValue, JsValue> {
        option_by_name(self.inner.config(), name)
    }

    /// Read the whole options block.
    #[wasm_bindgen(js_name = getOptions)]
    pub fn get_options(&self) -> Result<JsValue, JsValue> {
        to_js(self.inner.config())
    }

    /// Replace the options block. Does not re-run initialization: construct
    /// a fresh layout to apply a new canvas size or placement mode.
    #[wasm_bindgen(js_name = setOptions)]
    pub fn set_options(&mut self, options: JsValue) -> Result<(), JsValue> {
        let config: ForceConfig = from_js(options)?;
        self.inner.set_config(config)?;
        Ok(())
    }

    /// Iterations the simulation has run so far.
    #[wasm_bindgen(getter)]
    pub fn iterations(&self) -> u32 {
        self.inner.iterations()
    }
}

// =========================================================================
// Grid layout
// =========================================================================

/// Deterministic grid placement, as exposed to JavaScript.
///
/// Shares the `{nodes, links}` contract with [`FrLayout`] so callers can
/// swap strategies transparently.
#[wasm_bindgen(js_name = "GridLayout")]
pub struct GridLayoutWasm {
    inner: GridLayout,
}

#[wasm_bindgen(js_class = "GridLayout")]
impl GridLayoutWasm {
    /// Create a grid layout over `{nodes, links}` with the given options.
    ///
    /// Recognized options: `gap` (a number broadcasts into `[gap, gap]`)
    /// and `colmax`; unknown keys are ignored.
    #[wasm_bindgen(constructor)]
    pub fn new(graph: JsValue, options: JsValue) -> Result<GridLayoutWasm, JsValue> {
        let graph: Graph = from_js(graph)?;
        let config: GridConfig = from_js(options)?;
        Ok(Self {
            inner: GridLayout::new(graph, config)?,
        })
    }

    /// Strategy tag, always `"grid"`.
    #[wasm_bindgen(getter, js_name = "type")]
    pub fn kind(&self) -> String {
        self.inner.kind().to_string()
    }

    /// Assign grid positions and return `{nodes, links}`.
    pub fn calculate(&mut self) -> Result<JsValue, JsValue> {
        to_js(&self.inner.calculate())
    }

    /// Read one option by name, or the whole options block when called
    /// without arguments.
    #[wasm_bindgen(js_name = getOption)]
    pub fn get_option(&self, name: Option<String>) -> Result<JsValue, JsValue> {
        option_by_name(self.inner.config(), name)
    }

    /// Read the whole options block.
    #[wasm_bindgen(js_name = getOptions)]
    pub fn get_options(&self) -> Result<JsValue, JsValue> {
        to_js(self.inner.config())
    }

    /// Replace the options block. Takes effect on the next `calculate`.
    #[wasm_bindgen(js_name = setOptions)]
    pub fn set_options(&mut self, options: JsValue) -> Result<(), JsValue> {
        let config: GridConfig = from_js(options)?;
        self.inner.set_config(config)?;
        Ok(())
    }
}
