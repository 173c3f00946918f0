//! Fruchterman–Reingold force-directed placement.
//!
//! Treats nodes as charged particles that repel each other and edges as
//! springs that pull their endpoints together, then integrates the
//! accumulated forces under a decaying temperature bound until the layout
//! settles.
//!
//! # Algorithm
//!
//! Per iteration, up to [`MAX_ITERATIONS`] times:
//!
//! 1. **Repulsion**: every ordered pair of distinct nodes contributes
//!    `gravity * k^2 / m` along their separation vector, where `k` is the
//!    ideal edge length derived from canvas area and node count. Repulsion
//!    has a finite range: pairs farther apart than `2k` contribute nothing.
//!    Exactly coincident pairs are split with a random perturbation.
//! 2. **Attraction**: each edge pulls both endpoints together with
//!    coefficient `m / k`, proportional to how far the edge exceeds the
//!    ideal length.
//! 3. **Integration**: each node moves by its accumulated displacement,
//!    capped in magnitude at the current temperature, then is clamped into
//!    the canvas rectangle.
//! 4. **Cooling**: the temperature decays by [`COOLING_FACTOR`]; the loop
//!    stops once it drops below [`MIN_TEMPERATURE`].
//!
//! Based on "Graph Drawing by Force-directed Placement", Fruchterman &
//! Reingold (1991).

use rand::rngs::SmallRng;
use rand::{Rng, SeedableRng};
use serde::{Deserialize, Serialize};

use super::LayoutStrategy;
use crate::error::ConfigError;
use crate::graph::{Edge, Graph, Node, Topology};

/// Maximum number of simulation iterations.
pub const MAX_ITERATIONS: u32 = 1000;

/// Multiplicative temperature decay applied after every iteration.
pub const COOLING_FACTOR: f32 = 0.95;

/// Temperature below which the simulation stops.
pub const MIN_TEMPERATURE: f32 = 0.1;

/// Angular step between consecutive nodes on the fixed placement spiral.
const SPIRAL_ANGLE: f32 = std::f32::consts::PI / 6.0;

/// Floor for the spiral radius increment of the fixed placement.
const MIN_SPIRAL_RADIUS: f32 = 10.0;

/// Configuration for the force-directed layout.
///
/// All fields are optional at the JS boundary; unknown keys are ignored.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ForceConfig {
    /// Canvas width (default: 500). Positions are clamped to
    /// `[-width/2, width/2]`.
    pub width: f32,
    /// Canvas height (default: 500). Positions are clamped to
    /// `[-height/2, height/2]`.
    pub height: f32,
    /// Repulsive force coefficient (default: 0.5).
    pub gravity: f32,
    /// Place initial positions on a deterministic spiral instead of
    /// uniformly at random (default: false).
    pub fixed_initialization: bool,
}

impl Default for ForceConfig {
    fn default() -> Self {
        Self {
            width: 500.0,
            height: 500.0,
            gravity: 0.5,
            fixed_initialization: false,
        }
    }
}

impl ForceConfig {
    /// Reject configuration that would poison the arithmetic downstream.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if !self.width.is_finite() || self.width <= 0.0 {
            return Err(ConfigError::InvalidDimension {
                axis: "width",
                value: self.width,
            });
        }
        if !self.height.is_finite() || self.height <= 0.0 {
            return Err(ConfigError::InvalidDimension {
                axis: "height",
                value: self.height,
            });
        }
        if !self.gravity.is_finite() || self.gravity <= 0.0 {
            return Err(ConfigError::InvalidGravity(self.gravity));
        }
        Ok(())
    }
}

/// The force-directed layout engine.
///
/// Owns deep copies of the caller's nodes and edges plus SoA position and
/// displacement buffers for the simulation hot loop. Construction
/// initializes positions; [`LayoutStrategy::calculate`] runs the iteration
/// loop to convergence.
pub struct ForceLayout {
    config: ForceConfig,
    nodes: Vec<Node>,
    links: Vec<Edge>,
    topology: Topology,

    /// X positions (SoA layout).
    pos_x: Vec<f32>,
    /// Y positions (SoA layout).
    pos_y: Vec<f32>,
    /// Per-iteration displacement accumulator, reset every iteration.
    disp_x: Vec<f32>,
    disp_y: Vec<f32>,

    /// Ideal edge length, `sqrt(width * height / n)`. Zero for empty graphs.
    k: f32,
    /// Current temperature: upper bound on per-iteration movement.
    temperature: f32,
    /// Total iterations run so far.
    iterations: u32,

    rng: SmallRng,
}

impl ForceLayout {
    /// Create an engine with an entropy-seeded random source.
    pub fn new(graph: Graph, config: ForceConfig) -> Result<Self, ConfigError> {
        Self::with_rng(graph, config, SmallRng::from_entropy())
    }

    /// Create an engine with a caller-provided random source, for
    /// reproducible layouts.
    pub fn with_rng(graph: Graph, config: ForceConfig, rng: SmallRng) -> Result<Self, ConfigError> {
        config.validate()?;

        let Graph { nodes, links } = graph;
        let n = nodes.len();
        let topology = Topology::new(n, &links);

        // Guard the k derivation: sqrt(area / 0) would be infinite.
        let (k, temperature) = if n == 0 {
            (0.0, 0.0)
        } else {
            (
                (config.width * config.height / n as f32).sqrt(),
                0.5 * config.width.min(config.height),
            )
        };

        let mut layout = Self {
            config,
            nodes,
            links,
            topology,
            pos_x: vec![0.0; n],
            pos_y: vec![0.0; n],
            disp_x: vec![0.0; n],
            disp_y: vec![0.0; n],
            k,
            temperature,
            iterations: 0,
            rng,
        };
        layout.place_initial();
        Ok(layout)
    }

    /// Assign initial positions: a deterministic expanding spiral when
    /// `fixed_initialization` is set, uniform random within the canvas
    /// otherwise.
    fn place_initial(&mut self) {
        let n = self.pos_x.len();
        if n == 0 {
            return;
        }

        let w = self.config.width;
        let h = self.config.height;
        if self.config.fixed_initialization {
            let r0 = (w.min(h) / n as f32).max(MIN_SPIRAL_RADIUS);
            for i in 0..n {
                let radius = r0 * (i as f32).sqrt();
                let angle = i as f32 * SPIRAL_ANGLE;
                self.pos_x[i] = radius * angle.cos();
                self.pos_y[i] = radius * angle.sin();
            }
        } else {
            for i in 0..n {
                self.pos_x[i] = self.rng.gen_range(-0.5 * w..0.5 * w);
                self.pos_y[i] = self.rng.gen_range(-0.5 * h..0.5 * h);
            }
        }
    }

    /// One full simulation iteration: repulsion, attraction, integration
    /// with temperature capping and boundary clamping, then cooling.
    fn step(&mut self) {
        let n = self.pos_x.len();

        // Repulsion over all ordered pairs of distinct nodes.
        for v in 0..n {
            self.disp_x[v] = 0.0;
            self.disp_y[v] = 0.0;
            for u in 0..n {
                if u == v {
                    continue;
                }
                let mut dx = self.pos_x[v] - self.pos_x[u];
                let mut dy = self.pos_y[v] - self.pos_y[u];
                let mut m = (dx * dx + dy * dy).sqrt();
                if m == 0.0 {
                    // Coincident pair: break the degeneracy with a random
                    // push instead of dividing by zero.
                    dx = self.rng.gen_range(0.0..1.0);
                    dy = self.rng.gen_range(0.0..1.0);
                    m = 1.0;
                }
                let c = self.repulsion(m) / m;
                self.disp_x[v] += dx * c;
                self.disp_y[v] += dy * c;
            }
        }

        // Attraction along validated edges; both endpoints receive opposite
        // contributions.
        for (s, t) in self.topology.endpoints() {
            let dx = self.pos_x[s] - self.pos_x[t];
            let dy = self.pos_y[s] - self.pos_y[t];
            let m = (dx * dx + dy * dy).sqrt();
            let c = m / self.k;
            self.disp_x[s] -= dx * c;
            self.disp_y[s] -= dy * c;
            self.disp_x[t] += dx * c;
            self.disp_y[t] += dy * c;
        }

        // Integrate: cap movement at the current temperature, then pin
        // escapees to the canvas edge.
        let half_w = 0.5 * self.config.width;
        let half_h = 0.5 * self.config.height;
        for v in 0..n {
            let dx = self.disp_x[v];
            let dy = self.disp_y[v];
            let m = (dx * dx + dy * dy).sqrt();
            let scale = if m != 0.0 {
                m.min(self.temperature) / m
            } else {
                0.0
            };
            self.pos_x[v] = (self.pos_x[v] + dx * scale).clamp(-half_w, half_w);
            self.pos_y[v] = (self.pos_y[v] + dy * scale).clamp(-half_h, half_h);
        }

        self.temperature *= COOLING_FACTOR;
    }

    /// Repulsive force magnitude at distance `m`. Finite range: pairs
    /// farther apart than `2k` do not repel.
    fn repulsion(&self, m: f32) -> f32 {
        if m < 2.0 * self.k {
            self.config.gravity * self.k * self.k / m
        } else {
            0.0
        }
    }

    // =========================================================================
    // Accessors
    // =========================================================================

    /// The active configuration.
    pub fn config(&self) -> &ForceConfig {
        &self.config
    }

    /// Replace the configuration.
    ///
    /// Does not re-run initialization: a changed canvas or placement mode
    /// only takes effect on a freshly constructed engine.
    pub fn set_config(&mut self, config: ForceConfig) -> Result<(), ConfigError> {
        config.validate()?;
        self.config = config;
        Ok(())
    }

    /// Current temperature.
    pub fn temperature(&self) -> f32 {
        self.temperature
    }

    /// Total iterations run across `calculate` calls.
    pub fn iterations(&self) -> u32 {
        self.iterations
    }

    /// Ideal edge length `k` derived from canvas area and node count.
    pub fn ideal_edge_length(&self) -> f32 {
        self.k
    }

    /// Current X positions (SoA layout).
    pub fn positions_x(&self) -> &[f32] {
        &self.pos_x
    }

    /// Current Y positions (SoA layout).
    pub fn positions_y(&self) -> &[f32] {
        &self.pos_y
    }

    /// Undirected degree of a node, from the validated topology.
    pub fn degree(&self, index: usize) -> usize {
        self.topology.degree(index)
    }

    /// Snapshot the current state as a `{nodes, links}` pair.
    fn snapshot(&mut self) -> Graph {
        for (i, node) in self.nodes.iter_mut().enumerate() {
            node.x = self.pos_x[i];
            node.y = self.pos_y[i];
        }
        Graph {
            nodes: self.nodes.clone(),
            links: self.links.clone(),
        }
    }
}

impl LayoutStrategy for ForceLayout {
    fn kind(&self) -> &'static str {
        "force"
    }

    /// Run the simulation to convergence and return the positioned graph.
    ///
    /// Terminates at the first iteration where the temperature falls below
    /// [`MIN_TEMPERATURE`], or after [`MAX_ITERATIONS`], whichever comes
    /// first. An empty node collection short-circuits to an empty layout.
    fn calculate(&mut self) -> Graph {
        if self.nodes.is_empty() {
            return Graph::default();
        }

        while self.iterations < MAX_ITERATIONS && self.temperature >= MIN_TEMPERATURE {
            self.step();
            self.iterations += 1;
        }

        self.snapshot()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn seeded(seed: u64) -> SmallRng {
        SmallRng::seed_from_u64(seed)
    }

    fn square_config(side: f32) -> ForceConfig {
        ForceConfig {
            width: side,
            height: side,
            ..ForceConfig::default()
        }
    }

    #[test]
    fn test_empty_graph_returns_empty_layout() {
        let mut layout = ForceLayout::new(Graph::default(), ForceConfig::default()).unwrap();
        // k must be guarded, not sqrt(area / 0).
        assert_eq!(layout.ideal_edge_length(), 0.0);

        let result = layout.calculate();
        assert!(result.nodes.is_empty());
        assert!(result.links.is_empty());
        assert_eq!(layout.iterations(), 0);
    }

    #[test]
    fn test_terminates_and_returns_all_nodes() {
        for n in [1usize, 2, 7, 25] {
            let graph = Graph::from_pairs(n, &[]);
            let mut layout =
                ForceLayout::with_rng(graph, square_config(100.0), seeded(9)).unwrap();
            let result = layout.calculate();

            assert_eq!(result.nodes.len(), n);
            assert!(layout.iterations() <= MAX_ITERATIONS);
            assert!(layout.temperature() < MIN_TEMPERATURE);
            for node in &result.nodes {
                assert!(node.x.is_finite() && node.y.is_finite());
            }
        }
    }

    #[test]
    fn test_positions_clamped_every_iteration() {
        let graph = Graph::from_pairs(10, &[(0, 1), (2, 3), (4, 5)]);
        let mut layout = ForceLayout::with_rng(graph, square_config(80.0), seeded(3)).unwrap();

        for _ in 0..200 {
            layout.step();
            for (&x, &y) in layout.positions_x().iter().zip(layout.positions_y()) {
                assert!((-40.0..=40.0).contains(&x), "x escaped the canvas: {x}");
                assert!((-40.0..=40.0).contains(&y), "y escaped the canvas: {y}");
            }
        }
    }

    #[test]
    fn test_cooling_schedule_and_stop_point() {
        let graph = Graph::from_pairs(4, &[(0, 1)]);
        let mut layout = ForceLayout::with_rng(graph, square_config(100.0), seeded(5)).unwrap();
        assert_eq!(layout.temperature(), 50.0);

        layout.calculate();

        // Final temperature is T0 * 0.95^iterations, below the threshold,
        // and the iteration before was still at or above it.
        let expected = 50.0 * COOLING_FACTOR.powi(layout.iterations() as i32);
        assert!((layout.temperature() - expected).abs() < 1e-3);
        assert!(layout.temperature() < MIN_TEMPERATURE);
        assert!(layout.temperature() / COOLING_FACTOR >= MIN_TEMPERATURE);
        assert!(layout.iterations() < MAX_ITERATIONS);
    }

    #[test]
    fn test_temperature_monotonically_decreases() {
        let graph = Graph::from_pairs(5, &[]);
        let mut layout = ForceLayout::with_rng(graph, square_config(100.0), seeded(1)).unwrap();

        let mut prev = layout.temperature();
        for _ in 0..50 {
            layout.step();
            assert!(layout.temperature() <= prev);
            prev = layout.temperature();
        }
    }

    #[test]
    fn test_fixed_initialization_is_deterministic() {
        let config = ForceConfig {
            fixed_initialization: true,
            ..square_config(100.0)
        };
        let a = ForceLayout::with_rng(Graph::from_pairs(12, &[]), config.clone(), seeded(1))
            .unwrap();
        let b = ForceLayout::with_rng(Graph::from_pairs(12, &[]), config, seeded(2)).unwrap();

        assert_eq!(a.positions_x(), b.positions_x());
        assert_eq!(a.positions_y(), b.positions_y());

        // Node 0 sits at the spiral origin, node 1 one radius step out.
        assert_eq!(a.positions_x()[0], 0.0);
        assert_eq!(a.positions_y()[0], 0.0);
        let r0 = (100.0f32 / 12.0).max(10.0);
        let r1 = (a.positions_x()[1].powi(2) + a.positions_y()[1].powi(2)).sqrt();
        assert!((r1 - r0).abs() < 1e-4);
    }

    #[test]
    fn test_random_initialization_differs_between_sources() {
        let graph = Graph::from_pairs(8, &[(0, 1), (1, 2)]);
        let mut a =
            ForceLayout::with_rng(graph.clone(), square_config(100.0), seeded(11)).unwrap();
        let mut b = ForceLayout::with_rng(graph, square_config(100.0), seeded(12)).unwrap();

        let ra = a.calculate();
        let rb = b.calculate();
        let differs = ra
            .nodes
            .iter()
            .zip(&rb.nodes)
            .any(|(na, nb)| na.x != nb.x || na.y != nb.y);
        assert!(differs, "different random sources produced identical layouts");

        // Both still satisfy the boundary invariant.
        for node in ra.nodes.iter().chain(&rb.nodes) {
            assert!(node.x.abs() <= 50.0 && node.y.abs() <= 50.0);
        }
    }

    #[test]
    fn test_coincident_nodes_resolve() {
        let graph = Graph::from_pairs(2, &[]);
        let mut layout = ForceLayout::with_rng(graph, square_config(100.0), seeded(7)).unwrap();
        layout.pos_x.copy_from_slice(&[12.5, 12.5]);
        layout.pos_y.copy_from_slice(&[-3.0, -3.0]);

        layout.step();

        let (x0, y0) = (layout.pos_x[0], layout.pos_y[0]);
        let (x1, y1) = (layout.pos_x[1], layout.pos_y[1]);
        assert!(x0.is_finite() && y0.is_finite() && x1.is_finite() && y1.is_finite());
        assert!(
            x0 != x1 || y0 != y1,
            "coincident nodes did not separate: ({x0}, {y0})"
        );
    }

    #[test]
    fn test_path_graph_pulls_middle_node_inward() {
        // 3 nodes, edges 0-1 and 1-2. After convergence the middle node
        // should sit closer to the centroid of its neighbors than the
        // endpoints sit to each other.
        let graph = Graph::from_pairs(3, &[(0, 1), (1, 2)]);
        let mut layout = ForceLayout::with_rng(graph, square_config(100.0), seeded(42)).unwrap();
        assert_eq!(layout.degree(1), 2);

        let result = layout.calculate();
        let p = |i: usize| (result.nodes[i].x, result.nodes[i].y);
        let (x0, y0) = p(0);
        let (x1, y1) = p(1);
        let (x2, y2) = p(2);

        let centroid = ((x0 + x2) / 2.0, (y0 + y2) / 2.0);
        let middle_to_centroid = ((x1 - centroid.0).powi(2) + (y1 - centroid.1).powi(2)).sqrt();
        let endpoint_to_endpoint = ((x0 - x2).powi(2) + (y0 - y2).powi(2)).sqrt();
        assert!(
            middle_to_centroid < endpoint_to_endpoint,
            "middle node not pulled between its neighbors: {middle_to_centroid} vs {endpoint_to_endpoint}"
        );
    }

    #[test]
    fn test_repulsion_has_finite_range() {
        let graph = Graph::from_pairs(2, &[]);
        let layout = ForceLayout::with_rng(graph, square_config(100.0), seeded(0)).unwrap();
        let k = layout.ideal_edge_length();

        assert!(layout.repulsion(0.5 * k) > 0.0);
        assert!(layout.repulsion(1.99 * k) > 0.0);
        assert_eq!(layout.repulsion(2.0 * k), 0.0);
        assert_eq!(layout.repulsion(10.0 * k), 0.0);
    }

    #[test]
    fn test_caller_fields_survive_the_simulation() {
        let graph: Graph = serde_json::from_str(
            r#"{
                "nodes": [
                    {"id": "a", "label": "Alpha"},
                    {"id": "b", "label": "Beta"}
                ],
                "links": [{"source": 0, "target": 1, "kind": "friend"}]
            }"#,
        )
        .unwrap();

        let mut layout = ForceLayout::with_rng(graph, square_config(100.0), seeded(2)).unwrap();
        let result = layout.calculate();

        assert_eq!(result.nodes[0].extra["label"], "Alpha");
        assert_eq!(result.nodes[1].id, Some(serde_json::Value::from("b")));
        assert_eq!(result.links[0].extra["kind"], "friend");
    }

    #[test]
    fn test_out_of_range_edges_ignored_but_echoed() {
        let graph = Graph::from_pairs(2, &[(0, 1), (0, 9)]);
        let mut layout = ForceLayout::with_rng(graph, square_config(100.0), seeded(4)).unwrap();
        let result = layout.calculate();

        // The bogus edge never fed the simulation but is still in the output.
        assert_eq!(result.links.len(), 2);
        assert_eq!(result.links[1].target, 9);
        for node in &result.nodes {
            assert!(node.x.is_finite() && node.y.is_finite());
        }
    }

    #[test]
    fn test_invalid_config_rejected() {
        let bad_width = ForceConfig {
            width: 0.0,
            ..ForceConfig::default()
        };
        assert_eq!(
            ForceLayout::new(Graph::default(), bad_width).err(),
            Some(ConfigError::InvalidDimension {
                axis: "width",
                value: 0.0
            })
        );

        let bad_height = ForceConfig {
            height: -5.0,
            ..ForceConfig::default()
        };
        assert!(ForceLayout::new(Graph::default(), bad_height).is_err());

        let bad_gravity = ForceConfig {
            gravity: f32::NAN,
            ..ForceConfig::default()
        };
        assert!(ForceLayout::new(Graph::default(), bad_gravity).is_err());
    }

    #[test]
    fn test_set_config_does_not_reinitialize() {
        let graph = Graph::from_pairs(4, &[]);
        let mut layout = ForceLayout::with_rng(graph, square_config(100.0), seeded(6)).unwrap();
        let before_x = layout.positions_x().to_vec();
        let before_t = layout.temperature();

        layout
            .set_config(ForceConfig {
                gravity: 2.0,
                ..square_config(300.0)
            })
            .unwrap();

        assert_eq!(layout.config().gravity, 2.0);
        assert_eq!(layout.positions_x(), before_x.as_slice());
        assert_eq!(layout.temperature(), before_t);
    }

    #[test]
    fn test_unknown_option_keys_ignored() {
        let config: ForceConfig = serde_json::from_str(
            r#"{"width": 200, "bogus": true, "fixedInitialization": true}"#,
        )
        .unwrap();
        assert_eq!(config.width, 200.0);
        assert_eq!(config.height, 500.0);
        assert!(config.fixed_initialization);
    }
}
