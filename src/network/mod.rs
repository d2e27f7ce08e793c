//! Force-directed network layout.

mod forces;
mod paths;
mod quadtree;
mod simulation;

use eframe::egui::{Color32, Vec2};
use tracing::debug;

pub use paths::{ARROW_SIZE, Quadrant, arrowhead, edge_path};
pub use simulation::{
    ALPHA_DECAY, BORDER_MARGIN, ForceSimulation, SETTLE_ALPHA, START_ALPHA, SimulationParams,
    TickStatus,
};

use crate::color::{ColorAssigner, ColorCode, ColorScheme, NEUTRAL_NODE};
use crate::config::{NetworkConfig, SizeMode};
use crate::geometry::{CurvePath, distance_to_polyline};
use crate::graph::{AdjacencyIndex, Node, NodeId, RelationGraph};
use crate::session::{PassToken, RenderSession};
use crate::util::stable_pair;

pub const MIN_NODE_RADIUS: f32 = 5.0;
pub const MAX_NODE_RADIUS: f32 = 25.0;
pub const MIN_EDGE_WIDTH: f32 = 1.5;
pub const MAX_EDGE_WIDTH: f32 = 6.0;

#[derive(Clone, Debug, PartialEq)]
pub struct NetworkNode {
    pub node: NodeId,
    pub radius: f32,
    pub color: Color32,
}

#[derive(Clone, Debug, PartialEq)]
pub struct NetworkEdge {
    pub edge: usize,
    pub source: NodeId,
    pub target: NodeId,
    pub width: f32,
    pub directed: bool,
}

pub struct NetworkLayout {
    pub nodes: Vec<NetworkNode>,
    pub edges: Vec<NetworkEdge>,
    adjacency: AdjacencyIndex,
    simulation: ForceSimulation,
}

fn linear(value: f64, max: f64, low: f32, high: f32) -> f32 {
    if max.is_nan() || max <= 0.0 || !value.is_finite() {
        return low;
    }
    low + (high - low) * (value / max).clamp(0.0, 1.0) as f32
}

fn size_weight(node: &Node, directed: bool, mode: SizeMode) -> f64 {
    match (directed, mode) {
        (false, _) => node.total_weight,
        (true, SizeMode::Outgoing) => node.out_weight,
        (true, SizeMode::Incoming) => node.in_weight,
    }
}

impl NetworkLayout {
    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Symmetric: true for either edge direction and for `a == b`.
    pub fn is_connected(&self, a: NodeId, b: NodeId) -> bool {
        self.adjacency.is_connected(a, b)
    }

    pub fn adjacency(&self) -> &AdjacencyIndex {
        &self.adjacency
    }

    pub fn simulation(&self) -> &ForceSimulation {
        &self.simulation
    }

    pub fn tick(&mut self, session: &RenderSession) -> TickStatus {
        self.simulation.tick(session)
    }

    pub fn run(&mut self, session: &RenderSession, max_ticks: usize) -> TickStatus {
        self.simulation.run(session, max_ticks)
    }

    pub fn reheat(&mut self) {
        self.simulation.reheat();
    }

    pub fn position(&self, node: NodeId) -> Vec2 {
        self.simulation.position(node.index()).unwrap_or_default()
    }

    pub fn node(&self, node: NodeId) -> Option<&NetworkNode> {
        self.nodes.get(node.index())
    }

    /// Current path of an entry of [`Self::edges`].
    pub fn edge_path(&self, edge: &NetworkEdge) -> CurvePath {
        let radius_of = |id: NodeId| self.node(id).map(|node| node.radius).unwrap_or(MIN_NODE_RADIUS);
        edge_path(
            self.position(edge.source),
            radius_of(edge.source),
            self.position(edge.target),
            radius_of(edge.target),
            edge.directed,
        )
    }

    pub fn node_at(&self, point: Vec2) -> Option<NodeId> {
        self.nodes
            .iter()
            .map(|node| (node.node, (self.position(node.node) - point).length() - node.radius))
            .filter(|(_, gap)| *gap <= 0.0)
            .min_by(|a, b| a.1.total_cmp(&b.1))
            .map(|(id, _)| id)
    }

    /// Index into [`Self::edges`] of the edge passing closest to `point`.
    pub fn edge_at(&self, point: Vec2, tolerance: f32) -> Option<usize> {
        self.edges
            .iter()
            .enumerate()
            .map(|(index, edge)| {
                let reach = tolerance.max(edge.width * 0.5);
                let distance = distance_to_polyline(point, &self.edge_path(edge).flatten(16));
                (index, distance, reach)
            })
            .filter(|(_, distance, reach)| distance <= reach)
            .min_by(|a, b| a.1.total_cmp(&b.1))
            .map(|(index, _, _)| index)
    }
}

/// Sizes, colors and seeds the layout. The simulation belongs to the pass
/// identified by `token` and has not ticked yet.
pub fn compute(graph: &RelationGraph, config: &NetworkConfig, token: PassToken) -> NetworkLayout {
    let directed = graph.is_directed();

    let max_size = graph
        .nodes()
        .iter()
        .map(|node| size_weight(node, directed, config.node_size))
        .fold(0.0_f64, f64::max);
    let assigner = match config.color_code {
        ColorCode::Colored => ColorAssigner::new(ColorScheme::Hue { seed: 0.0 }),
        ColorCode::BlackWhite => ColorAssigner::new(ColorScheme::Uniform(NEUTRAL_NODE)),
    };
    let count = graph.nodes().len();
    let nodes = graph
        .nodes()
        .iter()
        .enumerate()
        .map(|(position, node)| NetworkNode {
            node: node.id,
            radius: linear(
                size_weight(node, directed, config.node_size),
                max_size,
                MIN_NODE_RADIUS,
                MAX_NODE_RADIUS,
            ),
            color: assigner.color_at(position, count),
        })
        .collect::<Vec<_>>();

    let max_weight = graph.edges().iter().map(|edge| edge.weight).fold(0.0_f64, f64::max);
    let edges = graph
        .edges()
        .iter()
        .enumerate()
        .map(|(index, edge)| NetworkEdge {
            edge: index,
            source: edge.source,
            target: edge.target,
            width: linear(edge.weight, max_weight, MIN_EDGE_WIDTH, MAX_EDGE_WIDTH),
            directed: edge.directed,
        })
        .collect::<Vec<_>>();

    let seeds = graph
        .nodes()
        .iter()
        .map(|node| stable_pair(node.label()))
        .collect::<Vec<_>>();
    let links = edges
        .iter()
        .map(|edge| (edge.source.index(), edge.target.index()))
        .collect::<Vec<_>>();
    let simulation = ForceSimulation::new(
        token,
        SimulationParams {
            charge: config.charge,
            link_distance: config.link_distance,
            gravity: config.gravity,
            width: config.width,
            height: config.height,
        },
        &seeds,
        nodes.iter().map(|node| node.radius).collect(),
        &links,
    );

    debug!(nodes = nodes.len(), edges = edges.len(), directed, "computed network layout");

    NetworkLayout {
        nodes,
        edges,
        adjacency: graph.adjacency(),
        simulation,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::graph::RelationGraphBuilder;
    use crate::relation::Relation;

    fn relations() -> Vec<Relation> {
        vec![
            Relation::new("A", "B", 4.0),
            Relation::new("B", "A", 2.0),
            Relation::new("A", "C", 1.0),
        ]
    }

    fn layout(directed: bool, config: &NetworkConfig) -> (RelationGraph, NetworkLayout) {
        let graph = RelationGraphBuilder::new().directed(directed).build(&relations());
        let layout = compute(&graph, config, RenderSession::new().begin_pass());
        (graph, layout)
    }

    #[test]
    fn radii_follow_size_mode() {
        let (_, outgoing) = layout(true, &NetworkConfig::default());
        assert_eq!(outgoing.nodes[0].radius, MAX_NODE_RADIUS);
        assert!((outgoing.nodes[1].radius - (5.0 + 20.0 * 2.0 / 5.0)).abs() < 1e-4);
        assert_eq!(outgoing.nodes[2].radius, MIN_NODE_RADIUS);

        let incoming_config = NetworkConfig {
            node_size: SizeMode::Incoming,
            ..NetworkConfig::default()
        };
        let (_, incoming) = layout(true, &incoming_config);
        assert_eq!(incoming.nodes[1].radius, MAX_NODE_RADIUS);

        let (_, undirected) = layout(false, &incoming_config);
        assert_eq!(undirected.nodes[0].radius, MAX_NODE_RADIUS);
        assert!(undirected.nodes.iter().all(|node| node.radius >= MIN_NODE_RADIUS));
    }

    #[test]
    fn widths_scale_against_heaviest_edge() {
        let (_, directed) = layout(true, &NetworkConfig::default());
        assert_eq!(directed.edges[0].width, MAX_EDGE_WIDTH);
        assert!(directed.edges.iter().all(|edge| edge.width >= MIN_EDGE_WIDTH));

        let (graph, undirected) = layout(false, &NetworkConfig::default());
        assert_eq!(graph.edges().len(), 2);
        assert!(undirected.edges.iter().all(|edge| !edge.directed));
    }

    #[test]
    fn connectivity_is_symmetric() {
        for directed in [true, false] {
            let (graph, layout) = layout(directed, &NetworkConfig::default());
            for a in graph.nodes() {
                for b in graph.nodes() {
                    assert_eq!(layout.is_connected(a.id, b.id), layout.is_connected(b.id, a.id));
                }
            }
            assert!(layout.is_connected(NodeId(2), NodeId(0)));
            assert!(!layout.is_connected(NodeId(1), NodeId(2)));
            assert!(layout.is_connected(NodeId(2), NodeId(2)));
        }
    }

    #[test]
    fn black_white_uses_neutral_color() {
        let config = NetworkConfig {
            color_code: ColorCode::BlackWhite,
            ..NetworkConfig::default()
        };
        let (_, layout) = layout(true, &config);
        assert!(layout.nodes.iter().all(|node| node.color == NEUTRAL_NODE));
    }

    #[test]
    fn hit_testing_after_settling() {
        let session = RenderSession::new();
        let graph = RelationGraphBuilder::new().directed(true).build(&relations());
        let mut layout = compute(&graph, &NetworkConfig::default(), session.begin_pass());
        assert_eq!(layout.run(&session, 1_000), TickStatus::Settled);

        let a = layout.position(NodeId(0));
        assert_eq!(layout.node_at(a), Some(NodeId(0)));

        let edge = &layout.edges[2];
        let on_edge = layout.edge_path(edge).point_at(0.5);
        let hit = layout.edge_at(on_edge, 2.0).map(|index| layout.edges[index].edge);
        assert_eq!(hit, Some(edge.edge));
    }

    #[test]
    fn empty_graph_is_valid() {
        let graph = RelationGraphBuilder::new().build(&[]);
        let session = RenderSession::new();
        let mut layout = compute(&graph, &NetworkConfig::default(), session.begin_pass());
        assert!(layout.is_empty());
        assert_eq!(layout.run(&session, 10), TickStatus::Settled);
    }
}
