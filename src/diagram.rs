//! One render pass: relations in, a fresh graph snapshot and layout out.

use tracing::info;

use crate::chord::{self, ChordLayout};
use crate::config::{LayoutKind, PanelConfig};
use crate::graph::{AdjacencyIndex, RelationGraph, RelationGraphBuilder};
use crate::hive::{self, HiveLayout};
use crate::interaction::InteractionController;
use crate::network::{self, NetworkLayout, TickStatus};
use crate::relation::Relation;
use crate::session::{PassToken, RenderSession};

pub enum Layout {
    Chord(ChordLayout),
    Hive(HiveLayout),
    Network(NetworkLayout),
}

pub struct Diagram {
    pub graph: RelationGraph,
    pub adjacency: AdjacencyIndex,
    pub config: PanelConfig,
    pub layout: Layout,
    token: PassToken,
}

impl Diagram {
    pub fn kind(&self) -> LayoutKind {
        self.config.kind()
    }

    pub fn token(&self) -> PassToken {
        self.token
    }

    pub fn is_current(&self, session: &RenderSession) -> bool {
        session.is_current(self.token)
    }

    /// True when there is nothing to draw; the diagram is still valid.
    pub fn is_empty(&self) -> bool {
        match &self.layout {
            Layout::Chord(layout) => layout.is_empty(),
            Layout::Hive(layout) => layout.is_empty(),
            Layout::Network(layout) => layout.is_empty(),
        }
    }

    pub fn controller(&self) -> InteractionController<'_> {
        InteractionController::new(
            &self.graph,
            &self.adjacency,
            self.config.tooltip(),
            self.config.fade_opacity(),
        )
        .grouped_by_axis(self.kind() == LayoutKind::Hive)
    }

    /// Advances the network simulation one step. Static layouts are always
    /// settled.
    pub fn tick(&mut self, session: &RenderSession) -> TickStatus {
        if !self.is_current(session) {
            return TickStatus::Superseded;
        }
        match &mut self.layout {
            Layout::Network(layout) => layout.tick(session),
            Layout::Chord(_) | Layout::Hive(_) => TickStatus::Settled,
        }
    }
}

/// Builds the graph for `config` and computes its layout. Starting a pass
/// supersedes every earlier pass of `session`.
pub fn render_pass(relations: &[Relation], config: &PanelConfig, session: &RenderSession) -> Diagram {
    let token = session.begin_pass();

    let (graph, layout) = match config {
        PanelConfig::Chord(chord_config) => {
            let graph = RelationGraphBuilder::new()
                .directed(chord_config.directed)
                .build(relations);
            let layout = Layout::Chord(chord::compute(&graph, chord_config));
            (graph, layout)
        }
        PanelConfig::Hive(hive_config) => {
            let graph = RelationGraphBuilder::new()
                .directed(true)
                .keyed_by_axis(true)
                .seed_nodes(hive_config.nodes.iter().flatten().cloned())
                .build(relations);
            let layout = Layout::Hive(hive::compute(&graph, hive_config));
            (graph, layout)
        }
        PanelConfig::Network(network_config) => {
            let graph = RelationGraphBuilder::new()
                .directed(network_config.directed)
                .build(relations);
            let layout = Layout::Network(network::compute(&graph, network_config, token));
            (graph, layout)
        }
    };

    info!(
        kind = config.kind().label(),
        generation = token.generation(),
        relations = relations.len(),
        nodes = graph.nodes().len(),
        edges = graph.edges().len(),
        "render pass complete"
    );

    Diagram {
        adjacency: graph.adjacency(),
        graph,
        config: config.clone(),
        layout,
        token,
    }
}
