//! Hover highlighting, tooltip assembly and click dispatch.
//!
//! Everything here reads an already built graph and adjacency index and
//! returns plain data; nothing mutates layout state.

mod click;
mod tooltip;

use std::collections::HashSet;

pub use click::{ClickDispatcher, LinkRef, NodeRef};
pub use tooltip::{Tooltip, TooltipRow, TooltipSection, place_tooltip};

use crate::config::TooltipConfig;
use crate::graph::{AdjacencyIndex, NodeId, RelationGraph};
use crate::util::format_weight;

/// What the pointer is over.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Focus {
    Node(NodeId),
    Edge(usize),
    /// An unordered node pair, as drawn by one chord ribbon.
    Pair(NodeId, NodeId),
}

/// Elements drawn at full opacity; everything else fades.
#[derive(Clone, Debug, PartialEq)]
pub struct Highlight {
    pub focus: Focus,
    pub nodes: HashSet<NodeId>,
    pub edges: HashSet<usize>,
    pub fade_opacity: f32,
}

impl Highlight {
    pub fn node_opacity(&self, node: NodeId) -> f32 {
        if self.nodes.contains(&node) { 1.0 } else { self.fade_opacity }
    }

    pub fn edge_opacity(&self, edge: usize) -> f32 {
        if self.edges.contains(&edge) { 1.0 } else { self.fade_opacity }
    }

    /// Opacity of a ribbon between `a` and `b`. A hovered node keeps every
    /// ribbon touching it; a hovered pair keeps only its own ribbon.
    pub fn pair_opacity(&self, a: NodeId, b: NodeId) -> f32 {
        let lit = match self.focus {
            Focus::Node(node) => a == node || b == node,
            Focus::Pair(x, y) => (a, b) == (x, y) || (a, b) == (y, x),
            Focus::Edge(_) => self.nodes.contains(&a) && self.nodes.contains(&b),
        };
        if lit { 1.0 } else { self.fade_opacity }
    }
}

/// Opacity with no highlight active.
pub fn opacity_of(highlight: Option<&Highlight>, opacity: impl FnOnce(&Highlight) -> f32) -> f32 {
    highlight.map_or(1.0, opacity)
}

pub struct InteractionController<'a> {
    graph: &'a RelationGraph,
    adjacency: &'a AdjacencyIndex,
    tooltip: TooltipConfig,
    fade_opacity: f32,
    group_by_axis: bool,
}

impl<'a> InteractionController<'a> {
    pub fn new(
        graph: &'a RelationGraph,
        adjacency: &'a AdjacencyIndex,
        tooltip: TooltipConfig,
        fade_opacity: f32,
    ) -> Self {
        Self {
            graph,
            adjacency,
            tooltip,
            fade_opacity,
            group_by_axis: false,
        }
    }

    /// Groups node tooltip rows by the neighbor's axis.
    pub fn grouped_by_axis(mut self, grouped: bool) -> Self {
        self.group_by_axis = grouped;
        self
    }

    pub fn tooltip_config(&self) -> TooltipConfig {
        self.tooltip
    }

    pub fn highlight(&self, focus: Focus) -> Highlight {
        match focus {
            Focus::Node(node) => self.highlight_node(node),
            Focus::Edge(edge) => self.highlight_edge(edge),
            Focus::Pair(a, b) => self.highlight_pair(a, b),
        }
    }

    /// The node, every node connected to it, and its incident edges.
    pub fn highlight_node(&self, node: NodeId) -> Highlight {
        let nodes = self
            .graph
            .nodes()
            .iter()
            .map(|other| other.id)
            .filter(|&other| self.adjacency.is_connected(node, other))
            .collect();
        let edges = self.graph.incident_edges(node).iter().copied().collect();
        Highlight {
            focus: Focus::Node(node),
            nodes,
            edges,
            fade_opacity: self.fade_opacity,
        }
    }

    pub fn highlight_edge(&self, edge: usize) -> Highlight {
        let nodes = self
            .graph
            .edge(edge)
            .map(|edge| HashSet::from([edge.source, edge.target]))
            .unwrap_or_default();
        Highlight {
            focus: Focus::Edge(edge),
            nodes,
            edges: HashSet::from([edge]),
            fade_opacity: self.fade_opacity,
        }
    }

    pub fn highlight_pair(&self, a: NodeId, b: NodeId) -> Highlight {
        let edges = self
            .graph
            .incident_edges(a)
            .iter()
            .copied()
            .filter(|&index| {
                self.graph
                    .edge(index)
                    .is_some_and(|edge| edge.other(a) == Some(b))
            })
            .collect();
        Highlight {
            focus: Focus::Pair(a, b),
            nodes: HashSet::from([a, b]),
            edges,
            fade_opacity: self.fade_opacity,
        }
    }

    pub fn tooltip(&self, focus: Focus) -> Option<Tooltip> {
        match focus {
            Focus::Node(node) => self.node_tooltip(node),
            Focus::Edge(edge) => self.edge_tooltip(edge),
            Focus::Pair(a, b) => self.pair_tooltip(a, b),
        }
    }

    fn neighbor_rows(&self, node: NodeId) -> Vec<TooltipRow> {
        let matrix = self.graph.directed_matrix();
        let mut seen = HashSet::new();
        let mut rows = Vec::new();
        for &index in self.graph.incident_edges(node) {
            let Some(other) = self.graph.edge(index).and_then(|edge| edge.other(node)) else {
                continue;
            };
            if !seen.insert(other) {
                continue;
            }
            let Some(neighbor) = self.graph.node(other) else {
                continue;
            };
            let outgoing = matrix.get(node.index(), other.index());
            let incoming = matrix.get(other.index(), node.index());
            rows.push(TooltipRow {
                label: neighbor.label().to_owned(),
                axis: neighbor.axis().map(str::to_owned),
                outgoing,
                incoming,
                value: if other == node { outgoing } else { outgoing + incoming },
            });
        }
        self.tooltip.sort.apply(&rows)
    }

    /// Node summary plus its neighbors, sorted by the tooltip policy and
    /// optionally grouped by neighbor axis in first-seen axis order.
    pub fn node_tooltip(&self, node: NodeId) -> Option<Tooltip> {
        let record = self.graph.node(node)?;
        let directed = self.graph.is_directed();
        let rows = self.neighbor_rows(node);

        let sections = if self.group_by_axis {
            let mut sections: Vec<TooltipSection> = Vec::new();
            for row in rows {
                let heading = Some(row.axis.clone().unwrap_or_default());
                match sections.iter_mut().find(|section| section.heading == heading) {
                    Some(section) => section.rows.push(row),
                    None => sections.push(TooltipSection {
                        heading,
                        rows: vec![row],
                    }),
                }
            }
            sections
        } else if rows.is_empty() {
            Vec::new()
        } else {
            vec![TooltipSection { heading: None, rows }]
        };

        let mut summary = Vec::new();
        if directed {
            summary.push(format!("Outgoing: {}", format_weight(record.out_weight)));
            summary.push(format!("Incoming: {}", format_weight(record.in_weight)));
        } else {
            summary.push(format!("Value: {}", format_weight(record.total_weight)));
        }

        let title = match record.axis() {
            Some(axis) => format!("{} ({axis})", record.label()),
            None => record.label().to_owned(),
        };
        Some(Tooltip {
            title,
            directed,
            summary,
            sections,
            total: None,
        })
    }

    pub fn edge_tooltip(&self, edge: usize) -> Option<Tooltip> {
        let record = self.graph.edge(edge)?;
        if record.directed {
            let source = self.graph.node(record.source)?;
            let target = self.graph.node(record.target)?;
            return Some(Tooltip {
                title: format!("{} → {}", source.label(), target.label()),
                directed: true,
                summary: vec![format!("Value: {}", format_weight(record.weight))],
                sections: Vec::new(),
                total: None,
            });
        }
        self.pair_tooltip(record.source, record.target)
    }

    /// Both directed weights of a pair, with their sum when the graph is
    /// undirected.
    pub fn pair_tooltip(&self, a: NodeId, b: NodeId) -> Option<Tooltip> {
        let first = self.graph.node(a)?;
        let second = self.graph.node(b)?;
        let matrix = self.graph.directed_matrix();
        let forward = matrix.get(a.index(), b.index());
        let backward = matrix.get(b.index(), a.index());
        let directed = self.graph.is_directed();

        let mut summary = vec![format!(
            "{} → {}: {}",
            first.label(),
            second.label(),
            format_weight(forward)
        )];
        if a != b {
            summary.push(format!(
                "{} → {}: {}",
                second.label(),
                first.label(),
                format_weight(backward)
            ));
        }

        let total = (!directed).then(|| if a == b { forward } else { forward + backward });
        let joiner = if directed { "↔" } else { "–" };
        Some(Tooltip {
            title: format!("{} {joiner} {}", first.label(), second.label()),
            directed,
            summary,
            sections: Vec::new(),
            total,
        })
    }
}
