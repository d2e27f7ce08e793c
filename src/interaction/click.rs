use std::fmt;

use tracing::debug;

use crate::graph::{Node, NodeId, RelationGraph};

/// Identity of a clicked node, enough for the host to build a filter.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct NodeRef {
    pub label: String,
    pub axis: Option<String>,
}

impl NodeRef {
    fn of(node: &Node) -> Self {
        Self {
            label: node.label().to_owned(),
            axis: node.axis().map(str::to_owned),
        }
    }
}

impl fmt::Display for NodeRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.axis {
            Some(axis) => write!(f, "{axis}:{}", self.label),
            None => f.write_str(&self.label),
        }
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct LinkRef {
    pub source: NodeRef,
    pub target: NodeRef,
    pub weight: f64,
    pub directed: bool,
}

impl fmt::Display for LinkRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let arrow = if self.directed { "→" } else { "–" };
        write!(f, "{} {arrow} {}", self.source, self.target)
    }
}

type NodeCallback = Box<dyn FnMut(&NodeRef)>;
type LinkCallback = Box<dyn FnMut(&LinkRef)>;

/// Host callbacks for clicks. An unset callback turns the click into a no-op.
#[derive(Default)]
pub struct ClickDispatcher {
    on_click_node: Option<NodeCallback>,
    on_click_link: Option<LinkCallback>,
}

impl ClickDispatcher {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn on_click_node(mut self, callback: impl FnMut(&NodeRef) + 'static) -> Self {
        self.on_click_node = Some(Box::new(callback));
        self
    }

    pub fn on_click_link(mut self, callback: impl FnMut(&LinkRef) + 'static) -> Self {
        self.on_click_link = Some(Box::new(callback));
        self
    }

    /// Returns whether a callback ran.
    pub fn click_node(&mut self, graph: &RelationGraph, id: NodeId) -> bool {
        let Some(node) = graph.node(id) else {
            return false;
        };
        let node = NodeRef::of(node);
        match self.on_click_node.as_mut() {
            Some(callback) => {
                callback(&node);
                true
            }
            None => {
                debug!(%node, "no node click callback set");
                false
            }
        }
    }

    pub fn click_link(&mut self, graph: &RelationGraph, edge: usize) -> bool {
        let Some(edge) = graph.edge(edge) else {
            return false;
        };
        self.dispatch_link(graph, edge.source, edge.target, edge.weight, edge.directed)
    }

    /// Clicks the pair `(source, target)`, weighted by both directions unless
    /// the graph is directed.
    pub fn click_pair(&mut self, graph: &RelationGraph, source: NodeId, target: NodeId) -> bool {
        let matrix = graph.directed_matrix();
        let forward = matrix.get(source.index(), target.index());
        let weight = if graph.is_directed() || source == target {
            forward
        } else {
            forward + matrix.get(target.index(), source.index())
        };
        self.dispatch_link(graph, source, target, weight, graph.is_directed())
    }

    fn dispatch_link(
        &mut self,
        graph: &RelationGraph,
        source: NodeId,
        target: NodeId,
        weight: f64,
        directed: bool,
    ) -> bool {
        let (Some(source), Some(target)) = (graph.node(source), graph.node(target)) else {
            return false;
        };
        let link = LinkRef {
            source: NodeRef::of(source),
            target: NodeRef::of(target),
            weight,
            directed,
        };
        match self.on_click_link.as_mut() {
            Some(callback) => {
                callback(&link);
                true
            }
            None => {
                debug!(%link, "no link click callback set");
                false
            }
        }
    }
}
