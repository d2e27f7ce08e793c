mod adjacency;
mod builder;
mod matrix;

use std::collections::HashMap;

use crate::relation::LinkRole;

pub use adjacency::AdjacencyIndex;
pub use builder::{RelationGraphBuilder, aggregate_undirected};
pub use matrix::WeightMatrix;

/// Index into the node table of a [`RelationGraph`]; stable for one render pass.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NodeId(pub usize);

impl NodeId {
    pub fn index(self) -> usize {
        self.0
    }
}

/// Node identity: the label, qualified by its axis when building hive graphs.
#[derive(Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NodeKey {
    pub axis: Option<String>,
    pub label: String,
}

impl NodeKey {
    pub fn label(label: impl Into<String>) -> Self {
        Self {
            axis: None,
            label: label.into(),
        }
    }

    pub fn on_axis(axis: impl Into<String>, label: impl Into<String>) -> Self {
        Self {
            axis: Some(axis.into()),
            label: label.into(),
        }
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct Node {
    pub id: NodeId,
    pub key: NodeKey,
    pub out_weight: f64,
    pub in_weight: f64,
    pub total_weight: f64,
    pub link_count: usize,
}

impl Node {
    pub fn label(&self) -> &str {
        &self.key.label
    }

    pub fn axis(&self) -> Option<&str> {
        self.key.axis.as_deref()
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct Edge {
    pub source: NodeId,
    pub target: NodeId,
    pub weight: f64,
    pub directed: bool,
    pub role: LinkRole,
}

impl Edge {
    pub fn touches(&self, node: NodeId) -> bool {
        self.source == node || self.target == node
    }

    /// The endpoint opposite `node`, if the edge touches it.
    pub fn other(&self, node: NodeId) -> Option<NodeId> {
        if self.source == node {
            Some(self.target)
        } else if self.target == node {
            Some(self.source)
        } else {
            None
        }
    }
}

/// Immutable node/edge snapshot produced once per render pass.
#[derive(Clone, Debug)]
pub struct RelationGraph {
    nodes: Vec<Node>,
    edges: Vec<Edge>,
    index_by_key: HashMap<NodeKey, NodeId>,
    directed_matrix: WeightMatrix,
    matrix: WeightMatrix,
    incident: Vec<Vec<usize>>,
    directed: bool,
}

impl RelationGraph {
    pub fn empty(directed: bool) -> Self {
        Self {
            nodes: Vec::new(),
            edges: Vec::new(),
            index_by_key: HashMap::new(),
            directed_matrix: WeightMatrix::zeros(0),
            matrix: WeightMatrix::zeros(0),
            incident: Vec::new(),
            directed,
        }
    }

    pub fn nodes(&self) -> &[Node] {
        &self.nodes
    }

    pub fn edges(&self) -> &[Edge] {
        &self.edges
    }

    pub fn node(&self, id: NodeId) -> Option<&Node> {
        self.nodes.get(id.index())
    }

    pub fn edge(&self, index: usize) -> Option<&Edge> {
        self.edges.get(index)
    }

    pub fn node_id(&self, key: &NodeKey) -> Option<NodeId> {
        self.index_by_key.get(key).copied()
    }

    pub fn is_directed(&self) -> bool {
        self.directed
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Weight matrix after the directed/undirected policy was applied.
    pub fn matrix(&self) -> &WeightMatrix {
        &self.matrix
    }

    /// Raw `source -> target` sums, regardless of the aggregation policy.
    pub fn directed_matrix(&self) -> &WeightMatrix {
        &self.directed_matrix
    }

    /// Indices into [`Self::edges`] of every edge touching `node`.
    pub fn incident_edges(&self, node: NodeId) -> &[usize] {
        self.incident
            .get(node.index())
            .map(Vec::as_slice)
            .unwrap_or(&[])
    }

    pub fn total_weight(&self) -> f64 {
        self.edges.iter().map(|edge| edge.weight).sum()
    }

    pub fn adjacency(&self) -> AdjacencyIndex {
        AdjacencyIndex::build(&self.edges)
    }
}
