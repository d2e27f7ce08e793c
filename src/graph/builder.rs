use std::collections::HashMap;

use tracing::debug;

use crate::relation::{LinkRole, Relation};

use super::{Edge, Node, NodeId, NodeKey, RelationGraph, WeightMatrix};

/// Turns a flat relation list into a deduplicated [`RelationGraph`].
#[derive(Clone, Debug, Default)]
pub struct RelationGraphBuilder {
    directed: bool,
    keyed_by_axis: bool,
    seed_nodes: Vec<NodeKey>,
}

impl RelationGraphBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn directed(mut self, directed: bool) -> Self {
        self.directed = directed;
        self
    }

    /// Distinguish nodes by `(axis, label)` instead of by label alone.
    pub fn keyed_by_axis(mut self, keyed_by_axis: bool) -> Self {
        self.keyed_by_axis = keyed_by_axis;
        self
    }

    /// Nodes registered before any relation, in order, so they exist even
    /// when no relation mentions them.
    pub fn seed_nodes(mut self, keys: impl IntoIterator<Item = NodeKey>) -> Self {
        self.seed_nodes = keys.into_iter().collect();
        self
    }

    fn key_for(&self, label: &str, axis: Option<&String>) -> NodeKey {
        NodeKey {
            axis: if self.keyed_by_axis { axis.cloned() } else { None },
            label: label.to_owned(),
        }
    }

    pub fn build(&self, relations: &[Relation]) -> RelationGraph {
        let mut keys: Vec<NodeKey> = Vec::new();
        let mut index_by_key: HashMap<NodeKey, NodeId> = HashMap::new();
        let mut intern = |key: NodeKey| -> NodeId {
            if let Some(&id) = index_by_key.get(&key) {
                return id;
            }
            let id = NodeId(keys.len());
            keys.push(key.clone());
            index_by_key.insert(key, id);
            id
        };

        for key in &self.seed_nodes {
            let key = NodeKey {
                axis: if self.keyed_by_axis { key.axis.clone() } else { None },
                label: key.label.clone(),
            };
            intern(key);
        }

        let mut endpoints = Vec::with_capacity(relations.len());
        for relation in relations {
            let source = intern(self.key_for(&relation.source, relation.source_axis.as_ref()));
            let target = intern(self.key_for(&relation.target, relation.target_axis.as_ref()));
            endpoints.push((source, target));
        }

        let node_count = keys.len();
        let mut out_weight = vec![0.0; node_count];
        let mut in_weight = vec![0.0; node_count];
        let mut link_count = vec![0usize; node_count];
        let mut directed_matrix = WeightMatrix::zeros(node_count);
        let mut directed_edges: Vec<Edge> = Vec::new();
        let mut edge_index: HashMap<(NodeId, NodeId, LinkRole), usize> = HashMap::new();

        for (relation, &(source, target)) in relations.iter().zip(&endpoints) {
            out_weight[source.index()] += relation.weight;
            in_weight[target.index()] += relation.weight;
            link_count[source.index()] += 1;
            if target != source {
                link_count[target.index()] += 1;
            }
            directed_matrix.add(source.index(), target.index(), relation.weight);

            match edge_index.get(&(source, target, relation.role)) {
                Some(&index) => directed_edges[index].weight += relation.weight,
                None => {
                    edge_index.insert((source, target, relation.role), directed_edges.len());
                    directed_edges.push(Edge {
                        source,
                        target,
                        weight: relation.weight,
                        directed: true,
                        role: relation.role,
                    });
                }
            }
        }

        let (matrix, edges) = if self.directed {
            (directed_matrix.clone(), directed_edges)
        } else {
            (directed_matrix.to_undirected(), aggregate_undirected(&directed_edges))
        };

        let mut incident = vec![Vec::new(); node_count];
        for (index, edge) in edges.iter().enumerate() {
            incident[edge.source.index()].push(index);
            if edge.target != edge.source {
                incident[edge.target.index()].push(index);
            }
        }

        let nodes = keys
            .into_iter()
            .enumerate()
            .map(|(index, key)| Node {
                id: NodeId(index),
                key,
                out_weight: out_weight[index],
                in_weight: in_weight[index],
                total_weight: out_weight[index] + in_weight[index],
                link_count: link_count[index],
            })
            .collect::<Vec<_>>();

        debug!(
            relations = relations.len(),
            nodes = nodes.len(),
            edges = edges.len(),
            directed = self.directed,
            "built relation graph"
        );

        RelationGraph {
            nodes,
            edges,
            index_by_key,
            directed_matrix,
            matrix,
            incident,
            directed: self.directed,
        }
    }
}

/// Merges edges by unordered node pair (and link role), summing weights.
///
/// Merged edges are normalized to `source <= target` and marked undirected;
/// feeding the output back in yields the same list.
pub fn aggregate_undirected(edges: &[Edge]) -> Vec<Edge> {
    let mut merged: Vec<Edge> = Vec::with_capacity(edges.len());
    let mut index_by_pair: HashMap<(NodeId, NodeId, LinkRole), usize> = HashMap::new();

    for edge in edges {
        let (low, high) = if edge.source <= edge.target {
            (edge.source, edge.target)
        } else {
            (edge.target, edge.source)
        };

        match index_by_pair.get(&(low, high, edge.role)) {
            Some(&index) => merged[index].weight += edge.weight,
            None => {
                index_by_pair.insert((low, high, edge.role), merged.len());
                merged.push(Edge {
                    source: low,
                    target: high,
                    weight: edge.weight,
                    directed: false,
                    role: edge.role,
                });
            }
        }
    }

    merged
}

#[cfg(test)]
mod tests {
    use super::*;

    fn scenario() -> Vec<Relation> {
        vec![
            Relation::new("A", "B", 4.0),
            Relation::new("B", "A", 2.0),
            Relation::new("A", "C", 1.0),
        ]
    }

    #[test]
    fn directed_keeps_opposite_edges_apart() {
        let graph = RelationGraphBuilder::new().directed(true).build(&scenario());
        let labels = graph.nodes().iter().map(Node::label).collect::<Vec<_>>();
        assert_eq!(labels, ["A", "B", "C"]);

        let a = &graph.nodes()[0];
        assert_eq!(a.out_weight, 5.0);
        assert_eq!(a.in_weight, 2.0);
        assert_eq!(a.total_weight, 7.0);
        assert_eq!(a.link_count, 3);

        assert_eq!(graph.edges().len(), 3);
        assert_eq!(graph.edges()[0].weight, 4.0);
        assert_eq!(graph.edges()[1].source, NodeId(1));
        assert_eq!(graph.edges()[1].weight, 2.0);
        assert!(graph.edges().iter().all(|edge| edge.directed));
    }

    #[test]
    fn undirected_merges_pairs() {
        let graph = RelationGraphBuilder::new().directed(false).build(&scenario());
        assert_eq!(graph.edges().len(), 2);
        assert_eq!(graph.edges()[0].source, NodeId(0));
        assert_eq!(graph.edges()[0].target, NodeId(1));
        assert_eq!(graph.edges()[0].weight, 6.0);
        assert_eq!(graph.edges()[1].weight, 1.0);
        assert_eq!(graph.matrix().get(1, 0), 6.0);
        assert_eq!(graph.directed_matrix().get(1, 0), 2.0);
    }

    #[test]
    fn axis_qualifies_identity_only_when_requested() {
        let relations = vec![
            Relation::new("x", "x", 1.0).with_axes("Time", "City"),
            Relation::new("x", "y", 1.0).with_axes("Time", "City"),
        ];
        let plain = RelationGraphBuilder::new().build(&relations);
        assert_eq!(plain.nodes().len(), 2);

        let hive = RelationGraphBuilder::new().keyed_by_axis(true).build(&relations);
        assert_eq!(hive.nodes().len(), 3);
        assert!(hive.node_id(&NodeKey::on_axis("Time", "x")).is_some());
        assert!(hive.node_id(&NodeKey::on_axis("City", "x")).is_some());
    }

    #[test]
    fn zero_weight_relations_keep_their_nodes() {
        let graph = RelationGraphBuilder::new().build(&[Relation::new("A", "B", 0.0)]);
        assert_eq!(graph.nodes().len(), 2);
        assert_eq!(graph.edges().len(), 1);
        assert_eq!(graph.edges()[0].weight, 0.0);
        assert_eq!(graph.incident_edges(NodeId(1)), &[0]);
        assert_eq!(graph.nodes()[1].link_count, 1);
        assert_eq!(graph.total_weight(), 0.0);
    }

    #[test]
    fn seeded_nodes_come_first_and_default_to_zero() {
        let graph = RelationGraphBuilder::new()
            .seed_nodes([NodeKey::label("Z")])
            .build(&[Relation::new("A", "B", 2.0)]);
        assert_eq!(graph.nodes()[0].label(), "Z");
        assert_eq!(graph.nodes()[0].total_weight, 0.0);
        assert_eq!(graph.nodes()[0].link_count, 0);
    }

    #[test]
    fn self_loops_count_once_per_node() {
        let graph = RelationGraphBuilder::new().build(&[Relation::new("A", "A", 3.0)]);
        assert_eq!(graph.nodes()[0].link_count, 1);
        assert_eq!(graph.incident_edges(NodeId(0)), &[0]);
        assert_eq!(graph.matrix().get(0, 0), 3.0);
    }

    #[test]
    fn aggregation_is_idempotent() {
        let graph = RelationGraphBuilder::new().directed(true).build(&scenario());
        let once = aggregate_undirected(graph.edges());
        let twice = aggregate_undirected(&once);
        assert_eq!(once, twice);
    }
}
