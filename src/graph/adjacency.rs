use std::collections::HashSet;

use super::{Edge, NodeId};

/// `(source, target)` membership set built once per layout pass.
///
/// Both directions of every edge are recorded, so lookups are symmetric
/// whether the graph is directed or not.
#[derive(Clone, Debug, Default)]
pub struct AdjacencyIndex {
    linked: HashSet<(usize, usize)>,
}

impl AdjacencyIndex {
    pub fn build(edges: &[Edge]) -> Self {
        let mut linked = HashSet::with_capacity(edges.len() * 2);
        for edge in edges {
            linked.insert((edge.source.index(), edge.target.index()));
            linked.insert((edge.target.index(), edge.source.index()));
        }
        Self { linked }
    }

    pub fn is_connected(&self, a: NodeId, b: NodeId) -> bool {
        a == b || self.linked.contains(&(a.index(), b.index()))
    }

    pub fn len(&self) -> usize {
        self.linked.len()
    }

    pub fn is_empty(&self) -> bool {
        self.linked.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::relation::LinkRole;

    fn edge(source: usize, target: usize) -> Edge {
        Edge {
            source: NodeId(source),
            target: NodeId(target),
            weight: 1.0,
            directed: true,
            role: LinkRole::Positive,
        }
    }

    #[test]
    fn lookups_are_symmetric_and_reflexive() {
        let index = AdjacencyIndex::build(&[edge(0, 1), edge(2, 1)]);
        assert!(index.is_connected(NodeId(0), NodeId(1)));
        assert!(index.is_connected(NodeId(1), NodeId(0)));
        assert!(index.is_connected(NodeId(1), NodeId(2)));
        assert!(!index.is_connected(NodeId(0), NodeId(2)));
        assert!(index.is_connected(NodeId(5), NodeId(5)));
    }
}
