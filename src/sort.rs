use std::cmp::Ordering;

use tracing::debug;

use crate::graph::{Edge, Node, RelationGraph};

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum SortKey {
    Label,
    Value,
    LinkCount,
    Outgoing,
    Incoming,
    Axis,
    Source,
    Target,
}

impl SortKey {
    pub fn parse(value: &str) -> Option<Self> {
        match value.trim().to_ascii_lowercase().as_str() {
            "label" | "name" | "key" | "term" => Some(Self::Label),
            "value" | "count" | "weight" | "size" | "total" => Some(Self::Value),
            "linkcount" | "links" | "link_count" | "degree" => Some(Self::LinkCount),
            "outgoing" | "out" => Some(Self::Outgoing),
            "incoming" | "in" => Some(Self::Incoming),
            "axis" => Some(Self::Axis),
            "source" => Some(Self::Source),
            "target" => Some(Self::Target),
            _ => None,
        }
    }
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum SortOrder {
    #[default]
    Ascending,
    Descending,
}

impl SortOrder {
    pub fn parse(value: &str) -> Option<Self> {
        match value.trim().to_ascii_lowercase().as_str() {
            "asc" | "ascending" => Some(Self::Ascending),
            "desc" | "descending" => Some(Self::Descending),
            _ => None,
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub enum SortValue<'a> {
    Text(&'a str),
    Number(f64),
}

impl SortValue<'_> {
    fn compare(&self, other: &Self) -> Ordering {
        match (self, other) {
            (Self::Text(a), Self::Text(b)) => a.cmp(b),
            (Self::Number(a), Self::Number(b)) => a.total_cmp(b),
            (Self::Number(_), Self::Text(_)) => Ordering::Less,
            (Self::Text(_), Self::Number(_)) => Ordering::Greater,
        }
    }
}

/// Records that expose sortable properties. `None` means the record does not
/// carry the property at all.
pub trait SortFields {
    fn sort_value(&self, key: SortKey) -> Option<SortValue<'_>>;
}

impl SortFields for Node {
    fn sort_value(&self, key: SortKey) -> Option<SortValue<'_>> {
        match key {
            SortKey::Label => Some(SortValue::Text(self.label())),
            SortKey::Value => Some(SortValue::Number(self.total_weight)),
            SortKey::LinkCount => Some(SortValue::Number(self.link_count as f64)),
            SortKey::Outgoing => Some(SortValue::Number(self.out_weight)),
            SortKey::Incoming => Some(SortValue::Number(self.in_weight)),
            SortKey::Axis => Some(SortValue::Text(self.axis().unwrap_or(""))),
            SortKey::Source | SortKey::Target => None,
        }
    }
}

/// An edge viewed together with the graph that owns its endpoints.
#[derive(Clone, Copy, Debug)]
pub struct EdgeView<'a> {
    pub graph: &'a RelationGraph,
    pub edge: &'a Edge,
}

impl SortFields for EdgeView<'_> {
    fn sort_value(&self, key: SortKey) -> Option<SortValue<'_>> {
        let label_of = |id| self.graph.node(id).map(Node::label).unwrap_or("");
        match key {
            SortKey::Value => Some(SortValue::Number(self.edge.weight)),
            SortKey::Source | SortKey::Label => Some(SortValue::Text(label_of(self.edge.source))),
            SortKey::Target => Some(SortValue::Text(label_of(self.edge.target))),
            _ => None,
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct SortPolicy {
    pub key: SortKey,
    pub order: SortOrder,
}

impl Default for SortPolicy {
    fn default() -> Self {
        Self {
            key: SortKey::Label,
            order: SortOrder::Ascending,
        }
    }
}

impl SortPolicy {
    pub fn new(key: SortKey, order: SortOrder) -> Self {
        Self { key, order }
    }

    /// Stable sort into a new vector; input order breaks ties.
    ///
    /// If any record lacks the key the input is returned unchanged.
    pub fn apply<T: SortFields + Clone>(&self, items: &[T]) -> Vec<T> {
        let mut indices = (0..items.len()).collect::<Vec<_>>();
        if !self.sort_indices(items, &mut indices) {
            return items.to_vec();
        }
        indices.into_iter().map(|index| items[index].clone()).collect()
    }

    /// Sorts `indices` (positions into `items`) in place. Returns false and
    /// leaves them untouched when some record lacks the key.
    pub fn sort_indices<T: SortFields>(&self, items: &[T], indices: &mut [usize]) -> bool {
        if indices
            .iter()
            .any(|&index| items.get(index).and_then(|item| item.sort_value(self.key)).is_none())
        {
            debug!(key = ?self.key, "sort key unsupported for these records; keeping input order");
            return false;
        }

        indices.sort_by(|&a, &b| {
            let (Some(left), Some(right)) = (items[a].sort_value(self.key), items[b].sort_value(self.key))
            else {
                return Ordering::Equal;
            };
            match self.order {
                SortOrder::Ascending => left.compare(&right),
                SortOrder::Descending => right.compare(&left),
            }
        });
        true
    }
}

/// Sorts by a property given by name; unknown names keep the input order.
pub fn sort_by_property<T: SortFields + Clone>(items: &[T], property: &str, order: SortOrder) -> Vec<T> {
    match SortKey::parse(property) {
        Some(key) => SortPolicy::new(key, order).apply(items),
        None => {
            debug!(property, "unknown sort property; keeping input order");
            items.to_vec()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::graph::RelationGraphBuilder;
    use crate::relation::Relation;

    #[derive(Clone, Debug, PartialEq)]
    struct Row {
        name: &'static str,
        score: f64,
    }

    impl SortFields for Row {
        fn sort_value(&self, key: SortKey) -> Option<SortValue<'_>> {
            match key {
                SortKey::Label => Some(SortValue::Text(self.name)),
                SortKey::Value => Some(SortValue::Number(self.score)),
                _ => None,
            }
        }
    }

    fn rows() -> Vec<Row> {
        vec![
            Row { name: "b", score: 2.0 },
            Row { name: "a", score: 1.0 },
            Row { name: "c", score: 2.0 },
            Row { name: "d", score: 1.0 },
        ]
    }

    #[test]
    fn ties_keep_input_order() {
        let sorted = sort_by_property(&rows(), "value", SortOrder::Ascending);
        let names = sorted.iter().map(|row| row.name).collect::<Vec<_>>();
        assert_eq!(names, ["a", "d", "b", "c"]);

        let sorted = sort_by_property(&rows(), "value", SortOrder::Descending);
        let names = sorted.iter().map(|row| row.name).collect::<Vec<_>>();
        assert_eq!(names, ["b", "c", "a", "d"]);
    }

    #[test]
    fn unknown_or_unsupported_property_keeps_order() {
        assert_eq!(sort_by_property(&rows(), "colour", SortOrder::Descending), rows());
        assert_eq!(sort_by_property(&rows(), "axis", SortOrder::Ascending), rows());
    }

    #[test]
    fn sorts_nodes_and_edges() {
        let graph = RelationGraphBuilder::new().directed(true).build(&[
            Relation::new("b", "a", 1.0),
            Relation::new("c", "a", 5.0),
        ]);
        let nodes = SortPolicy::new(SortKey::Label, SortOrder::Ascending).apply(graph.nodes());
        let labels = nodes.iter().map(Node::label).collect::<Vec<_>>();
        assert_eq!(labels, ["a", "b", "c"]);

        let views = graph
            .edges()
            .iter()
            .map(|edge| EdgeView { graph: &graph, edge })
            .collect::<Vec<_>>();
        let sorted = SortPolicy::new(SortKey::Value, SortOrder::Descending).apply(&views);
        assert_eq!(sorted[0].edge.weight, 5.0);
        let unchanged = SortPolicy::new(SortKey::LinkCount, SortOrder::Descending).apply(&views);
        assert_eq!(unchanged[0].edge.weight, 1.0);
    }
}
