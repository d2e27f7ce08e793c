use std::fs;
use std::path::Path;

use anyhow::{Context, Result, anyhow};
use serde::Deserialize;
use serde_json::Value;
use tracing::warn;

use super::{LabelSplitter, LinkRole, Relation};

#[derive(Clone, Debug, Deserialize)]
struct RawRelation {
    #[serde(default)]
    source: Option<String>,
    #[serde(default)]
    target: Option<String>,
    #[serde(default, alias = "count", alias = "weight")]
    value: Option<f64>,
    #[serde(default, rename = "sourceAxis")]
    source_axis: Option<String>,
    #[serde(default, rename = "targetAxis")]
    target_axis: Option<String>,
    #[serde(default, rename = "type")]
    role: Option<String>,
}

#[derive(Clone, Debug, Deserialize)]
struct RawTerm {
    #[serde(default)]
    term: Option<String>,
    #[serde(default)]
    count: Option<f64>,
}

impl RawRelation {
    fn into_relation(self, position: usize) -> Relation {
        let source = self.source.unwrap_or_else(|| {
            warn!(position, "relation record has no source; using an empty label");
            String::new()
        });
        let target = self.target.unwrap_or_else(|| {
            warn!(position, "relation record has no target; using an empty label");
            String::new()
        });
        let weight = match self.value {
            Some(value) if value.is_finite() => value,
            _ => {
                warn!(position, "relation record has no usable value; using 0");
                0.0
            }
        };
        let role = match self.role.as_deref() {
            None => LinkRole::default(),
            Some(raw) => LinkRole::parse(raw).unwrap_or_else(|| {
                warn!(position, role = raw, "unknown relation type; using positive");
                LinkRole::default()
            }),
        };

        Relation {
            source,
            target,
            source_axis: self.source_axis,
            target_axis: self.target_axis,
            weight,
            role,
        }
    }
}

/// Parses relation records from JSON.
///
/// Accepts either an array of `{source, target, value}` records or a terms
/// facet object `{"terms": [{"term": "A-B", "count": 4}]}` whose composite
/// terms are split with `splitter`.
pub fn parse_relations(raw: &str, splitter: &LabelSplitter) -> Result<Vec<Relation>> {
    let parsed: Value = serde_json::from_str(raw).context("invalid relation JSON")?;

    if let Some(items) = parsed.as_array() {
        let mut relations = Vec::with_capacity(items.len());
        for (position, item) in items.iter().enumerate() {
            let record = RawRelation::deserialize(item)
                .with_context(|| format!("invalid relation record at index {position}"))?;
            relations.push(record.into_relation(position));
        }
        return Ok(relations);
    }

    let object = parsed
        .as_object()
        .ok_or_else(|| anyhow!("expected a JSON array of relations or a terms object"))?;
    let terms = object
        .get("terms")
        .and_then(Value::as_array)
        .ok_or_else(|| anyhow!("relation object has no \"terms\" array"))?;

    let mut relations = Vec::with_capacity(terms.len());
    for (position, item) in terms.iter().enumerate() {
        let term = RawTerm::deserialize(item)
            .with_context(|| format!("invalid terms entry at index {position}"))?;
        let label = term.term.unwrap_or_else(|| {
            warn!(position, "terms entry has no term; using an empty label");
            String::new()
        });
        let count = term.count.filter(|count| count.is_finite()).unwrap_or(0.0);
        relations.push(splitter.relation(&label, count));
    }

    Ok(relations)
}

pub fn load_relations(path: &Path, splitter: &LabelSplitter) -> Result<Vec<Relation>> {
    let raw = fs::read_to_string(path)
        .with_context(|| format!("failed to read relation file {}", path.display()))?;
    parse_relations(&raw, splitter)
        .with_context(|| format!("failed to parse relation file {}", path.display()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_record_array() {
        let raw = r#"[
            {"source": "A", "target": "B", "value": 4},
            {"source": "B", "target": "A", "count": 2, "type": "negative",
             "sourceAxis": "Time", "targetAxis": "City"}
        ]"#;
        let relations = parse_relations(raw, &LabelSplitter::default()).unwrap();
        assert_eq!(relations.len(), 2);
        assert_eq!(relations[0], Relation::new("A", "B", 4.0));
        assert_eq!(relations[1].role, LinkRole::Negative);
        assert_eq!(relations[1].source_axis.as_deref(), Some("Time"));
        assert_eq!(relations[1].weight, 2.0);
    }

    #[test]
    fn missing_fields_degrade_to_placeholders() {
        let raw = r#"[{"target": "B"}]"#;
        let relations = parse_relations(raw, &LabelSplitter::default()).unwrap();
        assert_eq!(relations, vec![Relation::new("", "B", 0.0)]);
    }

    #[test]
    fn parses_terms_facet() {
        let raw = r#"{"terms": [{"term": "A-B", "count": 3}, {"term": "C", "count": 1}]}"#;
        let relations = parse_relations(raw, &LabelSplitter::new("-")).unwrap();
        assert_eq!(relations[0], Relation::new("A", "B", 3.0));
        assert_eq!(relations[1], Relation::new("C", "", 1.0));
    }

    #[test]
    fn rejects_unexpected_shapes() {
        assert!(parse_relations("42", &LabelSplitter::default()).is_err());
        assert!(parse_relations("{\"rows\": []}", &LabelSplitter::default()).is_err());
        assert!(parse_relations("not json", &LabelSplitter::default()).is_err());
    }
}
