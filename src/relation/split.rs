use tracing::warn;

use super::Relation;

/// Splits pre-concatenated `"source<sep>target"` labels.
///
/// The first occurrence of the separator splits the label, so `"A-B-C"` with
/// `"-"` becomes `("A", "B-C")`. A label without the separator keeps the whole
/// string as the source and yields an empty placeholder target.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct LabelSplitter {
    separator: String,
}

impl Default for LabelSplitter {
    fn default() -> Self {
        Self::new("-")
    }
}

impl LabelSplitter {
    pub fn new(separator: impl Into<String>) -> Self {
        Self {
            separator: separator.into(),
        }
    }

    pub fn separator(&self) -> &str {
        &self.separator
    }

    pub fn split(&self, composite: &str) -> (String, String) {
        if !self.separator.is_empty()
            && let Some((source, target)) = composite.split_once(self.separator.as_str())
        {
            return (source.trim().to_owned(), target.trim().to_owned());
        }

        warn!(
            label = composite,
            separator = self.separator.as_str(),
            "composite label has no separator; using it as source with an empty target"
        );
        (composite.trim().to_owned(), String::new())
    }

    pub fn relation(&self, composite: &str, weight: f64) -> Relation {
        let (source, target) = self.split(composite);
        Relation::new(source, target, weight)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn splits_on_first_separator() {
        let splitter = LabelSplitter::new("-");
        assert_eq!(splitter.split("A-B"), ("A".to_owned(), "B".to_owned()));
        assert_eq!(splitter.split("A-B-C"), ("A".to_owned(), "B-C".to_owned()));
    }

    #[test]
    fn multi_character_separator() {
        let splitter = LabelSplitter::new(" -> ");
        assert_eq!(
            splitter.split("Berlin -> Paris"),
            ("Berlin".to_owned(), "Paris".to_owned())
        );
    }

    #[test]
    fn unsplittable_label_becomes_source_with_placeholder_target() {
        let splitter = LabelSplitter::new("-");
        assert_eq!(splitter.split("lonely"), ("lonely".to_owned(), String::new()));
        assert_eq!(
            LabelSplitter::new("").split("A-B"),
            ("A-B".to_owned(), String::new())
        );
    }

    #[test]
    fn relation_keeps_weight() {
        let relation = LabelSplitter::default().relation("x-y", 7.0);
        assert_eq!(relation, Relation::new("x", "y", 7.0));
    }
}
