mod parse;
mod record;
mod split;

pub use parse::{load_relations, parse_relations};
pub use record::{LinkRole, Relation};
pub use split::LabelSplitter;
