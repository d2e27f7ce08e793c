/// Which side of an axis a same-axis hive link bulges towards.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum LinkRole {
    #[default]
    Positive,
    Negative,
}

impl LinkRole {
    pub fn parse(value: &str) -> Option<Self> {
        match value.trim().to_ascii_lowercase().as_str() {
            "positive" | "pos" | "+" => Some(Self::Positive),
            "negative" | "neg" | "-" => Some(Self::Negative),
            _ => None,
        }
    }

    pub fn sign(self) -> f32 {
        match self {
            Self::Positive => 1.0,
            Self::Negative => -1.0,
        }
    }
}

/// A single weighted, directed relation as delivered by the query layer.
#[derive(Clone, Debug, PartialEq)]
pub struct Relation {
    pub source: String,
    pub target: String,
    pub source_axis: Option<String>,
    pub target_axis: Option<String>,
    pub weight: f64,
    pub role: LinkRole,
}

impl Relation {
    pub fn new(source: impl Into<String>, target: impl Into<String>, weight: f64) -> Self {
        Self {
            source: source.into(),
            target: target.into(),
            source_axis: None,
            target_axis: None,
            weight,
            role: LinkRole::Positive,
        }
    }

    pub fn with_axes(mut self, source_axis: impl Into<String>, target_axis: impl Into<String>) -> Self {
        self.source_axis = Some(source_axis.into());
        self.target_axis = Some(target_axis.into());
        self
    }

    pub fn with_role(mut self, role: LinkRole) -> Self {
        self.role = role;
        self
    }
}
