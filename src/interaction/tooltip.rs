use eframe::egui::{Pos2, Rect, Vec2, pos2, vec2};

use crate::config::{TooltipConfig, TooltipMode, TooltipOrientation};
use crate::sort::{SortFields, SortKey, SortValue};
use crate::util::format_weight;

/// Gap between the pointer and a movable tooltip.
const POINTER_GAP: f32 = 14.0;

/// One neighbor of the hovered element, with both directed weights.
#[derive(Clone, Debug, PartialEq)]
pub struct TooltipRow {
    pub label: String,
    pub axis: Option<String>,
    pub outgoing: f64,
    pub incoming: f64,
    pub value: f64,
}

impl TooltipRow {
    pub fn text(&self, directed: bool) -> String {
        if directed {
            format!(
                "{}  → {}  ← {}",
                self.label,
                format_weight(self.outgoing),
                format_weight(self.incoming)
            )
        } else {
            format!("{}  {}", self.label, format_weight(self.value))
        }
    }
}

impl SortFields for TooltipRow {
    fn sort_value(&self, key: SortKey) -> Option<SortValue<'_>> {
        match key {
            SortKey::Label | SortKey::Target => Some(SortValue::Text(&self.label)),
            SortKey::Value => Some(SortValue::Number(self.value)),
            SortKey::Outgoing => Some(SortValue::Number(self.outgoing)),
            SortKey::Incoming => Some(SortValue::Number(self.incoming)),
            SortKey::Axis => Some(SortValue::Text(self.axis.as_deref().unwrap_or(""))),
            SortKey::LinkCount | SortKey::Source => None,
        }
    }
}

#[derive(Clone, Debug, Default, PartialEq)]
pub struct TooltipSection {
    /// Neighbor axis when rows are grouped by axis.
    pub heading: Option<String>,
    pub rows: Vec<TooltipRow>,
}

/// Tooltip payload handed to the drawing backend.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Tooltip {
    pub title: String,
    pub directed: bool,
    /// Plain lines shown under the title, before the sections.
    pub summary: Vec<String>,
    pub sections: Vec<TooltipSection>,
    /// Sum of both directions, for undirected pairs.
    pub total: Option<f64>,
}

impl Tooltip {
    pub fn lines(&self) -> Vec<String> {
        let mut lines = vec![self.title.clone()];
        lines.extend(self.summary.iter().cloned());
        for section in &self.sections {
            if let Some(heading) = &section.heading {
                lines.push(format!("{heading}:"));
            }
            lines.extend(section.rows.iter().map(|row| row.text(self.directed)));
        }
        if let Some(total) = self.total {
            lines.push(format!("Total: {}", format_weight(total)));
        }
        lines
    }
}

/// Top-left corner for a tooltip of `size`, or `None` when tooltips are off.
pub fn place_tooltip(config: &TooltipConfig, pointer: Pos2, size: Vec2, bounds: Rect) -> Option<Pos2> {
    let corner = match config.mode {
        TooltipMode::None => return None,
        TooltipMode::Static => pos2(bounds.right() - size.x - POINTER_GAP, bounds.top() + POINTER_GAP),
        TooltipMode::Movable => {
            let right = pointer + vec2(POINTER_GAP, -size.y * 0.5);
            let left = pointer + vec2(-POINTER_GAP - size.x, -size.y * 0.5);
            let below = pointer + vec2(-size.x * 0.5, POINTER_GAP);
            let above = pointer + vec2(-size.x * 0.5, -POINTER_GAP - size.y);
            match config.orientation {
                TooltipOrientation::Right => right,
                TooltipOrientation::Left => left,
                TooltipOrientation::Bottom => below,
                TooltipOrientation::Top => above,
                TooltipOrientation::Auto => {
                    if right.x + size.x <= bounds.right() {
                        right
                    } else {
                        left
                    }
                }
            }
        }
    };

    let max = (bounds.max - size).max(bounds.min);
    Some(corner.clamp(bounds.min, max))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn config(mode: TooltipMode, orientation: TooltipOrientation) -> TooltipConfig {
        TooltipConfig {
            mode,
            orientation,
            ..TooltipConfig::default()
        }
    }

    fn bounds() -> Rect {
        Rect::from_min_size(Pos2::ZERO, vec2(400.0, 300.0))
    }

    #[test]
    fn hidden_when_disabled() {
        let config = config(TooltipMode::None, TooltipOrientation::Auto);
        assert_eq!(place_tooltip(&config, pos2(10.0, 10.0), vec2(50.0, 20.0), bounds()), None);
    }

    #[test]
    fn auto_flips_near_right_edge() {
        let config = config(TooltipMode::Movable, TooltipOrientation::Auto);
        let size = vec2(100.0, 40.0);
        let near_left = place_tooltip(&config, pos2(50.0, 150.0), size, bounds()).unwrap();
        assert!(near_left.x > 50.0);
        let near_right = place_tooltip(&config, pos2(380.0, 150.0), size, bounds()).unwrap();
        assert!(near_right.x + size.x < 380.0);
    }

    #[test]
    fn static_and_clamped() {
        let config_static = config(TooltipMode::Static, TooltipOrientation::Auto);
        let size = vec2(100.0, 40.0);
        let corner = place_tooltip(&config_static, pos2(0.0, 0.0), size, bounds()).unwrap();
        assert_eq!(corner, pos2(286.0, 14.0));

        let top = config(TooltipMode::Movable, TooltipOrientation::Top);
        let clamped = place_tooltip(&top, pos2(10.0, 5.0), size, bounds()).unwrap();
        assert_eq!(clamped, Pos2::ZERO);
    }

    #[test]
    fn lines_include_total_and_headings() {
        let tooltip = Tooltip {
            title: "A".to_owned(),
            directed: false,
            summary: Vec::new(),
            sections: vec![TooltipSection {
                heading: Some("City".to_owned()),
                rows: vec![TooltipRow {
                    label: "Berlin".to_owned(),
                    axis: Some("City".to_owned()),
                    outgoing: 2.0,
                    incoming: 1.0,
                    value: 3.0,
                }],
            }],
            total: Some(3.0),
        };
        assert_eq!(tooltip.lines(), ["A", "City:", "Berlin  3", "Total: 3"]);
    }
}
