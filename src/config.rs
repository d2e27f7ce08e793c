use std::fs;
use std::path::Path;

use anyhow::{Context, Result};
use eframe::egui::Color32;
use serde::Deserialize;
use serde_json::Value;
use tracing::warn;

use crate::color::{ColorCode, parse_palette};
use crate::graph::NodeKey;
use crate::sort::{SortKey, SortOrder, SortPolicy};

/// Which aggregate sizes chord segments and network nodes.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum SizeMode {
    #[default]
    Outgoing,
    Incoming,
}

impl SizeMode {
    pub fn parse(value: &str) -> Option<Self> {
        match value.trim().to_ascii_lowercase().as_str() {
            "outgoing" | "out" | "source" => Some(Self::Outgoing),
            "incoming" | "in" | "target" => Some(Self::Incoming),
            _ => None,
        }
    }
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum TooltipMode {
    None,
    #[default]
    Movable,
    Static,
}

impl TooltipMode {
    pub fn parse(value: &str) -> Option<Self> {
        match value.trim().to_ascii_lowercase().as_str() {
            "none" | "off" | "false" | "hidden" => Some(Self::None),
            "movable" | "moving" | "follow" | "true" | "on" => Some(Self::Movable),
            "static" | "fixed" => Some(Self::Static),
            _ => None,
        }
    }
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum TooltipOrientation {
    #[default]
    Auto,
    Left,
    Right,
    Top,
    Bottom,
}

impl TooltipOrientation {
    pub fn parse(value: &str) -> Option<Self> {
        match value.trim().to_ascii_lowercase().as_str() {
            "auto" => Some(Self::Auto),
            "left" | "w" | "west" => Some(Self::Left),
            "right" | "e" | "east" => Some(Self::Right),
            "top" | "n" | "north" => Some(Self::Top),
            "bottom" | "s" | "south" => Some(Self::Bottom),
            _ => None,
        }
    }
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct TooltipConfig {
    pub sort: SortPolicy,
    pub mode: TooltipMode,
    pub orientation: TooltipOrientation,
}

pub const DEFAULT_FADE_OPACITY: f32 = 0.1;

#[derive(Clone, Debug, PartialEq)]
pub struct ChordConfig {
    pub segment_size: SizeMode,
    pub directed: bool,
    /// Segment order around the circle; `None` keeps first-seen order.
    pub sorting: Option<SortPolicy>,
    pub tooltip: TooltipConfig,
    /// Approximate tick count around the whole circle; auto when unset.
    pub number_of_ticks: Option<usize>,
    /// Label every n-th tick; auto when unset.
    pub ticks_label: Option<usize>,
    pub colors: Vec<Color32>,
    pub padding: f32,
    pub fade_opacity: f32,
}

impl Default for ChordConfig {
    fn default() -> Self {
        Self {
            segment_size: SizeMode::Outgoing,
            directed: true,
            sorting: None,
            tooltip: TooltipConfig::default(),
            number_of_ticks: None,
            ticks_label: None,
            colors: Vec::new(),
            padding: 0.05,
            fade_opacity: DEFAULT_FADE_OPACITY,
        }
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct AxisConfig {
    pub axis: String,
    pub sort: SortPolicy,
}

#[derive(Clone, Debug, PartialEq)]
pub struct HiveConfig {
    pub color_code: ColorCode,
    pub axes: Vec<AxisConfig>,
    /// Full node list supplied by the caller; nodes are re-bound to it.
    pub nodes: Option<Vec<NodeKey>>,
    pub tooltip: TooltipConfig,
    pub inner_radius: f32,
    pub outer_radius: f32,
    pub fade_opacity: f32,
}

impl Default for HiveConfig {
    fn default() -> Self {
        Self {
            color_code: ColorCode::Colored,
            axes: Vec::new(),
            nodes: None,
            tooltip: TooltipConfig::default(),
            inner_radius: 40.0,
            outer_radius: 240.0,
            fade_opacity: DEFAULT_FADE_OPACITY,
        }
    }
}

impl HiveConfig {
    pub fn axis_sort(&self, axis: &str) -> SortPolicy {
        self.axes
            .iter()
            .find(|config| config.axis == axis)
            .map(|config| config.sort)
            .unwrap_or_default()
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct NetworkConfig {
    /// Negative values repel.
    pub charge: f32,
    pub link_distance: f32,
    pub gravity: f32,
    pub color_code: ColorCode,
    pub node_size: SizeMode,
    pub directed: bool,
    pub tooltip: TooltipConfig,
    pub width: f32,
    pub height: f32,
    pub fade_opacity: f32,
}

impl Default for NetworkConfig {
    fn default() -> Self {
        Self {
            charge: -120.0,
            link_distance: 100.0,
            gravity: 0.1,
            color_code: ColorCode::Colored,
            node_size: SizeMode::Outgoing,
            directed: true,
            tooltip: TooltipConfig::default(),
            width: 960.0,
            height: 640.0,
            fade_opacity: 0.15,
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum LayoutKind {
    Chord,
    Hive,
    Network,
}

impl LayoutKind {
    pub fn parse(value: &str) -> Option<Self> {
        match value.trim().to_ascii_lowercase().as_str() {
            "chord" => Some(Self::Chord),
            "hive" => Some(Self::Hive),
            "network" | "force" => Some(Self::Network),
            _ => None,
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Self::Chord => "chord",
            Self::Hive => "hive",
            Self::Network => "network",
        }
    }
}

#[derive(Clone, Debug, PartialEq)]
pub enum PanelConfig {
    Chord(ChordConfig),
    Hive(HiveConfig),
    Network(NetworkConfig),
}

impl PanelConfig {
    pub fn default_for(kind: LayoutKind) -> Self {
        match kind {
            LayoutKind::Chord => Self::Chord(ChordConfig::default()),
            LayoutKind::Hive => Self::Hive(HiveConfig::default()),
            LayoutKind::Network => Self::Network(NetworkConfig::default()),
        }
    }

    pub fn kind(&self) -> LayoutKind {
        match self {
            Self::Chord(_) => LayoutKind::Chord,
            Self::Hive(_) => LayoutKind::Hive,
            Self::Network(_) => LayoutKind::Network,
        }
    }

    pub fn tooltip(&self) -> TooltipConfig {
        match self {
            Self::Chord(config) => config.tooltip,
            Self::Hive(config) => config.tooltip,
            Self::Network(config) => config.tooltip,
        }
    }

    pub fn tooltip_mut(&mut self) -> &mut TooltipConfig {
        match self {
            Self::Chord(config) => &mut config.tooltip,
            Self::Hive(config) => &mut config.tooltip,
            Self::Network(config) => &mut config.tooltip,
        }
    }

    pub fn fade_opacity(&self) -> f32 {
        match self {
            Self::Chord(config) => config.fade_opacity,
            Self::Hive(config) => config.fade_opacity,
            Self::Network(config) => config.fade_opacity,
        }
    }

    pub fn from_json_str(raw: &str) -> Result<Self> {
        let raw: RawPanelConfig = serde_json::from_str(raw).context("invalid panel configuration JSON")?;
        Ok(Self::from_raw(raw))
    }

    pub fn load(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path)
            .with_context(|| format!("failed to read panel configuration {}", path.display()))?;
        Self::from_json_str(&content)
            .with_context(|| format!("failed to parse panel configuration {}", path.display()))
    }

    fn from_raw(raw: RawPanelConfig) -> Self {
        match raw {
            RawPanelConfig::Chord(raw) => Self::Chord(ChordConfig::from_raw(raw)),
            RawPanelConfig::Hive(raw) => Self::Hive(HiveConfig::from_raw(raw)),
            RawPanelConfig::Network(raw) => Self::Network(NetworkConfig::from_raw(raw)),
        }
    }
}

#[derive(Debug, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
enum RawPanelConfig {
    Chord(RawChordConfig),
    Hive(RawHiveConfig),
    #[serde(alias = "force")]
    Network(RawNetworkConfig),
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
struct RawTooltip {
    sorting_tooltip: Option<String>,
    sorting_order_tooltip: Option<String>,
    tooltip_setting: Option<Value>,
    tooltip_orientation: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct RawChordConfig {
    segment_size: Option<String>,
    directed: Option<Value>,
    sorting: Option<String>,
    sorting_order: Option<String>,
    #[serde(flatten)]
    tooltip: RawTooltip,
    number_of_ticks: Option<Value>,
    ticks_label: Option<Value>,
    colors: Option<Vec<String>>,
    padding: Option<Value>,
    fade_opacity: Option<Value>,
}

#[derive(Debug, Deserialize)]
struct RawAxisConfig {
    axis: String,
    sort: Option<String>,
    order: Option<String>,
}

#[derive(Debug, Deserialize)]
struct RawNodeRef {
    axis: Option<String>,
    label: String,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct RawHiveConfig {
    colorcode: Option<String>,
    #[serde(default)]
    axis_config: Vec<RawAxisConfig>,
    nodes: Option<Vec<RawNodeRef>>,
    #[serde(flatten)]
    tooltip: RawTooltip,
    inner_radius: Option<Value>,
    outer_radius: Option<Value>,
    fade_opacity: Option<Value>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct RawNetworkConfig {
    charge: Option<Value>,
    link_distance: Option<Value>,
    gravity: Option<Value>,
    colorcode: Option<String>,
    node_size: Option<String>,
    directed: Option<Value>,
    #[serde(flatten)]
    tooltip: RawTooltip,
    width: Option<Value>,
    height: Option<Value>,
    fade_opacity: Option<Value>,
}

/// Reads a number written either as a JSON number or as a numeric string.
fn number_value(field: &str, raw: Option<&Value>) -> Option<f64> {
    match raw? {
        Value::Null => None,
        Value::Number(number) => number.as_f64(),
        Value::String(text) => text.trim().parse::<f64>().ok().or_else(|| {
            warn!(field, value = text.as_str(), "expected a number; using the default");
            None
        }),
        other => {
            warn!(field, value = %other, "expected a number; using the default");
            None
        }
    }
}

fn float_value(field: &str, raw: Option<&Value>) -> Option<f32> {
    number_value(field, raw).map(|value| value as f32)
}

/// Reads a flag written either as a JSON boolean or as `"true"`/`"false"`.
fn flag_value(field: &str, raw: Option<&Value>) -> Option<bool> {
    match raw? {
        Value::Null => None,
        Value::Bool(flag) => Some(*flag),
        Value::String(text) => match text.trim().to_ascii_lowercase().as_str() {
            "true" => Some(true),
            "false" => Some(false),
            _ => {
                warn!(field, value = text.as_str(), "expected true or false; using the default");
                None
            }
        },
        other => {
            warn!(field, value = %other, "expected true or false; using the default");
            None
        }
    }
}

fn parse_or_default<T: Copy>(field: &str, raw: Option<&str>, parse: fn(&str) -> Option<T>, default: T) -> T {
    match raw {
        None => default,
        Some(value) => parse(value).unwrap_or_else(|| {
            warn!(field, value, "unrecognized option value; using the default");
            default
        }),
    }
}

fn positive_or_default(field: &str, raw: Option<&Value>, default: f32) -> f32 {
    match float_value(field, raw) {
        None => default,
        Some(value) if value.is_finite() && value > 0.0 => value,
        Some(value) => {
            warn!(field, value, "option must be a positive number; using the default");
            default
        }
    }
}

fn opacity_or_default(raw: Option<&Value>, default: f32) -> f32 {
    match float_value("fadeOpacity", raw) {
        Some(value) if value.is_finite() => value.clamp(0.0, 1.0),
        _ => default,
    }
}

fn count_option(field: &str, raw: Option<f64>) -> Option<usize> {
    match raw {
        None => None,
        Some(value) if value.is_finite() && value >= 1.0 => Some(value.round() as usize),
        Some(value) => {
            warn!(field, value, "option must be at least 1; computing it automatically");
            None
        }
    }
}

fn sort_policy(field: &str, key: Option<&str>, order: Option<&str>) -> Option<SortPolicy> {
    let key = key.and_then(|value| {
        let parsed = SortKey::parse(value);
        if parsed.is_none() {
            warn!(field, value, "unrecognized sort key; using the default");
        }
        parsed
    })?;
    let order = parse_or_default(field, order, SortOrder::parse, SortOrder::Ascending);
    Some(SortPolicy::new(key, order))
}

impl RawTooltip {
    fn into_config(self) -> TooltipConfig {
        let sort = sort_policy(
            "sortingTooltip",
            self.sorting_tooltip.as_deref(),
            self.sorting_order_tooltip.as_deref(),
        )
        .unwrap_or_default();

        let mode = match &self.tooltip_setting {
            None | Some(Value::Null) => TooltipMode::default(),
            Some(Value::Bool(true)) => TooltipMode::Movable,
            Some(Value::Bool(false)) => TooltipMode::None,
            Some(Value::String(value)) => parse_or_default(
                "tooltipSetting",
                Some(value.as_str()),
                TooltipMode::parse,
                TooltipMode::default(),
            ),
            Some(other) => {
                warn!(value = %other, "unrecognized tooltipSetting; using the default");
                TooltipMode::default()
            }
        };

        let orientation = parse_or_default(
            "tooltipOrientation",
            self.tooltip_orientation.as_deref(),
            TooltipOrientation::parse,
            TooltipOrientation::default(),
        );

        TooltipConfig {
            sort,
            mode,
            orientation,
        }
    }
}

impl ChordConfig {
    fn from_raw(raw: RawChordConfig) -> Self {
        let defaults = Self::default();
        Self {
            segment_size: parse_or_default(
                "segmentSize",
                raw.segment_size.as_deref(),
                SizeMode::parse,
                defaults.segment_size,
            ),
            directed: flag_value("directed", raw.directed.as_ref()).unwrap_or(defaults.directed),
            sorting: sort_policy("sorting", raw.sorting.as_deref(), raw.sorting_order.as_deref()),
            tooltip: raw.tooltip.into_config(),
            number_of_ticks: count_option(
                "numberOfTicks",
                number_value("numberOfTicks", raw.number_of_ticks.as_ref()),
            ),
            ticks_label: count_option("ticksLabel", number_value("ticksLabel", raw.ticks_label.as_ref())),
            colors: raw.colors.as_deref().map(parse_palette).unwrap_or_default(),
            padding: match float_value("padding", raw.padding.as_ref()) {
                Some(value) if value.is_finite() && value >= 0.0 => value,
                Some(value) => {
                    warn!(value, "padding must be non-negative; using the default");
                    defaults.padding
                }
                None => defaults.padding,
            },
            fade_opacity: opacity_or_default(raw.fade_opacity.as_ref(), defaults.fade_opacity),
        }
    }
}

impl HiveConfig {
    fn from_raw(raw: RawHiveConfig) -> Self {
        let defaults = Self::default();
        let axes = raw
            .axis_config
            .into_iter()
            .map(|axis| AxisConfig {
                sort: sort_policy("axisConfig.sort", axis.sort.as_deref(), axis.order.as_deref())
                    .or_else(|| {
                        axis.order.as_deref().map(|order| SortPolicy {
                            order: parse_or_default(
                                "axisConfig.order",
                                Some(order),
                                SortOrder::parse,
                                SortOrder::Ascending,
                            ),
                            ..SortPolicy::default()
                        })
                    })
                    .unwrap_or_default(),
                axis: axis.axis,
            })
            .collect();

        let inner_radius = positive_or_default("innerRadius", raw.inner_radius.as_ref(), defaults.inner_radius);
        let mut outer_radius = positive_or_default("outerRadius", raw.outer_radius.as_ref(), defaults.outer_radius);
        if outer_radius <= inner_radius {
            warn!(inner_radius, outer_radius, "outerRadius must exceed innerRadius; widening it");
            outer_radius = inner_radius + (defaults.outer_radius - defaults.inner_radius);
        }

        Self {
            color_code: parse_or_default(
                "colorcode",
                raw.colorcode.as_deref(),
                ColorCode::parse,
                defaults.color_code,
            ),
            axes,
            nodes: raw.nodes.map(|nodes| {
                nodes
                    .into_iter()
                    .map(|node| NodeKey {
                        axis: node.axis,
                        label: node.label,
                    })
                    .collect()
            }),
            tooltip: raw.tooltip.into_config(),
            inner_radius,
            outer_radius,
            fade_opacity: opacity_or_default(raw.fade_opacity.as_ref(), defaults.fade_opacity),
        }
    }
}

impl NetworkConfig {
    fn from_raw(raw: RawNetworkConfig) -> Self {
        let defaults = Self::default();
        Self {
            charge: float_value("charge", raw.charge.as_ref())
                .filter(|value| value.is_finite())
                .unwrap_or(defaults.charge),
            link_distance: positive_or_default("linkDistance", raw.link_distance.as_ref(), defaults.link_distance),
            gravity: match float_value("gravity", raw.gravity.as_ref()) {
                Some(value) if value.is_finite() && value >= 0.0 => value,
                Some(value) => {
                    warn!(value, "gravity must be non-negative; using the default");
                    defaults.gravity
                }
                None => defaults.gravity,
            },
            color_code: parse_or_default(
                "colorcode",
                raw.colorcode.as_deref(),
                ColorCode::parse,
                defaults.color_code,
            ),
            node_size: parse_or_default(
                "nodeSize",
                raw.node_size.as_deref(),
                SizeMode::parse,
                defaults.node_size,
            ),
            directed: flag_value("directed", raw.directed.as_ref()).unwrap_or(defaults.directed),
            tooltip: raw.tooltip.into_config(),
            width: positive_or_default("width", raw.width.as_ref(), defaults.width),
            height: positive_or_default("height", raw.height.as_ref(), defaults.height),
            fade_opacity: opacity_or_default(raw.fade_opacity.as_ref(), defaults.fade_opacity),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn chord_options_are_validated_once() {
        let config = PanelConfig::from_json_str(
            r##"{
                "type": "chord",
                "segmentSize": "incoming",
                "directed": false,
                "sorting": "value",
                "sortingOrder": "desc",
                "sortingTooltip": "label",
                "tooltipSetting": false,
                "numberOfTicks": 12,
                "ticksLabel": 0,
                "colors": ["#ff0000", "bogus"]
            }"##,
        )
        .unwrap();

        let PanelConfig::Chord(chord) = config else {
            panic!("expected chord config");
        };
        assert_eq!(chord.segment_size, SizeMode::Incoming);
        assert!(!chord.directed);
        assert_eq!(
            chord.sorting,
            Some(SortPolicy::new(SortKey::Value, SortOrder::Descending))
        );
        assert_eq!(chord.tooltip.mode, TooltipMode::None);
        assert_eq!(chord.number_of_ticks, Some(12));
        assert_eq!(chord.ticks_label, None);
        assert_eq!(chord.colors, vec![Color32::from_rgb(255, 0, 0)]);
    }

    #[test]
    fn unknown_values_fall_back_to_defaults() {
        let config = PanelConfig::from_json_str(
            r#"{"type": "network", "nodeSize": "sideways", "colorcode": "plaid",
                "tooltipSetting": "floating", "width": -5, "charge": -300}"#,
        )
        .unwrap();
        let PanelConfig::Network(network) = config else {
            panic!("expected network config");
        };
        assert_eq!(network.node_size, SizeMode::Outgoing);
        assert_eq!(network.color_code, ColorCode::Colored);
        assert_eq!(network.tooltip.mode, TooltipMode::Movable);
        assert_eq!(network.width, NetworkConfig::default().width);
        assert_eq!(network.charge, -300.0);
    }

    #[test]
    fn numbers_and_flags_may_be_written_as_strings() {
        let config = PanelConfig::from_json_str(
            r#"{"type": "network", "charge": "-120", "directed": "true",
                "linkDistance": " 45 ", "gravity": "lots", "width": [1], "fadeOpacity": "0.5"}"#,
        )
        .unwrap();
        let PanelConfig::Network(network) = config else {
            panic!("expected network config");
        };
        let defaults = NetworkConfig::default();
        assert_eq!(network.charge, -120.0);
        assert!(network.directed);
        assert_eq!(network.link_distance, 45.0);
        assert_eq!(network.gravity, defaults.gravity);
        assert_eq!(network.width, defaults.width);
        assert_eq!(network.fade_opacity, 0.5);

        let config = PanelConfig::from_json_str(
            r#"{"type": "chord", "directed": "False", "numberOfTicks": "5",
                "ticksLabel": true, "padding": "0.1"}"#,
        )
        .unwrap();
        let PanelConfig::Chord(chord) = config else {
            panic!("expected chord config");
        };
        assert!(!chord.directed);
        assert_eq!(chord.number_of_ticks, Some(5));
        assert_eq!(chord.ticks_label, None);
        assert!((chord.padding - 0.1).abs() < 1e-6);

        let config = PanelConfig::from_json_str(r#"{"type": "hive", "innerRadius": "80", "outerRadius": "yes"}"#)
            .unwrap();
        let PanelConfig::Hive(hive) = config else {
            panic!("expected hive config");
        };
        assert_eq!(hive.inner_radius, 80.0);
        assert_eq!(hive.outer_radius, HiveConfig::default().outer_radius);
    }

    #[test]
    fn malformed_palette_colors_are_skipped() {
        let config = PanelConfig::from_json_str(r##"{"type":"chord","colors":["#aéaaa", "#00ff00"]}"##).unwrap();
        let PanelConfig::Chord(chord) = config else {
            panic!("expected chord config");
        };
        assert_eq!(chord.colors, vec![Color32::from_rgb(0, 255, 0)]);
    }

    #[test]
    fn hive_axes_and_nodes() {
        let config = PanelConfig::from_json_str(
            r#"{
                "type": "hive",
                "colorcode": "black-white",
                "axisConfig": [
                    {"axis": "Time", "sort": "value", "order": "desc"},
                    {"axis": "City", "order": "desc"},
                    {"axis": "Mood", "sort": "vibes"}
                ],
                "nodes": [{"axis": "Time", "label": "noon"}],
                "tooltipOrientation": "left",
                "innerRadius": 100,
                "outerRadius": 50
            }"#,
        )
        .unwrap();
        let PanelConfig::Hive(hive) = config else {
            panic!("expected hive config");
        };
        assert_eq!(hive.color_code, ColorCode::BlackWhite);
        assert_eq!(
            hive.axis_sort("Time"),
            SortPolicy::new(SortKey::Value, SortOrder::Descending)
        );
        assert_eq!(
            hive.axis_sort("City"),
            SortPolicy::new(SortKey::Label, SortOrder::Descending)
        );
        assert_eq!(hive.axis_sort("Mood"), SortPolicy::default());
        assert_eq!(hive.axis_sort("Unknown"), SortPolicy::default());
        assert_eq!(hive.nodes, Some(vec![NodeKey::on_axis("Time", "noon")]));
        assert_eq!(hive.tooltip.orientation, TooltipOrientation::Left);
        assert!(hive.outer_radius > hive.inner_radius);
    }

    #[test]
    fn rejects_unknown_panel_type() {
        assert!(PanelConfig::from_json_str(r#"{"type": "sankey"}"#).is_err());
    }
}
