//! Circular (chord) layout: one arc segment per node, ribbons for pairs.

use std::collections::BTreeSet;
use std::f32::consts::TAU;

use eframe::egui::{Color32, Vec2};
use tracing::debug;

use crate::color::ColorAssigner;
use crate::config::{ChordConfig, SizeMode};
use crate::geometry::{angle_of, angle_within, arc_points, polar, polygon_contains, quadratic_point};
use crate::graph::{Node, NodeId, RelationGraph};
use crate::sort::{SortFields, SortKey, SortValue};
use crate::util::format_weight;

/// Horizontal budget per label character, in pixels.
pub const LABEL_CHAR_WIDTH: f32 = 7.0;
const AUTO_TICK_TARGET: f64 = 48.0;
const MAX_TICKS_PER_GROUP: usize = 512;

#[derive(Clone, Debug, PartialEq)]
pub struct ChordGroup {
    pub node: NodeId,
    pub label: String,
    pub value: f64,
    pub start_angle: f32,
    pub end_angle: f32,
    pub color: Color32,
}

impl ChordGroup {
    pub fn span(&self) -> f32 {
        self.end_angle - self.start_angle
    }

    pub fn mid_angle(&self) -> f32 {
        (self.start_angle + self.end_angle) * 0.5
    }

    /// Label as it fits along the arc at `radius`; `None` when nothing fits.
    pub fn label_text(&self, radius: f32) -> Option<String> {
        fit_label(&self.label, self.span(), radius)
    }
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct RibbonEnd {
    pub node: NodeId,
    pub start_angle: f32,
    pub end_angle: f32,
    pub value: f64,
}

#[derive(Clone, Debug, PartialEq)]
pub struct Ribbon {
    pub source: RibbonEnd,
    pub target: RibbonEnd,
    pub color: Color32,
}

impl Ribbon {
    pub fn touches(&self, node: NodeId) -> bool {
        self.source.node == node || self.target.node == node
    }

    /// Closed outline around the origin: source arc, curve through the
    /// centre, target arc, curve back.
    pub fn outline(&self, radius: f32, segments: usize) -> Vec<Vec2> {
        let mut points = arc_points(self.source.start_angle, self.source.end_angle, radius, segments);
        let source_end = polar(self.source.end_angle, radius);
        let target_start = polar(self.target.start_angle, radius);
        for step in 1..segments.max(1) {
            let t = step as f32 / segments.max(1) as f32;
            points.push(quadratic_point(source_end, Vec2::ZERO, target_start, t));
        }
        points.extend(arc_points(self.target.start_angle, self.target.end_angle, radius, segments));
        let target_end = polar(self.target.end_angle, radius);
        let source_start = polar(self.source.start_angle, radius);
        for step in 1..segments.max(1) {
            let t = step as f32 / segments.max(1) as f32;
            points.push(quadratic_point(target_end, Vec2::ZERO, source_start, t));
        }
        points
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct Tick {
    pub node: NodeId,
    pub angle: f32,
    pub value: f64,
    pub label: Option<String>,
}

#[derive(Clone, Debug, Default, PartialEq)]
pub struct ChordLayout {
    pub groups: Vec<ChordGroup>,
    pub ribbons: Vec<Ribbon>,
    pub ticks: Vec<Tick>,
    pub padding: f32,
    pub tick_step: f64,
    pub directed: bool,
}

impl ChordLayout {
    pub fn is_empty(&self) -> bool {
        self.groups.is_empty()
    }

    pub fn group(&self, node: NodeId) -> Option<&ChordGroup> {
        self.groups.iter().find(|group| group.node == node)
    }

    /// Group whose ring segment (between `inner` and `outer`) contains `point`.
    pub fn group_at(&self, point: Vec2, inner: f32, outer: f32) -> Option<usize> {
        let distance = point.length();
        if distance < inner || distance > outer {
            return None;
        }
        let angle = angle_of(point);
        self.groups
            .iter()
            .position(|group| group.span() > 0.0 && angle_within(angle, group.start_angle, group.end_angle))
    }

    /// Topmost ribbon containing `point`; later ribbons are drawn on top.
    pub fn ribbon_at(&self, point: Vec2, radius: f32) -> Option<usize> {
        if point.length() > radius {
            return None;
        }
        self.ribbons
            .iter()
            .enumerate()
            .rev()
            .find(|(_, ribbon)| polygon_contains(&ribbon.outline(radius, 16), point))
            .map(|(index, _)| index)
    }
}

struct GroupRecord<'a> {
    node: &'a Node,
    value: f64,
}

impl SortFields for GroupRecord<'_> {
    fn sort_value(&self, key: SortKey) -> Option<SortValue<'_>> {
        match key {
            SortKey::Value => Some(SortValue::Number(self.value)),
            _ => self.node.sort_value(key),
        }
    }
}

/// Positive cells of one group in circle order, with their angular spans.
#[derive(Default)]
struct GroupSpans {
    start: f32,
    /// `(circle position of the other node, start, end)`.
    cells: Vec<(usize, f32, f32)>,
}

impl GroupSpans {
    /// Span reserved inside this group for the node at `position`. An empty
    /// cell collapses to the point where it would have been.
    fn span(&self, position: usize) -> (f32, f32) {
        match self.cells.binary_search_by_key(&position, |cell| cell.0) {
            Ok(index) => (self.cells[index].1, self.cells[index].2),
            Err(0) => (self.start, self.start),
            Err(index) => (self.cells[index - 1].2, self.cells[index - 1].2),
        }
    }
}

pub fn compute(graph: &RelationGraph, config: &ChordConfig) -> ChordLayout {
    let node_count = graph.nodes().len();
    if node_count == 0 {
        return ChordLayout {
            padding: config.padding,
            tick_step: 1.0,
            directed: graph.is_directed(),
            ..ChordLayout::default()
        };
    }

    let matrix = match config.segment_size {
        SizeMode::Outgoing => graph.matrix().clone(),
        SizeMode::Incoming => graph.matrix().transpose(),
    };

    let records = graph
        .nodes()
        .iter()
        .map(|node| GroupRecord {
            node,
            value: matrix
                .row(node.id.index())
                .map(|(_, weight)| weight.max(0.0))
                .sum(),
        })
        .collect::<Vec<_>>();
    let mut order = (0..node_count).collect::<Vec<_>>();
    if let Some(sorting) = config.sorting {
        sorting.sort_indices(&records, &mut order);
    }

    let total: f64 = records.iter().map(|record| record.value).sum();
    let (padding, scale) = if total > 0.0 {
        let padding = config.padding.min(TAU / node_count as f32 * 0.5);
        let available = TAU - padding * node_count as f32;
        (padding, available as f64 / total)
    } else {
        (TAU / node_count as f32, 0.0)
    };

    let mut position_of = vec![0usize; node_count];
    for (position, &node) in order.iter().enumerate() {
        position_of[node] = position;
    }

    let colors = ColorAssigner::palette(config.colors.clone());
    let mut groups = Vec::with_capacity(node_count);
    let mut spans = (0..node_count).map(|_| GroupSpans::default()).collect::<Vec<_>>();
    let mut cursor = 0.0_f64;
    for (position, &row) in order.iter().enumerate() {
        let start = cursor;
        let mut cells = matrix
            .row(row)
            .filter(|&(_, weight)| weight > 0.0)
            .map(|(column, weight)| (position_of[column], weight))
            .collect::<Vec<_>>();
        cells.sort_by_key(|&(column_position, _)| column_position);

        let mut cell_spans = Vec::with_capacity(cells.len());
        for (column_position, weight) in cells {
            let sub_start = cursor;
            cursor += weight * scale;
            cell_spans.push((column_position, sub_start as f32, cursor as f32));
        }
        spans[row] = GroupSpans {
            start: start as f32,
            cells: cell_spans,
        };

        let node = &graph.nodes()[row];
        groups.push(ChordGroup {
            node: node.id,
            label: node.label().to_owned(),
            value: records[row].value,
            start_angle: start as f32,
            end_angle: cursor as f32,
            color: colors.color_at(position, node_count),
        });
        cursor += padding as f64;
    }

    let color_of = |node: usize| {
        groups
            .get(position_of[node])
            .map(|group| group.color)
            .unwrap_or(Color32::GRAY)
    };

    // Unordered pairs with a positive cell, by circle position.
    let pairs = matrix
        .entries()
        .filter(|&(_, _, weight)| weight > 0.0)
        .map(|(row, column, _)| {
            let (a, b) = (position_of[row], position_of[column]);
            (a.min(b), a.max(b))
        })
        .collect::<BTreeSet<_>>();

    let mut ribbons = Vec::with_capacity(pairs.len());
    for (first, second) in pairs {
        let (row, column) = (order[first], order[second]);
        let forward = matrix.get(row, column).max(0.0);
        let backward = matrix.get(column, row).max(0.0);

        // Ties go to the lower node id.
        let dominant = if forward > backward {
            row
        } else if backward > forward {
            column
        } else {
            row.min(column)
        };

        let (source_start, source_end) = spans[row].span(second);
        let (target_start, target_end) = spans[column].span(first);
        ribbons.push(Ribbon {
            source: RibbonEnd {
                node: NodeId(row),
                start_angle: source_start,
                end_angle: source_end,
                value: forward,
            },
            target: RibbonEnd {
                node: NodeId(column),
                start_angle: target_start,
                end_angle: target_end,
                value: backward,
            },
            color: color_of(dominant),
        });
    }

    let tick_step = tick_step(total, config.number_of_ticks);
    let label_every = config
        .ticks_label
        .unwrap_or_else(|| auto_label_every(total, tick_step))
        .max(1);
    let mut ticks = Vec::new();
    for group in &groups {
        let mut index = 0usize;
        loop {
            let value = index as f64 * tick_step;
            if index > 0 && (value > group.value || index >= MAX_TICKS_PER_GROUP) {
                break;
            }
            ticks.push(Tick {
                node: group.node,
                angle: group.start_angle + (value * scale) as f32,
                value,
                label: (index % label_every == 0).then(|| format_weight(value)),
            });
            index += 1;
        }
    }

    debug!(
        groups = groups.len(),
        ribbons = ribbons.len(),
        ticks = ticks.len(),
        "computed chord layout"
    );

    ChordLayout {
        groups,
        ribbons,
        ticks,
        padding,
        tick_step,
        directed: graph.is_directed(),
    }
}

/// Value distance between ticks. Explicit counts divide the total; otherwise
/// a 1-2-5 step aiming at roughly [`AUTO_TICK_TARGET`] ticks in all.
pub fn tick_step(total: f64, number_of_ticks: Option<usize>) -> f64 {
    if !(total > 0.0) {
        return 1.0;
    }
    match number_of_ticks {
        Some(count) if count > 0 => total / count as f64,
        _ => nice_step(total / AUTO_TICK_TARGET),
    }
}

fn auto_label_every(total: f64, step: f64) -> usize {
    let tick_count = if step > 0.0 { total / step } else { 0.0 };
    if tick_count > 100.0 { 10 } else { 5 }
}

fn nice_step(raw: f64) -> f64 {
    if !(raw > 0.0) || !raw.is_finite() {
        return 1.0;
    }
    let magnitude = 10f64.powf(raw.log10().floor());
    let residual = raw / magnitude;
    let nice = if residual <= 1.0 {
        1.0
    } else if residual <= 2.0 {
        2.0
    } else if residual <= 5.0 {
        5.0
    } else {
        10.0
    };
    nice * magnitude
}

/// Truncates `label` with an ellipsis to what fits along an arc of `span`
/// radians at `radius`.
pub fn fit_label(label: &str, span: f32, radius: f32) -> Option<String> {
    if !(span > 0.0) || !(radius > 0.0) {
        return None;
    }
    let max_chars = ((span * radius) / LABEL_CHAR_WIDTH).floor() as usize;
    let length = label.chars().count();
    if length <= max_chars {
        return Some(label.to_owned());
    }
    match max_chars {
        0 => None,
        1 => Some("…".to_owned()),
        _ => {
            let mut truncated = label.chars().take(max_chars - 1).collect::<String>();
            truncated.push('…');
            Some(truncated)
        }
    }
}
