//! Hive plot: nodes ranked along angular axes, curved links between them.

use std::collections::{HashMap, HashSet};
use std::f32::consts::TAU;

use eframe::egui::{Color32, Vec2};
use tracing::{debug, warn};

use crate::color::GradientScale;
use crate::config::HiveConfig;
use crate::geometry::{CurvePath, distance_to_polyline, polar, wrap_delta};
use crate::graph::{NodeId, RelationGraph};
use crate::relation::LinkRole;

/// Angular offset of the control point for links between nodes on one axis.
const SAME_AXIS_BULGE: f32 = 0.35;

#[derive(Clone, Debug, PartialEq)]
pub struct HiveAxis {
    pub name: String,
    pub angle: f32,
    /// Nodes on this axis from the inner to the outer end.
    pub nodes: Vec<NodeId>,
}

#[derive(Clone, Debug, PartialEq)]
pub struct HiveNode {
    pub node: NodeId,
    pub axis: usize,
    pub rank: usize,
    pub radius: f32,
    pub value: f64,
    pub link_count: usize,
}

#[derive(Clone, Debug, PartialEq)]
pub struct HiveLink {
    pub edge: usize,
    pub source: NodeId,
    pub target: NodeId,
    pub weight: f64,
    pub color: Color32,
    pub path: CurvePath,
}

#[derive(Clone, Debug, Default, PartialEq)]
pub struct HiveLayout {
    pub axes: Vec<HiveAxis>,
    pub nodes: Vec<HiveNode>,
    pub links: Vec<HiveLink>,
    pub inner_radius: f32,
    pub outer_radius: f32,
    slot_by_node: HashMap<NodeId, usize>,
}

impl HiveLayout {
    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    pub fn node(&self, id: NodeId) -> Option<&HiveNode> {
        self.slot_by_node.get(&id).and_then(|&slot| self.nodes.get(slot))
    }

    pub fn position(&self, node: &HiveNode) -> Vec2 {
        let angle = self.axes.get(node.axis).map(|axis| axis.angle).unwrap_or(0.0);
        polar(angle, node.radius)
    }

    pub fn axis_separation(&self, first: usize, second: usize) -> Option<f32> {
        let a = self.axes.get(first)?.angle;
        let b = self.axes.get(second)?.angle;
        Some(wrap_delta(b - a).abs())
    }

    pub fn node_at(&self, point: Vec2, hit_radius: f32) -> Option<NodeId> {
        self.nodes
            .iter()
            .map(|node| (node.node, (self.position(node) - point).length()))
            .filter(|(_, distance)| *distance <= hit_radius)
            .min_by(|a, b| a.1.total_cmp(&b.1))
            .map(|(id, _)| id)
    }

    /// Index into [`Self::links`] of the link passing closest to `point`.
    pub fn link_at(&self, point: Vec2, tolerance: f32) -> Option<usize> {
        self.links
            .iter()
            .enumerate()
            .map(|(index, link)| (index, distance_to_polyline(point, &link.path.flatten(24))))
            .filter(|(_, distance)| *distance <= tolerance)
            .min_by(|a, b| a.1.total_cmp(&b.1))
            .map(|(index, _)| index)
    }
}

/// Angle of each axis slot. Two axes sit 120 degrees apart rather than
/// opposite each other.
pub fn axis_angles(count: usize) -> Vec<f32> {
    let step = match count {
        0 => return Vec::new(),
        2 => TAU / 3.0,
        _ => TAU / count as f32,
    };
    (0..count).map(|slot| slot as f32 * step).collect()
}

fn axis_name(graph: &RelationGraph, id: NodeId) -> String {
    graph
        .node(id)
        .and_then(|node| node.axis())
        .unwrap_or_default()
        .to_owned()
}

fn placed_nodes(graph: &RelationGraph, config: &HiveConfig) -> Vec<NodeId> {
    let Some(keys) = &config.nodes else {
        return graph.nodes().iter().map(|node| node.id).collect();
    };

    let mut seen = HashSet::new();
    let mut placed = Vec::with_capacity(keys.len());
    for key in keys {
        match graph.node_id(key) {
            Some(id) => {
                if seen.insert(id) {
                    placed.push(id);
                }
            }
            None => warn!(
                axis = key.axis.as_deref().unwrap_or(""),
                label = key.label.as_str(),
                "supplied hive node is missing from the graph; skipping it"
            ),
        }
    }
    placed
}

pub fn link_path(
    source_angle: f32,
    source_radius: f32,
    target_angle: f32,
    target_radius: f32,
    same_axis: bool,
    role: LinkRole,
) -> CurvePath {
    let start = polar(source_angle, source_radius);
    let end = polar(target_angle, target_radius);

    if same_axis {
        let bulge = SAME_AXIS_BULGE * role.sign();
        let control_radius = (source_radius + target_radius) * 0.5
            + (source_radius - target_radius).abs() * 0.25;
        let control = polar(source_angle + bulge, control_radius.max(source_radius.min(target_radius)));
        return CurvePath::Quadratic([start, control, end]);
    }

    let delta = wrap_delta(target_angle - source_angle);
    let first = polar(source_angle + delta / 3.0, source_radius);
    let second = polar(target_angle - delta / 3.0, target_radius);
    CurvePath::Cubic([start, first, second, end])
}

pub fn compute(graph: &RelationGraph, config: &HiveConfig) -> HiveLayout {
    let placed = placed_nodes(graph, config);

    let mut axis_names: Vec<String> = Vec::new();
    let present = placed
        .iter()
        .map(|&id| axis_name(graph, id))
        .collect::<HashSet<_>>();
    for axis in &config.axes {
        if present.contains(&axis.axis) && !axis_names.contains(&axis.axis) {
            axis_names.push(axis.axis.clone());
        }
    }
    for &id in &placed {
        let name = axis_name(graph, id);
        if !axis_names.contains(&name) {
            axis_names.push(name);
        }
    }

    let angles = axis_angles(axis_names.len());
    let mut axes = axis_names
        .into_iter()
        .zip(angles)
        .map(|(name, angle)| HiveAxis {
            name,
            angle,
            nodes: Vec::new(),
        })
        .collect::<Vec<_>>();

    let mut members: Vec<Vec<usize>> = vec![Vec::new(); axes.len()];
    for &id in &placed {
        let name = axis_name(graph, id);
        if let Some(slot) = axes.iter().position(|axis| axis.name == name) {
            members[slot].push(id.index());
        }
    }

    let span = config.outer_radius - config.inner_radius;
    let mut nodes = Vec::with_capacity(placed.len());
    let mut slot_by_node = HashMap::with_capacity(placed.len());
    for (axis_index, (axis, indices)) in axes.iter_mut().zip(members.iter_mut()).enumerate() {
        config.axis_sort(&axis.name).sort_indices(graph.nodes(), indices);
        let count = indices.len().max(1) as f32;
        for (rank, &index) in indices.iter().enumerate() {
            let node = &graph.nodes()[index];
            slot_by_node.insert(node.id, nodes.len());
            axis.nodes.push(node.id);
            nodes.push(HiveNode {
                node: node.id,
                axis: axis_index,
                rank,
                radius: config.inner_radius + span * (rank as f32 / count),
                value: node.total_weight,
                link_count: node.link_count,
            });
        }
    }

    let visible_edges = graph
        .edges()
        .iter()
        .enumerate()
        .filter(|(_, edge)| slot_by_node.contains_key(&edge.source) && slot_by_node.contains_key(&edge.target))
        .collect::<Vec<_>>();
    let scale = GradientScale::from_weights(
        config.color_code.gradient(),
        visible_edges
            .iter()
            .map(|(_, edge)| edge.weight)
            .filter(|weight| *weight != 0.0),
    );

    let links = visible_edges
        .into_iter()
        .map(|(index, edge)| {
            let source = &nodes[slot_by_node[&edge.source]];
            let target = &nodes[slot_by_node[&edge.target]];
            let source_angle = axes[source.axis].angle;
            let target_angle = axes[target.axis].angle;
            HiveLink {
                edge: index,
                source: edge.source,
                target: edge.target,
                weight: edge.weight,
                color: scale.color_for(edge.weight),
                path: link_path(
                    source_angle,
                    source.radius,
                    target_angle,
                    target.radius,
                    source.axis == target.axis,
                    edge.role,
                ),
            }
        })
        .collect::<Vec<_>>();

    debug!(
        axes = axes.len(),
        nodes = nodes.len(),
        links = links.len(),
        "computed hive layout"
    );

    HiveLayout {
        axes,
        nodes,
        links,
        inner_radius: config.inner_radius,
        outer_radius: config.outer_radius,
        slot_by_node,
    }
}
