use eframe::egui::{Align2, Color32, FontId, Painter, Shape, Stroke, Vec2};

use relviz::geometry::polar;
use relviz::graph::RelationGraph;
use relviz::hive::HiveLayout;
use relviz::interaction::{Focus, opacity_of};

use super::super::render_utils::{SEARCH_RING, circle_visible, faded, with_alpha};
use super::{Scene, View};

const NODE_RADIUS: f32 = 4.5;
const NODE_HIT_RADIUS: f32 = 6.0;
const LINK_TOLERANCE: f32 = 3.0;
const AXIS_COLOR: Color32 = Color32::from_gray(150);

pub(super) fn focus_at(layout: &HiveLayout, view: View, world: Vec2) -> Option<Focus> {
    // Hit radii are in screen pixels.
    let zoom = view.scale(1.0).max(f32::EPSILON);
    if let Some(node) = layout.node_at(world, NODE_HIT_RADIUS / zoom) {
        return Some(Focus::Node(node));
    }
    let index = layout.link_at(world, LINK_TOLERANCE / zoom)?;
    layout.links.get(index).map(|link| Focus::Edge(link.edge))
}

pub(super) fn draw(painter: &Painter, scene: &Scene<'_>, graph: &RelationGraph, layout: &HiveLayout) {
    let view = scene.view;

    for axis in &layout.axes {
        let from = view.to_screen(polar(axis.angle, layout.inner_radius));
        let to = view.to_screen(polar(axis.angle, layout.outer_radius));
        painter.line_segment([from, to], Stroke::new(2.0, AXIS_COLOR));
        painter.text(
            view.to_screen(polar(axis.angle, layout.outer_radius + 18.0)),
            Align2::CENTER_CENTER,
            &axis.name,
            FontId::proportional(13.0),
            AXIS_COLOR,
        );
    }

    for link in &layout.links {
        let opacity = opacity_of(scene.highlight, |highlight| highlight.edge_opacity(link.edge));
        let points = link
            .path
            .flatten(24)
            .into_iter()
            .map(|point| view.to_screen(point))
            .collect::<Vec<_>>();
        let color = with_alpha(faded(link.color, opacity), 0.8);
        painter.add(Shape::line(points, Stroke::new(view.scale(1.5).max(1.0), color)));
    }

    for node in &layout.nodes {
        let center = view.to_screen(layout.position(node));
        let radius = view.scale(NODE_RADIUS).max(2.0);
        if !circle_visible(painter.clip_rect(), center, radius) {
            continue;
        }
        let opacity = opacity_of(scene.highlight, |highlight| highlight.node_opacity(node.node));
        painter.circle_filled(center, radius, faded(Color32::from_gray(235), opacity));
        if scene.matches.contains(&node.node.index()) {
            painter.circle_stroke(center, radius + 3.0, Stroke::new(2.0, SEARCH_RING));
        }

        let hovered = matches!(scene.highlight.map(|highlight| highlight.focus), Some(Focus::Node(id)) if id == node.node);
        if hovered && let Some(graph_node) = graph.node(node.node) {
            painter.text(
                center + Vec2::new(radius + 4.0, 0.0),
                Align2::LEFT_CENTER,
                graph_node.label(),
                FontId::proportional(12.0),
                Color32::WHITE,
            );
        }
    }
}
