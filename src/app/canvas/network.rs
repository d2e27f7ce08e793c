use eframe::egui::{Align2, Color32, FontId, Painter, Shape, Stroke, Vec2, vec2};

use relviz::graph::RelationGraph;
use relviz::interaction::{Focus, opacity_of};
use relviz::network::{ARROW_SIZE, NetworkLayout, arrowhead};

use super::super::render_utils::{SEARCH_RING, circle_visible, faded};
use super::{Scene, View};

const EDGE_COLOR: Color32 = Color32::from_gray(140);
const EDGE_TOLERANCE: f32 = 3.0;

/// The simulation works in `[0, width] x [0, height]`; the canvas is
/// centred on the middle of that area.
fn center(layout: &NetworkLayout) -> Vec2 {
    let params = layout.simulation().params();
    vec2(params.width, params.height) * 0.5
}

pub(super) fn focus_at(layout: &NetworkLayout, view: View, world: Vec2) -> Option<Focus> {
    let point = world + center(layout);
    if let Some(node) = layout.node_at(point) {
        return Some(Focus::Node(node));
    }
    let tolerance = EDGE_TOLERANCE / view.scale(1.0).max(f32::EPSILON);
    let index = layout.edge_at(point, tolerance)?;
    layout.edges.get(index).map(|edge| Focus::Edge(edge.edge))
}

pub(super) fn draw(painter: &Painter, scene: &Scene<'_>, graph: &RelationGraph, layout: &NetworkLayout) {
    let view = scene.view;
    let offset = center(layout);
    let to_screen = |point: Vec2| view.to_screen(point - offset);

    for edge in &layout.edges {
        let opacity = opacity_of(scene.highlight, |highlight| highlight.edge_opacity(edge.edge));
        let color = faded(EDGE_COLOR, opacity);
        let path = layout.edge_path(edge);
        let points = path.flatten(20).into_iter().map(to_screen).collect::<Vec<_>>();
        painter.add(Shape::line(points, Stroke::new(view.scale(edge.width).max(1.0), color)));

        if edge.directed {
            let head = arrowhead(&path, ARROW_SIZE + edge.width).map(to_screen);
            painter.add(Shape::convex_polygon(head.to_vec(), color, Stroke::NONE));
        }
    }

    for node in &layout.nodes {
        let screen = to_screen(layout.position(node.node));
        let radius = view.scale(node.radius);
        if !circle_visible(painter.clip_rect(), screen, radius) {
            continue;
        }
        let opacity = opacity_of(scene.highlight, |highlight| highlight.node_opacity(node.node));
        painter.circle_filled(screen, radius, faded(node.color, opacity));
        painter.circle_stroke(screen, radius, Stroke::new(1.0, faded(Color32::WHITE, opacity * 0.6)));
        if scene.matches.contains(&node.node.index()) {
            painter.circle_stroke(screen, radius + 3.0, Stroke::new(2.0, SEARCH_RING));
        }

        if radius >= 9.0
            && let Some(graph_node) = graph.node(node.node)
        {
            painter.text(
                screen + vec2(0.0, radius + 8.0),
                Align2::CENTER_CENTER,
                graph_node.label(),
                FontId::proportional(11.0),
                faded(Color32::from_gray(220), opacity),
            );
        }
    }
}
