use eframe::egui::epaint::Mesh;
use eframe::egui::{Align2, Color32, FontId, Painter, Rect, Shape, Stroke, Vec2};

use relviz::chord::{ChordLayout, Ribbon};
use relviz::geometry::{arc_points, polar, quadratic_point};
use relviz::graph::RelationGraph;
use relviz::interaction::{Focus, opacity_of};

use super::super::render_utils::{SEARCH_RING, faded, with_alpha};
use super::{Scene, View};

const RING_WIDTH: f32 = 14.0;
const TICK_LENGTH: f32 = 5.0;
const LABEL_GAP: f32 = 26.0;
const RIBBON_SEGMENTS: usize = 24;

/// Outer ring radius in world units for a canvas of this size.
fn outer_radius(rect: Rect) -> f32 {
    (rect.width().min(rect.height()) * 0.5 - 70.0).max(40.0)
}

fn inner_radius(rect: Rect) -> f32 {
    outer_radius(rect) - RING_WIDTH
}

pub(super) fn focus_at(layout: &ChordLayout, view: View, world: Vec2) -> Option<Focus> {
    let outer = outer_radius(view.rect);
    let inner = inner_radius(view.rect);
    if let Some(index) = layout.group_at(world, inner, outer) {
        return layout.groups.get(index).map(|group| Focus::Node(group.node));
    }
    let index = layout.ribbon_at(world, inner)?;
    layout
        .ribbons
        .get(index)
        .map(|ribbon| Focus::Pair(ribbon.source.node, ribbon.target.node))
}

/// Triangle strip between the two inner curves of a ribbon, plus fans for
/// the arc caps at each end.
fn ribbon_mesh(ribbon: &Ribbon, radius: f32, view: View, color: Color32) -> Mesh {
    let mut mesh = Mesh::default();
    let source_start = polar(ribbon.source.start_angle, radius);
    let source_end = polar(ribbon.source.end_angle, radius);
    let target_start = polar(ribbon.target.start_angle, radius);
    let target_end = polar(ribbon.target.end_angle, radius);

    for step in 0..=RIBBON_SEGMENTS {
        let t = step as f32 / RIBBON_SEGMENTS as f32;
        let left = quadratic_point(source_end, Vec2::ZERO, target_start, t);
        let right = quadratic_point(source_start, Vec2::ZERO, target_end, t);
        mesh.colored_vertex(view.to_screen(left), color);
        mesh.colored_vertex(view.to_screen(right), color);
        if step > 0 {
            let base = (step as u32 - 1) * 2;
            mesh.add_triangle(base, base + 1, base + 2);
            mesh.add_triangle(base + 1, base + 3, base + 2);
        }
    }

    for (start, end) in [
        (ribbon.source.start_angle, ribbon.source.end_angle),
        (ribbon.target.start_angle, ribbon.target.end_angle),
    ] {
        let points = arc_points(start, end, radius, 12);
        let anchor = mesh.vertices.len() as u32;
        for point in &points {
            mesh.colored_vertex(view.to_screen(*point), color);
        }
        for offset in 1..(points.len() as u32).saturating_sub(1) {
            mesh.add_triangle(anchor, anchor + offset, anchor + offset + 1);
        }
    }
    mesh
}

pub(super) fn draw(painter: &Painter, scene: &Scene<'_>, graph: &RelationGraph, layout: &ChordLayout) {
    let view = scene.view;
    let outer = outer_radius(view.rect);
    let inner = inner_radius(view.rect);

    for ribbon in &layout.ribbons {
        let opacity = opacity_of(scene.highlight, |highlight| {
            highlight.pair_opacity(ribbon.source.node, ribbon.target.node)
        });
        let fill = with_alpha(faded(ribbon.color, opacity), 0.7);
        painter.add(Shape::mesh(ribbon_mesh(ribbon, inner, view, fill)));
    }

    for group in &layout.groups {
        if group.span() <= 0.0 {
            continue;
        }
        let opacity = opacity_of(scene.highlight, |highlight| highlight.node_opacity(group.node));
        let band = arc_points(group.start_angle, group.end_angle, outer - RING_WIDTH * 0.5, 32)
            .into_iter()
            .map(|point| view.to_screen(point))
            .collect::<Vec<_>>();
        painter.add(Shape::line(
            band.clone(),
            Stroke::new(view.scale(RING_WIDTH), faded(group.color, opacity)),
        ));
        if scene.matches.contains(&group.node.index()) {
            painter.add(Shape::line(band, Stroke::new(view.scale(RING_WIDTH) + 3.0, SEARCH_RING)));
        }

        if let Some(label) = group.label_text(outer + LABEL_GAP) {
            let anchor = view.to_screen(polar(group.mid_angle(), outer + LABEL_GAP));
            painter.text(
                anchor,
                Align2::CENTER_CENTER,
                label,
                FontId::proportional(12.0),
                faded(Color32::from_gray(220), opacity),
            );
        }
    }

    for tick in &layout.ticks {
        let opacity = opacity_of(scene.highlight, |highlight| highlight.node_opacity(tick.node));
        let color = faded(Color32::from_gray(170), opacity);
        let from = view.to_screen(polar(tick.angle, outer));
        let to = view.to_screen(polar(tick.angle, outer + TICK_LENGTH));
        painter.line_segment([from, to], Stroke::new(1.0, color));
        if let Some(label) = &tick.label {
            painter.text(
                view.to_screen(polar(tick.angle, outer + TICK_LENGTH + 8.0)),
                Align2::CENTER_CENTER,
                label,
                FontId::monospace(9.0),
                color,
            );
        }
    }

    if graph.total_weight() <= 0.0 {
        painter.text(
            view.rect.center_bottom() - Vec2::new(0.0, 20.0),
            Align2::CENTER_CENTER,
            "All relation weights are zero.",
            FontId::proportional(12.0),
            Color32::GRAY,
        );
    }
}
