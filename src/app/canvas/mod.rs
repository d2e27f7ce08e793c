use std::collections::HashSet;
use std::sync::Arc;

use eframe::egui::{self, Align2, Color32, FontId, Pos2, Rect, Sense, Stroke, Ui, Vec2, vec2};
use fuzzy_matcher::FuzzyMatcher;
use fuzzy_matcher::skim::SkimMatcherV2;

use relviz::Layout;
use relviz::interaction::{Focus, Highlight, place_tooltip};
use relviz::network::TickStatus;

use super::render_utils::{draw_background, screen_to_world, world_to_screen};
use super::{SearchMatchCache, ViewModel};

mod chord;
mod hive;
mod network;

const TOOLTIP_LINE_HEIGHT: f32 = 16.0;
const TOOLTIP_CHAR_WIDTH: f32 = 7.0;

fn fuzzy_match_score(matcher: &SkimMatcherV2, text: &str, query: &str) -> Option<i64> {
    matcher
        .fuzzy_match(text, query)
        .or_else(|| matcher.fuzzy_match(&text.to_ascii_lowercase(), &query.to_ascii_lowercase()))
}

/// Screen mapping of the canvas for one frame.
#[derive(Clone, Copy)]
pub(super) struct View {
    rect: Rect,
    pan: Vec2,
    zoom: f32,
}

impl View {
    fn to_screen(self, world: Vec2) -> Pos2 {
        world_to_screen(self.rect, self.pan, self.zoom, world)
    }

    fn to_world(self, screen: Pos2) -> Vec2 {
        screen_to_world(self.rect, self.pan, self.zoom, screen)
    }

    fn scale(self, length: f32) -> f32 {
        length * self.zoom
    }
}

/// Per-frame inputs shared by the layout painters.
pub(super) struct Scene<'a> {
    view: View,
    highlight: Option<&'a Highlight>,
    matches: &'a HashSet<usize>,
}

impl ViewModel {
    fn cached_search_matches(&mut self) -> Arc<HashSet<usize>> {
        let query = self.search.trim();
        if query.is_empty() {
            return Arc::new(HashSet::new());
        }

        let generation = self.diagram.token().generation();
        if let Some(cached) = &self.search_match_cache
            && cached.generation == generation
            && cached.query == query
        {
            return Arc::clone(&cached.matches);
        }

        let matcher = SkimMatcherV2::default();
        let matches = self
            .diagram
            .graph
            .nodes()
            .iter()
            .filter(|node| fuzzy_match_score(&matcher, node.label(), query).is_some())
            .map(|node| node.id.index())
            .collect::<HashSet<_>>();
        let matches = Arc::new(matches);

        self.search_match_cache = Some(SearchMatchCache {
            query: query.to_owned(),
            generation,
            matches: Arc::clone(&matches),
        });
        matches
    }

    fn handle_zoom(&mut self, ui: &Ui, rect: Rect, response: &egui::Response) {
        if !response.hovered() {
            return;
        }

        let scroll = ui.input(|input| input.raw_scroll_delta.y);
        if scroll.abs() <= f32::EPSILON {
            return;
        }

        let pointer = ui
            .input(|input| input.pointer.hover_pos())
            .unwrap_or_else(|| rect.center());
        let world_before = screen_to_world(rect, self.pan, self.zoom, pointer);

        let zoom_factor = (1.0 + (scroll * 0.0018)).clamp(0.85, 1.15);
        self.zoom = (self.zoom * zoom_factor).clamp(0.2, 6.0);
        self.pan = pointer - rect.center() - (world_before * self.zoom);
    }

    fn handle_pan(&mut self, response: &egui::Response) {
        if response.dragged_by(egui::PointerButton::Secondary)
            || response.dragged_by(egui::PointerButton::Middle)
        {
            self.pan += response.drag_delta();
        }
    }

    fn focus_at(&self, view: View, pointer: Pos2) -> Option<Focus> {
        let world = view.to_world(pointer);
        match &self.diagram.layout {
            Layout::Chord(layout) => chord::focus_at(layout, view, world),
            Layout::Hive(layout) => hive::focus_at(layout, view, world),
            Layout::Network(layout) => network::focus_at(layout, view, world),
        }
    }

    fn dispatch_click(&mut self, focus: Focus) {
        let graph = &self.diagram.graph;
        match focus {
            Focus::Node(node) => self.dispatcher.click_node(graph, node),
            Focus::Edge(edge) => self.dispatcher.click_link(graph, edge),
            Focus::Pair(source, target) => self.dispatcher.click_pair(graph, source, target),
        };
    }

    pub(in crate::app) fn draw_canvas(&mut self, ui: &mut Ui) {
        if self.diagram_dirty {
            self.rebuild_diagram();
        }

        let (rect, response) = ui.allocate_exact_size(ui.available_size(), Sense::click_and_drag());
        let painter = ui.painter_at(rect);
        draw_background(&painter, rect, self.pan, self.zoom);

        self.handle_zoom(ui, rect, &response);
        self.handle_pan(&response);

        if self.live_simulation && self.diagram.tick(&self.session) == TickStatus::Running {
            ui.ctx().request_repaint();
        }

        if self.diagram.is_empty() {
            painter.text(
                rect.center(),
                Align2::CENTER_CENTER,
                "No relations to draw.",
                FontId::proportional(16.0),
                Color32::GRAY,
            );
            self.hover = None;
            return;
        }

        let view = View {
            rect,
            pan: self.pan,
            zoom: self.zoom,
        };
        let pointer = response.hover_pos();
        self.hover = pointer.and_then(|pointer| self.focus_at(view, pointer));
        if self.hover.is_some() {
            ui.output_mut(|output| output.cursor_icon = egui::CursorIcon::PointingHand);
        }

        let matches = self.cached_search_matches();
        let controller = self.diagram.controller();
        let highlight = self.hover.map(|focus| controller.highlight(focus));
        let scene = Scene {
            view,
            highlight: highlight.as_ref(),
            matches: &matches,
        };
        match &self.diagram.layout {
            Layout::Chord(layout) => chord::draw(&painter, &scene, &self.diagram.graph, layout),
            Layout::Hive(layout) => hive::draw(&painter, &scene, &self.diagram.graph, layout),
            Layout::Network(layout) => network::draw(&painter, &scene, &self.diagram.graph, layout),
        }

        if let (Some(focus), Some(pointer)) = (self.hover, pointer)
            && let Some(tooltip) = controller.tooltip(focus)
        {
            let lines = tooltip.lines();
            let widest = lines.iter().map(|line| line.chars().count()).max().unwrap_or(0);
            let size = vec2(
                widest as f32 * TOOLTIP_CHAR_WIDTH + 16.0,
                lines.len() as f32 * TOOLTIP_LINE_HEIGHT + 12.0,
            );
            if let Some(corner) = place_tooltip(&controller.tooltip_config(), pointer, size, rect) {
                let frame = Rect::from_min_size(corner, size);
                painter.rect_filled(frame, 4.0, Color32::from_rgba_unmultiplied(12, 14, 18, 235));
                painter.rect_stroke(
                    frame,
                    4.0,
                    Stroke::new(1.0, Color32::from_gray(90)),
                    egui::StrokeKind::Inside,
                );
                for (row, line) in lines.iter().enumerate() {
                    painter.text(
                        corner + vec2(8.0, 6.0 + row as f32 * TOOLTIP_LINE_HEIGHT),
                        Align2::LEFT_TOP,
                        line,
                        FontId::monospace(12.0),
                        if row == 0 { Color32::WHITE } else { Color32::LIGHT_GRAY },
                    );
                }
            }
        }

        if response.clicked_by(egui::PointerButton::Primary)
            && let Some(focus) = self.hover
        {
            self.dispatch_click(focus);
        }
    }
}
