use eframe::egui::{self, RichText, Ui};

use relviz::util::format_weight;

use super::super::ViewModel;

impl ViewModel {
    pub(in crate::app) fn draw_details(&mut self, ui: &mut Ui) {
        ui.heading("Details");
        ui.add_space(6.0);

        let graph = &self.diagram.graph;
        ui.label(format!("Nodes: {}", graph.nodes().len()));
        ui.label(format!("Edges: {}", graph.edges().len()));
        ui.label(format!("Total weight: {}", format_weight(graph.total_weight())));
        ui.label(if graph.is_directed() { "Directed" } else { "Undirected" });

        ui.separator();
        ui.label(RichText::new("Hovered").strong());
        let tooltip = self
            .hover
            .and_then(|focus| self.diagram.controller().tooltip(focus));
        match tooltip {
            Some(tooltip) => {
                for line in tooltip.lines() {
                    ui.monospace(line);
                }
            }
            None => {
                ui.label("Hover a node, link or ribbon.");
            }
        }

        ui.separator();
        ui.horizontal(|ui| {
            ui.label(RichText::new("Clicks").strong());
            if ui.small_button("Clear").clicked() {
                self.click_log.borrow_mut().clear();
            }
        });
        let log = self.click_log.borrow();
        if log.is_empty() {
            ui.label("Click a node or link to emit a filter event.");
            return;
        }
        egui::ScrollArea::vertical()
            .id_salt("click_log_scroll")
            .max_height(280.0)
            .auto_shrink([false, false])
            .stick_to_bottom(true)
            .show_rows(ui, 18.0, log.len(), |ui, row_range| {
                for index in row_range {
                    if let Some(entry) = log.get(index) {
                        ui.monospace(entry.as_str());
                    }
                }
            });
    }
}
