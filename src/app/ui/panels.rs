use eframe::egui::{self, Align, Context, Layout};

use relviz::Layout as DiagramLayout;

use super::super::{Source, ViewModel};

impl ViewModel {
    pub(in crate::app) fn show(
        &mut self,
        ctx: &Context,
        source: &Source,
        reload_requested: &mut bool,
        is_loading: bool,
    ) {
        if self.diagram_dirty {
            self.rebuild_diagram();
        }

        egui::TopBottomPanel::top("top_bar")
            .resizable(false)
            .show(ctx, |ui| {
                ui.horizontal(|ui| {
                    ui.heading("relviz");
                    ui.separator();
                    ui.label(format!("relations: {}", source.relations.display()));
                    if let Some(config) = &source.config {
                        ui.label(format!("config: {}", config.display()));
                    }
                    ui.label(format!("layout: {}", self.diagram.kind().label()));
                    ui.label(format!("nodes: {}", self.diagram.graph.nodes().len()));
                    ui.label(format!("edges: {}", self.diagram.graph.edges().len()));
                    let reload_button =
                        ui.add_enabled(!is_loading, egui::Button::new("Reload data"));
                    if reload_button.clicked() {
                        *reload_requested = true;
                    }
                    if ui.button("Redraw").clicked() {
                        self.diagram_dirty = true;
                    }
                    ui.with_layout(Layout::right_to_left(Align::Center), |ui| {
                        if let Some(status) = self.simulation_status_text() {
                            ui.label(status);
                        }
                    });
                });
            });

        egui::SidePanel::left("controls")
            .resizable(true)
            .default_width(300.0)
            .show(ctx, |ui| self.draw_controls(ui));

        egui::SidePanel::right("details")
            .resizable(true)
            .default_width(320.0)
            .show(ctx, |ui| self.draw_details(ui));

        egui::CentralPanel::default().show(ctx, |ui| {
            if is_loading {
                ui.vertical_centered(|ui| {
                    ui.add_space(120.0);
                    ui.heading("Reloading relations...");
                    ui.add_space(8.0);
                    ui.spinner();
                });
            } else {
                self.draw_canvas(ui);
            }
        });
    }

    fn simulation_status_text(&self) -> Option<String> {
        let DiagramLayout::Network(layout) = &self.diagram.layout else {
            return None;
        };
        let simulation = layout.simulation();
        Some(if simulation.is_settled() {
            format!("settled after {} ticks", simulation.ticks())
        } else {
            format!("alpha {:.3} | tick {}", simulation.alpha(), simulation.ticks())
        })
    }
}
