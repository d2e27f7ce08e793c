use eframe::egui::{self, Ui};

use relviz::Layout as DiagramLayout;
use relviz::color::ColorCode;
use relviz::config::{LayoutKind, PanelConfig, SizeMode, TooltipConfig, TooltipMode};
use relviz::sort::{SortKey, SortOrder, SortPolicy};

use super::super::ViewModel;

const SORT_KEYS: [(SortKey, &str); 5] = [
    (SortKey::Label, "Label"),
    (SortKey::Value, "Value"),
    (SortKey::LinkCount, "Links"),
    (SortKey::Outgoing, "Outgoing"),
    (SortKey::Incoming, "Incoming"),
];

fn sort_key_label(key: SortKey) -> &'static str {
    SORT_KEYS
        .iter()
        .find(|(candidate, _)| *candidate == key)
        .map(|(_, label)| *label)
        .unwrap_or("Other")
}

fn sort_policy_ui(ui: &mut Ui, id: &str, policy: &mut SortPolicy) -> bool {
    let mut changed = false;
    ui.horizontal(|ui| {
        egui::ComboBox::from_id_salt(id)
            .selected_text(sort_key_label(policy.key))
            .show_ui(ui, |ui| {
                for (key, label) in SORT_KEYS {
                    changed |= ui.selectable_value(&mut policy.key, key, label).changed();
                }
            });
        changed |= ui
            .selectable_value(&mut policy.order, SortOrder::Ascending, "asc")
            .changed();
        changed |= ui
            .selectable_value(&mut policy.order, SortOrder::Descending, "desc")
            .changed();
    });
    changed
}

fn size_mode_ui(ui: &mut Ui, mode: &mut SizeMode) -> bool {
    let mut changed = false;
    ui.horizontal(|ui| {
        changed |= ui
            .selectable_value(mode, SizeMode::Outgoing, "Outgoing")
            .on_hover_text("Size by the sum of outgoing weights.")
            .changed();
        changed |= ui
            .selectable_value(mode, SizeMode::Incoming, "Incoming")
            .on_hover_text("Size by the sum of incoming weights.")
            .changed();
    });
    changed
}

fn color_code_ui(ui: &mut Ui, code: &mut ColorCode) -> bool {
    let mut changed = false;
    ui.horizontal(|ui| {
        changed |= ui.selectable_value(code, ColorCode::Colored, "Colored").changed();
        changed |= ui
            .selectable_value(code, ColorCode::BlackWhite, "Black & white")
            .changed();
    });
    changed
}

fn tooltip_ui(ui: &mut Ui, tooltip: &mut TooltipConfig) -> bool {
    let mut changed = false;
    ui.horizontal(|ui| {
        for (mode, label) in [
            (TooltipMode::Movable, "Follow"),
            (TooltipMode::Static, "Corner"),
            (TooltipMode::None, "Off"),
        ] {
            changed |= ui.selectable_value(&mut tooltip.mode, mode, label).changed();
        }
    });
    ui.label("Tooltip rows");
    changed |= sort_policy_ui(ui, "tooltip_sort", &mut tooltip.sort);
    changed
}

impl ViewModel {
    pub(in crate::app) fn draw_controls(&mut self, ui: &mut Ui) {
        ui.heading("Diagram Controls");
        ui.separator();
        ui.add_space(4.0);

        let mut changed = false;

        ui.label("Search labels")
            .on_hover_text("Fuzzy-highlight matching nodes without changing the layout.");
        ui.text_edit_singleline(&mut self.search);

        ui.separator();

        let current = self.config.kind();
        let mut kind = current;
        ui.horizontal(|ui| {
            for option in [LayoutKind::Chord, LayoutKind::Hive, LayoutKind::Network] {
                ui.selectable_value(&mut kind, option, option.label());
            }
        });
        if kind != current {
            self.config = PanelConfig::default_for(kind);
            self.pan = egui::Vec2::ZERO;
            self.zoom = 1.0;
            changed = true;
        }

        ui.separator();

        match &mut self.config {
            PanelConfig::Chord(config) => {
                changed |= ui.checkbox(&mut config.directed, "Directed").changed();
                ui.label("Segment size");
                changed |= size_mode_ui(ui, &mut config.segment_size);

                let mut sorted = config.sorting.is_some();
                if ui.checkbox(&mut sorted, "Sort segments").changed() {
                    config.sorting = sorted.then(SortPolicy::default);
                    changed = true;
                }
                if let Some(policy) = config.sorting.as_mut() {
                    changed |= sort_policy_ui(ui, "chord_sort", policy);
                }

                changed |= ui
                    .add(egui::Slider::new(&mut config.padding, 0.0..=0.3).text("Padding"))
                    .changed();
            }
            PanelConfig::Hive(config) => {
                ui.label("Link colors");
                changed |= color_code_ui(ui, &mut config.color_code);
                changed |= ui
                    .add(egui::Slider::new(&mut config.inner_radius, 0.0..=200.0).text("Inner radius"))
                    .changed();
                changed |= ui
                    .add(egui::Slider::new(&mut config.outer_radius, 100.0..=600.0).text("Outer radius"))
                    .changed();
            }
            PanelConfig::Network(config) => {
                changed |= ui.checkbox(&mut config.directed, "Directed").changed();
                ui.label("Node size");
                changed |= size_mode_ui(ui, &mut config.node_size);
                ui.label("Node colors");
                changed |= color_code_ui(ui, &mut config.color_code);

                ui.collapsing("Forces", |ui| {
                    changed |= ui
                        .add(
                            egui::Slider::new(&mut config.charge, -600.0..=0.0)
                                .text("Charge")
                                .clamping(egui::SliderClamping::Always),
                        )
                        .on_hover_text("Node repulsion; more negative pushes harder.")
                        .changed();
                    changed |= ui
                        .add(egui::Slider::new(&mut config.link_distance, 10.0..=400.0).text("Link distance"))
                        .changed();
                    changed |= ui
                        .add(egui::Slider::new(&mut config.gravity, 0.0..=1.0).text("Gravity"))
                        .changed();
                });
            }
        }

        ui.separator();
        ui.label("Tooltip");
        changed |= tooltip_ui(ui, self.config.tooltip_mut());

        if let DiagramLayout::Network(layout) = &mut self.diagram.layout {
            ui.separator();
            ui.checkbox(&mut self.live_simulation, "Live simulation")
                .on_hover_text("Advance the force simulation every frame.");
            if ui.button("Re-run simulation").clicked() {
                layout.reheat();
            }
        }

        if changed {
            self.diagram_dirty = true;
        }
    }
}
