use bevy::prelude::ResMut;
use bevy_egui::{egui, EguiContexts};

use crate::app::resources::{EngineRes, ViewerState};
use crate::util::config;

pub fn ui_panel(
    mut contexts: EguiContexts,
    mut engine: ResMut<EngineRes>,
    mut st: ResMut<ViewerState>,
) {
    egui::Window::new("RinkGraph")
        .default_pos(egui::pos2(12.0, 12.0))
        .resizable(false)
        .show(contexts.ctx_mut(), |ui| {
            ui.horizontal(|ui| {
                ui.checkbox(&mut st.cfg.show_edges, "Links");
                ui.checkbox(&mut st.cfg.show_trails, "Trails");
                ui.checkbox(&mut st.cfg.show_labels, "Labels");
                ui.checkbox(&mut st.cfg.show_hud, "HUD");
            });
            ui.add(egui::Slider::new(&mut st.cfg.node_radius, 0.2..=2.0).text("node radius"));
            ui.add(egui::Slider::new(&mut st.cfg.trail_alpha, 0.0..=1.0).text("trail opacity"));

            ui.separator();
            let selected = engine
                .0
                .selected()
                .and_then(|idx| engine.0.nodes().get(idx))
                .map(|node| node.label.clone());
            match selected {
                Some(label) => {
                    ui.label(format!("Selected: {label}"));
                    ui.horizontal(|ui| {
                        if ui.button("Focus").clicked() {
                            engine.0.focus_selected();
                        }
                        if ui.button("Clear").clicked() {
                            engine.0.select(None);
                        }
                    });
                }
                None => {
                    ui.label("Selected: (none), click a player");
                }
            }

            ui.separator();
            if ui.button("Save view settings").clicked() {
                st.status = Some(match config::save(&st.cfg) {
                    Ok(()) => "settings saved".to_string(),
                    Err(err) => {
                        tracing::warn!(%err, "failed to save viewer config");
                        format!("save failed: {err:#}")
                    }
                });
            }
            if let Some(status) = &st.status {
                ui.label(status.as_str());
            }
            if ui.button("Help (?)").clicked() {
                st.help_open = !st.help_open;
            }
        });
}
