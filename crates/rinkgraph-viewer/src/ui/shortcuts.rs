use bevy::prelude::ResMut;
use bevy_egui::{egui, EguiContexts};

use crate::app::resources::{EngineRes, ViewerState};

pub fn handle_shortcuts(
    mut contexts: EguiContexts,
    mut engine: ResMut<EngineRes>,
    mut st: ResMut<ViewerState>,
) {
    let ctx = contexts.ctx_mut();
    if ctx.input(|i| i.key_pressed(egui::Key::Escape)) {
        st.help_open = false;
        engine.0.select(None);
    }

    if ctx.wants_keyboard_input() {
        return;
    }

    if ctx.input(|i| i.key_pressed(egui::Key::Questionmark)) {
        st.help_open = !st.help_open;
    }
    if ctx.input(|i| i.key_pressed(egui::Key::F)) {
        engine.0.focus_selected();
    }
    if ctx.input(|i| i.key_pressed(egui::Key::E)) {
        st.cfg.show_edges = !st.cfg.show_edges;
    }
    if ctx.input(|i| i.key_pressed(egui::Key::T)) {
        st.cfg.show_trails = !st.cfg.show_trails;
    }
    if ctx.input(|i| i.key_pressed(egui::Key::L)) {
        st.cfg.show_labels = !st.cfg.show_labels;
    }
}
