use bevy::prelude::Res;
use bevy_egui::{egui, EguiContexts};

use crate::app::resources::ViewerState;

pub fn help_overlay(mut contexts: EguiContexts, st: Res<ViewerState>) {
    if !st.help_open {
        return;
    }

    egui::Window::new("Help / Shortcuts")
        .collapsible(false)
        .resizable(false)
        .show(contexts.ctx_mut(), |ui| {
            ui.label("Left drag: orbit, right drag: pan, wheel: zoom");
            ui.label("Click: select player");
            ui.label("F: focus selected");
            ui.label("Esc: clear selection, close help");
            ui.label("E / T / L: toggle links, trails, labels");
            ui.label("?: toggle help");
        });
}
