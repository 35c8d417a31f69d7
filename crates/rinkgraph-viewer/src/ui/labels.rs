use bevy::prelude::Res;
use bevy_egui::{egui, EguiContexts};

use crate::app::resources::{EngineRes, ViewerState};

const LABEL_LIFT: f32 = 10.0;

/// Badges above connected players, positioned by the engine's projector.
pub fn labels_overlay(mut contexts: EguiContexts, engine: Res<EngineRes>, st: Res<ViewerState>) {
    if !st.cfg.show_labels {
        return;
    }
    let Some(out) = engine.0.output() else {
        return;
    };
    let hovered = out.hover.as_ref().map(|h| h.index);

    let painter = contexts.ctx_mut().layer_painter(egui::LayerId::new(
        egui::Order::Background,
        egui::Id::new("node_labels"),
    ));
    for label in &out.labels {
        let color = if out.selected == Some(label.index) {
            egui::Color32::from_rgb(255, 220, 90)
        } else if hovered == Some(label.index) {
            egui::Color32::WHITE
        } else {
            egui::Color32::from_gray(190)
        };
        painter.text(
            egui::pos2(label.x, label.y - LABEL_LIFT),
            egui::Align2::CENTER_BOTTOM,
            &label.text,
            egui::FontId::proportional(12.0),
            color,
        );
    }
}
