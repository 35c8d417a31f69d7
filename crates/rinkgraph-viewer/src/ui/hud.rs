use bevy::prelude::Res;
use bevy_egui::{egui, EguiContexts};

use crate::app::resources::{EngineRes, ViewerState};
use crate::ui::HUD_EDGE_PADDING;

pub fn hud_overlay(mut contexts: EguiContexts, engine: Res<EngineRes>, st: Res<ViewerState>) {
    if !st.cfg.show_hud {
        return;
    }
    let Some(out) = engine.0.output() else {
        return;
    };
    let report = engine.0.report();
    let ctx = contexts.ctx_mut();
    let screen = ctx.screen_rect();

    egui::Area::new(egui::Id::new("hud"))
        .order(egui::Order::Foreground)
        .anchor(
            egui::Align2::RIGHT_TOP,
            egui::vec2(-HUD_EDGE_PADDING, HUD_EDGE_PADDING),
        )
        .show(ctx, |ui| {
            ui.set_max_width(screen.width() * 0.4);
            ui.group(|ui| {
                ui.label(format!("FPS: {:.0}", st.fps));
                ui.label(format!(
                    "Nodes: {} ({} players / {} fillers)",
                    out.stats.live_nodes, report.players, report.fillers
                ));
                ui.label(format!(
                    "Links: {} visible / {} total",
                    out.stats.visible_segments, report.edges
                ));
                ui.label(format!("Springs active: {}", out.stats.active_links));
                ui.label(format!("Frame: {}", out.stats.frame));
                if report.dropped_capacity > 0 {
                    ui.label(format!("Dropped at capacity: {}", report.dropped_capacity));
                }
                if let Some(node) = out.selected.and_then(|idx| engine.0.nodes().get(idx)) {
                    ui.label(format!("Selected: {}", node.label));
                }
            });
        });
}
