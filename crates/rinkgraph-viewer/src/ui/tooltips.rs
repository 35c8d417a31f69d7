use bevy::prelude::Res;
use bevy_egui::{egui, EguiContexts};
use rinkgraph_core::Team;
use rinkgraph_engine::{Hover, Node};

use crate::app::resources::EngineRes;

pub fn render_tooltip(
    ctx: &egui::Context,
    id: &str,
    pos: egui::Pos2,
    lines: impl IntoIterator<Item = String>,
) {
    egui::Area::new(egui::Id::new(id))
        .order(egui::Order::Tooltip)
        .fixed_pos(pos)
        .show(ctx, |ui| {
            ui.group(|ui| {
                for line in lines {
                    ui.label(line);
                }
            });
        });
}

fn node_lines(hover: &Hover, node: &Node) -> Vec<String> {
    let team = match node.team {
        Team::Home => "home",
        Team::Away => "away",
    };
    vec![
        hover.label.clone(),
        format!("{} ({team})", hover.id),
        format!("{} cluster, period {}", node.theme.name(), node.period),
        format!(
            "connections: {} ({} in range)",
            node.num_connections(),
            node.active_connections
        ),
        format!("energy: {:.2}", node.energy),
    ]
}

pub fn tooltip_overlay(mut contexts: EguiContexts, engine: Res<EngineRes>) {
    let Some(hover) = engine.0.output().and_then(|out| out.hover.as_ref()) else {
        return;
    };
    let Some(node) = engine.0.nodes().get(hover.index) else {
        return;
    };
    let ctx = contexts.ctx_mut();
    let pos = ctx.input(|i| i.pointer.hover_pos().unwrap_or(egui::pos2(0.0, 0.0)))
        + egui::vec2(14.0, 14.0);
    render_tooltip(ctx, "tooltip_node", pos, node_lines(hover, node));
}
