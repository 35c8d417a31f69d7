mod app;
mod render;
mod ui;
mod util;

use anyhow::Result;
use bevy::prelude::*;
use bevy_egui::EguiPlugin;
use rinkgraph_engine::util::{config as engine_config, demo, games};

use app::RinkGraphViewerPlugin;

fn main() -> Result<()> {
    let args = util::args::parse_args()?;
    let viewer_cfg = util::config::load_or_default();
    let engine_cfg = match &args.engine_config {
        Some(path) => engine_config::load_or_default_from_path(path),
        None => engine_config::load_or_default(),
    };
    let games = match (&args.games, args.demo) {
        (Some(path), _) => games::load_games(path)?,
        (None, count) => demo::demo_games(count.unwrap_or(viewer_cfg.demo_games), args.seed),
    };

    App::new()
        .add_plugins(DefaultPlugins.set(WindowPlugin {
            primary_window: Some(Window {
                title: "RinkGraph".into(),
                ..default()
            }),
            ..default()
        }))
        .add_plugins(EguiPlugin)
        .add_plugins(RinkGraphViewerPlugin {
            games,
            engine_cfg,
            viewer_cfg,
            seed: args.seed,
        })
        .run();
    Ok(())
}
