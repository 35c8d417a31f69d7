use bevy::prelude::*;
use rinkgraph_core::Game;
use rinkgraph_engine::{Engine, EngineConfig};

use crate::app::resources::{EngineRes, ViewerState};
use crate::util::config::ViewerConfig;

pub mod input;
pub mod resources;

pub struct RinkGraphViewerPlugin {
    pub games: Vec<Game>,
    pub engine_cfg: EngineConfig,
    pub viewer_cfg: ViewerConfig,
    pub seed: u64,
}

impl Plugin for RinkGraphViewerPlugin {
    fn build(&self, app: &mut App) {
        let engine = Engine::init(&self.games, self.engine_cfg.clone(), self.seed);
        let [r, g, b] = self.viewer_cfg.background;
        app.insert_resource(EngineRes(engine))
            .insert_resource(ViewerState::new(self.viewer_cfg.clone()))
            .insert_resource(ClearColor(Color::srgb(r, g, b)))
            .add_systems(
                Startup,
                (
                    crate::render::setup_scene,
                    crate::render::spawn_nodes,
                    input::sync_viewport,
                ),
            )
            .add_systems(
                Update,
                (
                    crate::ui::handle_shortcuts,
                    input::forward_input,
                    tick_engine,
                    crate::render::sync_camera,
                    crate::render::update_nodes,
                    crate::render::draw_links,
                    crate::ui::labels_overlay,
                    crate::ui::tooltip_overlay,
                    crate::ui::hud_overlay,
                    crate::ui::ui_panel,
                    crate::ui::help_overlay,
                )
                    .chain(),
            )
            .add_systems(Last, dispose_on_exit);
    }
}

fn tick_engine(time: Res<Time>, mut engine: ResMut<EngineRes>, mut st: ResMut<ViewerState>) {
    let dt = time.delta_seconds();
    st.record_frame(dt);
    engine.0.tick(dt);
}

fn dispose_on_exit(mut exits: EventReader<AppExit>, mut engine: ResMut<EngineRes>) {
    if exits.read().next().is_some() {
        engine.0.dispose();
    }
}
