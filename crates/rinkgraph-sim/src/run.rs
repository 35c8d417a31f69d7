use rinkgraph_core::Game;
use rinkgraph_engine::{Engine, EngineConfig, FrameOutput};
use serde::Serialize;

/// Fixed step used for headless runs.
pub const FRAME_DT: f32 = 1.0 / 60.0;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RunSummary {
    pub games: usize,
    pub nodes: usize,
    pub players: usize,
    pub fillers: usize,
    pub edges: usize,
    pub dropped: usize,
    pub frames: u64,
    pub visible_segments: usize,
    pub active_links: usize,
    pub mean_energy: f32,
    pub mean_target_distance: f32,
    pub max_speed: f32,
}

/// Runs `frames` fixed steps and returns the summary plus the last frame.
pub fn simulate(games: &[Game], cfg: EngineConfig, seed: u64, frames: u32) -> (RunSummary, FrameOutput) {
    let mut engine = Engine::init(games, cfg, seed);
    let mut last = FrameOutput::default();
    for _ in 0..frames {
        if let Some(out) = engine.tick(FRAME_DT) {
            last.clone_from(out);
        }
    }

    let nodes = engine.nodes();
    let players: Vec<_> = nodes.nodes.iter().filter(|n| !n.is_filler).collect();
    let mean = |sum: f32| {
        if players.is_empty() {
            0.0
        } else {
            sum / players.len() as f32
        }
    };
    let mean_energy = mean(players.iter().map(|n| n.energy).sum());
    let mean_target_distance = mean(
        players
            .iter()
            .map(|n| n.position.distance(n.cluster_target))
            .sum(),
    );
    let max_speed = nodes.nodes.iter().map(|n| n.speed()).fold(0.0, f32::max);

    let report = engine.report();
    let summary = RunSummary {
        games: games.len(),
        nodes: nodes.len(),
        players: report.players,
        fillers: report.fillers,
        edges: report.edges,
        dropped: report.dropped_capacity + report.dropped_roster,
        frames: engine.frame(),
        visible_segments: last.stats.visible_segments,
        active_links: last.stats.active_links,
        mean_energy,
        mean_target_distance,
        max_speed,
    };
    engine.dispose();
    (summary, last)
}
