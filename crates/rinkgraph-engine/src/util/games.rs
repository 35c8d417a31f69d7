use anyhow::Context;
use rinkgraph_core::Game;
use std::fs;
use std::path::Path;

pub fn load_games(path: &Path) -> anyhow::Result<Vec<Game>> {
    let contents = fs::read_to_string(path)
        .with_context(|| format!("failed to read games file {}", path.display()))?;
    let games = rinkgraph_core::parse_games(&contents)
        .with_context(|| format!("failed to decode games file {}", path.display()))?;
    tracing::info!(path = %path.display(), games = games.len(), "games loaded");
    Ok(games)
}
