mod config;
mod run;

use anyhow::{Context, Result};
use config::{parse_args, Source};
use rinkgraph_engine::util::{config as engine_config, demo, games};

fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .try_init();
}

fn main() -> Result<()> {
    init_tracing();
    let args = parse_args()?;

    let cfg = match &args.config {
        Some(path) => engine_config::load_or_default_from_path(path),
        None => engine_config::load_or_default(),
    };
    let games = match &args.source {
        Source::File(path) => games::load_games(path)?,
        Source::Demo(n) => demo::demo_games(*n, args.seed),
    };

    tracing::info!(games = games.len(), frames = args.frames, seed = args.seed, "starting headless run");
    let (summary, last) = run::simulate(&games, cfg, args.seed, args.frames);

    if let Some(path) = &args.dump_frame {
        let json = serde_json::to_string(&last).context("serialize frame")?;
        std::fs::write(path, json).with_context(|| format!("write {}", path.display()))?;
        tracing::info!(path = %path.display(), "last frame written");
    }

    println!(
        "{}",
        serde_json::to_string_pretty(&summary).context("serialize summary")?
    );
    Ok(())
}
