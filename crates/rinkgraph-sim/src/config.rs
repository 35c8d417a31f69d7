use anyhow::{Context, Result};
use std::ffi::OsString;
use std::path::PathBuf;

pub const DEFAULT_FRAMES: u32 = 600;
pub const DEFAULT_DEMO_GAMES: usize = 4;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Source {
    File(PathBuf),
    Demo(usize),
}

#[derive(Debug, Clone)]
pub struct SimConfig {
    pub source: Source,
    pub frames: u32,
    pub seed: u64,
    pub config: Option<PathBuf>,
    pub dump_frame: Option<PathBuf>,
}

pub fn parse_args() -> Result<SimConfig> {
    parse_args_from(std::env::args_os().skip(1))
}

fn parse_number<T: std::str::FromStr>(flag: &str, value: Option<OsString>) -> Result<T>
where
    T::Err: std::error::Error + Send + Sync + 'static,
{
    let Some(value) = value else {
        anyhow::bail!("{flag} expects a number");
    };
    let value = value.to_string_lossy();
    value
        .parse()
        .with_context(|| format!("{flag}: invalid number {value:?}"))
}

fn parse_args_from<I>(args: I) -> Result<SimConfig>
where
    I: IntoIterator<Item = OsString>,
{
    let mut source = Source::Demo(DEFAULT_DEMO_GAMES);
    let mut frames = DEFAULT_FRAMES;
    let mut seed = 0;
    let mut config = None;
    let mut dump_frame = None;
    let mut args = args.into_iter();

    while let Some(arg) = args.next() {
        if arg == "--games" {
            let Some(path) = args.next() else {
                anyhow::bail!("--games expects a path");
            };
            source = Source::File(PathBuf::from(path));
        } else if arg == "--demo" {
            source = Source::Demo(parse_number("--demo", args.next())?);
        } else if arg == "--frames" {
            frames = parse_number("--frames", args.next())?;
        } else if arg == "--seed" {
            seed = parse_number("--seed", args.next())?;
        } else if arg == "--config" {
            let Some(path) = args.next() else {
                anyhow::bail!("--config expects a path");
            };
            config = Some(PathBuf::from(path));
        } else if arg == "--dump-frame" {
            let Some(path) = args.next() else {
                anyhow::bail!("--dump-frame expects a path");
            };
            dump_frame = Some(PathBuf::from(path));
        } else {
            anyhow::bail!("unknown argument: {:?}", arg);
        }
    }

    Ok(SimConfig {
        source,
        frames,
        seed,
        config,
        dump_frame,
    })
}
