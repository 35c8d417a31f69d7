use anyhow::{Context, Result};
use std::ffi::OsString;
use std::path::PathBuf;

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ViewerArgs {
    pub games: Option<PathBuf>,
    pub demo: Option<usize>,
    pub seed: u64,
    pub engine_config: Option<PathBuf>,
}

pub fn parse_args() -> Result<ViewerArgs> {
    parse_args_from(std::env::args_os().skip(1))
}

fn parse_args_from<I>(args: I) -> Result<ViewerArgs>
where
    I: IntoIterator<Item = OsString>,
{
    let mut out = ViewerArgs::default();
    let mut args = args.into_iter();

    while let Some(arg) = args.next() {
        if arg == "--games" {
            let Some(path) = args.next() else {
                anyhow::bail!("--games expects a path");
            };
            out.games = Some(PathBuf::from(path));
        } else if arg == "--demo" {
            let Some(value) = args.next() else {
                anyhow::bail!("--demo expects a game count");
            };
            let value = value.to_string_lossy();
            out.demo = Some(value.parse().with_context(|| format!("--demo: {value:?}"))?);
        } else if arg == "--seed" {
            let Some(value) = args.next() else {
                anyhow::bail!("--seed expects a number");
            };
            let value = value.to_string_lossy();
            out.seed = value.parse().with_context(|| format!("--seed: {value:?}"))?;
        } else if arg == "--config" {
            let Some(path) = args.next() else {
                anyhow::bail!("--config expects a path");
            };
            out.engine_config = Some(PathBuf::from(path));
        } else {
            anyhow::bail!("unknown argument: {:?}", arg);
        }
    }

    Ok(out)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_games_and_seed() {
        let args = ["--games", "tonight.json", "--seed", "12"].map(OsString::from);
        let parsed = parse_args_from(args).expect("args parsed");
        assert_eq!(parsed.games, Some(PathBuf::from("tonight.json")));
        assert_eq!(parsed.seed, 12);
        assert_eq!(parsed.demo, None);
    }

    #[test]
    fn rejects_missing_values() {
        assert!(parse_args_from([OsString::from("--demo")]).is_err());
        assert!(parse_args_from(["--demo", "x"].map(OsString::from)).is_err());
    }
}
