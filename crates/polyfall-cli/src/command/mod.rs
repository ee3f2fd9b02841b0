use std::path::PathBuf;

use anyhow::Context as _;
use clap::{Parser, Subcommand};
use log::LevelFilter;
use polyfall_engine::GameConfig;

use crate::util;

use self::play::PlayArg;

mod default_config;
mod play;

#[derive(Debug, Clone, Parser)]
#[command(author, version, about, long_about = None)]
pub struct CommandArgs {
    /// What mode to run the program in
    #[command(subcommand)]
    mode: Option<Mode>,
    #[clap(flatten)]
    common: CommonArg,
}

#[derive(Debug, Clone, clap::Args)]
struct CommonArg {
    /// Game configuration file (JSON); missing fields take their defaults
    #[clap(long, global = true)]
    config: Option<PathBuf>,
    /// Write logs to this file (logging is off without it)
    #[clap(long, global = true)]
    log_file: Option<PathBuf>,
    /// Maximum level written to the log file
    #[clap(long, global = true, default_value_t = LevelFilter::Info)]
    log_level: LevelFilter,
}

#[derive(Debug, Clone, Subcommand)]
enum Mode {
    /// Play in the terminal (default)
    Play(#[clap(flatten)] PlayArg),
    /// Print the default configuration as JSON
    DefaultConfig,
}

pub fn run() -> anyhow::Result<()> {
    let CommandArgs { mode, common } = CommandArgs::parse();

    if let Some(path) = &common.log_file {
        util::init_logging(path, common.log_level)?;
    }

    match mode.unwrap_or(Mode::Play(PlayArg::default())) {
        Mode::Play(arg) => {
            let config = load_config(&common)?;
            play::run(config, &arg)?;
        }
        Mode::DefaultConfig => default_config::run()?,
    }
    Ok(())
}

fn load_config(common: &CommonArg) -> anyhow::Result<GameConfig> {
    let Some(path) = &common.config else {
        return Ok(GameConfig::default());
    };
    let config: GameConfig = util::read_json_file("config", path)?;
    config
        .validate()
        .with_context(|| format!("Invalid config file: {}", path.display()))?;
    log::info!("loaded config from {}", path.display());
    Ok(config)
}
