use polyfall_engine::{GameConfig, PieceSeed};

use crate::{command::play::app::PlayApp, tui::Tui};

mod app;
mod keymap;

#[derive(Default, Debug, Clone, clap::Args)]
pub(crate) struct PlayArg {
    /// Open the title menu instead of starting right away
    #[clap(long)]
    pub(crate) menu: bool,
    /// Piece seed (32 hex digits), overriding the configuration
    #[clap(long)]
    pub(crate) seed: Option<PieceSeed>,
}

pub(crate) fn run(mut config: GameConfig, arg: &PlayArg) -> anyhow::Result<()> {
    if let Some(seed) = arg.seed {
        config.seed = Some(seed);
    }

    let tui = Tui::new();
    let mut app = PlayApp::new(config, arg.menu, tui.now_ms());
    tui.run(&mut app)
}
