mod app;
mod config;
mod palette;
mod render;

use std::path::PathBuf;

use anyhow::Result;
use clap::Parser;
use env_logger::Env;
use log::info;
use twenty48_board::session::Game;

use config::Config;

#[derive(Debug, Parser)]
#[command(author, version, about = "Play 2048 in the terminal")]
struct Cli {
    /// Path to a TOML configuration file
    #[arg(long, value_name = "FILE", value_parser = clap::value_parser!(PathBuf))]
    config: Option<PathBuf>,

    /// Seed for tile spawns (overrides the config file)
    #[arg(long, value_name = "N")]
    seed: Option<u64>,

    /// Replay comma-separated key names (e.g. "w,a,ArrowDown") and print the final board
    #[arg(long, value_name = "KEYS")]
    moves: Option<String>,
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    // Keep stderr quiet while the interactive screen owns the terminal.
    let filter = if cli.moves.is_some() { "info" } else { "warn" };
    env_logger::Builder::from_env(Env::default().default_filter_or(filter)).init();

    let mut config = match &cli.config {
        Some(path) => {
            info!("Using configuration file: {}", path.display());
            Config::from_toml(path)?
        }
        None => Config::default(),
    };
    if cli.seed.is_some() {
        config.seed = cli.seed;
    }

    let game = match config.seed {
        Some(seed) => Game::from_seed(config.size, seed),
        None => Game::from_entropy(config.size),
    };

    let game = match cli.moves.as_deref() {
        Some(keys) => {
            let game = app::replay(game, keys);
            println!("{}", game.grid());
            game
        }
        None => app::run(&config, game)?,
    };
    info!(
        "Finished: {} effective moves, highest tile {}",
        game.moves(),
        game.grid().highest_tile()
    );
    Ok(())
}
