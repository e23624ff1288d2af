use std::fs::File;
use std::sync::Mutex;

use anyhow::{Context, Result};
use clap::Parser;
use tracing_subscriber::EnvFilter;

use snek_arena::game::Game;
use snek_arena::CliArgs;

fn main() -> Result<()> {
    let args = CliArgs::parse();
    let config = args.resolve()?;

    // The terminal belongs to the game, so logs go to a file.
    let log_path = args.log_path();
    let log_file = File::create(&log_path)
        .with_context(|| format!("failed to create log file {}", log_path.display()))?;
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(Mutex::new(log_file))
        .with_ansi(false)
        .init();

    let mut game = Game::new(config);
    game.run()?;
    Ok(())
}
