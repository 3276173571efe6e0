use anyhow::Result;
use clap::Parser;
use log::info;
use simplelog::LevelFilter;
use snake_game::game::{GameConfig, GameEngine};
use snake_game::logging;
use snake_game::modes::PlayMode;
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "snake")]
#[command(version, about = "Classic snake in the terminal")]
struct Cli {
    /// Seed for food placement; a random seed is used when omitted
    #[arg(long)]
    seed: Option<u64>,

    /// File that receives the game log
    #[arg(long, default_value = "snake.log")]
    log_file: PathBuf,

    /// Minimum level written to the log file (off, error, warn, info, debug, trace)
    #[arg(long, default_value = "info")]
    log_level: LevelFilter,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    logging::init(&cli.log_file, cli.log_level)?;
    info!("starting snake {}", env!("CARGO_PKG_VERSION"));

    let config = GameConfig::default();
    info!("config: {}", config.summary()?);
    let engine = match cli.seed {
        Some(seed) => {
            info!("using seed {}", seed);
            GameEngine::with_seed(config, seed)
        }
        None => GameEngine::new(config),
    };

    let mut play_mode = PlayMode::new(engine);
    play_mode.run().await?;

    info!("shutdown complete");
    Ok(())
}
