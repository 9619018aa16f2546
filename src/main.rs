use std::fs::File;
use std::path::PathBuf;
use std::sync::Mutex;

use anyhow::{Context, Result};
use berry_snake::{app, config, GameConfig};
use clap::Parser;

#[derive(Parser)]
#[command(name = "berry-snake")]
#[command(version, about = "Snake in the terminal")]
struct Cli {
    /// Seed for berry placement and respawns
    #[arg(long)]
    seed: Option<u64>,

    /// Chance per frame that an eaten berry respawns
    #[arg(long, default_value_t = config::RESPAWN_CHANCE)]
    respawn_chance: f64,

    /// Multiplier for the time between frames
    #[arg(long, default_value_t = 1.0, value_parser = config::parse_speed_scale)]
    speed_scale: f64,

    /// Write logs to this file (the screen is taken by the game)
    #[arg(long)]
    log_file: Option<PathBuf>,
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    if let Some(path) = &cli.log_file {
        let file = File::create(path)
            .with_context(|| format!("creating log file {}", path.display()))?;

        tracing_subscriber::fmt()
            .with_env_filter(
                tracing_subscriber::EnvFilter::try_from_default_env()
                    .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("berry_snake=debug")),
            )
            .with_writer(Mutex::new(file))
            .with_ansi(false)
            .init();
    }

    let config = GameConfig {
        respawn_chance: cli.respawn_chance,
        speed_scale: cli.speed_scale,
        seed: cli.seed,
    };
    tracing::info!(?config, "starting");

    app::run(config)
}
