mod app;

use anyhow::{Context, Result};
use std::{
    fs::{self, OpenOptions},
    sync::Mutex,
};

use loadout_core::{
    config::{self, AppConfig},
    resource::{spawn_loads, FeedLoader},
    session::LoadoutSession,
};
use tokio::sync::mpsc;
use tracing::info;
use tracing_subscriber::{prelude::*, EnvFilter};

#[tokio::main]
async fn main() -> Result<()> {
    config::ensure_default_config()?;
    let config = AppConfig::load()?;
    init_logging(&config)?;
    info!(seed = ?config.rng_seed, "Starting loadout builder");

    let loader = FeedLoader::new(config.clone())?;
    let (load_tx, load_rx) = mpsc::channel(8);
    spawn_loads(loader, config.rng_seed, load_tx);

    let mut app = app::LoadoutApp::new(LoadoutSession::new(config.rng_seed));
    app.attach_loads(load_rx);
    app.run().await
}

fn init_logging(config: &AppConfig) -> Result<()> {
    let log_dir = config.log_dir()?;
    fs::create_dir_all(&log_dir)
        .with_context(|| format!("failed to create log directory {}", log_dir.display()))?;
    let log_path = log_dir.join("loadout.log");
    let log_file = OpenOptions::new()
        .create(true)
        .append(true)
        .open(&log_path)
        .with_context(|| format!("failed to open log file {}", log_path.display()))?;

    let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));

    // stdout belongs to the alternate screen.
    let file_layer = tracing_subscriber::fmt::layer()
        .with_target(true)
        .with_ansi(false)
        .compact()
        .with_writer(Mutex::new(log_file));

    tracing_subscriber::registry()
        .with(env_filter)
        .with(file_layer)
        .init();

    Ok(())
}
