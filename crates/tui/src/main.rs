mod app;

use anyhow::{Context, Result};
use std::{
    fs::{self, OpenOptions},
    sync::Mutex,
};

use pokedex_core::{
    config::{self, AppConfig},
    CatalogClient, SessionStore,
};
use tracing_subscriber::{prelude::*, EnvFilter};

#[tokio::main]
async fn main() -> Result<()> {
    init_logging()?;

    config::ensure_default_config()?;
    let config = AppConfig::load()?;
    tracing::info!(
        api_url = %config.api_url,
        page_limit = config.page_limit,
        "configuration loaded"
    );

    let session = SessionStore::open(config.session_path());
    let client = CatalogClient::new(&config, session.clone())?;

    let mut app = app::PokedexApp::new(client, session, config.page_limit);
    app.run().await
}

// The terminal belongs to the UI, so logs only go to a file.
fn init_logging() -> Result<()> {
    let log_dir = config::data_dir().join("logs");
    fs::create_dir_all(&log_dir)
        .with_context(|| format!("failed to create {}", log_dir.display()))?;
    let log_path = log_dir.join("pokedex.log");
    let log_file = OpenOptions::new()
        .create(true)
        .append(true)
        .open(&log_path)
        .with_context(|| format!("failed to open {}", log_path.display()))?;

    let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));

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
