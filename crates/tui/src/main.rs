mod app;

use anyhow::Result;
use std::fs::{self, OpenOptions};

use tokio::sync::mpsc;
use tracing_subscriber::{prelude::*, EnvFilter};
use vqtui_core::{
    config::{self, AppConfig},
    dataset::{DatasetLoader, DatasetSource, DatasetStore},
    featured::FeaturedResolver,
    prefs::Preferences,
};

#[tokio::main]
async fn main() -> Result<()> {
    init_logging()?;

    config::ensure_default_config()?;
    let config = AppConfig::load()?;
    let prefs = Preferences::load_or_default();

    let source = match &config.dataset_url {
        Some(url) => DatasetSource::Url(url.clone()),
        None => DatasetSource::File(config.dataset_path.clone()),
    };
    let loader = DatasetLoader::new(source);
    let store = DatasetStore::new();

    let featured_rx = if config.featured_enabled {
        let resolver = FeaturedResolver::new(config.featured_routes(), config.featured_timeout());
        let (featured_tx, featured_rx) = mpsc::channel(1);
        tokio::spawn(resolver.run(featured_tx));
        Some(featured_rx)
    } else {
        None
    };

    let mut app = app::VqApp::new(store, loader, config, prefs);
    if let Some(rx) = featured_rx {
        app.attach_featured(rx);
    }
    app.run().await
}

fn init_logging() -> Result<()> {
    let log_dir = std::env::current_dir()?.join("logs");
    fs::create_dir_all(&log_dir)?;
    let log_path = log_dir.join("vqtui.log");

    let env_filter = EnvFilter::from_default_env();

    let file_layer = tracing_subscriber::fmt::layer()
        .with_target(true)
        .compact()
        .with_writer(move || {
            OpenOptions::new()
                .create(true)
                .append(true)
                .open(&log_path)
                .expect("failed to open log file")
        });

    tracing_subscriber::registry()
        .with(env_filter)
        .with(file_layer)
        .init();

    Ok(())
}
