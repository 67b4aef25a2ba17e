//! AbyssStats - Minecraft player statistics dashboard
//!
//! Architecture:
//! - SeaORM for the stat store (SQLite)
//! - Reqwest client polling the game server's command API
//! - Axum for the dashboard HTTP API with rate limiting
//! - Tokio for async runtime

mod catalog;
mod entity;
mod error;
mod game;
mod ingest;
mod plugins;
mod prelude;
mod state;
mod sv;
mod view;

use std::sync::Arc;

use tracing_subscriber::{
  EnvFilter, layer::SubscriberExt, util::SubscriberInitExt,
};

use crate::{
  plugins::App,
  prelude::*,
  state::{AppState, Config},
};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
  dotenvy::dotenv().ok();

  tracing_subscriber::registry()
    .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| {
      "abyss_stats=debug,tower_http=debug,sea_orm=warn".into()
    }))
    .with(tracing_subscriber::fmt::layer())
    .init();

  let config = Config::from_env().context("Invalid configuration")?;

  info!("Starting AbyssStats v{}", env!("CARGO_PKG_VERSION"));

  let mut app = App::new();
  if config.ingest_enabled {
    app = app.register(plugins::poller::Ingest);
  }
  if config.server_enabled {
    app = app.register(plugins::server::Plugin);
  }

  if app.is_empty() {
    warn!("Both INGEST_ENABLED and SERVER_ENABLED are off, nothing to run");
    return Ok(());
  }

  let state = Arc::new(AppState::new(config).await?);
  app.run(state).await;

  Ok(())
}
