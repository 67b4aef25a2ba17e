use std::{env, path::PathBuf, str::FromStr};

use migration::{Migrator, MigratorTrait};
use sea_orm::DatabaseConnection;

use crate::{
  catalog::Catalog,
  game::{CommandApi, GameServer},
  ingest::Poller,
  prelude::*,
  sv,
  view::ThemeMode,
};

#[derive(Debug, Clone)]
pub struct Config {
  pub database_url: String,
  pub port: u16,
  pub game_api_url: String,
  pub poll_interval: Duration,
  pub request_timeout: Duration,
  pub catalog_dir: PathBuf,
  pub ingest_enabled: bool,
  pub server_enabled: bool,
  pub theme: ThemeMode,
}

impl Default for Config {
  fn default() -> Self {
    Self {
      database_url: String::from("sqlite:stats.db?mode=rwc"),
      port: 8050,
      game_api_url: String::from("http://localhost:8081"),

      poll_interval: Duration::from_secs(60 * 60),
      request_timeout: Duration::from_secs(10),
      catalog_dir: PathBuf::from("./data"),

      ingest_enabled: true,
      server_enabled: true,
      theme: ThemeMode::Light,
    }
  }
}

impl Config {
  pub fn from_env() -> anyhow::Result<Self> {
    Self::from_lookup(|key| env::var(key).ok())
  }

  /// Unset keys keep their default
  pub fn from_lookup(
    lookup: impl Fn(&str) -> Option<String>,
  ) -> anyhow::Result<Self> {
    let mut config = Self::default();

    if let Some(url) = lookup("DATABASE_URL") {
      config.database_url = url;
    }
    if let Some(port) = lookup("PORT") {
      config.port = port.parse().context("Invalid PORT")?;
    }
    if let Some(url) = lookup("GAME_API_URL") {
      config.game_api_url = url;
    }
    if let Some(interval) = lookup("POLL_INTERVAL") {
      config.poll_interval = humantime::parse_duration(&interval)
        .context("Invalid POLL_INTERVAL")?;
    }
    if let Some(timeout) = lookup("REQUEST_TIMEOUT") {
      config.request_timeout = humantime::parse_duration(&timeout)
        .context("Invalid REQUEST_TIMEOUT")?;
    }
    if let Some(dir) = lookup("CATALOG_DIR") {
      config.catalog_dir = PathBuf::from(dir);
    }
    if let Some(flag) = lookup("INGEST_ENABLED") {
      config.ingest_enabled = parse_flag(&flag).context("Invalid INGEST_ENABLED")?;
    }
    if let Some(flag) = lookup("SERVER_ENABLED") {
      config.server_enabled = parse_flag(&flag).context("Invalid SERVER_ENABLED")?;
    }
    if let Some(theme) = lookup("DASHBOARD_THEME") {
      config.theme =
        ThemeMode::from_str(&theme).context("Invalid DASHBOARD_THEME")?;
    }

    if config.poll_interval.is_zero() {
      anyhow::bail!("POLL_INTERVAL must be positive");
    }

    Ok(config)
  }
}

fn parse_flag(value: &str) -> anyhow::Result<bool> {
  match value.trim().to_ascii_lowercase().as_str() {
    "1" | "true" | "yes" | "on" => Ok(true),
    "0" | "false" | "no" | "off" => Ok(false),
    other => anyhow::bail!("expected a boolean, got `{other}`"),
  }
}

pub struct Services<'a> {
  pub players: sv::Players<'a>,
  pub stats: sv::Stats<'a>,
}

pub struct AppState {
  pub db: DatabaseConnection,
  pub game: Arc<dyn GameServer>,
  pub catalog: Arc<Catalog>,
  pub config: Config,
}

impl AppState {
  pub async fn new(config: Config) -> anyhow::Result<Self> {
    let catalog = Catalog::load(&config.catalog_dir)
      .context("Failed to load stat catalog")?;
    let game = CommandApi::new(&config.game_api_url, config.request_timeout)
      .context("Failed to build game server client")?;

    Self::with_parts(config, Arc::new(game), catalog).await
  }

  pub async fn with_parts(
    config: Config,
    game: Arc<dyn GameServer>,
    catalog: Catalog,
  ) -> anyhow::Result<Self> {
    info!("Connecting to database...");
    let db = Database::connect(&config.database_url)
      .await
      .context("Failed to connect to database")?;

    info!("Running migrations...");
    Migrator::up(&db, None).await.context("Failed to run migrations")?;

    Ok(Self { db, game, catalog: Arc::new(catalog), config })
  }

  pub fn sv(&self) -> Services<'_> {
    Services {
      players: sv::Players::new(&self.db),
      stats: sv::Stats::new(&self.db),
    }
  }

  pub fn poller(&self) -> Poller {
    Poller::new(
      self.db.clone(),
      self.game.clone(),
      self.catalog.clone(),
      self.config.poll_interval,
    )
  }
}

#[cfg(test)]
pub async fn test_db() -> DatabaseConnection {
  let db = Database::connect("sqlite::memory:").await.unwrap();
  Migrator::up(&db, None).await.unwrap();
  db
}

#[cfg(test)]
pub async fn test_state() -> AppState {
  let config = Config::default();
  let game = CommandApi::new("http://127.0.0.1:9", config.request_timeout)
    .expect("static url");

  AppState {
    db: test_db().await,
    game: Arc::new(game),
    catalog: Arc::new(Catalog::default()),
    config,
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  fn lookup<'a>(
    vars: &'a [(&'a str, &'a str)],
  ) -> impl Fn(&str) -> Option<String> + 'a {
    move |key| {
      vars.iter().find(|(k, _)| *k == key).map(|(_, v)| v.to_string())
    }
  }

  #[test]
  fn test_defaults() {
    let config = Config::from_lookup(|_| None).unwrap();

    assert_eq!(config.port, 8050);
    assert_eq!(config.poll_interval, Duration::from_secs(3600));
    assert_eq!(config.theme, ThemeMode::Light);
    assert!(config.ingest_enabled && config.server_enabled);
  }

  #[test]
  fn test_overrides() {
    let vars = [
      ("PORT", "9000"),
      ("POLL_INTERVAL", "15m"),
      ("REQUEST_TIMEOUT", "2s 500ms"),
      ("INGEST_ENABLED", "off"),
      ("DASHBOARD_THEME", "dark"),
      ("CATALOG_DIR", "/srv/mcmeta"),
    ];
    let config = Config::from_lookup(lookup(&vars)).unwrap();

    assert_eq!(config.port, 9000);
    assert_eq!(config.poll_interval, Duration::from_secs(15 * 60));
    assert_eq!(config.request_timeout, Duration::from_millis(2500));
    assert!(!config.ingest_enabled);
    assert_eq!(config.theme, ThemeMode::Dark);
    assert_eq!(config.catalog_dir, PathBuf::from("/srv/mcmeta"));
  }

  #[test]
  fn test_rejects_invalid_values() {
    assert!(Config::from_lookup(lookup(&[("PORT", "http")])).is_err());
    assert!(Config::from_lookup(lookup(&[("POLL_INTERVAL", "0s")])).is_err());
    assert!(Config::from_lookup(lookup(&[("SERVER_ENABLED", "y")])).is_err());
    assert!(Config::from_lookup(lookup(&[("DASHBOARD_THEME", "pink")])).is_err());
  }
}
