//! Schema of the stat store

pub use sea_orm_migration::prelude::*;

mod m20260101_000001_create_players;
mod m20260101_000002_create_player_stats;
mod m20260101_000003_create_player_online;
mod m20260101_000004_create_player_xp;

pub struct Migrator;

#[async_trait::async_trait]
impl MigratorTrait for Migrator {
  fn migrations() -> Vec<Box<dyn MigrationTrait>> {
    vec![
      Box::new(m20260101_000001_create_players::Migration),
      Box::new(m20260101_000002_create_player_stats::Migration),
      Box::new(m20260101_000003_create_player_online::Migration),
      Box::new(m20260101_000004_create_player_xp::Migration),
    ]
  }
}
