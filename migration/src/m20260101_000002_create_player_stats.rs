use sea_orm_migration::prelude::*;

use super::m20260101_000001_create_players::Players;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
  async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
    manager
      .create_table(
        Table::create()
          .table(PlayerStats::Table)
          .if_not_exists()
          .col(
            ColumnDef::new(PlayerStats::Id)
              .integer()
              .not_null()
              .auto_increment()
              .primary_key(),
          )
          .col(ColumnDef::new(PlayerStats::PlayerName).string().not_null())
          .col(ColumnDef::new(PlayerStats::StatType).string().not_null())
          .col(ColumnDef::new(PlayerStats::StatItem).string().not_null())
          .col(ColumnDef::new(PlayerStats::StatValue).big_integer().not_null())
          .col(ColumnDef::new(PlayerStats::RecordedAt).date_time().not_null())
          .foreign_key(
            ForeignKey::create()
              .name("fk_player_stats_player")
              .from(PlayerStats::Table, PlayerStats::PlayerName)
              .to(Players::Table, Players::PlayerName)
              .on_delete(ForeignKeyAction::Restrict),
          )
          .to_owned(),
      )
      .await?;

    // latest-value lookup of the ingestion loop and per-player history
    manager
      .create_index(
        Index::create()
          .name("idx_player_stats_key")
          .table(PlayerStats::Table)
          .col(PlayerStats::PlayerName)
          .col(PlayerStats::StatType)
          .col(PlayerStats::StatItem)
          .col(PlayerStats::RecordedAt)
          .to_owned(),
      )
      .await?;

    manager
      .create_index(
        Index::create()
          .name("idx_player_stats_item")
          .table(PlayerStats::Table)
          .col(PlayerStats::StatType)
          .col(PlayerStats::StatItem)
          .to_owned(),
      )
      .await
  }

  async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
    manager
      .drop_table(Table::drop().table(PlayerStats::Table).to_owned())
      .await
  }
}

#[derive(DeriveIden)]
pub enum PlayerStats {
  Table,
  Id,
  PlayerName,
  StatType,
  StatItem,
  StatValue,
  RecordedAt,
}
