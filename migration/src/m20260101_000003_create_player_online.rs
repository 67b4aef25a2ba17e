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
          .table(PlayerOnline::Table)
          .if_not_exists()
          .col(
            ColumnDef::new(PlayerOnline::Id)
              .integer()
              .not_null()
              .auto_increment()
              .primary_key(),
          )
          .col(ColumnDef::new(PlayerOnline::PlayerName).string().not_null())
          .col(ColumnDef::new(PlayerOnline::RecordedAt).date_time().not_null())
          .foreign_key(
            ForeignKey::create()
              .name("fk_player_online_player")
              .from(PlayerOnline::Table, PlayerOnline::PlayerName)
              .to(Players::Table, Players::PlayerName)
              .on_delete(ForeignKeyAction::Restrict),
          )
          .to_owned(),
      )
      .await?;

    manager
      .create_index(
        Index::create()
          .name("idx_player_online_player")
          .table(PlayerOnline::Table)
          .col(PlayerOnline::PlayerName)
          .to_owned(),
      )
      .await
  }

  async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
    manager
      .drop_table(Table::drop().table(PlayerOnline::Table).to_owned())
      .await
  }
}

#[derive(DeriveIden)]
pub enum PlayerOnline {
  Table,
  Id,
  PlayerName,
  RecordedAt,
}
