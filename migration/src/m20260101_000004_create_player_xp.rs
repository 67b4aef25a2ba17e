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
          .table(PlayerXp::Table)
          .if_not_exists()
          .col(
            ColumnDef::new(PlayerXp::Id)
              .integer()
              .not_null()
              .auto_increment()
              .primary_key(),
          )
          .col(ColumnDef::new(PlayerXp::PlayerName).string().not_null())
          .col(ColumnDef::new(PlayerXp::XpLevel).big_integer().not_null())
          .col(ColumnDef::new(PlayerXp::RecordedAt).date_time().not_null())
          .foreign_key(
            ForeignKey::create()
              .name("fk_player_xp_player")
              .from(PlayerXp::Table, PlayerXp::PlayerName)
              .to(Players::Table, Players::PlayerName)
              .on_delete(ForeignKeyAction::Restrict),
          )
          .to_owned(),
      )
      .await
  }

  async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
    manager.drop_table(Table::drop().table(PlayerXp::Table).to_owned()).await
  }
}

#[derive(DeriveIden)]
pub enum PlayerXp {
  Table,
  Id,
  PlayerName,
  XpLevel,
  RecordedAt,
}
