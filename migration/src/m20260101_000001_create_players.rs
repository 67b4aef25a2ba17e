use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
  async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
    manager
      .create_table(
        Table::create()
          .table(Players::Table)
          .if_not_exists()
          .col(
            ColumnDef::new(Players::PlayerName)
              .string()
              .not_null()
              .primary_key(),
          )
          .col(ColumnDef::new(Players::FirstSeen).date_time().not_null())
          .to_owned(),
      )
      .await
  }

  async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
    manager.drop_table(Table::drop().table(Players::Table).to_owned()).await
  }
}

#[derive(DeriveIden)]
pub enum Players {
  Table,
  PlayerName,
  FirstSeen,
}
