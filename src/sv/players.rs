use sea_orm::DatabaseConnection;

use crate::{
  entity::{online, player, xp},
  prelude::*,
};

pub struct Players<'a, C = DatabaseConnection> {
  db: &'a C,
}

impl<'a, C: ConnectionTrait> Players<'a, C> {
  pub fn new(db: &'a C) -> Self {
    Self { db }
  }

  /// Idempotent on the name, the first sighting is kept
  pub async fn get_or_create(
    &self,
    name: &str,
    now: DateTime,
  ) -> Result<player::Model> {
    if let Some(player) = player::Entity::find_by_id(name).one(self.db).await? {
      return Ok(player);
    }

    let player = player::ActiveModel {
      player_name: Set(name.to_string()),
      first_seen: Set(now),
    };

    Ok(player.insert(self.db).await?)
  }

  pub async fn record_online(&self, name: &str, now: DateTime) -> Result<()> {
    online::ActiveModel {
      player_name: Set(name.to_string()),
      recorded_at: Set(now),
      ..Default::default()
    }
    .insert(self.db)
    .await?;

    Ok(())
  }

  pub async fn record_xp(
    &self,
    name: &str,
    level: i64,
    now: DateTime,
  ) -> Result<()> {
    xp::ActiveModel {
      player_name: Set(name.to_string()),
      xp_level: Set(level),
      recorded_at: Set(now),
      ..Default::default()
    }
    .insert(self.db)
    .await?;

    Ok(())
  }

  #[allow(dead_code)]
  pub async fn all(&self) -> Result<Vec<player::Model>> {
    let players = player::Entity::find()
      .order_by_asc(player::Column::PlayerName)
      .all(self.db)
      .await?;
    Ok(players)
  }

  #[allow(dead_code)]
  pub async fn by_name(&self, name: &str) -> Result<Option<player::Model>> {
    Ok(player::Entity::find_by_id(name).one(self.db).await?)
  }

  pub async fn xp_history(&self, name: &str) -> Result<Vec<xp::Model>> {
    let rows = xp::Entity::find()
      .filter(xp::Column::PlayerName.eq(name))
      .order_by_asc(xp::Column::RecordedAt)
      .order_by_asc(xp::Column::Id)
      .all(self.db)
      .await?;
    Ok(rows)
  }

  pub async fn online_history(&self, name: &str) -> Result<Vec<online::Model>> {
    let rows = online::Entity::find()
      .filter(online::Column::PlayerName.eq(name))
      .order_by_asc(online::Column::RecordedAt)
      .order_by_asc(online::Column::Id)
      .all(self.db)
      .await?;
    Ok(rows)
  }
}
