use sea_orm::DatabaseConnection;

use crate::{
  entity::{StatType, stat},
  prelude::*,
};

/// Outcome of offering a polled value to the change log
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Recorded {
  Inserted,
  /// Same value as the latest row of the key
  Unchanged,
  /// Zero means the stat was never triggered
  Zero,
}

pub struct Stats<'a, C = DatabaseConnection> {
  db: &'a C,
}

impl<'a, C: ConnectionTrait> Stats<'a, C> {
  pub fn new(db: &'a C) -> Self {
    Self { db }
  }

  pub async fn latest(
    &self,
    player: &str,
    ty: StatType,
    item: &str,
  ) -> Result<Option<stat::Model>> {
    let row = stat::Entity::find()
      .filter(stat::Column::PlayerName.eq(player))
      .filter(stat::Column::StatType.eq(ty))
      .filter(stat::Column::StatItem.eq(item))
      .order_by_desc(stat::Column::RecordedAt)
      .order_by_desc(stat::Column::Id)
      .one(self.db)
      .await?;
    Ok(row)
  }

  /// Appends `value` unless it is zero or repeats the latest row of the key.
  /// The player row must already exist.
  pub async fn record(
    &self,
    player: &str,
    ty: StatType,
    item: &str,
    value: i64,
    now: DateTime,
  ) -> Result<Recorded> {
    if value == 0 {
      return Ok(Recorded::Zero);
    }

    if let Some(last) = self.latest(player, ty, item).await?
      && last.stat_value == value
    {
      return Ok(Recorded::Unchanged);
    }

    stat::ActiveModel {
      player_name: Set(player.to_string()),
      stat_type: Set(ty),
      stat_item: Set(item.to_string()),
      stat_value: Set(value),
      recorded_at: Set(now),
      ..Default::default()
    }
    .insert(self.db)
    .await?;

    Ok(Recorded::Inserted)
  }

  /// Most recent row of every player that has one for the key, highest
  /// value first. Equal values are ordered by player name.
  pub async fn leaderboard(
    &self,
    stat_type: &str,
    item: &str,
  ) -> Result<Vec<stat::Model>> {
    let Some(ty) = known_type(stat_type) else {
      return Ok(Vec::new());
    };

    let rows = stat::Entity::find()
      .filter(stat::Column::StatType.eq(ty))
      .filter(stat::Column::StatItem.eq(item))
      .order_by_asc(stat::Column::RecordedAt)
      .order_by_asc(stat::Column::Id)
      .all(self.db)
      .await?;

    let mut latest: HashMap<String, stat::Model> = HashMap::new();
    for row in rows {
      latest.insert(row.player_name.clone(), row);
    }

    let mut board: Vec<_> = latest.into_values().collect();
    board.sort_by(|a, b| {
      b.stat_value
        .cmp(&a.stat_value)
        .then_with(|| a.player_name.cmp(&b.player_name))
    });

    Ok(board)
  }

  /// Every row of one key, oldest first
  pub async fn history(
    &self,
    stat_type: &str,
    item: &str,
    player: &str,
  ) -> Result<Vec<stat::Model>> {
    let Some(ty) = known_type(stat_type) else {
      return Ok(Vec::new());
    };

    let rows = stat::Entity::find()
      .filter(stat::Column::PlayerName.eq(player))
      .filter(stat::Column::StatType.eq(ty))
      .filter(stat::Column::StatItem.eq(item))
      .order_by_asc(stat::Column::RecordedAt)
      .order_by_asc(stat::Column::Id)
      .all(self.db)
      .await?;

    Ok(rows)
  }

  /// Items that were ever recorded for the stat type, in ascending order
  pub async fn items(&self, stat_type: &str) -> Result<Vec<String>> {
    let Some(ty) = known_type(stat_type) else {
      return Ok(Vec::new());
    };

    let items = stat::Entity::find()
      .select_only()
      .column(stat::Column::StatItem)
      .distinct()
      .filter(stat::Column::StatType.eq(ty))
      .order_by_asc(stat::Column::StatItem)
      .into_tuple::<String>()
      .all(self.db)
      .await?;

    Ok(items)
  }
}

fn known_type(stat_type: &str) -> Option<StatType> {
  match stat_type.parse() {
    Ok(ty) => Some(ty),
    Err(err) => {
      debug!("Query for {err}, answering with no rows");
      None
    }
  }
}
