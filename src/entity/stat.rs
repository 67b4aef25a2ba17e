use std::{fmt, str::FromStr};

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

use super::player;

/// Category of a tracked statistic, stored by its Minecraft registry id
#[derive(
  Copy,
  Clone,
  Debug,
  PartialEq,
  Eq,
  Hash,
  PartialOrd,
  Ord,
  EnumIter,
  DeriveActiveEnum,
  Serialize,
  Deserialize,
)]
#[sea_orm(rs_type = "String", db_type = "Text")]
#[serde(rename_all = "snake_case")]
pub enum StatType {
  #[sea_orm(string_value = "broken")]
  Broken,
  #[sea_orm(string_value = "crafted")]
  Crafted,
  #[sea_orm(string_value = "custom")]
  Custom,
  #[sea_orm(string_value = "dropped")]
  Dropped,
  #[sea_orm(string_value = "killed")]
  Killed,
  #[sea_orm(string_value = "killed_by")]
  KilledBy,
  #[sea_orm(string_value = "mined")]
  Mined,
  #[sea_orm(string_value = "picked_up")]
  PickedUp,
  #[sea_orm(string_value = "used")]
  Used,
}

/// Which reference catalog supplies the subjects of a stat type
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum Registry {
  Items,
  Entities,
  CustomStats,
}

impl StatType {
  pub const ALL: [StatType; 9] = [
    Self::Broken,
    Self::Crafted,
    Self::Custom,
    Self::Dropped,
    Self::Killed,
    Self::KilledBy,
    Self::Mined,
    Self::PickedUp,
    Self::Used,
  ];

  pub fn as_str(&self) -> &'static str {
    match self {
      Self::Broken => "broken",
      Self::Crafted => "crafted",
      Self::Custom => "custom",
      Self::Dropped => "dropped",
      Self::Killed => "killed",
      Self::KilledBy => "killed_by",
      Self::Mined => "mined",
      Self::PickedUp => "picked_up",
      Self::Used => "used",
    }
  }

  pub fn registry(&self) -> Registry {
    match self {
      Self::Custom => Registry::CustomStats,
      Self::Killed | Self::KilledBy => Registry::Entities,
      _ => Registry::Items,
    }
  }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UnknownStatType(pub String);

impl fmt::Display for UnknownStatType {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    write!(f, "unknown stat type `{}`", self.0)
  }
}

impl std::error::Error for UnknownStatType {}

impl FromStr for StatType {
  type Err = UnknownStatType;

  fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
    let s = s.strip_prefix("minecraft:").unwrap_or(s);
    Self::ALL
      .into_iter()
      .find(|ty| ty.as_str() == s)
      .ok_or_else(|| UnknownStatType(s.to_string()))
  }
}

/// One observed value of one stat for one player.
///
/// Rows form a change log: consecutive rows of the same
/// `(player_name, stat_type, stat_item)` never repeat a value.
#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "player_stats")]
pub struct Model {
  #[sea_orm(primary_key)]
  #[serde(skip)]
  pub id: i32,
  pub player_name: String,
  pub stat_type: StatType,
  pub stat_item: String,
  pub stat_value: i64,
  pub recorded_at: DateTime,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
  #[sea_orm(
    belongs_to = "player::Entity",
    from = "Column::PlayerName",
    to = "player::Column::PlayerName"
  )]
  Player,
}

impl Related<player::Entity> for Entity {
  fn to() -> RelationDef {
    Relation::Player.def()
  }
}

impl ActiveModelBehavior for ActiveModel {}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn parses_registry_ids() {
    assert_eq!("picked_up".parse::<StatType>(), Ok(StatType::PickedUp));
    assert_eq!("minecraft:killed".parse::<StatType>(), Ok(StatType::Killed));
    assert!("kill_by".parse::<StatType>().is_err());
  }

  #[test]
  fn maps_to_registry() {
    assert_eq!(StatType::Mined.registry(), Registry::Items);
    assert_eq!(StatType::KilledBy.registry(), Registry::Entities);
    assert_eq!(StatType::Custom.registry(), Registry::CustomStats);
  }
}
