use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

use super::{online, stat, xp};

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "players")]
pub struct Model {
  /// Name as reported by the game server, case-sensitive
  #[sea_orm(primary_key, auto_increment = false)]
  pub player_name: String,
  pub first_seen: DateTime,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
  #[sea_orm(has_many = "stat::Entity")]
  Stats,
  #[sea_orm(has_many = "online::Entity")]
  Online,
  #[sea_orm(has_many = "xp::Entity")]
  Xp,
}

impl Related<stat::Entity> for Entity {
  fn to() -> RelationDef {
    Relation::Stats.def()
  }
}

impl Related<online::Entity> for Entity {
  fn to() -> RelationDef {
    Relation::Online.def()
  }
}

impl Related<xp::Entity> for Entity {
  fn to() -> RelationDef {
    Relation::Xp.def()
  }
}

impl ActiveModelBehavior for ActiveModel {}
