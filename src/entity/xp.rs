use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

use super::player;

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "player_xp")]
pub struct Model {
  #[sea_orm(primary_key)]
  #[serde(skip)]
  pub id: i32,
  pub player_name: String,
  pub xp_level: i64,
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
