use std::sync::Arc;

use axum::{
  Json,
  extract::{Path, Query, State},
};
use serde::Deserialize;

use crate::{
  entity::{online, xp},
  prelude::*,
  state::AppState,
  view::{self, Figure, PlayerSelect, Row, SelectOption, Theme, ThemeMode},
};

#[derive(Debug, Deserialize)]
pub struct TypeQuery {
  pub stat_type: String,
}

#[derive(Debug, Deserialize)]
pub struct StatQuery {
  pub stat_type: String,
  pub stat_item: String,
}

#[derive(Debug, Deserialize)]
pub struct HistoryQuery {
  pub stat_type: String,
  pub stat_item: String,
  pub player: Option<String>,
  pub theme: Option<ThemeMode>,
}

pub async fn health() -> &'static str {
  "OK"
}

pub async fn theme(State(app): State<Arc<AppState>>) -> Json<Theme> {
  Json(Theme::new(app.config.theme))
}

pub async fn stat_types() -> Json<Vec<SelectOption>> {
  Json(view::stat_type_options())
}

pub async fn items(
  State(app): State<Arc<AppState>>,
  Query(query): Query<TypeQuery>,
) -> Result<Json<Vec<SelectOption>>> {
  let items = app.sv().stats.items(&query.stat_type).await?;
  Ok(Json(view::item_options(items)))
}

pub async fn leaderboard(
  State(app): State<Arc<AppState>>,
  Query(query): Query<StatQuery>,
) -> Result<Json<Vec<Row>>> {
  let board =
    app.sv().stats.leaderboard(&query.stat_type, &query.stat_item).await?;
  Ok(Json(view::table(&board)))
}

pub async fn players(
  State(app): State<Arc<AppState>>,
  Query(query): Query<StatQuery>,
) -> Result<Json<PlayerSelect>> {
  let board =
    app.sv().stats.leaderboard(&query.stat_type, &query.stat_item).await?;
  Ok(Json(view::player_select(&board)))
}

pub async fn history(
  State(app): State<Arc<AppState>>,
  Query(query): Query<HistoryQuery>,
) -> Result<Json<Figure>> {
  let mode = query.theme.unwrap_or(app.config.theme);

  // nothing selected yet renders an empty chart
  let Some(player) = query.player.as_deref().filter(|p| !p.is_empty()) else {
    return Ok(Json(view::figure(None, &[], mode)));
  };

  let history = app
    .sv()
    .stats
    .history(&query.stat_type, &query.stat_item, player)
    .await?;

  Ok(Json(view::figure(Some(player), &history, mode)))
}

pub async fn xp(
  State(app): State<Arc<AppState>>,
  Path(name): Path<String>,
) -> Result<Json<Vec<xp::Model>>> {
  Ok(Json(app.sv().players.xp_history(&name).await?))
}

pub async fn online(
  State(app): State<Arc<AppState>>,
  Path(name): Path<String>,
) -> Result<Json<Vec<online::Model>>> {
  Ok(Json(app.sv().players.online_history(&name).await?))
}
