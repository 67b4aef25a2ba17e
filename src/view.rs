//! Dashboard view models.
//!
//! Query results shaped the way the dashboard renders them: select options,
//! the ranked table and the per-player chart. Colors are data, one palette
//! per theme mode.

use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::{
  entity::{StatType, stat},
  prelude::*,
};

pub const DEFAULT_STAT_TYPE: StatType = StatType::Used;
pub const DEFAULT_STAT_ITEM: &str = "sand";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ThemeMode {
  Light,
  Dark,
}

impl FromStr for ThemeMode {
  type Err = anyhow::Error;

  fn from_str(s: &str) -> anyhow::Result<Self> {
    match s.trim().to_ascii_lowercase().as_str() {
      "light" => Ok(Self::Light),
      "dark" => Ok(Self::Dark),
      other => anyhow::bail!("unknown theme `{other}`"),
    }
  }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Palette {
  pub background: &'static str,
  pub text: &'static str,
  pub grid: &'static str,
}

impl ThemeMode {
  pub fn palette(&self) -> Palette {
    match self {
      Self::Light => {
        Palette { background: "#d9e3f1", text: "#000000", grid: "#ced7e5" }
      }
      Self::Dark => {
        Palette { background: "#212529", text: "#ffffff", grid: "#2c3034" }
      }
    }
  }
}

#[derive(Debug, Serialize)]
pub struct Theme {
  pub default_mode: ThemeMode,
  pub light: Palette,
  pub dark: Palette,
  pub default_stat_type: StatType,
  pub default_stat_item: &'static str,
}

impl Theme {
  pub fn new(default_mode: ThemeMode) -> Self {
    Self {
      default_mode,
      light: ThemeMode::Light.palette(),
      dark: ThemeMode::Dark.palette(),
      default_stat_type: DEFAULT_STAT_TYPE,
      default_stat_item: DEFAULT_STAT_ITEM,
    }
  }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SelectOption {
  pub label: String,
  pub value: String,
}

impl SelectOption {
  pub fn new(value: impl Into<String>) -> Self {
    let value = value.into();
    Self { label: value.clone(), value }
  }
}

pub fn stat_type_options() -> Vec<SelectOption> {
  StatType::ALL.iter().map(|ty| SelectOption::new(ty.as_str())).collect()
}

pub fn item_options(items: Vec<String>) -> Vec<SelectOption> {
  items.into_iter().map(SelectOption::new).collect()
}

/// Row of the ranked table
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Row {
  pub name: String,
  pub value: i64,
}

pub fn table(board: &[stat::Model]) -> Vec<Row> {
  board
    .iter()
    .map(|r| Row { name: r.player_name.clone(), value: r.stat_value })
    .collect()
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PlayerSelect {
  pub options: Vec<SelectOption>,
  /// Top of the ranking, if anyone has the stat
  pub value: Option<String>,
}

pub fn player_select(board: &[stat::Model]) -> PlayerSelect {
  let mut options: Vec<SelectOption> = Vec::with_capacity(board.len());
  for row in board {
    if !options.iter().any(|o| o.value == row.player_name) {
      options.push(SelectOption::new(row.player_name.as_str()));
    }
  }
  let value = options.first().map(|o| o.value.clone());
  PlayerSelect { options, value }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Point {
  pub recorded_at: DateTime,
  pub value: i64,
}

/// Line chart of one player's value over time
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Figure {
  pub title: String,
  pub points: Vec<Point>,
  pub palette: Palette,
}

pub fn figure(
  player: Option<&str>,
  history: &[stat::Model],
  mode: ThemeMode,
) -> Figure {
  let title = match player {
    Some(player) => format!("Stat Change Over Time for {player}"),
    None => String::from("Stat Change Over Time"),
  };

  let points = history
    .iter()
    .map(|r| Point { recorded_at: r.recorded_at, value: r.stat_value })
    .collect();

  Figure { title, points, palette: mode.palette() }
}
