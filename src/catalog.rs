//! Static reference data: the registry ids every stat type is polled for.
//!
//! Files follow the mcmeta registry dumps (`item/data.json`,
//! `entity_type/data.json`, `custom_stat/data.json`): a flat JSON array of
//! ids, with or without the `minecraft:` namespace.

use std::path::Path;

use crate::{
  entity::{StatType, stat::Registry},
  prelude::*,
};

pub const ITEMS_FILE: &str = "items.json";
pub const ENTITIES_FILE: &str = "entities.json";
pub const CUSTOM_STATS_FILE: &str = "custom_stats.json";

#[derive(Debug, Clone, Default)]
pub struct Catalog {
  pub items: Vec<String>,
  pub entities: Vec<String>,
  pub custom_stats: Vec<String>,
}

impl Catalog {
  pub fn new(
    items: Vec<String>,
    entities: Vec<String>,
    custom_stats: Vec<String>,
  ) -> Self {
    Self {
      items: normalize(items),
      entities: normalize(entities),
      custom_stats: normalize(custom_stats),
    }
  }

  pub fn load(dir: impl AsRef<Path>) -> Result<Self> {
    let dir = dir.as_ref();

    let catalog = Self::new(
      read_ids(&dir.join(ITEMS_FILE))?,
      read_ids(&dir.join(ENTITIES_FILE))?,
      read_ids(&dir.join(CUSTOM_STATS_FILE))?,
    );

    info!(
      "Loaded catalog from {}: {} items, {} entities, {} custom stats",
      dir.display(),
      catalog.items.len(),
      catalog.entities.len(),
      catalog.custom_stats.len()
    );

    Ok(catalog)
  }

  pub fn subjects(&self, ty: StatType) -> &[String] {
    match ty.registry() {
      Registry::Items => &self.items,
      Registry::Entities => &self.entities,
      Registry::CustomStats => &self.custom_stats,
    }
  }

  /// Every tracked `(stat type, stat item)` pair, grouped by stat type
  pub fn keys(&self) -> impl Iterator<Item = (StatType, &str)> + '_ {
    StatType::ALL.into_iter().flat_map(move |ty| {
      self.subjects(ty).iter().map(move |item| (ty, item.as_str()))
    })
  }

  pub fn len(&self) -> usize {
    StatType::ALL.iter().map(|ty| self.subjects(*ty).len()).sum()
  }

  pub fn is_empty(&self) -> bool {
    self.len() == 0
  }
}

fn read_ids(path: &Path) -> Result<Vec<String>> {
  let content = std::fs::read_to_string(path).map_err(|e| {
    Error::Catalog(format!("Failed to read {}: {}", path.display(), e))
  })?;

  json::from_str(&content).map_err(|e| {
    Error::Catalog(format!("Failed to parse {}: {}", path.display(), e))
  })
}

fn normalize(ids: Vec<String>) -> Vec<String> {
  let mut out: Vec<String> = Vec::with_capacity(ids.len());
  for id in ids {
    let id = id.trim();
    let id = id.strip_prefix("minecraft:").unwrap_or(id);
    if !id.is_empty() && !out.iter().any(|seen| seen == id) {
      out.push(id.to_string());
    }
  }
  out
}

#[cfg(test)]
mod tests {
  use std::fs;

  use super::*;

  fn ids(list: &[&str]) -> Vec<String> {
    list.iter().map(|s| s.to_string()).collect()
  }

  #[test]
  fn test_keys_follow_registries() {
    let catalog = Catalog::new(
      ids(&["sand", "stone"]),
      ids(&["zombie"]),
      ids(&["jump"]),
    );

    let keys: Vec<_> = catalog.keys().collect();

    // 6 item stat types, 2 entity stat types, 1 custom
    assert_eq!(keys.len(), 6 * 2 + 2 + 1);
    assert_eq!(catalog.len(), keys.len());
    assert!(keys.contains(&(StatType::Used, "sand")));
    assert!(keys.contains(&(StatType::Killed, "zombie")));
    assert!(keys.contains(&(StatType::KilledBy, "zombie")));
    assert!(keys.contains(&(StatType::Custom, "jump")));
    assert!(!keys.contains(&(StatType::Custom, "sand")));
  }

  #[test]
  fn test_normalize_strips_namespace() {
    let catalog = Catalog::new(
      ids(&["minecraft:sand", "sand", " ", "dirt"]),
      vec![],
      vec![],
    );
    assert_eq!(catalog.items, ids(&["sand", "dirt"]));
  }

  #[test]
  fn test_load_from_dir() {
    let dir = tempfile::tempdir().unwrap();
    fs::write(dir.path().join(ITEMS_FILE), r#"["sand","stone"]"#).unwrap();
    fs::write(dir.path().join(ENTITIES_FILE), r#"["minecraft:zombie"]"#)
      .unwrap();
    fs::write(dir.path().join(CUSTOM_STATS_FILE), r#"["play_time"]"#).unwrap();

    let catalog = Catalog::load(dir.path()).unwrap();

    assert_eq!(catalog.items, ids(&["sand", "stone"]));
    assert_eq!(catalog.entities, ids(&["zombie"]));
    assert_eq!(catalog.custom_stats, ids(&["play_time"]));
  }

  #[test]
  fn test_load_missing_file() {
    let dir = tempfile::tempdir().unwrap();
    fs::write(dir.path().join(ITEMS_FILE), "[]").unwrap();

    assert!(matches!(Catalog::load(dir.path()), Err(Error::Catalog(_))));
  }

  #[test]
  fn test_load_malformed_file() {
    let dir = tempfile::tempdir().unwrap();
    fs::write(dir.path().join(ITEMS_FILE), r#"{"sand": 1}"#).unwrap();
    fs::write(dir.path().join(ENTITIES_FILE), "[]").unwrap();
    fs::write(dir.path().join(CUSTOM_STATS_FILE), "[]").unwrap();

    assert!(matches!(Catalog::load(dir.path()), Err(Error::Catalog(_))));
  }
}
