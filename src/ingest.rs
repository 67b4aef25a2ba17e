//! Periodic poller keeping the stat change log current.
//!
//! Every tick lists the online players, polls each tracked stat for each of
//! them and offers the values to the change log. Failures are scoped to the
//! stat or the player they happened for and collected into a [`TickReport`].

use std::fmt;

use crate::{
  catalog::Catalog,
  entity::StatType,
  game::GameServer,
  prelude::*,
  sv::{self, Recorded},
};

/// Consecutive unreachable stat calls after which the remaining stats of a
/// player are skipped for the tick
const MAX_UNREACHABLE: usize = 3;

pub struct Poller {
  db: DatabaseConnection,
  game: Arc<dyn GameServer>,
  catalog: Arc<Catalog>,
  interval: Duration,
}

#[derive(Debug)]
pub struct Failure {
  pub player: String,
  /// `None` for failures not tied to one stat
  pub stat: Option<(StatType, String)>,
  pub error: Error,
}

#[derive(Debug, Default)]
pub struct TickReport {
  pub players: usize,
  pub inserted: usize,
  pub unchanged: usize,
  pub zero: usize,
  pub xp_snapshots: usize,
  pub failures: Vec<Failure>,
}

impl TickReport {
  fn fail(
    &mut self,
    player: &str,
    stat: Option<(StatType, &str)>,
    error: Error,
  ) {
    self.failures.push(Failure {
      player: player.to_string(),
      stat: stat.map(|(ty, item)| (ty, item.to_string())),
      error,
    });
  }

  fn count(&mut self, recorded: Recorded) {
    match recorded {
      Recorded::Inserted => self.inserted += 1,
      Recorded::Unchanged => self.unchanged += 1,
      Recorded::Zero => self.zero += 1,
    }
  }
}

impl fmt::Display for TickReport {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    write!(
      f,
      "{} players, {} stats recorded, {} unchanged, {} zero, {} xp, {} failures",
      self.players,
      self.inserted,
      self.unchanged,
      self.zero,
      self.xp_snapshots,
      self.failures.len()
    )
  }
}

impl fmt::Display for Failure {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    match &self.stat {
      Some((ty, item)) => {
        write!(f, "{} {}:{}: {}", self.player, ty.as_str(), item, self.error)
      }
      None => write!(f, "{}: {}", self.player, self.error),
    }
  }
}

/// Values polled for one player, not yet written
struct Snapshot<'c> {
  stats: Vec<(StatType, &'c str, i64)>,
  xp_level: Option<i64>,
}

impl Poller {
  pub fn new(
    db: DatabaseConnection,
    game: Arc<dyn GameServer>,
    catalog: Arc<Catalog>,
    interval: Duration,
  ) -> Self {
    Self { db, game, catalog, interval }
  }

  /// Runs ticks until the task is dropped
  pub async fn run(&self) {
    info!(
      "Polling {} stats per player every {}",
      self.catalog.len(),
      humantime::format_duration(self.interval)
    );

    loop {
      match self.tick().await {
        Ok(report) => {
          info!("Tick done: {report}");
          for failure in &report.failures {
            warn!("Poll failed for {failure}");
          }
        }
        Err(err) => error!("Tick aborted: {err}"),
      }

      time::sleep(self.interval).await;
    }
  }

  /// One full pass over the online players.
  ///
  /// Fails only when the player list itself cannot be fetched, in which
  /// case nothing is written.
  pub async fn tick(&self) -> Result<TickReport> {
    let players = self.game.online_players().await?;
    let mut report = TickReport::default();

    debug!("{} players online", players.len());

    for player in &players {
      let snapshot = self.poll(player, &mut report).await;

      if let Err(err) = self.write(player, snapshot, &mut report).await {
        report.fail(player, None, err);
        continue;
      }

      report.players += 1;
    }

    Ok(report)
  }

  /// Stops polling stats after [`MAX_UNREACHABLE`] unreachable calls in a
  /// row. What was polled so far is still written with the presence row.
  async fn poll<'c>(
    &'c self,
    player: &str,
    report: &mut TickReport,
  ) -> Snapshot<'c> {
    let mut stats = Vec::with_capacity(self.catalog.len());
    let mut unreachable = 0;

    for (ty, item) in self.catalog.keys() {
      match self.game.stat(player, ty, item).await {
        Ok(value) => {
          unreachable = 0;
          stats.push((ty, item, value));
        }
        Err(err @ Error::Unreachable(_)) => {
          report.fail(player, Some((ty, item)), err);
          unreachable += 1;
          if unreachable >= MAX_UNREACHABLE {
            report.fail(
              player,
              None,
              Error::Unreachable(format!(
                "{unreachable} consecutive stat calls failed"
              )),
            );
            break;
          }
        }
        Err(err) => report.fail(player, Some((ty, item)), err),
      }
    }

    let xp_level = match self.game.xp_level(player).await {
      Ok(level) => Some(level),
      Err(err) => {
        report.fail(player, None, err);
        None
      }
    };

    Snapshot { stats, xp_level }
  }

  async fn write(
    &self,
    player: &str,
    snapshot: Snapshot<'_>,
    report: &mut TickReport,
  ) -> Result<()> {
    let now = Utc::now().naive_utc();
    let txn = self.db.begin().await?;

    let players = sv::Players::new(&txn);
    players.get_or_create(player, now).await?;
    players.record_online(player, now).await?;

    let stats = sv::Stats::new(&txn);
    let mut recorded = Vec::with_capacity(snapshot.stats.len());
    for (ty, item, value) in snapshot.stats {
      recorded.push(stats.record(player, ty, item, value, now).await?);
    }

    if let Some(level) = snapshot.xp_level {
      players.record_xp(player, level, now).await?;
    }

    txn.commit().await?;

    // counted after commit so a rolled back player adds nothing
    for r in recorded {
      report.count(r);
    }
    if snapshot.xp_level.is_some() {
      report.xp_snapshots += 1;
    }

    Ok(())
  }
}

#[cfg(test)]
mod tests {
  use std::sync::Mutex;

  use sea_orm::PaginatorTrait;

  use super::*;
  use crate::{
    entity::{online, player, stat, xp},
    state::test_db,
  };

  #[derive(Clone, Copy)]
  enum Reply {
    Value(i64),
    Unreachable,
    Malformed,
  }

  impl Reply {
    fn into_result(self, what: &str) -> Result<i64> {
      match self {
        Reply::Value(v) => Ok(v),
        Reply::Unreachable => Err(Error::Unreachable(what.to_string())),
        Reply::Malformed => Err(Error::MalformedResponse(what.to_string())),
      }
    }
  }

  /// Game server whose answers are set by the test between ticks
  #[derive(Default)]
  struct Scripted {
    online: Mutex<Option<Vec<String>>>,
    stats: Mutex<HashMap<(String, StatType, String), Reply>>,
    xp: Mutex<HashMap<String, Reply>>,
  }

  impl Scripted {
    fn online(&self, players: &[&str]) {
      *self.online.lock().unwrap() =
        Some(players.iter().map(|p| p.to_string()).collect());
    }

    fn down(&self) {
      *self.online.lock().unwrap() = None;
    }

    fn set(&self, player: &str, ty: StatType, item: &str, reply: Reply) {
      self
        .stats
        .lock()
        .unwrap()
        .insert((player.to_string(), ty, item.to_string()), reply);
    }

    fn set_xp(&self, player: &str, reply: Reply) {
      self.xp.lock().unwrap().insert(player.to_string(), reply);
    }
  }

  #[async_trait]
  impl GameServer for Scripted {
    async fn online_players(&self) -> Result<Vec<String>> {
      self
        .online
        .lock()
        .unwrap()
        .clone()
        .ok_or_else(|| Error::Unreachable("connection refused".into()))
    }

    async fn stat(&self, player: &str, ty: StatType, item: &str) -> Result<i64> {
      let key = (player.to_string(), ty, item.to_string());
      let reply = self.stats.lock().unwrap().get(&key).copied();
      reply.unwrap_or(Reply::Value(0)).into_result(item)
    }

    async fn xp_level(&self, player: &str) -> Result<i64> {
      let reply = self.xp.lock().unwrap().get(player).copied();
      reply.unwrap_or(Reply::Value(0)).into_result("xp")
    }
  }

  fn catalog() -> Arc<Catalog> {
    Arc::new(Catalog::new(
      vec!["sand".into(), "stone".into()],
      vec!["zombie".into()],
      vec!["jump".into()],
    ))
  }

  async fn setup() -> (DatabaseConnection, Arc<Scripted>, Poller) {
    let db = test_db().await;
    let game = Arc::new(Scripted::default());
    let poller = Poller::new(
      db.clone(),
      game.clone(),
      catalog(),
      Duration::from_secs(3600),
    );
    (db, game, poller)
  }

  async fn stat_rows(db: &DatabaseConnection) -> Vec<stat::Model> {
    stat::Entity::find()
      .order_by_asc(stat::Column::Id)
      .all(db)
      .await
      .unwrap()
  }

  #[tokio::test]
  async fn test_tick_records_only_changes() {
    let (db, game, poller) = setup().await;
    game.online(&["Steve"]);
    game.set("Steve", StatType::Used, "sand", Reply::Value(10));
    game.set("Steve", StatType::Killed, "zombie", Reply::Value(3));

    let first = poller.tick().await.unwrap();
    assert_eq!(first.players, 1);
    assert_eq!(first.inserted, 2);
    assert!(first.failures.is_empty());

    let second = poller.tick().await.unwrap();
    assert_eq!(second.inserted, 0);
    assert_eq!(second.unchanged, 2);

    game.set("Steve", StatType::Used, "sand", Reply::Value(25));
    let third = poller.tick().await.unwrap();
    assert_eq!(third.inserted, 1);

    let rows = stat_rows(&db).await;
    let sand: Vec<_> = rows
      .iter()
      .filter(|r| r.stat_item == "sand")
      .map(|r| r.stat_value)
      .collect();
    assert_eq!(sand, [10, 25]);
    assert!(rows.iter().all(|r| r.stat_value != 0));
  }

  #[tokio::test]
  async fn test_consecutive_rows_never_repeat() {
    let (db, game, poller) = setup().await;
    game.online(&["Steve"]);

    for value in [1, 1, 2, 2, 2, 5, 5, 1] {
      game.set("Steve", StatType::Mined, "stone", Reply::Value(value));
      poller.tick().await.unwrap();
    }

    let values: Vec<_> =
      stat_rows(&db).await.into_iter().map(|r| r.stat_value).collect();
    assert_eq!(values, [1, 2, 5, 1]);
  }

  #[tokio::test]
  async fn test_unreachable_server_aborts_tick_without_writes() {
    let (db, game, poller) = setup().await;
    game.down();

    let err = poller.tick().await.unwrap_err();

    assert!(matches!(err, Error::Unreachable(_)));
    assert_eq!(player::Entity::find().count(&db).await.unwrap(), 0);
    assert_eq!(online::Entity::find().count(&db).await.unwrap(), 0);
    assert_eq!(xp::Entity::find().count(&db).await.unwrap(), 0);
  }

  #[tokio::test]
  async fn test_presence_and_xp_for_every_player() {
    let (db, game, poller) = setup().await;
    game.online(&["Steve", "Alex"]);
    game.set_xp("Steve", Reply::Value(30));
    game.set_xp("Alex", Reply::Value(12));

    let report = poller.tick().await.unwrap();
    poller.tick().await.unwrap();

    assert_eq!(report.xp_snapshots, 2);
    assert_eq!(player::Entity::find().count(&db).await.unwrap(), 2);
    assert_eq!(online::Entity::find().count(&db).await.unwrap(), 4);

    let alex = sv::Players::new(&db).xp_history("Alex").await.unwrap();
    let levels: Vec<_> = alex.iter().map(|r| r.xp_level).collect();
    assert_eq!(levels, [12, 12]);
  }

  #[tokio::test]
  async fn test_bad_stat_does_not_stop_the_rest() {
    let (db, game, poller) = setup().await;
    game.online(&["Steve"]);
    game.set("Steve", StatType::Used, "sand", Reply::Malformed);
    game.set("Steve", StatType::Used, "stone", Reply::Value(4));
    game.set_xp("Steve", Reply::Malformed);

    let report = poller.tick().await.unwrap();

    assert_eq!(report.players, 1);
    assert_eq!(report.inserted, 1);
    assert_eq!(report.xp_snapshots, 0);
    assert_eq!(report.failures.len(), 2);
    assert_eq!(
      report.failures[0].stat,
      Some((StatType::Used, "sand".to_string()))
    );
    assert_eq!(stat_rows(&db).await.len(), 1);
  }

  #[tokio::test]
  async fn test_unreachable_player_is_still_present() {
    let (db, game, poller) = setup().await;
    game.online(&["Ghost", "Steve"]);
    game.set("Ghost", StatType::Broken, "sand", Reply::Value(4));
    game.set("Ghost", StatType::Broken, "stone", Reply::Unreachable);
    for item in ["sand", "stone"] {
      game.set("Ghost", StatType::Crafted, item, Reply::Unreachable);
    }
    game.set("Ghost", StatType::Used, "sand", Reply::Value(9));
    game.set_xp("Ghost", Reply::Value(5));
    game.set("Steve", StatType::PickedUp, "sand", Reply::Value(1));

    let report = poller.tick().await.unwrap();

    assert_eq!(report.players, 2);
    assert_eq!(report.xp_snapshots, 2);
    let ghost: Vec<_> =
      report.failures.iter().filter(|f| f.player == "Ghost").collect();
    assert_eq!(ghost.len(), 4);
    assert!(ghost.iter().any(|f| f.stat.is_none()));

    let players = sv::Players::new(&db);
    assert!(players.by_name("Ghost").await.unwrap().is_some());
    assert_eq!(players.online_history("Ghost").await.unwrap().len(), 1);
    let levels: Vec<_> = players
      .xp_history("Ghost")
      .await
      .unwrap()
      .into_iter()
      .map(|r| r.xp_level)
      .collect();
    assert_eq!(levels, [5]);

    // polled before giving up is kept, later stats are not polled at all
    let rows: Vec<_> = stat_rows(&db)
      .await
      .into_iter()
      .map(|r| (r.player_name, r.stat_type, r.stat_value))
      .collect();
    assert_eq!(
      rows,
      [
        ("Ghost".to_string(), StatType::Broken, 4),
        ("Steve".to_string(), StatType::PickedUp, 1),
      ]
    );
  }

  #[tokio::test]
  async fn test_store_failure_rolls_back_one_player() {
    let (db, game, poller) = setup().await;
    db.execute_unprepared(
      "CREATE TRIGGER reject_broken BEFORE INSERT ON player_online \
       WHEN NEW.player_name = 'Broken' \
       BEGIN SELECT RAISE(ABORT, 'disk full'); END",
    )
    .await
    .unwrap();
    game.online(&["Broken", "Steve"]);
    game.set("Broken", StatType::Used, "sand", Reply::Value(3));
    game.set("Steve", StatType::Used, "sand", Reply::Value(2));

    let report = poller.tick().await.unwrap();

    assert_eq!(report.players, 1);
    assert_eq!(report.inserted, 1);
    assert_eq!(report.xp_snapshots, 1);
    assert_eq!(report.failures.len(), 1);
    let failure = &report.failures[0];
    assert_eq!(failure.player, "Broken");
    assert!(failure.stat.is_none());
    assert!(matches!(failure.error, Error::Database(_)), "{failure}");

    let players = sv::Players::new(&db);
    assert!(players.by_name("Broken").await.unwrap().is_none());
    assert!(players.by_name("Steve").await.unwrap().is_some());
    assert_eq!(online::Entity::find().count(&db).await.unwrap(), 1);
    assert_eq!(xp::Entity::find().count(&db).await.unwrap(), 1);

    let rows = stat_rows(&db).await;
    assert_eq!(rows.len(), 1);
    assert_eq!(rows[0].player_name, "Steve");
  }
}
