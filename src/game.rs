//! Client for the game server's command-execution HTTP API

use reqwest::{Client, Url};

use crate::{entity::StatType, prelude::*};

const USER_AGENT: &str = concat!("abyss-stats/", env!("CARGO_PKG_VERSION"));

/// Live game state the poller diffs against the store
#[async_trait]
pub trait GameServer: Send + Sync {
  async fn online_players(&self) -> Result<Vec<String>>;

  async fn stat(&self, player: &str, ty: StatType, item: &str) -> Result<i64>;

  async fn xp_level(&self, player: &str) -> Result<i64>;
}

pub struct CommandApi {
  client: Client,
  base: Url,
}

impl CommandApi {
  pub fn new(base: &str, timeout: Duration) -> Result<Self> {
    let mut base = Url::parse(base).map_err(|e| {
      Error::Internal(format!("Invalid game API url `{base}`: {e}"))
    })?;
    // endpoints are joined relative to the base, keep its path prefix
    if !base.path().ends_with('/') {
      let path = format!("{}/", base.path());
      base.set_path(&path);
    }

    let client = Client::builder()
      .user_agent(USER_AGENT)
      .timeout(timeout)
      .build()
      .map_err(|e| Error::Internal(format!("Failed to build client: {e}")))?;

    Ok(Self { client, base })
  }

  fn endpoint(&self, path: &str) -> Result<Url> {
    self
      .base
      .join(path)
      .map_err(|e| Error::Internal(format!("Invalid endpoint `{path}`: {e}")))
  }

  async fn execute(&self, command: &str) -> Result<i64> {
    let url = self.endpoint("api/executeCommand")?;
    let body = self
      .client
      .get(url)
      .query(&[("command", command)])
      .send()
      .await?
      .error_for_status()?
      .text()
      .await?;

    parse_value(&body).ok_or_else(|| {
      Error::MalformedResponse(format!("`{command}` returned `{body}`"))
    })
  }
}

#[async_trait]
impl GameServer for CommandApi {
  async fn online_players(&self) -> Result<Vec<String>> {
    let url = self.endpoint("api/getOnlinePlayerNames")?;
    let body = self
      .client
      .get(url)
      .send()
      .await?
      .error_for_status()?
      .text()
      .await?;

    json::from_str(&body).map_err(|e| {
      Error::MalformedResponse(format!("online players `{body}`: {e}"))
    })
  }

  async fn stat(&self, player: &str, ty: StatType, item: &str) -> Result<i64> {
    self.execute(&stats_command(player, ty, item)).await
  }

  async fn xp_level(&self, player: &str) -> Result<i64> {
    self.execute(&xp_command(player)).await
  }
}

pub fn stats_command(player: &str, ty: StatType, item: &str) -> String {
  format!("stats query {player} minecraft:{} minecraft:{item}", ty.as_str())
}

pub fn xp_command(player: &str) -> String {
  format!("xp query {player} levels")
}

/// Command results are a bare JSON integer, some server builds quote it
fn parse_value(body: &str) -> Option<i64> {
  match json::from_str::<json::Value>(body.trim()).ok()? {
    json::Value::Number(n) => n.as_i64(),
    json::Value::String(s) => s.trim().parse().ok(),
    _ => None,
  }
}
