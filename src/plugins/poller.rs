use std::sync::Arc;

use crate::{plugins::Plugin, prelude::*, state::AppState};

pub struct Ingest;

#[async_trait]
impl Plugin for Ingest {
  async fn start(&self, app: Arc<AppState>) -> anyhow::Result<()> {
    if app.catalog.is_empty() {
      anyhow::bail!("Stat catalog is empty, nothing to poll");
    }

    app.poller().run().await;
    Ok(())
  }
}
