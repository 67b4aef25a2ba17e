pub mod poller;
pub mod server;

use std::{sync::Arc, time::Duration};

use tokio::{task::JoinSet, time::sleep};
use tracing::{error, info, warn};

use crate::state::AppState;

const RESTART_DELAY: Duration = Duration::from_secs(5);

#[async_trait::async_trait]
pub trait Plugin: Send + Sync {
  fn name(&self) -> &'static str {
    std::any::type_name::<Self>()
  }

  async fn start(&self, app: Arc<AppState>) -> anyhow::Result<()>;
}

pub struct App {
  plugins: Vec<Arc<dyn Plugin>>,
}

impl App {
  pub fn new() -> Self {
    Self { plugins: Vec::new() }
  }

  pub fn register<P: Plugin + 'static>(mut self, plugin: P) -> Self {
    self.plugins.push(Arc::new(plugin));
    self
  }

  pub fn is_empty(&self) -> bool {
    self.plugins.is_empty()
  }

  /// Supervises every plugin, restarting it whenever it stops, until
  /// ctrl-c is received.
  pub async fn run(self, app: Arc<AppState>) {
    let mut services = JoinSet::new();

    for plugin in self.plugins {
      services.spawn(supervise(plugin, app.clone()));
    }

    match tokio::signal::ctrl_c().await {
      Ok(()) => info!("SYSTEM: Shutdown requested"),
      Err(err) => error!("SYSTEM: Failed to listen for ctrl-c: {err}"),
    }

    services.shutdown().await;
  }
}

async fn supervise(plugin: Arc<dyn Plugin>, app: Arc<AppState>) {
  let name = plugin.name();
  info!("SYSTEM: Service `{}` initialized", name);

  loop {
    let app = app.clone();
    let runner = plugin.clone();

    let handle = tokio::spawn(async move { runner.start(app).await });

    // aborting the supervisor must take the running service down with it
    let _guard = AbortOnDrop(handle.abort_handle());

    match handle.await {
      Ok(Ok(())) => {
        warn!("Service `{name}` stopped unexpectedly (Ok).");
      }
      Ok(Err(err)) => {
        error!("Service `{name}` crashed with error: {err:#}.");
      }
      Err(join_err) => {
        if join_err.is_cancelled() {
          info!("Service `{}` shutdown.", name);
          break;
        } else {
          error!("Service `{}` PANICKED!", name);
        }
      }
    }

    sleep(RESTART_DELAY).await;
    info!("SYSTEM: Restarting service `{}`...", name);
  }
}

struct AbortOnDrop(tokio::task::AbortHandle);

impl Drop for AbortOnDrop {
  fn drop(&mut self) {
    self.0.abort();
  }
}
