//! stemma-server binary.
//!
//! Reads `config.toml` (or the path specified with `--config`), restores the
//! latest registry snapshot from SQLite, and serves the JSON API over HTTP.
//! A snapshot is written periodically and once more on shutdown.

use std::{
  path::{Path, PathBuf},
  sync::{Arc, Mutex},
  time::Duration,
};

use anyhow::Context as _;
use clap::Parser;
use stemma_core::{FamilyGraph, SharedGraph};
use stemma_server::{ServerConfig, run_snapshots, save_snapshot};
use stemma_store_sqlite::SqliteSnapshotStore;
use tokio::net::TcpListener;
use tracing::level_filters::LevelFilter;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(author, version, about = "Stemma person registry server")]
struct Cli {
  /// Path to the TOML configuration file.
  #[arg(short, long, default_value = "config.toml")]
  config: PathBuf,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
  // Initialise tracing.
  tracing_subscriber::fmt()
    .with_env_filter(
      EnvFilter::builder()
        .with_default_directive(LevelFilter::INFO.into())
        .from_env_lossy(),
    )
    .init();

  let cli = Cli::parse();

  // Load configuration.
  let settings = config::Config::builder()
    .add_source(config::File::from(cli.config).required(false))
    .add_source(config::Environment::with_prefix("STEMMA").try_parsing(true))
    .build()
    .context("failed to read config file")?;

  let server_cfg: ServerConfig = settings
    .try_deserialize()
    .context("failed to deserialise ServerConfig")?;

  let store_path = expand_tilde(&server_cfg.store_path);
  let store = SqliteSnapshotStore::open(&store_path)
    .await
    .with_context(|| format!("failed to open snapshot store at {store_path:?}"))?;

  let graph = store
    .load_latest()
    .await
    .context("failed to restore latest snapshot")?
    .unwrap_or_else(|| {
      tracing::info!("no snapshot found; starting with an empty registry");
      FamilyGraph::new()
    });
  let graph: SharedGraph = Arc::new(Mutex::new(graph));

  if server_cfg.snapshot_interval_secs > 0 {
    tokio::spawn(run_snapshots(
      store.clone(),
      graph.clone(),
      Duration::from_secs(server_cfg.snapshot_interval_secs),
    ));
  }

  let app = stemma_server::router(graph.clone());
  let address = format!("{}:{}", server_cfg.host, server_cfg.port);

  tracing::info!("Listening on http://{address}");
  let listener = TcpListener::bind(&address)
    .await
    .with_context(|| format!("failed to bind {address}"))?;

  axum::serve(listener, app)
    .with_graceful_shutdown(shutdown_signal())
    .await
    .context("server error")?;

  save_snapshot(&store, &graph).await?;
  Ok(())
}

async fn shutdown_signal() {
  if let Err(e) = tokio::signal::ctrl_c().await {
    tracing::warn!(error = %e, "failed to listen for Ctrl-C");
    std::future::pending::<()>().await;
  }
  tracing::info!("shutting down");
}

/// Expand a leading `~` to the user's home directory.
fn expand_tilde(path: &Path) -> PathBuf {
  let s = path.to_string_lossy();
  if let Some(rest) = s.strip_prefix("~/")
    && let Ok(home) = std::env::var("HOME")
  {
    return PathBuf::from(home).join(rest);
  }
  path.to_path_buf()
}
