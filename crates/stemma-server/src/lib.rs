//! Server wiring for Stemma.
//!
//! Mounts the JSON API under `/api`, adds request tracing, and keeps the
//! in-memory registry backed up to a [`SqliteSnapshotStore`].

use std::{path::PathBuf, time::Duration};

use anyhow::Context as _;
use axum::{Router, routing::get};
use serde::Deserialize;
use stemma_core::SharedGraph;
use stemma_store_sqlite::{SnapshotInfo, SqliteSnapshotStore};
use tower_http::trace::TraceLayer;

// ─── Configuration ────────────────────────────────────────────────────────────

/// Runtime server configuration, deserialised from `config.toml` and
/// `STEMMA_*` environment variables.
#[derive(Debug, Deserialize, Clone)]
pub struct ServerConfig {
  #[serde(default = "default_host")]
  pub host:                   String,
  #[serde(default = "default_port")]
  pub port:                   u16,
  #[serde(default = "default_store_path")]
  pub store_path:             PathBuf,
  /// Seconds between automatic snapshots; `0` disables them.
  #[serde(default = "default_snapshot_interval")]
  pub snapshot_interval_secs: u64,
}

fn default_host() -> String { "127.0.0.1".to_string() }

fn default_port() -> u16 { 5240 }

fn default_store_path() -> PathBuf { PathBuf::from("stemma.db") }

fn default_snapshot_interval() -> u64 { 300 }

// ─── Router ───────────────────────────────────────────────────────────────────

/// Build the full application router for `graph`.
pub fn router(graph: SharedGraph) -> Router {
  Router::new()
    .route("/health", get(|| async { "ok" }))
    .nest("/api", stemma_api::api_router(graph))
    .layer(TraceLayer::new_for_http())
}

// ─── Snapshots ────────────────────────────────────────────────────────────────

/// Copy the registry under its lock, then persist the copy. The lock is not
/// held while writing to the database.
pub async fn save_snapshot(
  store: &SqliteSnapshotStore,
  graph: &SharedGraph,
) -> anyhow::Result<SnapshotInfo> {
  let snapshot = graph
    .lock()
    .map_err(|_| anyhow::anyhow!("registry lock poisoned"))?
    .clone();
  store.save(&snapshot).await.context("failed to save snapshot")
}

/// Save a snapshot every `interval`, forever. Failures are logged and the
/// loop carries on.
pub async fn run_snapshots(store: SqliteSnapshotStore, graph: SharedGraph, interval: Duration) {
  let mut ticker = tokio::time::interval(interval);
  // The first tick completes immediately; the registry was just loaded.
  ticker.tick().await;

  loop {
    ticker.tick().await;
    if let Err(e) = save_snapshot(&store, &graph).await {
      tracing::warn!(error = %e, "periodic snapshot failed");
    }
  }
}
