//! SQLite snapshot store for the Stemma person registry.
//!
//! The registry itself lives in memory; this crate persists point-in-time
//! copies of it and restores them. Wraps [`tokio_rusqlite`] so all database
//! access runs on a dedicated thread without blocking the async runtime.

mod encode;
mod schema;
mod store;

pub mod error;

pub use error::{Error, Result};
pub use store::{SnapshotInfo, SqliteSnapshotStore};
