//! [`SqliteSnapshotStore`] — point-in-time copies of a [`FamilyGraph`].

use std::path::Path;

use chrono::{DateTime, Utc};
use rusqlite::OptionalExtension as _;
use stemma_core::FamilyGraph;
use uuid::Uuid;

use crate::{
  Result,
  encode::{RawPerson, RawRelation, RawSnapshot, encode_dt, encode_uuid},
  schema::SCHEMA,
};

/// Metadata of one stored snapshot.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SnapshotInfo {
  pub snapshot_id:    Uuid,
  pub taken_at:       DateTime<Utc>,
  pub person_count:   usize,
  pub relation_count: usize,
}

// ─── Store ───────────────────────────────────────────────────────────────────

/// Snapshot storage backed by a single SQLite file.
///
/// Snapshots are append-only: saving never touches earlier snapshots. Cloning
/// is cheap; the inner connection is reference-counted.
#[derive(Clone)]
pub struct SqliteSnapshotStore {
  conn: tokio_rusqlite::Connection,
}

impl SqliteSnapshotStore {
  /// Open (or create) a store at `path` and run schema initialisation.
  pub async fn open(path: impl AsRef<Path>) -> Result<Self> {
    let conn = tokio_rusqlite::Connection::open(path).await?;
    let store = Self { conn };
    store.init_schema().await?;
    Ok(store)
  }

  /// Open an in-memory store — useful for testing.
  pub async fn open_in_memory() -> Result<Self> {
    let conn = tokio_rusqlite::Connection::open_in_memory().await?;
    let store = Self { conn };
    store.init_schema().await?;
    Ok(store)
  }

  async fn init_schema(&self) -> Result<()> {
    self
      .conn
      .call(|conn| {
        conn.execute_batch(SCHEMA)?;
        Ok(())
      })
      .await?;
    Ok(())
  }

  // ── Writes ────────────────────────────────────────────────────────────────

  /// Persist the current state of `graph` as a new snapshot, in one
  /// transaction. Persons and relations keep their insertion order.
  pub async fn save(&self, graph: &FamilyGraph) -> Result<SnapshotInfo> {
    let persons: Vec<RawPerson> = graph.persons().map(RawPerson::from_person).collect();
    let relations: Vec<RawRelation> =
      graph.get_edges().iter().map(RawRelation::from_relation).collect();

    let info = SnapshotInfo {
      snapshot_id:    Uuid::new_v4(),
      taken_at:       Utc::now(),
      person_count:   persons.len(),
      relation_count: relations.len(),
    };

    let snapshot_id_str = encode_uuid(info.snapshot_id);
    let taken_at_str    = encode_dt(info.taken_at);
    let person_count    = i64::try_from(info.person_count)?;
    let relation_count  = i64::try_from(info.relation_count)?;

    self
      .conn
      .call(move |conn| {
        let tx = conn.transaction()?;

        tx.execute(
          "INSERT INTO snapshots (snapshot_id, taken_at, person_count, relation_count)
           VALUES (?1, ?2, ?3, ?4)",
          rusqlite::params![snapshot_id_str, taken_at_str, person_count, relation_count],
        )?;

        {
          let mut stmt = tx.prepare(
            "INSERT INTO persons (
               snapshot_id, ordinal, person_id,
               external_family_id, father_external_family_id,
               family_name, given_name, birth_year, death_year,
               profession, origin
             ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11)",
          )?;
          for (ordinal, p) in (0_i64..).zip(&persons) {
            stmt.execute(rusqlite::params![
              snapshot_id_str,
              ordinal,
              p.person_id,
              p.external_family_id,
              p.father_external_family_id,
              p.family_name,
              p.given_name,
              p.birth_year,
              p.death_year,
              p.profession,
              p.origin,
            ])?;
          }

          let mut stmt = tx.prepare(
            "INSERT INTO relations (snapshot_id, ordinal, from_id, to_id, relation_type)
             VALUES (?1, ?2, ?3, ?4, ?5)",
          )?;
          for (ordinal, r) in (0_i64..).zip(&relations) {
            stmt.execute(rusqlite::params![
              snapshot_id_str,
              ordinal,
              r.from_id,
              r.to_id,
              r.relation_type,
            ])?;
          }
        }

        tx.commit()?;
        Ok(())
      })
      .await?;

    tracing::info!(
      snapshot_id = %info.snapshot_id,
      persons = info.person_count,
      relations = info.relation_count,
      "saved registry snapshot"
    );
    Ok(info)
  }

  // ── Reads ─────────────────────────────────────────────────────────────────

  /// All snapshots, newest first.
  pub async fn list(&self) -> Result<Vec<SnapshotInfo>> {
    let raws: Vec<RawSnapshot> = self
      .conn
      .call(|conn| {
        let mut stmt = conn.prepare(
          "SELECT snapshot_id, taken_at, person_count, relation_count
           FROM snapshots ORDER BY seq DESC",
        )?;
        let rows = stmt
          .query_map([], |row| {
            Ok(RawSnapshot {
              snapshot_id:    row.get(0)?,
              taken_at:       row.get(1)?,
              person_count:   row.get(2)?,
              relation_count: row.get(3)?,
            })
          })?
          .collect::<rusqlite::Result<Vec<_>>>()?;
        Ok(rows)
      })
      .await?;

    raws.into_iter().map(RawSnapshot::into_info).collect()
  }

  /// Restore the most recently saved snapshot. Returns `None` if the store
  /// is empty.
  pub async fn load_latest(&self) -> Result<Option<FamilyGraph>> {
    let latest: Option<String> = self
      .conn
      .call(|conn| {
        Ok(
          conn
            .query_row(
              "SELECT snapshot_id FROM snapshots ORDER BY seq DESC LIMIT 1",
              [],
              |row| row.get(0),
            )
            .optional()?,
        )
      })
      .await?;

    match latest {
      Some(id_str) => self.load_raw(id_str).await,
      None => Ok(None),
    }
  }

  /// Restore the snapshot `snapshot_id`. Returns `None` if it does not exist.
  pub async fn load(&self, snapshot_id: Uuid) -> Result<Option<FamilyGraph>> {
    self.load_raw(encode_uuid(snapshot_id)).await
  }

  async fn load_raw(&self, snapshot_id_str: String) -> Result<Option<FamilyGraph>> {
    let rows: Option<(Vec<RawPerson>, Vec<RawRelation>)> = self
      .conn
      .call(move |conn| {
        let exists = conn
          .query_row(
            "SELECT 1 FROM snapshots WHERE snapshot_id = ?1",
            rusqlite::params![snapshot_id_str],
            |_| Ok(true),
          )
          .optional()?
          .unwrap_or(false);

        if !exists {
          return Ok(None);
        }

        let mut stmt = conn.prepare(
          "SELECT person_id, external_family_id, father_external_family_id,
                  family_name, given_name, birth_year, death_year,
                  profession, origin
           FROM persons WHERE snapshot_id = ?1 ORDER BY ordinal",
        )?;
        let persons = stmt
          .query_map(rusqlite::params![snapshot_id_str], |row| {
            Ok(RawPerson {
              person_id:                 row.get(0)?,
              external_family_id:        row.get(1)?,
              father_external_family_id: row.get(2)?,
              family_name:               row.get(3)?,
              given_name:                row.get(4)?,
              birth_year:                row.get(5)?,
              death_year:                row.get(6)?,
              profession:                row.get(7)?,
              origin:                    row.get(8)?,
            })
          })?
          .collect::<rusqlite::Result<Vec<_>>>()?;

        let mut stmt = conn.prepare(
          "SELECT from_id, to_id, relation_type
           FROM relations WHERE snapshot_id = ?1 ORDER BY ordinal",
        )?;
        let relations = stmt
          .query_map(rusqlite::params![snapshot_id_str], |row| {
            Ok(RawRelation {
              from_id:       row.get(0)?,
              to_id:         row.get(1)?,
              relation_type: row.get(2)?,
            })
          })?
          .collect::<rusqlite::Result<Vec<_>>>()?;

        Ok(Some((persons, relations)))
      })
      .await?;

    let Some((persons, relations)) = rows else {
      return Ok(None);
    };

    let persons = persons
      .into_iter()
      .map(RawPerson::into_person)
      .collect::<Result<Vec<_>>>()?;
    let relations = relations
      .into_iter()
      .map(RawRelation::into_relation)
      .collect::<Result<Vec<_>>>()?;

    let graph = FamilyGraph::from_parts(persons, relations)?;
    tracing::info!(
      persons = graph.person_count(),
      relations = graph.relation_count(),
      "restored registry snapshot"
    );
    Ok(Some(graph))
  }
}
