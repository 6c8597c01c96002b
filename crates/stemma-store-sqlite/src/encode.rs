//! Encoding and decoding helpers between Rust domain types and the plain
//! representations stored in SQLite columns.
//!
//! Timestamps are RFC 3339 strings, UUIDs hyphenated lowercase strings, and
//! relation types their wire names.

use chrono::{DateTime, Utc};
use stemma_core::{Person, PersonRecord, Relation, RelationType};
use uuid::Uuid;

use crate::{Error, Result, store::SnapshotInfo};

// ─── Uuid ─────────────────────────────────────────────────────────────────────

pub fn encode_uuid(id: Uuid) -> String { id.hyphenated().to_string() }

pub fn decode_uuid(s: &str) -> Result<Uuid> { Ok(Uuid::parse_str(s)?) }

// ─── DateTime<Utc> ────────────────────────────────────────────────────────────

pub fn encode_dt(dt: DateTime<Utc>) -> String { dt.to_rfc3339() }

pub fn decode_dt(s: &str) -> Result<DateTime<Utc>> {
  DateTime::parse_from_rfc3339(s)
    .map(|dt| dt.with_timezone(&Utc))
    .map_err(|e| Error::DateParse(e.to_string()))
}

// ─── Row types ───────────────────────────────────────────────────────────────

/// Column values of one `persons` row, without the snapshot key.
pub struct RawPerson {
  pub person_id:                 String,
  pub external_family_id:        Option<String>,
  pub father_external_family_id: Option<String>,
  pub family_name:               Option<String>,
  pub given_name:                Option<String>,
  pub birth_year:                Option<i32>,
  pub death_year:                Option<i32>,
  pub profession:                Option<String>,
  pub origin:                    Option<String>,
}

impl RawPerson {
  pub fn from_person(person: &Person) -> Self {
    let r = person.record.clone();
    Self {
      person_id:                 encode_uuid(person.person_id),
      external_family_id:        r.external_family_id,
      father_external_family_id: r.father_external_family_id,
      family_name:               r.family_name,
      given_name:                r.given_name,
      birth_year:                r.birth_year,
      death_year:                r.death_year,
      profession:                r.profession,
      origin:                    r.origin,
    }
  }

  pub fn into_person(self) -> Result<Person> {
    Ok(Person {
      person_id: decode_uuid(&self.person_id)?,
      record:    PersonRecord {
        external_family_id:        self.external_family_id,
        father_external_family_id: self.father_external_family_id,
        family_name:               self.family_name,
        given_name:                self.given_name,
        birth_year:                self.birth_year,
        death_year:                self.death_year,
        profession:                self.profession,
        origin:                    self.origin,
      },
    })
  }
}

/// Column values of one `relations` row, without the snapshot key.
pub struct RawRelation {
  pub from_id:       String,
  pub to_id:         String,
  pub relation_type: String,
}

impl RawRelation {
  pub fn from_relation(relation: &Relation) -> Self {
    Self {
      from_id:       encode_uuid(relation.from),
      to_id:         encode_uuid(relation.to),
      relation_type: relation.relation_type.as_str().to_owned(),
    }
  }

  pub fn into_relation(self) -> Result<Relation> {
    Ok(Relation {
      from:          decode_uuid(&self.from_id)?,
      to:            decode_uuid(&self.to_id)?,
      relation_type: RelationType::parse(&self.relation_type)?,
    })
  }
}

/// Raw strings read directly from a `snapshots` row.
pub struct RawSnapshot {
  pub snapshot_id:    String,
  pub taken_at:       String,
  pub person_count:   i64,
  pub relation_count: i64,
}

impl RawSnapshot {
  pub fn into_info(self) -> Result<SnapshotInfo> {
    Ok(SnapshotInfo {
      snapshot_id:    decode_uuid(&self.snapshot_id)?,
      taken_at:       decode_dt(&self.taken_at)?,
      person_count:   usize::try_from(self.person_count)?,
      relation_count: usize::try_from(self.relation_count)?,
    })
  }
}
