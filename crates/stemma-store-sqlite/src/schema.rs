//! SQL schema for the Stemma snapshot store.
//!
//! Executed once at connection startup. Future migrations will be gated on
//! `PRAGMA user_version`.

/// Full schema DDL; idempotent thanks to `CREATE ... IF NOT EXISTS`.
pub const SCHEMA: &str = "
PRAGMA journal_mode = WAL;
PRAGMA foreign_keys = ON;

-- Snapshots are append-only; `seq` orders them by time of writing.
CREATE TABLE IF NOT EXISTS snapshots (
    seq            INTEGER PRIMARY KEY AUTOINCREMENT,
    snapshot_id    TEXT NOT NULL UNIQUE,
    taken_at       TEXT NOT NULL,   -- ISO 8601 UTC
    person_count   INTEGER NOT NULL,
    relation_count INTEGER NOT NULL
);

CREATE TABLE IF NOT EXISTS persons (
    snapshot_id               TEXT NOT NULL REFERENCES snapshots(snapshot_id),
    ordinal                   INTEGER NOT NULL,   -- registry insertion order
    person_id                 TEXT NOT NULL,
    external_family_id        TEXT,
    father_external_family_id TEXT,
    family_name               TEXT,
    given_name                TEXT,
    birth_year                INTEGER,
    death_year                INTEGER,
    profession                TEXT,
    origin                    TEXT,
    PRIMARY KEY (snapshot_id, person_id),
    UNIQUE      (snapshot_id, ordinal)
);

CREATE UNIQUE INDEX IF NOT EXISTS persons_external_idx
    ON persons(snapshot_id, external_family_id)
    WHERE external_family_id IS NOT NULL;

CREATE TABLE IF NOT EXISTS relations (
    snapshot_id   TEXT NOT NULL REFERENCES snapshots(snapshot_id),
    ordinal       INTEGER NOT NULL,
    from_id       TEXT NOT NULL,
    to_id         TEXT NOT NULL,
    relation_type TEXT NOT NULL
        CHECK (relation_type IN ('FATHER_CHILD', 'MOTHER_CHILD', 'HUSBAND_WIFE')),
    PRIMARY KEY (snapshot_id, ordinal),
    UNIQUE      (snapshot_id, from_id, to_id, relation_type)
);

PRAGMA user_version = 1;
";
