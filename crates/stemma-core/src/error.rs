//! Error types for `stemma-core`.

use thiserror::Error;
use uuid::Uuid;

#[derive(Debug, Error)]
pub enum Error {
  /// A raw record is missing mandatory keys or carries values of the wrong
  /// type. Both lists name the offending keys.
  #[error(
    "invalid person record: missing keys [{}], invalid values [{}]",
    missing.join(", "),
    invalid.join(", ")
  )]
  Validation {
    missing: Vec<String>,
    invalid: Vec<String>,
  },

  #[error("invalid relation type: {0:?}")]
  InvalidRelationType(String),

  #[error("unknown person: {0}")]
  UnknownPerson(Uuid),

  #[error("person {0} appears more than once")]
  DuplicatePerson(Uuid),

  #[error("external family id {0:?} is assigned to more than one person")]
  DuplicateExternalId(String),
}

pub type Result<T, E = Error> = std::result::Result<T, E>;
