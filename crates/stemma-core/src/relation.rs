//! Typed, directed relations between persons.

use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::{Error, PersonId};

/// The closed set of relation kinds. The string form (`FATHER_CHILD`, …) is
/// what extraction output and the HTTP surface carry.
#[derive(
  Debug,
  Clone,
  Copy,
  PartialEq,
  Eq,
  Hash,
  Serialize,
  Deserialize,
  strum::Display,
  strum::EnumString,
  strum::IntoStaticStr,
)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
#[strum(serialize_all = "SCREAMING_SNAKE_CASE")]
pub enum RelationType {
  FatherChild,
  MotherChild,
  HusbandWife,
}

impl RelationType {
  /// Parent-to-child kinds; their targets are the source person's children.
  pub fn is_parental(self) -> bool { matches!(self, Self::FatherChild | Self::MotherChild) }

  /// Parse the wire form, mapping anything outside the closed set to
  /// [`Error::InvalidRelationType`].
  pub fn parse(s: &str) -> Result<Self, Error> {
    Self::from_str(s).map_err(|_| Error::InvalidRelationType(s.to_owned()))
  }

  pub fn as_str(self) -> &'static str { self.into() }
}

/// A directed edge `from → to`. Relations are immutable once stored.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Relation {
  pub from:          PersonId,
  pub to:            PersonId,
  pub relation_type: RelationType,
}
