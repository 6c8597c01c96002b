//! Person records and the fill-and-prefer-longer attribute merge.
//!
//! A [`PersonRecord`] is what the extraction pipeline hands us: every
//! attribute is optional, and the same individual may be described several
//! times with different fragments. A [`Person`] is a record that has been
//! admitted to the registry under a process-generated id.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use uuid::Uuid;

use crate::{Error, Result};

/// Process-generated identifier of a person in the registry. Never derived
/// from record content.
pub type PersonId = Uuid;

/// Keys that must be present on every raw record, even if their value is
/// `null`.
pub const MANDATORY_KEYS: [&str; 4] = [
  "external_family_id",
  "father_external_family_id",
  "family_name",
  "given_name",
];

// ─── PersonRecord ────────────────────────────────────────────────────────────

/// The attributes describing one individual.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct PersonRecord {
  /// Stable key from the source transcription, e.g. `Billeter0001`. Unique
  /// across the registry when present.
  pub external_family_id:        Option<String>,
  /// External key of the father's record. Used for resolution only; it never
  /// becomes an edge by itself.
  pub father_external_family_id: Option<String>,
  pub family_name:               Option<String>,
  pub given_name:                Option<String>,
  pub birth_year:                Option<i32>,
  pub death_year:                Option<i32>,
  pub profession:                Option<String>,
  pub origin:                    Option<String>,
}

impl PersonRecord {
  /// Convenience constructor for the two name fields; everything else unset.
  pub fn named(family_name: impl Into<String>, given_name: impl Into<String>) -> Self {
    Self {
      family_name: Some(family_name.into()),
      given_name: Some(given_name.into()),
      ..Self::default()
    }
  }

  /// Validate and convert a schema-less record as emitted by the extraction
  /// step.
  ///
  /// Every key in [`MANDATORY_KEYS`] must be present; a `null` value is
  /// accepted. Optional keys default to unset. Empty strings count as unset.
  /// Years may be JSON integers or strings holding an integer. Unknown keys
  /// are ignored.
  pub fn from_json(value: &Value) -> Result<Self> {
    let Some(map) = value.as_object() else {
      return Err(Error::Validation {
        missing: MANDATORY_KEYS.iter().map(|k| (*k).to_owned()).collect(),
        invalid: Vec::new(),
      });
    };

    let missing: Vec<String> = MANDATORY_KEYS
      .iter()
      .filter(|key| !map.contains_key(**key))
      .map(|key| (*key).to_owned())
      .collect();

    let mut invalid = Vec::new();
    let record = Self {
      external_family_id:        text_field(map, "external_family_id", &mut invalid),
      father_external_family_id: text_field(map, "father_external_family_id", &mut invalid),
      family_name:               text_field(map, "family_name", &mut invalid),
      given_name:                text_field(map, "given_name", &mut invalid),
      birth_year:                year_field(map, "birth_year", &mut invalid),
      death_year:                year_field(map, "death_year", &mut invalid),
      profession:                text_field(map, "profession", &mut invalid),
      origin:                    text_field(map, "origin", &mut invalid),
    };

    if !missing.is_empty() || !invalid.is_empty() {
      return Err(Error::Validation { missing, invalid });
    }
    Ok(record)
  }

  /// Merge `incoming` into `self` using the fill-and-prefer-longer rule.
  ///
  /// A stored value is replaced when it is unset, or when the incoming value
  /// is set and its textual form is strictly longer. Ties keep the stored
  /// value. `external_family_id` is an identity key and is only ever filled,
  /// never replaced.
  ///
  /// Returns the names of the attributes that changed.
  pub fn merge_from(&mut self, incoming: &PersonRecord) -> Vec<&'static str> {
    let mut changed = Vec::new();

    if self.external_family_id.is_none() && incoming.external_family_id.is_some() {
      self.external_family_id.clone_from(&incoming.external_family_id);
      changed.push("external_family_id");
    }

    let mut track = |name: &'static str, updated: bool| {
      if updated {
        changed.push(name);
      }
    };
    track(
      "father_external_family_id",
      prefer_longer(&mut self.father_external_family_id, &incoming.father_external_family_id),
    );
    track("family_name", prefer_longer(&mut self.family_name, &incoming.family_name));
    track("given_name", prefer_longer(&mut self.given_name, &incoming.given_name));
    track("birth_year", prefer_longer(&mut self.birth_year, &incoming.birth_year));
    track("death_year", prefer_longer(&mut self.death_year, &incoming.death_year));
    track("profession", prefer_longer(&mut self.profession, &incoming.profession));
    track("origin", prefer_longer(&mut self.origin, &incoming.origin));

    changed
  }

  /// "Given Family", skipping whichever half is unset.
  pub fn display_name(&self) -> String {
    [self.given_name.as_deref(), self.family_name.as_deref()]
      .into_iter()
      .flatten()
      .collect::<Vec<_>>()
      .join(" ")
  }
}

fn prefer_longer<T>(stored: &mut Option<T>, incoming: &Option<T>) -> bool
where
  T: Clone + ToString,
{
  let Some(new) = incoming else {
    return false;
  };
  let replace = match stored {
    None => true,
    Some(current) => text_len(new) > text_len(current),
  };
  if replace {
    *stored = Some(new.clone());
  }
  replace
}

fn text_len<T: ToString>(value: &T) -> usize { value.to_string().chars().count() }

// ─── Raw field decoding ──────────────────────────────────────────────────────

fn text_field(
  map: &Map<String, Value>,
  key: &str,
  invalid: &mut Vec<String>,
) -> Option<String> {
  match map.get(key) {
    None | Some(Value::Null) => None,
    Some(Value::String(s)) if s.trim().is_empty() => None,
    Some(Value::String(s)) => Some(s.clone()),
    Some(_) => {
      invalid.push(key.to_owned());
      None
    }
  }
}

fn year_field(
  map: &Map<String, Value>,
  key: &str,
  invalid: &mut Vec<String>,
) -> Option<i32> {
  let parsed = match map.get(key) {
    None | Some(Value::Null) => return None,
    Some(Value::String(s)) if s.trim().is_empty() => return None,
    Some(Value::Number(n)) => n.as_i64().and_then(|n| i32::try_from(n).ok()),
    Some(Value::String(s)) => s.trim().parse::<i32>().ok(),
    Some(_) => None,
  };
  if parsed.is_none() {
    invalid.push(key.to_owned());
  }
  parsed
}

// ─── Person ──────────────────────────────────────────────────────────────────

/// A record admitted to the registry.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Person {
  pub person_id: PersonId,
  #[serde(flatten)]
  pub record:    PersonRecord,
}
