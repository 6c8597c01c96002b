//! [`FamilyGraph`] — the person registry and relation graph.
//!
//! The registry owns three structures that are always mutated together:
//!
//! - the person store, in insertion order;
//! - the external-id index (`external_family_id` → person id), derived from
//!   the person store and rebuilt from it on restore;
//! - the append-only edge list with a set for duplicate detection.
//!
//! `FamilyGraph` is single-writer. Callers that ingest concurrently share it
//! as a [`SharedGraph`] so that resolution, merge and graph mutation happen
//! under one lock.

use std::{
  collections::{HashMap, HashSet},
  sync::{Arc, Mutex},
};

use serde_json::Value;
use uuid::Uuid;

use crate::{
  Error, Result,
  person::{Person, PersonId, PersonRecord},
  relation::{Relation, RelationType},
};

/// A registry shared between concurrent writers. Every call takes the lock
/// for its whole read-modify-write sequence.
pub type SharedGraph = Arc<Mutex<FamilyGraph>>;

// ─── Registry ────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Default)]
pub struct FamilyGraph {
  persons:        HashMap<PersonId, Person>,
  /// Person ids in insertion order.
  order:          Vec<PersonId>,
  external_index: HashMap<String, PersonId>,
  /// Relations in insertion order.
  relations:      Vec<Relation>,
  relation_set:   HashSet<Relation>,
  /// Indices into `relations`, keyed by source person.
  outgoing:       HashMap<PersonId, Vec<usize>>,
}

impl FamilyGraph {
  pub fn new() -> Self { Self::default() }

  /// Wrap a fresh registry for shared use.
  pub fn shared() -> SharedGraph { Arc::new(Mutex::new(Self::new())) }

  /// Rebuild a registry from an exported node and edge list.
  ///
  /// Persons keep their ids and order. The external-id index is rebuilt from
  /// the records; relations are validated and deduplicated exactly as
  /// [`FamilyGraph::add_relation`] would.
  pub fn from_parts(
    persons: impl IntoIterator<Item = Person>,
    relations: impl IntoIterator<Item = Relation>,
  ) -> Result<Self> {
    let mut graph = Self::new();

    for person in persons {
      if graph.persons.contains_key(&person.person_id) {
        return Err(Error::DuplicatePerson(person.person_id));
      }
      if let Some(ext) = &person.record.external_family_id {
        if graph.external_index.contains_key(ext) {
          return Err(Error::DuplicateExternalId(ext.clone()));
        }
        graph.external_index.insert(ext.clone(), person.person_id);
      }
      graph.order.push(person.person_id);
      graph.persons.insert(person.person_id, person);
    }

    for relation in relations {
      graph.add_relation(relation.from, relation.to, relation.relation_type)?;
    }

    Ok(graph)
  }

  // ── Persons ───────────────────────────────────────────────────────────────

  /// Admit `record` to the registry and return the id of the person it
  /// describes.
  ///
  /// If [`FamilyGraph::resolve_identity`] finds an existing person the record
  /// is merged into it (see [`PersonRecord::merge_from`]); otherwise a new
  /// person is created.
  pub fn add_person(&mut self, record: PersonRecord) -> PersonId {
    match self.resolve_identity(&record) {
      Some(person_id) => {
        self.merge_into(person_id, &record);
        person_id
      }
      None => self.insert_new(record),
    }
  }

  /// Validate a schema-less record and admit it. See
  /// [`PersonRecord::from_json`] for the accepted shape.
  pub fn add_person_json(&mut self, raw: &Value) -> Result<PersonId> {
    let record = PersonRecord::from_json(raw)?;
    Ok(self.add_person(record))
  }

  /// Find the existing person `record` refers to, without modifying the
  /// registry.
  ///
  /// 1. An `external_family_id` present in the index is an exact match.
  /// 2. Otherwise, if the father's external id is known, the father's
  ///    children with the same family name are candidates; several candidates
  ///    are narrowed by birth year. Only a unique survivor matches.
  /// 3. Anything else is unresolved.
  pub fn resolve_identity(&self, record: &PersonRecord) -> Option<PersonId> {
    if let Some(ext) = record.external_family_id.as_deref()
      && let Some(&person_id) = self.external_index.get(ext)
    {
      tracing::debug!(%person_id, external_family_id = ext, "resolved by external id");
      return Some(person_id);
    }

    let father_ext = record.father_external_family_id.as_deref()?;
    let &father_id = self.external_index.get(father_ext)?;
    let family_name = record.family_name.as_deref();

    // A child already holding a different external id is someone else.
    let mut candidates: Vec<PersonId> = self
      .children_of(father_id)
      .into_iter()
      .filter(|child| {
        self.persons.get(child).is_some_and(|p| {
          p.record.family_name.as_deref() == family_name
            && !conflicting_ids(&p.record.external_family_id, &record.external_family_id)
        })
      })
      .collect();

    if candidates.len() > 1 {
      candidates.retain(|child| {
        record.birth_year.is_some()
          && self
            .persons
            .get(child)
            .is_some_and(|p| p.record.birth_year == record.birth_year)
      });
    }

    match candidates.as_slice() {
      [person_id] => {
        tracing::debug!(
          %person_id,
          %father_id,
          family_name = ?family_name,
          "resolved as child of known father"
        );
        Some(*person_id)
      }
      [] => None,
      many => {
        tracing::debug!(
          %father_id,
          family_name = ?family_name,
          candidates = many.len(),
          "ambiguous child match; creating a new person"
        );
        None
      }
    }
  }

  fn merge_into(&mut self, person_id: PersonId, record: &PersonRecord) {
    let Some(person) = self.persons.get_mut(&person_id) else {
      return;
    };
    let changed = person.record.merge_from(record);

    if changed.contains(&"external_family_id")
      && let Some(ext) = &person.record.external_family_id
    {
      self.external_index.entry(ext.clone()).or_insert(person_id);
    }

    if !changed.is_empty() {
      tracing::debug!(%person_id, ?changed, "merged attributes");
    }
  }

  fn insert_new(&mut self, record: PersonRecord) -> PersonId {
    let person_id = Uuid::new_v4();
    if let Some(ext) = &record.external_family_id {
      self.external_index.insert(ext.clone(), person_id);
    }
    tracing::debug!(%person_id, name = %record.display_name(), "created person");
    self.order.push(person_id);
    self.persons.insert(person_id, Person { person_id, record });
    person_id
  }

  // ── Relations ─────────────────────────────────────────────────────────────

  /// Store the edge `from → to` of kind `relation_type`.
  ///
  /// Returns `true` if a new edge was inserted and `false` if the identical
  /// triple already existed. Both endpoints must be registered persons.
  pub fn add_relation(
    &mut self,
    from: PersonId,
    to: PersonId,
    relation_type: RelationType,
  ) -> Result<bool> {
    for id in [from, to] {
      if !self.persons.contains_key(&id) {
        return Err(Error::UnknownPerson(id));
      }
    }

    let relation = Relation { from, to, relation_type };
    if !self.relation_set.insert(relation) {
      return Ok(false);
    }

    self.outgoing.entry(from).or_default().push(self.relations.len());
    self.relations.push(relation);
    tracing::debug!(%from, %to, %relation_type, "added relation");
    Ok(true)
  }

  /// Like [`FamilyGraph::add_relation`], taking the wire form of the relation
  /// type. The type is checked before the endpoints.
  pub fn add_relation_str(
    &mut self,
    from: PersonId,
    to: PersonId,
    relation_type: &str,
  ) -> Result<bool> {
    let relation_type = RelationType::parse(relation_type)?;
    self.add_relation(from, to, relation_type)
  }

  // ── Reads ─────────────────────────────────────────────────────────────────

  /// All person ids, in insertion order.
  pub fn get_nodes(&self) -> Vec<PersonId> { self.order.clone() }

  /// All relations, in insertion order.
  pub fn get_edges(&self) -> Vec<Relation> { self.relations.clone() }

  /// All persons with their attributes, in insertion order.
  pub fn persons(&self) -> impl Iterator<Item = &Person> + '_ {
    self.order.iter().filter_map(|id| self.persons.get(id))
  }

  pub fn get_person(&self, person_id: PersonId) -> Option<&Person> {
    self.persons.get(&person_id)
  }

  /// The person registered under `external_family_id`, if any.
  pub fn lookup_external(&self, external_family_id: &str) -> Option<PersonId> {
    self.external_index.get(external_family_id).copied()
  }

  /// Targets of the outgoing parent-to-child edges of `parent`, deduplicated,
  /// in edge insertion order.
  pub fn children_of(&self, parent: PersonId) -> Vec<PersonId> {
    let mut seen = HashSet::new();
    self
      .outgoing
      .get(&parent)
      .into_iter()
      .flatten()
      .filter_map(|&idx| self.relations.get(idx))
      .filter(|rel| rel.relation_type.is_parental())
      .map(|rel| rel.to)
      .filter(|child| seen.insert(*child))
      .collect()
  }

  pub fn person_count(&self) -> usize { self.order.len() }

  pub fn relation_count(&self) -> usize { self.relations.len() }
}

/// Two set external ids that differ name two different persons.
fn conflicting_ids(stored: &Option<String>, incoming: &Option<String>) -> bool {
  matches!((stored, incoming), (Some(a), Some(b)) if a != b)
}
