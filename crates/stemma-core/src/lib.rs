//! Core types and the person registry for Stemma.
//!
//! [`FamilyGraph`] owns a deduplicated set of [`Person`] records and the
//! directed, typed [`Relation`]s between them. Records arrive one at a time
//! from an extraction pipeline and may describe the same real-world person
//! several times with partial information; the registry resolves each record
//! to an existing person or creates a new one.
//!
//! This crate is synchronous and free of I/O. Persistence, export and
//! transport live in the other `stemma-*` crates.

pub mod error;
pub mod person;
pub mod registry;
pub mod relation;

pub use error::{Error, Result};
pub use person::{Person, PersonId, PersonRecord};
pub use registry::{FamilyGraph, SharedGraph};
pub use relation::{Relation, RelationType};
