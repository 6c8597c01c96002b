//! Handlers for `/persons` endpoints.
//!
//! | Method | Path | Notes |
//! |--------|------|-------|
//! | `GET`  | `/persons` | All persons, in insertion order |
//! | `POST` | `/persons` | Body: raw attribute record; 201 + [`AddedPerson`] |
//! | `GET`  | `/persons/{id}` | 404 if not found |
//! | `GET`  | `/persons/{id}/children` | Ids of the person's children |

use axum::{
  Json,
  extract::{Path, State},
  http::StatusCode,
  response::IntoResponse,
};
use serde::Serialize;
use serde_json::Value;
use stemma_core::{Person, PersonId, SharedGraph};

use crate::{error::ApiError, lock};

// ─── List ─────────────────────────────────────────────────────────────────────

/// `GET /persons`
pub async fn list(State(graph): State<SharedGraph>) -> Result<Json<Vec<Person>>, ApiError> {
  let graph = lock(&graph)?;
  Ok(Json(graph.persons().cloned().collect()))
}

// ─── Create ───────────────────────────────────────────────────────────────────

/// Response body of `POST /persons`.
#[derive(Debug, Serialize)]
pub struct AddedPerson {
  pub person_id: PersonId,
  /// `false` when the record resolved to (and was merged into) an existing
  /// person.
  pub created:   bool,
}

/// `POST /persons` — body: a raw record such as
/// `{"external_family_id":null,"father_external_family_id":"F1","family_name":"Keller","given_name":null}`
pub async fn create(
  State(graph): State<SharedGraph>,
  Json(body): Json<Value>,
) -> Result<impl IntoResponse, ApiError> {
  let mut graph = lock(&graph)?;
  let before = graph.person_count();
  let person_id = graph.add_person_json(&body)?;
  let created = graph.person_count() > before;

  tracing::info!(%person_id, created, "person submitted");
  let status = if created { StatusCode::CREATED } else { StatusCode::OK };
  Ok((status, Json(AddedPerson { person_id, created })))
}

// ─── Get one ──────────────────────────────────────────────────────────────────

/// `GET /persons/{id}`
pub async fn get_one(
  State(graph): State<SharedGraph>,
  Path(id): Path<PersonId>,
) -> Result<Json<Person>, ApiError> {
  let graph = lock(&graph)?;
  let person = graph
    .get_person(id)
    .cloned()
    .ok_or_else(|| ApiError::NotFound(format!("person {id} not found")))?;
  Ok(Json(person))
}

// ─── Children ─────────────────────────────────────────────────────────────────

/// `GET /persons/{id}/children`
pub async fn children(
  State(graph): State<SharedGraph>,
  Path(id): Path<PersonId>,
) -> Result<Json<Vec<PersonId>>, ApiError> {
  let graph = lock(&graph)?;
  if graph.get_person(id).is_none() {
    return Err(ApiError::NotFound(format!("person {id} not found")));
  }
  Ok(Json(graph.children_of(id)))
}
