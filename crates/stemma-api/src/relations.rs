//! Handlers for `/relations` endpoints.
//!
//! | Method | Path | Notes |
//! |--------|------|-------|
//! | `GET`  | `/relations` | All relations, in insertion order |
//! | `POST` | `/relations` | Body: [`NewRelationBody`]; 201 if new, 200 if it already existed |

use axum::{Json, extract::State, http::StatusCode, response::IntoResponse};
use serde::Deserialize;
use stemma_core::{PersonId, Relation, RelationType, SharedGraph};

use crate::{error::ApiError, lock};

/// `GET /relations`
pub async fn list(State(graph): State<SharedGraph>) -> Result<Json<Vec<Relation>>, ApiError> {
  Ok(Json(lock(&graph)?.get_edges()))
}

/// JSON body accepted by `POST /relations`.
///
/// `relation_type` is kept as a string so that an unknown kind is reported
/// as an invalid relation type rather than a generic body error.
#[derive(Debug, Deserialize)]
pub struct NewRelationBody {
  pub from:          PersonId,
  pub to:            PersonId,
  pub relation_type: String,
}

/// `POST /relations` — body: `{"from":"<uuid>","to":"<uuid>","relation_type":"FATHER_CHILD"}`
pub async fn create(
  State(graph): State<SharedGraph>,
  Json(body): Json<NewRelationBody>,
) -> Result<impl IntoResponse, ApiError> {
  let relation_type = RelationType::parse(&body.relation_type)?;
  let inserted = lock(&graph)?.add_relation(body.from, body.to, relation_type)?;

  let relation = Relation { from: body.from, to: body.to, relation_type };
  if inserted {
    tracing::info!(from = %relation.from, to = %relation.to, %relation_type, "relation added");
  }
  let status = if inserted { StatusCode::CREATED } else { StatusCode::OK };
  Ok((status, Json(relation)))
}
