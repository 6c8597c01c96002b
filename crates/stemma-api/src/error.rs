//! API error type and [`axum::response::IntoResponse`] implementation.

use axum::{
  Json,
  http::StatusCode,
  response::{IntoResponse, Response},
};
use serde_json::json;
use thiserror::Error;

/// An error returned by an API handler.
#[derive(Debug, Error)]
pub enum ApiError {
  #[error("not found: {0}")]
  NotFound(String),

  #[error("bad request: {0}")]
  BadRequest(String),

  /// A well-formed request whose record fails validation.
  #[error("unprocessable: {0}")]
  Unprocessable(String),

  #[error("export error: {0}")]
  Export(#[from] stemma_export::Error),

  #[error("registry lock poisoned")]
  Poisoned,
}

impl From<stemma_core::Error> for ApiError {
  fn from(e: stemma_core::Error) -> Self {
    use stemma_core::Error as E;
    match e {
      E::Validation { .. } => Self::Unprocessable(e.to_string()),
      E::InvalidRelationType(_) => Self::BadRequest(e.to_string()),
      E::UnknownPerson(_) => Self::NotFound(e.to_string()),
      E::DuplicatePerson(_) | E::DuplicateExternalId(_) => Self::BadRequest(e.to_string()),
    }
  }
}

impl IntoResponse for ApiError {
  fn into_response(self) -> Response {
    let (status, message) = match &self {
      ApiError::NotFound(m) => (StatusCode::NOT_FOUND, m.clone()),
      ApiError::BadRequest(m) => (StatusCode::BAD_REQUEST, m.clone()),
      ApiError::Unprocessable(m) => (StatusCode::UNPROCESSABLE_ENTITY, m.clone()),
      ApiError::Export(e) => (StatusCode::INTERNAL_SERVER_ERROR, e.to_string()),
      ApiError::Poisoned => (StatusCode::INTERNAL_SERVER_ERROR, self.to_string()),
    };
    (status, Json(json!({ "error": message }))).into_response()
  }
}
