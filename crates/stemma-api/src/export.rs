//! Handlers for `/export` endpoints.
//!
//! | Method | Path | Notes |
//! |--------|------|-------|
//! | `GET`  | `/export/graphml` | `application/graphml+xml` document |
//! | `GET`  | `/export/node-link` | Node-link JSON |

use axum::{Json, extract::State, http::header, response::IntoResponse};
use stemma_core::SharedGraph;
use stemma_export::{GRAPHML_CONTENT_TYPE, NodeLinkGraph};

use crate::{error::ApiError, lock};

/// `GET /export/graphml`
pub async fn graphml(State(graph): State<SharedGraph>) -> Result<impl IntoResponse, ApiError> {
  let xml = stemma_export::to_graphml(&*lock(&graph)?)?;
  Ok(([(header::CONTENT_TYPE, GRAPHML_CONTENT_TYPE)], xml))
}

/// `GET /export/node-link`
pub async fn node_link(State(graph): State<SharedGraph>) -> Result<Json<NodeLinkGraph>, ApiError> {
  Ok(Json(stemma_export::to_node_link(&*lock(&graph)?)))
}
