//! JSON REST API for Stemma.
//!
//! Exposes an axum [`Router`] over a [`SharedGraph`]. Every write handler
//! holds the registry lock for the whole resolve-merge-insert sequence and
//! never awaits while holding it. Auth, TLS, and transport concerns are the
//! caller's responsibility.
//!
//! # Mounting
//!
//! ```rust,ignore
//! .nest("/api", stemma_api::api_router(graph.clone()))
//! ```

pub mod error;
pub mod export;
pub mod persons;
pub mod relations;

use std::sync::MutexGuard;

use axum::{Router, routing::get};
use stemma_core::{FamilyGraph, SharedGraph};

pub use error::ApiError;

/// Build a fully-materialised API router for `graph`.
///
/// The returned `Router<()>` can be nested into any parent router regardless
/// of its own state type.
pub fn api_router(graph: SharedGraph) -> Router<()> {
  Router::new()
    // Persons
    .route("/persons", get(persons::list).post(persons::create))
    .route("/persons/{id}", get(persons::get_one))
    .route("/persons/{id}/children", get(persons::children))
    // Relations
    .route("/relations", get(relations::list).post(relations::create))
    // Export
    .route("/export/graphml", get(export::graphml))
    .route("/export/node-link", get(export::node_link))
    .with_state(graph)
}

/// Take the registry lock, reporting a poisoned lock as an API error.
pub(crate) fn lock(graph: &SharedGraph) -> Result<MutexGuard<'_, FamilyGraph>, ApiError> {
  graph.lock().map_err(|_| ApiError::Poisoned)
}

// ─── Integration tests ────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
  use super::*;

  use axum::{
    body::Body,
    http::{Request, StatusCode, header},
  };
  use serde_json::{Value, json};
  use tower::ServiceExt as _;

  async fn send(
    graph:  &SharedGraph,
    method: &str,
    uri:    &str,
    body:   Option<Value>,
  ) -> (StatusCode, Value) {
    let mut builder = Request::builder().method(method).uri(uri);
    let body = match body {
      Some(v) => {
        builder = builder.header(header::CONTENT_TYPE, "application/json");
        Body::from(v.to_string())
      }
      None => Body::empty(),
    };
    let resp = api_router(graph.clone())
      .oneshot(builder.body(body).unwrap())
      .await
      .unwrap();

    let status = resp.status();
    let bytes  = axum::body::to_bytes(resp.into_body(), usize::MAX).await.unwrap();
    let json   = serde_json::from_slice(&bytes).unwrap_or(Value::Null);
    (status, json)
  }

  fn record(ext: Value, father: Value, family: &str, given: Value) -> Value {
    json!({
      "external_family_id": ext,
      "father_external_family_id": father,
      "family_name": family,
      "given_name": given,
    })
  }

  // ── Persons ──────────────────────────────────────────────────────────────────

  #[tokio::test]
  async fn create_person_returns_201_then_200_on_resolution() {
    let graph = FamilyGraph::shared();
    let body  = record(json!("F1"), Value::Null, "Keller", json!("Hans"));

    let (status, first) = send(&graph, "POST", "/persons", Some(body.clone())).await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(first["created"], true);

    let (status, second) = send(&graph, "POST", "/persons", Some(body)).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(second["created"], false);
    assert_eq!(second["person_id"], first["person_id"]);
  }

  #[tokio::test]
  async fn missing_mandatory_key_returns_422_naming_it() {
    let graph = FamilyGraph::shared();
    let body  = json!({
      "external_family_id": "F1",
      "father_external_family_id": null,
      "family_name": "Keller",
    });

    let (status, json) = send(&graph, "POST", "/persons", Some(body)).await;
    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
    assert!(json["error"].as_str().unwrap().contains("given_name"), "{json}");
    assert_eq!(graph.lock().unwrap().person_count(), 0);
  }

  #[tokio::test]
  async fn get_person_and_404() {
    let graph = FamilyGraph::shared();
    let (_, added) = send(
      &graph,
      "POST",
      "/persons",
      Some(record(Value::Null, Value::Null, "Escher", json!("Regula"))),
    )
    .await;
    let id = added["person_id"].as_str().unwrap();

    let (status, person) = send(&graph, "GET", &format!("/persons/{id}"), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(person["given_name"], "Regula");

    let missing = uuid::Uuid::new_v4();
    let (status, _) = send(&graph, "GET", &format!("/persons/{missing}"), None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
  }

  // ── Relations ────────────────────────────────────────────────────────────────

  #[tokio::test]
  async fn keller_scenario_over_http() {
    let graph = FamilyGraph::shared();

    let (_, a) = send(
      &graph,
      "POST",
      "/persons",
      Some(record(json!("F1"), Value::Null, "Keller", json!("Hans"))),
    )
    .await;
    let mut anna = record(json!("F2"), json!("F1"), "Keller", json!("Anna"));
    anna["birth_year"] = json!(1610);
    let (_, b) = send(&graph, "POST", "/persons", Some(anna)).await;

    let body = json!({
      "from": a["person_id"],
      "to": b["person_id"],
      "relation_type": "FATHER_CHILD",
    });
    let (status, _) = send(&graph, "POST", "/relations", Some(body)).await;
    assert_eq!(status, StatusCode::CREATED);

    let mut c = record(Value::Null, json!("F1"), "Keller", Value::Null);
    c["birth_year"] = json!(1610);
    let (status, resolved) = send(&graph, "POST", "/persons", Some(c)).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(resolved["person_id"], b["person_id"]);

    let uri = format!("/persons/{}/children", a["person_id"].as_str().unwrap());
    let (_, children) = send(&graph, "GET", &uri, None).await;
    assert_eq!(children, json!([b["person_id"]]));
  }

  #[tokio::test]
  async fn duplicate_relation_returns_200_and_is_stored_once() {
    let graph = FamilyGraph::shared();
    let (_, a) = send(
      &graph,
      "POST",
      "/persons",
      Some(record(Value::Null, Value::Null, "Keller", json!("Hans"))),
    )
    .await;
    let (_, b) = send(
      &graph,
      "POST",
      "/persons",
      Some(record(Value::Null, Value::Null, "Escher", json!("Regula"))),
    )
    .await;
    let body = json!({
      "from": a["person_id"],
      "to": b["person_id"],
      "relation_type": "HUSBAND_WIFE",
    });

    let (first, _) = send(&graph, "POST", "/relations", Some(body.clone())).await;
    let (second, _) = send(&graph, "POST", "/relations", Some(body)).await;
    assert_eq!(first, StatusCode::CREATED);
    assert_eq!(second, StatusCode::OK);

    let (_, edges) = send(&graph, "GET", "/relations", None).await;
    assert_eq!(edges.as_array().unwrap().len(), 1);
    assert_eq!(edges[0]["relation_type"], "HUSBAND_WIFE");
  }

  #[tokio::test]
  async fn sibling_relation_returns_400() {
    let graph = FamilyGraph::shared();
    let (_, a) = send(
      &graph,
      "POST",
      "/persons",
      Some(record(Value::Null, Value::Null, "Keller", json!("Hans"))),
    )
    .await;
    let (_, b) = send(
      &graph,
      "POST",
      "/persons",
      Some(record(Value::Null, Value::Null, "Keller", json!("Jakob"))),
    )
    .await;

    let body = json!({
      "from": a["person_id"],
      "to": b["person_id"],
      "relation_type": "SIBLING",
    });
    let (status, json) = send(&graph, "POST", "/relations", Some(body)).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(json["error"].as_str().unwrap().contains("SIBLING"));
    assert_eq!(graph.lock().unwrap().relation_count(), 0);
  }

  #[tokio::test]
  async fn relation_to_unknown_person_returns_404() {
    let graph = FamilyGraph::shared();
    let (_, a) = send(
      &graph,
      "POST",
      "/persons",
      Some(record(Value::Null, Value::Null, "Keller", json!("Hans"))),
    )
    .await;

    let body = json!({
      "from": a["person_id"],
      "to": uuid::Uuid::new_v4(),
      "relation_type": "FATHER_CHILD",
    });
    let (status, _) = send(&graph, "POST", "/relations", Some(body)).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
  }

  // ── Export ───────────────────────────────────────────────────────────────────

  #[tokio::test]
  async fn graphml_export_has_content_type() {
    let graph = FamilyGraph::shared();
    let hans = record(json!("F1"), Value::Null, "Keller", json!("Hans"));
    send(&graph, "POST", "/persons", Some(hans)).await;

    let req  = Request::builder().uri("/export/graphml").body(Body::empty()).unwrap();
    let resp = api_router(graph.clone()).oneshot(req).await.unwrap();
    assert_eq!(resp.status(), StatusCode::OK);
    assert_eq!(
      resp.headers().get(header::CONTENT_TYPE).unwrap(),
      stemma_export::GRAPHML_CONTENT_TYPE
    );
    let bytes = axum::body::to_bytes(resp.into_body(), usize::MAX).await.unwrap();
    let xml   = std::str::from_utf8(&bytes).unwrap();
    assert!(xml.contains("<graphml"), "{xml}");
    assert!(xml.contains("Keller"), "{xml}");
  }

  #[tokio::test]
  async fn node_link_export_lists_nodes() {
    let graph = FamilyGraph::shared();
    let hans = record(json!("F1"), Value::Null, "Keller", json!("Hans"));
    send(&graph, "POST", "/persons", Some(hans)).await;

    let (status, doc) = send(&graph, "GET", "/export/node-link", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(doc["directed"], true);
    assert_eq!(doc["nodes"][0]["external_family_id"], "F1");
  }
}
