//! Graph interchange codecs for Stemma.
//!
//! Converts a [`FamilyGraph`] into formats that graph tooling understands.
//! Pure synchronous; no HTTP or database dependencies.
//!
//! # Quick start
//!
//! ```no_run
//! use stemma_core::{FamilyGraph, PersonRecord};
//!
//! let mut graph = FamilyGraph::new();
//! graph.add_person(PersonRecord::named("Keller", "Hans"));
//!
//! let graphml = stemma_export::to_graphml(&graph).unwrap();
//! let json = serde_json::to_string(&stemma_export::to_node_link(&graph)).unwrap();
//! println!("{graphml}\n{json}");
//! ```

pub mod error;
mod graphml;
mod node_link;

pub use error::{Error, Result};
pub use node_link::{NodeLinkGraph, NodeLinkLink, NodeLinkNode};
use stemma_core::FamilyGraph;

// ─── Public API ──────────────────────────────────────────────────────────────

/// MIME type for GraphML documents.
pub const GRAPHML_CONTENT_TYPE: &str = "application/graphml+xml";

/// Serialise `graph` as a GraphML document.
///
/// Every person attribute becomes a `<data>` entry; unset attributes are
/// omitted. Each node also carries a `label` ("Given Family"), and each edge
/// its `relation_type`.
pub fn to_graphml(graph: &FamilyGraph) -> Result<String> { graphml::write(graph) }

/// Convert `graph` into the node-link JSON shape.
pub fn to_node_link(graph: &FamilyGraph) -> NodeLinkGraph { node_link::from_graph(graph) }

/// Restore a registry from its node-link form.
///
/// Fails if the document lists a person twice, reuses an external id, or
/// links to a person it does not list.
pub fn from_node_link(doc: NodeLinkGraph) -> Result<FamilyGraph> { node_link::into_graph(doc) }
