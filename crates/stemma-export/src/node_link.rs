//! Node-link JSON: `{directed, multigraph, graph, nodes, links}`.
//!
//! This is the shape graph libraries commonly read and write for JSON
//! interchange. Node attributes are flattened next to `id`; each link carries
//! its `relation_type`.

use serde::{Deserialize, Serialize};
use stemma_core::{FamilyGraph, Person, PersonId, PersonRecord, Relation, RelationType};

use crate::error::Result;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NodeLinkGraph {
  pub directed:   bool,
  /// Two persons may be linked by more than one relation type.
  pub multigraph: bool,
  #[serde(default)]
  pub graph:      serde_json::Map<String, serde_json::Value>,
  pub nodes:      Vec<NodeLinkNode>,
  pub links:      Vec<NodeLinkLink>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NodeLinkNode {
  pub id:         PersonId,
  #[serde(flatten)]
  pub attributes: PersonRecord,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NodeLinkLink {
  pub source:        PersonId,
  pub target:        PersonId,
  pub relation_type: RelationType,
}

pub fn from_graph(graph: &FamilyGraph) -> NodeLinkGraph {
  NodeLinkGraph {
    directed:   true,
    multigraph: true,
    graph:      serde_json::Map::new(),
    nodes:      graph
      .persons()
      .map(|p| NodeLinkNode { id: p.person_id, attributes: p.record.clone() })
      .collect(),
    links:      graph
      .get_edges()
      .into_iter()
      .map(|r| NodeLinkLink {
        source:        r.from,
        target:        r.to,
        relation_type: r.relation_type,
      })
      .collect(),
  }
}

pub fn into_graph(doc: NodeLinkGraph) -> Result<FamilyGraph> {
  let persons = doc
    .nodes
    .into_iter()
    .map(|n| Person { person_id: n.id, record: n.attributes });
  let relations = doc.links.into_iter().map(|l| Relation {
    from:          l.source,
    to:            l.target,
    relation_type: l.relation_type,
  });
  Ok(FamilyGraph::from_parts(persons, relations)?)
}
