//! GraphML writer.
//!
//! Uses `quick-xml`'s writer API. Keys are declared up front for every person
//! attribute so consumers can type the `<data>` values.

use std::io::Cursor;

use quick_xml::{
  Writer,
  events::{BytesDecl, BytesEnd, BytesStart, BytesText, Event},
};
use stemma_core::{FamilyGraph, Person};

use crate::error::Result;

pub const NS_GRAPHML: &str = "http://graphml.graphdrawing.org/xmlns";

type XmlWriter = Writer<Cursor<Vec<u8>>>;

/// `(key id, attr.type)` for every node attribute, in output order.
const NODE_KEYS: [(&str, &str); 9] = [
  ("label", "string"),
  ("external_family_id", "string"),
  ("father_external_family_id", "string"),
  ("family_name", "string"),
  ("given_name", "string"),
  ("birth_year", "int"),
  ("death_year", "int"),
  ("profession", "string"),
  ("origin", "string"),
];

const EDGE_KEY: &str = "relation_type";

pub fn write(graph: &FamilyGraph) -> Result<String> {
  let mut w = Writer::new_with_indent(Cursor::new(Vec::new()), b' ', 2);

  w.write_event(Event::Decl(BytesDecl::new("1.0", Some("UTF-8"), None)))?;

  let mut root = BytesStart::new("graphml");
  root.push_attribute(("xmlns", NS_GRAPHML));
  w.write_event(Event::Start(root))?;

  for (id, ty) in NODE_KEYS {
    write_key(&mut w, id, "node", ty)?;
  }
  write_key(&mut w, EDGE_KEY, "edge", "string")?;

  let mut g = BytesStart::new("graph");
  g.push_attribute(("id", "G"));
  g.push_attribute(("edgedefault", "directed"));
  w.write_event(Event::Start(g))?;

  for person in graph.persons() {
    write_node(&mut w, person)?;
  }

  for (idx, relation) in graph.get_edges().iter().enumerate() {
    let id = format!("e{idx}");
    let source = relation.from.to_string();
    let target = relation.to.to_string();

    let mut edge = BytesStart::new("edge");
    edge.push_attribute(("id", id.as_str()));
    edge.push_attribute(("source", source.as_str()));
    edge.push_attribute(("target", target.as_str()));
    w.write_event(Event::Start(edge))?;
    write_data(&mut w, EDGE_KEY, relation.relation_type.as_str())?;
    w.write_event(Event::End(BytesEnd::new("edge")))?;
  }

  w.write_event(Event::End(BytesEnd::new("graph")))?;
  w.write_event(Event::End(BytesEnd::new("graphml")))?;

  Ok(String::from_utf8(w.into_inner().into_inner())?)
}

fn write_key(w: &mut XmlWriter, id: &str, domain: &str, ty: &str) -> Result<()> {
  let mut key = BytesStart::new("key");
  key.push_attribute(("id", id));
  key.push_attribute(("for", domain));
  key.push_attribute(("attr.name", id));
  key.push_attribute(("attr.type", ty));
  w.write_event(Event::Empty(key))?;
  Ok(())
}

fn write_node(w: &mut XmlWriter, person: &Person) -> Result<()> {
  let id = person.person_id.to_string();
  let mut node = BytesStart::new("node");
  node.push_attribute(("id", id.as_str()));
  w.write_event(Event::Start(node))?;

  let r = &person.record;
  let label = r.display_name();
  let values: [(&str, Option<String>); 9] = [
    ("label", (!label.is_empty()).then_some(label)),
    ("external_family_id", r.external_family_id.clone()),
    ("father_external_family_id", r.father_external_family_id.clone()),
    ("family_name", r.family_name.clone()),
    ("given_name", r.given_name.clone()),
    ("birth_year", r.birth_year.map(|y| y.to_string())),
    ("death_year", r.death_year.map(|y| y.to_string())),
    ("profession", r.profession.clone()),
    ("origin", r.origin.clone()),
  ];
  for (key, value) in values {
    if let Some(value) = value {
      write_data(w, key, &value)?;
    }
  }

  w.write_event(Event::End(BytesEnd::new("node")))?;
  Ok(())
}

fn write_data(w: &mut XmlWriter, key: &str, text: &str) -> Result<()> {
  let mut data = BytesStart::new("data");
  data.push_attribute(("key", key));
  w.write_event(Event::Start(data))?;
  w.write_event(Event::Text(BytesText::new(text)))?;
  w.write_event(Event::End(BytesEnd::new("data")))?;
  Ok(())
}
