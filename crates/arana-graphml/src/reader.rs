//! GraphML import.
//!
//! The document is deserialized into the structs in [`crate::schema`], then
//! replayed into a fresh [`ConnectionGraph`] through its typed mutators, so an
//! imported graph obeys the same schema as one built by hand.

use std::collections::HashMap;
use std::fs;
use std::io::ErrorKind;
use std::path::Path;

use arana_core::{AttrValue, Attributes, EdgeKind, NodeKind};
use arana_graph::store::{RESERVED_EDGE_KEYS, RESERVED_NODE_KEYS};
use arana_graph::ConnectionGraph;

use crate::error::{GraphmlError, Result};
use crate::schema::{DataElement, GraphmlDocument, KeyDecl, KeyDomain, ValueType};

/// A resolved `<key>` declaration.
#[derive(Debug)]
struct Key {
    name: String,
    domain: KeyDomain,
    value_type: ValueType,
    default: Option<AttrValue>,
}

struct KeyIndex {
    keys: HashMap<String, Key>,
}

impl KeyIndex {
    fn build(decls: &[KeyDecl]) -> Result<Self> {
        let mut keys = HashMap::with_capacity(decls.len());
        for decl in decls {
            let invalid = |reason: String| GraphmlError::InvalidKey {
                id: decl.id.clone(),
                reason,
            };

            // Port and hyperedge keys never apply to nodes or edges.
            let Some(domain) = KeyDomain::parse(decl.domain.as_deref()) else {
                tracing::warn!(
                    key = %decl.id,
                    domain = decl.domain.as_deref().unwrap_or_default(),
                    "Skipping key for unsupported domain"
                );
                continue;
            };
            let value_type = ValueType::parse(decl.value_type.as_deref()).ok_or_else(|| {
                invalid(format!("unsupported type {:?}", decl.value_type.as_deref()))
            })?;
            let default = match &decl.default {
                Some(raw) => Some(
                    value_type
                        .decode(raw)
                        .ok_or_else(|| invalid(format!("bad default {raw:?}")))?,
                ),
                None => None,
            };

            keys.insert(
                decl.id.clone(),
                Key {
                    name: decl.name.clone().unwrap_or_else(|| decl.id.clone()),
                    domain,
                    value_type,
                    default,
                },
            );
        }
        Ok(Self { keys })
    }

    /// Decode an element's `<data>` children, then fill in declared defaults
    /// for anything missing.
    fn decode(&self, element: KeyDomain, data: &[DataElement]) -> Result<Attributes> {
        let mut attrs = Attributes::new();
        for item in data {
            let key = self
                .keys
                .get(&item.key)
                .ok_or_else(|| GraphmlError::UnknownKey(item.key.clone()))?;
            let value =
                key.value_type
                    .decode(&item.value)
                    .ok_or_else(|| GraphmlError::InvalidValue {
                        name: key.name.clone(),
                        value_type: key.value_type.to_string(),
                        value: item.value.clone(),
                    })?;
            attrs.insert(key.name.clone(), value);
        }

        for key in self.keys.values() {
            if let Some(default) = &key.default {
                if key.domain.covers(element) && !attrs.contains_key(&key.name) {
                    attrs.insert(key.name.clone(), default.clone());
                }
            }
        }
        Ok(attrs)
    }
}

/// Parse a GraphML document into a new graph.
pub fn parse_graphml(xml: &[u8]) -> Result<ConnectionGraph> {
    let document: GraphmlDocument =
        quick_xml::de::from_reader(xml).map_err(|e| GraphmlError::XmlParse(format!("{e}")))?;
    build_graph(document)
}

/// Read a GraphML file into a new graph.
///
/// A missing file is reported as [`GraphmlError::FileNotFound`].
pub fn import_graph_from_graphml_file(path: impl AsRef<Path>) -> Result<ConnectionGraph> {
    let path = path.as_ref();
    let bytes = fs::read(path).map_err(|e| match e.kind() {
        ErrorKind::NotFound => GraphmlError::FileNotFound {
            path: path.display().to_string(),
        },
        _ => GraphmlError::Io(e),
    })?;

    let graph = parse_graphml(&bytes)?;
    tracing::info!(
        path = %path.display(),
        nodes = graph.node_count(),
        edges = graph.edge_count(),
        "Graph imported"
    );
    Ok(graph)
}

fn build_graph(document: GraphmlDocument) -> Result<ConnectionGraph> {
    let keys = KeyIndex::build(&document.keys)?;
    let element = document.graph;

    if element.edge_default.as_deref() == Some("undirected") {
        tracing::warn!(
            graph_id = element.id.as_deref().unwrap_or_default(),
            "Undirected GraphML document, reading edges as directed"
        );
    }

    let mut graph = ConnectionGraph::with_attributes(keys.decode(KeyDomain::Graph, &element.data)?);

    for node in &element.nodes {
        let mut attrs = keys.decode(KeyDomain::Node, &node.data)?;
        let kind = take_kind(&mut attrs)
            .ok_or_else(|| GraphmlError::InvalidNode {
                id: node.id.clone(),
                reason: "missing kind".to_string(),
            })?
            .parse::<NodeKind>()
            .map_err(|e| GraphmlError::InvalidNode {
                id: node.id.clone(),
                reason: e.to_string(),
            })?;

        // Color, size and label are derived from the record itself.
        for key in RESERVED_NODE_KEYS {
            attrs.remove(key);
        }
        if !graph.insert_node(&node.id, kind, attrs) {
            return Err(GraphmlError::InvalidNode {
                id: node.id.clone(),
                reason: "rejected by schema".to_string(),
            });
        }
    }

    for edge in &element.edges {
        let invalid = |reason: String| GraphmlError::InvalidEdge {
            origin: edge.origin.clone(),
            destination: edge.destination.clone(),
            reason,
        };

        if edge.directed.as_deref() == Some("false") {
            tracing::warn!(
                origin = %edge.origin,
                destination = %edge.destination,
                "Undirected edge, reading as directed"
            );
        }
        let mut attrs = keys.decode(KeyDomain::Edge, &edge.data)?;
        let kind = take_kind(&mut attrs)
            .ok_or_else(|| invalid("missing kind".to_string()))?
            .parse::<EdgeKind>()
            .map_err(|e| invalid(e.to_string()))?;

        for key in RESERVED_EDGE_KEYS {
            attrs.remove(key);
        }
        // Undeclared endpoints are kept as the store keeps them, with a warning.
        graph.insert_edge(&edge.origin, &edge.destination, kind, attrs);
    }

    tracing::debug!(
        nodes = graph.node_count(),
        edges = graph.edge_count(),
        "GraphML document replayed"
    );
    Ok(graph)
}

fn take_kind(attrs: &mut Attributes) -> Option<String> {
    match attrs.remove("kind")? {
        AttrValue::String(kind) => Some(kind),
        _ => None,
    }
}
