//! Schema-checked storage for the directed connection graph.
//!
//! Nodes are keyed by their unique label, edges by the ordered
//! `(origin, destination)` pair, so there is at most one edge per pair.
//! Schema violations never surface as errors: they are logged and the call
//! leaves the graph untouched.

use std::collections::BTreeMap;

use arana_core::{AttrValue, Attributes, EdgeKind, NodeKind, Rgb, DEFAULT_NODE_SIZE};
use serde::Serialize;

/// Node attribute keys owned by the store. Caller-supplied values for these are dropped.
pub const RESERVED_NODE_KEYS: [&str; 6] = ["kind", "label", "r", "g", "b", "size"];

/// Edge attribute keys owned by the store.
pub const RESERVED_EDGE_KEYS: [&str; 2] = ["kind", "label"];

/// Identity of an edge: `(origin label, destination label)`.
pub type EdgeKey = (String, String);

/// A stored node: its kind plus free-form domain attributes.
///
/// Color and size are derived from the kind and never stored separately.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct NodeRecord {
    kind: NodeKind,
    attrs: Attributes,
}

impl NodeRecord {
    pub fn kind(&self) -> NodeKind {
        self.kind
    }

    pub fn color(&self) -> Rgb {
        self.kind.color()
    }

    pub fn size(&self) -> f64 {
        DEFAULT_NODE_SIZE
    }

    /// Domain attributes only (`skills`, `role`, caller extras).
    pub fn attrs(&self) -> &Attributes {
        &self.attrs
    }

    pub fn get(&self, key: &str) -> Option<&AttrValue> {
        self.attrs.get(key)
    }

    /// String-valued domain attribute, if present and a string.
    pub fn get_str(&self, key: &str) -> Option<&str> {
        self.attrs.get(key).and_then(AttrValue::as_str)
    }

    /// The full flattened attribute view, as persisted: domain attributes plus
    /// `label`, `kind`, `r`, `g`, `b` and `size`.
    pub fn attributes(&self, label: &str) -> Attributes {
        let color = self.color();
        let mut all = self.attrs.clone();
        all.insert("label".to_string(), AttrValue::from(label));
        all.insert("kind".to_string(), AttrValue::from(self.kind.as_str()));
        all.insert("r".to_string(), AttrValue::Int(color.r.into()));
        all.insert("g".to_string(), AttrValue::Int(color.g.into()));
        all.insert("b".to_string(), AttrValue::Int(color.b.into()));
        all.insert("size".to_string(), AttrValue::Double(self.size()));
        all
    }
}

/// A stored directed edge.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct EdgeRecord {
    kind: EdgeKind,
    attrs: Attributes,
}

impl EdgeRecord {
    pub fn kind(&self) -> EdgeKind {
        self.kind
    }

    pub fn attrs(&self) -> &Attributes {
        &self.attrs
    }

    pub fn get(&self, key: &str) -> Option<&AttrValue> {
        self.attrs.get(key)
    }

    /// The full flattened attribute view: domain attributes plus `kind` and
    /// its display copy `label`.
    pub fn attributes(&self) -> Attributes {
        let mut all = self.attrs.clone();
        all.insert("label".to_string(), AttrValue::from(self.kind.as_str()));
        all.insert("kind".to_string(), AttrValue::from(self.kind.as_str()));
        all
    }
}

/// The connection graph: one per session, owning every node and edge.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ConnectionGraph {
    graph: Attributes,
    nodes: BTreeMap<String, NodeRecord>,
    edges: BTreeMap<EdgeKey, EdgeRecord>,
}

impl ConnectionGraph {
    pub fn new() -> Self {
        Self::default()
    }

    /// Create an empty graph carrying the given metadata.
    pub fn with_attributes(graph_attributes: Attributes) -> Self {
        Self {
            graph: graph_attributes,
            ..Self::default()
        }
    }

    // ── Read views ───────────────────────────────────────────────

    /// Graph-level metadata.
    pub fn graph(&self) -> &Attributes {
        &self.graph
    }

    pub fn nodes(&self) -> &BTreeMap<String, NodeRecord> {
        &self.nodes
    }

    pub fn edges(&self) -> &BTreeMap<EdgeKey, EdgeRecord> {
        &self.edges
    }

    pub fn node(&self, label: &str) -> Option<&NodeRecord> {
        self.nodes.get(label)
    }

    pub fn edge(&self, origin: &str, destination: &str) -> Option<&EdgeRecord> {
        self.edges
            .get(&(origin.to_string(), destination.to_string()))
    }

    pub fn contains_node(&self, label: &str) -> bool {
        self.nodes.contains_key(label)
    }

    pub fn contains_edge(&self, origin: &str, destination: &str) -> bool {
        self.edge(origin, destination).is_some()
    }

    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }

    pub fn edge_count(&self) -> usize {
        self.edges.len()
    }

    /// Outgoing edges of `origin`, ordered by destination label.
    pub fn outgoing<'a>(
        &'a self,
        origin: &'a str,
    ) -> impl Iterator<Item = (&'a str, &'a EdgeRecord)> + 'a {
        self.edges
            .range((origin.to_string(), String::new())..)
            .take_while(move |((from, _), _)| from == origin)
            .map(|((_, to), record)| (to.as_str(), record))
    }

    // ── Mutations ────────────────────────────────────────────────

    /// Reset to the empty graph, metadata included.
    pub fn clear(&mut self) {
        tracing::info!(
            nodes = self.nodes.len(),
            edges = self.edges.len(),
            "Clearing graph"
        );
        self.graph.clear();
        self.nodes.clear();
        self.edges.clear();
    }

    /// Add or overwrite a node, validating `kind` against the node schema.
    ///
    /// An unknown kind is logged and ignored. Returns whether the graph changed.
    pub fn add_node(&mut self, label: &str, kind: &str, attrs: Attributes) -> bool {
        match kind.parse::<NodeKind>() {
            Ok(kind) => self.insert_node(label, kind, attrs),
            Err(e) => {
                tracing::error!(label = %label, error = %e, "Rejected node, doing nothing");
                false
            }
        }
    }

    /// Typed form of [`add_node`](Self::add_node).
    ///
    /// Re-adding an existing label replaces its attributes entirely.
    pub fn insert_node(&mut self, label: &str, kind: NodeKind, attrs: Attributes) -> bool {
        if label.is_empty() {
            tracing::error!(kind = %kind, "Rejected node with empty label, doing nothing");
            return false;
        }

        tracing::info!(label = %label, kind = %kind, "Adding node");
        if self.nodes.contains_key(label) {
            tracing::warn!(label = %label, "Node already exists, overwriting");
        }

        let attrs = strip_reserved(attrs, &RESERVED_NODE_KEYS, label);
        self.nodes
            .insert(label.to_string(), NodeRecord { kind, attrs });
        true
    }

    /// Add or overwrite the edge `origin -> destination`, validating `kind`
    /// against the edge schema.
    ///
    /// An unknown kind is logged and ignored. Returns whether the graph changed.
    pub fn add_edge(
        &mut self,
        origin: &str,
        destination: &str,
        kind: &str,
        attrs: Attributes,
    ) -> bool {
        match kind.parse::<EdgeKind>() {
            Ok(kind) => self.insert_edge(origin, destination, kind, attrs),
            Err(e) => {
                tracing::error!(
                    origin = %origin,
                    destination = %destination,
                    error = %e,
                    "Rejected edge, doing nothing"
                );
                false
            }
        }
    }

    /// Typed form of [`add_edge`](Self::add_edge).
    ///
    /// Endpoint existence is the caller's responsibility; a missing endpoint
    /// is only logged.
    pub fn insert_edge(
        &mut self,
        origin: &str,
        destination: &str,
        kind: EdgeKind,
        attrs: Attributes,
    ) -> bool {
        tracing::info!(
            origin = %origin,
            destination = %destination,
            kind = %kind,
            "Adding edge"
        );

        for endpoint in [origin, destination] {
            if !self.nodes.contains_key(endpoint) {
                tracing::warn!(label = %endpoint, "Edge endpoint is not a node in the graph");
            }
        }

        let key = (origin.to_string(), destination.to_string());
        if self.edges.contains_key(&key) {
            tracing::warn!(
                origin = %origin,
                destination = %destination,
                "Edge already exists, overwriting"
            );
        }

        let context = format!("{origin} -> {destination}");
        let attrs = strip_reserved(attrs, &RESERVED_EDGE_KEYS, &context);
        self.edges.insert(key, EdgeRecord { kind, attrs });
        true
    }
}

fn strip_reserved(mut attrs: Attributes, reserved: &[&str], owner: &str) -> Attributes {
    for key in reserved {
        if attrs.remove(*key).is_some() {
            tracing::warn!(owner = %owner, key = %key, "Dropped reserved attribute");
        }
    }
    attrs
}
