//! GraphML document structure.
//!
//! Typed structs that deserialize a GraphML document with `quick-xml` and
//! serde, plus the key domains and value types shared by reader and writer.
//! Only the subset of GraphML needed for attributed simple graphs is modelled;
//! ports, hyperedges and nested graphs are ignored.

use std::fmt;

use arana_core::AttrValue;
use serde::Deserialize;

pub const GRAPHML_NS: &str = "http://graphml.graphdrawing.org/xmlns";
pub const XSI_NS: &str = "http://www.w3.org/2001/XMLSchema-instance";
pub const SCHEMA_LOCATION: &str =
    "http://graphml.graphdrawing.org/xmlns http://graphml.graphdrawing.org/xmlns/1.0/graphml.xsd";

/// Root element: `<graphml>`.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename = "graphml")]
pub struct GraphmlDocument {
    #[serde(rename = "key", default)]
    pub keys: Vec<KeyDecl>,
    pub graph: GraphElement,
}

/// An attribute declaration: `<key id=".." for=".." attr.name=".." attr.type="..">`.
#[derive(Debug, Clone, Deserialize)]
pub struct KeyDecl {
    #[serde(rename = "@id")]
    pub id: String,
    #[serde(rename = "@for")]
    pub domain: Option<String>,
    #[serde(rename = "@attr.name")]
    pub name: Option<String>,
    #[serde(rename = "@attr.type")]
    pub value_type: Option<String>,
    pub default: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct GraphElement {
    #[serde(rename = "@id")]
    pub id: Option<String>,
    #[serde(rename = "@edgedefault")]
    pub edge_default: Option<String>,
    #[serde(rename = "data", default)]
    pub data: Vec<DataElement>,
    #[serde(rename = "node", default)]
    pub nodes: Vec<NodeElement>,
    #[serde(rename = "edge", default)]
    pub edges: Vec<EdgeElement>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct NodeElement {
    #[serde(rename = "@id")]
    pub id: String,
    #[serde(rename = "data", default)]
    pub data: Vec<DataElement>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct EdgeElement {
    #[serde(rename = "@source")]
    pub origin: String,
    #[serde(rename = "@target")]
    pub destination: String,
    #[serde(rename = "@directed")]
    pub directed: Option<String>,
    #[serde(rename = "data", default)]
    pub data: Vec<DataElement>,
}

/// `<data key="..">value</data>`.
#[derive(Debug, Clone, Deserialize)]
pub struct DataElement {
    #[serde(rename = "@key")]
    pub key: String,
    #[serde(rename = "$text", default)]
    pub value: String,
}

// ── Key domains and value types ───────────────────────────────────

/// Which element kind a key applies to (GraphML `for`).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum KeyDomain {
    Graph,
    Node,
    Edge,
    All,
}

impl KeyDomain {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Graph => "graph",
            Self::Node => "node",
            Self::Edge => "edge",
            Self::All => "all",
        }
    }

    /// An absent `for` means `all`. Returns `None` for unsupported domains
    /// (`port`, `hyperedge`, ...).
    pub fn parse(domain: Option<&str>) -> Option<Self> {
        match domain.unwrap_or("all") {
            "graph" => Some(Self::Graph),
            "node" => Some(Self::Node),
            "edge" => Some(Self::Edge),
            "all" => Some(Self::All),
            _ => None,
        }
    }

    pub fn covers(&self, element: KeyDomain) -> bool {
        *self == Self::All || *self == element
    }
}

/// GraphML `attr.type`, collapsed onto the scalar types of [`AttrValue`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum ValueType {
    Boolean,
    Long,
    Double,
    String,
}

impl ValueType {
    /// The name written for this type. Integers are 64-bit, so `long`.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Boolean => "boolean",
            Self::Long => "long",
            Self::Double => "double",
            Self::String => "string",
        }
    }

    /// An absent `attr.type` means `string`.
    pub fn parse(value_type: Option<&str>) -> Option<Self> {
        match value_type.unwrap_or("string") {
            "boolean" => Some(Self::Boolean),
            "int" | "long" => Some(Self::Long),
            "float" | "double" => Some(Self::Double),
            "string" => Some(Self::String),
            _ => None,
        }
    }

    pub fn of(value: &AttrValue) -> Self {
        match value {
            AttrValue::Bool(_) => Self::Boolean,
            AttrValue::Int(_) => Self::Long,
            AttrValue::Double(_) => Self::Double,
            AttrValue::String(_) => Self::String,
        }
    }

    /// Decode the text content of a `<data>` or `<default>` element.
    pub fn decode(&self, raw: &str) -> Option<AttrValue> {
        match self {
            Self::Boolean => match raw.trim().to_lowercase().as_str() {
                "true" | "1" => Some(AttrValue::Bool(true)),
                "false" | "0" => Some(AttrValue::Bool(false)),
                _ => None,
            },
            Self::Long => raw.trim().parse().ok().map(AttrValue::Int),
            Self::Double => raw.trim().parse().ok().map(AttrValue::Double),
            Self::String => Some(AttrValue::String(raw.to_string())),
        }
    }
}

impl fmt::Display for ValueType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Text form of a value, readable back by [`ValueType::decode`].
pub fn encode_value(value: &AttrValue) -> String {
    match value {
        AttrValue::Bool(b) => b.to_string(),
        AttrValue::Int(i) => i.to_string(),
        // Debug keeps the fractional part ("10.0") and round-trips exactly.
        AttrValue::Double(d) => format!("{d:?}"),
        AttrValue::String(s) => s.clone(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_value_type_names() {
        assert_eq!(ValueType::parse(Some("int")), Some(ValueType::Long));
        assert_eq!(ValueType::parse(Some("float")), Some(ValueType::Double));
        assert_eq!(ValueType::parse(None), Some(ValueType::String));
        assert_eq!(ValueType::parse(Some("complex")), None);
    }

    #[test]
    fn test_decode_values() {
        assert_eq!(ValueType::Long.decode("217"), Some(AttrValue::Int(217)));
        assert_eq!(ValueType::Double.decode("10.0"), Some(AttrValue::Double(10.0)));
        assert_eq!(ValueType::Boolean.decode("True"), Some(AttrValue::Bool(true)));
        assert_eq!(ValueType::Boolean.decode("maybe"), None);
        assert_eq!(ValueType::Long.decode("ten"), None);
        assert_eq!(
            ValueType::String.decode("Python,Rust"),
            Some(AttrValue::from("Python,Rust"))
        );
    }

    #[test]
    fn test_encode_decode_doubles() {
        for d in [10.0, 0.1, -3.5e-9, 1e21] {
            let text = encode_value(&AttrValue::Double(d));
            assert_eq!(ValueType::Double.decode(&text), Some(AttrValue::Double(d)));
        }
        assert_eq!(encode_value(&AttrValue::Double(10.0)), "10.0");
    }

    #[test]
    fn test_domain_parsing() {
        assert_eq!(KeyDomain::parse(None), Some(KeyDomain::All));
        assert_eq!(KeyDomain::parse(Some("edge")), Some(KeyDomain::Edge));
        assert_eq!(KeyDomain::parse(Some("port")), None);
        assert!(KeyDomain::All.covers(KeyDomain::Node));
        assert!(!KeyDomain::Graph.covers(KeyDomain::Node));
    }
}
