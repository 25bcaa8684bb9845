//! Core domain types for the arana graph.
//!
//! Node and edge kinds form closed schemas: a kind that is not listed here can
//! never reach graph storage. Attribute values are the small set of scalar types
//! the GraphML interchange format can carry.

use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::KindParseError;

/// Size attached to every node, regardless of kind.
pub const DEFAULT_NODE_SIZE: f64 = 10.0;

// ── Node Kinds ────────────────────────────────────────────────────

/// The kind of entity a node represents.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[serde(rename_all = "UPPERCASE")]
pub enum NodeKind {
    Person,
    Organization,
    Place,
    Account,
}

impl NodeKind {
    pub const ALL: [NodeKind; 4] = [
        NodeKind::Person,
        NodeKind::Organization,
        NodeKind::Place,
        NodeKind::Account,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Person => "PERSON",
            Self::Organization => "ORGANIZATION",
            Self::Place => "PLACE",
            Self::Account => "ACCOUNT",
        }
    }

    /// Fixed rendering color for this kind.
    pub fn color(&self) -> Rgb {
        match self {
            Self::Person => Rgb::new(217, 125, 216),
            Self::Organization => Rgb::new(140, 185, 0),
            Self::Place => Rgb::new(0, 199, 255),
            Self::Account => Rgb::new(255, 122, 69),
        }
    }

    /// Membership test against the closed node-kind set.
    pub fn is_valid(candidate: &str) -> bool {
        candidate.parse::<NodeKind>().is_ok()
    }
}

impl FromStr for NodeKind {
    type Err = KindParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|kind| kind.as_str() == s)
            .ok_or_else(|| KindParseError::UnknownNodeKind(s.to_string()))
    }
}

impl fmt::Display for NodeKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// ── Edge Kinds ────────────────────────────────────────────────────

/// The kind of relationship an edge represents.
///
/// Conventionally every edge starts at a Person: `AssocWith` points at an
/// Organization, `BasedIn` at a Place, `OnAccount` at an Account. The pairing is
/// not enforced.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[serde(rename_all = "UPPERCASE")]
pub enum EdgeKind {
    AssocWith,
    BasedIn,
    OnAccount,
}

impl EdgeKind {
    pub const ALL: [EdgeKind; 3] = [EdgeKind::AssocWith, EdgeKind::BasedIn, EdgeKind::OnAccount];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::AssocWith => "ASSOCWITH",
            Self::BasedIn => "BASEDIN",
            Self::OnAccount => "ONACCOUNT",
        }
    }

    /// The node kind this edge conventionally points at.
    pub fn destination_kind(&self) -> NodeKind {
        match self {
            Self::AssocWith => NodeKind::Organization,
            Self::BasedIn => NodeKind::Place,
            Self::OnAccount => NodeKind::Account,
        }
    }

    /// Membership test against the closed edge-kind set.
    pub fn is_valid(candidate: &str) -> bool {
        candidate.parse::<EdgeKind>().is_ok()
    }
}

impl FromStr for EdgeKind {
    type Err = KindParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|kind| kind.as_str() == s)
            .ok_or_else(|| KindParseError::UnknownEdgeKind(s.to_string()))
    }
}

impl fmt::Display for EdgeKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// ── Rendering ─────────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub struct Rgb {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

impl Rgb {
    pub const fn new(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b }
    }
}

// ── Attributes ────────────────────────────────────────────────────

/// A scalar attribute value attached to a node, an edge, or the graph.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(untagged)]
pub enum AttrValue {
    Bool(bool),
    Int(i64),
    Double(f64),
    String(String),
}

impl AttrValue {
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Self::String(s) => Some(s),
            _ => None,
        }
    }
}

impl fmt::Display for AttrValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Bool(b) => write!(f, "{b}"),
            Self::Int(i) => write!(f, "{i}"),
            Self::Double(d) => write!(f, "{d}"),
            Self::String(s) => f.write_str(s),
        }
    }
}

impl From<&str> for AttrValue {
    fn from(value: &str) -> Self {
        Self::String(value.to_string())
    }
}

impl From<String> for AttrValue {
    fn from(value: String) -> Self {
        Self::String(value)
    }
}

impl From<i64> for AttrValue {
    fn from(value: i64) -> Self {
        Self::Int(value)
    }
}

impl From<f64> for AttrValue {
    fn from(value: f64) -> Self {
        Self::Double(value)
    }
}

impl From<bool> for AttrValue {
    fn from(value: bool) -> Self {
        Self::Bool(value)
    }
}

/// Attribute map with deterministic key order.
pub type Attributes = BTreeMap<String, AttrValue>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn node_kind_parses_only_exact_names() {
        assert_eq!("PERSON".parse::<NodeKind>(), Ok(NodeKind::Person));
        assert_eq!("ACCOUNT".parse::<NodeKind>(), Ok(NodeKind::Account));
        assert!("person".parse::<NodeKind>().is_err());
        assert!(!NodeKind::is_valid("BOGUS"));
        assert!(NodeKind::is_valid("ORGANIZATION"));
    }

    #[test]
    fn edge_kind_parses_only_exact_names() {
        assert_eq!("BASEDIN".parse::<EdgeKind>(), Ok(EdgeKind::BasedIn));
        assert_eq!(
            "LIVESIN".parse::<EdgeKind>(),
            Err(KindParseError::UnknownEdgeKind("LIVESIN".to_string()))
        );
        assert!(EdgeKind::is_valid("ONACCOUNT"));
    }

    #[test]
    fn kinds_serialize_uppercase() {
        let json = serde_json::to_string(&EdgeKind::AssocWith).unwrap();
        assert_eq!(json, "\"ASSOCWITH\"");

        let json = serde_json::to_string(&NodeKind::Organization).unwrap();
        assert_eq!(json, "\"ORGANIZATION\"");
    }

    #[test]
    fn display_matches_as_str() {
        for kind in NodeKind::ALL {
            assert_eq!(kind.to_string(), kind.as_str());
        }
        for kind in EdgeKind::ALL {
            assert_eq!(kind.to_string(), kind.as_str());
        }
    }

    #[test]
    fn node_colors() {
        assert_eq!(NodeKind::Person.color(), Rgb::new(217, 125, 216));
        assert_eq!(NodeKind::Organization.color(), Rgb::new(140, 185, 0));
        assert_eq!(NodeKind::Place.color(), Rgb::new(0, 199, 255));
        assert_eq!(NodeKind::Account.color(), Rgb::new(255, 122, 69));
    }

    #[test]
    fn attr_value_json_is_untagged() {
        let mut attrs = Attributes::new();
        attrs.insert("size".to_string(), AttrValue::Double(10.0));
        attrs.insert("role".to_string(), "analyst".into());
        attrs.insert("r".to_string(), AttrValue::Int(217));

        let json = serde_json::to_string(&attrs).unwrap();
        assert_eq!(json, r#"{"r":217,"role":"analyst","size":10.0}"#);
    }

    #[test]
    fn attr_value_accessors() {
        assert_eq!(AttrValue::from("x").as_str(), Some("x"));
        assert_eq!(AttrValue::Int(3).as_str(), None);
        assert_eq!(AttrValue::Double(0.5).to_string(), "0.5");
    }
}
