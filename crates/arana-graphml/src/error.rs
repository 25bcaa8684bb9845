//! Error types for the arana-graphml crate.

use thiserror::Error;

#[derive(Error, Debug)]
pub enum GraphmlError {
    #[error("Graph file not found: {path}")]
    FileNotFound { path: String },

    #[error("Failed to parse GraphML: {0}")]
    XmlParse(String),

    #[error("XML error: {0}")]
    Xml(#[from] quick_xml::Error),

    #[error("Invalid key declaration {id}: {reason}")]
    InvalidKey { id: String, reason: String },

    #[error("Data references undeclared key: {0}")]
    UnknownKey(String),

    #[error("Invalid {value_type} value for key {name}: {value:?}")]
    InvalidValue {
        name: String,
        value_type: String,
        value: String,
    },

    #[error("Invalid node {id}: {reason}")]
    InvalidNode { id: String, reason: String },

    #[error("Invalid edge {origin} -> {destination}: {reason}")]
    InvalidEdge {
        origin: String,
        destination: String,
        reason: String,
    },

    #[error("Encoding error: {0}")]
    Encoding(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

pub type Result<T> = std::result::Result<T, GraphmlError>;
