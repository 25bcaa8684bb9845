//! arana-core: Schema types for the arana person-association graph.
//!
//! This crate provides the closed vocabulary every other arana crate builds on:
//! - Node kinds (Person, Organization, Place, Account) and their rendering colors
//! - Edge kinds (AssocWith, BasedIn, OnAccount)
//! - Typed attribute values carried by nodes, edges, and the graph itself

pub mod error;
pub mod types;

pub use error::KindParseError;
pub use types::{AttrValue, Attributes, EdgeKind, NodeKind, Rgb, DEFAULT_NODE_SIZE};
