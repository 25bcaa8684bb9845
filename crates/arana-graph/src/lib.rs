//! arana-graph — the typed connection graph.
//!
//! This crate is the single mutation point for the graph. Every node and edge
//! passes through the schema checks in [`store`]; the person builders in
//! [`mutations`] and the read-only search in [`queries`] are layered on top.

pub mod mutations;
pub mod queries;
pub mod store;

pub use mutations::Person;
pub use queries::{PersonSummary, SkillSearchResult};
pub use store::{ConnectionGraph, EdgeKey, EdgeRecord, NodeRecord};
