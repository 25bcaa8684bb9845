//! arana-graphml: GraphML persistence for the connection graph.
//!
//! Exports a [`ConnectionGraph`](arana_graph::ConnectionGraph) with graph
//! metadata, every node and edge, and all attribute types, and imports it back
//! losslessly. Files written by other GraphML tools load as long as every node
//! and edge carries a valid `kind`.

pub mod error;
pub mod reader;
pub mod schema;
pub mod writer;

pub use error::{GraphmlError, Result};
pub use reader::{import_graph_from_graphml_file, parse_graphml};
pub use writer::{export_graph_to_graphml_file, to_graphml_string, write_graphml};
