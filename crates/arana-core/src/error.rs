use thiserror::Error;

/// A string did not name a member of one of the closed kind enumerations.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum KindParseError {
    #[error("Unknown node kind: {0}")]
    UnknownNodeKind(String),

    #[error("Unknown edge kind: {0}")]
    UnknownEdgeKind(String),
}
