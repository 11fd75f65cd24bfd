use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CoreError {
    /// Encoded cell key is not `<row>:<column>`.
    #[error("malformed cell key: {0:?}")]
    MalformedKey(String),
    /// Column id is not part of the active column ordering.
    #[error("unknown column: {0}")]
    UnknownColumn(String),
}
