//! Library error types

use thiserror::Error;

/// Rejected filter criteria supplied from outside the process
/// (saved screeners, CLI flags).
#[derive(Error, Debug, PartialEq)]
pub enum FilterError {
    #[error("filter criterion has no operand")]
    MissingOperand,

    #[error("filter operand `{0}` must not contain `.` or `__`")]
    InvalidOperand(String),

    #[error("unknown filter operator `{0}`")]
    UnknownOperator(String),

    #[error("invalid filter expression `{0}`, expected operand:operator:value")]
    InvalidExpression(String),
}

/// Failures of a key-value persistence backend.
#[derive(Error, Debug)]
pub enum StorageError {
    #[error("storage IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("storage serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("storage unavailable: {0}")]
    Unavailable(String),
}

#[derive(Error, Debug)]
pub enum CollectionError {
    #[error("collection name must not be empty")]
    EmptyName,

    #[error("symbol must not be empty")]
    EmptySymbol,

    #[error("collection `{0}` already exists")]
    Duplicate(String),

    #[error("collection `{0}` not found")]
    NotFound(String),

    #[error(transparent)]
    Storage(#[from] StorageError),
}
