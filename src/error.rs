use std::path::PathBuf;

use thiserror::Error;

use crate::value::ValueType;

/// Errors produced by the property tree, schema validation and ingestion.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum Error {
    #[error("invalid input: {0}")]
    InvalidInput(String),

    #[error("config file not found: {0}")]
    FileNotFound(PathBuf),

    #[error("failed to read config file '{path}': {source}")]
    ReadError {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("failed to parse {context}: {message}")]
    ParsingError { context: String, message: String },

    #[error("type mismatch: expected {expected}, found {found}")]
    TypeMismatch { expected: ValueType, found: ValueType },

    #[error("property not found: {0}")]
    PropertyNotFound(String),

    #[error("path component '{0}' is not an object")]
    NotAnObject(String),

    #[error("index {index} out of bounds for array of length {len}")]
    OutOfBounds { index: usize, len: usize },

    #[error("invalid operation: {0}")]
    InvalidOperation(String),

    #[error("no schema found for path: {0}")]
    SchemaNotFound(String),

    #[error("invalid configuration: {0}")]
    InvalidConfiguration(String),

    #[error("validation failed: {0}")]
    ValidationFailed(String),

    #[error("not supported: {0}")]
    NotSupported(String),

    #[error("invalid path: {0}")]
    InvalidPath(String),

    #[error("failed to install log subscriber: {0}")]
    Logging(String),
}

pub type Result<T> = std::result::Result<T, Error>;
