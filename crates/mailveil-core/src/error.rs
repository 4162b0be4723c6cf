//! Error types for Mailveil.

use thiserror::Error;

#[derive(Error, Debug)]
pub enum Error {
    #[error("Recognizer failure: {0}")]
    RecognizerFailure(String),

    #[error("Mapping not found for document id: {0}")]
    MappingNotFound(String),

    #[error("No entity map supplied and no document id to load one by")]
    MissingMapping,

    #[error("Malformed mapping: {0}")]
    MalformedMapping(String),

    #[error("Invalid span [{start}, {end}) in document of length {len}: {reason}")]
    InvalidSpan {
        start: usize,
        end: usize,
        len: usize,
        reason: &'static str,
    },

    #[error("Placeholder {0} already occurs in the source document")]
    PlaceholderCollision(String),

    #[error("Duplicate placeholder key: {0}")]
    DuplicatePlaceholder(String),

    #[error("Invalid document id: {0:?}")]
    InvalidDocumentId(String),

    #[error("Storage error: {0}")]
    Storage(String),

    #[error("Database error: {0}")]
    Database(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Internal error: {0}")]
    Internal(String),
}

pub type Result<T> = std::result::Result<T, Error>;
