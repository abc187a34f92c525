//! Error types for document extraction.
use crate::container::ContainerError;
use thiserror::Error;

/// Main error type for extraction operations.
///
/// Every stage of the pipeline fails fast: there is exactly one outcome per
/// call, either a fully assembled [`Document`](crate::Document) or one of
/// these errors. Nothing is retried internally.
#[derive(Error, Debug)]
pub enum ExtractError {
    /// IO error while reading the document file
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// The compound-file container could not be opened or read
    #[error("container error: {0}")]
    Container(#[from] ContainerError),

    /// A named stream the pipeline requires is missing from the container
    #[error("stream not found: {0}")]
    StreamNotFound(String),

    /// The main stream does not carry the Word magic number
    #[error("invalid format: {0}")]
    InvalidFormat(String),

    /// Structural validation failed while walking the binary tables
    #[error("corrupted document: {0}")]
    Corrupted(String),

    /// The document uses a layout this crate does not handle
    #[error("unsupported document: {0}")]
    Unsupported(String),
}

/// Result type for extraction operations.
pub type Result<T> = std::result::Result<T, ExtractError>;
