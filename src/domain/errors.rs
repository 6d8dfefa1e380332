//! Domain errors. Used by ports and use cases.
//!
//! Adapters map infrastructure errors into these.

use thiserror::Error;

/// Local, synchronous input problems. Never reach the network.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ValidationError {
    #[error("Please select a file to upload.")]
    NoFileSelected,

    #[error("Please enter a query.")]
    EmptyQuestion,

    #[error("Cannot read file: {0}")]
    FileUnreadable(String),
}

/// Failure of a backend call: network error, non-2xx status or unusable body.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum TransportError {
    #[error("HTTP request failed: {0}")]
    Network(String),

    #[error("Backend returned {status}: {body}")]
    Status { status: u16, body: String },

    /// Payload could not be encoded or the response could not be parsed.
    #[error("Malformed payload: {0}")]
    Decode(String),

    /// 2xx response carrying an `error` field instead of a result.
    #[error("Backend error: {0}")]
    Backend(String),
}

#[derive(Error, Debug)]
pub enum DomainError {
    #[error(transparent)]
    Validation(#[from] ValidationError),

    #[error(transparent)]
    Transport(#[from] TransportError),

    /// Another request is in flight; the submission was ignored.
    #[error("A request is already in progress")]
    Busy,

    #[error("UI error: {0}")]
    Ui(String),
}
