//! Core domain layer. No network or terminal I/O.
//!
//! Entities and business rules live here. Dependencies flow inward.

pub mod entities;
pub mod errors;
pub mod markdown;

pub use entities::{
    ConversationTurn, Document, FAILURE_PLACEHOLDER, Notice, NoticeLevel, QueryAnswer,
    UploadReceipt,
};
pub use errors::{DomainError, TransportError, ValidationError};
