//! Outbound ports. Application calls into infrastructure.
//!
//! Implemented by adapters.

use crate::domain::{Document, Notice, QueryAnswer, TransportError, UploadReceipt};

/// Backend gateway: the two calls the client makes.
///
/// Implementations never retry and enforce no timeout of their own; every
/// failure is returned to the caller immediately.
#[async_trait::async_trait]
pub trait TransportPort: Send + Sync {
    /// Send the document as multipart field `file`. Only a 2xx response whose
    /// body names the accepted file succeeds.
    async fn upload_document(&self, document: &Document) -> Result<UploadReceipt, TransportError>;

    /// Send the question as urlencoded field `query`.
    async fn submit_query(&self, question: &str) -> Result<QueryAnswer, TransportError>;
}

/// Visual in-flight indicator. Presentational only; the loading gate is authoritative.
pub trait ProgressPort: Send + Sync {
    /// Begin an indeterminate animation.
    fn start(&self);

    /// Finish and hide the animation. No-op when not started.
    fn complete(&self);
}

/// User-visible notices (confirmations, validation and failure messages).
pub trait NoticePort: Send + Sync {
    fn notify(&self, notice: Notice);
}
