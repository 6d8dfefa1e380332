//! Upload use case: hold the selected document and push it to the backend.
//!
//! - Validates that a document is selected before touching the network
//! - Claims the shared loading gate for the duration of the call
//! - Keeps the selection after a failure so the user can retry as-is

use crate::domain::{Document, DomainError, Notice, UploadReceipt, ValidationError};
use crate::ports::{NoticePort, TransportPort};
use crate::usecases::loading_gate::LoadingGate;
use std::path::Path;
use std::sync::Arc;
use tokio::sync::RwLock;
use tracing::{debug, info, warn};

/// Notice shown when an upload attempt fails for any transport reason.
pub const UPLOAD_FAILED: &str = "Failed to upload the file.";

/// Upload session. Exclusively owns the selected document.
pub struct UploadSession {
    transport: Arc<dyn TransportPort>,
    gate: Arc<LoadingGate>,
    notices: Arc<dyn NoticePort>,
    document: RwLock<Option<Arc<Document>>>,
}

impl UploadSession {
    pub fn new(
        transport: Arc<dyn TransportPort>,
        gate: Arc<LoadingGate>,
        notices: Arc<dyn NoticePort>,
    ) -> Self {
        Self {
            transport,
            gate,
            notices,
            document: RwLock::new(None),
        }
    }

    /// Replace the held document.
    pub async fn select_file(&self, document: Document) {
        info!(file = %document.name, size = document.bytes.len(), "file selected");
        *self.document.write().await = Some(Arc::new(document));
    }

    /// Read `path` fully, then select it. A failed read leaves the current selection untouched.
    pub async fn select_path(&self, path: &Path) -> Result<(), DomainError> {
        let name = path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .ok_or_else(|| {
                ValidationError::FileUnreadable(format!("{} is not a file", path.display()))
            })?;
        let bytes = tokio::fs::read(path).await.map_err(|e| {
            warn!(path = %path.display(), error = %e, "file read failed");
            ValidationError::FileUnreadable(format!("{}: {}", path.display(), e))
        })?;
        self.select_file(Document::new(name, bytes)).await;
        Ok(())
    }

    pub async fn selected_file_name(&self) -> Option<String> {
        self.document.read().await.as_ref().map(|d| d.name.clone())
    }

    /// Upload the selected document.
    ///
    /// Validation failures and transport failures are also reported through
    /// the notice port. `DomainError::Busy` means another request holds the
    /// gate and nothing was sent.
    pub async fn submit_upload(&self) -> Result<UploadReceipt, DomainError> {
        let (guard, document) = {
            let selected = self.document.read().await;
            let Some(document) = selected.as_ref().map(Arc::clone) else {
                let err = ValidationError::NoFileSelected;
                self.notices.notify(Notice::error(err.to_string()));
                return Err(err.into());
            };
            let Some(guard) = self.gate.try_acquire() else {
                debug!("upload ignored: request in flight");
                return Err(DomainError::Busy);
            };
            (guard, document)
        };

        let ticket = guard.ticket();
        info!(ticket = ticket.id(), file = %document.name, "upload started");
        let result = self.transport.upload_document(&document).await;
        drop(guard);

        match result {
            Ok(receipt) => {
                info!(ticket = ticket.id(), file = %receipt.accepted_name, "upload complete");
                self.notices.notify(Notice::info(format!(
                    "File uploaded successfully: {}",
                    receipt.accepted_name
                )));
                Ok(receipt)
            }
            Err(e) => {
                warn!(ticket = ticket.id(), file = %document.name, error = %e, "upload failed");
                self.notices.notify(Notice::error(UPLOAD_FAILED));
                Err(e.into())
            }
        }
    }
}
