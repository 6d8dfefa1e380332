//! Mock backend for offline use and tests.
//!
//! Returns canned responses without network calls. Failures can be scripted,
//! and calls can be held until released to observe the in-flight state.

use crate::domain::{Document, QueryAnswer, TransportError, UploadReceipt};
use crate::ports::TransportPort;
use std::sync::{Arc, Mutex};
use std::time::Duration;
use tokio::sync::Semaphore;
use tracing::info;

/// A call observed by the mock.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TransportCall {
    Upload { name: String, size: usize },
    Query { question: String },
}

/// Mock transport.
///
/// Simulates network latency with configurable delay.
pub struct MockTransport {
    delay_ms: u64,
    upload_failure: Mutex<Option<TransportError>>,
    query_failure: Mutex<Option<TransportError>>,
    answer: Mutex<Option<String>>,
    calls: Mutex<Vec<TransportCall>>,
    hold: Option<Arc<Semaphore>>,
}

impl MockTransport {
    /// Create a new mock transport with default delay (100ms).
    pub fn new() -> Self {
        Self::with_delay(100)
    }

    pub fn with_delay(delay_ms: u64) -> Self {
        Self {
            delay_ms,
            upload_failure: Mutex::new(None),
            query_failure: Mutex::new(None),
            answer: Mutex::new(None),
            calls: Mutex::new(Vec::new()),
            hold: None,
        }
    }

    /// Every call waits for a matching `release()` before responding.
    pub fn held(mut self) -> Self {
        self.hold = Some(Arc::new(Semaphore::new(0)));
        self
    }

    /// Let one held call complete.
    pub fn release(&self) {
        if let Some(hold) = &self.hold {
            hold.add_permits(1);
        }
    }

    /// Fail every subsequent upload with `error`.
    pub fn fail_uploads(&self, error: TransportError) {
        if let Ok(mut slot) = self.upload_failure.lock() {
            *slot = Some(error);
        }
    }

    /// Fail every subsequent query with `error`.
    pub fn fail_queries(&self, error: TransportError) {
        if let Ok(mut slot) = self.query_failure.lock() {
            *slot = Some(error);
        }
    }

    /// Answer every subsequent query with `answer`.
    pub fn answer_with(&self, answer: impl Into<String>) {
        if let Ok(mut slot) = self.answer.lock() {
            *slot = Some(answer.into());
        }
    }

    pub fn calls(&self) -> Vec<TransportCall> {
        self.calls.lock().map(|c| c.clone()).unwrap_or_default()
    }

    fn record(&self, call: TransportCall) {
        if let Ok(mut calls) = self.calls.lock() {
            calls.push(call);
        }
    }

    async fn respond_later(&self) {
        if let Some(hold) = &self.hold {
            if let Ok(permit) = hold.acquire().await {
                permit.forget();
            }
        }
        if self.delay_ms > 0 {
            tokio::time::sleep(Duration::from_millis(self.delay_ms)).await;
        }
    }

    fn scripted_failure(slot: &Mutex<Option<TransportError>>) -> Option<TransportError> {
        slot.lock().ok().and_then(|s| s.clone())
    }
}

impl Default for MockTransport {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait::async_trait]
impl TransportPort for MockTransport {
    async fn upload_document(&self, document: &Document) -> Result<UploadReceipt, TransportError> {
        info!(
            file = %document.name,
            size = document.bytes.len(),
            "[MOCK] Simulating upload"
        );
        self.record(TransportCall::Upload {
            name: document.name.clone(),
            size: document.bytes.len(),
        });
        self.respond_later().await;

        if let Some(error) = Self::scripted_failure(&self.upload_failure) {
            return Err(error);
        }
        Ok(UploadReceipt {
            accepted_name: document.name.clone(),
            status: Some("Embeddings created successfully".to_string()),
        })
    }

    async fn submit_query(&self, question: &str) -> Result<QueryAnswer, TransportError> {
        info!(question_len = question.len(), "[MOCK] Simulating query");
        self.record(TransportCall::Query {
            question: question.to_string(),
        });
        self.respond_later().await;

        if let Some(error) = Self::scripted_failure(&self.query_failure) {
            return Err(error);
        }
        let scripted = self.answer.lock().ok().and_then(|a| a.clone());
        let answer = scripted.unwrap_or_else(|| {
            format!(
                "**[MOCK]** You asked: *{}*\n\n\
                 In a real session the backend would answer from the uploaded document:\n\n\
                 1. retrieve the most relevant passages\n\
                 2. summarize them into an answer",
                question.trim()
            )
        });
        Ok(QueryAnswer { answer })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_mock_echoes_upload_name() {
        let transport = MockTransport::with_delay(0);
        let receipt = transport
            .upload_document(&Document::new("contract.pdf", vec![1, 2, 3]))
            .await
            .unwrap();

        assert_eq!(receipt.accepted_name, "contract.pdf");
        assert_eq!(
            transport.calls(),
            vec![TransportCall::Upload {
                name: "contract.pdf".to_string(),
                size: 3
            }]
        );
    }

    #[tokio::test]
    async fn test_mock_scripted_failure() {
        let transport = MockTransport::with_delay(0);
        transport.fail_queries(TransportError::Status {
            status: 500,
            body: "boom".to_string(),
        });

        let err = transport.submit_query("anything").await.unwrap_err();
        assert!(matches!(err, TransportError::Status { status: 500, .. }));
    }

    #[tokio::test]
    async fn test_mock_held_until_released() {
        let transport = Arc::new(MockTransport::with_delay(0).held());
        let pending = tokio::spawn({
            let transport = Arc::clone(&transport);
            async move { transport.submit_query("q").await }
        });

        while transport.calls().is_empty() {
            tokio::task::yield_now().await;
        }
        tokio::task::yield_now().await;
        assert!(!pending.is_finished());
        assert_eq!(transport.calls().len(), 1);

        transport.release();
        let answer = pending.await.unwrap().unwrap();
        assert!(answer.answer.contains("[MOCK]"));
    }
}
