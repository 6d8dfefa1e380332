//! reqwest-backed transport. Implements TransportPort against the QA backend.
//!
//! `POST {base}/upload/` with multipart field `file`,
//! `POST {base}/chatbot/` with urlencoded field `query`.

use crate::domain::{Document, QueryAnswer, TransportError, UploadReceipt};
use crate::ports::TransportPort;
use reqwest::multipart::{Form, Part};
use serde::Deserialize;
use tracing::{debug, info, warn};

/// Max chars of an error body kept in `TransportError::Status`.
const ERROR_BODY_LIMIT: usize = 200;

/// HTTP transport for the document QA backend.
pub struct HttpTransport {
    client: reqwest::Client,
    base_url: String,
}

impl HttpTransport {
    /// Create a transport for `base_url` (e.g. "http://localhost:8000").
    pub fn new(base_url: impl Into<String>) -> Self {
        Self::with_client(reqwest::Client::new(), base_url)
    }

    pub fn with_client(client: reqwest::Client, base_url: impl Into<String>) -> Self {
        let base_url = base_url.into().trim_end_matches('/').to_string();
        Self { client, base_url }
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn endpoint(&self, path: &str) -> String {
        format!("{}/{}/", self.base_url, path)
    }

    /// Map non-2xx responses to `TransportError::Status`; pass 2xx through.
    async fn check_status(response: reqwest::Response) -> Result<reqwest::Response, TransportError> {
        if response.status().is_success() {
            return Ok(response);
        }
        let status = response.status();
        let text = response.text().await.unwrap_or_default();
        warn!(status = %status, body = %text, "backend returned error");
        Err(TransportError::Status {
            status: status.as_u16(),
            body: text.chars().take(ERROR_BODY_LIMIT).collect(),
        })
    }
}

/// Multipart `file` part for `document`. A bad content type is a local encoding
/// failure, not a network one.
fn file_part(document: &Document) -> Result<Part, TransportError> {
    Part::bytes(document.bytes.clone())
        .file_name(document.name.clone())
        .mime_str(document.content_type())
        .map_err(|e| TransportError::Decode(format!("invalid content type: {}", e)))
}

/// Body of `POST /upload/`.
#[derive(Deserialize)]
struct UploadResponse {
    filename: Option<String>,
    status: Option<String>,
    error: Option<String>,
}

/// Body of `POST /chatbot/`. The backend answers 200 with `error` when nothing is indexed.
#[derive(Deserialize)]
struct ChatbotResponse {
    answer: Option<String>,
    error: Option<String>,
}

#[async_trait::async_trait]
impl TransportPort for HttpTransport {
    async fn upload_document(&self, document: &Document) -> Result<UploadReceipt, TransportError> {
        let url = self.endpoint("upload");
        info!(
            file = %document.name,
            size = document.bytes.len(),
            url = %url,
            "uploading document"
        );

        let form = Form::new().part("file", file_part(document)?);

        let response = self
            .client
            .post(&url)
            .multipart(form)
            .send()
            .await
            .map_err(|e| TransportError::Network(e.to_string()))?;
        let response = Self::check_status(response).await?;

        let body: UploadResponse = response
            .json()
            .await
            .map_err(|e| TransportError::Decode(e.to_string()))?;

        match (body.filename, body.error) {
            (Some(accepted_name), _) => {
                info!(file = %accepted_name, status = ?body.status, "upload accepted");
                Ok(UploadReceipt {
                    accepted_name,
                    status: body.status,
                })
            }
            (None, Some(error)) => Err(TransportError::Backend(error)),
            (None, None) => Err(TransportError::Decode(
                "missing `filename` in upload response".to_string(),
            )),
        }
    }

    async fn submit_query(&self, question: &str) -> Result<QueryAnswer, TransportError> {
        let url = self.endpoint("chatbot");
        info!(question_len = question.len(), url = %url, "submitting query");

        let response = self
            .client
            .post(&url)
            .form(&[("query", question)])
            .send()
            .await
            .map_err(|e| TransportError::Network(e.to_string()))?;
        let response = Self::check_status(response).await?;

        let body: ChatbotResponse = response
            .json()
            .await
            .map_err(|e| TransportError::Decode(e.to_string()))?;

        match (body.answer, body.error) {
            (Some(answer), _) => {
                debug!(answer_len = answer.len(), "received answer");
                Ok(QueryAnswer { answer })
            }
            (None, Some(error)) => Err(TransportError::Backend(error)),
            (None, None) => Err(TransportError::Decode(
                "missing `answer` in chatbot response".to_string(),
            )),
        }
    }
}
