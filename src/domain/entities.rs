//! Domain entities. Pure data structures for the core business.
//!
//! No HTTP/terminal types here; adapters map their payloads into these.

use super::markdown;

/// Answer text shown in place of the assistant's reply when a query fails.
pub const FAILURE_PLACEHOLDER: &str = "Failed to get a response from the AI.";

/// A document selected for upload. Selection is atomic: a `Document` is only
/// constructed once its bytes are fully read.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Document {
    pub name: String,
    pub bytes: Vec<u8>,
}

impl Document {
    pub fn new(name: impl Into<String>, bytes: Vec<u8>) -> Self {
        Self {
            name: name.into(),
            bytes,
        }
    }

    /// Content type sent with the multipart part. The backend only indexes PDFs.
    pub fn content_type(&self) -> &'static str {
        if self.name.to_ascii_lowercase().ends_with(".pdf") {
            "application/pdf"
        } else {
            "application/octet-stream"
        }
    }
}

/// Backend acknowledgement of an upload.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UploadReceipt {
    /// File name echoed back by the backend.
    pub accepted_name: String,
    /// Free-form processing status (e.g. "Embeddings created successfully").
    pub status: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QueryAnswer {
    pub answer: String,
}

/// The most recent question/answer pair. Only one turn is ever retained.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct ConversationTurn {
    pub question: String,
    /// `None` while the query is in flight.
    pub answer: Option<String>,
}

impl ConversationTurn {
    /// A freshly asked question with no answer yet.
    pub fn asked(question: impl Into<String>) -> Self {
        Self {
            question: question.into(),
            answer: None,
        }
    }

    pub fn is_pending(&self) -> bool {
        self.answer.is_none()
    }

    /// The answer converted from markdown to sanitized HTML.
    ///
    /// Library API for HTML front ends; the terminal client renders with
    /// [`markdown::to_terminal`] instead.
    pub fn rendered_answer(&self) -> Option<String> {
        self.answer.as_deref().map(markdown::to_html)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NoticeLevel {
    Info,
    Error,
}

/// A user-facing message (confirmation, validation or failure notice).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notice {
    pub level: NoticeLevel,
    pub text: String,
}

impl Notice {
    pub fn info(text: impl Into<String>) -> Self {
        Self {
            level: NoticeLevel::Info,
            text: text.into(),
        }
    }

    pub fn error(text: impl Into<String>) -> Self {
        Self {
            level: NoticeLevel::Error,
            text: text.into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_content_type_by_extension() {
        assert_eq!(
            Document::new("contract.PDF", vec![]).content_type(),
            "application/pdf"
        );
        assert_eq!(
            Document::new("notes.txt", vec![]).content_type(),
            "application/octet-stream"
        );
    }

    #[test]
    fn test_turn_pending_until_answered() {
        let mut turn = ConversationTurn::asked("Does clause 4 apply?");
        assert!(turn.is_pending());
        assert_eq!(turn.rendered_answer(), None);

        turn.answer = Some("**Yes**".to_string());
        assert!(!turn.is_pending());
        assert_eq!(
            turn.rendered_answer().as_deref(),
            Some("<p><strong>Yes</strong></p>\n")
        );
    }
}
