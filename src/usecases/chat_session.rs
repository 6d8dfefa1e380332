//! Chat use case: draft buffer, current turn, query submission.
//!
//! The question is published before the request is sent, so it is visible
//! while the answer is pending. A failed query leaves the question in place
//! and sets the answer to `FAILURE_PLACEHOLDER`.

use crate::domain::{
    ConversationTurn, DomainError, FAILURE_PLACEHOLDER, Notice, ValidationError,
};
use crate::ports::{NoticePort, TransportPort};
use crate::usecases::loading_gate::{LoadingGate, RequestTicket};
use std::sync::Arc;
use tokio::sync::RwLock;
use tracing::{debug, info, warn};

#[derive(Default)]
struct ChatState {
    draft: String,
    turn: Option<ConversationTurn>,
    /// Ticket of the request whose answer the current turn is waiting for.
    in_flight: Option<RequestTicket>,
}

/// Chat session. Exclusively owns the conversation turn.
pub struct ChatSession {
    transport: Arc<dyn TransportPort>,
    gate: Arc<LoadingGate>,
    notices: Arc<dyn NoticePort>,
    state: RwLock<ChatState>,
}

impl ChatSession {
    pub fn new(
        transport: Arc<dyn TransportPort>,
        gate: Arc<LoadingGate>,
        notices: Arc<dyn NoticePort>,
    ) -> Self {
        Self {
            transport,
            gate,
            notices,
            state: RwLock::new(ChatState::default()),
        }
    }

    /// Replace the unsent question buffer.
    pub async fn update_draft_question(&self, text: impl Into<String>) {
        self.state.write().await.draft = text.into();
    }

    pub async fn draft(&self) -> String {
        self.state.read().await.draft.clone()
    }

    pub async fn current_turn(&self) -> Option<ConversationTurn> {
        self.state.read().await.turn.clone()
    }

    /// Send the draft as a question.
    ///
    /// Returns the completed turn. On transport failure the turn is still
    /// updated (answer = placeholder) and the error is returned.
    pub async fn submit_question(&self) -> Result<ConversationTurn, DomainError> {
        let (guard, question) = {
            let mut state = self.state.write().await;
            if state.draft.trim().is_empty() {
                let err = ValidationError::EmptyQuestion;
                self.notices.notify(Notice::error(err.to_string()));
                return Err(err.into());
            }
            let Some(guard) = self.gate.try_acquire() else {
                debug!("question ignored: request in flight");
                return Err(DomainError::Busy);
            };
            let question = std::mem::take(&mut state.draft);
            state.turn = Some(ConversationTurn::asked(question.clone()));
            state.in_flight = Some(guard.ticket());
            (guard, question)
        };

        let ticket = guard.ticket();
        info!(ticket = ticket.id(), question_len = question.len(), "query started");
        let result = self.transport.submit_query(&question).await;

        let answer = match &result {
            Ok(reply) => reply.answer.clone(),
            Err(e) => {
                warn!(ticket = ticket.id(), error = %e, "query failed");
                FAILURE_PLACEHOLDER.to_string()
            }
        };
        let turn = self.complete_turn(ticket, answer).await;
        drop(guard);

        match result {
            Ok(_) => {
                info!(ticket = ticket.id(), "query complete");
                Ok(turn)
            }
            Err(e) => Err(e.into()),
        }
    }

    /// Attach `answer` to the current turn if `ticket` still owns it.
    async fn complete_turn(&self, ticket: RequestTicket, answer: String) -> ConversationTurn {
        let mut state = self.state.write().await;
        if state.in_flight == Some(ticket) {
            state.in_flight = None;
            if let Some(turn) = state.turn.as_mut() {
                turn.answer = Some(answer);
            }
        } else {
            debug!(ticket = ticket.id(), "stale completion ignored");
        }
        state.turn.clone().unwrap_or_default()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapters::http::{MockTransport, TransportCall};
    use crate::domain::TransportError;
    use crate::usecases::testing::{RecordingNotices, RecordingProgress};

    struct Fixture {
        transport: Arc<MockTransport>,
        progress: Arc<RecordingProgress>,
        notices: Arc<RecordingNotices>,
        gate: Arc<LoadingGate>,
        session: ChatSession,
    }

    fn fixture(transport: MockTransport) -> Fixture {
        let transport = Arc::new(transport);
        let progress = Arc::new(RecordingProgress::default());
        let notices = Arc::new(RecordingNotices::default());
        let gate = Arc::new(LoadingGate::new(progress.clone()));
        let session = ChatSession::new(transport.clone(), gate.clone(), notices.clone());
        Fixture {
            transport,
            progress,
            notices,
            gate,
            session,
        }
    }

    #[tokio::test]
    async fn test_empty_or_blank_question_makes_no_call() {
        let f = fixture(MockTransport::with_delay(0));

        for draft in ["", "   ", "\n\t "] {
            f.session.update_draft_question(draft).await;
            let err = f.session.submit_question().await.unwrap_err();
            assert!(matches!(
                err,
                DomainError::Validation(ValidationError::EmptyQuestion)
            ));
        }

        assert!(f.transport.calls().is_empty());
        assert!(f.session.current_turn().await.is_none());
        assert_eq!(f.progress.starts(), 0);
        assert_eq!(f.notices.errors().len(), 3);
        assert_eq!(f.notices.errors()[0], "Please enter a query.");
    }

    #[tokio::test]
    async fn test_answer_rendered_as_markdown() {
        let f = fixture(MockTransport::with_delay(0));
        f.transport.answer_with("**Yes**, clause 4 applies.");
        f.session
            .update_draft_question("Does clause 4 apply to <b>subleases</b>?")
            .await;

        let turn = f.session.submit_question().await.unwrap();

        assert_eq!(turn.question, "Does clause 4 apply to <b>subleases</b>?");
        assert_eq!(
            turn.rendered_answer().as_deref(),
            Some("<p><strong>Yes</strong>, clause 4 applies.</p>\n")
        );
        assert_eq!(f.session.draft().await, "");
        assert_eq!(
            f.transport.calls(),
            vec![TransportCall::Query {
                question: "Does clause 4 apply to <b>subleases</b>?".to_string()
            }]
        );
        assert_eq!(f.progress.starts(), 1);
        assert_eq!(f.progress.completes(), 1);
    }

    #[tokio::test]
    async fn test_failure_sets_placeholder_and_keeps_question() {
        let f = fixture(MockTransport::with_delay(0));
        f.transport.fail_queries(TransportError::Status {
            status: 500,
            body: String::new(),
        });
        f.session.update_draft_question("Who signs?").await;

        let err = f.session.submit_question().await.unwrap_err();

        assert!(matches!(err, DomainError::Transport(_)));
        let turn = f.session.current_turn().await.unwrap();
        assert_eq!(turn.question, "Who signs?");
        assert_eq!(turn.answer.as_deref(), Some(FAILURE_PLACEHOLDER));
        assert!(!f.gate.is_loading());
        assert_eq!(f.progress.completes(), 1);
    }

    #[tokio::test]
    async fn test_question_visible_before_answer() {
        let f = fixture(MockTransport::with_delay(0).held());
        let session = Arc::new(f.session);
        session.update_draft_question("What is the term?").await;

        let pending = tokio::spawn({
            let session = Arc::clone(&session);
            async move { session.submit_question().await }
        });
        while f.transport.calls().is_empty() {
            tokio::task::yield_now().await;
        }

        let turn = session.current_turn().await.unwrap();
        assert_eq!(turn.question, "What is the term?");
        assert!(turn.is_pending());
        assert_eq!(session.draft().await, "");
        assert!(f.gate.is_loading());

        f.transport.release();
        let turn = pending.await.unwrap().unwrap();
        assert!(!turn.is_pending());
        assert!(!f.gate.is_loading());
    }

    #[tokio::test]
    async fn test_busy_gate_leaves_state_untouched() {
        let f = fixture(MockTransport::with_delay(0));
        f.session.update_draft_question("first").await;
        f.session.submit_question().await.unwrap();
        f.session.update_draft_question("second").await;

        let held = f.gate.try_acquire().unwrap();
        let err = f.session.submit_question().await.unwrap_err();
        drop(held);

        assert!(matches!(err, DomainError::Busy));
        assert_eq!(f.session.draft().await, "second");
        assert_eq!(f.session.current_turn().await.unwrap().question, "first");
        assert_eq!(f.transport.calls().len(), 1);
    }

    #[tokio::test]
    async fn test_new_question_replaces_previous_turn() {
        let f = fixture(MockTransport::with_delay(0));
        f.transport.answer_with("one");
        f.session.update_draft_question("q1").await;
        f.session.submit_question().await.unwrap();

        f.transport.answer_with("two");
        f.session.update_draft_question("q2").await;
        let turn = f.session.submit_question().await.unwrap();

        assert_eq!(
            turn,
            ConversationTurn {
                question: "q2".to_string(),
                answer: Some("two".to_string()),
            }
        );
    }

    #[tokio::test]
    async fn test_stale_ticket_is_ignored() {
        let f = fixture(MockTransport::with_delay(0));
        f.transport.answer_with("fresh");
        f.session.update_draft_question("q").await;
        f.session.submit_question().await.unwrap();

        let stale = f.gate.try_acquire().map(|g| g.ticket()).unwrap();
        let turn = f.session.complete_turn(stale, "late".to_string()).await;

        assert_eq!(turn.answer.as_deref(), Some("fresh"));
    }
}
