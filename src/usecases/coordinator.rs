//! Root coordinator: owns the loading gate and progress handle, wires both sessions.
//!
//! Both sessions share one gate, so a request from either blocks the other.

use crate::domain::ConversationTurn;
use crate::ports::{NoticePort, ProgressPort, TransportPort};
use crate::usecases::chat_session::ChatSession;
use crate::usecases::loading_gate::LoadingGate;
use crate::usecases::upload_session::UploadSession;
use std::sync::Arc;

/// Derived, read-only snapshot for the front end.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ViewState {
    pub loading: bool,
    pub upload_label: &'static str,
    pub send_label: &'static str,
    /// Upload trigger, question input and send trigger are all disabled while loading.
    pub controls_enabled: bool,
    pub selected_file: Option<String>,
    pub turn: Option<ConversationTurn>,
}

pub struct Coordinator {
    gate: Arc<LoadingGate>,
    upload: UploadSession,
    chat: ChatSession,
}

impl Coordinator {
    pub fn new(
        transport: Arc<dyn TransportPort>,
        progress: Arc<dyn ProgressPort>,
        notices: Arc<dyn NoticePort>,
    ) -> Self {
        let gate = Arc::new(LoadingGate::new(progress));
        Self {
            upload: UploadSession::new(
                Arc::clone(&transport),
                Arc::clone(&gate),
                Arc::clone(&notices),
            ),
            chat: ChatSession::new(transport, Arc::clone(&gate), notices),
            gate,
        }
    }

    pub fn upload(&self) -> &UploadSession {
        &self.upload
    }

    pub fn chat(&self) -> &ChatSession {
        &self.chat
    }

    pub fn is_loading(&self) -> bool {
        self.gate.is_loading()
    }

    pub async fn view(&self) -> ViewState {
        let loading = self.is_loading();
        ViewState {
            loading,
            upload_label: if loading { "Uploading..." } else { "Upload File" },
            send_label: if loading { "Processing..." } else { "Send" },
            controls_enabled: !loading,
            selected_file: self.upload.selected_file_name().await,
            turn: self.chat.current_turn().await,
        }
    }
}
