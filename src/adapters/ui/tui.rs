//! Implements InputPort. Inquire-based interactive prompts.
//!
//! Main menu: select a document, upload it, ask a question, quit. Every
//! action goes through the coordinator; this adapter only renders `ViewState`.

use crate::domain::markdown::{strip_controls, to_terminal};
use crate::domain::{ConversationTurn, DomainError, Notice};
use crate::ports::{InputPort, NoticePort};
use crate::usecases::{Coordinator, ViewState};
use async_trait::async_trait;
use crossterm::ExecutableCommand;
use crossterm::style::{Attribute, Color, Print, ResetColor, SetAttribute, SetForegroundColor};
use inquire::ui::{Color as PromptColor, RenderConfig, Styled};
use inquire::{InquireError, Select, Text};
use std::fmt;
use std::io::{Write, stdout};
use std::path::PathBuf;
use std::sync::Arc;
use tokio::sync::Mutex;
use tokio::task::JoinHandle;
use tracing::{debug, warn};

/// Applies the neon prompt theme to all subsequent inquire prompts.
pub fn apply_theme() {
    let config = RenderConfig::default_colored()
        .with_prompt_prefix(Styled::new("?").with_fg(PromptColor::LightMagenta))
        .with_highlighted_option_prefix(Styled::new("➤").with_fg(PromptColor::LightCyan))
        .with_answered_prompt_prefix(Styled::new("✔").with_fg(PromptColor::LightGreen));
    inquire::set_global_render_config(config);
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum MenuAction {
    SelectFile,
    Upload,
    Ask,
    /// A request entry shown with its busy label; refused while loading.
    Busy,
    Wait,
    Quit,
}

const BUSY_NOTICE: &str = "Another request is still in progress.";

struct MenuItem {
    action: MenuAction,
    label: String,
}

impl fmt::Display for MenuItem {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.label)
    }
}

/// Menu entries for the current view. While loading, the request entries keep
/// their busy labels but no longer issue requests.
fn menu_items(view: &ViewState) -> Vec<MenuItem> {
    let mut items = vec![MenuItem {
        action: MenuAction::SelectFile,
        label: "+ Select New File".to_string(),
    }];
    let request = if view.controls_enabled {
        (MenuAction::Upload, MenuAction::Ask)
    } else {
        (MenuAction::Busy, MenuAction::Busy)
    };
    items.push(MenuItem {
        action: request.0,
        label: view.upload_label.to_string(),
    });
    items.push(MenuItem {
        action: request.1,
        label: format!("Ask a question ({})", view.send_label),
    });
    if view.loading {
        items.push(MenuItem {
            action: MenuAction::Wait,
            label: "Wait for the backend".to_string(),
        });
    }
    items.push(MenuItem {
        action: MenuAction::Quit,
        label: "Quit".to_string(),
    });
    items
}

/// Outcome of a prompt: a value, Esc (back to menu), or Ctrl-C (quit).
enum Prompted<T> {
    Value(T),
    Back,
    Quit,
}

fn prompted<T>(result: Result<T, InquireError>) -> Result<Prompted<T>, DomainError> {
    match result {
        Ok(value) => Ok(Prompted::Value(value)),
        Err(InquireError::OperationCanceled) => Ok(Prompted::Back),
        Err(InquireError::OperationInterrupted) => Ok(Prompted::Quit),
        Err(e) => Err(DomainError::Ui(e.to_string())),
    }
}

/// Inquire prompts block on stdin, so they run off the runtime's worker threads.
async fn prompt_blocking<T, F>(prompt: F) -> Result<T, InquireError>
where
    F: FnOnce() -> Result<T, InquireError> + Send + 'static,
    T: Send + 'static,
{
    tokio::task::spawn_blocking(prompt)
        .await
        .unwrap_or_else(|e| Err(InquireError::Custom(Box::new(e))))
}

#[derive(Debug, Clone, Copy)]
enum Request {
    Upload,
    Ask,
}

async fn finish_upload(coordinator: &Coordinator, notices: &dyn NoticePort) {
    match coordinator.upload().submit_upload().await {
        Ok(receipt) => debug!(file = %receipt.accepted_name, "upload finished"),
        Err(DomainError::Busy) => notices.notify(Notice::error(BUSY_NOTICE)),
        // Validation and transport failures were already reported by the session.
        Err(e) => debug!(error = %e, "upload not completed"),
    }
}

async fn finish_question(coordinator: &Coordinator, notices: &dyn NoticePort) {
    let chat = coordinator.chat();
    match chat.submit_question().await {
        Ok(turn) => print_turn(&turn),
        Err(DomainError::Transport(e)) => {
            debug!(error = %e, "query failed");
            if let Some(turn) = chat.current_turn().await {
                print_turn(&turn);
            }
        }
        Err(DomainError::Busy) => notices.notify(Notice::error(BUSY_NOTICE)),
        Err(DomainError::Validation(_)) => {}
        Err(e) => {
            warn!(error = %e, "question not completed");
            notices.notify(Notice::error(e.to_string()));
        }
    }
}

/// TUI adapter. Inquire prompts.
///
/// Requests run on their own task, so the menu stays usable while one is in flight.
pub struct TuiInputPort {
    coordinator: Arc<Coordinator>,
    notices: Arc<dyn NoticePort>,
    in_flight: Mutex<Option<JoinHandle<()>>>,
}

impl TuiInputPort {
    pub fn new(coordinator: Arc<Coordinator>, notices: Arc<dyn NoticePort>) -> Self {
        Self {
            coordinator,
            notices,
            in_flight: Mutex::new(None),
        }
    }

    /// Returns false when the user asked to quit.
    async fn select_file(&self) -> Result<bool, DomainError> {
        let path = match prompted(
            prompt_blocking(|| {
                Text::new("Path to document:")
                    .with_help_message("PDF files are indexed by the backend")
                    .prompt()
            })
            .await,
        )? {
            Prompted::Value(path) => path,
            Prompted::Back => return Ok(true),
            Prompted::Quit => return Ok(false),
        };
        let path = PathBuf::from(path.trim());
        match self.coordinator.upload().select_path(&path).await {
            Ok(()) => {}
            Err(DomainError::Validation(e)) => self.notices.notify(Notice::error(e.to_string())),
            Err(e) => return Err(e),
        }
        Ok(true)
    }

    /// Returns false when the user asked to quit.
    async fn ask(&self) -> Result<bool, DomainError> {
        let chat = self.coordinator.chat();
        let draft = chat.draft().await;
        let question = match prompted(
            prompt_blocking(move || {
                Text::new("Ask anything about the document:")
                    .with_initial_value(&draft)
                    .prompt()
            })
            .await,
        )? {
            Prompted::Value(question) => question,
            Prompted::Back => return Ok(true),
            Prompted::Quit => return Ok(false),
        };
        chat.update_draft_question(question).await;
        self.dispatch(Request::Ask).await;
        Ok(true)
    }

    /// Starts `request` on its own task and returns once it holds the loading
    /// gate (or has already finished), so the next menu reflects it.
    async fn dispatch(&self, request: Request) {
        let coordinator = Arc::clone(&self.coordinator);
        let notices = Arc::clone(&self.notices);
        let handle = tokio::spawn(async move {
            match request {
                Request::Upload => finish_upload(&coordinator, notices.as_ref()).await,
                Request::Ask => finish_question(&coordinator, notices.as_ref()).await,
            }
        });
        while !handle.is_finished() && !self.coordinator.is_loading() {
            tokio::task::yield_now().await;
        }
        debug!(?request, "request dispatched");
        *self.in_flight.lock().await = Some(handle);
    }

    /// Blocks the menu until the in-flight request, if any, has finished.
    async fn wait_for_request(&self) {
        let handle = self.in_flight.lock().await.take();
        if let Some(handle) = handle {
            if let Err(e) = handle.await {
                warn!(error = %e, "request task failed");
            }
        }
    }
}

fn print_status(view: &ViewState) {
    let mut out = stdout();
    if let Some(name) = &view.selected_file {
        let _ = out.execute(SetForegroundColor(Color::DarkGrey));
        let _ = out.execute(Print(format!(
            "Selected File: {}\r\n",
            strip_controls(name)
        )));
        let _ = out.execute(ResetColor);
    }
    if let Some(turn) = view.turn.as_ref().filter(|t| t.is_pending()) {
        let _ = out.execute(SetForegroundColor(Color::DarkGrey));
        let _ = out.execute(Print(format!(
            "Asked: {} (…)\r\n",
            strip_controls(&turn.question)
        )));
        let _ = out.execute(ResetColor);
    }
    let _ = out.flush();
}

fn print_turn(turn: &ConversationTurn) {
    let mut out = stdout();
    let _ = out.execute(Print("\r\n"));
    let _ = out.execute(SetForegroundColor(Color::Cyan));
    let _ = out.execute(SetAttribute(Attribute::Bold));
    let _ = out.execute(Print("You\r\n"));
    let _ = out.execute(SetAttribute(Attribute::Reset));
    let _ = out.execute(ResetColor);
    let _ = out.execute(Print(format!("{}\r\n\r\n", strip_controls(&turn.question))));

    let _ = out.execute(SetForegroundColor(Color::Magenta));
    let _ = out.execute(SetAttribute(Attribute::Bold));
    let _ = out.execute(Print("Assistant\r\n"));
    let _ = out.execute(SetAttribute(Attribute::Reset));
    let _ = out.execute(ResetColor);
    let body = match &turn.answer {
        Some(answer) => to_terminal(answer),
        None => "…".to_string(),
    };
    for line in body.lines() {
        let _ = out.execute(Print(format!("{}\r\n", line)));
    }
    let _ = out.execute(Print("\r\n"));
    let _ = out.flush();
}

#[async_trait]
impl InputPort for TuiInputPort {
    async fn run(&self) -> Result<(), DomainError> {
        loop {
            let view = self.coordinator.view().await;
            print_status(&view);

            let items = menu_items(&view);
            let selected = prompted(
                prompt_blocking(move || Select::new("What next?", items).prompt()).await,
            )?;
            let action = match selected {
                Prompted::Value(item) => item.action,
                Prompted::Back | Prompted::Quit => MenuAction::Quit,
            };

            let keep_going = match action {
                MenuAction::SelectFile => self.select_file().await?,
                MenuAction::Upload => {
                    self.dispatch(Request::Upload).await;
                    true
                }
                MenuAction::Ask => self.ask().await?,
                MenuAction::Busy => {
                    self.notices.notify(Notice::error(BUSY_NOTICE));
                    true
                }
                MenuAction::Wait => {
                    self.wait_for_request().await;
                    true
                }
                MenuAction::Quit => false,
            };
            if !keep_going {
                return Ok(());
            }
        }
    }
}
