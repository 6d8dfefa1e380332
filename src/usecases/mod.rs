//! Application use cases. Orchestrate domain logic via ports.

pub mod chat_session;
pub mod coordinator;
pub mod loading_gate;
pub mod upload_session;

#[cfg(test)]
pub(crate) mod testing;

pub use chat_session::ChatSession;
pub use coordinator::{Coordinator, ViewState};
pub use loading_gate::{LoadingGate, LoadingGuard, RequestTicket};
pub use upload_session::UploadSession;
