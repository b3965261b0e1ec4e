//! Chat backend trait.
//!
//! Defines the interface the application flows use to reach the chat
//! service, decoupling them from the HTTP transport (the `reqwest`
//! implementation lives in `haruhi-interaction`; tests substitute doubles).

use async_trait::async_trait;

use crate::error::Result;
use crate::session::{ChatMessage, SessionSummary, ThinkingMode};

/// One outgoing chat message with its session context.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChatRequest {
    /// The user's message text (already trimmed by the caller).
    pub message: String,
    /// The persisted session pointer, if any. `None` lets the server decide
    /// whether to open a fresh session.
    pub session_id: Option<String>,
    /// The reply-generation mode for this message.
    pub thinking_mode: ThinkingMode,
}

/// The backend's answer to a chat message.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChatReply {
    /// The session this reply belongs to. When present it replaces the
    /// persisted pointer, covering both "continuing" and "server assigned a
    /// new session" transparently.
    pub session_id: Option<String>,
    /// Assistant reply text; may contain backend-emitted markup.
    pub reply: String,
}

/// An abstract client for the chat service.
///
/// # Implementation Notes
///
/// Implementations must preserve the wire shapes of the backend contract
/// and must not retry on their own; the flow layer owns the failure policy.
#[async_trait]
pub trait ChatBackend: Send + Sync {
    /// Posts one chat message.
    ///
    /// # Returns
    ///
    /// - `Ok(ChatReply)`: Reply received and decoded
    /// - `Err(_)`: Transport, HTTP-status, or decode failure
    async fn send_message(&self, request: ChatRequest) -> Result<ChatReply>;

    /// Fetches the session directory, in server order.
    async fn list_sessions(&self) -> Result<Vec<SessionSummary>>;

    /// Fetches the full message history of one session, oldest first.
    async fn session_messages(&self, session_id: &str) -> Result<Vec<ChatMessage>>;

    /// Asks the server to create a fresh session.
    ///
    /// # Returns
    ///
    /// The identifier of the newly created session.
    async fn create_session(&self) -> Result<String>;
}
