//! Session domain module.
//!
//! This module contains the session-related domain models shared by the
//! backend client, the application flows, and the fronts.
//!
//! # Module Structure
//!
//! - `model`: Session directory entry (`SessionSummary`)
//! - `message`: Conversation message types (`MessageRole`, `ChatMessage`)
//! - `thinking`: The thinking-mode selector forwarded to the backend

mod message;
mod model;
mod thinking;

// Re-export public API
pub use message::{ChatMessage, MessageRole};
pub use model::SessionSummary;
pub use thinking::ThinkingMode;
