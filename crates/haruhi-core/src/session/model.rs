//! Session directory entry.

use serde::{Deserialize, Serialize};

/// One entry of the session directory as reported by the backend.
///
/// The identifier is opaque and server-issued; the client never fabricates
/// or rewrites it. The title is display-only.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SessionSummary {
    /// Unique session identifier (opaque string, server-issued)
    pub session_id: String,
    /// Human-readable session title
    pub title: String,
}

impl SessionSummary {
    /// Creates a new summary from an identifier and a display title.
    pub fn new(session_id: impl Into<String>, title: impl Into<String>) -> Self {
        Self {
            session_id: session_id.into(),
            title: title.into(),
        }
    }
}
