//! Client state domain model.
//!
//! Contains the small piece of client-side state that persists across
//! restarts.

use serde::{Deserialize, Serialize};

/// Client state that persists across restarts.
///
/// # File Location
///
/// - macOS: `~/Library/Application Support/haruhi/state.toml`
/// - Linux: `~/.config/haruhi/state.toml`
///
/// # Fields
///
/// * `active_session_id` - The ID of the last session the user was in.
///   This is used to restore the conversation on startup. `None` means the
///   client has no session yet and the next message starts a fresh one.
#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq, Eq)]
pub struct ClientState {
    /// ID of the currently active session.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub active_session_id: Option<String>,
}

impl ClientState {
    /// Creates a new ClientState with default values.
    pub fn new() -> Self {
        Self::default()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new() {
        let state = ClientState::new();
        assert!(state.active_session_id.is_none());
    }

    #[test]
    fn test_toml_round_trip_with_session() {
        let state = ClientState {
            active_session_id: Some("sess-42".to_string()),
        };
        let text = toml::to_string(&state).unwrap();
        let back: ClientState = toml::from_str(&text).unwrap();
        assert_eq!(back, state);
    }

    #[test]
    fn test_none_is_omitted_from_toml() {
        let state = ClientState::new();
        let text = toml::to_string(&state).unwrap();
        assert!(!text.contains("active_session_id"));
        let back: ClientState = toml::from_str(&text).unwrap();
        assert!(back.active_session_id.is_none());
    }
}
