//! State repository trait.

use async_trait::async_trait;

use crate::error::Result;
use crate::state::model::ClientState;

/// Repository for managing persisted client state.
#[async_trait]
pub trait StateRepository: Send + Sync {
    /// Saves the client state to storage.
    async fn save_state(&self, state: ClientState) -> Result<()>;

    async fn get_state(&self) -> Result<ClientState>;

    async fn get_active_session(&self) -> Option<String>;

    async fn set_active_session(&self, session_id: String) -> Result<()>;

    async fn clear_active_session(&self) -> Result<()>;
}
