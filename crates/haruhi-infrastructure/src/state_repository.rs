//! Persisted client state service implementation.
//!
//! This module provides a service for the small piece of state that survives
//! client restarts, most importantly the active session pointer.

use crate::paths::HaruhiPaths;
use crate::storage::AtomicTomlFile;
use haruhi_core::error::{HaruhiError, Result};
use haruhi_core::state::model::ClientState;
use haruhi_core::state::repository::StateRepository;
use std::path::PathBuf;
use std::sync::Arc;
use tokio::sync::Mutex;

/// Service for managing persisted client state.
///
/// This implementation reads and writes client state through an atomic TOML
/// file and caches it in memory to avoid repeated file I/O operations.
///
/// All methods are async to support non-blocking I/O in async contexts.
///
/// # Example
///
/// ```ignore
/// use haruhi_infrastructure::state_repository::StateRepositoryImpl;
///
/// let repository = StateRepositoryImpl::new().await?;
/// repository.set_active_session("sess-123".to_string()).await?;
/// let session_id = repository.get_active_session().await;
/// ```
#[derive(Clone)]
pub struct StateRepositoryImpl {
    /// Cached client state loaded from storage.
    state: Arc<Mutex<ClientState>>,
    /// Atomic file handle for persistence.
    storage: Arc<AtomicTomlFile<ClientState>>,
}

impl StateRepositoryImpl {
    /// Creates a new repository backed by the default state file and loads
    /// the initial state.
    ///
    /// A missing state file is treated as the default (no active session).
    pub async fn new() -> Result<Self> {
        let path = HaruhiPaths::state_file().map_err(|e| HaruhiError::config(e.to_string()))?;
        Self::with_path(path).await
    }

    /// Creates a repository backed by a custom file path (for testing).
    pub async fn with_path(path: PathBuf) -> Result<Self> {
        let storage = Arc::new(AtomicTomlFile::<ClientState>::new(path));

        let initial_state = {
            let storage = storage.clone();
            tokio::task::spawn_blocking(move || storage.load())
                .await
                .map_err(|e| HaruhiError::internal(format!("Failed to join task: {}", e)))?
                .map_err(|e| HaruhiError::state(format!("Failed to load client state: {}", e)))?
                .unwrap_or_default()
        };

        Ok(Self {
            state: Arc::new(Mutex::new(initial_state)),
            storage,
        })
    }
}

#[async_trait::async_trait]
impl StateRepository for StateRepositoryImpl {
    /// Saves the client state to storage.
    async fn save_state(&self, state: ClientState) -> Result<()> {
        // Update in-memory cache first
        {
            let mut state_lock = self.state.lock().await;
            *state_lock = state.clone();
        }

        // Persist in a blocking context; the locked update keeps concurrent
        // clients from clobbering each other
        let storage = self.storage.clone();
        tokio::task::spawn_blocking(move || {
            storage
                .update(ClientState::default(), move |current| {
                    *current = state;
                    Ok(())
                })
                .map_err(|e| HaruhiError::state(format!("Failed to save client state: {}", e)))
        })
        .await
        .map_err(|e| HaruhiError::internal(format!("Failed to join task: {}", e)))??;

        Ok(())
    }

    async fn get_state(&self) -> Result<ClientState> {
        Ok(self.state.lock().await.clone())
    }

    /// Gets the active session ID.
    async fn get_active_session(&self) -> Option<String> {
        let state = self.state.lock().await;
        state.active_session_id.clone()
    }

    /// Sets the active session ID.
    async fn set_active_session(&self, session_id: String) -> Result<()> {
        let mut state = self.state.lock().await.clone();
        state.active_session_id = Some(session_id);
        self.save_state(state).await
    }

    /// Clears the active session ID.
    async fn clear_active_session(&self) -> Result<()> {
        let mut state = self.state.lock().await.clone();
        state.active_session_id = None;
        self.save_state(state).await
    }
}
