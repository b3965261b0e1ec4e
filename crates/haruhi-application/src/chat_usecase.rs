//! Chat use case implementation.
//!
//! This module provides the `ChatUseCase` which drives the main chat surface:
//! sending messages, switching between sessions, starting new chats and
//! keeping the session directory in sync with the service.

use crate::transcript::{Transcript, TranscriptSink};
use anyhow::Result;
use haruhi_core::backend::{ChatBackend, ChatRequest};
use haruhi_core::session::{ChatMessage, SessionSummary, ThinkingMode};
use haruhi_core::state::StateRepository;
use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};
use tokio::sync::{Mutex, RwLock};

/// Shown inline when sending a message fails.
const SEND_FAILURE_NOTICE: &str = "⚠ Something went wrong.";
/// Shown inline when a new chat could not be created.
const NEW_SESSION_FAILURE_NOTICE: &str = "⚠ Could not create a new chat.";

/// Use case for the main chat surface.
///
/// `ChatUseCase` owns everything the chat view shows: the transcript, the
/// cached session directory, the persisted active-session pointer and the
/// current thinking mode. Fronts read snapshots and call the flow methods;
/// they never mutate view state directly.
///
/// # Concurrency
///
/// Flows may overlap: a slow `send` can still be waiting on the service when
/// the user switches sessions. Every view replacement advances an epoch
/// counter, and a flow only commits its result while the epoch still matches
/// the one it started under. A reply that lost the race is dropped together
/// with its pointer update. Epoch bumps and commit checks all happen under
/// the transcript lock, so they cannot interleave.
pub struct ChatUseCase {
    /// Remote chat service.
    backend: Arc<dyn ChatBackend>,
    /// Persisted client state (active-session pointer).
    state_repository: Arc<dyn StateRepository>,
    /// Entries currently on screen.
    transcript: Arc<Mutex<Transcript>>,
    /// Cached session directory, newest first as the service lists them.
    directory: Arc<RwLock<Vec<SessionSummary>>>,
    /// Thinking mode sent with every message.
    thinking_mode: Arc<RwLock<ThinkingMode>>,
    /// Generation counter for the transcript view; see `# Concurrency`.
    view_epoch: AtomicU64,
}

impl ChatUseCase {
    /// Creates a new `ChatUseCase` with an empty view.
    ///
    /// # Arguments
    ///
    /// * `backend` - Remote chat service
    /// * `state_repository` - Repository persisting the active-session pointer
    pub fn new(
        backend: Arc<dyn ChatBackend>,
        state_repository: Arc<dyn StateRepository>,
    ) -> Self {
        Self {
            backend,
            state_repository,
            transcript: Arc::new(Mutex::new(Transcript::new())),
            directory: Arc::new(RwLock::new(Vec::new())),
            thinking_mode: Arc::new(RwLock::new(ThinkingMode::default())),
            view_epoch: AtomicU64::new(0),
        }
    }

    /// Attaches the sink that renders transcript changes.
    pub async fn attach_sink(&self, sink: Arc<dyn TranscriptSink>) {
        self.transcript.lock().await.set_sink(sink);
    }

    /// Currently selected thinking mode.
    pub async fn thinking_mode(&self) -> ThinkingMode {
        *self.thinking_mode.read().await
    }

    /// Changes the thinking mode used for subsequent messages.
    pub async fn set_thinking_mode(&self, mode: ThinkingMode) {
        *self.thinking_mode.write().await = mode;
    }

    /// Snapshot of the cached session directory.
    pub async fn directory(&self) -> Vec<SessionSummary> {
        self.directory.read().await.clone()
    }

    /// Snapshot of the entries currently on screen.
    pub async fn entries(&self) -> Vec<ChatMessage> {
        self.transcript.lock().await.entries().to_vec()
    }

    /// Identifier of the session the persisted pointer selects, if any.
    pub async fn active_session(&self) -> Option<String> {
        self.state_repository.get_active_session().await
    }

    /// Sends `text` within the active session.
    ///
    /// The user entry is shown immediately; the assistant reply is appended
    /// once the service answers. When the service names a session in its
    /// reply, that session becomes the persisted pointer. A failure is
    /// reported as one inline assistant entry instead of an error return.
    /// Blank input does nothing.
    pub async fn send(&self, text: &str) {
        let message = text.trim();
        if message.is_empty() {
            return;
        }

        // Echo the user entry before the round trip, and remember which view
        // the reply belongs to. Epoch reads share the transcript lock.
        let epoch = {
            let mut transcript = self.transcript.lock().await;
            transcript.push(ChatMessage::user(message));
            self.view_epoch.load(Ordering::SeqCst)
        };

        let request = ChatRequest {
            message: message.to_string(),
            session_id: self.state_repository.get_active_session().await,
            thinking_mode: self.thinking_mode().await,
        };
        tracing::debug!(
            "[ChatUseCase] Sending message (session: {:?}, mode: {})",
            request.session_id,
            request.thinking_mode
        );

        match self.backend.send_message(request).await {
            Ok(reply) => {
                {
                    let mut transcript = self.transcript.lock().await;
                    if self.view_epoch.load(Ordering::SeqCst) != epoch {
                        tracing::debug!("[ChatUseCase] Dropping reply for a replaced view");
                        return;
                    }
                    if let Some(session_id) = reply.session_id {
                        if let Err(e) = self
                            .state_repository
                            .set_active_session(session_id)
                            .await
                        {
                            tracing::warn!(
                                "[ChatUseCase] Failed to persist active session: {}",
                                e
                            );
                        }
                    }
                    transcript.push(ChatMessage::assistant(reply.reply));
                }

                if let Err(e) = self.refresh_directory().await {
                    tracing::warn!(
                        "[ChatUseCase] Directory refresh after send failed: {}",
                        e
                    );
                }
            }
            Err(e) => {
                let mut transcript = self.transcript.lock().await;
                if self.view_epoch.load(Ordering::SeqCst) != epoch {
                    tracing::debug!("[ChatUseCase] Dropping send failure for a replaced view");
                    return;
                }
                tracing::warn!("[ChatUseCase] Send failed: {}", e);
                transcript.push(ChatMessage::assistant(format!(
                    "{}\n{}",
                    SEND_FAILURE_NOTICE, e
                )));
            }
        }
    }

    /// Switches the view to `session_id`.
    ///
    /// The pointer moves first so the choice survives a failed fetch; the
    /// transcript is only replaced once the full history has arrived. A fetch
    /// failure leaves the current entries on screen and returns the error.
    pub async fn select_session(&self, session_id: &str) -> Result<()> {
        tracing::info!("[ChatUseCase] Switching to session: {}", session_id);

        // Entering a switch invalidates replies still in flight.
        let epoch = {
            let _view = self.transcript.lock().await;
            self.view_epoch.fetch_add(1, Ordering::SeqCst) + 1
        };

        if let Err(e) = self
            .state_repository
            .set_active_session(session_id.to_string())
            .await
        {
            tracing::warn!("[ChatUseCase] Failed to persist active session: {}", e);
        }

        let messages = self.backend.session_messages(session_id).await?;

        let mut transcript = self.transcript.lock().await;
        if self.view_epoch.load(Ordering::SeqCst) != epoch {
            tracing::debug!("[ChatUseCase] Dropping history for a superseded switch");
            return Ok(());
        }
        tracing::debug!(
            "[ChatUseCase] Loaded {} entries for session {}",
            messages.len(),
            session_id
        );
        transcript.replace(messages);
        Ok(())
    }

    /// Starts a fresh chat.
    ///
    /// On success the pointer moves to the new session and the view is
    /// cleared; the new session's identifier is returned. On failure the view
    /// keeps its entries, one inline error entry reports the problem, and the
    /// pointer stays where it was.
    pub async fn new_session(&self) -> Option<String> {
        tracing::info!("[ChatUseCase] Creating a new session");
        let epoch = self.view_epoch.load(Ordering::SeqCst);

        match self.backend.create_session().await {
            Ok(session_id) => {
                {
                    let mut transcript = self.transcript.lock().await;
                    if self.view_epoch.load(Ordering::SeqCst) != epoch {
                        tracing::debug!(
                            "[ChatUseCase] Dropping created session for a replaced view"
                        );
                        return None;
                    }
                    self.view_epoch.fetch_add(1, Ordering::SeqCst);
                    if let Err(e) = self
                        .state_repository
                        .set_active_session(session_id.clone())
                        .await
                    {
                        tracing::warn!(
                            "[ChatUseCase] Failed to persist active session: {}",
                            e
                        );
                    }
                    transcript.clear();
                }

                if let Err(e) = self.refresh_directory().await {
                    tracing::warn!(
                        "[ChatUseCase] Directory refresh after create failed: {}",
                        e
                    );
                }
                tracing::info!("[ChatUseCase] Now chatting in session: {}", session_id);
                Some(session_id)
            }
            Err(e) => {
                let mut transcript = self.transcript.lock().await;
                if self.view_epoch.load(Ordering::SeqCst) == epoch {
                    tracing::warn!("[ChatUseCase] New session failed: {}", e);
                    transcript.push(ChatMessage::assistant(format!(
                        "{}\n{}",
                        NEW_SESSION_FAILURE_NOTICE, e
                    )));
                }
                None
            }
        }
    }

    /// Replaces the cached session directory with the service's listing.
    pub async fn refresh_directory(&self) -> Result<()> {
        let sessions = self.backend.list_sessions().await?;
        tracing::debug!(
            "[ChatUseCase] Directory now lists {} sessions",
            sessions.len()
        );
        *self.directory.write().await = sessions;
        Ok(())
    }

    /// Restores the view for the session the pointer selected last run.
    ///
    /// Returns the restored session's identifier, or `None` when there is
    /// nothing to restore. Directory and history failures are logged and
    /// swallowed so startup always reaches the prompt, at worst with an
    /// empty view.
    pub async fn restore_last_session(&self) -> Option<String> {
        if let Err(e) = self.refresh_directory().await {
            tracing::warn!("[ChatUseCase] Initial directory refresh failed: {}", e);
        }

        let Some(session_id) = self.state_repository.get_active_session().await else {
            tracing::debug!("[ChatUseCase] No active session to restore");
            return None;
        };

        match self.select_session(&session_id).await {
            Ok(()) => {
                tracing::info!("[ChatUseCase] Restored session: {}", session_id);
                Some(session_id)
            }
            Err(e) => {
                tracing::warn!(
                    "[ChatUseCase] Failed to restore session {}: {}",
                    session_id,
                    e
                );
                None
            }
        }
    }
}
