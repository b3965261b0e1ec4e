//! FAQ popup use case implementation.
//!
//! This module provides the `FaqUseCase` which drives the FAQ popup: lazy
//! loading of suggested questions, the popup's own transcript, and asking
//! questions through whichever [`FaqSource`] the client was assembled with.

use crate::transcript::{Transcript, TranscriptSink};
use haruhi_core::faq::{FaqEntry, FaqOrigin, FaqSource};
use haruhi_core::session::ChatMessage;
use std::sync::Arc;
use tokio::sync::Mutex;

/// Shown inline when the FAQ service could not answer.
const FAQ_FAILURE_NOTICE: &str = "⚠ Something went wrong.";

/// Use case for the FAQ popup.
///
/// The popup keeps state of its own: whether it is open, the suggested
/// questions, and a transcript separate from the main chat view. Hiding the
/// popup clears nothing; reopening shows the same conversation.
///
/// Suggestions are fetched on the first show. A failed fetch leaves them
/// unloaded, so the next show simply tries again.
pub struct FaqUseCase {
    /// Source of suggestions and answers.
    source: Arc<dyn FaqSource>,
    /// Whether the popup is currently shown.
    visible: Arc<Mutex<bool>>,
    /// Suggested questions; `None` until a load has succeeded.
    suggestions: Arc<Mutex<Option<Vec<FaqEntry>>>>,
    /// The popup's own conversation.
    transcript: Arc<Mutex<Transcript>>,
}

impl FaqUseCase {
    /// Creates a new `FaqUseCase` with a hidden, empty popup.
    pub fn new(source: Arc<dyn FaqSource>) -> Self {
        Self {
            source,
            visible: Arc::new(Mutex::new(false)),
            suggestions: Arc::new(Mutex::new(None)),
            transcript: Arc::new(Mutex::new(Transcript::new())),
        }
    }

    /// Attaches the sink that renders the popup transcript.
    pub async fn attach_sink(&self, sink: Arc<dyn TranscriptSink>) {
        self.transcript.lock().await.set_sink(sink);
    }

    /// Shows or hides the popup; returns the new visibility.
    pub async fn toggle(&self) -> bool {
        let mut visible = self.visible.lock().await;
        *visible = !*visible;
        if *visible {
            self.ensure_suggestions().await;
        }
        *visible
    }

    /// Whether the popup is currently shown.
    pub async fn visible(&self) -> bool {
        *self.visible.lock().await
    }

    /// Suggested questions, empty until a load has succeeded.
    pub async fn suggestions(&self) -> Vec<FaqEntry> {
        self.suggestions.lock().await.clone().unwrap_or_default()
    }

    /// Snapshot of the popup's conversation.
    pub async fn entries(&self) -> Vec<ChatMessage> {
        self.transcript.lock().await.entries().to_vec()
    }

    /// Asks `question` and appends both sides to the popup transcript.
    ///
    /// A failure becomes one inline assistant entry instead of an error
    /// return. Blank input does nothing.
    pub async fn ask(&self, question: &str, origin: FaqOrigin) {
        let question = question.trim();
        if question.is_empty() {
            return;
        }

        self.transcript
            .lock()
            .await
            .push(ChatMessage::user(question));
        tracing::debug!("[FaqUseCase] Asking ({:?}): {}", origin, question);

        match self.source.ask(question, origin).await {
            Ok(answer) => {
                self.transcript
                    .lock()
                    .await
                    .push(ChatMessage::assistant(answer));
            }
            Err(e) => {
                tracing::warn!("[FaqUseCase] Ask failed: {}", e);
                self.transcript
                    .lock()
                    .await
                    .push(ChatMessage::assistant(FAQ_FAILURE_NOTICE));
            }
        }
    }

    /// Asks the suggestion at `index`; returns the question it resolved to,
    /// or `None` when no suggestion exists there.
    pub async fn ask_suggestion(&self, index: usize) -> Option<String> {
        let question = {
            let suggestions = self.suggestions.lock().await;
            suggestions
                .as_ref()
                .and_then(|list| list.get(index))
                .map(|entry| entry.question.clone())
        }?;

        self.ask(&question, FaqOrigin::Suggested).await;
        Some(question)
    }

    async fn ensure_suggestions(&self) {
        let mut suggestions = self.suggestions.lock().await;
        if suggestions.is_some() {
            return;
        }
        match self.source.suggested_questions().await {
            Ok(entries) => {
                tracing::debug!("[FaqUseCase] Loaded {} suggested questions", entries.len());
                *suggestions = Some(entries);
            }
            Err(e) => {
                tracing::warn!("[FaqUseCase] Failed to load suggested questions: {}", e);
            }
        }
    }
}
