//! HaruhiApi - REST implementation of the chat backend contract.
//!
//! Maps the `ChatBackend` trait onto the HARUHI HTTP endpoints. Requests
//! carry no timeout unless one is configured; a slow reply generation is
//! allowed to finish.

use async_trait::async_trait;
use haruhi_core::backend::{ChatBackend, ChatReply, ChatRequest};
use haruhi_core::error::{HaruhiError, Result};
use haruhi_core::session::{ChatMessage, SessionSummary, ThinkingMode};
use reqwest::Client;
use serde::{Deserialize, Serialize};
use std::time::Duration;
use tracing::debug;

/// REST client for the HARUHI chat backend.
#[derive(Clone)]
pub struct HaruhiApi {
    client: Client,
    base_url: String,
    timeout: Option<Duration>,
}

#[derive(Debug, Serialize)]
struct ChatMessagePayload<'a> {
    message: &'a str,
    // Serialized as JSON null when absent; the server then decides whether
    // to open a fresh session
    session_id: Option<&'a str>,
    thinking_mode: ThinkingMode,
}

#[derive(Debug, Deserialize)]
struct ChatReplyResponse {
    #[serde(default)]
    session_id: Option<String>,
    reply: String,
}

#[derive(Debug, Deserialize)]
struct SessionsResponse {
    sessions: Vec<SessionSummary>,
}

#[derive(Debug, Deserialize)]
struct SessionMessagesResponse {
    messages: Vec<ChatMessage>,
}

#[derive(Debug, Deserialize)]
struct CreatedSessionResponse {
    session_id: String,
}

impl HaruhiApi {
    /// Creates a new client for the given backend base URL.
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            client: Client::new(),
            base_url: base_url.into().trim_end_matches('/').to_string(),
            timeout: None,
        }
    }

    /// Sets a per-request timeout.
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    fn apply_timeout(&self, request: reqwest::RequestBuilder) -> reqwest::RequestBuilder {
        match self.timeout {
            Some(timeout) => request.timeout(timeout),
            None => request,
        }
    }

    async fn check_status(response: reqwest::Response) -> Result<reqwest::Response> {
        let status = response.status();
        if !status.is_success() {
            let body = response
                .text()
                .await
                .unwrap_or_else(|_| "Unknown error".to_string());
            return Err(HaruhiError::http(status.as_u16(), body));
        }
        Ok(response)
    }
}

#[async_trait]
impl ChatBackend for HaruhiApi {
    async fn send_message(&self, request: ChatRequest) -> Result<ChatReply> {
        let payload = ChatMessagePayload {
            message: &request.message,
            session_id: request.session_id.as_deref(),
            thinking_mode: request.thinking_mode,
        };

        debug!(
            session = payload.session_id.unwrap_or("<none>"),
            mode = %payload.thinking_mode,
            "posting chat message"
        );

        let response = self
            .apply_timeout(self.client.post(self.url("/haruhi_chat")).json(&payload))
            .send()
            .await
            .map_err(|e| HaruhiError::network(format!("Chat request failed: {}", e)))?;
        let response = Self::check_status(response).await?;

        let reply: ChatReplyResponse = response
            .json()
            .await
            .map_err(|e| HaruhiError::decode(format!("Failed to parse chat reply: {}", e)))?;

        Ok(ChatReply {
            session_id: reply.session_id,
            reply: reply.reply,
        })
    }

    async fn list_sessions(&self) -> Result<Vec<SessionSummary>> {
        let response = self
            .apply_timeout(self.client.get(self.url("/get_sessions")))
            .send()
            .await
            .map_err(|e| HaruhiError::network(format!("Session list request failed: {}", e)))?;
        let response = Self::check_status(response).await?;

        let body: SessionsResponse = response
            .json()
            .await
            .map_err(|e| HaruhiError::decode(format!("Failed to parse session list: {}", e)))?;

        Ok(body.sessions)
    }

    async fn session_messages(&self, session_id: &str) -> Result<Vec<ChatMessage>> {
        let url = self.url(&format!("/get_session_messages/{}", session_id));

        let response = self
            .apply_timeout(self.client.get(&url))
            .send()
            .await
            .map_err(|e| HaruhiError::network(format!("History request failed: {}", e)))?;
        let response = Self::check_status(response).await?;

        let body: SessionMessagesResponse = response
            .json()
            .await
            .map_err(|e| HaruhiError::decode(format!("Failed to parse session history: {}", e)))?;

        Ok(body.messages)
    }

    async fn create_session(&self) -> Result<String> {
        let response = self
            .apply_timeout(self.client.post(self.url("/create_session")))
            .send()
            .await
            .map_err(|e| HaruhiError::network(format!("Create-session request failed: {}", e)))?;
        let response = Self::check_status(response).await?;

        let body: CreatedSessionResponse = response.json().await.map_err(|e| {
            HaruhiError::decode(format!("Failed to parse create-session reply: {}", e))
        })?;

        Ok(body.session_id)
    }
}
