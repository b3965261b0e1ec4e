//! FAQ source proxied through the chat backend.

use async_trait::async_trait;
use haruhi_core::error::{HaruhiError, Result};
use haruhi_core::faq::{FaqEntry, FaqOrigin, FaqSource};
use reqwest::Client;
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// FAQ source that lets the chat backend serve suggestions and answers.
///
/// Suggestions come from `GET /get_faqs`; questions are answered via
/// `POST /sakura_faq_chat`. The question origin makes no difference to this
/// variant.
#[derive(Clone)]
pub struct BackendFaqSource {
    client: Client,
    base_url: String,
    timeout: Option<Duration>,
}

#[derive(Debug, Deserialize)]
struct FaqListResponse {
    faqs: Vec<FaqItem>,
}

#[derive(Debug, Deserialize)]
struct FaqItem {
    question: String,
}

#[derive(Debug, Serialize)]
struct FaqQuestionPayload<'a> {
    question: &'a str,
}

#[derive(Debug, Deserialize)]
struct FaqAnswerResponse {
    answer: String,
}

impl BackendFaqSource {
    /// Creates a new source against the chat backend base URL.
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

    fn apply_timeout(&self, request: reqwest::RequestBuilder) -> reqwest::RequestBuilder {
        match self.timeout {
            Some(timeout) => request.timeout(timeout),
            None => request,
        }
    }
}

#[async_trait]
impl FaqSource for BackendFaqSource {
    async fn suggested_questions(&self) -> Result<Vec<FaqEntry>> {
        let url = format!("{}/get_faqs", self.base_url);

        let response = self
            .apply_timeout(self.client.get(&url))
            .send()
            .await
            .map_err(|e| HaruhiError::network(format!("FAQ list request failed: {}", e)))?;

        let status = response.status();
        if !status.is_success() {
            let body = response
                .text()
                .await
                .unwrap_or_else(|_| "Unknown error".to_string());
            return Err(HaruhiError::http(status.as_u16(), body));
        }

        let body: FaqListResponse = response
            .json()
            .await
            .map_err(|e| HaruhiError::decode(format!("Failed to parse FAQ list: {}", e)))?;

        Ok(body
            .faqs
            .into_iter()
            .map(|item| FaqEntry::new(item.question))
            .collect())
    }

    async fn ask(&self, question: &str, _origin: FaqOrigin) -> Result<String> {
        let url = format!("{}/sakura_faq_chat", self.base_url);
        let payload = FaqQuestionPayload { question };

        let response = self
            .apply_timeout(self.client.post(&url).json(&payload))
            .send()
            .await
            .map_err(|e| HaruhiError::network(format!("FAQ chat request failed: {}", e)))?;

        let status = response.status();
        if !status.is_success() {
            let body = response
                .text()
                .await
                .unwrap_or_else(|_| "Unknown error".to_string());
            return Err(HaruhiError::http(status.as_u16(), body));
        }

        let body: FaqAnswerResponse = response
            .json()
            .await
            .map_err(|e| HaruhiError::decode(format!("Failed to parse FAQ answer: {}", e)))?;

        Ok(body.answer)
    }
}
