//! FAQ source reading suggestions straight from the hosted data API.
//!
//! Suggestions are the top rows of a questions table ordered by importance;
//! answers still come from the chat backend's `/sakura` endpoint. The data
//! API credentials are injected by configuration, never compiled in.

use async_trait::async_trait;
use haruhi_core::error::{HaruhiError, Result};
use haruhi_core::faq::{FaqEntry, FaqOrigin, FaqSource};
use reqwest::Client;
use serde::Deserialize;
use std::time::Duration;
use tracing::debug;

const DEFAULT_TABLE: &str = "haruhi_faqs";
const DEFAULT_LIMIT: u32 = 3;

/// FAQ source backed by a hosted data API (PostgREST-style read).
#[derive(Clone)]
pub struct DirectFaqSource {
    client: Client,
    /// Chat backend base URL, for answering questions via `/sakura`.
    chat_url: String,
    /// Hosted data API base URL, for reading suggestions.
    data_url: String,
    api_key: String,
    table: String,
    limit: u32,
    timeout: Option<Duration>,
}

#[derive(Debug, Deserialize)]
struct FaqRow {
    question: String,
}

impl DirectFaqSource {
    /// Creates a new source.
    ///
    /// # Arguments
    ///
    /// * `chat_url` - Chat backend base URL (answers)
    /// * `data_url` - Hosted data API base URL (suggestions)
    /// * `api_key` - Data API key, sent as both `apikey` and bearer token
    pub fn new(
        chat_url: impl Into<String>,
        data_url: impl Into<String>,
        api_key: impl Into<String>,
    ) -> Self {
        Self {
            client: Client::new(),
            chat_url: chat_url.into().trim_end_matches('/').to_string(),
            data_url: data_url.into().trim_end_matches('/').to_string(),
            api_key: api_key.into(),
            table: DEFAULT_TABLE.to_string(),
            limit: DEFAULT_LIMIT,
            timeout: None,
        }
    }

    /// Sets the questions table to read from.
    pub fn with_table(mut self, table: impl Into<String>) -> Self {
        self.table = table.into();
        self
    }

    /// Sets how many suggestions to fetch.
    pub fn with_limit(mut self, limit: u32) -> Self {
        self.limit = limit;
        self
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

    fn mode_param(origin: FaqOrigin) -> &'static str {
        match origin {
            FaqOrigin::Suggested => "faq",
            FaqOrigin::Typed => "form",
        }
    }
}

#[async_trait]
impl FaqSource for DirectFaqSource {
    async fn suggested_questions(&self) -> Result<Vec<FaqEntry>> {
        let url = format!("{}/rest/v1/{}", self.data_url, self.table);

        debug!(table = %self.table, limit = self.limit, "fetching FAQ suggestions");

        let response = self
            .apply_timeout(
                self.client
                    .get(&url)
                    .query(&[
                        ("select", "question,importance"),
                        ("order", "importance.desc"),
                        ("limit", &self.limit.to_string()),
                    ])
                    .header("apikey", &self.api_key)
                    .header("Authorization", format!("Bearer {}", self.api_key)),
            )
            .send()
            .await
            .map_err(|e| HaruhiError::network(format!("FAQ data request failed: {}", e)))?;

        let status = response.status();
        if !status.is_success() {
            let body = response
                .text()
                .await
                .unwrap_or_else(|_| "Unknown error".to_string());
            return Err(HaruhiError::http(status.as_u16(), body));
        }

        let rows: Vec<FaqRow> = response
            .json()
            .await
            .map_err(|e| HaruhiError::decode(format!("Failed to parse FAQ rows: {}", e)))?;

        Ok(rows
            .into_iter()
            .map(|row| FaqEntry::new(row.question))
            .collect())
    }

    async fn ask(&self, question: &str, origin: FaqOrigin) -> Result<String> {
        let url = format!("{}/sakura", self.chat_url);
        let mode = Self::mode_param(origin);

        let response = self
            .apply_timeout(
                self.client
                    .post(&url)
                    .form(&[("sakura_question", question), ("mode", mode)]),
            )
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

        // The reply body is plain text, not JSON
        response
            .text()
            .await
            .map_err(|e| HaruhiError::decode(format!("Failed to read FAQ answer: {}", e)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use wiremock::matchers::{body_string, body_string_contains, header, method, path, query_param};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    #[tokio::test]
    async fn test_suggested_questions_sends_credentials() {
        let server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/rest/v1/haruhi_faqs"))
            .and(query_param("select", "question,importance"))
            .and(query_param("order", "importance.desc"))
            .and(query_param("limit", "3"))
            .and(header("apikey", "test-key"))
            .and(header("authorization", "Bearer test-key"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!([
                {"question": "Most important", "importance": 9},
                {"question": "Less important", "importance": 5},
            ])))
            .expect(1)
            .mount(&server)
            .await;

        let source = DirectFaqSource::new(server.uri(), server.uri(), "test-key");
        let entries = source.suggested_questions().await.unwrap();

        assert_eq!(
            entries,
            vec![
                FaqEntry::new("Most important"),
                FaqEntry::new("Less important"),
            ]
        );
    }

    #[tokio::test]
    async fn test_suggested_questions_custom_table_and_limit() {
        let server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/rest/v1/support_faqs"))
            .and(query_param("limit", "5"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!([])))
            .mount(&server)
            .await;

        let source = DirectFaqSource::new(server.uri(), server.uri(), "test-key")
            .with_table("support_faqs")
            .with_limit(5);
        let entries = source.suggested_questions().await.unwrap();

        assert!(entries.is_empty());
    }

    #[tokio::test]
    async fn test_ask_suggested_uses_faq_mode() {
        let server = MockServer::start().await;

        Mock::given(method("POST"))
            .and(path("/sakura"))
            .and(header(
                "content-type",
                "application/x-www-form-urlencoded",
            ))
            .and(body_string("sakura_question=pricing&mode=faq"))
            .respond_with(ResponseTemplate::new(200).set_body_string("It is free."))
            .expect(1)
            .mount(&server)
            .await;

        let source = DirectFaqSource::new(server.uri(), server.uri(), "test-key");
        let answer = source.ask("pricing", FaqOrigin::Suggested).await.unwrap();

        assert_eq!(answer, "It is free.");
    }

    #[tokio::test]
    async fn test_ask_typed_uses_form_mode() {
        let server = MockServer::start().await;

        Mock::given(method("POST"))
            .and(path("/sakura"))
            .and(body_string_contains("mode=form"))
            .respond_with(ResponseTemplate::new(200).set_body_string("Typed answer"))
            .mount(&server)
            .await;

        let source = DirectFaqSource::new(server.uri(), server.uri(), "test-key");
        let answer = source
            .ask("something typed", FaqOrigin::Typed)
            .await
            .unwrap();

        assert_eq!(answer, "Typed answer");
    }

    #[tokio::test]
    async fn test_ask_http_error() {
        let server = MockServer::start().await;

        Mock::given(method("POST"))
            .and(path("/sakura"))
            .respond_with(ResponseTemplate::new(400).set_body_string("bad question"))
            .mount(&server)
            .await;

        let source = DirectFaqSource::new(server.uri(), server.uri(), "test-key");
        let err = source.ask("q", FaqOrigin::Typed).await.unwrap_err();

        match err {
            HaruhiError::Http { status, body } => {
                assert_eq!(status, 400);
                assert_eq!(body, "bad question");
            }
            other => panic!("Expected Http error, got {:?}", other),
        }
    }
}
