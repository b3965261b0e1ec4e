//! Client configuration models.
//!
//! Pure data shapes for `config.toml` and `secret.json`; loading lives in
//! `haruhi-infrastructure`.

use serde::{Deserialize, Serialize};

use crate::session::ThinkingMode;

/// Which FAQ source implementation to use.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FaqSourceKind {
    /// Ask the chat backend to proxy FAQ data.
    Backend,
    /// Read suggestions straight from the hosted data API.
    Direct,
}

impl Default for FaqSourceKind {
    fn default() -> Self {
        FaqSourceKind::Backend
    }
}

/// Root configuration structure for config.toml.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ClientConfig {
    /// Base URL of the chat backend.
    #[serde(default = "default_base_url")]
    pub base_url: String,

    /// Thinking mode sent with every chat message.
    #[serde(default)]
    pub thinking_mode: ThinkingMode,

    /// Optional per-request timeout in seconds. Unset means no client-side
    /// deadline; slow generations are allowed to finish.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub request_timeout_secs: Option<u64>,

    /// FAQ panel settings.
    #[serde(default)]
    pub faq: FaqConfig,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
            thinking_mode: ThinkingMode::default(),
            request_timeout_secs: None,
            faq: FaqConfig::default(),
        }
    }
}

fn default_base_url() -> String {
    "http://127.0.0.1:5000".to_string()
}

/// FAQ panel configuration.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct FaqConfig {
    /// Where suggested questions come from.
    #[serde(default)]
    pub source: FaqSourceKind,

    /// How many suggestions to fetch.
    #[serde(default = "default_faq_limit")]
    pub limit: u32,

    /// Base URL of the hosted data API. Required when `source = "direct"`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,

    /// Table holding the FAQ rows on the hosted data API.
    #[serde(default = "default_faq_table")]
    pub table: String,
}

impl Default for FaqConfig {
    fn default() -> Self {
        Self {
            source: FaqSourceKind::default(),
            limit: default_faq_limit(),
            url: None,
            table: default_faq_table(),
        }
    }
}

fn default_faq_limit() -> u32 {
    3
}

fn default_faq_table() -> String {
    "haruhi_faqs".to_string()
}

/// Root configuration structure for secret.json.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SecretConfig {
    #[serde(default)]
    pub faq: Option<FaqSecret>,
}

/// Hosted data API credentials.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FaqSecret {
    pub api_key: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = ClientConfig::default();
        assert_eq!(config.base_url, "http://127.0.0.1:5000");
        assert_eq!(config.thinking_mode, ThinkingMode::Reflective);
        assert!(config.request_timeout_secs.is_none());
        assert_eq!(config.faq.source, FaqSourceKind::Backend);
        assert_eq!(config.faq.limit, 3);
    }

    #[test]
    fn test_empty_toml_is_all_defaults() {
        let config: ClientConfig = toml::from_str("").unwrap();
        assert_eq!(config, ClientConfig::default());
    }

    #[test]
    fn test_partial_toml_keeps_other_defaults() {
        let text = r#"
            base_url = "https://haruhi.example.com"

            [faq]
            source = "direct"
            url = "https://data.example.com"
        "#;
        let config: ClientConfig = toml::from_str(text).unwrap();
        assert_eq!(config.base_url, "https://haruhi.example.com");
        assert_eq!(config.thinking_mode, ThinkingMode::Reflective);
        assert_eq!(config.faq.source, FaqSourceKind::Direct);
        assert_eq!(config.faq.url.as_deref(), Some("https://data.example.com"));
        assert_eq!(config.faq.limit, 3);
        assert_eq!(config.faq.table, "haruhi_faqs");
    }

    #[test]
    fn test_secret_parse() {
        let text = r#"{"faq": {"api_key": "k-123"}}"#;
        let secret: SecretConfig = serde_json::from_str(text).unwrap();
        assert_eq!(secret.faq.unwrap().api_key, "k-123");
    }

    #[test]
    fn test_secret_empty_object() {
        let secret: SecretConfig = serde_json::from_str("{}").unwrap();
        assert!(secret.faq.is_none());
    }
}
