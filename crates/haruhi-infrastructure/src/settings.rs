//! Client settings assembly.
//!
//! Combines the configuration file with environment overrides. Credentials
//! are never compiled in: the hosted data API key comes from the
//! environment or from secret.json, in that order.

use haruhi_core::config::{ClientConfig, SecretConfig};
use haruhi_core::error::{HaruhiError, Result};
use tracing::debug;

use crate::storage::{ConfigStorage, SecretStorage, SecretStorageError};

/// Environment variable overriding the backend base URL.
pub const ENV_BASE_URL: &str = "HARUHI_BASE_URL";

/// Environment variable overriding the hosted data API key.
pub const ENV_FAQ_API_KEY: &str = "HARUHI_FAQ_API_KEY";

/// Environment variable holding the log filter directive.
pub const ENV_LOG: &str = "HARUHI_LOG";

/// Loads the client configuration, applying environment overrides.
///
/// A missing config.toml yields the default configuration.
pub fn load_client_config() -> Result<ClientConfig> {
    let storage = ConfigStorage::new().map_err(|e| HaruhiError::config(e.to_string()))?;
    let config = storage
        .load()
        .map_err(|e| HaruhiError::config(e.to_string()))?
        .unwrap_or_default();
    Ok(merge_base_url(config, std::env::var(ENV_BASE_URL).ok()))
}

/// Loads the secret configuration.
///
/// A missing secret.json yields an empty configuration; whether that is a
/// problem depends on which FAQ source the config selects.
pub fn load_secret_config() -> Result<SecretConfig> {
    let storage = SecretStorage::new().map_err(|e| HaruhiError::config(e.to_string()))?;
    match storage.load() {
        Ok(config) => Ok(config),
        Err(SecretStorageError::NotFound(path)) => {
            debug!(path = %path.display(), "no secret file, continuing without credentials");
            Ok(SecretConfig::default())
        }
        Err(e) => Err(HaruhiError::config(e.to_string())),
    }
}

/// Resolves the hosted data API key.
///
/// The environment takes precedence over secret.json so deployments can
/// inject credentials without touching files.
pub fn resolve_faq_api_key(secret: &SecretConfig) -> Option<String> {
    pick_api_key(std::env::var(ENV_FAQ_API_KEY).ok(), secret)
}

fn merge_base_url(mut config: ClientConfig, env_url: Option<String>) -> ClientConfig {
    if let Some(url) = env_url.filter(|u| !u.trim().is_empty()) {
        debug!("backend base URL overridden from environment");
        config.base_url = url;
    }
    config
}

fn pick_api_key(env_key: Option<String>, secret: &SecretConfig) -> Option<String> {
    env_key.filter(|k| !k.trim().is_empty()).or_else(|| {
        secret
            .faq
            .as_ref()
            .map(|f| f.api_key.clone())
            .filter(|k| !k.trim().is_empty())
    })
}
