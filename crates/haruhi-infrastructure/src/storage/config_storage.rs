//! Client configuration file storage.
//!
//! Loads `~/.config/haruhi/config.toml` into the typed `ClientConfig` model.

use crate::paths::HaruhiPaths;
use haruhi_core::config::ClientConfig;
use std::fs;
use std::path::PathBuf;

/// Errors that can occur during config storage operations.
#[derive(Debug)]
pub enum ConfigStorageError {
    /// File I/O error.
    IoError(std::io::Error),
    /// TOML parsing error.
    ParseError(toml::de::Error),
    /// Config directory not found.
    ConfigDirNotFound,
}

impl std::fmt::Display for ConfigStorageError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ConfigStorageError::IoError(e) => write!(f, "I/O error: {}", e),
            ConfigStorageError::ParseError(e) => write!(f, "TOML parse error: {}", e),
            ConfigStorageError::ConfigDirNotFound => {
                write!(f, "Could not determine home directory")
            }
        }
    }
}

impl std::error::Error for ConfigStorageError {}

impl From<std::io::Error> for ConfigStorageError {
    fn from(e: std::io::Error) -> Self {
        ConfigStorageError::IoError(e)
    }
}

impl From<toml::de::Error> for ConfigStorageError {
    fn from(e: toml::de::Error) -> Self {
        ConfigStorageError::ParseError(e)
    }
}

/// Storage for the client configuration file (config.toml).
///
/// Responsibilities:
/// - Load config.toml from the haruhi config directory
/// - Parse TOML into the ClientConfig domain model
///
/// Does NOT:
/// - Write or modify config files (read-only)
/// - Apply environment overrides (see [`crate::settings`])
pub struct ConfigStorage {
    path: PathBuf,
}

impl ConfigStorage {
    /// Creates a new ConfigStorage with the default path (~/.config/haruhi/config.toml).
    ///
    /// # Returns
    ///
    /// - `Ok(ConfigStorage)`: Successfully determined config path
    /// - `Err(ConfigStorageError::ConfigDirNotFound)`: Could not find home directory
    pub fn new() -> Result<Self, ConfigStorageError> {
        let path = HaruhiPaths::config_file().map_err(|_| ConfigStorageError::ConfigDirNotFound)?;
        Ok(Self { path })
    }

    /// Creates a new ConfigStorage with a custom path (for testing).
    pub fn with_path(path: PathBuf) -> Self {
        Self { path }
    }

    /// Loads the client configuration from the TOML file.
    ///
    /// A missing or empty file is not an error; the client runs fine on
    /// defaults.
    ///
    /// # Returns
    ///
    /// - `Ok(Some(ClientConfig))`: Successfully loaded and parsed
    /// - `Ok(None)`: File doesn't exist or is empty
    /// - `Err(ConfigStorageError::IoError)`: Failed to read file
    /// - `Err(ConfigStorageError::ParseError)`: Invalid TOML
    pub fn load(&self) -> Result<Option<ClientConfig>, ConfigStorageError> {
        if !self.path.exists() {
            return Ok(None);
        }

        let content = fs::read_to_string(&self.path)?;

        if content.trim().is_empty() {
            return Ok(None);
        }

        let config: ClientConfig = toml::from_str(&content)?;
        Ok(Some(config))
    }

    /// Returns the path to the config file.
    pub fn path(&self) -> &PathBuf {
        &self.path
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use haruhi_core::config::FaqSourceKind;
    use haruhi_core::session::ThinkingMode;
    use tempfile::TempDir;

    #[test]
    fn test_load_nonexistent_file() {
        let temp_dir = TempDir::new().unwrap();
        let file_path = temp_dir.path().join("config.toml");
        let storage = ConfigStorage::with_path(file_path);

        let result = storage.load().unwrap();
        assert!(result.is_none());
    }

    #[test]
    fn test_load_valid_config() {
        let temp_dir = TempDir::new().unwrap();
        let file_path = temp_dir.path().join("config.toml");

        let toml_content = r#"
            base_url = "https://haruhi.example.com"
            thinking_mode = "creative"

            [faq]
            source = "direct"
            url = "https://data.example.com"
            limit = 5
        "#;

        fs::write(&file_path, toml_content).unwrap();

        let storage = ConfigStorage::with_path(file_path);
        let config = storage.load().unwrap().unwrap();

        assert_eq!(config.base_url, "https://haruhi.example.com");
        assert_eq!(config.thinking_mode, ThinkingMode::Creative);
        assert_eq!(config.faq.source, FaqSourceKind::Direct);
        assert_eq!(config.faq.limit, 5);
    }

    #[test]
    fn test_load_invalid_toml() {
        let temp_dir = TempDir::new().unwrap();
        let file_path = temp_dir.path().join("config.toml");

        fs::write(&file_path, "base_url = [not toml").unwrap();

        let storage = ConfigStorage::with_path(file_path);
        let result = storage.load();

        assert!(matches!(result, Err(ConfigStorageError::ParseError(_))));
    }
}
