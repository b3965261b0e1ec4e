//! Unified path management for haruhi configuration files.
//!
//! All client configuration, secrets, and persisted state live under one
//! platform-appropriate config directory, resolved via the `dirs` crate.
//!
//! This ensures consistency across all platforms (Linux, macOS, Windows).

use std::path::PathBuf;

/// Errors that can occur during path resolution.
#[derive(Debug)]
pub enum PathError {
    /// Home directory could not be determined.
    HomeDirNotFound,
}

impl std::fmt::Display for PathError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            PathError::HomeDirNotFound => write!(f, "Cannot find home directory"),
        }
    }
}

impl std::error::Error for PathError {}

/// Unified path management for haruhi.
///
/// # Directory Structure
///
/// ```text
/// ~/.config/haruhi/            # Config directory (Linux; platform-specific elsewhere)
/// ├── config.toml              # Client configuration
/// ├── secret.json              # API keys and secrets
/// └── state.toml               # Persisted client state (active session pointer)
/// ```
pub struct HaruhiPaths;

impl HaruhiPaths {
    /// Returns the haruhi configuration directory.
    ///
    /// # Returns
    ///
    /// - `Ok(PathBuf)`: Path to config directory (e.g., `~/.config/haruhi/`)
    /// - `Err(PathError::HomeDirNotFound)`: Could not determine directory
    pub fn config_dir() -> Result<PathBuf, PathError> {
        dirs::config_dir()
            .map(|dir| dir.join("haruhi"))
            .ok_or(PathError::HomeDirNotFound)
    }

    /// Returns the path to the main configuration file.
    ///
    /// # Returns
    ///
    /// - `Ok(PathBuf)`: Path to config.toml
    /// - `Err(PathError)`: Could not determine path
    pub fn config_file() -> Result<PathBuf, PathError> {
        Ok(Self::config_dir()?.join("config.toml"))
    }

    /// Returns the path to the secrets file.
    ///
    /// # Security Note
    ///
    /// Ensure this file has appropriate permissions (e.g., 600) to prevent
    /// unauthorized access.
    ///
    /// # Returns
    ///
    /// - `Ok(PathBuf)`: Path to secret.json
    /// - `Err(PathError)`: Could not determine path
    pub fn secret_file() -> Result<PathBuf, PathError> {
        Ok(Self::config_dir()?.join("secret.json"))
    }

    /// Returns the path to the persisted client state file.
    ///
    /// # Returns
    ///
    /// - `Ok(PathBuf)`: Path to state.toml
    /// - `Err(PathError)`: Could not determine path
    pub fn state_file() -> Result<PathBuf, PathError> {
        Ok(Self::config_dir()?.join("state.toml"))
    }

    /// Ensures the secret file exists, creating it with a template if it doesn't.
    ///
    /// The template contains an empty API key placeholder so users can see
    /// the expected structure and fill it in.
    ///
    /// # Security Note
    ///
    /// This function sets file permissions to 600 (user read/write only) on Unix systems.
    ///
    /// # Returns
    ///
    /// - `Ok(PathBuf)`: Path to the secret file (existing or newly created)
    /// - `Err(std::io::Error)`: If file creation or permission setting fails
    pub fn ensure_secret_file() -> Result<PathBuf, std::io::Error> {
        let secret_path = Self::secret_file()
            .map_err(|e| std::io::Error::new(std::io::ErrorKind::NotFound, e.to_string()))?;

        // If file already exists, return the path
        if secret_path.exists() {
            return Ok(secret_path);
        }

        // Ensure parent directory exists
        if let Some(parent) = secret_path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        use haruhi_core::config::{FaqSecret, SecretConfig};

        let template_config = SecretConfig {
            faq: Some(FaqSecret {
                api_key: String::new(),
            }),
        };

        let template_json = serde_json::to_string_pretty(&template_config)
            .map_err(|e| std::io::Error::new(std::io::ErrorKind::Other, e))?;

        std::fs::write(&secret_path, template_json)?;

        // Set file permissions to 600 (user read/write only) on Unix
        #[cfg(unix)]
        {
            use std::os::unix::fs::PermissionsExt;
            let permissions = std::fs::Permissions::from_mode(0o600);
            std::fs::set_permissions(&secret_path, permissions)?;
        }

        Ok(secret_path)
    }
}
