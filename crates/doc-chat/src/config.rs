//! Configuration for document chat

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use crate::error::{Error, Result};

/// Environment variable that overrides `llm.api_key`
pub const API_KEY_ENV: &str = "GEMINI_API_KEY";

/// Main configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct DocChatConfig {
    /// Server configuration
    #[serde(default)]
    pub server: ServerConfig,
    /// Answering service configuration
    #[serde(default)]
    pub llm: LlmConfig,
    /// Text extraction configuration
    #[serde(default)]
    pub extraction: ExtractionConfig,
}

impl DocChatConfig {
    /// Parse a TOML configuration file
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let raw = std::fs::read_to_string(path)
            .map_err(|e| Error::Config(format!("Failed to read {}: {}", path.display(), e)))?;
        Self::from_toml(&raw)
            .map_err(|e| Error::Config(format!("{}: {}", path.display(), e)))
    }

    /// Parse configuration from a TOML string; missing sections use defaults
    pub fn from_toml(raw: &str) -> Result<Self> {
        toml::from_str(raw).map_err(|e| Error::Config(format!("Invalid TOML: {}", e)))
    }

    /// Load configuration.
    ///
    /// An explicit path must exist. Otherwise `<config dir>/doc-chat/config.toml`
    /// is used when present, and defaults when not.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        if let Some(path) = path {
            tracing::info!("Loading configuration from {}", path.display());
            return Self::from_file(path);
        }

        match Self::default_path() {
            Some(path) if path.is_file() => {
                tracing::info!("Loading configuration from {}", path.display());
                Self::from_file(path)
            }
            _ => {
                tracing::debug!("No configuration file found, using defaults");
                Ok(Self::default())
            }
        }
    }

    /// Default configuration file location
    pub fn default_path() -> Option<PathBuf> {
        dirs::config_dir().map(|dir| dir.join("doc-chat").join("config.toml"))
    }

    /// Apply environment overrides (`GEMINI_API_KEY`)
    pub fn apply_env(mut self) -> Self {
        if let Some(key) = std::env::var(API_KEY_ENV).ok().filter(|k| !k.trim().is_empty()) {
            self.llm.api_key = Some(key);
        }
        self
    }
}

/// Server configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    /// Host address
    pub host: String,
    /// Port number
    pub port: u16,
    /// Enable CORS
    pub enable_cors: bool,
    /// Maximum upload size in bytes (default: 50MB)
    pub max_upload_size: usize,
    /// Sessions not used for this long are dropped (default: 1 hour); unset keeps them until deleted
    pub session_idle_timeout_secs: Option<u64>,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: 8080,
            enable_cors: true,
            max_upload_size: 50 * 1024 * 1024, // 50MB
            session_idle_timeout_secs: Some(3600),
        }
    }
}

impl ServerConfig {
    pub fn address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

/// Answering service (Gemini) configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LlmConfig {
    /// API base URL, without the `/models/...` suffix
    pub base_url: String,
    /// Generation model name
    pub model: String,
    /// Request timeout in seconds; unset means the HTTP client default
    pub timeout_secs: Option<u64>,
    /// Fallback credential when a request does not carry one
    #[serde(skip_serializing)]
    pub api_key: Option<String>,
}

impl Default for LlmConfig {
    fn default() -> Self {
        Self {
            base_url: "https://generativelanguage.googleapis.com/v1beta".to_string(),
            model: "gemini-1.5-flash-latest".to_string(),
            timeout_secs: None,
            api_key: None,
        }
    }
}

/// Text extraction configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ExtractionConfig {
    /// Time allowed for the primary PDF engine before falling back (default: 60s)
    pub pdf_timeout_secs: u64,
}

impl Default for ExtractionConfig {
    fn default() -> Self {
        Self { pdf_timeout_secs: 60 }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_defaults() {
        let config = DocChatConfig::default();
        assert_eq!(config.server.address(), "0.0.0.0:8080");
        assert_eq!(config.server.max_upload_size, 50 * 1024 * 1024);
        assert_eq!(config.server.session_idle_timeout_secs, Some(3600));
        assert_eq!(config.llm.model, "gemini-1.5-flash-latest");
        assert!(config.llm.timeout_secs.is_none());
        assert_eq!(config.extraction.pdf_timeout_secs, 60);
    }

    #[test]
    fn test_partial_toml_keeps_defaults() {
        let config = DocChatConfig::from_toml(
            r#"
            [server]
            port = 9090

            [llm]
            model = "gemini-pro"
            timeout_secs = 30
            "#,
        )
        .unwrap();

        assert_eq!(config.server.port, 9090);
        assert_eq!(config.server.host, "0.0.0.0");
        assert_eq!(config.llm.model, "gemini-pro");
        assert_eq!(config.llm.timeout_secs, Some(30));
        assert!(config.llm.base_url.starts_with("https://generativelanguage"));
        assert_eq!(config.extraction.pdf_timeout_secs, 60);
    }

    #[test]
    fn test_invalid_toml_is_config_error() {
        let err = DocChatConfig::from_toml("[server\nport = ").unwrap_err();
        assert!(matches!(err, Error::Config(_)));
    }

    #[test]
    fn test_load_explicit_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "[extraction]\npdf_timeout_secs = 5").unwrap();

        let config = DocChatConfig::load(Some(file.path())).unwrap();
        assert_eq!(config.extraction.pdf_timeout_secs, 5);
    }

    #[test]
    fn test_load_missing_explicit_file_fails() {
        let dir = tempfile::tempdir().unwrap();
        let err = DocChatConfig::load(Some(&dir.path().join("absent.toml"))).unwrap_err();
        assert!(matches!(err, Error::Config(_)));
    }

    #[test]
    fn test_api_key_never_serialized() {
        let mut config = DocChatConfig::default();
        config.llm.api_key = Some("secret".to_string());
        let rendered = toml::to_string(&config).unwrap();
        assert!(!rendered.contains("secret"));
    }
}
