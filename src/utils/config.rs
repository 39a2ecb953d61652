//! Configuration utilities

use serde::{Deserialize, Serialize};
use std::path::Path;

/// Application configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    /// HTTP server settings
    pub server: ServerSettings,
    /// Catalog gateway settings
    pub catalog: CatalogSettings,
    /// LLM classification settings
    pub llm: LlmSettings,
    /// Logging settings
    pub logging: LoggingSettings,
}

/// HTTP server settings
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ServerSettings {
    /// Bind host
    pub host: String,
    /// Bind port
    pub port: u16,
}

impl Default for ServerSettings {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: 8000,
        }
    }
}

impl ServerSettings {
    /// Render as a bindable address string
    pub fn bind_addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

/// Catalog gateway settings
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct CatalogSettings {
    /// Base URL of the catalog gateway
    pub base_url: String,
    /// Reviews fetched per analysis
    pub review_count: usize,
    /// Request timeout in milliseconds
    pub timeout_ms: u64,
}

impl Default for CatalogSettings {
    fn default() -> Self {
        Self {
            base_url: "http://localhost:3000/api".to_string(),
            review_count: 100,
            timeout_ms: 30_000,
        }
    }
}

/// LLM classification settings
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LlmSettings {
    /// Model name
    pub model: String,
    /// API key (can be loaded from env)
    pub api_key: Option<String>,
    /// API key environment variable name
    pub api_key_env: String,
    /// Request timeout in milliseconds
    pub timeout_ms: u64,
    /// Enable response caching
    pub enable_cache: bool,
}

impl Default for LlmSettings {
    fn default() -> Self {
        Self {
            model: "gpt-4o".to_string(),
            api_key: None,
            api_key_env: "OPENAI_API_KEY".to_string(),
            timeout_ms: 30_000,
            enable_cache: true,
        }
    }
}

impl LlmSettings {
    /// Get API key from config or environment
    pub fn get_api_key(&self) -> Option<String> {
        self.api_key
            .clone()
            .or_else(|| std::env::var(&self.api_key_env).ok())
            .filter(|key| !key.trim().is_empty())
    }
}

/// Logging settings
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingSettings {
    /// Log level (trace, debug, info, warn, error)
    pub level: String,
    /// Enable JSON format
    pub json_format: bool,
}

impl Default for LoggingSettings {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            json_format: false,
        }
    }
}

/// Load configuration from a JSON, TOML, or YAML file
pub fn load_config<P: AsRef<Path>>(path: P) -> Result<AppConfig, ConfigError> {
    let content = std::fs::read_to_string(path.as_ref())
        .map_err(|e| ConfigError::FileError(e.to_string()))?;

    let ext = path
        .as_ref()
        .extension()
        .and_then(|e| e.to_str())
        .unwrap_or("");

    match ext {
        "json" => {
            serde_json::from_str(&content).map_err(|e| ConfigError::ParseError(e.to_string()))
        }
        "toml" => toml::from_str(&content).map_err(|e| ConfigError::ParseError(e.to_string())),
        "yaml" | "yml" => {
            serde_yaml::from_str(&content).map_err(|e| ConfigError::ParseError(e.to_string()))
        }
        _ => Err(ConfigError::UnsupportedFormat(ext.to_string())),
    }
}

/// Configuration error
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// File I/O error
    #[error("File error: {0}")]
    FileError(String),
    /// Parse error
    #[error("Parse error: {0}")]
    ParseError(String),
    /// Unsupported format
    #[error("Unsupported config format: {0}")]
    UnsupportedFormat(String),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = AppConfig::default();
        assert_eq!(config.server.port, 8000);
        assert_eq!(config.catalog.review_count, 100);
        assert_eq!(config.llm.model, "gpt-4o");
        assert!(config.llm.enable_cache);
    }

    #[test]
    fn test_bind_addr() {
        let settings = ServerSettings {
            host: "127.0.0.1".to_string(),
            port: 9000,
        };
        assert_eq!(settings.bind_addr(), "127.0.0.1:9000");
    }

    #[test]
    fn test_api_key_from_config() {
        let settings = LlmSettings {
            api_key: Some("test-key".to_string()),
            ..Default::default()
        };
        assert_eq!(settings.get_api_key(), Some("test-key".to_string()));
    }

    #[test]
    fn test_api_key_missing() {
        let settings = LlmSettings {
            api_key_env: "REVIEW_SENTIMENT_TEST_KEY_UNSET".to_string(),
            ..Default::default()
        };
        assert!(settings.get_api_key().is_none());
    }

    #[test]
    fn test_blank_api_key_is_treated_as_missing() {
        let settings = LlmSettings {
            api_key: Some("   ".to_string()),
            api_key_env: "REVIEW_SENTIMENT_TEST_KEY_UNSET".to_string(),
            ..Default::default()
        };
        assert!(settings.get_api_key().is_none());
    }

    #[test]
    fn test_partial_toml_round_trip() {
        let parsed: AppConfig = toml::from_str(
            r#"
            [server]
            port = 8080

            [llm]
            model = "gpt-4o-mini"
            "#,
        )
        .unwrap();

        assert_eq!(parsed.server.port, 8080);
        assert_eq!(parsed.server.host, "0.0.0.0");
        assert_eq!(parsed.llm.model, "gpt-4o-mini");
        assert_eq!(parsed.catalog.review_count, 100);
    }
}
