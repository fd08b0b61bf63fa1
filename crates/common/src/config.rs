//! Application configuration.

use serde::Deserialize;
use std::path::Path;

/// Application configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    /// Server configuration.
    pub server: ServerConfig,
    /// Database configuration.
    pub database: DatabaseConfig,
    /// File storage configuration.
    #[serde(default)]
    pub storage: StorageConfig,
    /// AI curator configuration.
    #[serde(default)]
    pub ai: AiConfig,
}

/// Server configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct ServerConfig {
    /// Host to bind to.
    #[serde(default = "default_host")]
    pub host: String,
    /// Port to bind to.
    #[serde(default = "default_port")]
    pub port: u16,
    /// Public URL of this instance.
    pub url: String,
}

/// Database connection configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct DatabaseConfig {
    /// `PostgreSQL` connection URL.
    pub url: String,
    /// Maximum number of connections in the pool.
    #[serde(default = "default_max_connections")]
    pub max_connections: u32,
    /// Minimum number of connections in the pool.
    #[serde(default = "default_min_connections")]
    pub min_connections: u32,
}

/// File storage configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct StorageConfig {
    /// Base directory for stored files.
    #[serde(default = "default_storage_path")]
    pub base_path: String,
    /// URL path prefix under which files are served.
    #[serde(default = "default_storage_url")]
    pub base_url: String,
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            base_path: default_storage_path(),
            base_url: default_storage_url(),
        }
    }
}

/// AI curator configuration (OpenAI-compatible chat completion API).
#[derive(Debug, Clone, Deserialize)]
pub struct AiConfig {
    /// API key. When absent the curator endpoints report an error.
    #[serde(default)]
    pub api_key: Option<String>,
    /// Base URL of the completion API.
    #[serde(default = "default_ai_base_url")]
    pub base_url: String,
    /// Primary model.
    #[serde(default = "default_ai_model")]
    pub model: String,
    /// Fallback models tried in order when the primary fails.
    #[serde(default = "default_ai_fallback_models")]
    pub fallback_models: Vec<String>,
    /// Per-request timeout in seconds.
    #[serde(default = "default_ai_timeout")]
    pub timeout_secs: u64,
}

impl Default for AiConfig {
    fn default() -> Self {
        Self {
            api_key: None,
            base_url: default_ai_base_url(),
            model: default_ai_model(),
            fallback_models: default_ai_fallback_models(),
            timeout_secs: default_ai_timeout(),
        }
    }
}

fn default_host() -> String {
    "0.0.0.0".to_string()
}

const fn default_port() -> u16 {
    8000
}

const fn default_max_connections() -> u32 {
    100
}

const fn default_min_connections() -> u32 {
    5
}

fn default_storage_path() -> String {
    "./media".to_string()
}

fn default_storage_url() -> String {
    "/media".to_string()
}

fn default_ai_base_url() -> String {
    "https://api.groq.com/openai/v1".to_string()
}

fn default_ai_model() -> String {
    "llama-3.3-70b-versatile".to_string()
}

fn default_ai_fallback_models() -> Vec<String> {
    vec![
        "llama-3.1-8b-instant".to_string(),
        "mixtral-8x7b-32768".to_string(),
    ]
}

const fn default_ai_timeout() -> u64 {
    10
}

impl Config {
    /// Load configuration from files and environment variables.
    ///
    /// Configuration is loaded in the following order:
    /// 1. `config/default.toml`
    /// 2. `config/{environment}.toml` (based on `ATELIER_ENV`)
    /// 3. Environment variables with `ATELIER_` prefix
    pub fn load() -> Result<Self, config::ConfigError> {
        let env = std::env::var("ATELIER_ENV").unwrap_or_else(|_| "development".to_string());

        let config = config::Config::builder()
            .add_source(config::File::with_name("config/default").required(false))
            .add_source(config::File::with_name(&format!("config/{env}")).required(false))
            .add_source(
                config::Environment::with_prefix("ATELIER")
                    .separator("__")
                    .try_parsing(true),
            )
            .build()?;

        config.try_deserialize()
    }

    /// Load configuration from a specific file.
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self, config::ConfigError> {
        let config = config::Config::builder()
            .add_source(config::File::from(path.as_ref()))
            .add_source(
                config::Environment::with_prefix("ATELIER")
                    .separator("__")
                    .try_parsing(true),
            )
            .build()?;

        config.try_deserialize()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_storage_config_defaults() {
        let storage = StorageConfig::default();
        assert_eq!(storage.base_path, "./media");
        assert_eq!(storage.base_url, "/media");
    }

    #[test]
    fn test_ai_config_defaults() {
        let ai = AiConfig::default();
        assert!(ai.api_key.is_none());
        assert_eq!(ai.model, "llama-3.3-70b-versatile");
        assert_eq!(ai.fallback_models.len(), 2);
        assert_eq!(ai.timeout_secs, 10);
    }
}
