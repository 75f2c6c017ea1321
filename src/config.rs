//! Application configuration loaded from environment variables.
//!
//! Every setting has a sensible default so the companion service can start
//! with an empty environment; a `.env` file is honoured for local overrides.

use std::env;
use std::path::PathBuf;

/// Name of the repository solutions are pushed to.
pub const DEFAULT_REPO_NAME: &str = "Leetcode-Problems";

/// Application configuration, loaded once at startup.
#[derive(Debug, Clone)]
pub struct Config {
    /// Loopback port for the companion HTTP service
    pub port: u16,
    /// GitHub REST API base URL (overridable for tests and GHES)
    pub github_api_url: String,
    /// GitHub web base URL, used to build the solutions deep link
    pub github_web_url: String,
    /// Destination repository name, owned by the authenticated user
    pub repo_name: String,
    /// JSON file backing the local key-value store
    pub store_path: PathBuf,
    /// Shared key the extension sends in `x-leetpush-key`.
    /// When unset, the local API is open to any loopback caller.
    pub api_key: Option<String>,
}

impl Default for Config {
    /// Default config for testing only.
    fn default() -> Self {
        Self {
            port: 8787,
            github_api_url: "https://api.github.com".to_string(),
            github_web_url: "https://github.com".to_string(),
            repo_name: DEFAULT_REPO_NAME.to_string(),
            store_path: PathBuf::from("leetpush-store.json"),
            api_key: None,
        }
    }
}

impl Config {
    /// Load configuration from environment variables.
    pub fn from_env() -> Result<Self, ConfigError> {
        dotenvy::dotenv().ok(); // Load .env file if present

        let defaults = Self::default();

        let port = match env::var("PORT") {
            Ok(raw) => raw
                .trim()
                .parse()
                .map_err(|_| ConfigError::Invalid("PORT", raw))?,
            Err(_) => defaults.port,
        };

        Ok(Self {
            port,
            github_api_url: env::var("GITHUB_API_URL")
                .map(|v| v.trim_end_matches('/').to_string())
                .unwrap_or(defaults.github_api_url),
            github_web_url: env::var("GITHUB_WEB_URL")
                .map(|v| v.trim_end_matches('/').to_string())
                .unwrap_or(defaults.github_web_url),
            repo_name: env::var("LEETPUSH_REPO_NAME").unwrap_or(defaults.repo_name),
            store_path: env::var("LEETPUSH_STORE_PATH")
                .map(PathBuf::from)
                .unwrap_or(defaults.store_path),
            api_key: env::var("LEETPUSH_API_KEY")
                .ok()
                .map(|v| v.trim().to_string())
                .filter(|v| !v.is_empty()),
        })
    }
}

/// Configuration errors
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Invalid value for environment variable {0}: {1:?}")]
    Invalid(&'static str, String),
}
