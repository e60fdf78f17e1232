//! Runtime configuration read from the environment (and `.env`)

use std::env;
use std::path::PathBuf;
use std::time::Duration;

use crate::error::ConfigError;

pub const DEFAULT_BASE_URL: &str = "https://openrouter.ai/api/v1";
pub const DEFAULT_MODEL: &str = "openai/gpt-3.5-turbo";
pub const DEFAULT_TIMEOUT_SECS: u64 = 30;

#[derive(Debug, Clone)]
pub struct Config {
    /// `None` means the completion API is not used at all
    pub api_key: Option<String>,
    pub base_url: String,
    pub model: String,
    /// `None` selects the bundled catalog
    pub catalog_path: Option<PathBuf>,
    pub timeout: Duration,
}

impl Config {
    /// Load configuration from the process environment.
    ///
    /// A `.env` file in the working directory is read first if present.
    ///
    /// - `OPENROUTER_API_KEY`: completion API key (optional)
    /// - `OPENROUTER_BASE_URL`: API base (default: OpenRouter v1)
    /// - `SALESEER_MODEL`: model id (default: `openai/gpt-3.5-turbo`)
    /// - `SALESEER_CATALOG`: path to a products JSON file
    /// - `SALESEER_TIMEOUT_SECS`: request timeout (default: 30)
    pub fn from_env() -> Result<Self, ConfigError> {
        dotenvy::dotenv().ok();
        Self::from_lookup(|key| env::var(key).ok())
    }

    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let non_blank = |key: &str| lookup(key).map(|v| v.trim().to_string()).filter(|v| !v.is_empty());

        let timeout_secs = match non_blank("SALESEER_TIMEOUT_SECS") {
            Some(raw) => raw
                .parse::<u64>()
                .ok()
                .filter(|secs| *secs > 0)
                .ok_or(ConfigError::InvalidValue {
                    key: "SALESEER_TIMEOUT_SECS".to_string(),
                    value: raw,
                })?,
            None => DEFAULT_TIMEOUT_SECS,
        };

        Ok(Self {
            api_key: non_blank("OPENROUTER_API_KEY"),
            base_url: non_blank("OPENROUTER_BASE_URL")
                .map(|url| url.trim_end_matches('/').to_string())
                .unwrap_or_else(|| DEFAULT_BASE_URL.to_string()),
            model: non_blank("SALESEER_MODEL").unwrap_or_else(|| DEFAULT_MODEL.to_string()),
            catalog_path: non_blank("SALESEER_CATALOG").map(PathBuf::from),
            timeout: Duration::from_secs(timeout_secs),
        })
    }

    /// Drop the API key so every extraction uses the keyword fallback
    pub fn offline(mut self) -> Self {
        self.api_key = None;
        self
    }

    pub fn with_model(mut self, model: impl Into<String>) -> Self {
        self.model = model.into();
        self
    }

    pub fn with_catalog(mut self, path: impl Into<PathBuf>) -> Self {
        self.catalog_path = Some(path.into());
        self
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            api_key: None,
            base_url: DEFAULT_BASE_URL.to_string(),
            model: DEFAULT_MODEL.to_string(),
            catalog_path: None,
            timeout: Duration::from_secs(DEFAULT_TIMEOUT_SECS),
        }
    }
}
