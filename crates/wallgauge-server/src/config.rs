//! Server configuration loaded from environment variables.

use std::path::PathBuf;

pub const DEFAULT_OPENAI_BASE_URL: &str = "https://api.openai.com/v1";

/// Server configuration.
#[derive(Debug, Clone)]
pub struct Config {
    /// Port to listen on.
    pub port: u16,
    /// Maximum request body size in MB (all uploads together).
    pub max_upload_mb: usize,
    /// Request timeout in seconds.
    pub request_timeout_secs: u64,
    /// Chat-completion API key; commentary is disabled without it.
    pub openai_api_key: Option<String>,
    pub openai_model: String,
    pub openai_base_url: String,
    /// Timeout for one commentary request.
    pub ai_timeout_secs: u64,
    /// Optional estimator configuration (JSON).
    pub engine_config: Option<PathBuf>,
}

impl Config {
    /// Load configuration from environment variables.
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build from an arbitrary key lookup; unparsable values fall back to defaults.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let non_empty = |key: &str| lookup(key).map(|v| v.trim().to_string()).filter(|v| !v.is_empty());
        Self {
            port: non_empty("PORT").and_then(|v| v.parse().ok()).unwrap_or(5000),
            max_upload_mb: non_empty("MAX_UPLOAD_MB")
                .and_then(|v| v.parse().ok())
                .unwrap_or(25),
            request_timeout_secs: non_empty("REQUEST_TIMEOUT_SECS")
                .and_then(|v| v.parse().ok())
                .unwrap_or(60),
            openai_api_key: non_empty("OPENAI_API_KEY"),
            openai_model: non_empty("OPENAI_MODEL").unwrap_or_else(|| "gpt-4o-mini".into()),
            openai_base_url: non_empty("OPENAI_BASE_URL")
                .unwrap_or_else(|| DEFAULT_OPENAI_BASE_URL.into()),
            ai_timeout_secs: non_empty("AI_TIMEOUT_SECS")
                .and_then(|v| v.parse().ok())
                .unwrap_or(20),
            engine_config: non_empty("WALLGAUGE_CONFIG").map(PathBuf::from),
        }
    }
}

impl Default for Config {
    fn default() -> Self {
        Self::from_lookup(|_| None)
    }
}
