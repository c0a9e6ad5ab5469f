use bookline_core::llm_client::{DEFAULT_BASE_URL, DEFAULT_MODEL};
use std::net::SocketAddr;
use std::path::PathBuf;
use std::time::Duration;
use tracing::Level;

/// A custom error type for configuration loading failures.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Missing environment variable: {0}")]
    MissingVar(String),
    #[error("Invalid value for environment variable {0}: {1}")]
    InvalidValue(String, String),
}

/// Holds all configuration loaded from the environment at startup.
#[derive(Clone, Debug)]
pub struct Config {
    pub bind_address: SocketAddr,
    pub llm_base_url: String,
    pub llm_api_key: String,
    pub chat_model: String,
    pub llm_timeout: Duration,
    pub inventory_path: PathBuf,
    pub session_ttl: Duration,
    pub session_sweep_interval: Duration,
    pub log_level: Level,
}

fn seconds_var(name: &str, default: u64) -> Result<Duration, ConfigError> {
    match std::env::var(name) {
        Ok(raw) => {
            let secs = raw
                .parse::<u64>()
                .map_err(|e| ConfigError::InvalidValue(name.to_string(), e.to_string()))?;
            Ok(Duration::from_secs(secs))
        }
        Err(_) => Ok(Duration::from_secs(default)),
    }
}

impl Config {
    /// Loads configuration from environment variables.
    pub fn from_env() -> Result<Self, ConfigError> {
        // Only load from .env in non-test mode to avoid contamination
        if !cfg!(test) {
            dotenvy::dotenv().ok();
        }

        let bind_address_str =
            std::env::var("BIND_ADDRESS").unwrap_or_else(|_| "0.0.0.0:5000".to_string());
        let bind_address = bind_address_str
            .parse::<SocketAddr>()
            .map_err(|e| ConfigError::InvalidValue("BIND_ADDRESS".to_string(), e.to_string()))?;

        let llm_base_url =
            std::env::var("LLM_BASE_URL").unwrap_or_else(|_| DEFAULT_BASE_URL.to_string());
        if !llm_base_url.starts_with("http://") && !llm_base_url.starts_with("https://") {
            return Err(ConfigError::InvalidValue(
                "LLM_BASE_URL".to_string(),
                format!("'{}' is not an http(s) URL", llm_base_url),
            ));
        }

        let llm_api_key = std::env::var("LLM_API_KEY").unwrap_or_else(|_| "ollama".to_string());

        let chat_model = std::env::var("CHAT_MODEL").unwrap_or_else(|_| DEFAULT_MODEL.to_string());
        if chat_model.trim().is_empty() {
            return Err(ConfigError::MissingVar(
                "CHAT_MODEL must not be empty".to_string(),
            ));
        }

        let llm_timeout = seconds_var("LLM_TIMEOUT_SECS", 60)?;

        let inventory_path = std::env::var("INVENTORY_PATH")
            .map(PathBuf::from)
            .unwrap_or_else(|_| PathBuf::from("./books.csv"));

        let session_ttl = seconds_var("SESSION_TTL_SECS", 3600)?;
        let session_sweep_interval = seconds_var("SESSION_SWEEP_SECS", 60)?;
        if session_sweep_interval.is_zero() {
            return Err(ConfigError::InvalidValue(
                "SESSION_SWEEP_SECS".to_string(),
                "must be greater than zero".to_string(),
            ));
        }

        let log_level_str = std::env::var("RUST_LOG").unwrap_or_else(|_| "INFO".to_string());
        let log_level = log_level_str.parse::<Level>().map_err(|_| {
            ConfigError::InvalidValue(
                "RUST_LOG".to_string(),
                format!("'{}' is not a valid log level", log_level_str),
            )
        })?;

        Ok(Self {
            bind_address,
            llm_base_url,
            llm_api_key,
            chat_model,
            llm_timeout,
            inventory_path,
            session_ttl,
            session_sweep_interval,
            log_level,
        })
    }
}
