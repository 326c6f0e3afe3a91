use std::time::Duration;

use thiserror::Error;

const DEFAULT_BASE_URL: &str = "http://127.0.0.1:8000/api";
const DEFAULT_TIMEOUT_SECS: u64 = 15;
const DEFAULT_USER_AGENT: &str = "ticket-scout/0.1";
const DEFAULT_CITY: &str = "istanbul";
const DEFAULT_LOG_LEVEL: &str = "info";
const LOG_LEVELS: [&str; 5] = ["trace", "debug", "info", "warn", "error"];

#[derive(Debug, Error, PartialEq)]
pub enum ConfigError {
    #[error("invalid base url {0:?}: {1}")]
    BaseUrl(String, String),
    #[error("invalid timeout {0:?}")]
    Timeout(String),
    #[error("invalid log level {0:?}, expected trace|debug|info|warn|error")]
    LogLevel(String),
}

#[derive(Debug, Clone, PartialEq)]
pub struct ApiConfig {
    pub base_url: reqwest::Url,
    pub timeout_secs: u64,
    pub user_agent: String,
    pub default_city: String,
    pub log_level: String,
}

impl ApiConfig {
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Builds the config from any key lookup; unset keys take their defaults.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let base_url =
            lookup("TICKET_API_BASE_URL").unwrap_or_else(|| DEFAULT_BASE_URL.to_string());
        let base_url = parse_base_url(&base_url)?;

        let timeout_secs = match lookup("TICKET_API_TIMEOUT_SECS") {
            Some(raw) => raw
                .trim()
                .parse::<u64>()
                .ok()
                .filter(|secs| *secs > 0)
                .ok_or(ConfigError::Timeout(raw))?,
            None => DEFAULT_TIMEOUT_SECS,
        };

        let user_agent =
            lookup("TICKET_API_USER_AGENT").unwrap_or_else(|| DEFAULT_USER_AGENT.to_string());
        let default_city =
            lookup("TICKET_DEFAULT_CITY").unwrap_or_else(|| DEFAULT_CITY.to_string());

        let log_level = lookup("TICKET_LOG_LEVEL")
            .unwrap_or_else(|| DEFAULT_LOG_LEVEL.to_string())
            .to_lowercase();
        if !LOG_LEVELS.contains(&log_level.as_str()) {
            return Err(ConfigError::LogLevel(log_level));
        }

        Ok(Self {
            base_url,
            timeout_secs,
            user_agent,
            default_city,
            log_level,
        })
    }

    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self::from_lookup(|_| None).expect("defaults are valid")
    }
}

// Url::join drops the last path segment unless the base ends with '/'.
fn parse_base_url(raw: &str) -> Result<reqwest::Url, ConfigError> {
    let trimmed = raw.trim();
    let normalized = if trimmed.ends_with('/') {
        trimmed.to_string()
    } else {
        format!("{trimmed}/")
    };
    reqwest::Url::parse(&normalized)
        .map_err(|err| ConfigError::BaseUrl(raw.to_string(), err.to_string()))
}
