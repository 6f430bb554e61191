use anyhow::{anyhow, Context, Result};
use std::time::Duration;

use crate::form::tier::StyleVariant;

pub const DEFAULT_MATCH_API_BASE_URL: &str = "http://localhost:5000";

/// Application configuration loaded from environment variables.
/// Resolved once at startup and passed down explicitly.
#[derive(Debug, Clone)]
pub struct Config {
    /// Base of the external matching service; `/api/match` is appended verbatim.
    pub match_api_base_url: String,
    pub port: u16,
    pub rust_log: String,
    pub form_style: StyleVariant,
    pub session_ttl: Duration,
    /// Upper bound on live sessions; the least recently seen is evicted.
    pub max_sessions: usize,
    /// None means upstream requests never time out.
    pub upstream_timeout: Option<Duration>,
}

impl Config {
    pub fn from_env() -> Result<Self> {
        dotenvy::dotenv().ok(); // load .env if present; ignore if missing

        Ok(Config {
            match_api_base_url: std::env::var("MATCH_API_BASE_URL")
                .unwrap_or_else(|_| DEFAULT_MATCH_API_BASE_URL.to_string()),
            port: std::env::var("PORT")
                .unwrap_or_else(|_| "8080".to_string())
                .parse::<u16>()
                .context("PORT must be a valid port number")?,
            rust_log: std::env::var("RUST_LOG").unwrap_or_else(|_| "info".to_string()),
            form_style: match std::env::var("FORM_STYLE") {
                Ok(s) => s.parse::<StyleVariant>().map_err(|e| anyhow!(e))?,
                Err(_) => StyleVariant::default(),
            },
            session_ttl: Duration::from_secs(
                std::env::var("SESSION_TTL_SECS")
                    .unwrap_or_else(|_| "1800".to_string())
                    .parse::<u64>()
                    .context("SESSION_TTL_SECS must be a whole number of seconds")?,
            ),
            max_sessions: std::env::var("MAX_SESSIONS")
                .unwrap_or_else(|_| "10000".to_string())
                .parse::<usize>()
                .context("MAX_SESSIONS must be a whole number")?,
            upstream_timeout: optional_secs("UPSTREAM_TIMEOUT_SECS")?,
        })
    }
}

fn optional_secs(key: &str) -> Result<Option<Duration>> {
    match std::env::var(key) {
        Ok(raw) => {
            let secs = raw
                .parse::<u64>()
                .with_context(|| format!("{key} must be a whole number of seconds"))?;
            Ok(Some(Duration::from_secs(secs)))
        }
        Err(_) => Ok(None),
    }
}

#[cfg(test)]
impl Config {
    pub fn for_tests(match_api_base_url: String) -> Self {
        Config {
            match_api_base_url,
            port: 0,
            rust_log: "debug".to_string(),
            form_style: StyleVariant::Vivid,
            session_ttl: Duration::from_secs(1800),
            max_sessions: 100,
            upstream_timeout: None,
        }
    }
}
