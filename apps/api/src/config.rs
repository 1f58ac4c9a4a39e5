use std::time::Duration;

use anyhow::{Context, Result};

pub const DEFAULT_AFFINDA_API_URL: &str = "https://api.affinda.com/v2/resumes";
const DEFAULT_TIMEOUT_SECS: u64 = 120;
const DEFAULT_MAX_UPLOAD_BYTES: usize = 10 * 1024 * 1024;
const DEFAULT_SESSION_TTL_SECS: u64 = 30 * 60;

/// Application configuration loaded from environment variables.
/// Fails at startup if a numeric variable is present but malformed.
#[derive(Debug, Clone)]
pub struct Config {
    /// Bearer token for the parsing API. Not validated: an empty key is sent
    /// as-is and rejected upstream.
    pub affinda_api_key: String,
    pub affinda_api_url: String,
    pub affinda_timeout: Duration,
    pub max_upload_bytes: usize,
    /// How long an idle upload session keeps its controller.
    pub session_ttl: Duration,
    pub port: u16,
    pub rust_log: String,
}

impl Config {
    pub fn from_env() -> Result<Self> {
        dotenvy::dotenv().ok(); // load .env if present; ignore if missing

        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Builds the config from an arbitrary key lookup.
    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let timeout_secs = parse_or(&lookup, "AFFINDA_TIMEOUT_SECS", DEFAULT_TIMEOUT_SECS)?;
        let session_ttl_secs =
            parse_or(&lookup, "UPLOAD_SESSION_TTL_SECS", DEFAULT_SESSION_TTL_SECS)?;

        Ok(Config {
            affinda_api_key: lookup("AFFINDA_API_KEY").unwrap_or_default(),
            affinda_api_url: lookup("AFFINDA_API_URL")
                .unwrap_or_else(|| DEFAULT_AFFINDA_API_URL.to_string()),
            affinda_timeout: Duration::from_secs(timeout_secs),
            max_upload_bytes: parse_or(&lookup, "MAX_UPLOAD_BYTES", DEFAULT_MAX_UPLOAD_BYTES)?,
            session_ttl: Duration::from_secs(session_ttl_secs),
            port: parse_or(&lookup, "PORT", 8080)?,
            rust_log: lookup("RUST_LOG").unwrap_or_else(|| "info".to_string()),
        })
    }
}

fn parse_or<F, T>(lookup: &F, key: &str, default: T) -> Result<T>
where
    F: Fn(&str) -> Option<String>,
    T: std::str::FromStr,
    T::Err: std::error::Error + Send + Sync + 'static,
{
    match lookup(key) {
        Some(raw) => raw
            .trim()
            .parse::<T>()
            .with_context(|| format!("{key} must be a valid number, got '{raw}'")),
        None => Ok(default),
    }
}
