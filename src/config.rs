//! Server configuration parsed from environment variables.
//!
//! SYSTEM CONTEXT
//! ==============
//! `main` loads `.env` (if present) and then builds one [`Config`] before
//! anything else starts. Every knob has a default except the optional
//! integrations, which fall back to demo data when unset.

use std::path::PathBuf;
use std::time::Duration;

pub const DEFAULT_PORT: u16 = 3000;
pub const DEFAULT_SNIPPET_STORE_PATH: &str = "data/snippets.json";
/// `SNIPPET_STORE_PATH` value that selects the in-memory store.
pub const MEMORY_STORE_PATH: &str = ":memory:";
pub const DEFAULT_AUTOSAVE_DEBOUNCE_MS: u64 = 1000;
pub const DEFAULT_PLACES_BASE_URL: &str = "https://maps.googleapis.com/maps/api/place";
pub const DEFAULT_INSTAGRAM_BASE_URL: &str = "https://i.instagram.com/api/v1";
pub const DEFAULT_HTTP_REQUEST_TIMEOUT_SECS: u64 = 15;
pub const DEFAULT_HTTP_CONNECT_TIMEOUT_SECS: u64 = 5;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct HttpTimeouts {
    pub request_secs: u64,
    pub connect_secs: u64,
}

impl HttpTimeouts {
    /// Build a `reqwest` client with these timeouts.
    ///
    /// # Errors
    ///
    /// Returns an error if the TLS backend cannot be initialized.
    pub fn client(self) -> Result<reqwest::Client, reqwest::Error> {
        reqwest::Client::builder()
            .timeout(Duration::from_secs(self.request_secs))
            .connect_timeout(Duration::from_secs(self.connect_secs))
            .build()
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    pub port: u16,
    /// Postgres snippet storage when set; the JSON file store otherwise,
    /// unless `snippet_store_path` is [`MEMORY_STORE_PATH`].
    pub database_url: Option<String>,
    pub snippet_store_path: PathBuf,
    pub autosave_debounce_ms: u64,
    pub places_api_key: Option<String>,
    pub places_base_url: String,
    pub instagram_base_url: String,
    pub http: HttpTimeouts,
}

impl Config {
    /// Build typed config from environment variables.
    ///
    /// - `PORT`: default 3000
    /// - `DATABASE_URL`: optional
    /// - `SNIPPET_STORE_PATH`: default `data/snippets.json`, `:memory:` for no persistence
    /// - `AUTOSAVE_DEBOUNCE_MS`: default 1000
    /// - `GOOGLE_PLACES_API_KEY`: optional
    /// - `PLACES_BASE_URL`, `INSTAGRAM_BASE_URL`: provider defaults
    /// - `HTTP_REQUEST_TIMEOUT_SECS`: default 15
    /// - `HTTP_CONNECT_TIMEOUT_SECS`: default 5
    #[must_use]
    pub fn from_env() -> Self {
        Self {
            port: env_parse("PORT", DEFAULT_PORT),
            database_url: env_opt("DATABASE_URL"),
            snippet_store_path: env_opt("SNIPPET_STORE_PATH")
                .map_or_else(|| PathBuf::from(DEFAULT_SNIPPET_STORE_PATH), PathBuf::from),
            autosave_debounce_ms: env_parse("AUTOSAVE_DEBOUNCE_MS", DEFAULT_AUTOSAVE_DEBOUNCE_MS),
            places_api_key: env_opt("GOOGLE_PLACES_API_KEY"),
            places_base_url: base_url("PLACES_BASE_URL", DEFAULT_PLACES_BASE_URL),
            instagram_base_url: base_url("INSTAGRAM_BASE_URL", DEFAULT_INSTAGRAM_BASE_URL),
            http: HttpTimeouts {
                request_secs: env_parse("HTTP_REQUEST_TIMEOUT_SECS", DEFAULT_HTTP_REQUEST_TIMEOUT_SECS),
                connect_secs: env_parse("HTTP_CONNECT_TIMEOUT_SECS", DEFAULT_HTTP_CONNECT_TIMEOUT_SECS),
            },
        }
    }

    #[must_use]
    pub fn autosave_debounce(&self) -> Duration {
        Duration::from_millis(self.autosave_debounce_ms)
    }
}

pub(crate) fn env_parse<T>(key: &str, default: T) -> T
where
    T: std::str::FromStr + Copy,
{
    std::env::var(key)
        .ok()
        .and_then(|v| v.parse::<T>().ok())
        .unwrap_or(default)
}

/// Non-empty, trimmed value of an environment variable.
fn env_opt(key: &str) -> Option<String> {
    std::env::var(key)
        .ok()
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

fn base_url(key: &str, default: &str) -> String {
    env_opt(key)
        .unwrap_or_else(|| default.to_string())
        .trim_end_matches('/')
        .to_string()
}

#[cfg(test)]
#[path = "config_test.rs"]
mod tests;
