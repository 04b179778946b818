//! Server configuration parsed from environment variables.
//!
//! DESIGN
//! ======
//! The like store is optional. With no store configured the API answers from
//! a fixed mock shape, which is how local development runs without a
//! provisioned key-value backend.

use std::path::PathBuf;

pub const DEFAULT_PORT: u16 = 3000;
pub const DEFAULT_KV_REQUEST_TIMEOUT_SECS: u64 = 10;

/// Which key-value backend holds like records.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum KvBackend {
    /// No store; the API serves mock responses.
    Disabled,
    /// Process-local map. Counts reset on restart.
    Memory,
    /// Upstash/Vercel-KV compatible REST endpoint.
    Rest { url: String, token: String, timeout_secs: u64 },
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ServerConfig {
    pub port: u16,
    pub kv: KvBackend,
    /// Prebuilt static site served for every non-API path.
    pub website_dir: PathBuf,
}

/// Error returned by [`ServerConfig::from_env`].
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("unsupported LIKES_KV backend '{0}' (expected 'memory' or 'rest')")]
    UnknownBackend(String),
    #[error("LIKES_KV=rest requires {var}")]
    MissingRestVar { var: &'static str },
}

impl ServerConfig {
    /// Build typed config from environment variables.
    ///
    /// Optional:
    /// - `PORT`: default 3000
    /// - `LIKES_KV`: `memory` or `rest`; when unset, `rest` is chosen if both
    ///   REST variables are present and the store is disabled otherwise
    /// - `KV_REST_API_URL`, `KV_REST_API_TOKEN`: REST backend credentials
    /// - `KV_REQUEST_TIMEOUT_SECS`: default 10
    /// - `WEBSITE_DIR`: default `../dist` next to this crate
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError`] for an unknown backend name or an explicit
    /// `rest` backend without credentials.
    pub fn from_env() -> Result<Self, ConfigError> {
        let port = env_parse("PORT", DEFAULT_PORT);
        let kv = parse_backend(
            std::env::var("LIKES_KV").ok().as_deref(),
            non_empty_var("KV_REST_API_URL"),
            non_empty_var("KV_REST_API_TOKEN"),
            env_parse("KV_REQUEST_TIMEOUT_SECS", DEFAULT_KV_REQUEST_TIMEOUT_SECS),
        )?;
        let website_dir = std::env::var("WEBSITE_DIR")
            .map(PathBuf::from)
            .unwrap_or_else(|_| PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("../dist"));

        Ok(Self { port, kv, website_dir })
    }
}

pub(crate) fn parse_backend(
    raw: Option<&str>,
    url: Option<String>,
    token: Option<String>,
    timeout_secs: u64,
) -> Result<KvBackend, ConfigError> {
    match raw.map(|v| v.trim().to_ascii_lowercase()).as_deref() {
        None | Some("") => Ok(match (url, token) {
            (Some(url), Some(token)) => KvBackend::Rest { url: trim_base(&url), token, timeout_secs },
            _ => KvBackend::Disabled,
        }),
        Some("memory") => Ok(KvBackend::Memory),
        Some("rest") => {
            let url = url.ok_or(ConfigError::MissingRestVar { var: "KV_REST_API_URL" })?;
            let token = token.ok_or(ConfigError::MissingRestVar { var: "KV_REST_API_TOKEN" })?;
            Ok(KvBackend::Rest { url: trim_base(&url), token, timeout_secs })
        }
        Some("none" | "off" | "disabled") => Ok(KvBackend::Disabled),
        Some(other) => Err(ConfigError::UnknownBackend(other.to_owned())),
    }
}

fn trim_base(url: &str) -> String {
    url.trim().trim_end_matches('/').to_owned()
}

fn non_empty_var(key: &str) -> Option<String> {
    std::env::var(key).ok().filter(|v| !v.trim().is_empty())
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

#[cfg(test)]
#[path = "config_test.rs"]
mod tests;
