//! REST key-value client (Upstash / Vercel KV wire shape).
//!
//! `GET {base}/get/{key}` answers `{"result": <string|null>}`;
//! `POST {base}/set/{key}` takes the raw value as the request body and
//! answers `{"result": "OK"}`. Both use bearer-token auth.

use std::time::Duration;

use serde::Deserialize;

use super::{KvError, KvStore};

const CONNECT_TIMEOUT_SECS: u64 = 5;

pub struct RestKv {
    http: reqwest::Client,
    base_url: String,
    token: String,
}

#[derive(Debug, Deserialize)]
struct RestResponse {
    #[serde(default)]
    result: Option<serde_json::Value>,
    #[serde(default)]
    error: Option<String>,
}

impl RestKv {
    /// Build a client for the store at `base_url`.
    ///
    /// # Errors
    ///
    /// Returns [`KvError::ClientBuild`] if the HTTP client cannot be created.
    pub fn new(base_url: &str, token: String, timeout_secs: u64) -> Result<Self, KvError> {
        let http = reqwest::Client::builder()
            .timeout(Duration::from_secs(timeout_secs))
            .connect_timeout(Duration::from_secs(CONNECT_TIMEOUT_SECS))
            .build()
            .map_err(|e| KvError::ClientBuild(e.to_string()))?;
        Ok(Self { http, base_url: base_url.trim_end_matches('/').to_owned(), token })
    }

    async fn send(&self, request: reqwest::RequestBuilder) -> Result<String, KvError> {
        let response = request
            .bearer_auth(&self.token)
            .send()
            .await
            .map_err(|e| KvError::Request(e.to_string()))?;

        let status = response.status().as_u16();
        let text = response
            .text()
            .await
            .map_err(|e| KvError::Request(e.to_string()))?;
        if !(200..300).contains(&status) {
            return Err(KvError::Status { status, body: text });
        }
        Ok(text)
    }
}

/// `{base}/{command}/{key}` with the key percent-encoded as one path segment.
pub(crate) fn command_url(base_url: &str, command: &str, key: &str) -> Result<reqwest::Url, KvError> {
    let mut url = reqwest::Url::parse(base_url).map_err(|e| KvError::Request(format!("invalid kv url: {e}")))?;
    url.path_segments_mut()
        .map_err(|()| KvError::Request("kv url cannot be a base".into()))?
        .pop_if_empty()
        .push(command)
        .push(key);
    Ok(url)
}

/// Decode a `GET` response body into the stored value.
pub(crate) fn parse_get_response(text: &str) -> Result<Option<String>, KvError> {
    let parsed: RestResponse = serde_json::from_str(text).map_err(|e| KvError::Decode(e.to_string()))?;
    if let Some(error) = parsed.error {
        return Err(KvError::Decode(error));
    }
    match parsed.result {
        None | Some(serde_json::Value::Null) => Ok(None),
        Some(serde_json::Value::String(s)) => Ok(Some(s)),
        // Some deployments hand back already-decoded JSON; re-serialize it.
        Some(other) => Ok(Some(other.to_string())),
    }
}

/// Decode a `SET` response body; anything but an acknowledgement is an error.
pub(crate) fn parse_set_response(text: &str) -> Result<(), KvError> {
    let parsed: RestResponse = serde_json::from_str(text).map_err(|e| KvError::Decode(e.to_string()))?;
    if let Some(error) = parsed.error {
        return Err(KvError::Decode(error));
    }
    match parsed.result {
        Some(serde_json::Value::String(ref s)) if s.eq_ignore_ascii_case("ok") => Ok(()),
        other => Err(KvError::Decode(format!("unexpected set result: {other:?}"))),
    }
}

#[async_trait::async_trait]
impl KvStore for RestKv {
    async fn get(&self, key: &str) -> Result<Option<String>, KvError> {
        let url = command_url(&self.base_url, "get", key)?;
        let text = self.send(self.http.get(url)).await?;
        parse_get_response(&text)
    }

    async fn put(&self, key: &str, value: String) -> Result<(), KvError> {
        let url = command_url(&self.base_url, "set", key)?;
        let text = self.send(self.http.post(url).body(value)).await?;
        parse_set_response(&text)
    }
}

#[cfg(test)]
#[path = "rest_test.rs"]
mod tests;
