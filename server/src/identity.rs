//! Requester identity for per-user like caps.
//!
//! DESIGN
//! ======
//! The network address is resolved from proxy headers and reduced to a
//! SHA-256 digest before it touches the store, so records never hold a raw
//! address.

use std::fmt::Write;

use axum::http::HeaderMap;
use sha2::{Digest, Sha256};

/// Address used when no proxy header names the caller (local development).
pub const LOOPBACK_PLACEHOLDER: &str = "127.0.0.1";

/// Platform headers carrying the real client address, in priority order.
const REAL_IP_HEADERS: [&str; 2] = ["cf-connecting-ip", "x-real-ip"];
const FORWARDED_FOR_HEADER: &str = "x-forwarded-for";

/// One-way digest of a caller's network address.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct IdentityHash(String);

impl IdentityHash {
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

pub(crate) fn bytes_to_hex(bytes: &[u8]) -> String {
    let mut s = String::with_capacity(bytes.len() * 2);
    for b in bytes {
        let _ = write!(s, "{b:02x}");
    }
    s
}

/// Resolve the caller's address: platform real-IP header, then the first
/// `X-Forwarded-For` entry, then [`LOOPBACK_PLACEHOLDER`].
#[must_use]
pub fn client_ip(headers: &HeaderMap) -> String {
    for name in REAL_IP_HEADERS {
        if let Some(value) = header_str(headers, name) {
            return value.to_owned();
        }
    }

    if let Some(first) = header_str(headers, FORWARDED_FOR_HEADER)
        .and_then(|v| v.split(',').next())
        .map(str::trim)
        .filter(|v| !v.is_empty())
    {
        return first.to_owned();
    }

    LOOPBACK_PLACEHOLDER.to_owned()
}

/// Hash an address into its stored identity.
#[must_use]
pub fn hash_identity(ip: &str) -> IdentityHash {
    let mut hasher = Sha256::new();
    hasher.update(ip.as_bytes());
    IdentityHash(bytes_to_hex(&hasher.finalize()))
}

/// [`client_ip`] followed by [`hash_identity`].
#[must_use]
pub fn identity_from_headers(headers: &HeaderMap) -> IdentityHash {
    hash_identity(&client_ip(headers))
}

fn header_str<'a>(headers: &'a HeaderMap, name: &str) -> Option<&'a str> {
    headers
        .get(name)
        .and_then(|v| v.to_str().ok())
        .map(str::trim)
        .filter(|v| !v.is_empty())
}

#[cfg(test)]
#[path = "identity_test.rs"]
mod tests;
