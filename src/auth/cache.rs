//! On-disk token cache.
//!
//! The cache file holds a single JSON document:
//!
//! ```json
//! {"token": "eyJ...", "expires_at": "2026-10-22T18:04:11"}
//! ```
//!
//! `expires_at` is a naive UTC timestamp without offset, written and compared
//! with the same clock. It is a local estimate (login time plus TTL), not
//! derived from the token itself.

use std::path::Path;

use chrono::{NaiveDateTime, SubsecRound, Utc};
use serde::{Deserialize, Serialize};

use crate::{Error, Result};

/// Timestamp layout of `expires_at`.
pub const EXPIRY_FORMAT: &str = "%Y-%m-%dT%H:%M:%S";

/// A token together with its locally estimated expiry.
#[derive(Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CachedToken {
    /// The bearer token
    pub token: String,
    /// When the token stops being used from cache
    #[serde(with = "expiry_format")]
    pub expires_at: NaiveDateTime,
}

impl CachedToken {
    /// Build a cache entry for a token obtained at `now`.
    pub fn issue(token: impl Into<String>, now: NaiveDateTime, ttl: chrono::Duration) -> Self {
        Self {
            token: token.into(),
            expires_at: (now + ttl).trunc_subsecs(0),
        }
    }

    /// A cached token is usable only strictly before its expiry.
    pub fn is_valid_at(&self, now: NaiveDateTime) -> bool {
        !self.token.is_empty() && now < self.expires_at
    }
}

impl std::fmt::Debug for CachedToken {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CachedToken")
            .field("token", &"[REDACTED]")
            .field("expires_at", &self.expires_at)
            .finish()
    }
}

/// The clock used for cache expiry.
pub(crate) fn now() -> NaiveDateTime {
    Utc::now().naive_utc()
}

/// Load a token that is still valid at `now`.
///
/// Every failure (missing file, bad JSON, missing or unparsable expiry,
/// expired entry) is reported as [`Error::CacheRead`].
pub(crate) async fn load(path: &Path, now: NaiveDateTime) -> Result<CachedToken> {
    let raw = tokio::fs::read(path)
        .await
        .map_err(|e| Error::CacheRead(format!("{}: {e}", path.display())))?;
    let cached: CachedToken =
        serde_json::from_slice(&raw).map_err(|e| Error::CacheRead(e.to_string()))?;

    if !cached.is_valid_at(now) {
        return Err(Error::CacheRead(format!(
            "token expired at {}",
            cached.expires_at.format(EXPIRY_FORMAT)
        )));
    }
    Ok(cached)
}

/// Overwrite the cache file with `cached`.
pub(crate) async fn store(path: &Path, cached: &CachedToken) -> Result<()> {
    let body = serde_json::to_vec(cached)?;
    tokio::fs::write(path, body).await?;
    Ok(())
}

mod expiry_format {
    use chrono::NaiveDateTime;
    use serde::{Deserialize, Deserializer, Serializer};

    use super::EXPIRY_FORMAT;

    pub fn serialize<S: Serializer>(value: &NaiveDateTime, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&value.format(EXPIRY_FORMAT).to_string())
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<NaiveDateTime, D::Error> {
        let raw = String::deserialize(deserializer)?;
        NaiveDateTime::parse_from_str(&raw, EXPIRY_FORMAT).map_err(serde::de::Error::custom)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;

    fn at(s: &str) -> NaiveDateTime {
        NaiveDateTime::parse_from_str(s, EXPIRY_FORMAT).unwrap()
    }

    #[test]
    fn test_serialized_layout() {
        let cached = CachedToken::issue("abc", at("2026-10-16T08:00:00"), Duration::days(6) + Duration::hours(12));
        let json = serde_json::to_value(&cached).unwrap();
        assert_eq!(json["token"], "abc");
        assert_eq!(json["expires_at"], "2026-10-22T20:00:00");
    }

    #[test]
    fn test_validity_is_strict() {
        let cached = CachedToken::issue("abc", at("2026-10-16T08:00:00"), Duration::hours(1));
        assert!(cached.is_valid_at(at("2026-10-16T08:59:59")));
        assert!(!cached.is_valid_at(at("2026-10-16T09:00:00")));
        assert!(!CachedToken::issue("", at("2026-10-16T08:00:00"), Duration::hours(1))
            .is_valid_at(at("2026-10-16T08:00:00")));
    }

    #[test]
    fn test_debug_redacts_token() {
        let cached = CachedToken::issue("super-secret-token", now(), Duration::hours(1));
        assert!(!format!("{cached:?}").contains("super-secret-token"));
    }

    #[tokio::test]
    async fn test_store_then_load() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("token.json");
        let cached = CachedToken::issue("abc", now(), Duration::hours(1));

        store(&path, &cached).await.unwrap();
        let loaded = load(&path, now()).await.unwrap();
        assert_eq!(loaded, cached);
    }

    #[tokio::test]
    async fn test_load_failures_are_cache_read_errors() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("token.json");

        // missing file
        assert!(matches!(load(&path, now()).await, Err(Error::CacheRead(_))));

        for body in [
            "not json",
            r#"{"token": "abc"}"#,
            r#"{"token": "abc", "expires_at": 12}"#,
            r#"{"token": "abc", "expires_at": "next tuesday"}"#,
            r#"{"token": "abc", "expires_at": "2000-01-01T00:00:00"}"#,
        ] {
            std::fs::write(&path, body).unwrap();
            assert!(
                matches!(load(&path, now()).await, Err(Error::CacheRead(_))),
                "{body}"
            );
        }
    }
}
