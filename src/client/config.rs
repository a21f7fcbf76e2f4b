//! Client configuration options.

use std::path::PathBuf;
use std::time::Duration;

use crate::models::DEFAULT_BASE_URL;
use crate::{Error, Result};

/// Default token cache file, relative to the working directory.
pub const DEFAULT_TOKEN_CACHE: &str = "ffl_token.json";
/// Default associated-FFLs mirror file, relative to the working directory.
pub const DEFAULT_ENTITIES_CACHE: &str = "ffl_books.json";

/// Configuration for the FFLBizHub client.
///
/// The default token TTL is 6 days 12 hours, a margin under the portal's
/// roughly one-week token lifetime.
///
/// # Example
///
/// ```
/// use fflbizhub_rs::ClientConfig;
/// use std::time::Duration;
///
/// let config = ClientConfig::default()
///     .with_token_cache("/tmp/ffl_token.json")
///     .with_token_ttl(chrono::Duration::hours(12))
///     .with_search_timeout(Duration::from_secs(120));
/// ```
#[derive(Debug, Clone)]
pub struct ClientConfig {
    /// Portal base URL, without trailing slash
    pub base_url: String,
    /// Token cache file
    pub token_cache: PathBuf,
    /// Associated-FFLs mirror file
    pub entities_cache: PathBuf,
    /// Locally assumed token lifetime
    pub token_ttl: chrono::Duration,
    /// Timeout for login and FFL list requests
    pub auth_timeout: Duration,
    /// Timeout for each search page request
    pub search_timeout: Duration,
    /// User-Agent header value
    pub user_agent: String,
    /// Value of the portal's `userTimezone` header
    pub user_timezone: String,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            token_cache: PathBuf::from(DEFAULT_TOKEN_CACHE),
            entities_cache: PathBuf::from(DEFAULT_ENTITIES_CACHE),
            token_ttl: chrono::Duration::days(6) + chrono::Duration::hours(12),
            auth_timeout: Duration::from_secs(30),
            search_timeout: Duration::from_secs(60),
            user_agent: "Mozilla/5.0".to_string(),
            user_timezone: "Central Daylight Time".to_string(),
        }
    }
}

impl ClientConfig {
    /// Create a new configuration with default values.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the portal base URL. A trailing slash is dropped.
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into().trim_end_matches('/').to_string();
        self
    }

    /// Set the token cache file.
    pub fn with_token_cache(mut self, path: impl Into<PathBuf>) -> Self {
        self.token_cache = path.into();
        self
    }

    /// Set the associated-FFLs mirror file.
    pub fn with_entities_cache(mut self, path: impl Into<PathBuf>) -> Self {
        self.entities_cache = path.into();
        self
    }

    /// Set the locally assumed token lifetime.
    pub fn with_token_ttl(mut self, ttl: chrono::Duration) -> Self {
        self.token_ttl = ttl;
        self
    }

    /// Set the timeout for login and FFL list requests.
    pub fn with_auth_timeout(mut self, timeout: Duration) -> Self {
        self.auth_timeout = timeout;
        self
    }

    /// Set the timeout for each search page request.
    pub fn with_search_timeout(mut self, timeout: Duration) -> Self {
        self.search_timeout = timeout;
        self
    }

    /// Set the User-Agent header.
    pub fn with_user_agent(mut self, user_agent: impl Into<String>) -> Self {
        self.user_agent = user_agent.into();
        self
    }

    /// Set the `userTimezone` header.
    pub fn with_user_timezone(mut self, timezone: impl Into<String>) -> Self {
        self.user_timezone = timezone.into();
        self
    }

    /// Check the configuration before use.
    ///
    /// # Errors
    ///
    /// Returns [`Error::UrlParse`] for an unparsable base URL and
    /// [`Error::Config`] for a non-positive TTL.
    pub fn validate(&self) -> Result<()> {
        url::Url::parse(&self.base_url)?;
        if self.token_ttl <= chrono::Duration::zero() {
            return Err(Error::Config("token TTL must be positive".to_string()));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = ClientConfig::default();
        assert_eq!(config.base_url, "https://app.fflbizhub.com");
        assert_eq!(config.token_cache, PathBuf::from("ffl_token.json"));
        assert_eq!(config.entities_cache, PathBuf::from("ffl_books.json"));
        assert_eq!(config.token_ttl, chrono::Duration::hours(156));
        assert_eq!(config.auth_timeout, Duration::from_secs(30));
        assert_eq!(config.search_timeout, Duration::from_secs(60));
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_base_url_trailing_slash() {
        let config = ClientConfig::new().with_base_url("http://127.0.0.1:9000/");
        assert_eq!(config.base_url, "http://127.0.0.1:9000");
    }

    #[test]
    fn test_validate_rejects_bad_values() {
        assert!(ClientConfig::new().with_base_url("not a url").validate().is_err());
        assert!(ClientConfig::new()
            .with_token_ttl(chrono::Duration::zero())
            .validate()
            .is_err());
    }
}
