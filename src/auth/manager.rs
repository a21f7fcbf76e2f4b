//! Token manager: cached or fresh bearer tokens for the portal.

use std::sync::Arc;

use reqwest::header::{HeaderMap, HeaderValue, ACCEPT, CONTENT_TYPE, ORIGIN, REFERER, USER_AGENT};
use secrecy::{ExposeSecret, SecretString};
use serde_json::Value;
use tokio::sync::RwLock;

use super::cache::{self, CachedToken};
use super::entities::EntitiesMirror;
use crate::client::{header_value, read_json, ClientConfig, ACCEPT_ANY_JSON, USER_TIMEZONE_HEADER};
use crate::models::{Credentials, Endpoint};
use crate::{Error, Result};

/// Produces valid bearer tokens while keeping live logins to a minimum.
///
/// A token is served from the cache file while its local expiry has not
/// passed. Otherwise the manager logs in, overwrites the cache with the new
/// token and refreshes the FFL list mirror on a best-effort basis.
///
/// `TokenManager` is cheap to clone; clones share the current token.
/// Concurrent callers may each log in; the cache file ends up holding
/// whichever write lands last.
///
/// # Example
///
/// ```no_run
/// use fflbizhub_rs::{ClientConfig, Credentials, TokenManager};
///
/// # async fn example() -> fflbizhub_rs::Result<()> {
/// let manager = TokenManager::new(
///     Credentials::new("clerk@example.com", "hunter2"),
///     ClientConfig::default(),
/// )?;
///
/// let token = manager.token(false).await?;
/// # Ok(())
/// # }
/// ```
#[derive(Clone)]
pub struct TokenManager {
    inner: Arc<TokenManagerInner>,
}

struct TokenManagerInner {
    http: reqwest::Client,
    credentials: Credentials,
    config: ClientConfig,
    auth_url: String,
    entities: EntitiesMirror,
    current: RwLock<Option<SecretString>>,
}

impl TokenManager {
    /// Create a token manager with its own HTTP client.
    ///
    /// # Errors
    ///
    /// Returns an error if the configuration is invalid or the HTTP client
    /// cannot be built.
    pub fn new(credentials: Credentials, config: ClientConfig) -> Result<Self> {
        let http = reqwest::Client::builder().build()?;
        Self::with_http(http, credentials, config)
    }

    /// Create a token manager that shares an existing HTTP client.
    pub fn with_http(
        http: reqwest::Client,
        credentials: Credentials,
        config: ClientConfig,
    ) -> Result<Self> {
        config.validate()?;

        Ok(Self {
            inner: Arc::new(TokenManagerInner {
                auth_url: Endpoint::Auth.url(&config.base_url),
                entities: EntitiesMirror::new(http.clone(), &config),
                http,
                credentials,
                config,
                current: RwLock::new(None),
            }),
        })
    }

    /// Obtain a valid token.
    ///
    /// Unless `force_refresh` is set, a token from the cache file is returned
    /// without any network traffic while it is unexpired. Any problem reading
    /// the cache is treated as a miss.
    ///
    /// After a fresh login the cache file is overwritten and the FFL list
    /// mirror is refreshed; failures of either never fail this call.
    ///
    /// # Errors
    ///
    /// - [`Error::LoginHttp`] if the login endpoint answers with a non-success status
    /// - [`Error::MissingToken`] if the login response has no non-empty `token`
    /// - [`Error::Http`] / [`Error::Json`] for transport or decoding failures
    pub async fn token(&self, force_refresh: bool) -> Result<String> {
        let config = &self.inner.config;

        if !force_refresh {
            match cache::load(&config.token_cache, cache::now()).await {
                Ok(cached) => {
                    tracing::debug!(expires_at = %cached.expires_at, "using cached token");
                    self.set_current(&cached.token).await;
                    return Ok(cached.token);
                }
                Err(err) => tracing::debug!(error = %err, "token cache miss"),
            }
        }

        let token = self.login().await?;
        tracing::info!(email = %self.inner.credentials.email(), "logged in");

        let cached = CachedToken::issue(token.clone(), cache::now(), config.token_ttl);
        if let Err(err) = cache::store(&config.token_cache, &cached).await {
            tracing::warn!(
                error = %err,
                path = %config.token_cache.display(),
                "could not write token cache"
            );
        }

        self.inner.entities.sync(&token).await;

        self.set_current(&token).await;
        Ok(token)
    }

    /// The token most recently returned by [`token`](Self::token), if any.
    pub async fn current_token(&self) -> Option<String> {
        self.inner
            .current
            .read()
            .await
            .as_ref()
            .map(|t| t.expose_secret().to_string())
    }

    /// Fetch the FFL list now and overwrite the mirror file.
    ///
    /// Unlike the refresh performed after login, errors are returned.
    pub async fn refresh_entities(&self) -> Result<Value> {
        let token = match self.current_token().await {
            Some(token) => token,
            None => self.token(false).await?,
        };
        self.inner.entities.refresh(&token).await
    }

    /// Read the FFL list mirror file, `None` if it does not exist yet.
    pub async fn cached_entities(&self) -> Result<Option<Value>> {
        self.inner.entities.load().await
    }

    /// The configuration this manager was built with.
    pub fn config(&self) -> &ClientConfig {
        &self.inner.config
    }

    pub(crate) fn http(&self) -> &reqwest::Client {
        &self.inner.http
    }

    async fn set_current(&self, token: &str) {
        *self.inner.current.write().await = Some(SecretString::from(token.to_string()));
    }

    async fn login(&self) -> Result<String> {
        let inner = &self.inner;
        let base_url = &inner.config.base_url;

        let mut headers = HeaderMap::new();
        headers.insert(USER_AGENT, header_value(&inner.config.user_agent)?);
        headers.insert(ACCEPT, HeaderValue::from_static(ACCEPT_ANY_JSON));
        headers.insert(
            CONTENT_TYPE,
            HeaderValue::from_static("application/json;charset=utf-8"),
        );
        headers.insert(USER_TIMEZONE_HEADER, header_value(&inner.config.user_timezone)?);
        headers.insert(ORIGIN, header_value(base_url)?);
        headers.insert(REFERER, header_value(&format!("{base_url}/portal/login"))?);

        let response = inner
            .http
            .post(&inner.auth_url)
            .headers(headers)
            .json(&serde_json::json!({
                "email": inner.credentials.email(),
                "password": inner.credentials.password(),
            }))
            .timeout(inner.config.auth_timeout)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            return Err(Error::LoginHttp {
                status: status.as_u16(),
            });
        }

        let data = read_json(response).await?;
        data.get("token")
            .and_then(Value::as_str)
            .filter(|token| !token.is_empty())
            .map(str::to_string)
            .ok_or(Error::MissingToken)
    }
}

impl std::fmt::Debug for TokenManager {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TokenManager")
            .field("credentials", &self.inner.credentials)
            .field("config", &self.inner.config)
            .field("current", &"[REDACTED]")
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_debug_redacts_secrets() {
        let manager = TokenManager::new(
            Credentials::new("clerk@example.com", "super-secret-password"),
            ClientConfig::default(),
        )
        .unwrap();
        manager.set_current("super-secret-token").await;

        let debug_str = format!("{:?}", manager);
        assert!(!debug_str.contains("super-secret-password"));
        assert!(!debug_str.contains("super-secret-token"));
        assert_eq!(
            manager.current_token().await.as_deref(),
            Some("super-secret-token")
        );
    }

    #[test]
    fn test_rejects_invalid_base_url() {
        let result = TokenManager::new(
            Credentials::new("a@b.c", "pw"),
            ClientConfig::default().with_base_url("::not a url::"),
        );
        assert!(result.is_err());
    }
}
