//! HTTP client implementation for the FFLBizHub portal.

use reqwest::header::{
    HeaderMap, HeaderName, HeaderValue, ACCEPT, CONTENT_TYPE, ORIGIN, REFERER, USER_AGENT,
};
use serde_json::Value;
use std::sync::Arc;

use crate::api::SearchService;
use crate::auth::TokenManager;
use crate::models::Credentials;
use crate::{Error, Result};

use super::config::ClientConfig;

/// `Accept` value the portal's web front end sends.
pub(crate) const ACCEPT_ANY_JSON: &str = "application/json, text/plain, */*";
/// Header carrying the token on authenticated calls.
pub(crate) const AUTH_TOKEN_HEADER: &str = "x-auth-token";
/// Header naming the user's timezone; required by the portal.
pub(crate) const USER_TIMEZONE_HEADER: &str = "usertimezone";

/// The main client for the FFLBizHub portal.
///
/// The client owns one connection pool shared by the token manager and the
/// search service.
///
/// # Example
///
/// ```no_run
/// use fflbizhub_rs::{ClientConfig, Credentials, FflBizHubClient};
/// use futures_util::TryStreamExt;
///
/// # async fn example() -> fflbizhub_rs::Result<()> {
/// let client = FflBizHubClient::new(
///     Credentials::new("clerk@example.com", "hunter2"),
///     ClientConfig::default(),
/// )?;
///
/// let body = serde_json::json!({
///     "pagingParams": {"take": 100, "skip": 0},
///     "filter": {"isOpen": true}
/// });
///
/// let mut pages = client.search().stream(&body).await?;
/// while let Some(rows) = pages.try_next().await? {
///     println!("{} rows", rows.len());
/// }
/// # Ok(())
/// # }
/// ```
pub struct FflBizHubClient {
    pub(crate) inner: Arc<ClientInner>,
}

pub(crate) struct ClientInner {
    pub(crate) tokens: TokenManager,
    pub(crate) config: ClientConfig,
}

impl FflBizHubClient {
    /// Create a client. No request is made until a token is needed.
    pub fn new(credentials: Credentials, config: ClientConfig) -> Result<Self> {
        let http = reqwest::Client::builder().build()?;
        let tokens = TokenManager::with_http(http, credentials, config.clone())?;

        Ok(Self {
            inner: Arc::new(ClientInner { tokens, config }),
        })
    }

    /// Create a client and make sure a valid token is available.
    pub async fn login(credentials: Credentials, config: ClientConfig) -> Result<Self> {
        let client = Self::new(credentials, config)?;
        client.token(false).await?;
        Ok(client)
    }

    /// Create a client from `FFL_EMAIL` / `FFL_PASSWORD` and the default configuration.
    pub fn from_env() -> Result<Self> {
        Self::new(Credentials::from_env()?, ClientConfig::default())
    }

    /// Obtain a valid token. See [`TokenManager::token`].
    pub async fn token(&self, force_refresh: bool) -> Result<String> {
        self.inner.tokens.token(force_refresh).await
    }

    /// Headers for an authenticated portal call, obtaining a token if needed.
    pub async fn auth_headers(&self) -> Result<HeaderMap> {
        self.inner.auth_headers().await
    }

    /// Get the token manager.
    pub fn tokens(&self) -> &TokenManager {
        &self.inner.tokens
    }

    /// Get the ad search service.
    pub fn search(&self) -> SearchService {
        SearchService::new(self.inner.clone())
    }

    /// Get the client configuration.
    pub fn config(&self) -> &ClientConfig {
        &self.inner.config
    }
}

impl ClientInner {
    pub(crate) fn http(&self) -> &reqwest::Client {
        self.tokens.http()
    }

    pub(crate) async fn auth_headers(&self) -> Result<HeaderMap> {
        let token = self.tokens.token(false).await?;
        let base_url = &self.config.base_url;

        let mut headers = HeaderMap::new();
        headers.insert(USER_AGENT, header_value(&self.config.user_agent)?);
        headers.insert(ACCEPT, HeaderValue::from_static(ACCEPT_ANY_JSON));
        headers.insert(
            CONTENT_TYPE,
            HeaderValue::from_static("application/json;charset=utf-8"),
        );
        headers.insert(AUTH_TOKEN_HEADER, header_value(&token)?);
        headers.insert(USER_TIMEZONE_HEADER, header_value(&self.config.user_timezone)?);
        headers.insert(ORIGIN, header_value(base_url)?);
        headers.insert(
            REFERER,
            header_value(&format!("{base_url}/portal/ead/openassignments"))?,
        );
        Ok(headers)
    }
}

/// Build a header map from string pairs.
///
/// # Errors
///
/// Returns [`Error::InvalidInput`] if a name or value is not a valid header.
pub fn header_map<I, K, V>(pairs: I) -> Result<HeaderMap>
where
    I: IntoIterator<Item = (K, V)>,
    K: AsRef<str>,
    V: AsRef<str>,
{
    let mut headers = HeaderMap::new();
    for (name, value) in pairs {
        let name = HeaderName::from_bytes(name.as_ref().as_bytes()).map_err(|_| {
            Error::InvalidInput(format!("invalid header name: {}", name.as_ref()))
        })?;
        headers.insert(name, header_value(value.as_ref())?);
    }
    Ok(headers)
}

pub(crate) fn header_value(value: &str) -> Result<HeaderValue> {
    // the value may be a token, keep it out of the message
    HeaderValue::from_str(value)
        .map_err(|_| Error::InvalidInput("header value contains invalid characters".to_string()))
}

/// Decode a JSON response body, whatever content type the server declared.
pub(crate) async fn read_json(response: reqwest::Response) -> Result<Value> {
    let declared_json = response
        .headers()
        .get(CONTENT_TYPE)
        .and_then(|v| v.to_str().ok())
        .is_some_and(|ct| ct.starts_with("application/json"));

    if declared_json {
        Ok(response.json().await?)
    } else {
        let text = response.text().await?;
        Ok(serde_json::from_str(&text)?)
    }
}

impl Clone for FflBizHubClient {
    fn clone(&self) -> Self {
        Self {
            inner: self.inner.clone(),
        }
    }
}

impl std::fmt::Debug for FflBizHubClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FflBizHubClient")
            .field("config", &self.inner.config)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_header_map_from_pairs() {
        let headers = header_map([("X-Auth-Token", "abc"), ("userTimezone", "UTC")]).unwrap();
        assert_eq!(headers.get("x-auth-token").unwrap(), "abc");
        assert_eq!(headers.get(USER_TIMEZONE_HEADER).unwrap(), "UTC");
    }

    #[test]
    fn test_header_map_rejects_bad_names() {
        assert!(header_map([("bad header", "x")]).is_err());
        assert!(header_map([("x-ok", "line\nbreak")]).is_err());
    }
}
