//! Local mirror of the FFL books associated with the account.

use std::path::PathBuf;
use std::time::Duration;

use reqwest::header::{HeaderMap, HeaderValue, ACCEPT, REFERER, USER_AGENT};
use serde_json::Value;

use crate::client::{header_value, read_json, ClientConfig, ACCEPT_ANY_JSON, AUTH_TOKEN_HEADER, USER_TIMEZONE_HEADER};
use crate::models::Endpoint;
use crate::{Error, Result};

/// Fetches the account's FFL list and writes it, pretty-printed, to a file.
#[derive(Debug, Clone)]
pub(crate) struct EntitiesMirror {
    http: reqwest::Client,
    url: String,
    referer: String,
    path: PathBuf,
    timeout: Duration,
    user_agent: String,
    user_timezone: String,
}

impl EntitiesMirror {
    pub(crate) fn new(http: reqwest::Client, config: &ClientConfig) -> Self {
        Self {
            http,
            url: Endpoint::UserFfls.url(&config.base_url),
            referer: format!("{}/portal/ead/openassignments", config.base_url),
            path: config.entities_cache.clone(),
            timeout: config.auth_timeout,
            user_agent: config.user_agent.clone(),
            user_timezone: config.user_timezone.clone(),
        }
    }

    /// Refresh the mirror, discarding any failure.
    pub(crate) async fn sync(&self, token: &str) {
        if let Err(err) = self
            .refresh(token)
            .await
            .map_err(|e| Error::EntitiesFetch(e.to_string()))
        {
            tracing::warn!(error = %err, "could not refresh FFL list mirror");
        }
    }

    /// Fetch the FFL list and overwrite the mirror file with it.
    pub(crate) async fn refresh(&self, token: &str) -> Result<Value> {
        let data = self.fetch(token).await?;
        let pretty = serde_json::to_string_pretty(&data)?;
        tokio::fs::write(&self.path, pretty).await?;
        tracing::debug!(path = %self.path.display(), "FFL list mirror written");
        Ok(data)
    }

    /// Read the mirror file, `None` if it has never been written.
    pub(crate) async fn load(&self) -> Result<Option<Value>> {
        match tokio::fs::read(&self.path).await {
            Ok(raw) => Ok(Some(serde_json::from_slice(&raw)?)),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(None),
            Err(e) => Err(e.into()),
        }
    }

    async fn fetch(&self, token: &str) -> Result<Value> {
        let mut headers = HeaderMap::new();
        headers.insert(USER_AGENT, header_value(&self.user_agent)?);
        headers.insert(ACCEPT, HeaderValue::from_static(ACCEPT_ANY_JSON));
        headers.insert(AUTH_TOKEN_HEADER, header_value(token)?);
        headers.insert(USER_TIMEZONE_HEADER, header_value(&self.user_timezone)?);
        headers.insert(REFERER, header_value(&self.referer)?);

        let response = self
            .http
            .get(&self.url)
            .headers(headers)
            .timeout(self.timeout)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(Error::from_api_response(status.as_u16(), &body));
        }

        read_json(response).await
    }
}
