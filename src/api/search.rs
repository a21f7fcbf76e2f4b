//! Ad search service.

use std::sync::Arc;

use futures_util::TryStreamExt;
use reqwest::header::HeaderMap;
use serde_json::Value;

use crate::client::{ClientInner, PageStream};
use crate::models::{Endpoint, RecordBatch};
use crate::Result;

/// Service for the filtered acquisition/disposition search.
///
/// The request body is passed through untouched apart from
/// `pagingParams.skip`, which the stream advances on its own copy.
///
/// # Example
///
/// ```no_run
/// # async fn example(client: fflbizhub_rs::FflBizHubClient) -> fflbizhub_rs::Result<()> {
/// let body = serde_json::json!({
///     "pagingParams": {"take": 200, "skip": 0},
///     "filter": {"serialNumber": "AB123"}
/// });
///
/// let rows = client.search().collect(&body).await?;
/// println!("{} matching rows", rows.len());
/// # Ok(())
/// # }
/// ```
pub struct SearchService {
    inner: Arc<ClientInner>,
}

impl SearchService {
    pub(crate) fn new(inner: Arc<ClientInner>) -> Self {
        Self { inner }
    }

    /// Stream every page of the search, authenticating with the client's token.
    pub async fn stream(&self, body: &Value) -> Result<PageStream> {
        let headers = self.inner.auth_headers().await?;
        self.stream_with(headers, body, None)
    }

    /// Stream every page of the search with caller-supplied headers.
    ///
    /// `url` defaults to the portal's ad search endpoint.
    pub fn stream_with(
        &self,
        headers: HeaderMap,
        body: &Value,
        url: Option<&str>,
    ) -> Result<PageStream> {
        let config = &self.inner.config;
        let url = match url {
            Some(url) => url.to_string(),
            None => Endpoint::AdSearch.url(&config.base_url),
        };

        PageStream::new(
            self.inner.http().clone(),
            url,
            headers,
            body,
            config.search_timeout,
        )
    }

    /// Fetch all pages and concatenate their rows.
    pub async fn collect(&self, body: &Value) -> Result<RecordBatch> {
        self.stream(body).await?.try_concat().await
    }
}
