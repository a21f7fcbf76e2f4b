//! Paged ad search results as a lazy stream.
//!
//! [`PageStream`] hides the `take`/`skip` protocol of the search endpoint:
//! each item is the rows of one page, and the stream ends after the first
//! page holding fewer rows than `take`.

use std::future::Future;
use std::pin::Pin;
use std::task::{Context, Poll};
use std::time::Duration;

use futures_util::{stream, Stream, TryStreamExt};
use reqwest::header::HeaderMap;
use serde_json::Value;

use crate::models::{PagingParams, Record, RecordBatch, SearchPayload};
use crate::{Error, Result};

/// Type alias for a boxed future used internally.
type BoxFuture<T> = Pin<Box<dyn Future<Output = T> + Send + 'static>>;

/// A stream of search pages.
///
/// The stream keeps its own copy of the request body; only that copy's
/// `pagingParams.skip` advances between requests. Pages are fetched one at a
/// time, only when polled. The first error ends the stream.
///
/// A server that keeps returning full pages keeps the stream going until
/// the next offset would no longer fit in a `u64`; that ends the stream with
/// [`Error::InvalidInput`] after the last page received.
///
/// # Example
///
/// ```no_run
/// use fflbizhub_rs::client::{header_map, PageStream};
/// use futures_util::TryStreamExt;
/// use std::time::Duration;
///
/// # async fn example(token: &str) -> fflbizhub_rs::Result<()> {
/// let body = serde_json::json!({"pagingParams": {"take": 50, "skip": 0}, "filter": {}});
/// let headers = header_map([("X-Auth-Token", token)])?;
///
/// let pages = PageStream::new(
///     reqwest::Client::new(),
///     "https://app.fflbizhub.com/api/adSearch/getDataByFilter",
///     headers,
///     &body,
///     Duration::from_secs(60),
/// )?;
/// let batches: Vec<_> = pages.try_collect().await?;
/// # Ok(())
/// # }
/// ```
pub struct PageStream {
    http: reqwest::Client,
    url: String,
    headers: HeaderMap,
    timeout: Duration,
    /// Private copy of the caller's body.
    body: Value,
    /// Cursor of the next page to request.
    cursor: PagingParams,
    pending: Option<BoxFuture<Result<RecordBatch>>>,
    /// Error to report on the poll after the current page.
    deferred: Option<Error>,
    finished: bool,
    pages: usize,
}

impl PageStream {
    /// Create a stream over the search at `url`.
    ///
    /// `body` is copied; the caller's value is never modified.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidInput`] if `body` has no usable
    /// `pagingParams.take` / `pagingParams.skip` pair.
    pub fn new(
        http: reqwest::Client,
        url: impl Into<String>,
        headers: HeaderMap,
        body: &Value,
        timeout: Duration,
    ) -> Result<Self> {
        let body = body.clone();
        let cursor = PagingParams::read(&body)?;

        Ok(Self {
            http,
            url: url.into(),
            headers,
            timeout,
            body,
            cursor,
            pending: None,
            deferred: None,
            finished: false,
            pages: 0,
        })
    }

    /// Cursor that the next request will carry.
    pub fn cursor(&self) -> PagingParams {
        self.cursor
    }

    /// Number of pages received so far.
    pub fn pages_fetched(&self) -> usize {
        self.pages
    }

    /// Flatten the pages into individual rows.
    pub fn rows(self) -> impl Stream<Item = Result<Record>> + Send {
        self.map_ok(|batch| stream::iter(batch.into_iter().map(Ok::<Record, Error>)))
            .try_flatten()
    }

    fn start_fetch(&self) -> BoxFuture<Result<RecordBatch>> {
        let http = self.http.clone();
        let url = self.url.clone();
        let headers = self.headers.clone();
        let body = self.body.clone();
        let timeout = self.timeout;
        let cursor = self.cursor;

        Box::pin(async move {
            tracing::debug!(%url, take = cursor.take, skip = cursor.skip, "requesting search page");

            let response = http
                .post(&url)
                .headers(headers)
                .json(&body)
                .timeout(timeout)
                .send()
                .await?;

            let status = response.status();
            let text = response.text().await?;
            if !status.is_success() {
                return Err(Error::from_api_response(status.as_u16(), &text));
            }

            SearchPayload::parse(&text)?.into_rows()
        })
    }
}

impl Stream for PageStream {
    type Item = Result<RecordBatch>;

    fn poll_next(mut self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Option<Self::Item>> {
        let this = &mut *self;

        if this.finished {
            return Poll::Ready(None);
        }

        if let Some(err) = this.deferred.take() {
            this.finished = true;
            return Poll::Ready(Some(Err(err)));
        }

        if this.pending.is_none() {
            this.pending = Some(this.start_fetch());
        }

        let result = match this.pending.as_mut() {
            Some(fut) => match fut.as_mut().poll(cx) {
                Poll::Ready(result) => result,
                Poll::Pending => return Poll::Pending,
            },
            None => return Poll::Ready(None),
        };
        this.pending = None;

        match result {
            Ok(rows) => {
                this.pages += 1;
                if this.cursor.is_full_page(rows.len()) {
                    match this.cursor.next() {
                        Some(next) => {
                            this.cursor = next;
                            this.cursor.write(&mut this.body);
                        }
                        None => {
                            this.deferred = Some(Error::InvalidInput(format!(
                                "`pagingParams.skip` overflows after offset {}",
                                this.cursor.skip
                            )));
                        }
                    }
                } else {
                    tracing::debug!(pages = this.pages, "last search page reached");
                    this.finished = true;
                }
                Poll::Ready(Some(Ok(rows)))
            }
            Err(e) => {
                this.finished = true;
                Poll::Ready(Some(Err(e)))
            }
        }
    }
}

impl std::fmt::Debug for PageStream {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PageStream")
            .field("url", &self.url)
            .field("cursor", &self.cursor)
            .field("pages", &self.pages)
            .field("finished", &self.finished)
            .finish()
    }
}
