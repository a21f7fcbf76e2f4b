//! HTTP client and service layer for the FFLBizHub portal.
//!
//! This module provides the main entry point [`FflBizHubClient`] together
//! with its configuration and the paged search stream.
//!
//! # Example
//!
//! ```no_run
//! use fflbizhub_rs::FflBizHubClient;
//!
//! # async fn example() -> fflbizhub_rs::Result<()> {
//! let client = FflBizHubClient::from_env()?;
//! let token = client.token(false).await?;
//! # Ok(())
//! # }
//! ```

mod config;
mod http;
pub mod paginated;

pub use config::{ClientConfig, DEFAULT_ENTITIES_CACHE, DEFAULT_TOKEN_CACHE};
pub use http::{header_map, FflBizHubClient};
pub use paginated::PageStream;
pub(crate) use http::{
    header_value, read_json, ClientInner, ACCEPT_ANY_JSON, AUTH_TOKEN_HEADER, USER_TIMEZONE_HEADER,
};
