//! # fflbizhub-rs
//!
//! An async Rust client for the FFLBizHub firearms inventory portal.
//!
//! The crate covers the parts of the portal that scripts need most:
//!
//! - **Authentication**: credential login with an on-disk token cache, so a
//!   token is reused until its locally estimated expiry
//! - **FFL list mirror**: every fresh login refreshes a local copy of the
//!   FFL books tied to the account
//! - **Ad search**: the filtered acquisition/disposition search streamed page
//!   by page, whatever envelope the portal wraps the rows in
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use fflbizhub_rs::{ClientConfig, Credentials, FflBizHubClient};
//! use futures_util::TryStreamExt;
//!
//! #[tokio::main]
//! async fn main() -> fflbizhub_rs::Result<()> {
//!     let client = FflBizHubClient::login(
//!         Credentials::new("clerk@example.com", "hunter2"),
//!         ClientConfig::default(),
//!     ).await?;
//!
//!     let body = serde_json::json!({
//!         "pagingParams": {"take": 100, "skip": 0},
//!         "filter": {"isOpen": true}
//!     });
//!
//!     let mut pages = client.search().stream(&body).await?;
//!     while let Some(rows) = pages.try_next().await? {
//!         for row in rows {
//!             println!("{}", serde_json::Value::Object(row));
//!         }
//!     }
//!
//!     Ok(())
//! }
//! ```

#![warn(missing_docs)]
#![warn(rustdoc::missing_crate_level_docs)]
#![deny(unsafe_code)]

pub mod api;
pub mod auth;
pub mod client;
pub mod error;
pub mod models;

// Re-export primary types at crate root for convenience
pub use auth::TokenManager;
pub use client::{ClientConfig, FflBizHubClient, PageStream};
pub use error::{Error, Result};
pub use models::{Credentials, Endpoint, PagingParams, Record, RecordBatch};

/// Prelude module for convenient imports.
///
/// ```rust
/// use fflbizhub_rs::prelude::*;
/// ```
pub mod prelude {
    pub use crate::api::SearchService;
    pub use crate::auth::{CachedToken, TokenManager};
    pub use crate::client::{header_map, ClientConfig, FflBizHubClient, PageStream};
    pub use crate::error::{Error, Result};
    pub use crate::models::{
        Credentials, Endpoint, PagingParams, Record, RecordBatch, SearchPayload,
    };
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_endpoints() {
        let config = ClientConfig::default();
        assert_eq!(
            Endpoint::Auth.url(&config.base_url),
            "https://app.fflbizhub.com/api/auth"
        );
        assert_eq!(
            Endpoint::AdSearch.url(&config.base_url),
            "https://app.fflbizhub.com/api/adSearch/getDataByFilter"
        );
    }

    #[test]
    fn test_client_construction_is_offline() {
        let client = FflBizHubClient::new(
            Credentials::new("clerk@example.com", "pw"),
            ClientConfig::default(),
        );
        assert!(client.is_ok());
    }
}
