//! Authentication and token caching for the FFLBizHub portal.
//!
//! The portal issues an opaque token on credential login. [`TokenManager`]
//! keeps the last token in a cache file with a locally estimated expiry so
//! that most runs need no login at all:
//!
//! ```no_run
//! use fflbizhub_rs::{ClientConfig, Credentials, TokenManager};
//!
//! # async fn example() -> fflbizhub_rs::Result<()> {
//! let manager = TokenManager::new(Credentials::from_env()?, ClientConfig::default())?;
//!
//! // Served from ffl_token.json when still valid
//! let token = manager.token(false).await?;
//!
//! // Always logs in and rewrites the cache
//! let fresh = manager.token(true).await?;
//! # Ok(())
//! # }
//! ```
//!
//! Every fresh login also refreshes a pretty-printed copy of the account's
//! FFL list (`ffl_books.json` by default). That refresh is best-effort.

mod cache;
mod entities;
mod manager;

pub use cache::{CachedToken, EXPIRY_FORMAT};
pub use manager::TokenManager;
