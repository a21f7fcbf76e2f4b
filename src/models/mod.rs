//! Data models for the FFLBizHub portal.
//!
//! Row schemas are defined by the portal and are kept as opaque JSON maps;
//! only the paging cursor and the response envelope are typed here.

mod credentials;
mod endpoint;
mod search;

pub use credentials::{Credentials, EMAIL_ENV, PASSWORD_ENV};
pub use endpoint::{Endpoint, DEFAULT_BASE_URL};
pub use search::{PagingParams, Record, RecordBatch, SearchPayload, PAGING_PARAMS, ROW_KEYS};
