//! API service modules for FFLBizHub endpoints.

mod search;

pub use search::SearchService;
