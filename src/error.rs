//! Error types for the FFLBizHub client.
//!
//! Cache and entities-mirror failures are recovered inside the crate and are
//! only ever logged. Authentication and search failures always reach the
//! caller; nothing is retried.

use thiserror::Error;

/// A specialized `Result` type for FFLBizHub operations.
pub type Result<T> = std::result::Result<T, Error>;

/// The main error type for all FFLBizHub operations.
#[derive(Error, Debug)]
pub enum Error {
    /// Network-level request failure (connect, timeout, body read)
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// JSON serialization/deserialization failed
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Local file I/O failed
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// URL parsing error
    #[error("URL parse error: {0}")]
    UrlParse(#[from] url::ParseError),

    /// The login endpoint answered with a non-success status
    #[error("Login failed with HTTP status {status}")]
    LoginHttp {
        /// HTTP status code
        status: u16,
    },

    /// The login response carried no usable `token` field
    #[error("No token returned from API")]
    MissingToken,

    /// A search response was neither a JSON object nor a JSON array
    #[error("Unexpected response type: {observed}")]
    UnexpectedResponseType {
        /// Description of what the server sent instead
        observed: String,
    },

    /// A non-login endpoint answered with a non-success status
    #[error("API error: status={status}, body={body}")]
    Api {
        /// HTTP status code
        status: u16,
        /// Raw response body, truncated
        body: String,
    },

    /// The token cache file could not be used (never surfaced by the token manager)
    #[error("Token cache unreadable: {0}")]
    CacheRead(String),

    /// The entities mirror could not be refreshed (never surfaced by the token manager)
    #[error("Entities fetch failed: {0}")]
    EntitiesFetch(String),

    /// Invalid input provided to a function
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(String),
}

impl Error {
    /// Returns `true` if this is an authentication-related error.
    pub fn is_auth_error(&self) -> bool {
        matches!(self, Error::LoginHttp { .. } | Error::MissingToken)
    }

    /// Returns `true` if this error indicates a client-side issue
    /// (bad credentials, bad request body, bad configuration).
    pub fn is_client_error(&self) -> bool {
        match self {
            Error::LoginHttp { status } | Error::Api { status, .. } => {
                (400..500).contains(status)
            }
            Error::InvalidInput(_) | Error::Config(_) | Error::UrlParse(_) => true,
            _ => false,
        }
    }

    /// Returns `true` if this error indicates a server-side issue.
    pub fn is_server_error(&self) -> bool {
        match self {
            Error::LoginHttp { status } | Error::Api { status, .. } => *status >= 500,
            Error::MissingToken | Error::UnexpectedResponseType { .. } => true,
            _ => false,
        }
    }

    /// Create an API error from a status and a raw body, keeping at most
    /// [`BODY_PREVIEW_LEN`] characters of the body.
    pub(crate) fn from_api_response(status: u16, body: &str) -> Self {
        Error::Api {
            status,
            body: preview(body),
        }
    }
}

/// Maximum number of characters of a response body kept in error messages.
pub(crate) const BODY_PREVIEW_LEN: usize = 200;

/// Truncate text for inclusion in an error message.
pub(crate) fn preview(text: &str) -> String {
    let mut chars = text.chars();
    let head: String = chars.by_ref().take(BODY_PREVIEW_LEN).collect();
    if chars.next().is_some() {
        format!("{head}...")
    } else {
        head
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_auth() {
        assert!(Error::MissingToken.is_auth_error());
        assert!(Error::LoginHttp { status: 401 }.is_auth_error());
        assert!(!Error::InvalidInput("bad".into()).is_auth_error());
    }

    #[test]
    fn test_error_client_vs_server() {
        assert!(Error::LoginHttp { status: 401 }.is_client_error());
        assert!(!Error::LoginHttp { status: 401 }.is_server_error());
        assert!(Error::from_api_response(503, "down").is_server_error());
        assert!(Error::Config("missing".into()).is_client_error());
    }

    #[test]
    fn test_preview_truncates_long_bodies() {
        let long = "x".repeat(BODY_PREVIEW_LEN + 50);
        let short = preview(&long);
        assert_eq!(short.len(), BODY_PREVIEW_LEN + 3);
        assert!(short.ends_with("..."));
        assert_eq!(preview("short"), "short");
    }

    #[test]
    fn test_login_error_message_carries_status() {
        let err = Error::LoginHttp { status: 401 };
        assert_eq!(err.to_string(), "Login failed with HTTP status 401");
    }
}
