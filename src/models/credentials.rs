//! Account credentials.

use secrecy::{ExposeSecret, SecretString};
use std::fmt;

use crate::{Error, Result};

/// Environment variable holding the login email.
pub const EMAIL_ENV: &str = "FFL_EMAIL";
/// Environment variable holding the login password.
pub const PASSWORD_ENV: &str = "FFL_PASSWORD";

/// Email and password used to log in to the portal.
///
/// The password is kept in a [`SecretString`] and is redacted from `Debug`
/// output. Credentials are immutable once built.
///
/// # Example
///
/// ```
/// use fflbizhub_rs::Credentials;
///
/// let creds = Credentials::new("clerk@example.com", "hunter2");
/// assert_eq!(creds.email(), "clerk@example.com");
/// assert!(!format!("{:?}", creds).contains("hunter2"));
/// ```
#[derive(Clone)]
pub struct Credentials {
    email: String,
    password: SecretString,
}

impl Credentials {
    /// Create credentials from an email and a password.
    pub fn new(email: impl Into<String>, password: impl Into<String>) -> Self {
        Self {
            email: email.into(),
            password: SecretString::from(password.into()),
        }
    }

    /// Read credentials from `FFL_EMAIL` and `FFL_PASSWORD`.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Config`] if either variable is unset or empty.
    pub fn from_env() -> Result<Self> {
        let email = non_empty_var(EMAIL_ENV)?;
        let password = non_empty_var(PASSWORD_ENV)?;
        Ok(Self::new(email, password))
    }

    /// The login email.
    pub fn email(&self) -> &str {
        &self.email
    }

    pub(crate) fn password(&self) -> &str {
        self.password.expose_secret()
    }
}

fn non_empty_var(name: &str) -> Result<String> {
    match std::env::var(name) {
        Ok(value) if !value.is_empty() => Ok(value),
        _ => Err(Error::Config(format!("{name} must be set"))),
    }
}

impl fmt::Debug for Credentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Credentials")
            .field("email", &self.email)
            .field("password", &"[REDACTED]")
            .finish()
    }
}
