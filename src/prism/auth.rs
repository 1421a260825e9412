//! Prism Authentication
//!
//! Prism Central v3 accepts HTTP basic authentication on every request.

use std::fmt;

/// Environment variable holding the Prism user name
pub const USERNAME_ENV: &str = "NUTANIX_USERNAME";

/// Environment variable holding the Prism password
pub const PASSWORD_ENV: &str = "NUTANIX_PASSWORD";

/// Basic-auth credentials
#[derive(Clone, PartialEq, Eq)]
pub struct Credentials {
    pub username: String,
    password: String,
}

impl Credentials {
    pub fn new(username: impl Into<String>, password: impl Into<String>) -> Self {
        Self {
            username: username.into(),
            password: password.into(),
        }
    }

    /// Password for the `Authorization` header
    pub fn password(&self) -> &str {
        &self.password
    }

    /// Apply these credentials to an outgoing request
    pub fn apply(&self, request: reqwest::RequestBuilder) -> reqwest::RequestBuilder {
        request.basic_auth(&self.username, Some(&self.password))
    }
}

// Security: never print the password, not even in debug logs
impl fmt::Debug for Credentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Credentials")
            .field("username", &self.username)
            .field("password", &"<redacted>")
            .finish()
    }
}
