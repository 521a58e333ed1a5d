//! Authentication configuration.
//!
//! Values are provided by the application, not hardcoded.

use std::time::Duration;

/// Session and cookie settings.
#[derive(Debug, Clone)]
pub struct AuthConfig {
    /// Server-side session lifetime.
    ///
    /// Default: 14 days
    pub session_ttl: Duration,

    /// Browser cookie lifetime (`Max-Age` of the `sid` cookie).
    ///
    /// Default: 7 days
    pub cookie_max_age: Duration,

    /// Add the `Secure` attribute to cookies (HTTPS deployments).
    ///
    /// Default: false
    pub secure_cookies: bool,
}

impl AuthConfig {
    /// Create configuration with the default lifetimes.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            session_ttl: Duration::from_secs(14 * 24 * 60 * 60),
            cookie_max_age: Duration::from_secs(7 * 24 * 60 * 60),
            secure_cookies: false,
        }
    }

    /// Set the server-side session lifetime.
    #[must_use]
    pub const fn with_session_ttl(mut self, ttl: Duration) -> Self {
        self.session_ttl = ttl;
        self
    }

    /// Set the cookie lifetime.
    #[must_use]
    pub const fn with_cookie_max_age(mut self, max_age: Duration) -> Self {
        self.cookie_max_age = max_age;
        self
    }

    /// Mark cookies `Secure`.
    #[must_use]
    pub const fn with_secure_cookies(mut self, secure: bool) -> Self {
        self.secure_cookies = secure;
        self
    }
}

impl Default for AuthConfig {
    fn default() -> Self {
        Self::new()
    }
}
