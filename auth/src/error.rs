//! Error types for authentication and authorization operations.

use thiserror::Error;

/// Result type alias for authentication operations.
pub type Result<T> = std::result::Result<T, AuthError>;

/// Failure modes of sign-in, session handling and principal storage.
///
/// Authorization outcomes are not errors: guards return a
/// [`Denial`](crate::guards::Denial) instead.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum AuthError {
    /// OAuth `state` parameter missing or not matching the issued one (CSRF).
    #[error("Invalid OAuth state parameter")]
    InvalidState,

    /// The identity provider rejected a request or returned garbage.
    #[error("Identity provider error: {0}")]
    ProviderError(String),

    /// Session not found.
    #[error("Session not found")]
    SessionNotFound,

    /// Session has expired.
    #[error("Session has expired")]
    SessionExpired,

    /// Session or principal storage failed.
    #[error("Storage error: {0}")]
    StoreError(String),

    /// Missing or invalid configuration.
    #[error("Configuration error: {0}")]
    Configuration(String),

    /// Unexpected internal failure.
    #[error("Internal error")]
    InternalError,
}

#[cfg(feature = "postgres")]
impl From<sqlx::Error> for AuthError {
    fn from(err: sqlx::Error) -> Self {
        Self::StoreError(err.to_string())
    }
}

impl From<redis::RedisError> for AuthError {
    fn from(err: redis::RedisError) -> Self {
        Self::StoreError(format!("Redis error: {err}"))
    }
}
