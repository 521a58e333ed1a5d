//! Session store trait.

use crate::error::Result;
use crate::providers::BoxFuture;
use crate::state::{PrincipalId, Session, SessionId};
use std::time::Duration;

/// Session storage abstraction.
///
/// Sessions have a time-to-live: after `ttl` elapses a session reads as
/// absent, whether or not the backend has physically removed it yet.
pub trait SessionStore: Send + Sync {
    /// Create a session for `principal_id` that lives for `ttl`.
    ///
    /// # Errors
    ///
    /// Returns [`AuthError::StoreError`](crate::AuthError::StoreError) if the
    /// session cannot be written.
    fn create(&self, principal_id: PrincipalId, ttl: Duration) -> BoxFuture<'_, Result<Session>>;

    /// Fetch a live session.
    ///
    /// Unknown and expired sessions both return `Ok(None)`.
    ///
    /// # Errors
    ///
    /// Returns [`AuthError::StoreError`](crate::AuthError::StoreError) if the
    /// backend is unreachable or the record is corrupt.
    fn get(&self, session_id: SessionId) -> BoxFuture<'_, Result<Option<Session>>>;

    /// Delete a session. Deleting an unknown session is not an error.
    ///
    /// # Errors
    ///
    /// Returns [`AuthError::StoreError`](crate::AuthError::StoreError) if the
    /// backend fails.
    fn delete(&self, session_id: SessionId) -> BoxFuture<'_, Result<()>>;
}
