//! In-memory stores.
//!
//! Used by tests and by single-node development runs without Redis or
//! Postgres. State lives behind `Arc<Mutex<..>>`, so clones share it.

use crate::error::{AuthError, Result};
use crate::providers::{BoxFuture, PrincipalRepository, SessionStore};
use crate::state::{IdentityProfile, Principal, PrincipalId, Session, SessionId};
use chrono::Utc;
use std::collections::HashMap;
use std::sync::{Arc, Mutex};
use std::time::Duration;

/// In-memory [`SessionStore`].
///
/// Expired sessions read as absent and are dropped lazily on access.
#[derive(Debug, Clone, Default)]
pub struct InMemorySessionStore {
    sessions: Arc<Mutex<HashMap<SessionId, Session>>>,
}

impl InMemorySessionStore {
    /// Create an empty store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of stored records, expired ones included.
    #[must_use]
    pub fn len(&self) -> usize {
        self.sessions.lock().map(|s| s.len()).unwrap_or(0)
    }

    /// Is the store empty?
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl SessionStore for InMemorySessionStore {
    fn create(&self, principal_id: PrincipalId, ttl: Duration) -> BoxFuture<'_, Result<Session>> {
        Box::pin(async move {
            let now = Utc::now();
            let lifetime = chrono::Duration::from_std(ttl)
                .map_err(|e| AuthError::Configuration(format!("Invalid session TTL: {e}")))?;
            let session = Session {
                session_id: SessionId::new(),
                principal_id,
                created_at: now,
                expires_at: now + lifetime,
            };

            self.sessions
                .lock()
                .map_err(|_| AuthError::InternalError)?
                .insert(session.session_id, session.clone());

            Ok(session)
        })
    }

    fn get(&self, session_id: SessionId) -> BoxFuture<'_, Result<Option<Session>>> {
        Box::pin(async move {
            let mut sessions = self.sessions.lock().map_err(|_| AuthError::InternalError)?;

            match sessions.get(&session_id) {
                Some(session) if session.is_expired(Utc::now()) => {
                    sessions.remove(&session_id);
                    Ok(None)
                }
                Some(session) => Ok(Some(session.clone())),
                None => Ok(None),
            }
        })
    }

    fn delete(&self, session_id: SessionId) -> BoxFuture<'_, Result<()>> {
        Box::pin(async move {
            self.sessions
                .lock()
                .map_err(|_| AuthError::InternalError)?
                .remove(&session_id);
            Ok(())
        })
    }
}

/// In-memory [`PrincipalRepository`].
#[derive(Debug, Clone, Default)]
pub struct InMemoryPrincipalRepository {
    principals: Arc<Mutex<HashMap<PrincipalId, Principal>>>,
}

impl InMemoryPrincipalRepository {
    /// Create an empty repository.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert a principal directly, bypassing the upsert. Test seeding.
    ///
    /// # Errors
    ///
    /// Returns [`AuthError::InternalError`] if the lock is poisoned.
    pub fn insert(&self, principal: Principal) -> Result<()> {
        self.principals
            .lock()
            .map_err(|_| AuthError::InternalError)?
            .insert(principal.id, principal);
        Ok(())
    }

    /// Number of known principals.
    #[must_use]
    pub fn len(&self) -> usize {
        self.principals.lock().map(|p| p.len()).unwrap_or(0)
    }

    /// Is the repository empty?
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl PrincipalRepository for InMemoryPrincipalRepository {
    fn find_or_create_by_external_id(
        &self,
        profile: IdentityProfile,
    ) -> BoxFuture<'_, Result<Principal>> {
        Box::pin(async move {
            // One lock for lookup and insert keeps concurrent first logins from
            // creating two principals.
            let mut principals = self.principals.lock().map_err(|_| AuthError::InternalError)?;

            if let Some(existing) = principals
                .values()
                .find(|p| p.external_id == profile.external_id)
            {
                return Ok(existing.clone());
            }

            let principal = Principal::from_profile(profile, Utc::now());
            principals.insert(principal.id, principal.clone());

            tracing::info!(
                principal_id = %principal.id,
                email = %principal.email,
                "Created principal on first sign-in"
            );

            Ok(principal)
        })
    }

    fn find_by_id(&self, id: PrincipalId) -> BoxFuture<'_, Result<Option<Principal>>> {
        Box::pin(async move {
            Ok(self
                .principals
                .lock()
                .map_err(|_| AuthError::InternalError)?
                .get(&id)
                .cloned())
        })
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    fn profile(external_id: &str, email: &str) -> IdentityProfile {
        IdentityProfile {
            external_id: external_id.to_string(),
            email: email.to_string(),
            display_name: "Test User".to_string(),
        }
    }

    #[tokio::test]
    async fn test_find_or_create_is_idempotent() {
        let repo = InMemoryPrincipalRepository::new();

        let first = repo
            .find_or_create_by_external_id(profile("g-1", "A@X.com"))
            .await
            .unwrap();
        let second = repo
            .find_or_create_by_external_id(profile("g-1", "changed@x.com"))
            .await
            .unwrap();

        assert_eq!(first, second);
        assert_eq!(second.email, "a@x.com");
        assert_eq!(repo.len(), 1);
    }

    #[tokio::test]
    async fn test_distinct_external_ids_create_distinct_principals() {
        let repo = InMemoryPrincipalRepository::new();

        let a = repo
            .find_or_create_by_external_id(profile("g-1", "a@x.com"))
            .await
            .unwrap();
        let b = repo
            .find_or_create_by_external_id(profile("g-2", "a@x.com"))
            .await
            .unwrap();

        assert_ne!(a.id, b.id);
        assert_eq!(repo.find_by_id(b.id).await.unwrap(), Some(b));
        assert_eq!(repo.find_by_id(PrincipalId::new()).await.unwrap(), None);
    }

    #[tokio::test]
    async fn test_session_lifecycle() {
        let store = InMemorySessionStore::new();
        let principal_id = PrincipalId::new();

        let session = store
            .create(principal_id, Duration::from_secs(60))
            .await
            .unwrap();
        assert_eq!(
            store.get(session.session_id).await.unwrap().map(|s| s.principal_id),
            Some(principal_id)
        );

        store.delete(session.session_id).await.unwrap();
        assert!(store.get(session.session_id).await.unwrap().is_none());

        // Deleting twice is fine.
        store.delete(session.session_id).await.unwrap();
    }

    #[tokio::test]
    async fn test_expired_session_reads_as_absent() {
        let store = InMemorySessionStore::new();

        let session = store
            .create(PrincipalId::new(), Duration::ZERO)
            .await
            .unwrap();

        assert!(store.get(session.session_id).await.unwrap().is_none());
        assert!(store.is_empty());
    }
}
