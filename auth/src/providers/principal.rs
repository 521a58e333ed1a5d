//! Principal repository trait.

use crate::error::Result;
use crate::providers::BoxFuture;
use crate::state::{IdentityProfile, Principal, PrincipalId};

/// Storage for principals, keyed by internal ID and by provider subject.
pub trait PrincipalRepository: Send + Sync {
    /// Return the principal for `profile.external_id`, creating it on first sight.
    ///
    /// Idempotent: an existing principal is returned unchanged, even if the
    /// profile now carries a different email or name.
    ///
    /// # Errors
    ///
    /// Returns [`AuthError::StoreError`](crate::AuthError::StoreError) if the
    /// backing store fails.
    fn find_or_create_by_external_id(
        &self,
        profile: IdentityProfile,
    ) -> BoxFuture<'_, Result<Principal>>;

    /// Look up a principal by internal ID.
    ///
    /// # Errors
    ///
    /// Returns [`AuthError::StoreError`](crate::AuthError::StoreError) if the
    /// backing store fails.
    fn find_by_id(&self, id: PrincipalId) -> BoxFuture<'_, Result<Option<Principal>>>;
}
