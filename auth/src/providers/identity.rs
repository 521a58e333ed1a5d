//! Identity provider trait.

use crate::error::Result;
use crate::providers::BoxFuture;
use crate::state::IdentityProfile;

/// External authority that signs users in (OAuth 2.0 authorization code flow).
pub trait IdentityProvider: Send + Sync {
    /// URL the browser is redirected to in order to sign in.
    ///
    /// `state` is echoed back on the callback and must be verified there.
    ///
    /// # Errors
    ///
    /// Returns [`AuthError::Configuration`](crate::AuthError::Configuration)
    /// if the URL cannot be built.
    fn authorization_url(&self, state: &str) -> Result<String>;

    /// Exchange an authorization code for the signed-in user's profile.
    ///
    /// # Errors
    ///
    /// Returns [`AuthError::ProviderError`](crate::AuthError::ProviderError)
    /// if the token exchange or profile fetch fails.
    fn exchange_code<'a>(&'a self, code: &'a str) -> BoxFuture<'a, Result<IdentityProfile>>;
}
