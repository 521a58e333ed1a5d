//! Shared dependencies of the auth extractors and handlers.

use crate::config::AuthConfig;
use crate::error::AuthError;
use crate::guards::AdminAllowList;
use crate::providers::{IdentityProvider, PrincipalRepository, SessionStore};
use crate::state::Principal;
use crate::state::SessionId;
use custom_orders_web::AppError;
use std::sync::Arc;

/// Everything the HTTP side of auth needs, cheap to clone.
///
/// The application state exposes it through `FromRef`:
///
/// ```rust,ignore
/// impl FromRef<AppState> for AuthContext {
///     fn from_ref(state: &AppState) -> Self {
///         state.auth.clone()
///     }
/// }
/// ```
#[derive(Clone)]
pub struct AuthContext {
    /// Session storage.
    pub sessions: Arc<dyn SessionStore>,
    /// Principal storage.
    pub principals: Arc<dyn PrincipalRepository>,
    /// Sign-in provider.
    pub identity: Arc<dyn IdentityProvider>,
    /// Administrator emails (read-only snapshot).
    pub admins: Arc<AdminAllowList>,
    /// Session and cookie settings.
    pub config: AuthConfig,
}

impl AuthContext {
    /// Resolve the principal attached to a session cookie value.
    ///
    /// Missing, malformed, unknown and expired sessions all yield `Ok(None)`,
    /// as does a session whose principal no longer exists.
    ///
    /// # Errors
    ///
    /// Returns an [`AuthError`] if session or principal storage fails.
    pub async fn current_principal(
        &self,
        session_cookie: Option<&str>,
    ) -> Result<Option<Principal>, AuthError> {
        let Some(session_id) = session_cookie.and_then(SessionId::parse) else {
            return Ok(None);
        };

        let Some(session) = self.sessions.get(session_id).await? else {
            return Ok(None);
        };

        self.principals.find_by_id(session.principal_id).await
    }
}

impl std::fmt::Debug for AuthContext {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AuthContext")
            .field("admins", &self.admins.len())
            .field("config", &self.config)
            .finish_non_exhaustive()
    }
}

impl From<AuthError> for AppError {
    fn from(err: AuthError) -> Self {
        match err {
            AuthError::InvalidState => AppError::bad_request("Invalid OAuth state"),
            AuthError::SessionNotFound | AuthError::SessionExpired => {
                AppError::unauthorized("Login required")
            }
            AuthError::Configuration(_) => {
                AppError::unavailable("Sign-in is not configured").with_source(err)
            }
            AuthError::ProviderError(_) | AuthError::StoreError(_) | AuthError::InternalError => {
                AppError::internal("Authentication failed").with_source(err)
            }
        }
    }
}
