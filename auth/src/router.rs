//! Authentication router composition.

use crate::context::AuthContext;
use crate::handlers::{oauth, session};
use axum::{extract::FromRef, routing::get, Router};

/// Create the authentication router.
///
/// # Routes
///
/// - `GET /login` - Sign-in entry point
/// - `GET /auth/google` - Redirect to Google
/// - `GET /auth/google/callback` - Handle Google's redirect
/// - `GET /auth/me` - Current principal
/// - `GET /logout` - Destroy session
///
/// # Example
///
/// ```rust,ignore
/// let app = Router::new()
///     .merge(auth_router())
///     .route("/orders", post(create_order))
///     .with_state(app_state);
/// ```
pub fn auth_router<S>() -> Router<S>
where
    AuthContext: FromRef<S>,
    S: Clone + Send + Sync + 'static,
{
    Router::new()
        .route("/login", get(oauth::login))
        .route("/auth/google", get(oauth::google_redirect))
        .route("/auth/google/callback", get(oauth::google_callback))
        .route("/auth/me", get(session::me))
        .route("/logout", get(session::logout))
}
