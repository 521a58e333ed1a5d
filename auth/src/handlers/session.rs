//! Session handlers: who am I, and logout.

use crate::context::AuthContext;
use crate::cookies::{expire_cookie, read_cookie, SESSION_COOKIE};
use crate::extractors::CurrentPrincipal;
use crate::state::{Principal, SessionId};
use axum::{
    extract::State,
    http::{header, HeaderMap},
    response::{AppendHeaders, IntoResponse, Redirect, Response},
    Json,
};
use serde::Serialize;

/// Response for `GET /auth/me`.
#[derive(Debug, Clone, Serialize)]
pub struct MeResponse {
    /// Is a principal attached to the session?
    pub authenticated: bool,
    /// The principal, when authenticated.
    pub principal: Option<Principal>,
}

/// `GET /auth/me`
///
/// ```json
/// { "authenticated": true, "principal": { "id": "...", "email": "a@x.com", ... } }
/// ```
#[allow(clippy::unused_async)]
pub async fn me(CurrentPrincipal(principal): CurrentPrincipal) -> Json<MeResponse> {
    Json(MeResponse {
        authenticated: principal.is_some(),
        principal,
    })
}

/// `GET /logout`
///
/// Deletes the server-side session (if any), expires the cookie, redirects to `/`.
/// A storage failure is logged; the cookie is cleared regardless.
pub async fn logout(State(ctx): State<AuthContext>, headers: HeaderMap) -> Response {
    if let Some(session_id) = read_cookie(&headers, SESSION_COOKIE).and_then(SessionId::parse) {
        match ctx.sessions.delete(session_id).await {
            Ok(()) => tracing::info!(session_id = %session_id, "Logged out"),
            Err(error) => tracing::error!(
                session_id = %session_id,
                error = %error,
                "Failed to delete session on logout"
            ),
        }
    }

    (
        AppendHeaders([(header::SET_COOKIE, expire_cookie(SESSION_COOKIE))]),
        Redirect::to("/"),
    )
        .into_response()
}
