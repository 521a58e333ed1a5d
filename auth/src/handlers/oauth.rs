//! Google sign-in handlers.
//!
//! # Flow
//!
//! 1. `GET /auth/google`: generate a CSRF `state`, store it in the
//!    `oauth_state` cookie, redirect to Google
//! 2. Google redirects back to `GET /auth/google/callback?code=..&state=..`
//! 3. Verify `state` against the cookie, exchange `code` for a profile
//! 4. Find-or-create the principal, create a session, set `sid`, redirect to `/`
//!
//! Any failure in steps 3-4 sends the browser back to `/login`.

use crate::context::AuthContext;
use crate::cookies::{
    expire_cookie, read_cookie, set_cookie, SESSION_COOKIE, STATE_COOKIE, STATE_COOKIE_MAX_AGE,
};
use crate::error::AuthError;
use crate::extractors::LOGIN_PATH;
use crate::state::Principal;
use axum::{
    extract::{Query, State},
    http::{header, HeaderMap},
    response::{AppendHeaders, IntoResponse, Redirect, Response},
    Json,
};
use base64::Engine;
use custom_orders_web::{AppError, CorrelationId};
use serde::{Deserialize, Serialize};

/// Response for `GET /login`.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LoginResponse {
    /// Human-readable hint.
    pub message: &'static str,
    /// Where to start the sign-in round trip.
    pub login_url: &'static str,
}

/// `GET /login`
///
/// Points the client at the provider redirect.
#[allow(clippy::unused_async)]
pub async fn login() -> Json<LoginResponse> {
    Json(LoginResponse {
        message: "Sign in with Google",
        login_url: "/auth/google",
    })
}

/// Generate a cryptographically secure CSRF state (32 random bytes, URL-safe base64).
#[must_use]
pub fn generate_csrf_state() -> String {
    let bytes: [u8; 32] = rand::random();
    base64::engine::general_purpose::URL_SAFE_NO_PAD.encode(bytes)
}

/// `GET /auth/google`
///
/// # Response
///
/// 303 to Google's consent page, with the `oauth_state` cookie set.
#[tracing::instrument(skip(ctx, correlation_id), fields(correlation_id = %correlation_id.0))]
pub async fn google_redirect(
    State(ctx): State<AuthContext>,
    correlation_id: CorrelationId,
) -> Result<Response, AppError> {
    let state = generate_csrf_state();
    let authorization_url = ctx.identity.authorization_url(&state)?;

    let cookie = set_cookie(
        STATE_COOKIE,
        &state,
        STATE_COOKIE_MAX_AGE,
        ctx.config.secure_cookies,
    );

    Ok((
        AppendHeaders([(header::SET_COOKIE, cookie)]),
        Redirect::to(&authorization_url),
    )
        .into_response())
}

/// Query parameters Google appends to the callback URL.
#[derive(Debug, Clone, Deserialize)]
pub struct CallbackQuery {
    /// Authorization code.
    pub code: Option<String>,
    /// CSRF state echoed back.
    pub state: Option<String>,
    /// Set when the user denied consent or the request was invalid.
    pub error: Option<String>,
}

/// `GET /auth/google/callback?code=..&state=..`
///
/// # Response
///
/// - Success: 303 to `/`, `sid` cookie set, `oauth_state` cleared
/// - Failure: 303 to `/login`, `oauth_state` cleared
#[tracing::instrument(skip(ctx, correlation_id, headers, query), fields(correlation_id = %correlation_id.0))]
pub async fn google_callback(
    State(ctx): State<AuthContext>,
    correlation_id: CorrelationId,
    headers: HeaderMap,
    Query(query): Query<CallbackQuery>,
) -> Response {
    let clear_state = expire_cookie(STATE_COOKIE);

    match complete_sign_in(&ctx, &headers, query).await {
        Ok((principal, session_cookie)) => {
            tracing::info!(
                principal_id = %principal.id,
                email = %principal.email,
                "Signed in"
            );
            (
                AppendHeaders([
                    (header::SET_COOKIE, session_cookie),
                    (header::SET_COOKIE, clear_state),
                ]),
                Redirect::to("/"),
            )
                .into_response()
        }
        Err(error) => {
            tracing::warn!(error = %error, "Sign-in failed");
            (
                AppendHeaders([(header::SET_COOKIE, clear_state)]),
                Redirect::to(LOGIN_PATH),
            )
                .into_response()
        }
    }
}

async fn complete_sign_in(
    ctx: &AuthContext,
    headers: &HeaderMap,
    query: CallbackQuery,
) -> Result<(Principal, String), AuthError> {
    if let Some(error) = query.error {
        return Err(AuthError::ProviderError(error));
    }

    let expected = read_cookie(headers, STATE_COOKIE).ok_or(AuthError::InvalidState)?;
    let received = query.state.ok_or(AuthError::InvalidState)?;
    if !constant_time_eq::constant_time_eq(expected.as_bytes(), received.as_bytes()) {
        return Err(AuthError::InvalidState);
    }

    let code = query
        .code
        .ok_or_else(|| AuthError::ProviderError("Missing authorization code".to_string()))?;

    let profile = ctx.identity.exchange_code(&code).await?;
    let principal = ctx.principals.find_or_create_by_external_id(profile).await?;
    let session = ctx
        .sessions
        .create(principal.id, ctx.config.session_ttl)
        .await?;

    let cookie = set_cookie(
        SESSION_COOKIE,
        &session.session_id.to_string(),
        ctx.config.cookie_max_age,
        ctx.config.secure_cookies,
    );

    Ok((principal, cookie))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_csrf_state_is_random_and_url_safe() {
        let a = generate_csrf_state();
        let b = generate_csrf_state();

        assert_ne!(a, b);
        // 32 bytes, unpadded base64
        assert_eq!(a.len(), 43);
        assert!(a.chars().all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_'));
    }
}
