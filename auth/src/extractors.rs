//! Axum extractors that apply the guards.
//!
//! ```rust,ignore
//! // Any signed-in user
//! async fn my_orders(RequireAuthenticated(principal): RequireAuthenticated) -> ... {}
//!
//! // Admins only
//! async fn all_orders(RequireAdmin(admin): RequireAdmin) -> ... {}
//! ```
//!
//! Both read the `sid` cookie and resolve it through [`AuthContext`]. A
//! failing guard short-circuits the handler, so no side effect runs.

use crate::context::AuthContext;
use crate::cookies::{read_cookie, SESSION_COOKIE};
use crate::guards::{
    require_admin, require_authenticated, Denial, FORBIDDEN_MESSAGE, LOGIN_REQUIRED_MESSAGE,
};
use crate::state::Principal;
use axum::{
    async_trait,
    extract::{FromRef, FromRequestParts},
    http::{request::Parts, StatusCode},
    response::{IntoResponse, Redirect, Response},
    Json,
};
use custom_orders_web::{wants_json, AppError};

/// Where unauthenticated browsers are sent.
pub const LOGIN_PATH: &str = "/login";

impl IntoResponse for Denial {
    fn into_response(self) -> Response {
        match self {
            Self::Unauthorized { wants_json: true } => (
                StatusCode::UNAUTHORIZED,
                Json(serde_json::json!({ "error": LOGIN_REQUIRED_MESSAGE })),
            )
                .into_response(),
            Self::Unauthorized { wants_json: false } => Redirect::to(LOGIN_PATH).into_response(),
            Self::Forbidden => (StatusCode::FORBIDDEN, FORBIDDEN_MESSAGE).into_response(),
        }
    }
}

async fn resolve(parts: &Parts, ctx: &AuthContext) -> Result<Option<Principal>, Response> {
    ctx.current_principal(read_cookie(&parts.headers, SESSION_COOKIE))
        .await
        .map_err(|e| AppError::from(e).into_response())
}

/// The signed-in principal, if any. Never rejects on a missing session.
#[derive(Debug, Clone)]
pub struct CurrentPrincipal(pub Option<Principal>);

#[async_trait]
impl<S> FromRequestParts<S> for CurrentPrincipal
where
    AuthContext: FromRef<S>,
    S: Send + Sync,
{
    type Rejection = Response;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let ctx = AuthContext::from_ref(state);
        Ok(Self(resolve(parts, &ctx).await?))
    }
}

/// A signed-in principal; rejects with a negotiated [`Denial::Unauthorized`].
#[derive(Debug, Clone)]
pub struct RequireAuthenticated(pub Principal);

#[async_trait]
impl<S> FromRequestParts<S> for RequireAuthenticated
where
    AuthContext: FromRef<S>,
    S: Send + Sync,
{
    type Rejection = Response;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let ctx = AuthContext::from_ref(state);
        let principal = resolve(parts, &ctx).await?;

        match require_authenticated(principal.as_ref(), wants_json(&parts.headers)) {
            Ok(principal) => Ok(Self(principal.clone())),
            Err(denial) => {
                tracing::debug!(path = %parts.uri.path(), ?denial, "Authentication required");
                Err(denial.into_response())
            }
        }
    }
}

/// An administrator; rejects unauthenticated callers with a redirect and
/// everyone else with 403.
#[derive(Debug, Clone)]
pub struct RequireAdmin(pub Principal);

#[async_trait]
impl<S> FromRequestParts<S> for RequireAdmin
where
    AuthContext: FromRef<S>,
    S: Send + Sync,
{
    type Rejection = Response;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let ctx = AuthContext::from_ref(state);
        let principal = resolve(parts, &ctx).await?;

        match require_admin(principal.as_ref(), &ctx.admins) {
            Ok(admin) => Ok(Self(admin.clone())),
            Err(denial) => {
                if denial == Denial::Forbidden {
                    tracing::warn!(
                        path = %parts.uri.path(),
                        principal_id = ?principal.as_ref().map(|p| p.id),
                        "Non-admin attempted admin operation"
                    );
                }
                Err(denial.into_response())
            }
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    async fn body_string(response: Response) -> String {
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        String::from_utf8_lossy(&bytes).into_owned()
    }

    #[tokio::test]
    async fn test_unauthorized_json_is_401_with_error_body() {
        let response = Denial::Unauthorized { wants_json: true }.into_response();

        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
        assert_eq!(body_string(response).await, r#"{"error":"Login required"}"#);
    }

    #[test]
    fn test_unauthorized_browser_redirects_to_login() {
        let response = Denial::Unauthorized { wants_json: false }.into_response();

        assert_eq!(response.status(), StatusCode::SEE_OTHER);
        assert_eq!(response.headers()["location"], "/login");
    }

    #[tokio::test]
    async fn test_forbidden_is_static_message() {
        let response = Denial::Forbidden.into_response();

        assert_eq!(response.status(), StatusCode::FORBIDDEN);
        assert_eq!(body_string(response).await, "Restricted: admin access only");
    }
}
