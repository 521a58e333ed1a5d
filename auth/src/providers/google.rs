//! Google OAuth 2.0 identity provider.

use crate::error::{AuthError, Result};
use crate::providers::{BoxFuture, IdentityProvider};
use crate::state::IdentityProfile;
use reqwest::Client;
use serde::Deserialize;

const AUTHORIZATION_ENDPOINT: &str = "https://accounts.google.com/o/oauth2/v2/auth";
const TOKEN_ENDPOINT: &str = "https://oauth2.googleapis.com/token";
const USERINFO_ENDPOINT: &str = "https://openidconnect.googleapis.com/v1/userinfo";

/// Google sign-in.
///
/// # Configuration
///
/// 1. Create OAuth 2.0 credentials in Google Cloud Console
/// 2. Register the callback URL as an authorized redirect URI
/// 3. Set `GOOGLE_CLIENT_ID`, `GOOGLE_CLIENT_SECRET` and `GOOGLE_CALLBACK`
///
/// # Example
///
/// ```no_run
/// use custom_orders_auth::providers::GoogleIdentityProvider;
///
/// let google = GoogleIdentityProvider::new(
///     "your-client-id".to_string(),
///     "your-client-secret".to_string(),
///     "http://localhost:3000/auth/google/callback".to_string(),
/// );
/// ```
#[derive(Clone, Debug)]
pub struct GoogleIdentityProvider {
    /// OAuth 2.0 client ID from Google Cloud Console.
    client_id: String,

    /// OAuth 2.0 client secret (keep confidential).
    client_secret: String,

    /// Redirect URI registered with Google.
    callback_url: String,

    /// HTTP client for making requests.
    http_client: Client,

    /// Scopes to request (default: "openid email profile").
    scopes: Vec<String>,
}

impl GoogleIdentityProvider {
    /// Create a new Google provider.
    #[must_use]
    pub fn new(client_id: String, client_secret: String, callback_url: String) -> Self {
        Self {
            client_id,
            client_secret,
            callback_url,
            http_client: Client::new(),
            scopes: vec![
                "openid".to_string(),
                "email".to_string(),
                "profile".to_string(),
            ],
        }
    }

    /// Set custom scopes.
    #[must_use]
    pub fn with_scopes(mut self, scopes: Vec<String>) -> Self {
        self.scopes = scopes;
        self
    }

    async fn fetch_access_token(&self, code: &str) -> Result<String> {
        let params = [
            ("code", code),
            ("client_id", self.client_id.as_str()),
            ("client_secret", self.client_secret.as_str()),
            ("redirect_uri", self.callback_url.as_str()),
            ("grant_type", "authorization_code"),
        ];

        let response = self
            .http_client
            .post(TOKEN_ENDPOINT)
            .form(&params)
            .send()
            .await
            .map_err(|e| AuthError::ProviderError(e.to_string()))?;

        if !response.status().is_success() {
            let error_body = response.text().await.unwrap_or_default();
            tracing::error!("Google token exchange failed: {}", error_body);
            return Err(AuthError::ProviderError(
                "Token exchange failed".to_string(),
            ));
        }

        let token: GoogleTokenResponse = response
            .json()
            .await
            .map_err(|e| AuthError::ProviderError(e.to_string()))?;

        Ok(token.access_token)
    }

    async fn fetch_user_info(&self, access_token: &str) -> Result<GoogleUserInfo> {
        let response = self
            .http_client
            .get(USERINFO_ENDPOINT)
            .bearer_auth(access_token)
            .send()
            .await
            .map_err(|e| AuthError::ProviderError(e.to_string()))?;

        if !response.status().is_success() {
            let error_body = response.text().await.unwrap_or_default();
            tracing::error!("Google UserInfo request failed: {}", error_body);
            return Err(AuthError::ProviderError(
                "UserInfo fetch failed".to_string(),
            ));
        }

        response
            .json()
            .await
            .map_err(|e| AuthError::ProviderError(e.to_string()))
    }
}

impl IdentityProvider for GoogleIdentityProvider {
    fn authorization_url(&self, state: &str) -> Result<String> {
        if self.client_id.is_empty() {
            return Err(AuthError::Configuration(
                "GOOGLE_CLIENT_ID is not set".to_string(),
            ));
        }

        let scope = self.scopes.join(" ");
        let params = [
            ("client_id", self.client_id.as_str()),
            ("redirect_uri", self.callback_url.as_str()),
            ("response_type", "code"),
            ("scope", scope.as_str()),
            ("state", state),
        ];

        let query = serde_urlencoded::to_string(params)
            .map_err(|e| AuthError::Configuration(format!("Failed to build URL: {e}")))?;

        Ok(format!("{AUTHORIZATION_ENDPOINT}?{query}"))
    }

    fn exchange_code<'a>(&'a self, code: &'a str) -> BoxFuture<'a, Result<IdentityProfile>> {
        Box::pin(async move {
            let access_token = self.fetch_access_token(code).await?;
            let user = self.fetch_user_info(&access_token).await?;

            if !user.email_verified {
                tracing::warn!("Google user email not verified: {}", user.email);
                return Err(AuthError::ProviderError(
                    "Email address is not verified".to_string(),
                ));
            }

            Ok(user.into_profile())
        })
    }
}

/// Google's token endpoint response (only the field we use).
#[derive(Debug, Deserialize)]
struct GoogleTokenResponse {
    access_token: String,
}

/// Google's UserInfo endpoint response.
#[derive(Debug, Deserialize)]
struct GoogleUserInfo {
    /// Google user ID (stable, unique identifier).
    sub: String,

    /// Full name.
    name: Option<String>,

    /// Email address.
    email: String,

    /// Whether email is verified by Google.
    #[serde(default)]
    email_verified: bool,
}

impl GoogleUserInfo {
    fn into_profile(self) -> IdentityProfile {
        // Accounts without a profile name fall back to their address.
        let display_name = self
            .name
            .filter(|n| !n.trim().is_empty())
            .unwrap_or_else(|| self.email.clone());

        IdentityProfile {
            external_id: self.sub,
            email: self.email,
            display_name,
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    fn provider() -> GoogleIdentityProvider {
        GoogleIdentityProvider::new(
            "client-123".to_string(),
            "secret".to_string(),
            "http://localhost:3000/auth/google/callback".to_string(),
        )
    }

    #[test]
    fn test_authorization_url_carries_state_and_scopes() {
        let url = provider().authorization_url("csrf-abc").unwrap();

        assert!(url.starts_with("https://accounts.google.com/o/oauth2/v2/auth?"));
        assert!(url.contains("client_id=client-123"));
        assert!(url.contains("state=csrf-abc"));
        assert!(url.contains("response_type=code"));
        assert!(url.contains("scope=openid+email+profile"));
        assert!(url.contains(
            "redirect_uri=http%3A%2F%2Flocalhost%3A3000%2Fauth%2Fgoogle%2Fcallback"
        ));
    }

    #[test]
    fn test_authorization_url_requires_client_id() {
        let google = GoogleIdentityProvider::new(
            String::new(),
            String::new(),
            "http://localhost:3000/auth/google/callback".to_string(),
        );

        assert!(matches!(
            google.authorization_url("state"),
            Err(AuthError::Configuration(_))
        ));
    }

    #[test]
    fn test_user_info_without_name_uses_email() {
        let user: GoogleUserInfo = serde_json::from_str(
            r#"{"sub":"110169484474386276334","email":"bob@example.com","email_verified":true}"#,
        )
        .unwrap();

        let profile = user.into_profile();
        assert_eq!(profile.external_id, "110169484474386276334");
        assert_eq!(profile.display_name, "bob@example.com");
    }
}
