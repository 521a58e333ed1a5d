//! Mock identity provider.

use crate::error::{AuthError, Result};
use crate::providers::{BoxFuture, IdentityProvider};
use crate::state::IdentityProfile;
use std::collections::HashMap;
use std::sync::{Arc, Mutex};

/// Identity provider that answers from a table of `code → profile`.
///
/// Unknown codes fail with [`AuthError::ProviderError`], like a rejected
/// token exchange.
#[derive(Debug, Clone, Default)]
pub struct MockIdentityProvider {
    profiles: Arc<Mutex<HashMap<String, IdentityProfile>>>,
}

impl MockIdentityProvider {
    /// Create a provider that knows no codes.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Make `code` exchange to `profile`.
    #[must_use]
    pub fn with_code(self, code: &str, profile: IdentityProfile) -> Self {
        if let Ok(mut profiles) = self.profiles.lock() {
            profiles.insert(code.to_string(), profile);
        }
        self
    }
}

impl IdentityProvider for MockIdentityProvider {
    fn authorization_url(&self, state: &str) -> Result<String> {
        Ok(format!("https://idp.test/authorize?state={state}"))
    }

    fn exchange_code<'a>(&'a self, code: &'a str) -> BoxFuture<'a, Result<IdentityProfile>> {
        Box::pin(async move {
            self.profiles
                .lock()
                .map_err(|_| AuthError::InternalError)?
                .get(code)
                .cloned()
                .ok_or_else(|| AuthError::ProviderError(format!("unknown code: {code}")))
        })
    }
}
