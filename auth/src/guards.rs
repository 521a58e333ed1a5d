//! Authorization guards.
//!
//! Pure predicates over the current principal. They never touch storage:
//! callers resolve the session first and pass the result in.
//!
//! | Guard | No principal | Principal, not admin | Admin |
//! |---|---|---|---|
//! | [`require_authenticated`] | `Unauthorized` (negotiated) | allow | allow |
//! | [`require_admin`] | `Unauthorized` (always redirect) | `Forbidden` | allow |

use crate::state::{normalize_email, Principal};
use std::collections::HashSet;

/// Message shown to signed-in users who are not on the admin list.
pub const FORBIDDEN_MESSAGE: &str = "Restricted: admin access only";

/// Message returned to programmatic clients that are not signed in.
pub const LOGIN_REQUIRED_MESSAGE: &str = "Login required";

/// Why a guard refused access.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Denial {
    /// No principal attached to the session.
    ///
    /// `wants_json` selects a structured 401 over a redirect to the login page.
    Unauthorized {
        /// Caller is a programmatic client.
        wants_json: bool,
    },

    /// Signed in, but not allowed.
    Forbidden,
}

/// Case-insensitive set of administrator emails.
///
/// Built once from configuration and shared read-only.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AdminAllowList {
    emails: HashSet<String>,
}

impl AdminAllowList {
    /// Parse a comma-separated list such as `"Alice@X.com, bob@y.org"`.
    ///
    /// Entries are trimmed and lowercased; empty entries are dropped.
    #[must_use]
    pub fn parse(raw: &str) -> Self {
        let emails = raw
            .split(',')
            .map(normalize_email)
            .filter(|email| !email.is_empty())
            .collect();

        Self { emails }
    }

    /// Is `email` on the list? Case-insensitive.
    #[must_use]
    pub fn contains(&self, email: &str) -> bool {
        self.emails.contains(&normalize_email(email))
    }

    /// Iterate over the (normalized) addresses.
    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.emails.iter().map(String::as_str)
    }

    /// Number of admins.
    #[must_use]
    pub fn len(&self) -> usize {
        self.emails.len()
    }

    /// No admins configured?
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.emails.is_empty()
    }
}

/// Allow iff a principal is attached to the session.
///
/// # Errors
///
/// Returns [`Denial::Unauthorized`] carrying `wants_json` when no principal is present.
pub const fn require_authenticated(
    principal: Option<&Principal>,
    wants_json: bool,
) -> Result<&Principal, Denial> {
    match principal {
        Some(principal) => Ok(principal),
        None => Err(Denial::Unauthorized { wants_json }),
    }
}

/// Allow iff a principal is attached and its email is on the admin list.
///
/// # Errors
///
/// - [`Denial::Unauthorized`] (never negotiated, always a redirect) without a principal
/// - [`Denial::Forbidden`] when the principal is not an admin
pub fn require_admin<'a>(
    principal: Option<&'a Principal>,
    admins: &AdminAllowList,
) -> Result<&'a Principal, Denial> {
    let principal = principal.ok_or(Denial::Unauthorized { wants_json: false })?;

    if admins.contains(&principal.email) {
        Ok(principal)
    } else {
        Err(Denial::Forbidden)
    }
}
