//! Identity and session types.
//!
//! All types are `Clone` and serializable so they can travel inside actions
//! and be stored in Redis.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

// ═══════════════════════════════════════════════════════════════════════
// ID Types
// ═══════════════════════════════════════════════════════════════════════

/// Unique identifier for a principal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct PrincipalId(pub uuid::Uuid);

impl PrincipalId {
    /// Generate a new random `PrincipalId`.
    #[must_use]
    pub fn new() -> Self {
        Self(uuid::Uuid::new_v4())
    }
}

impl Default for PrincipalId {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Display for PrincipalId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        self.0.fmt(f)
    }
}

/// Unique identifier for a session.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct SessionId(pub uuid::Uuid);

impl SessionId {
    /// Generate a new random `SessionId`.
    #[must_use]
    pub fn new() -> Self {
        Self(uuid::Uuid::new_v4())
    }

    /// Parse a session ID from its cookie representation.
    ///
    /// Returns `None` for anything that is not a UUID.
    #[must_use]
    pub fn parse(raw: &str) -> Option<Self> {
        uuid::Uuid::parse_str(raw.trim()).ok().map(Self)
    }
}

impl Default for SessionId {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Display for SessionId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        self.0.fmt(f)
    }
}

// ═══════════════════════════════════════════════════════════════════════
// Principal
// ═══════════════════════════════════════════════════════════════════════

/// What an identity provider vouches for after a successful sign-in.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct IdentityProfile {
    /// Provider-issued subject identifier (stable, unique per provider).
    pub external_id: String,
    /// Email address as reported by the provider.
    pub email: String,
    /// Human-readable name.
    pub display_name: String,
}

/// An authenticated user known to the system.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Principal {
    /// Internal identifier, referenced by orders.
    pub id: PrincipalId,
    /// Provider subject identifier. Never changes once recorded.
    pub external_id: String,
    /// Email, normalized to lowercase.
    pub email: String,
    /// Display name.
    pub display_name: String,
    /// When the principal was first seen.
    pub created_at: DateTime<Utc>,
}

impl Principal {
    /// Build a new principal from a provider profile.
    ///
    /// The email is trimmed and lowercased.
    #[must_use]
    pub fn from_profile(profile: IdentityProfile, now: DateTime<Utc>) -> Self {
        Self {
            id: PrincipalId::new(),
            email: normalize_email(&profile.email),
            external_id: profile.external_id,
            display_name: profile.display_name,
            created_at: now,
        }
    }
}

/// Lowercase and trim an email address for comparison and storage.
#[must_use]
pub fn normalize_email(email: &str) -> String {
    email.trim().to_lowercase()
}

// ═══════════════════════════════════════════════════════════════════════
// Session
// ═══════════════════════════════════════════════════════════════════════

/// A server-side session binding a cookie to a principal.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Session {
    /// Session identifier (the `sid` cookie value).
    pub session_id: SessionId,
    /// Principal attached to this session.
    pub principal_id: PrincipalId,
    /// Creation time.
    pub created_at: DateTime<Utc>,
    /// Absolute expiry.
    pub expires_at: DateTime<Utc>,
}

impl Session {
    /// Has this session expired at `now`?
    #[must_use]
    pub fn is_expired(&self, now: DateTime<Utc>) -> bool {
        now >= self.expires_at
    }
}
