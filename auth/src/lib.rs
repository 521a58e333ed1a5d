//! # Custom Orders Authentication & Authorization
//!
//! Google sign-in, server-side sessions and the two authorization guards
//! that gate the order operations.
//!
//! ## Architecture
//!
//! ```text
//! Browser ──/auth/google──▶ IdentityProvider ──profile──▶ PrincipalRepository
//!                                                              │ find-or-create
//!                                                              ▼
//! Browser ◀──── sid cookie ───────────────────────────── SessionStore
//!
//! Request ──sid──▶ SessionStore ──▶ PrincipalRepository ──▶ guards ──▶ handler
//! ```
//!
//! - [`providers`]: the traits every external dependency sits behind
//! - [`stores`]: Redis, Postgres and in-memory implementations
//! - [`guards`]: pure `require_authenticated` / `require_admin` predicates
//! - `extractors`, `handlers`, `router` (feature `axum`): the HTTP surface
//!
//! ## Example: guarding a handler
//!
//! ```rust,ignore
//! use custom_orders_auth::extractors::{RequireAdmin, RequireAuthenticated};
//!
//! async fn my_orders(RequireAuthenticated(principal): RequireAuthenticated) { ... }
//! async fn all_orders(RequireAdmin(admin): RequireAdmin) { ... }
//! ```

#![deny(missing_docs)]
#![deny(clippy::unwrap_used)]
#![deny(clippy::expect_used)]
#![deny(clippy::panic)]
#![deny(clippy::todo)]
#![deny(clippy::unimplemented)]

pub mod config;
pub mod error;
pub mod guards;
pub mod providers;
pub mod state;
pub mod stores;

#[cfg(feature = "axum")]
pub mod context;
#[cfg(feature = "axum")]
pub mod cookies;
#[cfg(feature = "axum")]
pub mod extractors;
#[cfg(feature = "axum")]
pub mod handlers;
#[cfg(feature = "axum")]
pub mod router;

#[cfg(any(test, feature = "test-utils"))]
pub mod mocks;

// Re-exports
pub use config::AuthConfig;
pub use error::{AuthError, Result};
pub use guards::{require_admin, require_authenticated, AdminAllowList, Denial};
pub use state::{IdentityProfile, Principal, PrincipalId, Session, SessionId};

#[cfg(feature = "axum")]
pub use context::AuthContext;
#[cfg(feature = "axum")]
pub use router::auth_router;
