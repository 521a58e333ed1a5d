//! Authentication providers.
//!
//! Traits for every external dependency of the sign-in flow, so the guards
//! and handlers can be exercised against in-memory implementations.
//!
//! # Dyn Compatibility
//!
//! The traits return `Pin<Box<dyn Future>>` instead of using `async fn`, so
//! they can be held as `Arc<dyn Trait>` in application state.
//!
//! ```text
//! IdentityProvider ──profile──▶ PrincipalRepository ──principal──▶ SessionStore
//!   (Google OAuth)               (find-or-create)                   (Redis / memory)
//! ```

use std::future::Future;
use std::pin::Pin;

pub mod google;
pub mod identity;
pub mod principal;
pub mod session;

pub use google::GoogleIdentityProvider;
pub use identity::IdentityProvider;
pub use principal::PrincipalRepository;
pub use session::SessionStore;

/// Boxed, `Send` future returned by provider methods.
pub type BoxFuture<'a, T> = Pin<Box<dyn Future<Output = T> + Send + 'a>>;
