//! Storage implementations.
//!
//! - [`RedisSessionStore`]: production sessions
//! - [`InMemorySessionStore`] / [`InMemoryPrincipalRepository`]: tests and single-node dev
//! - [`PostgresPrincipalRepository`]: production principals (feature `postgres`)

pub mod memory;
pub mod session_redis;

#[cfg(feature = "postgres")]
pub mod postgres;

pub use memory::{InMemoryPrincipalRepository, InMemorySessionStore};
pub use session_redis::RedisSessionStore;

#[cfg(feature = "postgres")]
pub use postgres::PostgresPrincipalRepository;
