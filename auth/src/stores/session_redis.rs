//! Redis-based session store implementation.
//!
//! # Architecture
//!
//! Sessions are stored in Redis with:
//! - **Primary key**: `session:{session_id}` → bincode-serialized [`Session`]
//! - **TTL**: `SET EX` with the session lifetime, so Redis evicts expired records
//!
//! # Example
//!
//! ```no_run
//! use custom_orders_auth::stores::RedisSessionStore;
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let store = RedisSessionStore::new("redis://127.0.0.1:6379").await?;
//! # Ok(())
//! # }
//! ```

use crate::error::{AuthError, Result};
use crate::providers::{BoxFuture, SessionStore};
use crate::state::{PrincipalId, Session, SessionId};
use chrono::Utc;
use redis::aio::ConnectionManager;
use redis::{AsyncCommands, Client};
use std::time::Duration;

/// Redis-based session store with TTL-based expiration.
///
/// Cloning is cheap: the `ConnectionManager` multiplexes one connection and
/// reconnects on failure.
#[derive(Clone)]
pub struct RedisSessionStore {
    /// Connection manager for connection pooling.
    conn_manager: ConnectionManager,
}

impl RedisSessionStore {
    /// Create a new Redis session store.
    ///
    /// # Arguments
    ///
    /// * `redis_url` - Redis connection URL (e.g., `redis://127.0.0.1:6379`)
    ///
    /// # Errors
    ///
    /// Returns error if connection to Redis fails.
    pub async fn new(redis_url: &str) -> Result<Self> {
        let client = Client::open(redis_url).map_err(|e| {
            AuthError::Configuration(format!("Failed to create Redis client: {e}"))
        })?;

        let conn_manager = ConnectionManager::new(client).await.map_err(|e| {
            AuthError::StoreError(format!("Failed to create Redis connection manager: {e}"))
        })?;

        Ok(Self { conn_manager })
    }

    /// Get the Redis key for a session.
    fn session_key(session_id: SessionId) -> String {
        format!("session:{}", session_id.0)
    }
}

impl SessionStore for RedisSessionStore {
    fn create(&self, principal_id: PrincipalId, ttl: Duration) -> BoxFuture<'_, Result<Session>> {
        Box::pin(async move {
            let mut conn = self.conn_manager.clone();

            let now = Utc::now();
            let lifetime = chrono::Duration::from_std(ttl)
                .map_err(|e| AuthError::Configuration(format!("Invalid session TTL: {e}")))?;
            let session = Session {
                session_id: SessionId::new(),
                principal_id,
                created_at: now,
                expires_at: now + lifetime,
            };

            let session_bytes = bincode::serialize(&session)
                .map_err(|e| AuthError::StoreError(format!("Failed to encode session: {e}")))?;

            let session_key = Self::session_key(session.session_id);
            let ttl_seconds = ttl.as_secs().max(1);

            let _: () = conn
                .set_ex(&session_key, session_bytes, ttl_seconds)
                .await
                .map_err(|e| AuthError::StoreError(format!("Failed to create session: {e}")))?;

            tracing::info!(
                session_id = %session.session_id,
                principal_id = %principal_id,
                ttl_seconds,
                "Created session in Redis"
            );

            Ok(session)
        })
    }

    fn get(&self, session_id: SessionId) -> BoxFuture<'_, Result<Option<Session>>> {
        Box::pin(async move {
            let mut conn = self.conn_manager.clone();
            let session_key = Self::session_key(session_id);

            let session_bytes: Option<Vec<u8>> = conn.get(&session_key).await.map_err(|e| {
                AuthError::StoreError(format!("Failed to get session from Redis: {e}"))
            })?;

            let Some(bytes) = session_bytes else {
                return Ok(None);
            };

            let session: Session = bincode::deserialize(&bytes)
                .map_err(|e| AuthError::StoreError(format!("Corrupt session record: {e}")))?;

            // Redis TTL normally removes these first; clock skew or PERSIST can leave them.
            if session.is_expired(Utc::now()) {
                tracing::warn!(
                    session_id = %session_id,
                    expires_at = %session.expires_at,
                    "Session expired (TTL should have cleaned this up)"
                );
                return Ok(None);
            }

            Ok(Some(session))
        })
    }

    fn delete(&self, session_id: SessionId) -> BoxFuture<'_, Result<()>> {
        Box::pin(async move {
            let mut conn = self.conn_manager.clone();
            let session_key = Self::session_key(session_id);

            let _: () = conn
                .del(&session_key)
                .await
                .map_err(|e| AuthError::StoreError(format!("Failed to delete session: {e}")))?;

            tracing::info!(session_id = %session_id, "Deleted session from Redis");

            Ok(())
        })
    }
}
