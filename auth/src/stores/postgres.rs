//! PostgreSQL principal repository.
//!
//! Expects a `principals` table with a unique `external_id`. The schema ships
//! with the service's migrations (`orders/migrations`), which the binary runs
//! at startup.
//!
//! # Example
//!
//! ```no_run
//! use custom_orders_auth::stores::PostgresPrincipalRepository;
//! use sqlx::PgPool;
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let pool = PgPool::connect("postgres://localhost/custom_orders").await?;
//! let repo = PostgresPrincipalRepository::new(pool);
//! # Ok(())
//! # }
//! ```

use crate::error::{AuthError, Result};
use crate::providers::{BoxFuture, PrincipalRepository};
use crate::state::{normalize_email, IdentityProfile, Principal, PrincipalId};
use chrono::{DateTime, Utc};
use sqlx::PgPool;
use uuid::Uuid;

/// PostgreSQL principal repository.
#[derive(Clone)]
pub struct PostgresPrincipalRepository {
    /// PostgreSQL connection pool.
    pool: PgPool,
}

impl PostgresPrincipalRepository {
    /// Create a new PostgreSQL principal repository.
    ///
    /// # Arguments
    ///
    /// * `pool` - PostgreSQL connection pool
    #[must_use]
    pub const fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[derive(sqlx::FromRow)]
struct PrincipalRow {
    id: Uuid,
    external_id: String,
    email: String,
    display_name: String,
    created_at: DateTime<Utc>,
}

impl From<PrincipalRow> for Principal {
    fn from(row: PrincipalRow) -> Self {
        Self {
            id: PrincipalId(row.id),
            external_id: row.external_id,
            email: row.email,
            display_name: row.display_name,
            created_at: row.created_at,
        }
    }
}

impl PrincipalRepository for PostgresPrincipalRepository {
    fn find_or_create_by_external_id(
        &self,
        profile: IdentityProfile,
    ) -> BoxFuture<'_, Result<Principal>> {
        Box::pin(async move {
            // Losing an insert race is fine: DO NOTHING, then read the winner.
            sqlx::query(
                r"
                INSERT INTO principals (id, external_id, email, display_name, created_at)
                VALUES ($1, $2, $3, $4, $5)
                ON CONFLICT (external_id) DO NOTHING
                ",
            )
            .bind(Uuid::new_v4())
            .bind(&profile.external_id)
            .bind(normalize_email(&profile.email))
            .bind(&profile.display_name)
            .bind(Utc::now())
            .execute(&self.pool)
            .await
            .map_err(|e| AuthError::StoreError(format!("Failed to upsert principal: {e}")))?;

            let row: PrincipalRow = sqlx::query_as(
                r"
                SELECT id, external_id, email, display_name, created_at
                FROM principals
                WHERE external_id = $1
                ",
            )
            .bind(&profile.external_id)
            .fetch_one(&self.pool)
            .await
            .map_err(|e| AuthError::StoreError(format!("Failed to load principal: {e}")))?;

            Ok(row.into())
        })
    }

    fn find_by_id(&self, id: PrincipalId) -> BoxFuture<'_, Result<Option<Principal>>> {
        Box::pin(async move {
            let row: Option<PrincipalRow> = sqlx::query_as(
                r"
                SELECT id, external_id, email, display_name, created_at
                FROM principals
                WHERE id = $1
                ",
            )
            .bind(id.0)
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| AuthError::StoreError(format!("Failed to get principal: {e}")))?;

            Ok(row.map(Principal::from))
        })
    }
}
