//! PostgreSQL order repository.
//!
//! Schema lives in `orders/migrations` and is applied by the binary at
//! startup via `sqlx::migrate!`.

use super::{OrderRepository, RepositoryError};
use crate::types::{Order, OrderDraft, OrderId, OrderStatus};
use chrono::{DateTime, Utc};
use custom_orders_auth::PrincipalId;
use futures::future::BoxFuture;
use sqlx::PgPool;
use uuid::Uuid;

const ORDER_COLUMNS: &str =
    "id, owner_id, owner_email, title, description, status, price, comments, created_at";

/// PostgreSQL order repository.
#[derive(Clone)]
pub struct PostgresOrderRepository {
    pool: PgPool,
}

impl PostgresOrderRepository {
    /// Create a new repository over `pool`.
    #[must_use]
    pub const fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[derive(sqlx::FromRow)]
struct OrderRow {
    id: Uuid,
    owner_id: Uuid,
    owner_email: String,
    title: String,
    description: String,
    status: String,
    price: Option<f64>,
    comments: Option<String>,
    created_at: DateTime<Utc>,
}

impl TryFrom<OrderRow> for Order {
    type Error = RepositoryError;

    fn try_from(row: OrderRow) -> Result<Self, Self::Error> {
        let status = OrderStatus::parse(&row.status).ok_or_else(|| {
            RepositoryError::Corrupt(format!("order {} has status {:?}", row.id, row.status))
        })?;

        Ok(Self {
            id: OrderId(row.id),
            owner_id: PrincipalId(row.owner_id),
            owner_email: row.owner_email,
            title: row.title,
            description: row.description,
            status,
            price: row.price,
            comments: row.comments,
            created_at: row.created_at,
        })
    }
}

fn into_orders(rows: Vec<OrderRow>) -> Result<Vec<Order>, RepositoryError> {
    rows.into_iter().map(Order::try_from).collect()
}

impl OrderRepository for PostgresOrderRepository {
    fn insert(&self, draft: OrderDraft) -> BoxFuture<'_, Result<Order, RepositoryError>> {
        Box::pin(async move {
            let order = draft.into_order(OrderId::new());

            sqlx::query(
                r"
                INSERT INTO orders
                    (id, owner_id, owner_email, title, description, status, price, comments, created_at)
                VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9)
                ",
            )
            .bind(order.id.0)
            .bind(order.owner_id.0)
            .bind(&order.owner_email)
            .bind(&order.title)
            .bind(&order.description)
            .bind(order.status.as_str())
            .bind(order.price)
            .bind(&order.comments)
            .bind(order.created_at)
            .execute(&self.pool)
            .await?;

            Ok(order)
        })
    }

    fn find_by_id(&self, id: OrderId) -> BoxFuture<'_, Result<Option<Order>, RepositoryError>> {
        Box::pin(async move {
            let row: Option<OrderRow> =
                sqlx::query_as(&format!("SELECT {ORDER_COLUMNS} FROM orders WHERE id = $1"))
                    .bind(id.0)
                    .fetch_optional(&self.pool)
                    .await?;

            row.map(Order::try_from).transpose()
        })
    }

    fn find_by_owner(
        &self,
        owner: PrincipalId,
    ) -> BoxFuture<'_, Result<Vec<Order>, RepositoryError>> {
        Box::pin(async move {
            let rows: Vec<OrderRow> = sqlx::query_as(&format!(
                "SELECT {ORDER_COLUMNS} FROM orders WHERE owner_id = $1 ORDER BY created_at DESC"
            ))
            .bind(owner.0)
            .fetch_all(&self.pool)
            .await?;

            into_orders(rows)
        })
    }

    fn find_recent(&self, limit: usize) -> BoxFuture<'_, Result<Vec<Order>, RepositoryError>> {
        Box::pin(async move {
            let limit = i64::try_from(limit).unwrap_or(i64::MAX);
            let rows: Vec<OrderRow> = sqlx::query_as(&format!(
                "SELECT {ORDER_COLUMNS} FROM orders ORDER BY created_at DESC LIMIT $1"
            ))
            .bind(limit)
            .fetch_all(&self.pool)
            .await?;

            into_orders(rows)
        })
    }

    fn save(&self, order: Order) -> BoxFuture<'_, Result<Order, RepositoryError>> {
        Box::pin(async move {
            // Only the decision fields are mutable.
            sqlx::query(
                r"
                UPDATE orders
                SET status = $2, price = $3, comments = $4
                WHERE id = $1
                ",
            )
            .bind(order.id.0)
            .bind(order.status.as_str())
            .bind(order.price)
            .bind(&order.comments)
            .execute(&self.pool)
            .await?;

            Ok(order)
        })
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used)]
mod tests {
    use super::*;
    use crate::types::{Decision, NewOrder};
    use custom_orders_auth::providers::PrincipalRepository;
    use custom_orders_auth::stores::PostgresPrincipalRepository;
    use custom_orders_auth::IdentityProfile;

    async fn pool() -> PgPool {
        let url = std::env::var("DATABASE_URL").expect("DATABASE_URL must be set");
        let pool = PgPool::connect(&url).await.expect("connect");
        sqlx::migrate!("./migrations").run(&pool).await.expect("migrate");
        pool
    }

    #[tokio::test]
    #[ignore = "requires PostgreSQL (DATABASE_URL)"]
    async fn test_roundtrip_and_decision_save() {
        let pool = pool().await;
        let principals = PostgresPrincipalRepository::new(pool.clone());
        let orders = PostgresOrderRepository::new(pool);

        let owner = principals
            .find_or_create_by_external_id(IdentityProfile {
                external_id: format!("pg-test-{}", Uuid::new_v4()),
                email: "pg@example.com".to_string(),
                display_name: "PG".to_string(),
            })
            .await
            .unwrap();

        let order = orders
            .insert(NewOrder::default().into_draft(&owner, Utc::now()))
            .await
            .unwrap();
        assert_eq!(order.status, OrderStatus::NotViewed);

        let mut decided = order.clone();
        Decision::decode(Some("approve"), Some(12.5), None).apply(&mut decided);
        orders.save(decided).await.unwrap();

        let stored = orders.find_by_id(order.id).await.unwrap().unwrap();
        assert_eq!(stored.status, OrderStatus::Approved);
        assert_eq!(stored.price, Some(12.5));
        assert_eq!(stored.created_at.timestamp(), order.created_at.timestamp());

        let mine = orders.find_by_owner(owner.id).await.unwrap();
        assert_eq!(mine.len(), 1);
        assert!(orders.find_recent(200).await.unwrap().len() <= 200);
    }
}
