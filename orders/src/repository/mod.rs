//! Order persistence.
//!
//! The reducer and the read queries only see [`OrderRepository`]; the
//! binary picks [`InMemoryOrderRepository`] or, with the `postgres`
//! feature, [`PostgresOrderRepository`].

use crate::types::{Order, OrderDraft, OrderId};
use custom_orders_auth::PrincipalId;
use futures::future::BoxFuture;
use thiserror::Error;

mod memory;
#[cfg(feature = "postgres")]
mod postgres;

pub use memory::InMemoryOrderRepository;
#[cfg(feature = "postgres")]
pub use postgres::PostgresOrderRepository;

/// Errors from the order store.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum RepositoryError {
    /// The backing store failed or is unreachable.
    #[error("Order store error: {0}")]
    Storage(String),

    /// A stored row could not be turned back into an [`Order`].
    #[error("Corrupt order record: {0}")]
    Corrupt(String),
}

#[cfg(feature = "postgres")]
impl From<sqlx::Error> for RepositoryError {
    fn from(error: sqlx::Error) -> Self {
        Self::Storage(error.to_string())
    }
}

/// Storage for orders.
///
/// Listings are newest first. `save` is last-write-wins: two admins deciding
/// the same order concurrently both succeed and the later write is kept.
pub trait OrderRepository: Send + Sync {
    /// Assign a fresh id and persist `draft` as a `not_viewed` order.
    fn insert(&self, draft: OrderDraft) -> BoxFuture<'_, Result<Order, RepositoryError>>;

    /// Look up one order.
    fn find_by_id(&self, id: OrderId) -> BoxFuture<'_, Result<Option<Order>, RepositoryError>>;

    /// All orders created by `owner`, newest first.
    fn find_by_owner(
        &self,
        owner: PrincipalId,
    ) -> BoxFuture<'_, Result<Vec<Order>, RepositoryError>>;

    /// The `limit` most recent orders across all owners, newest first.
    fn find_recent(&self, limit: usize) -> BoxFuture<'_, Result<Vec<Order>, RepositoryError>>;

    /// Overwrite the stored order with the same id.
    fn save(&self, order: Order) -> BoxFuture<'_, Result<Order, RepositoryError>>;
}
