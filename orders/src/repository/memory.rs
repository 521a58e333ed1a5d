//! In-memory order repository.
//!
//! Backs tests and development runs without Postgres. Clones share state.

use super::{OrderRepository, RepositoryError};
use crate::types::{Order, OrderDraft, OrderId};
use custom_orders_auth::PrincipalId;
use futures::future::BoxFuture;
use std::sync::{Arc, Mutex, MutexGuard};

/// In-memory [`OrderRepository`].
///
/// Orders are kept in insertion order; listings sort by `created_at`
/// descending and break ties by most recent insert.
#[derive(Debug, Clone, Default)]
pub struct InMemoryOrderRepository {
    orders: Arc<Mutex<Vec<Order>>>,
}

impl InMemoryOrderRepository {
    /// Create an empty repository.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of stored orders.
    #[must_use]
    pub fn len(&self) -> usize {
        self.orders.lock().map(|o| o.len()).unwrap_or(0)
    }

    /// Is the repository empty?
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    fn lock(&self) -> Result<MutexGuard<'_, Vec<Order>>, RepositoryError> {
        self.orders
            .lock()
            .map_err(|_| RepositoryError::Storage("order store lock poisoned".to_string()))
    }

    fn newest_first<'a>(orders: impl DoubleEndedIterator<Item = &'a Order>) -> Vec<Order> {
        let mut listed: Vec<Order> = orders.rev().cloned().collect();
        listed.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        listed
    }
}

impl OrderRepository for InMemoryOrderRepository {
    fn insert(&self, draft: OrderDraft) -> BoxFuture<'_, Result<Order, RepositoryError>> {
        Box::pin(async move {
            let order = draft.into_order(OrderId::new());
            self.lock()?.push(order.clone());
            Ok(order)
        })
    }

    fn find_by_id(&self, id: OrderId) -> BoxFuture<'_, Result<Option<Order>, RepositoryError>> {
        Box::pin(async move { Ok(self.lock()?.iter().find(|o| o.id == id).cloned()) })
    }

    fn find_by_owner(
        &self,
        owner: PrincipalId,
    ) -> BoxFuture<'_, Result<Vec<Order>, RepositoryError>> {
        Box::pin(async move {
            let orders = self.lock()?;
            Ok(Self::newest_first(
                orders.iter().filter(|o| o.owner_id == owner),
            ))
        })
    }

    fn find_recent(&self, limit: usize) -> BoxFuture<'_, Result<Vec<Order>, RepositoryError>> {
        Box::pin(async move {
            let orders = self.lock()?;
            let mut listed = Self::newest_first(orders.iter());
            listed.truncate(limit);
            Ok(listed)
        })
    }

    fn save(&self, order: Order) -> BoxFuture<'_, Result<Order, RepositoryError>> {
        Box::pin(async move {
            let mut orders = self.lock()?;
            match orders.iter_mut().find(|o| o.id == order.id) {
                Some(existing) => *existing = order.clone(),
                None => orders.push(order.clone()),
            }
            Ok(order)
        })
    }
}
