//! Read side: order listings.
//!
//! Listings have no state transitions, so they read the repository directly
//! instead of going through the lifecycle store.

use crate::repository::{OrderRepository, RepositoryError};
use crate::types::Order;
use custom_orders_auth::Principal;
use std::sync::Arc;

/// Maximum number of orders in the admin listing.
pub const ADMIN_LISTING_LIMIT: usize = 200;

/// Order listings for the HTTP layer.
#[derive(Clone)]
pub struct OrderQueries {
    orders: Arc<dyn OrderRepository>,
}

impl OrderQueries {
    /// Create queries over `orders`.
    #[must_use]
    pub fn new(orders: Arc<dyn OrderRepository>) -> Self {
        Self { orders }
    }

    /// Orders owned by `principal`, newest first.
    ///
    /// # Errors
    ///
    /// Propagates repository failures.
    #[tracing::instrument(skip(self, principal), fields(principal_id = %principal.id))]
    pub async fn list_own(&self, principal: &Principal) -> Result<Vec<Order>, RepositoryError> {
        self.orders.find_by_owner(principal.id).await
    }

    /// The most recent [`ADMIN_LISTING_LIMIT`] orders, newest first.
    ///
    /// # Errors
    ///
    /// Propagates repository failures.
    #[tracing::instrument(skip(self))]
    pub async fn list_all(&self) -> Result<Vec<Order>, RepositoryError> {
        self.orders.find_recent(ADMIN_LISTING_LIMIT).await
    }
}

impl std::fmt::Debug for OrderQueries {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("OrderQueries").finish_non_exhaustive()
    }
}
