//! Recording notifier for tests.

use super::{Notifier, NotifyError};
use crate::types::{Order, OrderId};
use custom_orders_auth::Principal;
use futures::future::BoxFuture;
use std::sync::{Arc, Mutex};

/// How a [`MockNotifier`] responds.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum NotifierBehavior {
    /// Record the delivery and succeed.
    #[default]
    Succeed,
    /// Fail with [`NotifyError::Delivery`] carrying this reason.
    Fail(String),
    /// Never complete.
    Hang,
}

/// A delivery the mock accepted.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Delivery {
    /// Order the notification was about.
    pub order_id: OrderId,
    /// Submitter email.
    pub submitter: String,
}

/// In-memory [`Notifier`] that records deliveries. Clones share the log.
#[derive(Debug, Clone, Default)]
pub struct MockNotifier {
    behavior: NotifierBehavior,
    deliveries: Arc<Mutex<Vec<Delivery>>>,
}

impl MockNotifier {
    /// A notifier that always succeeds.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// A notifier that always fails with `reason`.
    #[must_use]
    pub fn failing(reason: impl Into<String>) -> Self {
        Self {
            behavior: NotifierBehavior::Fail(reason.into()),
            ..Self::default()
        }
    }

    /// A notifier whose calls never complete.
    #[must_use]
    pub fn hanging() -> Self {
        Self {
            behavior: NotifierBehavior::Hang,
            ..Self::default()
        }
    }

    /// Deliveries recorded so far.
    #[must_use]
    pub fn deliveries(&self) -> Vec<Delivery> {
        self.deliveries
            .lock()
            .map(|d| d.clone())
            .unwrap_or_default()
    }
}

impl Notifier for MockNotifier {
    fn notify_new_order<'a>(
        &'a self,
        order: &'a Order,
        submitter: &'a Principal,
    ) -> BoxFuture<'a, Result<(), NotifyError>> {
        Box::pin(async move {
            match &self.behavior {
                NotifierBehavior::Succeed => {
                    if let Ok(mut deliveries) = self.deliveries.lock() {
                        deliveries.push(Delivery {
                            order_id: order.id,
                            submitter: submitter.email.clone(),
                        });
                    }
                    Ok(())
                }
                NotifierBehavior::Fail(reason) => Err(NotifyError::Delivery(reason.clone())),
                NotifierBehavior::Hang => futures::future::pending().await,
            }
        })
    }
}
