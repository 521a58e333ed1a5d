//! Environment for the order lifecycle reducer.

use crate::notifier::Notifier;
use crate::repository::OrderRepository;
use custom_orders_core::environment::Clock;
use std::sync::Arc;
use std::time::Duration;

/// Default bound on a single notification attempt.
pub const DEFAULT_NOTIFY_TIMEOUT: Duration = Duration::from_secs(10);

/// Injected dependencies of [`OrderLifecycleReducer`](super::OrderLifecycleReducer).
///
/// Production wires `SystemClock`, a Postgres or in-memory repository and an
/// SMTP or console notifier; tests use `FixedClock` and `MockNotifier`.
#[derive(Clone)]
pub struct OrderEnvironment {
    /// Source of `created_at`.
    pub clock: Arc<dyn Clock>,
    /// Order storage.
    pub orders: Arc<dyn OrderRepository>,
    /// Admin notification channel.
    pub notifier: Arc<dyn Notifier>,
    /// Bound on one notification attempt.
    pub notify_timeout: Duration,
}

impl OrderEnvironment {
    /// Create an environment with the default notification timeout.
    #[must_use]
    pub fn new(
        clock: Arc<dyn Clock>,
        orders: Arc<dyn OrderRepository>,
        notifier: Arc<dyn Notifier>,
    ) -> Self {
        Self {
            clock,
            orders,
            notifier,
            notify_timeout: DEFAULT_NOTIFY_TIMEOUT,
        }
    }

    /// Override the notification timeout.
    #[must_use]
    pub const fn with_notify_timeout(mut self, timeout: Duration) -> Self {
        self.notify_timeout = timeout;
        self
    }
}

impl std::fmt::Debug for OrderEnvironment {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("OrderEnvironment")
            .field("notify_timeout", &self.notify_timeout)
            .finish_non_exhaustive()
    }
}
