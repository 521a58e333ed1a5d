//! Actions for the order lifecycle.

use crate::types::{Decision, NewOrder, Order, OrderId};
use custom_orders_auth::Principal;
use uuid::Uuid;

/// Commands from the HTTP layer and the outcomes their effects feed back.
///
/// Every variant carries the request's `correlation_id` so a caller waiting
/// in `send_and_wait_for` can pick out its own terminal action.
#[derive(Debug, Clone)]
pub enum OrderAction {
    // Commands
    /// A signed-in principal submits a new order.
    CreateOrder {
        /// Request correlation id.
        correlation_id: Uuid,
        /// Submitter; becomes the order's owner.
        principal: Principal,
        /// Untrusted input.
        request: NewOrder,
    },

    /// An admin decides on an order.
    DecideOrder {
        /// Request correlation id.
        correlation_id: Uuid,
        /// Target order.
        order_id: OrderId,
        /// Decoded decision.
        decision: Decision,
    },

    // Effect outcomes
    /// The order was persisted.
    OrderCreated {
        /// Request correlation id.
        correlation_id: Uuid,
        /// Stored order.
        order: Order,
        /// Who placed it, for the notification.
        submitter: Principal,
    },

    /// Admins were notified about a new order.
    NotificationSent {
        /// Request correlation id.
        correlation_id: Uuid,
        /// Order the notification was about.
        order_id: OrderId,
    },

    /// Notification failed or timed out. The order stays stored.
    NotificationFailed {
        /// Request correlation id.
        correlation_id: Uuid,
        /// Order the notification was about.
        order_id: OrderId,
        /// Failure description.
        reason: String,
    },

    /// The decision's target was loaded.
    OrderLoaded {
        /// Request correlation id.
        correlation_id: Uuid,
        /// Current stored order.
        order: Order,
        /// Decision to apply.
        decision: Decision,
    },

    /// No order has the requested id.
    OrderNotFound {
        /// Request correlation id.
        correlation_id: Uuid,
        /// Requested id.
        order_id: OrderId,
    },

    /// The decided order was saved.
    OrderDecided {
        /// Request correlation id.
        correlation_id: Uuid,
        /// Order after the merge.
        order: Order,
        /// Decision that was applied.
        decision: Decision,
    },

    /// The repository failed.
    OrderFailed {
        /// Request correlation id.
        correlation_id: Uuid,
        /// Failure description (internal, never sent to clients).
        reason: String,
    },
}

impl OrderAction {
    /// Correlation id of any variant.
    #[must_use]
    pub const fn correlation_id(&self) -> Uuid {
        match self {
            Self::CreateOrder { correlation_id, .. }
            | Self::DecideOrder { correlation_id, .. }
            | Self::OrderCreated { correlation_id, .. }
            | Self::NotificationSent { correlation_id, .. }
            | Self::NotificationFailed { correlation_id, .. }
            | Self::OrderLoaded { correlation_id, .. }
            | Self::OrderNotFound { correlation_id, .. }
            | Self::OrderDecided { correlation_id, .. }
            | Self::OrderFailed { correlation_id, .. } => *correlation_id,
        }
    }

    /// Is this the last action of a create request?
    #[must_use]
    pub const fn ends_creation(&self) -> bool {
        matches!(
            self,
            Self::NotificationSent { .. }
                | Self::NotificationFailed { .. }
                | Self::OrderFailed { .. }
        )
    }

    /// Is this the last action of a decide request?
    #[must_use]
    pub const fn ends_decision(&self) -> bool {
        matches!(
            self,
            Self::OrderDecided { .. } | Self::OrderNotFound { .. } | Self::OrderFailed { .. }
        )
    }
}
