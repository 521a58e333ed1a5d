//! Admin notification on new orders.
//!
//! Delivery is best effort: the lifecycle reducer bounds every call with a
//! timeout and a failure never rolls back the order.

use crate::types::Order;
use custom_orders_auth::Principal;
use futures::future::BoxFuture;
use thiserror::Error;

mod console;
mod smtp;
#[cfg(any(test, feature = "test-utils"))]
mod mock;

pub use console::ConsoleNotifier;
#[cfg(any(test, feature = "test-utils"))]
pub use mock::{Delivery, MockNotifier, NotifierBehavior};
pub use smtp::SmtpNotifier;

/// Notification failures.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum NotifyError {
    /// No admin addresses are configured.
    #[error("No notification recipients configured")]
    NoRecipients,

    /// An address could not be parsed.
    #[error("Invalid address {address}: {reason}")]
    InvalidAddress {
        /// The offending address.
        address: String,
        /// Parser message.
        reason: String,
    },

    /// The message could not be assembled.
    #[error("Failed to build message: {0}")]
    Message(String),

    /// The transport rejected or failed to deliver the message.
    #[error("Delivery failed: {0}")]
    Delivery(String),
}

/// Tells administrators that a new order was placed.
pub trait Notifier: Send + Sync {
    /// Send one notification about `order`, placed by `submitter`.
    fn notify_new_order<'a>(
        &'a self,
        order: &'a Order,
        submitter: &'a Principal,
    ) -> BoxFuture<'a, Result<(), NotifyError>>;
}

/// Subject line for a new-order notification.
#[must_use]
pub fn subject_for(order: &Order) -> String {
    format!("New custom order: {}", order.title)
}

/// Plain-text body for a new-order notification.
#[must_use]
pub fn body_for(order: &Order, submitter: &Principal) -> String {
    format!(
        "A new custom order was placed by {}\nTitle: {}\nDescription: {}\nManage at /orders",
        submitter.email, order.title, order.description
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{NewOrder, OrderId};
    use chrono::Utc;
    use custom_orders_auth::IdentityProfile;

    #[test]
    fn test_message_format() {
        let principal = Principal::from_profile(
            IdentityProfile {
                external_id: "g".into(),
                email: "alice@example.com".into(),
                display_name: "Alice".into(),
            },
            Utc::now(),
        );
        let order = NewOrder {
            title: Some("Mug".into()),
            description: Some("Blue, 300ml".into()),
        }
        .into_draft(&principal, Utc::now())
        .into_order(OrderId::new());

        assert_eq!(subject_for(&order), "New custom order: Mug");
        assert_eq!(
            body_for(&order, &principal),
            "A new custom order was placed by alice@example.com\n\
             Title: Mug\n\
             Description: Blue, 300ml\n\
             Manage at /orders"
        );
    }
}
