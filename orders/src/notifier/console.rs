use super::{body_for, subject_for, Notifier, NotifyError};
use crate::types::Order;
use custom_orders_auth::Principal;
use futures::future::BoxFuture;

/// Logs notifications instead of sending them.
///
/// Selected when no `SMTP_HOST` is configured.
#[derive(Debug, Clone, Default)]
pub struct ConsoleNotifier {
    recipients: Vec<String>,
}

impl ConsoleNotifier {
    /// Create a notifier that logs messages addressed to `recipients`.
    #[must_use]
    pub const fn new(recipients: Vec<String>) -> Self {
        Self { recipients }
    }
}

impl Notifier for ConsoleNotifier {
    fn notify_new_order<'a>(
        &'a self,
        order: &'a Order,
        submitter: &'a Principal,
    ) -> BoxFuture<'a, Result<(), NotifyError>> {
        Box::pin(async move {
            tracing::info!(
                order_id = %order.id,
                to = ?self.recipients,
                subject = %subject_for(order),
                body = %body_for(order, submitter),
                "New order notification (console)"
            );
            Ok(())
        })
    }
}
