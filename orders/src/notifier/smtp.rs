//! SMTP notifier using Lettre.

use super::{body_for, subject_for, Notifier, NotifyError};
use crate::types::Order;
use custom_orders_auth::Principal;
use futures::future::BoxFuture;
use lettre::message::header::ContentType;
use lettre::message::Mailbox;
use lettre::transport::smtp::authentication::Credentials;
use lettre::{AsyncSmtpTransport, AsyncTransport, Message, Tokio1Executor};

/// Sends new-order notifications over SMTP (STARTTLS).
///
/// The sender is the SMTP account itself; every configured admin address
/// receives the same message.
///
/// # Examples
///
/// ```ignore
/// let notifier = SmtpNotifier::new(
///     "smtp.gmail.com",
///     587,
///     "shop@gmail.com".to_string(),
///     "app_password".to_string(),
///     vec!["boss@example.com".to_string()],
/// )?;
/// ```
#[derive(Clone)]
pub struct SmtpNotifier {
    transport: AsyncSmtpTransport<Tokio1Executor>,
    from: Mailbox,
    recipients: Vec<Mailbox>,
}

impl std::fmt::Debug for SmtpNotifier {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SmtpNotifier")
            .field("from", &self.from)
            .field("recipients", &self.recipients)
            .finish_non_exhaustive()
    }
}

fn parse_mailbox(address: &str) -> Result<Mailbox, NotifyError> {
    address
        .parse()
        .map_err(|e: lettre::address::AddressError| NotifyError::InvalidAddress {
            address: address.to_string(),
            reason: e.to_string(),
        })
}

impl SmtpNotifier {
    /// Build a notifier for `host:port` authenticating as `username`.
    ///
    /// # Errors
    ///
    /// Returns [`NotifyError::InvalidAddress`] if the username or a recipient
    /// is not an email address, or [`NotifyError::Delivery`] if the relay
    /// cannot be configured.
    pub fn new(
        host: &str,
        port: u16,
        username: String,
        password: String,
        recipients: Vec<String>,
    ) -> Result<Self, NotifyError> {
        let from = parse_mailbox(&username)?;
        let recipients = recipients
            .iter()
            .map(String::as_str)
            .map(parse_mailbox)
            .collect::<Result<Vec<_>, _>>()?;

        let transport = AsyncSmtpTransport::<Tokio1Executor>::starttls_relay(host)
            .map_err(|e| NotifyError::Delivery(format!("SMTP relay error: {e}")))?
            .port(port)
            .credentials(Credentials::new(username, password))
            .build();

        Ok(Self {
            transport,
            from,
            recipients,
        })
    }

    fn build_message(&self, order: &Order, submitter: &Principal) -> Result<Message, NotifyError> {
        if self.recipients.is_empty() {
            return Err(NotifyError::NoRecipients);
        }

        let mut builder = Message::builder().from(self.from.clone());
        for recipient in &self.recipients {
            builder = builder.to(recipient.clone());
        }

        builder
            .subject(subject_for(order))
            .header(ContentType::TEXT_PLAIN)
            .body(body_for(order, submitter))
            .map_err(|e| NotifyError::Message(e.to_string()))
    }
}

impl Notifier for SmtpNotifier {
    fn notify_new_order<'a>(
        &'a self,
        order: &'a Order,
        submitter: &'a Principal,
    ) -> BoxFuture<'a, Result<(), NotifyError>> {
        Box::pin(async move {
            let message = self.build_message(order, submitter)?;

            self.transport
                .send(message)
                .await
                .map_err(|e| NotifyError::Delivery(e.to_string()))?;

            tracing::debug!(order_id = %order.id, "Notification email sent");
            Ok(())
        })
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::types::{NewOrder, OrderId};
    use chrono::Utc;
    use custom_orders_auth::IdentityProfile;

    fn order_and_submitter() -> (Order, Principal) {
        let principal = Principal::from_profile(
            IdentityProfile {
                external_id: "g".into(),
                email: "alice@example.com".into(),
                display_name: "Alice".into(),
            },
            Utc::now(),
        );
        let order = NewOrder::default()
            .into_draft(&principal, Utc::now())
            .into_order(OrderId::new());
        (order, principal)
    }

    #[tokio::test]
    async fn test_rejects_invalid_recipient() {
        let result = SmtpNotifier::new(
            "localhost",
            587,
            "shop@example.com".into(),
            "pw".into(),
            vec!["not an address".into()],
        );

        assert!(matches!(result, Err(NotifyError::InvalidAddress { .. })));
    }

    #[tokio::test]
    async fn test_message_addresses_every_admin() {
        let notifier = SmtpNotifier::new(
            "localhost",
            587,
            "shop@example.com".into(),
            "pw".into(),
            vec!["a@example.com".into(), "b@example.com".into()],
        )
        .unwrap();
        let (order, submitter) = order_and_submitter();

        let message = notifier.build_message(&order, &submitter).unwrap();
        let to: Vec<String> = message
            .envelope()
            .to()
            .iter()
            .map(ToString::to_string)
            .collect();

        assert_eq!(to, ["a@example.com", "b@example.com"]);
        assert_eq!(
            message.envelope().from().map(ToString::to_string).as_deref(),
            Some("shop@example.com")
        );
    }

    #[tokio::test]
    async fn test_no_recipients_is_an_error() {
        let notifier =
            SmtpNotifier::new("localhost", 587, "shop@example.com".into(), "pw".into(), vec![])
                .unwrap();
        let (order, submitter) = order_and_submitter();

        assert_eq!(
            notifier.notify_new_order(&order, &submitter).await,
            Err(NotifyError::NoRecipients)
        );
    }
}
