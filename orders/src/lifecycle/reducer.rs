//! Reducer for the order lifecycle.

use super::{OrderAction, OrderEnvironment};
use crate::metrics::{record_decision, record_notification_failed, record_order_created};
use crate::types::Decision;
use custom_orders_core::{async_effect, effect::Effect, reducer::Reducer, smallvec, SmallVec};
use std::sync::Arc;

/// Lifecycle counters. Orders themselves live in the repository.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LifecycleState {
    /// Orders persisted since startup.
    pub created: u64,
    /// Decisions saved since startup.
    pub decided: u64,
    /// Notifications that failed or timed out.
    pub notifications_failed: u64,
    /// Most recent repository failure.
    pub last_error: Option<String>,
}

/// Reducer driving order creation and decisions.
#[derive(Debug, Clone, Copy, Default)]
pub struct OrderLifecycleReducer;

impl OrderLifecycleReducer {
    /// Create a new reducer.
    #[must_use]
    pub const fn new() -> Self {
        Self
    }
}

impl Reducer for OrderLifecycleReducer {
    type State = LifecycleState;
    type Action = OrderAction;
    type Environment = OrderEnvironment;

    #[allow(clippy::too_many_lines)] // one arm per action
    fn reduce(
        &self,
        state: &mut Self::State,
        action: Self::Action,
        env: &Self::Environment,
    ) -> SmallVec<[Effect<Self::Action>; 4]> {
        match action {
            OrderAction::CreateOrder {
                correlation_id,
                principal,
                request,
            } => {
                let draft = request.into_draft(&principal, env.clock.now());
                let orders = Arc::clone(&env.orders);

                smallvec![async_effect! {
                    match orders.insert(draft).await {
                        Ok(order) => Some(OrderAction::OrderCreated {
                            correlation_id,
                            order,
                            submitter: principal,
                        }),
                        Err(e) => Some(OrderAction::OrderFailed {
                            correlation_id,
                            reason: e.to_string(),
                        }),
                    }
                }]
            }

            OrderAction::OrderCreated {
                correlation_id,
                order,
                submitter,
            } => {
                state.created += 1;
                record_order_created();
                tracing::info!(
                    %correlation_id,
                    order_id = %order.id,
                    principal_id = %submitter.id,
                    title = %order.title,
                    "Order created"
                );

                let notifier = Arc::clone(&env.notifier);
                let timeout = env.notify_timeout;

                smallvec![async_effect! {
                    let order_id = order.id;
                    let outcome =
                        tokio::time::timeout(timeout, notifier.notify_new_order(&order, &submitter))
                            .await;

                    Some(match outcome {
                        Ok(Ok(())) => OrderAction::NotificationSent {
                            correlation_id,
                            order_id,
                        },
                        Ok(Err(e)) => OrderAction::NotificationFailed {
                            correlation_id,
                            order_id,
                            reason: e.to_string(),
                        },
                        Err(_) => OrderAction::NotificationFailed {
                            correlation_id,
                            order_id,
                            reason: format!("timed out after {}s", timeout.as_secs_f64()),
                        },
                    })
                }]
            }

            OrderAction::NotificationSent {
                correlation_id,
                order_id,
            } => {
                tracing::debug!(%correlation_id, %order_id, "Admins notified");
                SmallVec::new()
            }

            OrderAction::NotificationFailed {
                correlation_id,
                order_id,
                reason,
            } => {
                state.notifications_failed += 1;
                record_notification_failed();
                tracing::warn!(%correlation_id, %order_id, %reason, "Order notification failed");
                SmallVec::new()
            }

            OrderAction::DecideOrder {
                correlation_id,
                order_id,
                decision,
            } => {
                let orders = Arc::clone(&env.orders);

                smallvec![async_effect! {
                    match orders.find_by_id(order_id).await {
                        Ok(Some(order)) => Some(OrderAction::OrderLoaded {
                            correlation_id,
                            order,
                            decision,
                        }),
                        Ok(None) => Some(OrderAction::OrderNotFound {
                            correlation_id,
                            order_id,
                        }),
                        Err(e) => Some(OrderAction::OrderFailed {
                            correlation_id,
                            reason: e.to_string(),
                        }),
                    }
                }]
            }

            OrderAction::OrderLoaded {
                correlation_id,
                mut order,
                decision,
            } => {
                // Writing back an unchanged snapshot could undo a concurrent decision.
                if matches!(decision, Decision::NoOp) {
                    return smallvec![async_effect! {
                        Some(OrderAction::OrderDecided {
                            correlation_id,
                            order,
                            decision,
                        })
                    }];
                }

                decision.apply(&mut order);
                let orders = Arc::clone(&env.orders);

                smallvec![async_effect! {
                    match orders.save(order).await {
                        Ok(order) => Some(OrderAction::OrderDecided {
                            correlation_id,
                            order,
                            decision,
                        }),
                        Err(e) => Some(OrderAction::OrderFailed {
                            correlation_id,
                            reason: e.to_string(),
                        }),
                    }
                }]
            }

            OrderAction::OrderNotFound {
                correlation_id,
                order_id,
            } => {
                tracing::debug!(%correlation_id, %order_id, "Decision on unknown order");
                SmallVec::new()
            }

            OrderAction::OrderDecided {
                correlation_id,
                order,
                decision,
            } => {
                state.decided += 1;
                record_decision(&decision);
                tracing::info!(
                    %correlation_id,
                    order_id = %order.id,
                    decision = decision.label(),
                    status = %order.status,
                    "Order decided"
                );
                SmallVec::new()
            }

            OrderAction::OrderFailed {
                correlation_id,
                reason,
            } => {
                tracing::error!(%correlation_id, %reason, "Order store operation failed");
                state.last_error = Some(reason);
                SmallVec::new()
            }
        }
    }
}
