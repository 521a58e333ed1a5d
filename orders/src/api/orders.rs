//! Order endpoints.
//!
//! State-changing requests dispatch a command into the lifecycle store and
//! wait for the terminal action carrying their correlation id. Listings read
//! through [`OrderQueries`](crate::queries::OrderQueries).

use crate::lifecycle::OrderAction;
use crate::server::AppState;
use crate::types::{Decision, NewOrder, Order, OrderId};
use axum::{
    extract::{Path, State},
    response::{IntoResponse, Redirect, Response},
    Json,
};
use custom_orders_auth::extractors::{RequireAdmin, RequireAuthenticated};
use custom_orders_runtime::{ActionStream, StoreError};
use custom_orders_web::{AppError, CorrelationId, JsonOrForm, WantsJson};
use serde::{Deserialize, Serialize};
use std::time::Duration;

const APPROVE_ACTION: &str = "approve";

/// Where browser clients land after a decision.
pub const ADMIN_LISTING_PATH: &str = "/orders";

/// Response for `POST /orders`.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct CreateOrderResponse {
    /// Always `true`; failures are error responses.
    pub success: bool,
    /// Id of the stored order.
    pub order_id: OrderId,
    /// Whether the admin notification went out.
    pub notified: bool,
}

/// A price as submitted: a JSON number, or text from a form field.
#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
pub enum PriceInput {
    /// JSON number.
    Number(f64),
    /// Form or JSON string.
    Text(String),
}

impl PriceInput {
    /// Blank text means "no price".
    fn parse(self) -> Result<Option<f64>, AppError> {
        match self {
            Self::Number(price) => Ok(Some(price)),
            Self::Text(raw) if raw.trim().is_empty() => Ok(None),
            Self::Text(raw) => raw
                .trim()
                .parse::<f64>()
                .ok()
                .filter(|p| p.is_finite())
                .map(Some)
                .ok_or_else(|| AppError::bad_request(format!("Invalid price: {raw}"))),
        }
    }
}

/// Body of `POST /orders/:id/decision`.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct DecisionBody {
    /// `approve`, `disapprove`, anything else is a no-op.
    pub action: Option<String>,
    /// Price to set on approval.
    pub price: Option<PriceInput>,
    /// Admin comments.
    pub comments: Option<String>,
}

impl DecisionBody {
    /// Decode into a [`Decision`].
    ///
    /// The price is only read for `approve`; every other action ignores it.
    ///
    /// # Errors
    ///
    /// 400 if an approval carries a `price` that is not a number.
    pub fn into_decision(self) -> Result<Decision, AppError> {
        let price = match self.action.as_deref() {
            Some(APPROVE_ACTION) => self.price.map(PriceInput::parse).transpose()?.flatten(),
            _ => None,
        };
        Ok(Decision::decode(
            self.action.as_deref(),
            price,
            self.comments,
        ))
    }
}

fn store_error(error: StoreError) -> AppError {
    match error {
        StoreError::Timeout => AppError::timeout("Order processing timed out"),
        StoreError::ShutdownInProgress => AppError::unavailable("Service is shutting down"),
        other => AppError::internal("Order processing failed").with_source(other),
    }
}

fn unexpected(action: &OrderAction) -> AppError {
    AppError::internal("Order processing failed")
        .with_source(anyhow::anyhow!("unexpected terminal action: {action:?}"))
}

/// `POST /orders`
///
/// # Request
///
/// JSON or form: `{ "title"?: string, "description"?: string }`
///
/// # Response
///
/// `200 { "success": true, "orderId": "...", "notified": bool }` once the
/// order is stored. A failed, slow or missing notification still reports
/// success with `notified: false`; a failed insert is a 500.
///
/// # Errors
///
/// 401 or redirect when signed out, 500 on store failure, 504 when the insert
/// has not reported back within the request timeout.
#[tracing::instrument(
    skip(state, correlation_id, principal, body),
    fields(correlation_id = %correlation_id.0, principal_id = %principal.id)
)]
pub async fn create_order(
    State(state): State<AppState>,
    correlation_id: CorrelationId,
    RequireAuthenticated(principal): RequireAuthenticated,
    JsonOrForm(body): JsonOrForm<NewOrder>,
) -> Result<Json<CreateOrderResponse>, AppError> {
    let correlation_id = correlation_id.0;

    let outcomes = state
        .store
        .send_and_observe(
            OrderAction::CreateOrder {
                correlation_id,
                principal,
                request: body,
            },
            move |a| a.correlation_id() == correlation_id,
        )
        .await
        .map_err(store_error)?;

    let (order_id, notified) = await_creation(outcomes, state.request_timeout).await?;

    Ok(Json(CreateOrderResponse {
        success: true,
        order_id,
        notified,
    }))
}

/// Follow one creation until its notification settles or the deadline passes.
///
/// `OrderCreated` is the success point: after it, running out of time or
/// losing the stream only downgrades `notified` to `false`.
async fn await_creation(
    mut outcomes: ActionStream<OrderAction>,
    timeout: Duration,
) -> Result<(OrderId, bool), AppError> {
    let deadline = tokio::time::Instant::now() + timeout;
    let mut created = None;

    loop {
        let next = match tokio::time::timeout_at(deadline, outcomes.recv()).await {
            Ok(next) => next,
            Err(_) => {
                return created
                    .map(|order_id| {
                        tracing::warn!(%order_id, "Notification outcome missed the request deadline");
                        (order_id, false)
                    })
                    .ok_or_else(|| store_error(StoreError::Timeout));
            }
        };

        match next {
            Some(OrderAction::OrderCreated { order, .. }) => created = Some(order.id),
            Some(OrderAction::NotificationSent { order_id, .. }) => return Ok((order_id, true)),
            Some(OrderAction::NotificationFailed { order_id, .. }) => return Ok((order_id, false)),
            Some(OrderAction::OrderFailed { reason, .. }) => {
                return Err(AppError::internal("Failed to create order")
                    .with_source(anyhow::anyhow!(reason)));
            }
            Some(other) => return Err(unexpected(&other)),
            None => {
                return created
                    .map(|order_id| (order_id, false))
                    .ok_or_else(|| store_error(StoreError::ChannelClosed));
            }
        }
    }
}

/// `GET /orders/mine`
///
/// # Errors
///
/// 401 or redirect when signed out, 500 on store failure.
#[tracing::instrument(skip(state, principal), fields(principal_id = %principal.id))]
pub async fn list_mine(
    State(state): State<AppState>,
    RequireAuthenticated(principal): RequireAuthenticated,
) -> Result<Json<Vec<Order>>, AppError> {
    let orders = state.queries.list_own(&principal).await.map_err(|e| {
        AppError::internal("Failed to load orders").with_source(e)
    })?;
    Ok(Json(orders))
}

/// `GET /orders` (admin)
///
/// At most 200 orders, newest first.
///
/// # Errors
///
/// Redirect when signed out, 403 for non-admins, 500 on store failure.
#[tracing::instrument(skip(state, admin), fields(principal_id = %admin.id))]
pub async fn list_all(
    State(state): State<AppState>,
    RequireAdmin(admin): RequireAdmin,
) -> Result<Json<Vec<Order>>, AppError> {
    let orders = state
        .queries
        .list_all()
        .await
        .map_err(|e| AppError::internal("Failed to load orders").with_source(e))?;
    Ok(Json(orders))
}

/// `POST /orders/:id/decision` (admin)
///
/// # Request
///
/// JSON or form: `{ "action": "approve" | "disapprove" | .., "price"?: number, "comments"?: string }`
///
/// # Response
///
/// JSON clients get `200` with the updated order; browsers get `303` to
/// `/orders`. An unrecognized action leaves the order unchanged.
///
/// # Errors
///
/// 404 for an unknown or malformed id, 400 for a non-numeric price,
/// 500 on store failure.
#[tracing::instrument(
    skip(state, correlation_id, admin, body),
    fields(correlation_id = %correlation_id.0, principal_id = %admin.id)
)]
pub async fn decide_order(
    State(state): State<AppState>,
    correlation_id: CorrelationId,
    RequireAdmin(admin): RequireAdmin,
    Path(id): Path<String>,
    WantsJson(wants_json): WantsJson,
    JsonOrForm(body): JsonOrForm<DecisionBody>,
) -> Result<Response, AppError> {
    let order_id = OrderId::parse(&id).ok_or_else(|| AppError::not_found("Order", &id))?;
    let decision = body.into_decision()?;
    let correlation_id = correlation_id.0;

    let outcome = state
        .store
        .send_and_wait_for(
            OrderAction::DecideOrder {
                correlation_id,
                order_id,
                decision,
            },
            move |a| a.correlation_id() == correlation_id && a.ends_decision(),
            state.request_timeout,
        )
        .await
        .map_err(store_error)?;

    match outcome {
        OrderAction::OrderDecided { order, .. } if wants_json => Ok(Json(order).into_response()),
        OrderAction::OrderDecided { .. } => Ok(Redirect::to(ADMIN_LISTING_PATH).into_response()),
        OrderAction::OrderNotFound { order_id, .. } => Err(AppError::not_found("Order", order_id)),
        OrderAction::OrderFailed { reason, .. } => Err(AppError::internal(
            "Failed to update order",
        )
        .with_source(anyhow::anyhow!(reason))),
        other => Err(unexpected(&other)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn body(action: &str, price: Option<PriceInput>) -> DecisionBody {
        DecisionBody {
            action: Some(action.to_string()),
            price,
            comments: None,
        }
    }

    #[test]
    fn test_price_text_and_number() {
        assert_eq!(
            body("approve", Some(PriceInput::Text("12.5".into())))
                .into_decision()
                .ok(),
            Some(Decision::Approve {
                price: Some(12.5),
                comments: None
            })
        );
        assert_eq!(
            body("approve", Some(PriceInput::Number(3.0))).into_decision().ok(),
            Some(Decision::Approve {
                price: Some(3.0),
                comments: None
            })
        );
        assert_eq!(
            body("approve", Some(PriceInput::Text(String::new())))
                .into_decision()
                .ok(),
            Some(Decision::Approve {
                price: None,
                comments: None
            })
        );
    }

    #[test]
    fn test_non_numeric_price_is_bad_request() {
        let error = body("approve", Some(PriceInput::Text("cheap".into())))
            .into_decision()
            .err();

        assert_eq!(
            error.map(|e| e.status()),
            Some(axum::http::StatusCode::BAD_REQUEST)
        );
    }

    #[test]
    fn test_price_is_not_parsed_for_other_actions() {
        assert_eq!(
            body("disapprove", Some(PriceInput::Text("cheap".into())))
                .into_decision()
                .ok(),
            Some(Decision::Disapprove { comments: None })
        );
        assert_eq!(
            body("archive", Some(PriceInput::Text("cheap".into())))
                .into_decision()
                .ok(),
            Some(Decision::NoOp)
        );
    }

    #[test]
    fn test_form_body_decodes_price_as_text() {
        let body: DecisionBody =
            serde_urlencoded::from_str("action=approve&price=7&comments=ok").unwrap_or_default();

        assert_eq!(
            body.into_decision().ok(),
            Some(Decision::Approve {
                price: Some(7.0),
                comments: Some("ok".into())
            })
        );
    }
}
