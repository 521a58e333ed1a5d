//! Router configuration.

use super::state::AppState;
use crate::api::{metrics, orders};
use axum::{
    response::Redirect,
    routing::{get, post},
    Router,
};
use custom_orders_auth::auth_router;
use custom_orders_web::{correlation_id_layer, handlers::health_check};
use tower_http::trace::TraceLayer;

/// Build the complete Axum router.
///
/// # Routes
///
/// - `GET /health`, `GET /metrics`
/// - Sign-in routes from [`auth_router`]
/// - `POST /orders`, `GET /orders/mine` (authenticated)
/// - `GET /orders`, `POST /orders/:id/decision` (admin)
/// - `GET /` redirects to the caller's own orders
pub fn build_router(state: AppState) -> Router {
    let order_routes = Router::new()
        .route("/orders", post(orders::create_order).get(orders::list_all))
        .route("/orders/mine", get(orders::list_mine))
        .route("/orders/:id/decision", post(orders::decide_order));

    Router::new()
        .route("/", get(|| async { Redirect::to("/orders/mine") }))
        .route("/health", get(health_check))
        .route("/metrics", get(metrics::render))
        .merge(auth_router())
        .merge(order_routes)
        .layer(TraceLayer::new_for_http())
        .layer(correlation_id_layer())
        .with_state(state)
}
