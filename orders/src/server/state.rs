//! Shared application state.

use crate::lifecycle::OrderStore;
use crate::queries::OrderQueries;
use axum::extract::FromRef;
use custom_orders_auth::AuthContext;
use metrics_exporter_prometheus::PrometheusHandle;
use std::sync::Arc;
use std::time::Duration;

/// State handed to every handler. Cheap to clone.
#[derive(Clone)]
pub struct AppState {
    /// Lifecycle store for state-changing operations.
    pub store: Arc<OrderStore>,
    /// Read-side listings.
    pub queries: OrderQueries,
    /// Sessions, principals and the admin allow-list.
    pub auth: AuthContext,
    /// Prometheus handle; `/metrics` is unavailable without it.
    pub metrics: Option<PrometheusHandle>,
    /// How long a handler waits for its terminal action.
    pub request_timeout: Duration,
}

impl FromRef<AppState> for AuthContext {
    fn from_ref(state: &AppState) -> Self {
        state.auth.clone()
    }
}
