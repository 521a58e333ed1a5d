//! Business metrics for the order service.
//!
//! # Exported Metrics
//!
//! - `orders.created.total`: orders persisted
//! - `orders.decided.total{decision}`: decisions saved, by `approve`, `disapprove`, `noop`
//! - `orders.notifications.failed.total`: admin notifications that failed or timed out
//!
//! The store runtime adds its own `store.*` counters and histograms.

use crate::types::Decision;
use metrics::{counter, describe_counter};
use metrics_exporter_prometheus::{Matcher, PrometheusBuilder, PrometheusHandle};
use thiserror::Error;

/// Counter: orders persisted.
pub const ORDERS_CREATED: &str = "orders.created.total";
/// Counter: decisions saved, labelled by `decision`.
pub const ORDERS_DECIDED: &str = "orders.decided.total";
/// Counter: failed or timed-out notifications.
pub const NOTIFICATIONS_FAILED: &str = "orders.notifications.failed.total";

/// Metrics exporter errors.
#[derive(Error, Debug)]
pub enum MetricsError {
    /// Failed to configure the exporter.
    #[error("Failed to build metrics exporter: {0}")]
    Build(String),
    /// Failed to install the global recorder.
    #[error("Failed to install metrics exporter: {0}")]
    Install(String),
}

/// Register metric descriptions.
pub fn register_business_metrics() {
    describe_counter!(ORDERS_CREATED, "Total number of orders created");
    describe_counter!(
        ORDERS_DECIDED,
        "Total number of admin decisions saved, by decision"
    );
    describe_counter!(
        NOTIFICATIONS_FAILED,
        "Total number of new-order notifications that failed or timed out"
    );

    tracing::debug!("Business metrics registered");
}

/// Install the Prometheus recorder and return the handle `/metrics` renders.
///
/// # Errors
///
/// Returns [`MetricsError::Install`] if a global recorder is already installed.
pub fn install_prometheus() -> Result<PrometheusHandle, MetricsError> {
    let handle = PrometheusBuilder::new()
        .set_buckets_for_metric(
            Matcher::Suffix("duration_seconds".to_string()),
            &[
                0.001, 0.005, 0.01, 0.025, 0.05, 0.1, 0.25, 0.5, 1.0, 2.5, 5.0, 10.0,
            ],
        )
        .map_err(|e| MetricsError::Build(e.to_string()))?
        .install_recorder()
        .map_err(|e| MetricsError::Install(e.to_string()))?;

    register_business_metrics();
    Ok(handle)
}

pub(crate) fn record_order_created() {
    counter!(ORDERS_CREATED).increment(1);
}

pub(crate) fn record_decision(decision: &Decision) {
    counter!(ORDERS_DECIDED, "decision" => decision.label()).increment(1);
}

pub(crate) fn record_notification_failed() {
    counter!(NOTIFICATIONS_FAILED).increment(1);
}
