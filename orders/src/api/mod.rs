//! HTTP handlers.

pub mod metrics;
pub mod orders;
