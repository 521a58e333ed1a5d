//! Axum integration for the custom orders service.
//!
//! This crate is the imperative shell's toolbox: it turns HTTP requests into
//! values the functional core understands, and domain outcomes back into
//! responses.
//!
//! # Request Flow
//!
//! 1. **HTTP Request** arrives at an Axum handler
//! 2. **Extract** body ([`JsonOrForm`]), negotiation signal ([`WantsJson`]), [`CorrelationId`]
//! 3. **Build Action** and dispatch it through the `Store`
//! 4. **Map result** to a response, or to an [`AppError`]
//!
//! # Example
//!
//! ```ignore
//! use custom_orders_web::{AppError, JsonOrForm};
//!
//! async fn create_order(
//!     State(state): State<AppState>,
//!     JsonOrForm(body): JsonOrForm<CreateOrderBody>,
//! ) -> Result<Json<CreateOrderResponse>, AppError> {
//!     ...
//! }
//! ```

#![forbid(unsafe_code)]
#![warn(missing_docs, clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]

pub mod error;
pub mod extractors;
pub mod handlers;
pub mod middleware;

// Re-export key types for convenience
pub use error::AppError;
pub use extractors::{wants_json, CorrelationId, JsonOrForm, WantsJson};
pub use middleware::{correlation_id_layer, CORRELATION_ID_HEADER};

/// Result type alias for web handlers.
pub type WebResult<T> = Result<T, AppError>;
