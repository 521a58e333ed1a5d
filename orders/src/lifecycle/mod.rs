//! Order lifecycle: creation, notification and administrative decisions.
//!
//! # Flow
//!
//! ```text
//! CreateOrder ──insert──▶ OrderCreated ──notify (bounded)──▶ NotificationSent
//!      │                                              └────▶ NotificationFailed
//!      └────────────────▶ OrderFailed
//!
//! DecideOrder ──find──▶ OrderLoaded ──apply + save──▶ OrderDecided
//!      ├──────────────▶ OrderNotFound                └──▶ OrderFailed
//!      └──────────────▶ OrderFailed
//! ```
//!
//! The reducer owns no order data. Every state-changing operation goes
//! through it so the effects (persist, notify) run under the store's
//! tracking and drain on shutdown. Reads go straight to the repository
//! through [`OrderQueries`](crate::queries::OrderQueries).

pub mod actions;
pub mod environment;
pub mod reducer;

pub use actions::OrderAction;
pub use environment::OrderEnvironment;
pub use reducer::{LifecycleState, OrderLifecycleReducer};

use custom_orders_runtime::Store;

/// The store type the HTTP layer dispatches into.
pub type OrderStore = Store<LifecycleState, OrderAction, OrderEnvironment, OrderLifecycleReducer>;
