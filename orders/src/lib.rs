//! # Custom Orders
//!
//! Intake and moderation of custom orders: signed-in users submit orders,
//! administrators approve or reject them, and admins get an email for every
//! new order.
//!
//! ## Architecture
//!
//! ```text
//! HTTP ──▶ api handlers ──send_and_wait_for──▶ Store<OrderLifecycleReducer>
//!   │                                              │ effects
//!   │                                              ├──▶ OrderRepository (insert/find/save)
//!   │                                              └──▶ Notifier (bounded by notify_timeout)
//!   └──▶ OrderQueries ──▶ OrderRepository (listings)
//! ```
//!
//! - [`types`]: `Order`, `OrderStatus`, `Decision` and its merge
//! - [`lifecycle`]: actions, environment and reducer
//! - [`repository`], [`notifier`]: the effectful dependencies
//! - [`server`], [`api`]: Axum router and handlers
//! - [`bootstrap`], [`config`], [`metrics`]: process wiring

#![deny(missing_docs)]
#![deny(clippy::unwrap_used)]
#![deny(clippy::expect_used)]
#![deny(clippy::panic)]
#![deny(clippy::todo)]
#![deny(clippy::unimplemented)]

pub mod api;
pub mod bootstrap;
pub mod config;
pub mod lifecycle;
pub mod metrics;
pub mod notifier;
pub mod queries;
pub mod repository;
pub mod server;
pub mod types;

pub use config::Config;
pub use lifecycle::{LifecycleState, OrderAction, OrderEnvironment, OrderLifecycleReducer, OrderStore};
pub use queries::{OrderQueries, ADMIN_LISTING_LIMIT};
pub use server::{build_router, AppState};
pub use types::{Decision, NewOrder, Order, OrderDraft, OrderId, OrderStatus};
