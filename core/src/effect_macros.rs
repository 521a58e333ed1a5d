//! Declarative macros for ergonomic effect construction

/// Create an `Effect::Future` from an async block
///
/// The block is wrapped in `async move`, so captured handles are moved in.
///
/// # Example
///
/// ```rust,ignore
/// use custom_orders_core::async_effect;
///
/// let orders = Arc::clone(&env.orders);
/// async_effect! {
///     match orders.find_by_id(order_id).await {
///         Ok(Some(order)) => Some(OrderAction::OrderLoaded { order, .. }),
///         Ok(None) => Some(OrderAction::OrderNotFound { order_id, .. }),
///         Err(e) => Some(OrderAction::OrderFailed { reason: e.to_string(), .. }),
///     }
/// }
/// ```
#[macro_export]
macro_rules! async_effect {
    ($($body:tt)*) => {
        $crate::effect::Effect::Future(
            ::std::boxed::Box::pin(async move { $($body)* })
        )
    };
}
