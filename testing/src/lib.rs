//! # Custom Orders Testing
//!
//! Testing utilities for reducers and stores.
//!
//! This crate provides:
//! - A deterministic [`FixedClock`]
//! - The [`ReducerTest`] Given-When-Then harness
//! - Effect assertions and an effect driver that resolves `Effect::Future`s
//!
//! ## Example
//!
//! ```ignore
//! use custom_orders_testing::{test_clock, ReducerTest};
//!
//! ReducerTest::new(OrderLifecycleReducer::new())
//!     .with_env(test_environment())
//!     .given_state(LifecycleState::default())
//!     .when_action(OrderAction::CreateOrder { .. })
//!     .then_effects(|effects| assertions::assert_has_future_effect(effects))
//!     .run();
//! ```

use chrono::{DateTime, Utc};
use custom_orders_core::environment::Clock;

pub mod reducer_test;

/// Mock implementations of Environment traits.
pub mod mocks {
    use super::{Clock, DateTime, Utc};
    use std::sync::{Arc, Mutex};

    /// Fixed clock for deterministic tests
    ///
    /// Returns the same time until [`FixedClock::advance`] moves it.
    ///
    /// # Example
    ///
    /// ```
    /// use custom_orders_testing::mocks::FixedClock;
    /// use custom_orders_core::environment::Clock;
    /// use chrono::Utc;
    ///
    /// let clock = FixedClock::new(Utc::now());
    /// assert_eq!(clock.now(), clock.now());
    /// ```
    #[derive(Debug, Clone)]
    pub struct FixedClock {
        time: Arc<Mutex<DateTime<Utc>>>,
    }

    impl FixedClock {
        /// Create a new fixed clock with the given time
        #[must_use]
        pub fn new(time: DateTime<Utc>) -> Self {
            Self {
                time: Arc::new(Mutex::new(time)),
            }
        }

        /// Move the clock forward. Clones share the same time.
        pub fn advance(&self, by: chrono::Duration) {
            if let Ok(mut time) = self.time.lock() {
                *time += by;
            }
        }
    }

    impl Clock for FixedClock {
        fn now(&self) -> DateTime<Utc> {
            self.time
                .lock()
                .map_or_else(|poisoned| *poisoned.into_inner(), |time| *time)
        }
    }

    /// Create a default fixed clock for tests (2025-01-01 00:00:00 UTC)
    #[must_use]
    pub fn test_clock() -> FixedClock {
        FixedClock::new(DateTime::from_timestamp(1_735_689_600, 0).unwrap_or_default())
    }
}

/// Install a `tracing` subscriber that writes through the test harness.
///
/// Safe to call from every test; only the first call installs it.
pub fn init_test_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("warn")),
        )
        .with_test_writer()
        .try_init();
}

// Re-export commonly used items
pub use mocks::{FixedClock, test_clock};
pub use reducer_test::{ReducerTest, assertions, resolve_effects};
