//! # OctoMarket Testing
//!
//! Testing utilities and helpers for the OctoMarket client flows.
//!
//! This crate provides:
//! - Mock implementations of core Environment traits
//! - Given-When-Then reducer tests and effect assertions
//! - Store helpers for driving timers under paused tokio time
//! - Property-based testing strategies
//!
//! ## Example
//!
//! ```ignore
//! use octomarket_testing::{settle, test_clock};
//! use octomarket_runtime::Store;
//!
//! #[tokio::test(start_paused = true)]
//! async fn test_notice_hides() {
//!     let store = Store::new(NoticeState::default(), NoticeReducer, env);
//!
//!     store.send(NoticeAction::Show { .. }).await?;
//!     settle(&store).await;
//!
//!     assert!(!store.state(|s| s.visible).await);
//! }
//! ```

use chrono::{DateTime, Utc};
use octomarket_core::environment::Clock;

mod reducer_test;

pub use reducer_test::{ReducerTest, assertions};

/// Mock implementations for testing.
pub mod mocks {
    use super::{Clock, DateTime, Utc};

    /// Fixed clock for deterministic tests
    ///
    /// Always returns the same time, making tests reproducible.
    ///
    /// # Example
    ///
    /// ```
    /// use octomarket_testing::mocks::FixedClock;
    /// use octomarket_core::environment::Clock;
    /// use chrono::Utc;
    ///
    /// let clock = FixedClock::new(Utc::now());
    /// assert_eq!(clock.now(), clock.now());
    /// ```
    #[derive(Debug, Clone)]
    pub struct FixedClock {
        time: DateTime<Utc>,
    }

    impl FixedClock {
        /// Create a new fixed clock with the given time
        #[must_use]
        pub const fn new(time: DateTime<Utc>) -> Self {
            Self { time }
        }
    }

    impl Clock for FixedClock {
        fn now(&self) -> DateTime<Utc> {
            self.time
        }
    }

    /// Create a default fixed clock for tests (2025-01-01 00:00:00 UTC)
    ///
    /// # Panics
    ///
    /// This function will panic if the hardcoded timestamp fails to parse,
    /// which should never happen in practice.
    #[must_use]
    #[allow(clippy::expect_used)]
    pub fn test_clock() -> FixedClock {
        FixedClock::new(
            DateTime::parse_from_rfc3339("2025-01-01T00:00:00Z")
                .expect("hardcoded timestamp should always parse")
                .with_timezone(&Utc),
        )
    }
}

/// Helpers for driving a [`Store`](octomarket_runtime::Store) in tests
///
/// Intended for `#[tokio::test(start_paused = true)]`: sleeping on a paused
/// clock auto-advances it to the next timer, so a screen's delays elapse
/// instantly and in order.
pub mod helpers {
    use octomarket_core::reducer::Reducer;
    use octomarket_runtime::Store;
    use std::time::Duration;

    /// Upper bound on how long [`settle`] keeps advancing time
    pub const SETTLE_LIMIT: Duration = Duration::from_secs(120);

    /// Advance time until the store has no effect in flight
    ///
    /// Gives up after [`SETTLE_LIMIT`] of (virtual) time.
    pub async fn settle<S, A, E, R>(store: &Store<S, A, E, R>)
    where
        R: Reducer<State = S, Action = A, Environment = E> + Clone + Send + Sync + 'static,
        A: Send + Clone + 'static,
        S: Send + Sync + 'static,
        E: Clone + Send + Sync + 'static,
    {
        let start = tokio::time::Instant::now();
        while store.in_flight() > 0 && start.elapsed() < SETTLE_LIMIT {
            tokio::time::sleep(Duration::from_millis(10)).await;
        }
        // One more turn so the last fed-back action is reduced
        tokio::task::yield_now().await;
    }

    /// Advance (virtual) time by `duration`, letting due timers fire
    pub async fn advance(duration: Duration) {
        tokio::time::sleep(duration).await;
        tokio::task::yield_now().await;
    }

    /// Install a test-friendly tracing subscriber
    ///
    /// Safe to call from every test; only the first call installs it.
    pub fn init_tracing() {
        let _ = tracing_subscriber::fmt()
            .with_env_filter(
                tracing_subscriber::EnvFilter::try_from_default_env()
                    .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("warn")),
            )
            .with_test_writer()
            .try_init();
    }
}

/// Property-based testing strategies using proptest.
pub mod properties {
    use proptest::prelude::*;

    /// Strings shaped like `local@domain.tld` with no whitespace
    pub fn email_like() -> impl Strategy<Value = String> {
        ("[a-z0-9._]{1,12}", "[a-z0-9-]{1,12}", "[a-z]{2,6}")
            .prop_map(|(local, domain, tld)| format!("{local}@{domain}.{tld}"))
    }

    /// ASCII passwords of `min..=max` characters with at least one letter and one digit
    pub fn strong_password(min: usize, max: usize) -> impl Strategy<Value = String> {
        let min = min.max(2);
        let max = max.max(min);
        (
            "[a-zA-Z]",
            "[0-9]",
            proptest::collection::vec("[a-zA-Z0-9!?#]", (min - 2)..=(max - 2)),
        )
            .prop_map(|(letter, digit, rest)| format!("{letter}{digit}{}", rest.concat()))
    }

    /// ASCII strings made only of letters (no digit anywhere)
    pub fn letters_only(min: usize, max: usize) -> impl Strategy<Value = String> {
        proptest::collection::vec("[a-zA-Z]", min..=max).prop_map(|chars| chars.concat())
    }
}

// Re-export commonly used items
pub use helpers::{advance, init_tracing, settle};
pub use mocks::{FixedClock, test_clock};
