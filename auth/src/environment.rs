//! Flow environment.
//!
//! This module defines the environment type for dependency injection
//! in flow reducers.

use crate::config::FlowConfig;
use crate::providers::{FocusRequester, KeyValueStore, Navigator};
use crate::validation::PasswordPolicy;
use octomarket_core::environment::Clock;
use std::sync::Arc;

/// Flow environment.
///
/// Contains all external collaborators needed by flow reducers.
///
/// # Type Parameters
///
/// - `S`: Persisted key-value store
/// - `N`: Navigator
/// - `F`: Focus capability
/// - `C`: Clock
#[derive(Clone)]
pub struct FlowEnvironment<S, N, F, C>
where
    S: KeyValueStore + Clone,
    N: Navigator + Clone,
    F: FocusRequester + Clone,
    C: Clock + Clone,
{
    /// Launch flag and session token storage.
    pub storage: S,

    /// Screen router.
    pub navigator: N,

    /// Input focus capability.
    pub focus: F,

    /// Clock for timestamps.
    pub clock: C,

    /// Timings and policy.
    pub config: Arc<FlowConfig>,
}

impl<S, N, F, C> FlowEnvironment<S, N, F, C>
where
    S: KeyValueStore + Clone,
    N: Navigator + Clone,
    F: FocusRequester + Clone,
    C: Clock + Clone,
{
    /// Create a new flow environment with the default configuration.
    #[must_use]
    pub fn new(storage: S, navigator: N, focus: F, clock: C) -> Self {
        Self {
            storage,
            navigator,
            focus,
            clock,
            config: Arc::new(FlowConfig::default()),
        }
    }

    /// Replace the configuration.
    #[must_use]
    pub fn with_config(mut self, config: FlowConfig) -> Self {
        self.config = Arc::new(config);
        self
    }

    /// Password policy derived from the configuration.
    #[must_use]
    pub fn password_policy(&self) -> PasswordPolicy {
        PasswordPolicy::new(self.config.password_min_length)
    }
}

#[cfg(feature = "test-utils")]
mod test_env {
    use super::FlowEnvironment;
    use crate::mocks::{InMemoryKeyValueStore, RecordingFocus, RecordingNavigator};
    use octomarket_core::environment::SystemClock;

    /// Environment wired to the in-memory mocks.
    pub type MockEnvironment =
        FlowEnvironment<InMemoryKeyValueStore, RecordingNavigator, RecordingFocus, SystemClock>;

    impl MockEnvironment {
        /// Environment backed by fresh in-memory mocks.
        #[must_use]
        pub fn in_memory() -> Self {
            FlowEnvironment::new(
                InMemoryKeyValueStore::new(),
                RecordingNavigator::new(),
                RecordingFocus::new(),
                SystemClock,
            )
        }
    }
}

#[cfg(feature = "test-utils")]
pub use test_env::MockEnvironment;
