//! Mock navigator for testing.

use crate::error::{FlowError, Result};
use crate::providers::Navigator;
use crate::state::{Navigation, Route};
use std::future::Future;
use std::sync::{Arc, Mutex, PoisonError};

/// One call made on a [`RecordingNavigator`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum NavigationRecord {
    /// `navigate` was called.
    Navigated(Navigation),
    /// `back` was called.
    Back,
}

/// Navigator that records every call in order.
#[derive(Debug, Clone, Default)]
pub struct RecordingNavigator {
    history: Arc<Mutex<Vec<NavigationRecord>>>,
}

impl RecordingNavigator {
    /// Create a navigator with an empty history.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Every call so far.
    #[must_use]
    pub fn history(&self) -> Vec<NavigationRecord> {
        self.history
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    /// Every `navigate` call so far, without the `back` calls.
    #[must_use]
    pub fn navigations(&self) -> Vec<Navigation> {
        self.history()
            .into_iter()
            .filter_map(|record| match record {
                NavigationRecord::Navigated(navigation) => Some(navigation),
                NavigationRecord::Back => None,
            })
            .collect()
    }

    /// The route of the latest `navigate` call.
    #[must_use]
    pub fn current_route(&self) -> Option<Route> {
        self.navigations().last().map(|navigation| navigation.route)
    }

    fn record(&self, record: NavigationRecord) -> Result<()> {
        self.history
            .lock()
            .map_err(|_| FlowError::Internal("Mutex lock failed".to_string()))?
            .push(record);
        Ok(())
    }
}

impl Navigator for RecordingNavigator {
    fn navigate(&self, navigation: Navigation) -> impl Future<Output = Result<()>> + Send {
        let result = self.record(NavigationRecord::Navigated(navigation));
        async move { result }
    }

    fn back(&self) -> impl Future<Output = Result<()>> + Send {
        let result = self.record(NavigationRecord::Back);
        async move { result }
    }
}
