//! Mock focus capability for testing.

use crate::providers::FocusRequester;
use std::sync::{Arc, Mutex, PoisonError};

/// Focus capability that records every requested index.
#[derive(Debug, Clone, Default)]
pub struct RecordingFocus {
    requests: Arc<Mutex<Vec<usize>>>,
}

impl RecordingFocus {
    /// Create a recorder with no requests.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Every requested index, in order.
    #[must_use]
    pub fn requests(&self) -> Vec<usize> {
        self.requests
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }
}

impl FocusRequester for RecordingFocus {
    fn request_focus(&self, index: usize) {
        self.requests
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push(index);
    }
}
