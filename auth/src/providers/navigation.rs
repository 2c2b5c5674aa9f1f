//! Navigation trait.

use crate::error::Result;
use crate::state::Navigation;

/// Screen router.
pub trait Navigator: Send + Sync {
    /// Transition to `navigation.route`.
    ///
    /// `Replace` leaves no back-stack entry; `Push` does. The optional email is
    /// handed to the next screen as its only parameter.
    ///
    /// # Errors
    ///
    /// Returns `FlowError::Navigation` if the transition is rejected.
    fn navigate(&self, navigation: Navigation) -> impl std::future::Future<Output = Result<()>> + Send;

    /// Pop the current screen.
    ///
    /// # Errors
    ///
    /// Returns `FlowError::Navigation` if there is nothing to go back to.
    fn back(&self) -> impl std::future::Future<Output = Result<()>> + Send;
}
