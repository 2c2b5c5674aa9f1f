//! Input focus capability.

/// Moves keyboard focus between the boxes of a code entry screen.
///
/// The code entry reducer never touches input controls; it asks the UI layer
/// through this trait instead.
pub trait FocusRequester: Send + Sync {
    /// Focus the input at `index`.
    fn request_focus(&self, index: usize);
}
