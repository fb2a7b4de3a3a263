//! Actions returned by screen event handlers.

use crate::model::Student;

use super::app::Screen;

/// An action that a screen handler returns to the [`App`](super::App).
///
/// The `App` interprets these to update global state and navigate between
/// screens.
#[derive(Debug, Clone, PartialEq)]
pub enum Action {
    /// No state change needed.
    None,
    /// Navigate to the given screen.
    Navigate(Screen),
    /// Open the record with the given ID for editing.
    Edit(String),
    /// Persist an edited student profile.
    SaveStudent(Student),
    /// Quit the application.
    Quit,
}
