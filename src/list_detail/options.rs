use std::time::Duration;

use crate::model::Breakpoint;

/// Mount-time and presentation behavior of a [`ListDetail`](super::ListDetail).
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct ListDetailOptions {
    /// Item to select on mount.
    pub initial_id: Option<String>,
    /// How long after mount the initial selection happens.
    pub initial_select_delay: Duration,
    /// Select the first item on mount when `initial_id` is absent.
    pub first_by_default: bool,
    /// Breakpoints at which the detail is shown as a dialog instead of an
    /// inline pane.
    pub dialog_breakpoints: Vec<Breakpoint>,
}

impl ListDetailOptions {
    pub fn initial_id(mut self, id: impl Into<String>) -> Self {
        self.initial_id = Some(id.into());
        self
    }

    pub fn initial_select_delay(mut self, delay: Duration) -> Self {
        self.initial_select_delay = delay;
        self
    }

    pub fn first_by_default(mut self) -> Self {
        self.first_by_default = true;
        self
    }

    pub fn dialog_breakpoints(mut self, breakpoints: impl IntoIterator<Item = Breakpoint>) -> Self {
        self.dialog_breakpoints = breakpoints.into_iter().collect();
        self
    }
}
