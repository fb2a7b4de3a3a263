//! Snackbar widget: one-line transient notices at the bottom of the screen.

use std::cell::RefCell;
use std::rc::Rc;
use std::time::{Duration, Instant};

use ratatui::Frame;
use ratatui::layout::Rect;
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::Paragraph;
use tracing::info;

use crate::form::{Notice, Notifier, Severity};

/// How long a notice stays visible.
pub const NOTICE_TTL: Duration = Duration::from_secs(4);

/// Shared slot for the most recent notice.
///
/// Clones share the same slot, so a clone handed to a form controller as
/// its [`Notifier`] posts to the bar the app draws.
#[derive(Debug, Clone, Default)]
pub struct Snackbar {
    current: Rc<RefCell<Option<(Notice, Instant)>>>,
}

impl Snackbar {
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the notice currently shown, if any.
    pub fn current(&self) -> Option<Notice> {
        self.current.borrow().as_ref().map(|(notice, _)| notice.clone())
    }

    /// Clears the notice once it has been shown for [`NOTICE_TTL`].
    pub fn expire(&self, now: Instant) {
        let mut current = self.current.borrow_mut();
        if let Some((_, posted)) = current.as_ref()
            && now.saturating_duration_since(*posted) >= NOTICE_TTL
        {
            *current = None;
        }
    }
}

impl Notifier for Snackbar {
    fn notify(&self, notice: Notice) {
        info!(severity = ?notice.severity, message = %notice.message, "notice");
        *self.current.borrow_mut() = Some((notice, Instant::now()));
    }
}

/// Renders the current notice, or nothing when there is none.
#[mutants::skip]
pub fn draw_snackbar(snackbar: &Snackbar, frame: &mut Frame, area: Rect) {
    let Some(notice) = snackbar.current() else {
        return;
    };

    let (marker, color) = match notice.severity {
        Severity::Info => ("i", Color::Cyan),
        Severity::Success => ("✓", Color::Green),
        Severity::Error => ("!", Color::Red),
    };

    let line = Line::from(vec![
        Span::styled(
            format!(" {marker} "),
            Style::default().fg(color).add_modifier(Modifier::BOLD),
        ),
        Span::styled(notice.message, Style::default().fg(color)),
    ]);
    frame.render_widget(Paragraph::new(line), area);
}
