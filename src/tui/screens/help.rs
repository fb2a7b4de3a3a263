//! Help screen: the keys of the screen that opened it, then the global keys.

use crossterm::event::{KeyCode, KeyEvent};
use ratatui::Frame;
use ratatui::layout::{Constraint, Layout, Rect};
use ratatui::style::{Color, Modifier, Style};
use ratatui::widgets::{Block, Borders, Cell, Paragraph, Row, Table};

use crate::tui::action::Action;
use crate::tui::app::Screen;

type Bindings = &'static [(&'static str, &'static str)];

const LOOKUP_KEYS: Bindings = &[
    ("↑/↓", "move selection"),
    ("Home / End", "first / last entry"),
    ("Enter", "reopen details (narrow terminals)"),
    ("Esc", "close details"),
    ("r", "reload details"),
];

const GLOBAL_KEYS: Bindings = &[("F1", "this help"), ("q", "quit (lookup screens)")];

/// One line of the help table.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum HelpRow {
    Heading(&'static str),
    Binding(&'static str, &'static str),
}

const STUDENT_KEYS: Bindings = &[("e", "edit the selected profile"), ("Tab", "teachers")];

const TEACHER_KEYS: Bindings = &[("Tab", "students")];

const PROFILE_EDIT_KEYS: Bindings = &[
    ("Tab / Shift-Tab", "next / previous field"),
    ("Backspace", "delete last character"),
    ("Enter", "save profile"),
    ("Esc", "discard changes"),
];

const HELP_KEYS: Bindings = &[("↑/↓ PgUp/PgDn", "scroll"), ("Esc", "back")];

fn screen_keys(screen: Screen) -> Vec<Bindings> {
    match screen {
        Screen::StudentLookup => vec![LOOKUP_KEYS, STUDENT_KEYS],
        Screen::TeacherLookup => vec![LOOKUP_KEYS, TEACHER_KEYS],
        Screen::ProfileEdit => vec![PROFILE_EDIT_KEYS],
        Screen::Help => vec![HELP_KEYS],
    }
}

fn screen_name(screen: Screen) -> &'static str {
    match screen {
        Screen::StudentLookup => "Students",
        Screen::TeacherLookup => "Teachers",
        Screen::ProfileEdit => "Edit Profile",
        Screen::Help => "Help",
    }
}

fn help_rows(origin: Screen) -> Vec<HelpRow> {
    let mut rows = vec![HelpRow::Heading(screen_name(origin))];
    rows.extend(
        screen_keys(origin)
            .into_iter()
            .flatten()
            .map(|&(keys, does)| HelpRow::Binding(keys, does)),
    );
    rows.push(HelpRow::Heading("Anywhere"));
    rows.extend(GLOBAL_KEYS.iter().map(|&(keys, does)| HelpRow::Binding(keys, does)));
    rows
}

/// State for the help screen.
#[derive(Debug, Clone)]
pub struct HelpState {
    origin: Screen,
    offset: usize,
}

impl Default for HelpState {
    fn default() -> Self {
        Self::new()
    }
}

impl HelpState {
    pub fn new() -> Self {
        Self {
            origin: Screen::StudentLookup,
            offset: 0,
        }
    }

    /// Shows help for `origin`, scrolled to the top.
    pub fn open(&mut self, origin: Screen) {
        self.origin = origin;
        self.offset = 0;
    }

    pub fn origin(&self) -> Screen {
        self.origin
    }

    /// Index of the first visible row.
    pub fn offset(&self) -> usize {
        self.offset
    }

    fn scroll_to(&mut self, offset: usize) {
        let last = help_rows(self.origin).len().saturating_sub(1);
        self.offset = offset.min(last);
    }

    /// Handles a key event, returning an [`Action`] for the app to apply.
    pub fn handle_key(&mut self, key: KeyEvent) -> Action {
        const PAGE: usize = 5;
        match key.code {
            KeyCode::Up => self.scroll_to(self.offset.saturating_sub(1)),
            KeyCode::Down => self.scroll_to(self.offset + 1),
            KeyCode::PageUp => self.scroll_to(self.offset.saturating_sub(PAGE)),
            KeyCode::PageDown => self.scroll_to(self.offset + PAGE),
            KeyCode::Home => self.scroll_to(0),
            KeyCode::End => self.scroll_to(usize::MAX),
            KeyCode::Char('q') | KeyCode::Esc => return Action::Navigate(self.origin),
            _ => {}
        }
        Action::None
    }
}

/// Renders the help screen.
#[mutants::skip]
pub fn draw_help(state: &HelpState, frame: &mut Frame, area: Rect) {
    let block = Block::default()
        .title(format!(" Help: {} ", screen_name(state.origin())))
        .borders(Borders::ALL)
        .border_style(Style::default().fg(Color::Cyan));
    let inner = block.inner(area);
    frame.render_widget(block, area);

    let [table_area, footer_area] =
        Layout::vertical([Constraint::Min(0), Constraint::Length(1)]).areas(inner);

    let heading = Style::default()
        .fg(Color::Cyan)
        .add_modifier(Modifier::BOLD);
    let rows = help_rows(state.origin())
        .into_iter()
        .skip(state.offset())
        .map(|row| match row {
            HelpRow::Heading(title) => Row::new([Cell::from(title).style(heading)]),
            HelpRow::Binding(keys, does) => Row::new([
                Cell::from(format!("  {keys}")).style(Style::default().fg(Color::Yellow)),
                Cell::from(does).style(Style::default().fg(Color::DarkGray)),
            ]),
        });
    let table = Table::new(rows, [Constraint::Length(22), Constraint::Min(0)]);
    frame.render_widget(table, table_area);

    let footer = Paragraph::new("↑/↓ PgUp/PgDn: scroll  Esc: back")
        .style(Style::default().fg(Color::DarkGray));
    frame.render_widget(footer, footer_area);
}
