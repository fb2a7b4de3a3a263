//! Lookup screen: a list of people with a detail pane or dialog.

use std::time::Instant;

use crossterm::event::{KeyCode, KeyEvent};
use ratatui::Frame;
use ratatui::layout::{Alignment, Constraint, Flex, Layout, Rect};
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Borders, Clear, Paragraph, Row, Table, Wrap};

use crate::list_detail::ListDetail;
use crate::model::{Breakpoint, Identified, Student, StudentCompact, Teacher, TeacherCompact};
use crate::tui::action::Action;
use crate::tui::app::Screen;

/// A row in a lookup table.
pub trait LookupRow: Identified {
    /// Column headers with their widths; a width of `0` takes the rest.
    const COLUMNS: &'static [(&'static str, u16)];

    fn cells(&self) -> Vec<String>;
}

/// The content of a detail pane.
pub trait DetailView {
    fn title(&self) -> String;

    /// Label/value pairs, in display order.
    fn fields(&self) -> Vec<(&'static str, String)>;
}

impl LookupRow for StudentCompact {
    const COLUMNS: &'static [(&'static str, u16)] =
        &[("ID", 6), ("Class", 6), ("No.", 4), ("Name", 0)];

    fn cells(&self) -> Vec<String> {
        vec![
            self.id.clone(),
            self.class_number.to_string(),
            self.class_no.to_string(),
            self.full_name(),
        ]
    }
}

impl LookupRow for TeacherCompact {
    const COLUMNS: &'static [(&'static str, u16)] = &[("ID", 6), ("Name", 24), ("Group", 0)];

    fn cells(&self) -> Vec<String> {
        vec![self.id.clone(), self.full_name(), self.subject_group.clone()]
    }
}

fn or_dash(value: Option<&str>) -> String {
    value.unwrap_or("-").to_string()
}

impl DetailView for Student {
    fn title(&self) -> String {
        self.full_name()
    }

    fn fields(&self) -> Vec<(&'static str, String)> {
        vec![
            ("Student ID", self.id.clone()),
            ("Nickname", or_dash(self.nickname.as_deref())),
            ("Class", format!("M.{}", self.class_number)),
            ("Class No.", self.class_no.to_string()),
            ("Email", or_dash(self.email.as_deref())),
            ("Phone", or_dash(self.phone.as_deref())),
            (
                "Birthdate",
                self.birthdate
                    .map(|d| d.format("%Y-%m-%d").to_string())
                    .unwrap_or_else(|| "-".to_string()),
            ),
            (
                "Allergies",
                if self.allergies.is_empty() {
                    "None".to_string()
                } else {
                    self.allergies.join(", ")
                },
            ),
        ]
    }
}

impl DetailView for Teacher {
    fn title(&self) -> String {
        self.full_name()
    }

    fn fields(&self) -> Vec<(&'static str, String)> {
        vec![
            ("Teacher ID", self.id.clone()),
            ("Group", self.subject_group.clone()),
            ("Email", or_dash(self.email.as_deref())),
            ("Phone", or_dash(self.phone.as_deref())),
            (
                "Advisor of",
                self.class_advisor_at
                    .map(|c| format!("M.{c}"))
                    .unwrap_or_else(|| "-".to_string()),
            ),
            ("Subjects", self.subjects.join(", ")),
        ]
    }
}

/// State for a lookup screen over compact items `C` with details `D`.
pub struct LookupState<C, D> {
    title: &'static str,
    list: ListDetail<C, D>,
    other: Screen,
    editable: bool,
}

impl<C: LookupRow, D: DetailView + 'static> LookupState<C, D> {
    /// Creates a lookup screen. `other` is the screen Tab switches to.
    pub fn new(title: &'static str, list: ListDetail<C, D>, other: Screen) -> Self {
        Self {
            title,
            list,
            other,
            editable: false,
        }
    }

    /// Lets `e` emit [`Action::Edit`] for the selected item.
    pub fn editable(mut self) -> Self {
        self.editable = true;
        self
    }

    pub fn list(&self) -> &ListDetail<C, D> {
        &self.list
    }

    pub fn list_mut(&mut self) -> &mut ListDetail<C, D> {
        &mut self.list
    }

    pub fn mount(&mut self, now: Instant) {
        self.list.mount(now);
    }

    /// Fires due scheduled selections and applies completed fetches.
    pub fn tick(&mut self, now: Instant) {
        self.list.tick(now);
        self.list.pump();
    }

    pub fn set_breakpoint(&mut self, breakpoint: Breakpoint) {
        self.list.set_breakpoint(breakpoint);
    }

    /// Handles a key event, returning an [`Action`] for the app to apply.
    pub fn handle_key(&mut self, key: KeyEvent) -> Action {
        match key.code {
            KeyCode::Up => self.select_by(|current, _| current.map_or(0, |i| i.saturating_sub(1))),
            KeyCode::Down => {
                self.select_by(|current, len| current.map_or(0, |i| (i + 1).min(len - 1)))
            }
            KeyCode::Home => self.select_by(|_, _| 0),
            KeyCode::End => self.select_by(|_, len| len - 1),
            KeyCode::Enter => {
                if let Some(id) = self.list.selected_id().map(str::to_string)
                    && self.list.presents_as_dialog()
                    && !self.list.details_open()
                {
                    self.list.on_selected_change(id);
                }
                Action::None
            }
            KeyCode::Esc => {
                self.list.on_details_close();
                Action::None
            }
            KeyCode::Char('r') => {
                self.list.refresh_detail();
                Action::None
            }
            KeyCode::Char('e') if self.editable => self
                .list
                .selected_id()
                .map_or(Action::None, |id| Action::Edit(id.to_string())),
            KeyCode::Tab => Action::Navigate(self.other),
            KeyCode::Char('?') => Action::Navigate(Screen::Help),
            KeyCode::Char('q') => Action::Quit,
            _ => Action::None,
        }
    }

    /// Moves the selection to `f(current_index, len)` if it changes.
    fn select_by(&mut self, f: impl FnOnce(Option<usize>, usize) -> usize) -> Action {
        let len = self.list.items().len();
        if len == 0 {
            return Action::None;
        }
        let current = self.list.selected_index();
        let next = f(current, len);
        if current != Some(next) {
            let id = self.list.items()[next].id().to_string();
            self.list.on_selected_change(id);
        }
        Action::None
    }
}

fn centered(area: Rect, width_pct: u16, height_pct: u16) -> Rect {
    let [row] = Layout::vertical([Constraint::Percentage(height_pct)])
        .flex(Flex::Center)
        .areas(area);
    let [cell] = Layout::horizontal([Constraint::Percentage(width_pct)])
        .flex(Flex::Center)
        .areas(row);
    cell
}

fn detail_lines<C, D>(list: &ListDetail<C, D>) -> Vec<Line<'static>>
where
    C: Identified,
    D: DetailView + 'static,
{
    let dim = Style::default().fg(Color::DarkGray);
    match list.selected_detail() {
        Some(detail) => detail
            .fields()
            .into_iter()
            .map(|(label, value)| {
                Line::from(vec![
                    Span::styled(format!("{label:<12}"), Style::default().fg(Color::Yellow)),
                    Span::raw(value),
                ])
            })
            .collect(),
        None if list.is_loading() => vec![Line::styled("Loading…", dim)],
        None if list.selected_id().is_some() => vec![Line::styled("No details available", dim)],
        None => vec![Line::styled("Select an entry to see details", dim)],
    }
}

#[mutants::skip]
fn draw_detail<C: Identified, D: DetailView + 'static>(
    list: &ListDetail<C, D>,
    frame: &mut Frame,
    area: Rect,
) {
    let title = list
        .selected_detail()
        .map_or_else(|| " Details ".to_string(), |d| format!(" {} ", d.title()));
    let block = Block::default()
        .title(title)
        .borders(Borders::ALL)
        .border_style(Style::default().fg(Color::Cyan));
    let paragraph = Paragraph::new(detail_lines(list))
        .block(block)
        .wrap(Wrap { trim: true });
    frame.render_widget(paragraph, area);
}

#[mutants::skip]
fn draw_table<C: LookupRow, D: 'static>(list: &ListDetail<C, D>, frame: &mut Frame, area: Rect) {
    if list.items().is_empty() {
        let empty = Paragraph::new("Nobody here yet").alignment(Alignment::Center);
        frame.render_widget(empty, area);
        return;
    }

    let header = Row::new(C::COLUMNS.iter().map(|(name, _)| *name))
        .style(Style::default().add_modifier(Modifier::BOLD))
        .bottom_margin(1);

    let selected = list.selected_index();
    let rows: Vec<Row> = list
        .items()
        .iter()
        .enumerate()
        .map(|(i, item)| {
            let style = if Some(i) == selected {
                Style::default().fg(Color::Black).bg(Color::Yellow)
            } else {
                Style::default()
            };
            Row::new(item.cells()).style(style)
        })
        .collect();

    let widths: Vec<Constraint> = C::COLUMNS
        .iter()
        .map(|&(_, width)| match width {
            0 => Constraint::Min(0),
            w => Constraint::Length(w),
        })
        .collect();

    frame.render_widget(Table::new(rows, widths).header(header), area);
}

/// Renders a lookup screen: the table with an inline detail pane, or the
/// table alone with a centered dialog when the breakpoint calls for one.
#[mutants::skip]
pub fn draw_lookup<C: LookupRow, D: DetailView + 'static>(
    state: &LookupState<C, D>,
    frame: &mut Frame,
    area: Rect,
) {
    let [title_area, body_area, footer_area] = Layout::vertical([
        Constraint::Length(1),
        Constraint::Min(0),
        Constraint::Length(1),
    ])
    .areas(area);

    let title = Paragraph::new(Line::from(format!(
        "{} ({})",
        state.title,
        state.list.items().len()
    )))
    .alignment(Alignment::Center)
    .style(
        Style::default()
            .fg(Color::Cyan)
            .add_modifier(Modifier::BOLD),
    );
    frame.render_widget(title, title_area);

    if state.list.presents_as_dialog() {
        draw_table(&state.list, frame, body_area);
        if state.list.details_open() {
            let popup = centered(body_area, 90, 80);
            frame.render_widget(Clear, popup);
            draw_detail(&state.list, frame, popup);
        }
    } else {
        let [table_area, detail_area] =
            Layout::horizontal([Constraint::Percentage(55), Constraint::Percentage(45)])
                .areas(body_area);
        draw_table(&state.list, frame, table_area);
        draw_detail(&state.list, frame, detail_area);
    }

    let mut hints = String::from("↑↓: select  r: refresh  Tab: switch  q: quit");
    if state.list.details_open() {
        hints.insert_str(0, "Esc: close  ");
    } else if state.list.presents_as_dialog() {
        hints.insert_str(0, "Enter: open  ");
    }
    if state.editable {
        hints.push_str("  e: edit");
    }
    let footer = Paragraph::new(hints).style(Style::default().fg(Color::DarkGray));
    frame.render_widget(footer, footer_area);
}
