use std::rc::Rc;
use std::time::{Duration, Instant};

use crossterm::event::{self, Event, KeyCode, KeyEvent, KeyEventKind};
use ratatui::layout::{Constraint, Layout};
use ratatui::{Frame, Terminal};
use tracing::{debug, warn};

use crate::backend::Directory;
use crate::form::{Notice, Notifier};
use crate::list_detail::{ListDetail, ListDetailOptions};
use crate::model::{Breakpoint, Student, StudentCompact, Teacher, TeacherCompact};

use super::action::Action;
use super::error::AppError;
use super::screens::{
    HelpState, LookupState, ProfileEditState, draw_help, draw_lookup, draw_profile_edit,
};
use super::widgets::{Snackbar, draw_snackbar};

/// How long the event loop waits for input before ticking.
const TICK: Duration = Duration::from_millis(50);

/// All screens the app can navigate between.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Screen {
    /// Browse students; the start screen.
    StudentLookup,
    /// Browse teachers.
    TeacherLookup,
    /// Edit the selected student's profile.
    ProfileEdit,
    /// Show keybinding help.
    Help,
}

/// Top-level application state.
pub struct App {
    screen: Screen,
    directory: Directory,
    students: LookupState<StudentCompact, Student>,
    teachers: LookupState<TeacherCompact, Teacher>,
    profile: ProfileEditState,
    help: HelpState,
    snackbar: Snackbar,
    should_quit: bool,
}

impl App {
    /// Creates a new `App` on [`Screen::StudentLookup`] and performs the
    /// initial selection of both lookups.
    pub fn new(directory: Directory, options: ListDetailOptions) -> Result<Self, AppError> {
        let snackbar = Snackbar::new();
        let students = LookupState::new(
            "Students",
            ListDetail::with_fetcher(
                directory.list_students()?,
                directory.student_fetcher(),
                options.clone(),
            ),
            Screen::TeacherLookup,
        )
        .editable();
        let teachers = LookupState::new(
            "Teachers",
            ListDetail::with_fetcher(
                directory.list_teachers()?,
                directory.teacher_fetcher(),
                options,
            ),
            Screen::StudentLookup,
        );
        let profile = ProfileEditState::new(Rc::new(snackbar.clone()));

        let mut app = Self {
            screen: Screen::StudentLookup,
            directory,
            students,
            teachers,
            profile,
            help: HelpState::new(),
            snackbar,
            should_quit: false,
        };
        let now = Instant::now();
        app.students.mount(now);
        app.teachers.mount(now);
        Ok(app)
    }

    /// Main event loop: size → draw → poll input → tick, until quit.
    ///
    /// Must run inside a Tokio runtime context; detail fetches read the
    /// directory through `tokio::fs`.
    #[cfg_attr(coverage_nightly, coverage(off))]
    #[mutants::skip]
    pub fn run<B: ratatui::backend::Backend>(
        &mut self,
        terminal: &mut Terminal<B>,
    ) -> Result<(), AppError> {
        while !self.should_quit {
            self.set_width(terminal.size()?.width);
            terminal.draw(|frame| self.draw(frame))?;
            if event::poll(TICK)?
                && let Event::Key(key) = event::read()?
            {
                self.handle_key(key);
            }
            self.tick(Instant::now());
        }
        Ok(())
    }

    #[cfg_attr(coverage_nightly, coverage(off))]
    #[mutants::skip]
    fn draw(&self, frame: &mut Frame) {
        let [body, bar] =
            Layout::vertical([Constraint::Min(0), Constraint::Length(1)]).areas(frame.area());

        match self.screen {
            Screen::StudentLookup => draw_lookup(&self.students, frame, body),
            Screen::TeacherLookup => draw_lookup(&self.teachers, frame, body),
            Screen::ProfileEdit => draw_profile_edit(&self.profile, frame, body),
            Screen::Help => draw_help(&self.help, frame, body),
        }
        draw_snackbar(&self.snackbar, frame, bar);
    }

    /// Updates both lookups with the breakpoint for a terminal `width`.
    pub fn set_width(&mut self, width: u16) {
        let breakpoint = Breakpoint::from_width(width);
        self.students.set_breakpoint(breakpoint);
        self.teachers.set_breakpoint(breakpoint);
    }

    /// Fires due initial selections, applies finished fetches, and expires
    /// old notices.
    pub fn tick(&mut self, now: Instant) {
        self.students.tick(now);
        self.teachers.tick(now);
        self.snackbar.expire(now);
    }

    /// Handles a key event: global keys first, then screen-specific.
    pub fn handle_key(&mut self, key: KeyEvent) {
        if key.kind != KeyEventKind::Press {
            return;
        }

        let action = match (key.code, self.screen) {
            (KeyCode::F(1), _) => Action::Navigate(Screen::Help),
            (_, Screen::StudentLookup) => self.students.handle_key(key),
            (_, Screen::TeacherLookup) => self.teachers.handle_key(key),
            (_, Screen::ProfileEdit) => self.profile.handle_key(key),
            (_, Screen::Help) => self.help.handle_key(key),
        };
        self.apply(action);
    }

    /// Applies an [`Action`] returned by a screen.
    pub fn apply(&mut self, action: Action) {
        match action {
            Action::None => {}
            Action::Navigate(Screen::Help) => {
                if self.screen != Screen::Help {
                    self.help.open(self.screen);
                    self.navigate(Screen::Help);
                }
            }
            Action::Navigate(screen) => self.navigate(screen),
            Action::Edit(id) => self.edit_student(&id),
            Action::SaveStudent(student) => self.save_student(student),
            Action::Quit => self.should_quit = true,
        }
    }

    fn navigate(&mut self, screen: Screen) {
        debug!(from = ?self.screen, to = ?screen, "navigate");
        self.screen = screen;
    }

    fn edit_student(&mut self, id: &str) {
        match self.directory.find_student(id) {
            Ok(student) => {
                self.profile.load(student);
                self.navigate(Screen::ProfileEdit);
            }
            Err(e) => {
                warn!(%id, error = %e, "could not open student for editing");
                self.snackbar
                    .notify(Notice::error(format!("Could not open {id}: {e}")));
            }
        }
    }

    fn save_student(&mut self, student: Student) {
        let saved = self
            .directory
            .update_student(&student)
            .and_then(|()| self.directory.list_students());
        match saved {
            Ok(items) => {
                let list = self.students.list_mut();
                list.replace_items(items);
                list.refresh_detail();
                self.snackbar
                    .notify(Notice::success(format!("Saved {}", student.full_name())));
                self.navigate(Screen::StudentLookup);
            }
            Err(e) => {
                warn!(id = %student.id, error = %e, "could not save student");
                self.snackbar
                    .notify(Notice::error(format!("Could not save: {e}")));
            }
        }
    }

    /// Returns the current screen.
    pub fn screen(&self) -> Screen {
        self.screen
    }

    /// Returns `true` if the app should quit.
    pub fn should_quit(&self) -> bool {
        self.should_quit
    }

    pub fn directory(&self) -> &Directory {
        &self.directory
    }

    pub fn students(&self) -> &LookupState<StudentCompact, Student> {
        &self.students
    }

    pub fn students_mut(&mut self) -> &mut LookupState<StudentCompact, Student> {
        &mut self.students
    }

    pub fn teachers(&self) -> &LookupState<TeacherCompact, Teacher> {
        &self.teachers
    }

    pub fn profile(&self) -> &ProfileEditState {
        &self.profile
    }

    pub fn snackbar(&self) -> &Snackbar {
        &self.snackbar
    }
}
