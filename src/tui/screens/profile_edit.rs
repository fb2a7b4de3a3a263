//! Profile edit screen: a student's editable details.

use std::rc::Rc;

use crossterm::event::{KeyCode, KeyEvent};
use ratatui::Frame;
use ratatui::layout::{Alignment, Constraint, Flex, Layout, Rect};
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::Line;
use ratatui::widgets::Paragraph;
use tracing::warn;

use crate::form::{FieldSpec, FieldValue, FormController, Notifier, Values};
use crate::model::{
    Student, validate_birthdate, validate_class_number, validate_email, validate_phone,
};
use crate::tui::action::Action;
use crate::tui::app::Screen;
use crate::tui::widgets::form::{FieldLabel, FormView, draw_form};

/// Fields of the profile form, in tab order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ProfileField {
    FirstName,
    LastName,
    Nickname,
    ClassNumber,
    ClassNo,
    Email,
    Phone,
    Birthdate,
    Allergies,
}

impl FieldLabel for ProfileField {
    fn label(&self) -> &'static str {
        match self {
            Self::FirstName => "First Name",
            Self::LastName => "Last Name",
            Self::Nickname => "Nickname",
            Self::ClassNumber => "Class",
            Self::ClassNo => "Class No.",
            Self::Email => "Email",
            Self::Phone => "Phone",
            Self::Birthdate => "Birthdate",
            Self::Allergies => "Allergies",
        }
    }

    fn helper(&self) -> Option<&'static str> {
        match self {
            Self::Nickname => Some("Up to 20 characters"),
            Self::ClassNumber => Some("e.g. 405 for M.4/5"),
            Self::ClassNo => Some("Seat number, 1-60"),
            Self::Phone => Some("10 digits starting with 0"),
            Self::Birthdate => Some("YYYY-MM-DD"),
            Self::Allergies => Some("Comma-separated"),
            _ => None,
        }
    }
}

fn profile_specs() -> Vec<FieldSpec<ProfileField>> {
    use ProfileField::*;

    vec![
        FieldSpec::new(FirstName).required(),
        FieldSpec::new(LastName).required(),
        FieldSpec::new(Nickname).validate_text(|s: &str| s.chars().count() <= 20),
        FieldSpec::new(ClassNumber)
            .default_value(0_i64)
            .required()
            .validate_text(validate_class_number),
        FieldSpec::new(ClassNo)
            .default_value(0_i64)
            .required()
            .validate(|v: &FieldValue| v.as_number().is_some_and(|n| (1..=60).contains(&n))),
        FieldSpec::new(Email).validate_text(validate_email),
        FieldSpec::new(Phone).validate_text(validate_phone),
        FieldSpec::new(Birthdate).validate_text(|s: &str| validate_birthdate(s).map(|_| ())),
        FieldSpec::new(Allergies).default_value(Vec::<String>::new()),
    ]
}

fn profile_values(student: &Student) -> Values<ProfileField> {
    use ProfileField::*;

    let optional = |s: &Option<String>| FieldValue::from(s.clone().unwrap_or_default());
    [
        (FirstName, FieldValue::from(student.first_name.clone())),
        (LastName, FieldValue::from(student.last_name.clone())),
        (Nickname, optional(&student.nickname)),
        (ClassNumber, FieldValue::Number(i64::from(student.class_number))),
        (ClassNo, FieldValue::Number(i64::from(student.class_no))),
        (Email, optional(&student.email)),
        (Phone, optional(&student.phone)),
        (
            Birthdate,
            FieldValue::from(
                student
                    .birthdate
                    .map(|d| d.format("%Y-%m-%d").to_string())
                    .unwrap_or_default(),
            ),
        ),
        (Allergies, FieldValue::List(student.allergies.clone())),
    ]
    .into_iter()
    .collect()
}

/// State for the profile edit screen.
pub struct ProfileEditState {
    form: FormController<ProfileField>,
    view: FormView<ProfileField>,
    student: Option<Student>,
}

impl ProfileEditState {
    /// Creates an empty editor that reports invalid submissions to `notifier`.
    pub fn new(notifier: Rc<dyn Notifier>) -> Self {
        let form = FormController::new(profile_specs(), notifier)
            .expect("profile form keys are unique");
        let view = FormView::new(&form);
        Self {
            form,
            view,
            student: None,
        }
    }

    /// Loads `student` into the form, focused on the first field.
    pub fn load(&mut self, student: Student) {
        self.form.reset();
        if let Err(e) = self.form.set_values(profile_values(&student)) {
            warn!(error = %e, "could not load profile into form");
        }
        self.view.sync(&self.form);
        self.view.reset_focus();
        self.student = Some(student);
    }

    /// The student as loaded, before any edits.
    pub fn student(&self) -> Option<&Student> {
        self.student.as_ref()
    }

    pub fn form(&self) -> &FormController<ProfileField> {
        &self.form
    }

    pub fn view(&self) -> &FormView<ProfileField> {
        &self.view
    }

    /// Handles a key event, returning an [`Action`] for the app to apply.
    pub fn handle_key(&mut self, key: KeyEvent) -> Action {
        match key.code {
            KeyCode::Tab => {
                self.view.focus_next();
                Action::None
            }
            KeyCode::BackTab => {
                self.view.focus_prev();
                Action::None
            }
            KeyCode::Char(ch) => {
                self.view.insert_char(&mut self.form, ch);
                Action::None
            }
            KeyCode::Backspace => {
                self.view.delete_char(&mut self.form);
                Action::None
            }
            KeyCode::Enter => self.submit(),
            KeyCode::Esc => Action::Navigate(Screen::StudentLookup),
            _ => Action::None,
        }
    }

    fn submit(&self) -> Action {
        if self.form.notify_if_invalid() {
            return Action::None;
        }
        self.edited().map_or(Action::None, Action::SaveStudent)
    }

    /// Builds the edited student from the form values.
    fn edited(&self) -> Option<Student> {
        use ProfileField::*;

        let original = self.student.as_ref()?;
        let text = |key: ProfileField| -> String {
            self.form
                .value(key)
                .and_then(FieldValue::as_text)
                .map(str::trim)
                .unwrap_or_default()
                .to_string()
        };
        let optional = |key: ProfileField| -> Option<String> {
            let value = text(key);
            (!value.is_empty()).then_some(value)
        };
        let number = |key: ProfileField| -> u16 {
            self.form
                .value(key)
                .and_then(FieldValue::as_number)
                .and_then(|n| u16::try_from(n).ok())
                .unwrap_or_default()
        };

        Some(Student {
            id: original.id.clone(),
            first_name: text(FirstName),
            last_name: text(LastName),
            nickname: optional(Nickname),
            class_number: number(ClassNumber),
            class_no: number(ClassNo),
            email: optional(Email),
            phone: optional(Phone),
            birthdate: optional(Birthdate).and_then(|d| validate_birthdate(&d).ok()),
            allergies: self
                .form
                .value(Allergies)
                .and_then(FieldValue::as_list)
                .map(<[String]>::to_vec)
                .unwrap_or_default(),
        })
    }
}

/// Renders the profile edit screen.
#[mutants::skip]
pub fn draw_profile_edit(state: &ProfileEditState, frame: &mut Frame, area: Rect) {
    let [title_area, form_area, footer_area] = Layout::vertical([
        Constraint::Length(2),
        Constraint::Min(0),
        Constraint::Length(1),
    ])
    .areas(area);

    let title_text = state.student().map_or_else(
        || "Edit Profile".to_string(),
        |s| format!("Edit Profile: {} ({})", s.full_name(), s.id),
    );
    let title = Paragraph::new(Line::from(title_text))
        .alignment(Alignment::Center)
        .style(
            Style::default()
                .fg(Color::Cyan)
                .add_modifier(Modifier::BOLD),
        );
    frame.render_widget(title, title_area);

    let [form_col] = Layout::horizontal([Constraint::Max(60)])
        .flex(Flex::Center)
        .areas(form_area);
    draw_form(&state.view, &state.form, frame, form_col);

    let footer = Paragraph::new("Tab/Shift-Tab: field  Enter: save  Esc: cancel  F1: help")
        .style(Style::default().fg(Color::DarkGray));
    frame.render_widget(footer, footer_area);
}

#[cfg(test)]
mod tests {
    use std::cell::RefCell;

    use chrono::NaiveDate;
    use crossterm::event::{KeyEventKind, KeyEventState, KeyModifiers};

    use super::*;
    use crate::form::{FORM_INVALID_MESSAGE, Notice};

    fn press(code: KeyCode) -> KeyEvent {
        KeyEvent {
            code,
            modifiers: KeyModifiers::NONE,
            kind: KeyEventKind::Press,
            state: KeyEventState::NONE,
        }
    }

    fn make_student() -> Student {
        let mut student = Student::new(
            "40501".to_string(),
            "Mali".to_string(),
            "Dee".to_string(),
            405,
            1,
        )
        .unwrap();
        student.email = Some("mali@school.ac.th".to_string());
        student.allergies = vec!["Peanuts".to_string()];
        student
    }

    fn make_state() -> (ProfileEditState, Rc<RefCell<Vec<Notice>>>) {
        let notices = Rc::new(RefCell::new(Vec::new()));
        let sink = Rc::clone(&notices);
        let mut state = ProfileEditState::new(Rc::new(move |n: Notice| sink.borrow_mut().push(n)));
        state.load(make_student());
        (state, notices)
    }

    /// Focuses `field`, clears it and types `text`.
    fn type_into(state: &mut ProfileEditState, field: ProfileField, text: &str) {
        while state.view().focused_key() != Some(field) {
            state.handle_key(press(KeyCode::Tab));
        }
        for _ in 0..state.view().draft(field).chars().count() {
            state.handle_key(press(KeyCode::Backspace));
        }
        for ch in text.chars() {
            state.handle_key(press(KeyCode::Char(ch)));
        }
    }

    fn saved(action: Action) -> Student {
        match action {
            Action::SaveStudent(student) => student,
            other => panic!("expected SaveStudent, got {other:?}"),
        }
    }

    mod load {
        use super::*;

        #[test]
        fn fills_form_from_student() {
            let (state, _) = make_state();
            assert_eq!(state.view().draft(ProfileField::FirstName), "Mali");
            assert_eq!(state.view().draft(ProfileField::ClassNumber), "405");
            assert_eq!(state.view().draft(ProfileField::Allergies), "Peanuts");
            assert!(state.form().form_ok());
        }

        #[test]
        fn reload_resets_focus() {
            let (mut state, _) = make_state();
            state.handle_key(press(KeyCode::Tab));
            state.load(make_student());
            assert_eq!(state.view().focus(), 0);
        }
    }

    mod editing {
        use super::*;

        #[test]
        fn bad_email_marks_field() {
            let (mut state, _) = make_state();
            type_into(&mut state, ProfileField::Email, "mali at school");
            let props = state.form().field_props(ProfileField::Email).unwrap();
            assert!(props.error);
            assert!(props.helper_msg.unwrap().contains("invalid email"));
        }

        #[test]
        fn letters_in_class_are_ignored() {
            let (mut state, _) = make_state();
            type_into(&mut state, ProfileField::ClassNumber, "4a05");
            assert_eq!(state.view().draft(ProfileField::ClassNumber), "405");
        }

        #[test]
        fn long_nickname_fails_without_message() {
            let (mut state, _) = make_state();
            type_into(&mut state, ProfileField::Nickname, "abcdefghijklmnopqrstuvwxyz");
            let props = state.form().field_props(ProfileField::Nickname).unwrap();
            assert!(props.error);
            assert_eq!(props.helper_or(Some("Up to 20 characters")), Some("Up to 20 characters"));
        }

        #[test]
        fn backtab_moves_back() {
            let (mut state, _) = make_state();
            state.handle_key(press(KeyCode::BackTab));
            assert_eq!(state.view().focused_key(), Some(ProfileField::Allergies));
        }
    }

    mod submit {
        use super::*;

        #[test]
        fn invalid_form_notifies_and_does_not_save() {
            let (mut state, notices) = make_state();
            type_into(&mut state, ProfileField::Email, "nope");
            let action = state.handle_key(press(KeyCode::Enter));
            assert_eq!(action, Action::None);
            assert_eq!(*notices.borrow(), vec![Notice::error(FORM_INVALID_MESSAGE)]);
        }

        #[test]
        fn cleared_required_field_blocks_save() {
            let (mut state, notices) = make_state();
            type_into(&mut state, ProfileField::LastName, "");
            assert_eq!(state.handle_key(press(KeyCode::Enter)), Action::None);
            assert_eq!(notices.borrow().len(), 1);
        }

        #[test]
        fn valid_form_saves_edits() {
            let (mut state, notices) = make_state();
            type_into(&mut state, ProfileField::Nickname, "Ploy");
            type_into(&mut state, ProfileField::ClassNumber, "406");
            type_into(&mut state, ProfileField::Phone, "0812345678");
            type_into(&mut state, ProfileField::Birthdate, "2010-05-01");
            type_into(&mut state, ProfileField::Allergies, "milk, eggs");

            let student = saved(state.handle_key(press(KeyCode::Enter)));
            assert!(notices.borrow().is_empty());
            assert_eq!(student.id, "40501");
            assert_eq!(student.nickname.as_deref(), Some("Ploy"));
            assert_eq!(student.class_number, 406);
            assert_eq!(student.phone.as_deref(), Some("0812345678"));
            assert_eq!(student.birthdate, NaiveDate::from_ymd_opt(2010, 5, 1));
            assert_eq!(student.allergies, vec!["milk", "eggs"]);
        }

        #[test]
        fn cleared_optional_field_saves_as_none() {
            let (mut state, _) = make_state();
            type_into(&mut state, ProfileField::Email, "");
            let student = saved(state.handle_key(press(KeyCode::Enter)));
            assert_eq!(student.email, None);
        }

        #[test]
        fn enter_before_load_notifies() {
            let notices = Rc::new(RefCell::new(Vec::new()));
            let sink = Rc::clone(&notices);
            let mut state =
                ProfileEditState::new(Rc::new(move |n: Notice| sink.borrow_mut().push(n)));
            assert_eq!(state.handle_key(press(KeyCode::Enter)), Action::None);
            assert_eq!(notices.borrow().len(), 1);
        }

        #[test]
        fn esc_returns_to_lookup() {
            let (mut state, _) = make_state();
            assert_eq!(
                state.handle_key(press(KeyCode::Esc)),
                Action::Navigate(Screen::StudentLookup)
            );
        }
    }

    mod rendering {
        use ratatui::Terminal;
        use ratatui::backend::TestBackend;

        use super::*;

        fn buffer_to_string(buf: &ratatui::buffer::Buffer) -> String {
            let mut s = String::new();
            for y in 0..buf.area.height {
                for x in 0..buf.area.width {
                    s.push(buf[(x, y)].symbol().chars().next().unwrap_or(' '));
                }
                s.push('\n');
            }
            s
        }

        #[test]
        fn shows_student_and_first_fields() {
            let (state, _) = make_state();
            let backend = TestBackend::new(80, 24);
            let mut terminal = Terminal::new(backend).unwrap();
            terminal
                .draw(|frame| draw_profile_edit(&state, frame, frame.area()))
                .unwrap();
            let output = buffer_to_string(terminal.backend().buffer());
            assert!(output.contains("Mali Dee (40501)"));
            assert!(output.contains("First Name *"));
            assert!(output.contains("Enter: save"));
        }
    }
}
