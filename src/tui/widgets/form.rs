//! Form widget: focus, edit buffers and rendering over a [`FormController`].

use std::collections::HashMap;
use std::fmt;
use std::hash::Hash;

use ratatui::Frame;
use ratatui::layout::{Constraint, Layout, Rect};
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Borders, Paragraph};

use crate::form::FormController;

/// Display text for a form field key.
pub trait FieldLabel {
    /// Label shown in the field's border.
    fn label(&self) -> &'static str;

    /// Helper text shown under the field when the validator has no message.
    fn helper(&self) -> Option<&'static str> {
        None
    }
}

/// Focus and raw edit buffers for the fields of a [`FormController`].
///
/// The buffers hold exactly what the user typed; the controller holds the
/// coerced values. A keystroke the controller rejects is not kept.
#[derive(Debug, Clone)]
pub struct FormView<K> {
    keys: Vec<K>,
    drafts: HashMap<K, String>,
    focus: usize,
}

impl<K> FormView<K>
where
    K: Copy + Eq + Hash + fmt::Debug,
{
    /// Creates a view over the controller's fields, focused on the first.
    pub fn new(form: &FormController<K>) -> Self {
        let mut view = Self {
            keys: form.keys().collect(),
            drafts: HashMap::new(),
            focus: 0,
        };
        view.sync(form);
        view
    }

    /// Reloads every edit buffer from the controller's current values.
    pub fn sync(&mut self, form: &FormController<K>) {
        self.drafts = self
            .keys
            .iter()
            .map(|&key| {
                let text = form.value(key).map(|v| v.to_input()).unwrap_or_default();
                (key, text)
            })
            .collect();
    }

    /// Returns the index of the currently focused field.
    pub fn focus(&self) -> usize {
        self.focus
    }

    /// Returns the key of the currently focused field.
    pub fn focused_key(&self) -> Option<K> {
        self.keys.get(self.focus).copied()
    }

    /// Moves focus to the next field, wrapping around.
    pub fn focus_next(&mut self) {
        if self.keys.is_empty() {
            return;
        }
        self.focus = (self.focus + 1) % self.keys.len();
    }

    /// Moves focus to the previous field, wrapping around.
    pub fn focus_prev(&mut self) {
        if self.keys.is_empty() {
            return;
        }
        self.focus = (self.focus + self.keys.len() - 1) % self.keys.len();
    }

    /// Moves focus to the first field.
    pub fn reset_focus(&mut self) {
        self.focus = 0;
    }

    /// Returns the edit buffer for `key`.
    pub fn draft(&self, key: K) -> &str {
        self.drafts.get(&key).map(String::as_str).unwrap_or("")
    }

    /// Appends a character to the focused field. Returns whether the
    /// controller accepted the new text.
    pub fn insert_char(&mut self, form: &mut FormController<K>, ch: char) -> bool {
        self.edit(form, |text| text.push(ch))
    }

    /// Deletes the last character of the focused field.
    pub fn delete_char(&mut self, form: &mut FormController<K>) -> bool {
        self.edit(form, |text| {
            text.pop();
        })
    }

    fn edit(&mut self, form: &mut FormController<K>, f: impl FnOnce(&mut String)) -> bool {
        let Some(key) = self.focused_key() else {
            return false;
        };
        let mut text = self.draft(key).to_string();
        f(&mut text);
        if form.on_change(key, &text) {
            self.drafts.insert(key, text);
            true
        } else {
            false
        }
    }
}

/// Renders every field of `form` in declaration order.
#[cfg_attr(coverage_nightly, coverage(off))]
#[mutants::skip]
pub fn draw_form<K>(view: &FormView<K>, form: &FormController<K>, frame: &mut Frame, area: Rect)
where
    K: Copy + Eq + Hash + fmt::Debug + FieldLabel,
{
    let row_height = 4_u16;
    let visible = usize::from(area.height / row_height).max(1);
    // Scroll so the focused field stays on screen.
    let first = (view.focus + 1).saturating_sub(visible);
    let shown: Vec<(usize, K)> = view
        .keys
        .iter()
        .copied()
        .enumerate()
        .skip(first)
        .take(visible)
        .collect();
    let constraints: Vec<Constraint> = shown
        .iter()
        .map(|_| Constraint::Length(row_height))
        .collect();
    let rows = Layout::vertical(constraints).split(area);

    for (row, &(i, key)) in shown.iter().enumerate() {
        let Some(props) = form.field_props(key) else {
            continue;
        };
        let is_focused = i == view.focus;
        let [input_area, helper_area] =
            Layout::vertical([Constraint::Length(3), Constraint::Length(1)]).areas(rows[row]);

        let border_color = if props.error {
            Color::Red
        } else if is_focused {
            Color::Yellow
        } else {
            Color::DarkGray
        };

        let label = if props.required {
            format!("{} *", key.label())
        } else {
            key.label().to_string()
        };

        let block = Block::default()
            .title(label)
            .borders(Borders::ALL)
            .border_style(Style::default().fg(border_color));

        let mut spans = vec![Span::raw(view.draft(key))];
        if is_focused {
            spans.push(Span::styled(
                "\u{2588}",
                Style::default().add_modifier(Modifier::SLOW_BLINK),
            ));
        }
        frame.render_widget(Paragraph::new(Line::from(spans)).block(block), input_area);

        if let Some(helper) = props.helper_or(key.helper()) {
            let color = if props.error {
                Color::Red
            } else {
                Color::DarkGray
            };
            let helper_line = Paragraph::new(Span::styled(
                format!("  {helper}"),
                Style::default().fg(color),
            ));
            frame.render_widget(helper_line, helper_area);
        }
    }
}

#[cfg(test)]
mod tests {
    use std::rc::Rc;

    use ratatui::Terminal;
    use ratatui::backend::TestBackend;

    use super::*;
    use crate::form::{FieldSpec, Notice, Verdict};

    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
    enum Field {
        Name,
        Age,
        Tags,
    }

    impl FieldLabel for Field {
        fn label(&self) -> &'static str {
            match self {
                Field::Name => "Name",
                Field::Age => "Age",
                Field::Tags => "Tags",
            }
        }

        fn helper(&self) -> Option<&'static str> {
            match self {
                Field::Tags => Some("Comma-separated"),
                _ => None,
            }
        }
    }

    fn make_form() -> FormController<Field> {
        FormController::new(
            vec![
                FieldSpec::new(Field::Name).required().validate_text(|s: &str| {
                    if s.len() <= 5 {
                        Verdict::Valid
                    } else {
                        Verdict::from("Too long")
                    }
                }),
                FieldSpec::new(Field::Age).default_value(0_i64),
                FieldSpec::new(Field::Tags).default_value(Vec::<String>::new()),
            ],
            Rc::new(|_: Notice| {}),
        )
        .unwrap()
    }

    mod focus {
        use super::*;

        #[test]
        fn starts_on_first_field() {
            let form = make_form();
            let view = FormView::new(&form);
            assert_eq!(view.focus(), 0);
            assert_eq!(view.focused_key(), Some(Field::Name));
        }

        #[test]
        fn next_wraps() {
            let form = make_form();
            let mut view = FormView::new(&form);
            view.focus_next();
            view.focus_next();
            assert_eq!(view.focused_key(), Some(Field::Tags));
            view.focus_next();
            assert_eq!(view.focused_key(), Some(Field::Name));
        }

        #[test]
        fn prev_wraps() {
            let form = make_form();
            let mut view = FormView::new(&form);
            view.focus_prev();
            assert_eq!(view.focused_key(), Some(Field::Tags));
        }

        #[test]
        fn reset_focus_returns_to_first() {
            let form = make_form();
            let mut view = FormView::new(&form);
            view.focus_next();
            view.reset_focus();
            assert_eq!(view.focus(), 0);
        }
    }

    mod editing {
        use super::*;
        use crate::form::FieldValue;

        #[test]
        fn typing_updates_controller() {
            let mut form = make_form();
            let mut view = FormView::new(&form);
            assert!(view.insert_char(&mut form, 'A'));
            assert!(view.insert_char(&mut form, 'n'));
            assert_eq!(view.draft(Field::Name), "An");
            assert_eq!(form.value(Field::Name), Some(&FieldValue::from("An")));
        }

        #[test]
        fn rejected_keystroke_is_not_kept() {
            let mut form = make_form();
            let mut view = FormView::new(&form);
            view.focus_next();
            assert!(view.insert_char(&mut form, '4'));
            assert!(!view.insert_char(&mut form, 'x'));
            assert_eq!(view.draft(Field::Age), "4");
            assert_eq!(form.value(Field::Age), Some(&FieldValue::Number(4)));
        }

        #[test]
        fn delete_char_pops_and_updates() {
            let mut form = make_form();
            let mut view = FormView::new(&form);
            view.focus_next();
            view.insert_char(&mut form, '4');
            view.insert_char(&mut form, '2');
            view.delete_char(&mut form);
            assert_eq!(form.value(Field::Age), Some(&FieldValue::Number(4)));
        }

        #[test]
        fn list_draft_keeps_trailing_comma() {
            let mut form = make_form();
            let mut view = FormView::new(&form);
            view.focus_prev();
            for ch in "milk,".chars() {
                view.insert_char(&mut form, ch);
            }
            assert_eq!(view.draft(Field::Tags), "milk,");
            assert_eq!(
                form.value(Field::Tags),
                Some(&FieldValue::List(vec!["milk".to_string()]))
            );
        }

        #[test]
        fn sync_reloads_from_controller() {
            let mut form = make_form();
            let mut view = FormView::new(&form);
            form.set_value(Field::Name, "Mali").unwrap();
            form.set_value(Field::Age, 15_i64).unwrap();
            view.sync(&form);
            assert_eq!(view.draft(Field::Name), "Mali");
            assert_eq!(view.draft(Field::Age), "15");
        }
    }

    mod rendering {
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

        fn render(view: &FormView<Field>, form: &FormController<Field>) -> String {
            let backend = TestBackend::new(40, 12);
            let mut terminal = Terminal::new(backend).unwrap();
            terminal
                .draw(|frame| draw_form(view, form, frame, frame.area()))
                .unwrap();
            buffer_to_string(terminal.backend().buffer())
        }

        #[test]
        fn marks_required_fields() {
            let form = make_form();
            let view = FormView::new(&form);
            let output = render(&view, &form);
            assert!(output.contains("Name *"));
            assert!(!output.contains("Age *"));
        }

        #[test]
        fn shows_fallback_helper() {
            let form = make_form();
            let view = FormView::new(&form);
            assert!(render(&view, &form).contains("Comma-separated"));
        }

        #[test]
        fn short_area_scrolls_to_focus() {
            let form = make_form();
            let mut view = FormView::new(&form);
            view.focus_prev();
            let backend = TestBackend::new(40, 4);
            let mut terminal = Terminal::new(backend).unwrap();
            terminal
                .draw(|frame| draw_form(&view, &form, frame, frame.area()))
                .unwrap();
            let output = buffer_to_string(terminal.backend().buffer());
            assert!(output.contains("Tags"));
            assert!(!output.contains("Name"));
        }

        #[test]
        fn validator_message_replaces_helper() {
            let mut form = make_form();
            let mut view = FormView::new(&form);
            for ch in "Somchai".chars() {
                view.insert_char(&mut form, ch);
            }
            let output = render(&view, &form);
            assert!(output.contains("Somchai"));
            assert!(output.contains("Too long"));
        }
    }
}
