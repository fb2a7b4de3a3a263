use std::fmt;

/// The value held by a single form field.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FieldValue {
    Text(String),
    Number(i64),
    List(Vec<String>),
}

impl Default for FieldValue {
    fn default() -> Self {
        Self::Text(String::new())
    }
}

impl FieldValue {
    /// Returns `true` for empty text, zero, and empty lists.
    ///
    /// Empty values skip the field validator; only `required` can fail them.
    pub fn is_empty(&self) -> bool {
        match self {
            Self::Text(s) => s.is_empty(),
            Self::Number(n) => *n == 0,
            Self::List(items) => items.is_empty(),
        }
    }

    /// Returns the text, if this is a text value.
    pub fn as_text(&self) -> Option<&str> {
        match self {
            Self::Text(s) => Some(s),
            _ => None,
        }
    }

    /// Returns the number, if this is a numeric value.
    pub fn as_number(&self) -> Option<i64> {
        match self {
            Self::Number(n) => Some(*n),
            _ => None,
        }
    }

    /// Returns the items, if this is a list value.
    pub fn as_list(&self) -> Option<&[String]> {
        match self {
            Self::List(items) => Some(items),
            _ => None,
        }
    }

    /// Returns the text an input control should display for this value.
    ///
    /// Zero renders as empty so a cleared numeric input stays cleared.
    pub fn to_input(&self) -> String {
        match self {
            Self::Text(s) => s.clone(),
            Self::Number(0) => String::new(),
            Self::Number(n) => n.to_string(),
            Self::List(items) => items.join(", "),
        }
    }

    /// Parses raw input text into a value of the same variant as `self`.
    ///
    /// Numbers treat empty input as `0` and return `None` for anything that
    /// is not an integer. Lists split on commas, dropping blank entries.
    pub(crate) fn coerce(&self, raw: &str) -> Option<FieldValue> {
        match self {
            Self::Text(_) => Some(Self::Text(raw.to_string())),
            Self::Number(_) => {
                let trimmed = raw.trim();
                if trimmed.is_empty() {
                    Some(Self::Number(0))
                } else {
                    trimmed.parse().ok().map(Self::Number)
                }
            }
            Self::List(_) => Some(Self::List(
                raw.split(',')
                    .map(str::trim)
                    .filter(|s| !s.is_empty())
                    .map(str::to_string)
                    .collect(),
            )),
        }
    }
}

#[mutants::skip]
impl fmt::Display for FieldValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_input())
    }
}

impl From<&str> for FieldValue {
    fn from(s: &str) -> Self {
        Self::Text(s.to_string())
    }
}

impl From<String> for FieldValue {
    fn from(s: String) -> Self {
        Self::Text(s)
    }
}

impl From<i64> for FieldValue {
    fn from(n: i64) -> Self {
        Self::Number(n)
    }
}

impl From<Vec<String>> for FieldValue {
    fn from(items: Vec<String>) -> Self {
        Self::List(items)
    }
}

/// Outcome of a field validator.
///
/// Validators either signal pass/fail (`Valid`/`Invalid`) or fail with an
/// explanation (`Message`).
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Verdict {
    Valid,
    Invalid,
    Message(String),
}

impl Verdict {
    pub fn is_valid(&self) -> bool {
        matches!(self, Self::Valid)
    }

    pub fn message(&self) -> Option<&str> {
        match self {
            Self::Message(m) => Some(m),
            _ => None,
        }
    }
}

impl From<bool> for Verdict {
    fn from(ok: bool) -> Self {
        if ok { Self::Valid } else { Self::Invalid }
    }
}

impl From<&str> for Verdict {
    fn from(message: &str) -> Self {
        Self::Message(message.to_string())
    }
}

impl From<String> for Verdict {
    fn from(message: String) -> Self {
        Self::Message(message)
    }
}

impl<E: fmt::Display> From<Result<(), E>> for Verdict {
    fn from(result: Result<(), E>) -> Self {
        match result {
            Ok(()) => Self::Valid,
            Err(e) => Self::Message(e.to_string()),
        }
    }
}

#[cfg(test)]
mod tests {
    use quickcheck_macros::quickcheck;

    use super::*;

    mod emptiness {
        use super::*;

        #[test]
        fn empty_values() {
            assert!(FieldValue::Text(String::new()).is_empty());
            assert!(FieldValue::Number(0).is_empty());
            assert!(FieldValue::List(vec![]).is_empty());
        }

        #[test]
        fn non_empty_values() {
            assert!(!FieldValue::from("x").is_empty());
            assert!(!FieldValue::Number(-1).is_empty());
            assert!(!FieldValue::List(vec![String::new()]).is_empty());
        }

        #[test]
        fn default_is_empty_text() {
            assert_eq!(FieldValue::default(), FieldValue::Text(String::new()));
        }
    }

    mod coerce {
        use super::*;

        #[test]
        fn text_is_verbatim() {
            let template = FieldValue::default();
            assert_eq!(template.coerce(" a b "), Some(FieldValue::from(" a b ")));
        }

        #[test]
        fn number_parses_integer() {
            let template = FieldValue::Number(0);
            assert_eq!(template.coerce("405"), Some(FieldValue::Number(405)));
        }

        #[test]
        fn number_empty_is_zero() {
            let template = FieldValue::Number(7);
            assert_eq!(template.coerce(""), Some(FieldValue::Number(0)));
        }

        #[test]
        fn number_rejects_garbage() {
            let template = FieldValue::Number(0);
            assert_eq!(template.coerce("4a"), None);
        }

        #[test]
        fn list_splits_and_trims() {
            let template = FieldValue::List(vec![]);
            assert_eq!(
                template.coerce("peanuts, shrimp,, "),
                Some(FieldValue::List(vec!["peanuts".into(), "shrimp".into()]))
            );
        }

        #[quickcheck]
        fn number_input_round_trips(n: i64) -> bool {
            let template = FieldValue::Number(0);
            let shown = FieldValue::Number(n).to_input();
            template.coerce(&shown) == Some(FieldValue::Number(n))
        }
    }

    mod to_input {
        use super::*;

        #[test]
        fn zero_is_blank() {
            assert_eq!(FieldValue::Number(0).to_input(), "");
        }

        #[test]
        fn list_joins_with_comma() {
            let v = FieldValue::List(vec!["a".into(), "b".into()]);
            assert_eq!(v.to_input(), "a, b");
        }
    }

    mod verdict {
        use super::*;

        #[test]
        fn from_bool() {
            assert_eq!(Verdict::from(true), Verdict::Valid);
            assert_eq!(Verdict::from(false), Verdict::Invalid);
        }

        #[test]
        fn from_message_is_invalid() {
            let v = Verdict::from("Invalid email");
            assert!(!v.is_valid());
            assert_eq!(v.message(), Some("Invalid email"));
        }

        #[test]
        fn from_result() {
            let ok: Result<(), String> = Ok(());
            assert_eq!(Verdict::from(ok), Verdict::Valid);
            let err: Result<(), String> = Err("bad".into());
            assert_eq!(Verdict::from(err), Verdict::Message("bad".into()));
        }

        #[test]
        fn boolean_verdicts_have_no_message() {
            assert_eq!(Verdict::Valid.message(), None);
            assert_eq!(Verdict::Invalid.message(), None);
        }
    }
}
