use std::fmt;
use std::rc::Rc;

use super::value::{FieldValue, Verdict};

/// A field validator. Only ever called with non-empty values.
pub type Validator = Rc<dyn Fn(&FieldValue) -> Verdict>;

/// Declarative description of one form field.
#[derive(Clone)]
pub struct FieldSpec<K> {
    pub(crate) key: K,
    pub(crate) default_value: FieldValue,
    pub(crate) validate: Option<Validator>,
    pub(crate) required: bool,
}

impl<K> FieldSpec<K> {
    /// Creates an optional, unvalidated text field defaulting to `""`.
    pub fn new(key: K) -> Self {
        Self {
            key,
            default_value: FieldValue::default(),
            validate: None,
            required: false,
        }
    }

    /// Sets the value the field starts with and resets to. Its variant also
    /// decides how raw input is coerced.
    pub fn default_value(mut self, value: impl Into<FieldValue>) -> Self {
        self.default_value = value.into();
        self
    }

    /// Marks the field as required: an empty value fails strict validity.
    pub fn required(mut self) -> Self {
        self.required = true;
        self
    }

    /// Attaches a validator over the raw [`FieldValue`].
    pub fn validate<F, V>(mut self, f: F) -> Self
    where
        F: Fn(&FieldValue) -> V + 'static,
        V: Into<Verdict>,
    {
        self.validate = Some(Rc::new(move |value: &FieldValue| -> Verdict {
            f(value).into()
        }));
        self
    }

    /// Attaches a validator over the field's input text.
    pub fn validate_text<F, V>(self, f: F) -> Self
    where
        F: Fn(&str) -> V + 'static,
        V: Into<Verdict>,
    {
        self.validate(move |value: &FieldValue| f(&value.to_input()))
    }

    pub fn key(&self) -> &K {
        &self.key
    }

    pub fn default(&self) -> &FieldValue {
        &self.default_value
    }

    pub fn is_required(&self) -> bool {
        self.required
    }

    /// Runs the validator; empty values and unvalidated fields pass.
    pub(crate) fn check(&self, value: &FieldValue) -> Verdict {
        match &self.validate {
            Some(validate) if !value.is_empty() => validate(value),
            _ => Verdict::Valid,
        }
    }
}

#[mutants::skip]
impl<K: fmt::Debug> fmt::Debug for FieldSpec<K> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FieldSpec")
            .field("key", &self.key)
            .field("default_value", &self.default_value)
            .field("validate", &self.validate.as_ref().map(|_| ".."))
            .field("required", &self.required)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use std::cell::Cell;

    use super::*;

    #[test]
    fn new_defaults() {
        let spec = FieldSpec::new("name");
        assert_eq!(spec.key(), &"name");
        assert_eq!(spec.default(), &FieldValue::default());
        assert!(!spec.is_required());
    }

    #[test]
    fn builder_sets_fields() {
        let spec = FieldSpec::new("class").default_value(101_i64).required();
        assert_eq!(spec.default(), &FieldValue::Number(101));
        assert!(spec.is_required());
    }

    #[test]
    fn check_without_validator_passes() {
        let spec = FieldSpec::new("x");
        assert_eq!(spec.check(&FieldValue::from("anything")), Verdict::Valid);
    }

    #[test]
    fn check_skips_validator_for_empty_values() {
        let calls = Rc::new(Cell::new(0));
        let seen = Rc::clone(&calls);
        let spec = FieldSpec::new("x").validate(move |_: &FieldValue| {
            seen.set(seen.get() + 1);
            false
        });
        assert_eq!(spec.check(&FieldValue::default()), Verdict::Valid);
        assert_eq!(calls.get(), 0);
        assert_eq!(spec.check(&FieldValue::from("a")), Verdict::Invalid);
        assert_eq!(calls.get(), 1);
    }

    #[test]
    fn validate_text_sees_input_text() {
        let spec = FieldSpec::new("n")
            .default_value(0_i64)
            .validate_text(|s: &str| s.len() == 3);
        assert_eq!(spec.check(&FieldValue::Number(405)), Verdict::Valid);
        assert_eq!(spec.check(&FieldValue::Number(45)), Verdict::Invalid);
    }

    #[test]
    #[should_panic(expected = "validator bug")]
    fn panicking_validator_propagates() {
        let spec =
            FieldSpec::new("x").validate(|_: &FieldValue| -> bool { panic!("validator bug") });
        spec.check(&FieldValue::from("a"));
    }
}
