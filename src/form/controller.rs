use std::collections::{HashMap, HashSet};
use std::fmt;
use std::hash::Hash;
use std::rc::Rc;

use thiserror::Error;
use tracing::{debug, warn};

use super::derive::{Derived, Values, derive_validity};
use super::notify::{Notice, Notifier};
use super::spec::FieldSpec;
use super::value::FieldValue;

/// Message sent by [`FormController::notify_if_invalid`].
pub const FORM_INVALID_MESSAGE: &str =
    "Some fields are missing or invalid. Check the form and try again.";

/// Misuse of the form API by the calling code.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum FormError {
    /// Two specs share a key.
    #[error("duplicate form field key: {0}")]
    DuplicateKey(String),
    /// A key that no spec declares.
    #[error("unknown form field key: {0}")]
    UnknownKey(String),
}

/// Everything an input control needs to render one field.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldProps {
    pub value: FieldValue,
    pub required: bool,
    /// `true` when the validator rejected the current value.
    pub error: bool,
    /// Validator message, present only when the validator produced one.
    pub helper_msg: Option<String>,
}

impl FieldProps {
    /// Resolves the helper text to show: the validation message when there
    /// is one, otherwise the caller's own helper text.
    pub fn helper_or<'a>(&'a self, fallback: Option<&'a str>) -> Option<&'a str> {
        self.helper_msg.as_deref().or(fallback)
    }
}

/// Holds the values of a fixed set of fields and keeps their validation
/// state in sync.
#[derive(Clone)]
pub struct FormController<K: Eq + Hash> {
    specs: Vec<FieldSpec<K>>,
    values: Values<K>,
    derived: Derived<K>,
    notifier: Rc<dyn Notifier>,
}

impl<K> FormController<K>
where
    K: Copy + Eq + Hash + fmt::Debug,
{
    /// Creates a controller with every field at its default value.
    ///
    /// Returns [`FormError::DuplicateKey`] if two specs share a key.
    pub fn new(specs: Vec<FieldSpec<K>>, notifier: Rc<dyn Notifier>) -> Result<Self, FormError> {
        let mut seen = HashSet::with_capacity(specs.len());
        if let Some(dup) = specs.iter().find(|spec| !seen.insert(spec.key)) {
            return Err(FormError::DuplicateKey(format!("{:?}", dup.key)));
        }

        let values = defaults(&specs);
        let derived = derive_validity(&values, &specs);
        Ok(Self {
            specs,
            values,
            derived,
            notifier,
        })
    }

    /// Returns field keys in declaration order.
    pub fn keys(&self) -> impl Iterator<Item = K> + '_ {
        self.specs.iter().map(|spec| spec.key)
    }

    pub fn values(&self) -> &Values<K> {
        &self.values
    }

    pub fn value(&self, key: K) -> Option<&FieldValue> {
        self.values.get(&key)
    }

    /// Replaces values for the given keys; keys not present keep their
    /// current value. Nothing changes if any key is unknown.
    pub fn set_values(&mut self, values: Values<K>) -> Result<(), FormError> {
        if let Some(key) = values.keys().find(|key| self.spec(**key).is_none()) {
            return Err(FormError::UnknownKey(format!("{key:?}")));
        }
        self.values.extend(values);
        self.recompute();
        Ok(())
    }

    /// Replaces the value of a single field.
    pub fn set_value(&mut self, key: K, value: impl Into<FieldValue>) -> Result<(), FormError> {
        if self.spec(key).is_none() {
            return Err(FormError::UnknownKey(format!("{key:?}")));
        }
        self.values.insert(key, value.into());
        self.recompute();
        Ok(())
    }

    /// Puts every field back to its default value.
    pub fn reset(&mut self) {
        self.values = defaults(&self.specs);
        self.recompute();
    }

    pub fn messages(&self) -> &HashMap<K, Option<String>> {
        &self.derived.messages
    }

    pub fn validity(&self) -> &HashMap<K, bool> {
        &self.derived.validity
    }

    pub fn strict_validity(&self) -> &HashMap<K, bool> {
        &self.derived.strict_validity
    }

    pub fn derived(&self) -> &Derived<K> {
        &self.derived
    }

    pub fn form_ok(&self) -> bool {
        self.derived.form_ok()
    }

    /// Sets one field from raw input text, coerced to the type of the
    /// field's default value.
    ///
    /// Returns `false` and leaves the value untouched when the text cannot
    /// be coerced (e.g. letters typed into a numeric field).
    pub fn on_change(&mut self, key: K, raw: &str) -> bool {
        let Some(spec) = self.spec(key) else {
            warn!(?key, "on_change for undeclared form field");
            return false;
        };
        match spec.default_value.coerce(raw) {
            Some(value) => {
                self.values.insert(key, value);
                self.recompute();
                true
            }
            None => {
                debug!(?key, raw, "rejected input that does not fit field type");
                false
            }
        }
    }

    /// Returns render props for a field, or `None` for an undeclared key.
    pub fn field_props(&self, key: K) -> Option<FieldProps> {
        let spec = self.spec(key)?;
        let value = self
            .values
            .get(&key)
            .cloned()
            .unwrap_or_else(|| spec.default_value.clone());
        Some(FieldProps {
            value,
            required: spec.required,
            error: !self.derived.validity.get(&key).copied().unwrap_or(true),
            helper_msg: self.derived.messages.get(&key).cloned().flatten(),
        })
    }

    /// Sends [`FORM_INVALID_MESSAGE`] through the notifier if the form is
    /// not OK. Returns whether a notice was sent.
    pub fn notify_if_invalid(&self) -> bool {
        if self.form_ok() {
            return false;
        }
        debug!(invalid = ?self.invalid_keys(), "form submitted while invalid");
        self.notifier.notify(Notice::error(FORM_INVALID_MESSAGE));
        true
    }

    /// Returns the keys that are not strictly valid, in declaration order.
    pub fn invalid_keys(&self) -> Vec<K> {
        self.keys()
            .filter(|key| !self.derived.strict_validity.get(key).copied().unwrap_or(true))
            .collect()
    }

    fn spec(&self, key: K) -> Option<&FieldSpec<K>> {
        self.specs.iter().find(|spec| spec.key == key)
    }

    fn recompute(&mut self) {
        self.derived = derive_validity(&self.values, &self.specs);
    }
}

fn defaults<K: Copy + Eq + Hash>(specs: &[FieldSpec<K>]) -> Values<K> {
    specs
        .iter()
        .map(|spec| (spec.key, spec.default_value.clone()))
        .collect()
}

#[mutants::skip]
impl<K: Eq + Hash + fmt::Debug> fmt::Debug for FormController<K> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FormController")
            .field("specs", &self.specs)
            .field("values", &self.values)
            .field("derived", &self.derived)
            .finish_non_exhaustive()
    }
}
