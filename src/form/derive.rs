use std::collections::HashMap;
use std::hash::Hash;

use super::spec::FieldSpec;
use super::value::FieldValue;

/// Current field values by key.
pub type Values<K> = HashMap<K, FieldValue>;

/// Validation state derived from values and specs.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Derived<K: Eq + Hash> {
    /// Validator message per field; `None` when the validator produced none.
    pub messages: HashMap<K, Option<String>>,
    /// Validator outcome per field, ignoring `required`.
    pub validity: HashMap<K, bool>,
    /// Validator outcome combined with `required`.
    pub strict_validity: HashMap<K, bool>,
}

impl<K: Eq + Hash> Derived<K> {
    /// `true` iff every field is strictly valid.
    pub fn form_ok(&self) -> bool {
        self.strict_validity.values().all(|ok| *ok)
    }
}

/// Computes messages, validity and strict validity for every field.
///
/// A key missing from `values` is evaluated at its spec default.
pub fn derive_validity<K>(values: &Values<K>, specs: &[FieldSpec<K>]) -> Derived<K>
where
    K: Copy + Eq + Hash,
{
    let mut derived = Derived {
        messages: HashMap::with_capacity(specs.len()),
        validity: HashMap::with_capacity(specs.len()),
        strict_validity: HashMap::with_capacity(specs.len()),
    };

    for spec in specs {
        let value = values.get(&spec.key).unwrap_or(&spec.default_value);
        let verdict = spec.check(value);
        let valid = verdict.is_valid();
        let strict = valid && !(spec.required && value.is_empty());

        derived
            .messages
            .insert(spec.key, verdict.message().map(str::to_string));
        derived.validity.insert(spec.key, valid);
        derived.strict_validity.insert(spec.key, strict);
    }

    derived
}
