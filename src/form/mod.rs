//! Declarative form state: field specs in, values, validity, and
//! ready-to-render field props out.
//!
//! Derived state (`messages`, `validity`, `strict_validity`) is recomputed
//! by [`derive_validity`] after every mutation; nothing derived is ever
//! edited directly.

mod controller;
mod derive;
mod notify;
mod spec;
mod value;

pub use controller::{FORM_INVALID_MESSAGE, FieldProps, FormController, FormError};
pub use derive::{Derived, Values, derive_validity};
pub use notify::{Notice, Notifier, Severity};
pub use spec::{FieldSpec, Validator};
pub use value::{FieldValue, Verdict};
