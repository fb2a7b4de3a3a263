//! Reusable TUI widgets.

pub mod form;
pub mod snackbar;

pub use form::{FieldLabel, FormView, draw_form};
pub use snackbar::{Snackbar, draw_snackbar};
