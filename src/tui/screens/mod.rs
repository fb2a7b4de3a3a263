//! TUI screen implementations.

pub mod help;
pub mod lookup;
pub mod profile_edit;

pub use help::{HelpState, draw_help};
pub use lookup::{DetailView, LookupRow, LookupState, draw_lookup};
pub use profile_edit::{ProfileEditState, ProfileField, draw_profile_edit};
