//! Master/detail selection: a list of compact items, the selected id, and
//! the detailed item loaded for it.
//!
//! Detail fetches are tagged with a generation number; a result is applied
//! only if no newer selection or refresh has started since, so the latest
//! selection always wins regardless of completion order.

mod controller;
mod options;

pub use controller::{Fetcher, ListDetail, SettleOutcome};
pub use options::ListDetailOptions;
