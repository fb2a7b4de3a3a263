//! JSONL school directory, the data source behind every lookup.
//!
//! Each class is stored as `classes/<number>.jsonl`: line 1 is class
//! metadata, lines 2+ are student records, so enrolling a student is a
//! single-line append. Teachers live in `teachers.jsonl`, one per line.

mod directory;
mod error;
mod fetch;

pub use directory::Directory;
pub use error::{BackendError, BackendResult};
pub use fetch::{fetch_student, fetch_teacher};

#[cfg(test)]
pub(crate) use directory::tests as test_support;
