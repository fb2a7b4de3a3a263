use std::path::PathBuf;

use crate::model::ValidationError;

/// Errors returned by school directory operations.
#[derive(Debug, thiserror::Error)]
pub enum BackendError {
    /// An I/O error occurred while reading or writing a file.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// A JSON serialization or deserialization error occurred.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// The platform does not provide a data directory.
    #[error("could not determine XDG data directory")]
    NoDataDir,

    /// A class file exists but contains no metadata line.
    #[error("class file is empty: {0}")]
    EmptyClassFile(PathBuf),

    /// No student or teacher has the requested ID.
    #[error("no record with ID {0}")]
    NotFound(String),

    /// A student with this ID is already enrolled somewhere.
    #[error("student {id} is already enrolled in class {class_number}")]
    DuplicateStudent {
        /// The conflicting student ID.
        id: String,
        /// The class the existing student belongs to.
        class_number: u16,
    },

    /// The class has no file in the directory.
    #[error("class {0} does not exist")]
    UnknownClass(u16),

    /// A class with this number already exists.
    #[error("class {0} already exists")]
    DuplicateClass(u16),

    /// A record failed field validation.
    #[error(transparent)]
    Validation(#[from] ValidationError),
}

/// Result of any directory call: the value, or why there is none.
pub type BackendResult<T> = Result<T, BackendError>;
