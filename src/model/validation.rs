use std::sync::LazyLock;

use chrono::{NaiveDate, Utc};
use regex::Regex;
use thiserror::Error;

/// Validation errors for school directory fields.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("invalid email: {0}")]
    InvalidEmail(String),
    #[error("invalid phone number: {0}")]
    InvalidPhone(String),
    #[error("invalid student ID: {0}")]
    InvalidStudentId(String),
    #[error("invalid class number: {0}")]
    InvalidClassNumber(String),
    #[error("invalid birthdate: {0}")]
    InvalidBirthdate(String),
    #[error("birthdate is in the future: {0}")]
    FutureBirthdate(NaiveDate),
}

static EMAIL_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^\S+@\S+$").expect("valid hardcoded regex"));

static PHONE_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^0\d{9}$").expect("valid hardcoded regex"));

static STUDENT_ID_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^\d{5}$").expect("valid hardcoded regex"));

static CLASS_NUMBER_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[1-6](0[1-9]|1[0-5])$").expect("valid hardcoded regex"));

/// Validates an email address: something, an `@`, something, no whitespace.
pub fn validate_email(email: &str) -> Result<(), ValidationError> {
    if EMAIL_RE.is_match(email) {
        Ok(())
    } else {
        Err(ValidationError::InvalidEmail(email.to_string()))
    }
}

/// Validates a Thai phone number: ten digits starting with `0`.
pub fn validate_phone(phone: &str) -> Result<(), ValidationError> {
    if PHONE_RE.is_match(phone) {
        Ok(())
    } else {
        Err(ValidationError::InvalidPhone(phone.to_string()))
    }
}

/// Validates a five-digit student ID (e.g. `54321`).
pub fn validate_student_id(id: &str) -> Result<(), ValidationError> {
    if STUDENT_ID_RE.is_match(id) {
        Ok(())
    } else {
        Err(ValidationError::InvalidStudentId(id.to_string()))
    }
}

/// Validates a class number: grade 1-6 followed by a two-digit room 01-15
/// (e.g. `101`, `615`).
pub fn validate_class_number(number: &str) -> Result<(), ValidationError> {
    if CLASS_NUMBER_RE.is_match(number) {
        Ok(())
    } else {
        Err(ValidationError::InvalidClassNumber(number.to_string()))
    }
}

/// Validates a `YYYY-MM-DD` birthdate that is not in the future.
pub fn validate_birthdate(date: &str) -> Result<NaiveDate, ValidationError> {
    let parsed = NaiveDate::parse_from_str(date, "%Y-%m-%d")
        .map_err(|_| ValidationError::InvalidBirthdate(date.to_string()))?;
    if parsed > Utc::now().date_naive() {
        return Err(ValidationError::FutureBirthdate(parsed));
    }
    Ok(parsed)
}
