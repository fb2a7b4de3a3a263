use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use super::validation::{ValidationError, validate_class_number, validate_student_id};

/// Anything listed by the directory: has a stable string id.
pub trait Identified {
    fn id(&self) -> &str;
}

/// A student as listed in rosters and search results.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StudentCompact {
    pub id: String,
    pub first_name: String,
    pub last_name: String,
    pub class_number: u16,
    /// Seat number within the class.
    pub class_no: u16,
}

/// A fully populated student profile.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Student {
    pub id: String,
    pub first_name: String,
    pub last_name: String,
    #[serde(default)]
    pub nickname: Option<String>,
    pub class_number: u16,
    pub class_no: u16,
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default)]
    pub phone: Option<String>,
    #[serde(default)]
    pub birthdate: Option<NaiveDate>,
    #[serde(default)]
    pub allergies: Vec<String>,
}

impl Student {
    /// Creates a student with only the identifying fields set, validating
    /// the student ID and class number.
    pub fn new(
        id: String,
        first_name: String,
        last_name: String,
        class_number: u16,
        class_no: u16,
    ) -> Result<Self, ValidationError> {
        validate_student_id(&id)?;
        validate_class_number(&class_number.to_string())?;
        Ok(Self {
            id,
            first_name,
            last_name,
            nickname: None,
            class_number,
            class_no,
            email: None,
            phone: None,
            birthdate: None,
            allergies: Vec::new(),
        })
    }

    /// Returns `"First Last"`.
    pub fn full_name(&self) -> String {
        format!("{} {}", self.first_name, self.last_name)
    }

    /// Returns the list representation of this student.
    pub fn compact(&self) -> StudentCompact {
        StudentCompact {
            id: self.id.clone(),
            first_name: self.first_name.clone(),
            last_name: self.last_name.clone(),
            class_number: self.class_number,
            class_no: self.class_no,
        }
    }
}

impl StudentCompact {
    /// Returns `"First Last"`.
    pub fn full_name(&self) -> String {
        format!("{} {}", self.first_name, self.last_name)
    }
}

impl Identified for StudentCompact {
    fn id(&self) -> &str {
        &self.id
    }
}

impl Identified for Student {
    fn id(&self) -> &str {
        &self.id
    }
}

/// A teacher as listed in search results.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TeacherCompact {
    pub id: String,
    pub first_name: String,
    pub last_name: String,
    pub subject_group: String,
}

/// A fully populated teacher profile.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Teacher {
    pub id: String,
    pub first_name: String,
    pub last_name: String,
    pub subject_group: String,
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default)]
    pub phone: Option<String>,
    /// Class this teacher advises, if any.
    #[serde(default)]
    pub class_advisor_at: Option<u16>,
    #[serde(default)]
    pub subjects: Vec<String>,
}

impl Teacher {
    /// Returns `"First Last"`.
    pub fn full_name(&self) -> String {
        format!("{} {}", self.first_name, self.last_name)
    }

    /// Returns the list representation of this teacher.
    pub fn compact(&self) -> TeacherCompact {
        TeacherCompact {
            id: self.id.clone(),
            first_name: self.first_name.clone(),
            last_name: self.last_name.clone(),
            subject_group: self.subject_group.clone(),
        }
    }
}

impl TeacherCompact {
    /// Returns `"First Last"`.
    pub fn full_name(&self) -> String {
        format!("{} {}", self.first_name, self.last_name)
    }
}

impl Identified for TeacherCompact {
    fn id(&self) -> &str {
        &self.id
    }
}

impl Identified for Teacher {
    fn id(&self) -> &str {
        &self.id
    }
}
