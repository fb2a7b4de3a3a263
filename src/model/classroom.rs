use super::person::Student;

/// A homeroom class and its roster.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Classroom {
    /// Grade and room, e.g. `405` for grade 4 room 5.
    pub number: u16,
    /// Academic year (Buddhist Era, e.g. `2568`).
    pub year: i32,
    /// Teacher IDs of the class advisors.
    pub advisor_ids: Vec<String>,
    pub students: Vec<Student>,
}

impl Classroom {
    /// Creates an empty class.
    pub fn new(number: u16, year: i32) -> Self {
        Self {
            number,
            year,
            advisor_ids: Vec::new(),
            students: Vec::new(),
        }
    }

    /// Returns the grade (first digit of the class number).
    pub fn grade(&self) -> u16 {
        self.number / 100
    }

    /// Returns the room within the grade.
    pub fn room(&self) -> u16 {
        self.number % 100
    }

    /// Returns the student with the given ID, if enrolled.
    pub fn student(&self, id: &str) -> Option<&Student> {
        self.students.iter().find(|s| s.id == id)
    }
}
