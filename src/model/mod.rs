mod breakpoint;
mod classroom;
mod person;
mod validation;

pub use breakpoint::{Breakpoint, UnknownBreakpoint};
pub use classroom::Classroom;
pub use person::{Identified, Student, StudentCompact, Teacher, TeacherCompact};
pub use validation::{
    ValidationError, validate_birthdate, validate_class_number, validate_email, validate_phone,
    validate_student_id,
};
