use std::fs::{self, OpenOptions};
use std::io::Write;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use super::error::{BackendError, BackendResult};
use crate::model::{
    Classroom, Student, StudentCompact, Teacher, TeacherCompact, validate_student_id,
};

/// Serializable class metadata (everything except the roster).
///
/// Used as the first line of each class file.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
struct ClassMetadata {
    number: u16,
    year: i32,
    #[serde(default)]
    advisor_ids: Vec<String>,
}

impl ClassMetadata {
    fn from_class(class: &Classroom) -> Self {
        Self {
            number: class.number,
            year: class.year,
            advisor_ids: class.advisor_ids.clone(),
        }
    }

    fn into_class(self, students: Vec<Student>) -> Classroom {
        Classroom {
            number: self.number,
            year: self.year,
            advisor_ids: self.advisor_ids,
            students,
        }
    }
}

/// Manages the JSONL-backed school directory.
#[derive(Debug, Clone)]
pub struct Directory {
    base_path: PathBuf,
}

impl Directory {
    /// Creates a directory in the XDG data directory
    /// (`~/.local/share/mysk/`), creating it if needed.
    pub fn new() -> BackendResult<Self> {
        let data_dir = dirs::data_dir().ok_or(BackendError::NoDataDir)?;
        Self::with_path(data_dir.join("mysk"))
    }

    /// Creates a directory rooted at the given path.
    pub fn with_path(path: impl Into<PathBuf>) -> BackendResult<Self> {
        let base_path = path.into();
        fs::create_dir_all(base_path.join("classes"))?;
        Ok(Self { base_path })
    }

    pub fn base_path(&self) -> &Path {
        &self.base_path
    }

    fn class_path(&self, number: u16) -> PathBuf {
        class_path(&self.base_path, number)
    }

    fn teachers_path(&self) -> PathBuf {
        teachers_path(&self.base_path)
    }

    /// Writes a complete class to disk (metadata + roster), replacing any
    /// existing file for the class.
    pub fn save_class(&self, class: &Classroom) -> BackendResult<()> {
        let staged = self.stage_class(class)?;
        fs::rename(&staged, self.class_path(class.number))?;
        debug!(class = class.number, students = class.students.len(), "saved class");
        Ok(())
    }

    /// Writes `class` to a temporary file next to its class file and
    /// returns the temporary path.
    fn stage_class(&self, class: &Classroom) -> BackendResult<PathBuf> {
        let path = staging_path(&self.class_path(class.number));
        let mut file = fs::File::create(&path)?;

        serde_json::to_writer(&mut file, &ClassMetadata::from_class(class))?;
        writeln!(file)?;

        for student in &class.students {
            serde_json::to_writer(&mut file, student)?;
            writeln!(file)?;
        }
        Ok(path)
    }

    /// Creates a new class.
    ///
    /// Returns [`BackendError::DuplicateClass`] if the class already exists.
    pub fn create_class(&self, class: &Classroom) -> BackendResult<()> {
        if self.class_path(class.number).exists() {
            return Err(BackendError::DuplicateClass(class.number));
        }
        self.save_class(class)?;
        info!(class = class.number, "created class");
        Ok(())
    }

    /// Loads one class and its roster.
    pub fn load_class(&self, number: u16) -> BackendResult<Classroom> {
        let path = self.class_path(number);
        if !path.exists() {
            return Err(BackendError::UnknownClass(number));
        }
        parse_class(&fs::read_to_string(&path)?, &path)
    }

    /// Lists all classes ordered by class number.
    pub fn list_classes(&self) -> BackendResult<Vec<Classroom>> {
        let mut classes = fs::read_dir(self.base_path.join("classes"))?
            .collect::<Result<Vec<_>, _>>()?
            .into_iter()
            .map(|entry| entry.path())
            .filter(|path| is_jsonl(path))
            .map(|path| parse_class(&fs::read_to_string(&path)?, &path))
            .collect::<BackendResult<Vec<_>>>()?;

        classes.sort_by_key(|c| c.number);
        Ok(classes)
    }

    /// Appends a student to their class roster.
    ///
    /// Returns [`BackendError::Validation`] for a malformed student ID,
    /// [`BackendError::UnknownClass`] if the class does not exist and
    /// [`BackendError::DuplicateStudent`] if the ID is enrolled anywhere.
    pub fn enroll_student(&self, student: &Student) -> BackendResult<()> {
        validate_student_id(&student.id)?;
        let path = self.class_path(student.class_number);
        if !path.exists() {
            return Err(BackendError::UnknownClass(student.class_number));
        }
        if let Some(existing) = self.locate_student(&student.id)? {
            return Err(BackendError::DuplicateStudent {
                id: student.id.clone(),
                class_number: existing.number,
            });
        }

        let mut file = OpenOptions::new().append(true).open(&path)?;
        serde_json::to_writer(&mut file, student)?;
        writeln!(file)?;

        info!(id = %student.id, class = student.class_number, "enrolled student");
        Ok(())
    }

    /// Replaces a student's record, moving them if their class changed.
    pub fn update_student(&self, student: &Student) -> BackendResult<()> {
        let mut current = self
            .locate_student(&student.id)?
            .ok_or_else(|| BackendError::NotFound(student.id.clone()))?;

        if current.number == student.class_number {
            for slot in current.students.iter_mut().filter(|s| s.id == student.id) {
                *slot = student.clone();
            }
            self.save_class(&current)?;
        } else {
            let mut target = self.load_class(student.class_number)?;
            current.students.retain(|s| s.id != student.id);
            target.students.push(student.clone());

            // Both rosters are staged before either file is replaced.
            let staged_target = self.stage_class(&target)?;
            let staged_current = match self.stage_class(&current) {
                Ok(path) => path,
                Err(e) => {
                    let _ = fs::remove_file(&staged_target);
                    return Err(e);
                }
            };
            fs::rename(&staged_current, self.class_path(current.number))?;
            fs::rename(&staged_target, self.class_path(target.number))?;
        }

        info!(id = %student.id, "updated student");
        Ok(())
    }

    /// Lists every student, ordered by class then seat number.
    pub fn list_students(&self) -> BackendResult<Vec<StudentCompact>> {
        let mut students: Vec<StudentCompact> = self
            .list_classes()?
            .iter()
            .flat_map(|c| c.students.iter().map(Student::compact))
            .collect();
        students.sort_by_key(|s| (s.class_number, s.class_no));
        Ok(students)
    }

    /// Loads one student's full profile.
    pub fn find_student(&self, id: &str) -> BackendResult<Student> {
        self.locate_student(id)?
            .and_then(|class| class.student(id).cloned())
            .ok_or_else(|| BackendError::NotFound(id.to_string()))
    }

    /// Inserts or replaces a teacher record.
    pub fn save_teacher(&self, teacher: &Teacher) -> BackendResult<()> {
        let mut teachers = self.load_teachers()?;
        match teachers.iter_mut().find(|t| t.id == teacher.id) {
            Some(slot) => *slot = teacher.clone(),
            None => teachers.push(teacher.clone()),
        }

        let mut file = fs::File::create(self.teachers_path())?;
        for t in &teachers {
            serde_json::to_writer(&mut file, t)?;
            writeln!(file)?;
        }

        info!(id = %teacher.id, "saved teacher");
        Ok(())
    }

    /// Lists every teacher ordered by ID.
    pub fn list_teachers(&self) -> BackendResult<Vec<TeacherCompact>> {
        let mut teachers: Vec<TeacherCompact> =
            self.load_teachers()?.iter().map(Teacher::compact).collect();
        teachers.sort_by(|a, b| a.id.cmp(&b.id));
        Ok(teachers)
    }

    /// Loads one teacher's full profile.
    pub fn find_teacher(&self, id: &str) -> BackendResult<Teacher> {
        self.load_teachers()?
            .into_iter()
            .find(|t| t.id == id)
            .ok_or_else(|| BackendError::NotFound(id.to_string()))
    }

    fn load_teachers(&self) -> BackendResult<Vec<Teacher>> {
        let path = self.teachers_path();
        if !path.exists() {
            return Ok(Vec::new());
        }
        parse_teachers(&fs::read_to_string(path)?)
    }

    /// Returns the class containing the student with `id`, if any.
    fn locate_student(&self, id: &str) -> BackendResult<Option<Classroom>> {
        Ok(self
            .list_classes()?
            .into_iter()
            .find(|class| class.student(id).is_some()))
    }
}

pub(super) fn class_path(base: &Path, number: u16) -> PathBuf {
    base.join("classes").join(format!("{number}.jsonl"))
}

fn staging_path(path: &Path) -> PathBuf {
    path.with_extension("jsonl.tmp")
}

pub(super) fn teachers_path(base: &Path) -> PathBuf {
    base.join("teachers.jsonl")
}

pub(super) fn is_jsonl(path: &Path) -> bool {
    path.is_file() && path.extension().is_some_and(|ext| ext == "jsonl")
}

/// Parses a class file: metadata on the first line, one student per
/// remaining non-blank line.
pub(super) fn parse_class(text: &str, path: &Path) -> BackendResult<Classroom> {
    let mut lines = text.lines().filter(|line| !line.trim().is_empty());

    let metadata_line = lines
        .next()
        .ok_or_else(|| BackendError::EmptyClassFile(path.to_path_buf()))?;
    let metadata: ClassMetadata = serde_json::from_str(metadata_line)?;

    let students = lines
        .map(|line| serde_json::from_str(line).map_err(BackendError::Json))
        .collect::<BackendResult<Vec<Student>>>()?;

    Ok(metadata.into_class(students))
}

/// Parses `teachers.jsonl`: one teacher per non-blank line.
pub(super) fn parse_teachers(text: &str) -> BackendResult<Vec<Teacher>> {
    text.lines()
        .filter(|line| !line.trim().is_empty())
        .map(|line| serde_json::from_str(line).map_err(BackendError::Json))
        .collect()
}
