//! Async lookups used as list-detail fetchers.

use std::path::PathBuf;
use std::rc::Rc;

use futures::future::FutureExt;
use tokio::fs;

use super::directory::{Directory, is_jsonl, parse_class, parse_teachers, teachers_path};
use super::error::{BackendError, BackendResult};
use crate::list_detail::Fetcher;
use crate::model::{Student, Teacher};

/// Loads one student's full profile from the directory at `base`.
pub async fn fetch_student(base: PathBuf, id: String) -> BackendResult<Student> {
    let mut entries = fs::read_dir(base.join("classes")).await?;
    while let Some(entry) = entries.next_entry().await? {
        let path = entry.path();
        if !is_jsonl(&path) {
            continue;
        }
        let class = parse_class(&fs::read_to_string(&path).await?, &path)?;
        if let Some(student) = class.student(&id) {
            return Ok(student.clone());
        }
    }
    Err(BackendError::NotFound(id))
}

/// Loads one teacher's full profile from the directory at `base`.
pub async fn fetch_teacher(base: PathBuf, id: String) -> BackendResult<Teacher> {
    let path = teachers_path(&base);
    if !fs::try_exists(&path).await? {
        return Err(BackendError::NotFound(id));
    }
    parse_teachers(&fs::read_to_string(&path).await?)?
        .into_iter()
        .find(|t| t.id == id)
        .ok_or(BackendError::NotFound(id))
}

impl Directory {
    /// Returns a fetcher that loads student profiles from this directory.
    pub fn student_fetcher(&self) -> Fetcher<Student> {
        let base = self.base_path().to_path_buf();
        Rc::new(move |id| fetch_student(base.clone(), id).boxed_local())
    }

    /// Returns a fetcher that loads teacher profiles from this directory.
    pub fn teacher_fetcher(&self) -> Fetcher<Teacher> {
        let base = self.base_path().to_path_buf();
        Rc::new(move |id| fetch_teacher(base.clone(), id).boxed_local())
    }
}

#[cfg(test)]
mod tests {
    use tempfile::tempdir;

    use super::*;
    use crate::backend::directory::tests::populated;
    use crate::list_detail::{ListDetail, ListDetailOptions, SettleOutcome};

    #[tokio::test]
    async fn fetch_student_finds_profile() {
        let dir = tempdir().unwrap();
        populated(dir.path());
        let student = fetch_student(dir.path().to_path_buf(), "40501".into())
            .await
            .unwrap();
        assert_eq!(student.first_name, "Somchai");
    }

    #[tokio::test]
    async fn fetch_student_missing() {
        let dir = tempdir().unwrap();
        populated(dir.path());
        let result = fetch_student(dir.path().to_path_buf(), "00000".into()).await;
        assert!(matches!(result, Err(BackendError::NotFound(id)) if id == "00000"));
    }

    #[tokio::test]
    async fn fetch_teacher_finds_profile() {
        let dir = tempdir().unwrap();
        populated(dir.path());
        let teacher = fetch_teacher(dir.path().to_path_buf(), "T002".into())
            .await
            .unwrap();
        assert_eq!(teacher.first_name, "Malee");
    }

    #[tokio::test]
    async fn fetch_teacher_without_file() {
        let dir = tempdir().unwrap();
        crate::backend::Directory::with_path(dir.path()).unwrap();
        let result = fetch_teacher(dir.path().to_path_buf(), "T001".into()).await;
        assert!(matches!(result, Err(BackendError::NotFound(_))));
    }

    #[tokio::test]
    async fn student_fetcher_drives_list_detail() {
        let dir = tempdir().unwrap();
        let directory = populated(dir.path());
        let mut lookup = ListDetail::with_fetcher(
            directory.list_students().unwrap(),
            directory.student_fetcher(),
            ListDetailOptions::default().first_by_default(),
        );
        lookup.mount(std::time::Instant::now());
        assert_eq!(lookup.settle().await, Some(SettleOutcome::Applied));
        assert_eq!(lookup.selected_id(), Some("10101"));
        assert_eq!(lookup.selected_detail().unwrap().first_name, "Ann");
    }
}
