//! In-memory storage implementation for testing and development.

use std::sync::atomic::{AtomicI64, Ordering};
use std::sync::Arc;

use async_trait::async_trait;
use dashmap::DashMap;
use tracing::instrument;

use crate::error::{StorageError, StorageResult};
use crate::traits::{Student, StudentStore};

/// In-memory implementation of StudentStore.
///
/// Emulates the SQLite schema constraints (unique email, `age > 0`
/// check) so handler tests exercise the same failure surface as the
/// relational backend. Ids come from a monotonic counter and are never
/// reused after deletion, matching AUTOINCREMENT semantics.
#[derive(Debug, Default)]
pub struct MemoryStudentStore {
    students: DashMap<i64, Student>,
    next_id: AtomicI64,
}

impl MemoryStudentStore {
    /// Creates a new in-memory student store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a new in-memory student store wrapped in Arc.
    pub fn new_shared() -> Arc<Self> {
        Arc::new(Self::new())
    }

    /// Emulates the schema-level `CHECK(age > 0)` constraint.
    fn check_age(age: i64) -> StorageResult<()> {
        if age <= 0 {
            return Err(StorageError::QueryError {
                message: "CHECK constraint failed: age".to_string(),
            });
        }
        Ok(())
    }

    /// Emulates the schema-level UNIQUE constraint on email.
    ///
    /// `exclude_id` skips the record being updated so a record can keep
    /// its own email.
    fn check_email_unique(&self, email: &str, exclude_id: Option<i64>) -> StorageResult<()> {
        let taken = self
            .students
            .iter()
            .any(|entry| entry.value().email == email && Some(entry.value().id) != exclude_id);
        if taken {
            return Err(StorageError::QueryError {
                message: "UNIQUE constraint failed: students.email".to_string(),
            });
        }
        Ok(())
    }
}

#[async_trait]
impl StudentStore for MemoryStudentStore {
    #[instrument(skip(self))]
    async fn create_student(&self, name: &str, email: &str, age: i64) -> StorageResult<i64> {
        Self::check_age(age)?;
        self.check_email_unique(email, None)?;

        let id = self.next_id.fetch_add(1, Ordering::SeqCst) + 1;
        self.students.insert(
            id,
            Student {
                id,
                name: name.to_string(),
                email: email.to_string(),
                age,
            },
        );

        Ok(id)
    }

    #[instrument(skip(self))]
    async fn get_student_by_id(&self, id: i64) -> StorageResult<Student> {
        self.students
            .get(&id)
            .map(|entry| entry.value().clone())
            .ok_or(StorageError::StudentNotFound { id })
    }

    #[instrument(skip(self))]
    async fn get_students(&self) -> StorageResult<Vec<Student>> {
        let mut students: Vec<Student> = self
            .students
            .iter()
            .map(|entry| entry.value().clone())
            .collect();
        students.sort_by_key(|s| s.id);
        Ok(students)
    }

    #[instrument(skip(self, student))]
    async fn update_student_by_id(&self, id: i64, student: Student) -> StorageResult<Student> {
        if !self.students.contains_key(&id) {
            return Err(StorageError::StudentNotFound { id });
        }
        Self::check_age(student.age)?;
        self.check_email_unique(&student.email, Some(id))?;

        let updated = Student {
            id,
            name: student.name,
            email: student.email,
            age: student.age,
        };
        self.students.insert(id, updated.clone());

        Ok(updated)
    }

    #[instrument(skip(self))]
    async fn delete_student_by_id(&self, id: i64) -> StorageResult<i64> {
        match self.students.remove(&id) {
            Some(_) => Ok(id),
            None => Err(StorageError::StudentNotFound { id }),
        }
    }
}
