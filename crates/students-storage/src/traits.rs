//! StudentStore trait definition.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::error::StorageResult;

/// A stored student record.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Student {
    /// Store-assigned identifier, immutable for the record's lifetime.
    pub id: i64,
    pub name: String,
    pub email: String,
    pub age: i64,
}

/// Abstract storage interface for student records.
///
/// Implementations must be thread-safe (Send + Sync) and support
/// async operations. Handlers are written against this trait so any
/// backend (relational, in-memory) can be swapped in.
#[async_trait]
pub trait StudentStore: Send + Sync + 'static {
    /// Creates a student and returns the store-assigned id.
    ///
    /// Fails with a query error if the email is already taken
    /// (uniqueness is enforced at the storage layer).
    async fn create_student(&self, name: &str, email: &str, age: i64) -> StorageResult<i64>;

    /// Gets a student by id.
    ///
    /// Fails with `StudentNotFound` when no record matches.
    async fn get_student_by_id(&self, id: i64) -> StorageResult<Student>;

    /// Lists all students. Returns an empty vec, not an error, when
    /// no records exist.
    async fn get_students(&self) -> StorageResult<Vec<Student>>;

    /// Replaces all fields except `id` of the record with the given id.
    ///
    /// Fails with `StudentNotFound` when `id` does not exist; no
    /// mutation happens in that case.
    async fn update_student_by_id(&self, id: i64, student: Student) -> StorageResult<Student>;

    /// Deletes the record with the given id, returning the id.
    ///
    /// Fails with `StudentNotFound` when `id` does not exist; no
    /// mutation happens in that case.
    async fn delete_student_by_id(&self, id: i64) -> StorageResult<i64>;
}
