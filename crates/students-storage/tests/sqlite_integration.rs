//! SQLite storage integration tests.
//!
//! These run against a real SQLite database in a temporary directory, so
//! they need no external services. The shared CRUD helper is also driven
//! against the in-memory backend to verify the two implementations behave
//! consistently and can be swapped at runtime.

use students_storage::{
    MemoryStudentStore, SqliteConfig, SqliteStudentStore, StorageError, Student, StudentStore,
};
use tempfile::TempDir;

/// Create a SQLite store backed by a fresh database file.
async fn create_sqlite_store(dir: &TempDir) -> SqliteStudentStore {
    let config = SqliteConfig {
        path: dir.path().join("students.db"),
        max_connections: 5,
        ..Default::default()
    };

    let store = SqliteStudentStore::from_config(&config)
        .await
        .expect("failed to open SQLite database");

    store
        .run_migrations()
        .await
        .expect("failed to run migrations");

    store
}

/// Full CRUD lifecycle against any StudentStore implementation.
async fn run_basic_crud_test<S: StudentStore>(store: &S) {
    // Empty store lists nothing.
    assert!(store.get_students().await.unwrap().is_empty());

    // Create and read back.
    let id = store
        .create_student("Ada Lovelace", "ada@example.com", 28)
        .await
        .unwrap();
    assert!(id > 0);

    let student = store.get_student_by_id(id).await.unwrap();
    assert_eq!(student.name, "Ada Lovelace");
    assert_eq!(student.email, "ada@example.com");
    assert_eq!(student.age, 28);

    // Update in place; id survives.
    let updated = store
        .update_student_by_id(
            id,
            Student {
                id,
                name: "Ada King".to_string(),
                email: "ada.king@example.com".to_string(),
                age: 36,
            },
        )
        .await
        .unwrap();
    assert_eq!(updated.id, id);
    assert_eq!(store.get_student_by_id(id).await.unwrap(), updated);

    // Delete removes the record.
    assert_eq!(store.delete_student_by_id(id).await.unwrap(), id);
    assert!(matches!(
        store.get_student_by_id(id).await,
        Err(StorageError::StudentNotFound { .. })
    ));
    assert!(store.get_students().await.unwrap().is_empty());
}

#[tokio::test]
async fn test_sqlite_basic_crud() {
    let dir = TempDir::new().unwrap();
    let store = create_sqlite_store(&dir).await;
    run_basic_crud_test(&store).await;
}

#[tokio::test]
async fn test_memory_basic_crud() {
    let store = MemoryStudentStore::new();
    run_basic_crud_test(&store).await;
}

#[tokio::test]
async fn test_sqlite_migrations_are_idempotent() {
    let dir = TempDir::new().unwrap();
    let store = create_sqlite_store(&dir).await;

    // Running migrations again must not fail or drop data.
    let id = store
        .create_student("Ada", "ada@example.com", 28)
        .await
        .unwrap();
    store.run_migrations().await.unwrap();
    assert!(store.get_student_by_id(id).await.is_ok());
}

#[tokio::test]
async fn test_sqlite_unique_email_constraint() {
    let dir = TempDir::new().unwrap();
    let store = create_sqlite_store(&dir).await;

    store
        .create_student("Ada", "ada@example.com", 28)
        .await
        .unwrap();

    let result = store.create_student("Other", "ada@example.com", 30).await;
    assert!(matches!(result, Err(StorageError::QueryError { .. })));
}

#[tokio::test]
async fn test_sqlite_age_check_constraint() {
    let dir = TempDir::new().unwrap();
    let store = create_sqlite_store(&dir).await;

    // The schema rejects non-positive ages even though handler-level
    // validation only rejects zero.
    let result = store.create_student("Ada", "ada@example.com", -5).await;
    assert!(matches!(result, Err(StorageError::QueryError { .. })));
}

#[tokio::test]
async fn test_sqlite_update_nonexistent_is_not_found() {
    let dir = TempDir::new().unwrap();
    let store = create_sqlite_store(&dir).await;

    let result = store
        .update_student_by_id(
            12,
            Student {
                id: 12,
                name: "Nobody".to_string(),
                email: "nobody@example.com".to_string(),
                age: 20,
            },
        )
        .await;
    assert!(matches!(
        result,
        Err(StorageError::StudentNotFound { id: 12 })
    ));
}

#[tokio::test]
async fn test_sqlite_delete_nonexistent_is_not_found() {
    let dir = TempDir::new().unwrap();
    let store = create_sqlite_store(&dir).await;

    let result = store.delete_student_by_id(12).await;
    assert!(matches!(
        result,
        Err(StorageError::StudentNotFound { id: 12 })
    ));
}

#[tokio::test]
async fn test_sqlite_ids_are_not_reused_after_delete() {
    let dir = TempDir::new().unwrap();
    let store = create_sqlite_store(&dir).await;

    let first = store
        .create_student("Ada", "ada@example.com", 28)
        .await
        .unwrap();
    store.delete_student_by_id(first).await.unwrap();

    let second = store
        .create_student("Grace", "grace@example.com", 35)
        .await
        .unwrap();
    assert!(second > first);
}

#[tokio::test]
async fn test_sqlite_list_returns_all_in_id_order() {
    let dir = TempDir::new().unwrap();
    let store = create_sqlite_store(&dir).await;

    let a = store
        .create_student("Ada", "ada@example.com", 28)
        .await
        .unwrap();
    let b = store
        .create_student("Grace", "grace@example.com", 35)
        .await
        .unwrap();

    let students = store.get_students().await.unwrap();
    assert_eq!(students.len(), 2);
    assert_eq!(students[0].id, a);
    assert_eq!(students[1].id, b);
}
