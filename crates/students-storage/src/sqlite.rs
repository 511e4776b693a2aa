//! SQLite storage implementation.

use std::path::PathBuf;
use std::time::Duration;

use async_trait::async_trait;
use sqlx::sqlite::{SqliteConnectOptions, SqlitePool, SqlitePoolOptions, SqliteRow};
use sqlx::Row;
use tracing::{debug, instrument};

use crate::error::{StorageError, StorageResult};
use crate::traits::{Student, StudentStore};

/// SQLite configuration options.
#[derive(Debug, Clone)]
pub struct SqliteConfig {
    /// Path to the database file. Created if missing.
    pub path: PathBuf,
    /// Maximum number of connections in the pool.
    pub max_connections: u32,
    /// Minimum number of connections kept open in the pool.
    pub min_connections: u32,
    /// Maximum lifetime of a pooled connection in seconds.
    pub max_lifetime_secs: u64,
    /// Pool acquire timeout in seconds.
    ///
    /// This controls how long to wait when acquiring a connection from
    /// the pool, including time spent establishing new connections.
    pub connect_timeout_secs: u64,
}

impl Default for SqliteConfig {
    fn default() -> Self {
        Self {
            path: PathBuf::from("students.db"),
            max_connections: 10,
            min_connections: 1,
            max_lifetime_secs: 30 * 60,
            connect_timeout_secs: 30,
        }
    }
}

/// Parse a database row into a Student.
fn row_to_student(row: &SqliteRow) -> Student {
    Student {
        id: row.get("id"),
        name: row.get("name"),
        email: row.get("email"),
        age: row.get("age"),
    }
}

/// SQLite implementation of StudentStore.
///
/// # Concurrency
///
/// SQLite serializes writes internally; a busy timeout is set on every
/// connection so concurrent writers wait instead of failing immediately.
/// Update and delete are single conditional statements whose matched-row
/// count distinguishes "not found" from success, so there is no
/// check-then-mutate window.
pub struct SqliteStudentStore {
    pool: SqlitePool,
}

impl SqliteStudentStore {
    /// Creates a new SQLite store from an existing connection pool.
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    /// Creates a new SQLite store with the given configuration.
    ///
    /// Opens (or creates) the database file and applies the pool limits.
    /// Fails with `ConnectionError` if the database cannot be opened.
    #[instrument(skip(config))]
    pub async fn from_config(config: &SqliteConfig) -> StorageResult<Self> {
        let options = SqliteConnectOptions::new()
            .filename(&config.path)
            .create_if_missing(true)
            .busy_timeout(Duration::from_secs(5));

        let pool = SqlitePoolOptions::new()
            .max_connections(config.max_connections)
            .min_connections(config.min_connections)
            .max_lifetime(Duration::from_secs(config.max_lifetime_secs))
            .acquire_timeout(Duration::from_secs(config.connect_timeout_secs))
            .connect_with(options)
            .await
            .map_err(|e| StorageError::ConnectionError {
                message: e.to_string(),
            })?;

        Ok(Self { pool })
    }

    /// Ensures the students table exists.
    ///
    /// Idempotent; safe to run on every startup. AUTOINCREMENT keeps
    /// deleted ids from being reused.
    #[instrument(skip(self))]
    pub async fn run_migrations(&self) -> StorageResult<()> {
        debug!("Running SQLite database migrations");

        sqlx::query(
            r#"
            CREATE TABLE IF NOT EXISTS students (
                id INTEGER PRIMARY KEY AUTOINCREMENT,
                name TEXT NOT NULL,
                email TEXT UNIQUE NOT NULL,
                age INTEGER CHECK(age > 0)
            )
            "#,
        )
        .execute(&self.pool)
        .await
        .map_err(|e| StorageError::QueryError {
            message: format!("Failed to create students table: {}", e),
        })?;

        Ok(())
    }
}

#[async_trait]
impl StudentStore for SqliteStudentStore {
    #[instrument(skip(self))]
    async fn create_student(&self, name: &str, email: &str, age: i64) -> StorageResult<i64> {
        let result = sqlx::query("INSERT INTO students (name, email, age) VALUES (?, ?, ?)")
            .bind(name)
            .bind(email)
            .bind(age)
            .execute(&self.pool)
            .await
            .map_err(|e| StorageError::QueryError {
                message: e.to_string(),
            })?;

        Ok(result.last_insert_rowid())
    }

    #[instrument(skip(self))]
    async fn get_student_by_id(&self, id: i64) -> StorageResult<Student> {
        let row = sqlx::query("SELECT id, name, email, age FROM students WHERE id = ? LIMIT 1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| StorageError::QueryError {
                message: e.to_string(),
            })?;

        match row {
            Some(row) => Ok(row_to_student(&row)),
            None => Err(StorageError::StudentNotFound { id }),
        }
    }

    #[instrument(skip(self))]
    async fn get_students(&self) -> StorageResult<Vec<Student>> {
        let rows = sqlx::query("SELECT id, name, email, age FROM students ORDER BY id")
            .fetch_all(&self.pool)
            .await
            .map_err(|e| StorageError::QueryError {
                message: e.to_string(),
            })?;

        Ok(rows.iter().map(row_to_student).collect())
    }

    #[instrument(skip(self, student))]
    async fn update_student_by_id(&self, id: i64, student: Student) -> StorageResult<Student> {
        let result = sqlx::query("UPDATE students SET name = ?, email = ?, age = ? WHERE id = ?")
            .bind(&student.name)
            .bind(&student.email)
            .bind(student.age)
            .bind(id)
            .execute(&self.pool)
            .await
            .map_err(|e| StorageError::QueryError {
                message: e.to_string(),
            })?;

        if result.rows_affected() == 0 {
            return Err(StorageError::StudentNotFound { id });
        }

        // The row now holds exactly the applied values; reconstructing
        // avoids a read-back that could observe a concurrent change.
        Ok(Student {
            id,
            name: student.name,
            email: student.email,
            age: student.age,
        })
    }

    #[instrument(skip(self))]
    async fn delete_student_by_id(&self, id: i64) -> StorageResult<i64> {
        let result = sqlx::query("DELETE FROM students WHERE id = ?")
            .bind(id)
            .execute(&self.pool)
            .await
            .map_err(|e| StorageError::QueryError {
                message: e.to_string(),
            })?;

        if result.rows_affected() == 0 {
            return Err(StorageError::StudentNotFound { id });
        }

        Ok(id)
    }
}
