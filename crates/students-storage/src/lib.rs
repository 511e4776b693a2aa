//! students-storage: Storage abstraction layer
//!
//! This crate provides the storage abstraction for the students API, including:
//! - StudentStore trait for persistence operations
//! - SQLite implementation for production
//! - In-memory implementation for testing and development
//!
//! # Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────┐
//! │             students-storage                 │
//! ├─────────────────────────────────────────────┤
//! │  traits.rs   - StudentStore trait definition│
//! │  sqlite.rs   - SQLite implementation        │
//! │  memory.rs   - In-memory implementation     │
//! └─────────────────────────────────────────────┘
//! ```

pub mod error;
pub mod memory;
pub mod sqlite;
pub mod traits;

// Re-export commonly used types
pub use error::{StorageError, StorageResult};
pub use memory::MemoryStudentStore;
pub use sqlite::{SqliteConfig, SqliteStudentStore};
pub use traits::{Student, StudentStore};
