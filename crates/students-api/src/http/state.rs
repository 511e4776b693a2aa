//! Application state for HTTP handlers.

use std::sync::Arc;

use students_storage::StudentStore;

/// Application state shared across all HTTP handlers.
///
/// Generic over the storage backend so handlers stay engine-agnostic;
/// any `StudentStore` implementation can be plugged in.
pub struct AppState<S: StudentStore> {
    /// The storage backend.
    pub storage: Arc<S>,
}

impl<S: StudentStore> AppState<S> {
    /// Creates a new application state around a shared storage backend.
    pub fn new(storage: Arc<S>) -> Self {
        Self { storage }
    }
}

impl<S: StudentStore> Clone for AppState<S> {
    fn clone(&self) -> Self {
        Self {
            storage: Arc::clone(&self.storage),
        }
    }
}
