//! Application state shared by all handlers.
//!
//! [`AppState`] holds the [`ProgramService`] behind an `Arc`. There is no
//! lock around it: the service only holds a store handle, and each store
//! call is atomic on its own, so requests run fully in parallel.

use std::path::Path;
use std::sync::Arc;

use bounty_storage::{InMemoryStore, ProgramStore, SqliteStore, StorageError};

use crate::service::ProgramService;

/// Shared application state for the HTTP server.
#[derive(Clone)]
pub struct AppState {
    /// The shared program service.
    pub service: Arc<ProgramService>,
}

impl AppState {
    /// Creates state backed by a SQLite database at `db_path`, creating and
    /// migrating it if needed.
    pub fn new(db_path: impl AsRef<Path>) -> Result<Self, StorageError> {
        let store = SqliteStore::new(db_path)?;
        Ok(Self::with_store(Arc::new(store)))
    }

    /// Creates state over an already opened store.
    pub fn with_store(store: Arc<dyn ProgramStore>) -> Self {
        AppState {
            service: Arc::new(ProgramService::new(store)),
        }
    }

    /// Creates state backed by a fresh in-memory store (for testing).
    pub fn in_memory() -> Self {
        Self::with_store(Arc::new(InMemoryStore::new()))
    }
}
