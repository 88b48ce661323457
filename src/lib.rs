/// Public library interface for the Habit Tracker API server
///
/// This module exports the server implementation and public types
/// that can be used by other applications or tests.

use std::path::PathBuf;
use std::sync::Arc;
use thiserror::Error;

// Internal modules
mod domain;
mod http;
mod service;
mod storage;

// Re-export public modules and types
pub use domain::*;
pub use http::HttpServer;
pub use service::*;
pub use storage::{HabitStore, SqliteStorage, StorageError};

/// Errors that can occur during server operation
#[derive(Error, Debug)]
pub enum ServerError {
    #[error("Database error: {0}")]
    Database(#[from] storage::StorageError),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Habit tracker server exposing the service over HTTP
///
/// Owns the SQLite-backed store and hands it to the HTTP front end; the
/// same store handle is what tests drive directly through the service
/// functions.
pub struct HabitApiServer {
    storage: Arc<SqliteStorage>,
}

impl HabitApiServer {
    /// Create a new server with the specified database path
    ///
    /// This will initialize the SQLite database with the required schema
    /// if it doesn't already exist.
    pub fn new(db_path: PathBuf) -> Result<Self, ServerError> {
        tracing::info!("Initializing habit tracker with database: {:?}", db_path);

        let storage = Arc::new(SqliteStorage::new(db_path)?);

        Ok(Self { storage })
    }

    /// Serve HTTP on the given address until shut down
    pub fn run(&self, addr: &str) -> Result<(), ServerError> {
        // Probe the store before accepting traffic
        let habits = self.storage.list_habits()?;
        tracing::info!("Server starting, found {} existing habits", habits.len());

        let http = HttpServer::new(Arc::clone(&self.storage));
        http.run(addr)?;

        Ok(())
    }

    /// Get a reference to the storage layer (useful for testing)
    pub fn storage(&self) -> &SqliteStorage {
        &self.storage
    }
}
