/// Database migration management
///
/// This module handles creating and updating the SQLite database schema.
/// It ensures the database has all the required tables and indexes.

use rusqlite::Connection;
use crate::storage::StorageError;

/// Current database schema version
///
/// Increment this when you add new migrations
const CURRENT_VERSION: i32 = 1;

/// Initialize the database schema
///
/// This creates all required tables and indexes if they don't exist.
/// It also sets up the version tracking for future migrations.
pub fn initialize_database(conn: &Connection) -> Result<(), StorageError> {
    // Create version tracking table first
    conn.execute(
        "CREATE TABLE IF NOT EXISTS schema_version (
            version INTEGER PRIMARY KEY
        )",
        [],
    )?;

    // Check current version
    let current_version = get_current_version(conn)?;

    // Run migrations if needed
    if current_version < CURRENT_VERSION {
        run_migrations(conn, current_version)?;
        set_version(conn, CURRENT_VERSION)?;
    }

    Ok(())
}

/// Get the current database schema version
fn get_current_version(conn: &Connection) -> Result<i32, StorageError> {
    let version = conn
        .query_row("SELECT version FROM schema_version LIMIT 1", [], |row| {
            row.get::<_, i32>(0)
        })
        .unwrap_or(0); // Default to version 0 if no version record exists

    Ok(version)
}

/// Set the database schema version
fn set_version(conn: &Connection, version: i32) -> Result<(), StorageError> {
    conn.execute("DELETE FROM schema_version", [])?;
    conn.execute(
        "INSERT INTO schema_version (version) VALUES (?1)",
        [version],
    )?;
    Ok(())
}

/// Run database migrations from the current version to the latest
fn run_migrations(conn: &Connection, from_version: i32) -> Result<(), StorageError> {
    if from_version < 1 {
        migration_v1(conn)?;
    }

    // Future migrations would go here:
    // if from_version < 2 {
    //     migration_v2(conn)?;
    // }

    Ok(())
}

/// Migration to version 1: Create initial tables
///
/// This creates the habits table and the per-day progress counter table.
fn migration_v1(conn: &Connection) -> Result<(), StorageError> {
    // Create habits table. Timestamps are RFC 3339 text; deleted_at stays
    // NULL while the habit is live.
    conn.execute(
        "CREATE TABLE IF NOT EXISTS habits (
            id TEXT PRIMARY KEY,
            title TEXT NOT NULL,
            description TEXT,
            frequency TEXT NOT NULL,
            status TEXT NOT NULL,
            history_count INTEGER NOT NULL DEFAULT 0,
            created_at TEXT NOT NULL,
            updated_at TEXT NOT NULL,
            deleted_at TEXT
        )",
        [],
    )?;

    // Create habit_daily_progress table. `day` is a date-only string
    // (YYYY-MM-DD); rows survive soft-deletion of the owning habit.
    conn.execute(
        "CREATE TABLE IF NOT EXISTS habit_daily_progress (
            id TEXT PRIMARY KEY,
            habit_id TEXT NOT NULL,
            day TEXT NOT NULL,
            count INTEGER NOT NULL DEFAULT 0,
            FOREIGN KEY (habit_id) REFERENCES habits (id)
        )",
        [],
    )?;

    create_indexes_v1(conn)?;

    tracing::info!("Applied migration v1: Created initial database schema");
    Ok(())
}

/// Create database indexes for version 1
fn create_indexes_v1(conn: &Connection) -> Result<(), StorageError> {
    // One progress row per (habit, day); the completion upsert conflicts
    // on this index.
    conn.execute(
        "CREATE UNIQUE INDEX IF NOT EXISTS uq_habit_day
         ON habit_daily_progress (habit_id, day)",
        [],
    )?;

    // Index for the daily batched count lookup
    conn.execute(
        "CREATE INDEX IF NOT EXISTS idx_progress_day
         ON habit_daily_progress (day)",
        [],
    )?;

    // Index for filtering live habits
    conn.execute(
        "CREATE INDEX IF NOT EXISTS idx_habits_deleted_at
         ON habits (deleted_at)",
        [],
    )?;

    tracing::info!("Created database indexes for v1");
    Ok(())
}
