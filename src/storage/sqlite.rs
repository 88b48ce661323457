/// SQLite implementation of the habit storage interface
///
/// This module provides the concrete SQLite implementation for storing
/// and retrieving habit data. It handles all SQL queries and data conversion.

use std::collections::HashMap;
use std::path::PathBuf;
use std::sync::{Mutex, MutexGuard};

use chrono::{DateTime, NaiveDate, Utc};
use rusqlite::{params, Connection, OptionalExtension};

use crate::domain::{Frequency, Habit, HabitId, ProgressId, Status};
use crate::storage::{migrations, HabitStore, StorageError};

const HABIT_COLUMNS: &str =
    "id, title, description, frequency, status, history_count, created_at, updated_at, deleted_at";

/// SQLite-based storage implementation
///
/// The connection is guarded by a mutex: SQLite allows one writer at a
/// time, and the guard serializes access the same way a single-connection
/// pool would. Atomicity of multi-statement operations comes from SQLite
/// transactions, not from the lock.
pub struct SqliteStorage {
    conn: Mutex<Connection>,
}

impl SqliteStorage {
    /// Create a new SQLite storage instance
    ///
    /// This opens the database file and runs any necessary migrations
    /// to ensure the schema is up to date.
    pub fn new(db_path: PathBuf) -> Result<Self, StorageError> {
        let conn = Connection::open(&db_path)
            .map_err(|e| StorageError::Connection(format!("Failed to open database: {}", e)))?;

        // Enable foreign key constraints
        conn.execute("PRAGMA foreign_keys = ON", [])
            .map_err(|e| StorageError::Connection(format!("Failed to enable foreign keys: {}", e)))?;

        // Initialize/migrate the database schema
        migrations::initialize_database(&conn)?;

        tracing::info!("SQLite storage initialized at: {:?}", db_path);

        Ok(Self {
            conn: Mutex::new(conn),
        })
    }

    fn lock(&self) -> Result<MutexGuard<'_, Connection>, StorageError> {
        self.conn
            .lock()
            .map_err(|_| StorageError::Connection("storage mutex poisoned".to_string()))
    }

    /// Parse an RFC 3339 timestamp column
    fn parse_timestamp(idx: usize, s: &str) -> rusqlite::Result<DateTime<Utc>> {
        DateTime::parse_from_rfc3339(s)
            .map(|dt| dt.with_timezone(&Utc))
            .map_err(|_| {
                rusqlite::Error::InvalidColumnType(
                    idx,
                    "Invalid datetime".to_string(),
                    rusqlite::types::Type::Text,
                )
            })
    }

    /// Map a habit row in `HABIT_COLUMNS` order to the domain entity
    fn map_habit_row(row: &rusqlite::Row) -> rusqlite::Result<Habit> {
        let id_str: String = row.get(0)?;
        let id = HabitId::from_string(&id_str).map_err(|_| {
            rusqlite::Error::InvalidColumnType(
                0,
                "Invalid UUID".to_string(),
                rusqlite::types::Type::Text,
            )
        })?;

        let frequency_str: String = row.get(3)?;
        let frequency = Frequency::parse(&frequency_str).ok_or_else(|| {
            rusqlite::Error::InvalidColumnType(
                3,
                "Invalid frequency".to_string(),
                rusqlite::types::Type::Text,
            )
        })?;

        let status_str: String = row.get(4)?;
        let status = Status::parse(&status_str).ok_or_else(|| {
            rusqlite::Error::InvalidColumnType(
                4,
                "Invalid status".to_string(),
                rusqlite::types::Type::Text,
            )
        })?;

        let created_at_str: String = row.get(6)?;
        let created_at = Self::parse_timestamp(6, &created_at_str)?;

        let updated_at_str: String = row.get(7)?;
        let updated_at = Self::parse_timestamp(7, &updated_at_str)?;

        let deleted_at_str: Option<String> = row.get(8)?;
        let deleted_at = match deleted_at_str {
            Some(s) => Some(Self::parse_timestamp(8, &s)?),
            None => None,
        };

        Ok(Habit::from_existing(
            id,
            row.get(1)?, // title
            row.get(2)?, // description
            frequency,
            status,
            row.get(5)?, // history_count
            created_at,
            updated_at,
            deleted_at,
        ))
    }
}

impl HabitStore for SqliteStorage {
    /// Persist a newly created habit
    fn insert_habit(&self, habit: &Habit) -> Result<(), StorageError> {
        let conn = self.lock()?;
        conn.execute(
            "INSERT INTO habits (
                id, title, description, frequency, status, history_count,
                created_at, updated_at, deleted_at
            ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9)",
            params![
                habit.id.to_string(),
                habit.title,
                habit.description,
                habit.frequency.as_str(),
                habit.status.as_str(),
                habit.history_count,
                habit.created_at.to_rfc3339(),
                habit.updated_at.to_rfc3339(),
                habit.deleted_at.map(|ts| ts.to_rfc3339()),
            ],
        )?;

        tracing::debug!("Created habit: {} ({})", habit.title, habit.id.to_string());
        Ok(())
    }

    /// Get a habit by its ID, treating soft-deleted rows as absent
    fn get_habit(&self, habit_id: &HabitId) -> Result<Habit, StorageError> {
        let conn = self.lock()?;
        let result = conn.query_row(
            &format!(
                "SELECT {} FROM habits WHERE id = ?1 AND deleted_at IS NULL",
                HABIT_COLUMNS
            ),
            params![habit_id.to_string()],
            Self::map_habit_row,
        );

        match result {
            Ok(habit) => Ok(habit),
            Err(rusqlite::Error::QueryReturnedNoRows) => Err(StorageError::HabitNotFound {
                habit_id: habit_id.to_string(),
            }),
            Err(e) => Err(StorageError::Query(e)),
        }
    }

    /// List live habits, most recently created first
    ///
    /// The id tie-break keeps the order stable when two habits share a
    /// creation timestamp.
    fn list_habits(&self) -> Result<Vec<Habit>, StorageError> {
        let conn = self.lock()?;
        let mut stmt = conn.prepare(&format!(
            "SELECT {} FROM habits WHERE deleted_at IS NULL
             ORDER BY created_at DESC, id",
            HABIT_COLUMNS
        ))?;

        let habit_iter = stmt.query_map([], Self::map_habit_row)?;

        let mut habits = Vec::new();
        for habit in habit_iter {
            habits.push(habit?);
        }

        Ok(habits)
    }

    /// Write back the mutable fields of a live habit
    fn update_habit(&self, habit: &Habit) -> Result<(), StorageError> {
        let conn = self.lock()?;
        let rows_affected = conn.execute(
            "UPDATE habits SET
                title = ?2,
                description = ?3,
                frequency = ?4,
                status = ?5,
                history_count = ?6,
                updated_at = ?7
             WHERE id = ?1 AND deleted_at IS NULL",
            params![
                habit.id.to_string(),
                habit.title,
                habit.description,
                habit.frequency.as_str(),
                habit.status.as_str(),
                habit.history_count,
                habit.updated_at.to_rfc3339(),
            ],
        )?;

        if rows_affected == 0 {
            return Err(StorageError::HabitNotFound {
                habit_id: habit.id.to_string(),
            });
        }

        tracing::debug!("Updated habit: {} ({})", habit.title, habit.id.to_string());
        Ok(())
    }

    /// Soft-delete a live habit by stamping `deleted_at`
    fn soft_delete_habit(
        &self,
        habit_id: &HabitId,
        deleted_at: DateTime<Utc>,
    ) -> Result<(), StorageError> {
        let conn = self.lock()?;
        let rows_affected = conn.execute(
            "UPDATE habits SET deleted_at = ?2, updated_at = ?2
             WHERE id = ?1 AND deleted_at IS NULL",
            params![habit_id.to_string(), deleted_at.to_rfc3339()],
        )?;

        if rows_affected == 0 {
            return Err(StorageError::HabitNotFound {
                habit_id: habit_id.to_string(),
            });
        }

        tracing::debug!("Soft deleted habit: {}", habit_id.to_string());
        Ok(())
    }

    /// Completion count for one habit on one day (0 when no row exists)
    fn daily_count(&self, habit_id: &HabitId, day: NaiveDate) -> Result<u32, StorageError> {
        let conn = self.lock()?;
        let count: Option<u32> = conn
            .query_row(
                "SELECT count FROM habit_daily_progress WHERE habit_id = ?1 AND day = ?2",
                params![habit_id.to_string(), day.to_string()],
                |row| row.get(0),
            )
            .optional()?;

        Ok(count.unwrap_or(0))
    }

    /// Completion counts for every habit on one day, in a single query
    fn daily_counts_for_day(
        &self,
        day: NaiveDate,
    ) -> Result<HashMap<HabitId, u32>, StorageError> {
        let conn = self.lock()?;
        let mut stmt = conn.prepare(
            "SELECT habit_id, count FROM habit_daily_progress WHERE day = ?1",
        )?;

        let row_iter = stmt.query_map(params![day.to_string()], |row| {
            let habit_id_str: String = row.get(0)?;
            let habit_id = HabitId::from_string(&habit_id_str).map_err(|_| {
                rusqlite::Error::InvalidColumnType(
                    0,
                    "Invalid UUID".to_string(),
                    rusqlite::types::Type::Text,
                )
            })?;
            let count: u32 = row.get(1)?;
            Ok((habit_id, count))
        })?;

        let mut counts = HashMap::new();
        for row in row_iter {
            let (habit_id, count) = row?;
            counts.insert(habit_id, count);
        }

        Ok(counts)
    }

    /// Record one completion as a single atomic transaction
    fn complete_habit(
        &self,
        habit_id: &HabitId,
        day: NaiveDate,
        now: DateTime<Utc>,
    ) -> Result<(Habit, u32), StorageError> {
        let mut conn = self.lock()?;
        let tx = conn.transaction()?;

        let rows_affected = tx.execute(
            "UPDATE habits SET history_count = history_count + 1, updated_at = ?2
             WHERE id = ?1 AND deleted_at IS NULL",
            params![habit_id.to_string(), now.to_rfc3339()],
        )?;

        if rows_affected == 0 {
            // Dropping the transaction rolls it back
            return Err(StorageError::HabitNotFound {
                habit_id: habit_id.to_string(),
            });
        }

        // Atomic upsert keyed on uq_habit_day: the first completion of a
        // day inserts count = 1, later ones increment the existing row.
        tx.execute(
            "INSERT INTO habit_daily_progress (id, habit_id, day, count)
             VALUES (?1, ?2, ?3, 1)
             ON CONFLICT (habit_id, day) DO UPDATE SET count = count + 1",
            params![
                ProgressId::new().to_string(),
                habit_id.to_string(),
                day.to_string(),
            ],
        )?;

        let habit = tx.query_row(
            &format!("SELECT {} FROM habits WHERE id = ?1", HABIT_COLUMNS),
            params![habit_id.to_string()],
            Self::map_habit_row,
        )?;

        let day_count: u32 = tx.query_row(
            "SELECT count FROM habit_daily_progress WHERE habit_id = ?1 AND day = ?2",
            params![habit_id.to_string(), day.to_string()],
            |row| row.get(0),
        )?;

        tx.commit()?;

        tracing::debug!(
            "Recorded completion for habit {} on {} (count {})",
            habit_id.to_string(),
            day,
            day_count
        );
        Ok((habit, day_count))
    }
}
