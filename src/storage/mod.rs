/// Storage layer for persisting habit data
///
/// This module handles all database operations using SQLite. It provides
/// a clean interface for storing and retrieving habits and their daily
/// progress counters.

pub mod sqlite;
pub mod migrations;

// Re-export the main storage types
pub use sqlite::*;

use std::collections::HashMap;
use std::sync::Arc;
use chrono::{DateTime, NaiveDate, Utc};
use thiserror::Error;
use crate::domain::{Habit, HabitId};

/// Errors that can occur during storage operations
#[derive(Error, Debug)]
pub enum StorageError {
    #[error("Database connection error: {0}")]
    Connection(String),

    #[error("Database query error: {0}")]
    Query(#[from] rusqlite::Error),

    #[error("Habit not found: {habit_id}")]
    HabitNotFound { habit_id: String },

    #[error("Migration error: {0}")]
    Migration(String),
}

/// Trait defining the storage interface for habits
///
/// Every lookup and mutation in this trait sees only live habits: a row
/// whose `deleted_at` is set behaves as if it does not exist, and the
/// operations report `HabitNotFound` for it.
pub trait HabitStore {
    /// Persist a newly created habit
    fn insert_habit(&self, habit: &Habit) -> Result<(), StorageError>;

    /// Get a live habit by ID
    fn get_habit(&self, habit_id: &HabitId) -> Result<Habit, StorageError>;

    /// List live habits, most recently created first
    fn list_habits(&self) -> Result<Vec<Habit>, StorageError>;

    /// Write back the mutable fields of a live habit
    fn update_habit(&self, habit: &Habit) -> Result<(), StorageError>;

    /// Soft-delete a live habit by stamping `deleted_at`
    ///
    /// Deleting an already-deleted habit reports `HabitNotFound` rather
    /// than succeeding silently.
    fn soft_delete_habit(
        &self,
        habit_id: &HabitId,
        deleted_at: DateTime<Utc>,
    ) -> Result<(), StorageError>;

    /// Completion count recorded for one habit on one day (0 when no row)
    fn daily_count(&self, habit_id: &HabitId, day: NaiveDate) -> Result<u32, StorageError>;

    /// Completion counts for every habit on one day, in a single query
    fn daily_counts_for_day(
        &self,
        day: NaiveDate,
    ) -> Result<HashMap<HabitId, u32>, StorageError>;

    /// Record one completion as a single atomic unit of work
    ///
    /// Increments the habit's `history_count`, refreshes `updated_at`, and
    /// upsert-increments the day's progress row. Either all of it applies or
    /// none of it does. Returns the updated habit and the post-increment
    /// count for the day.
    fn complete_habit(
        &self,
        habit_id: &HabitId,
        day: NaiveDate,
        now: DateTime<Utc>,
    ) -> Result<(Habit, u32), StorageError>;
}

/// Delegate the storage interface through an `Arc`, so shared handles
/// satisfy the same generic bounds as a bare store.
impl<S: HabitStore + ?Sized> HabitStore for Arc<S> {
    fn insert_habit(&self, habit: &Habit) -> Result<(), StorageError> {
        (**self).insert_habit(habit)
    }

    fn get_habit(&self, habit_id: &HabitId) -> Result<Habit, StorageError> {
        (**self).get_habit(habit_id)
    }

    fn list_habits(&self) -> Result<Vec<Habit>, StorageError> {
        (**self).list_habits()
    }

    fn update_habit(&self, habit: &Habit) -> Result<(), StorageError> {
        (**self).update_habit(habit)
    }

    fn soft_delete_habit(
        &self,
        habit_id: &HabitId,
        deleted_at: DateTime<Utc>,
    ) -> Result<(), StorageError> {
        (**self).soft_delete_habit(habit_id, deleted_at)
    }

    fn daily_count(&self, habit_id: &HabitId, day: NaiveDate) -> Result<u32, StorageError> {
        (**self).daily_count(habit_id, day)
    }

    fn daily_counts_for_day(
        &self,
        day: NaiveDate,
    ) -> Result<HashMap<HabitId, u32>, StorageError> {
        (**self).daily_counts_for_day(day)
    }

    fn complete_habit(
        &self,
        habit_id: &HabitId,
        day: NaiveDate,
        now: DateTime<Utc>,
    ) -> Result<(Habit, u32), StorageError> {
        (**self).complete_habit(habit_id, day, now)
    }
}
