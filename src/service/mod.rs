/// Service layer implementing the habit operations
///
/// Each operation lives in its own module and is a free function generic
/// over the storage trait, so tests can run them against any store. The
/// functions compose the persisted Habit entity with the derived
/// today's-count into an explicit view struct instead of mutating the
/// entity itself.

pub mod complete;
pub mod create;
pub mod delete;
pub mod list;
pub mod update;

// Re-export the operation functions and their parameter types
pub use complete::*;
pub use create::*;
pub use delete::*;
pub use list::*;
pub use update::*;

use chrono::{DateTime, NaiveDate, Utc};
use serde::Serialize;
use thiserror::Error;

use crate::domain::{DomainError, Frequency, Habit, HabitId, Status};
use crate::storage::StorageError;

/// Errors surfaced by the service operations
///
/// `NotFound` is the only error the service itself raises: the habit id did
/// not resolve to a live habit. Everything else passes through from the
/// layer that produced it, unretried.
#[derive(Error, Debug)]
pub enum ServiceError {
    #[error("Habit not found: {habit_id}")]
    NotFound { habit_id: String },

    #[error("Domain validation error: {0}")]
    Domain(#[from] DomainError),

    #[error("Storage error: {0}")]
    Storage(StorageError),
}

impl From<StorageError> for ServiceError {
    fn from(e: StorageError) -> Self {
        match e {
            StorageError::HabitNotFound { habit_id } => ServiceError::NotFound { habit_id },
            other => ServiceError::Storage(other),
        }
    }
}

/// A habit record as returned to callers
///
/// This is the persisted entity plus the derived `today_completions` count,
/// kept separate from the stored [`Habit`] so persisted and derived state
/// never mix.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct HabitView {
    pub id: HabitId,
    pub title: String,
    pub description: Option<String>,
    pub frequency: Frequency,
    pub status: Status,
    pub history_count: u32,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    pub deleted_at: Option<DateTime<Utc>>,
    /// Completions recorded today (0 when no progress row exists yet)
    pub today_completions: u32,
}

impl HabitView {
    /// Compose the view from the stored entity and today's count
    pub fn from_habit(habit: Habit, today_completions: u32) -> Self {
        Self {
            id: habit.id,
            title: habit.title,
            description: habit.description,
            frequency: habit.frequency,
            status: habit.status,
            history_count: habit.history_count,
            created_at: habit.created_at,
            updated_at: habit.updated_at,
            deleted_at: habit.deleted_at,
            today_completions,
        }
    }
}

/// The current calendar day in UTC
///
/// All daily-progress accounting is keyed on this.
pub fn today() -> NaiveDate {
    Utc::now().naive_utc().date()
}
