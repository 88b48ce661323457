/// DailyProgress entity for per-day completion counts
///
/// This module defines the DailyProgress struct that records how many times
/// a habit was completed on one calendar day. At most one row exists per
/// (habit, day) pair; repeat completions increment the existing row.

use serde::{Deserialize, Serialize};
use chrono::NaiveDate;
use crate::domain::{HabitId, ProgressId};

/// Per-day completion counter for one habit
///
/// Rows are created lazily on the first completion of a given day and
/// incremented on subsequent completions of that same day; they are never
/// deleted, even when the owning habit is soft-deleted.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DailyProgress {
    /// Unique identifier for this row
    pub id: ProgressId,
    /// Which habit this counter belongs to
    pub habit_id: HabitId,
    /// The calendar day (no time component) this counter covers
    pub day: NaiveDate,
    /// Completions recorded for that day
    pub count: u32,
}

impl DailyProgress {
    /// Create a fresh counter for the first completion of a day
    pub fn new(habit_id: HabitId, day: NaiveDate) -> Self {
        Self {
            id: ProgressId::new(),
            habit_id,
            day,
            count: 1,
        }
    }

    /// Create a row from existing data (used when loading from the database)
    pub fn from_existing(id: ProgressId, habit_id: HabitId, day: NaiveDate, count: u32) -> Self {
        Self {
            id,
            habit_id,
            day,
            count,
        }
    }
}
